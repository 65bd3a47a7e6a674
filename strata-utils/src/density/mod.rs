//! Density evaluation context.
//!
//! Density functions are scalar fields over block coordinates; a positive
//! value means solid, a negative value means air.

/// Context for evaluating density functions at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityContext {
    /// X coordinate (block position)
    pub x: i32,
    /// Y coordinate (block position)
    pub y: i32,
    /// Z coordinate (block position)
    pub z: i32,
}

impl DensityContext {
    /// Create a new density context.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// A density function evaluated per block.
pub trait DensityFunction {
    /// Evaluate at a position.
    fn compute(&self, ctx: &DensityContext) -> f64;

    /// Lower bound of [`compute`](Self::compute).
    fn min_value(&self) -> f64;

    /// Upper bound of [`compute`](Self::compute).
    fn max_value(&self) -> f64;
}
