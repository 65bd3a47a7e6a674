use thiserror::Error;

/// Errors raised while constructing a noise generator.
///
/// Sampling never fails; every check happens up front.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoiseError {
    /// An octave set or amplitude list was empty.
    #[error("need some octaves")]
    NoOctaves,
    /// The octave range spans fewer than one octave.
    #[error("total number of octaves needs to be >= 1, got {0}")]
    TooFewOctaves(i32),
    /// Every amplitude was zero, so the noise would be constant.
    #[error("at least one amplitude must be non-zero")]
    AllAmplitudesZero,
    /// Shared-stream construction only supports octaves at or below zero.
    #[error("positive octaves are not supported by legacy construction")]
    PositiveOctaves,
    /// The shared stream produced a different number of levels than requested.
    #[error("created {found} noise levels, expected {expected}")]
    LevelCountMismatch {
        /// Number of non-zero amplitudes.
        expected: usize,
        /// Number of levels actually drawn.
        found: usize,
    },
    /// A shape setting is outside its allowed range.
    #[error("{name} = {value} is outside {min}..={max}")]
    SettingOutOfRange {
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}
