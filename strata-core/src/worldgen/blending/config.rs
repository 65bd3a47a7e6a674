use serde::Deserialize;

/// Ranges over which new terrain is blended toward old chunks.
///
/// Ranges are in quart cells (4 blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlendingConfig {
    /// Horizontal range of height and biome blending.
    pub height_blending_range_cells: u16,
    /// Range of density blending.
    pub density_blending_range_cells: u16,
}

impl Default for BlendingConfig {
    fn default() -> Self {
        Self {
            height_blending_range_cells: 7,
            density_blending_range_cells: 2,
        }
    }
}

impl BlendingConfig {
    /// Chunks around the center whose caches feed height and biome blending.
    #[must_use]
    pub fn height_chunk_radius(&self) -> i32 {
        (i32::from(self.height_blending_range_cells) + 3) >> 2
    }

    /// Chunks around the center whose caches feed density blending.
    #[must_use]
    pub fn density_chunk_radius(&self) -> i32 {
        (i32::from(self.density_blending_range_cells) + 3) >> 2
    }

    pub(crate) fn height_range(&self) -> f64 {
        f64::from(self.height_blending_range_cells)
    }

    pub(crate) fn density_range(&self) -> f64 {
        f64::from(self.density_blending_range_cells)
    }
}
