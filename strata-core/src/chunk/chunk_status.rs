//! Chunk generation status.

/// Generation steps in the order a chunk passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ChunkStatus {
    /// Allocated, nothing generated.
    #[default]
    Empty,
    /// Structure starts placed.
    StructureStarts,
    /// Structure references collected.
    StructureReferences,
    /// Biomes sampled.
    Biomes,
    /// Terrain shape filled.
    Noise,
    /// Surface rules applied.
    Surface,
    /// Caves carved.
    Carvers,
    /// Features decorated.
    Features,
    /// Light sources initialized.
    InitializeLight,
    /// Light propagated.
    Light,
    /// Initial mobs spawned.
    Spawn,
    /// Fully generated.
    Full,
}

impl ChunkStatus {
    /// Whether this status comes before `other`.
    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }
}
