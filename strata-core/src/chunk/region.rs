//! A region backed by a map of chunks.

use rustc_hash::FxHashMap;
use strata_utils::ChunkPos;

use crate::chunk::{ChunkAccess, WorldGenRegion};

/// A [`WorldGenRegion`] over an owned set of chunks.
#[derive(Debug)]
pub struct ChunkRegion<C> {
    center: ChunkPos,
    chunks: FxHashMap<ChunkPos, C>,
}

impl<C: ChunkAccess> ChunkRegion<C> {
    /// Create an empty region around `center`.
    #[must_use]
    pub fn new(center: ChunkPos) -> Self {
        Self {
            center,
            chunks: FxHashMap::default(),
        }
    }

    /// Add or replace a chunk, keyed by its own position.
    pub fn insert(&mut self, chunk: C) {
        self.chunks.insert(chunk.pos(), chunk);
    }

    /// Mutable access to a chunk.
    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut C> {
        self.chunks.get_mut(&pos)
    }
}

impl<C: ChunkAccess> WorldGenRegion for ChunkRegion<C> {
    type Chunk = C;

    fn center(&self) -> ChunkPos {
        self.center
    }

    fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&C> {
        self.chunks.get(&ChunkPos::new(chunk_x, chunk_z))
    }
}
