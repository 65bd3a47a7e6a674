//! Chunk and region access used by the blending code.
//!
//! Blending only reads chunks, so it works against the [`ChunkAccess`] and
//! [`WorldGenRegion`] traits. [`ProtoChunk`] and [`ChunkRegion`] are plain
//! in-memory implementations.

use std::sync::Arc;

use strata_utils::{BlockPos, ChunkPos};

use crate::worldgen::blending::BlendingData;

pub mod block_state;
pub mod chunk_status;
pub mod proto_chunk;
pub mod region;

pub use block_state::{BiomeId, BlockState};
pub use chunk_status::ChunkStatus;
pub use proto_chunk::ProtoChunk;
pub use region::ChunkRegion;

/// Read access to a chunk during generation.
///
/// All coordinates are world coordinates.
pub trait ChunkAccess {
    /// Position of this chunk.
    fn pos(&self) -> ChunkPos;

    /// Block state at a position. Positions outside the chunk read as air.
    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// World surface heightmap at a column: one above the highest non-air
    /// block. `None` while the heightmap has not been primed.
    fn world_surface_height(&self, x: i32, z: i32) -> Option<i32>;

    /// Motion blocking heightmap at a column: one above the highest block
    /// that blocks motion or holds fluid.
    fn motion_blocking_height(&self, x: i32, z: i32) -> i32;

    /// Biome at a quart position.
    fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> BiomeId;

    /// Highest generation step this chunk has completed.
    fn status(&self) -> ChunkStatus;

    /// Whether this chunk was generated by an older terrain algorithm.
    fn is_old_noise_generation(&self) -> bool;

    /// Blending cache attached to this chunk, if it is an old chunk.
    fn blending_data(&self) -> Option<&Arc<BlendingData>>;
}

/// A window of chunks around the chunk currently being generated.
pub trait WorldGenRegion {
    /// Chunk type held by the region.
    type Chunk: ChunkAccess;

    /// Chunk being generated.
    fn center(&self) -> ChunkPos;

    /// Chunk at a chunk coordinate, or `None` if it is outside the region
    /// or not loaded.
    fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&Self::Chunk>;

    /// Whether any chunk within `radius` chunks (square) of `pos` is an old chunk.
    fn is_old_chunk_around(&self, pos: ChunkPos, radius: i32) -> bool {
        (pos.x - radius..=pos.x + radius).any(|x| {
            (pos.z - radius..=pos.z + radius).any(|z| {
                self.chunk(x, z)
                    .is_some_and(|chunk| chunk.is_old_noise_generation())
            })
        })
    }
}
