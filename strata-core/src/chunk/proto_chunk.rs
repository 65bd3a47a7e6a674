//! In-memory chunk storage.

use std::sync::Arc;

use strata_utils::{BlockPos, ChunkPos, QuartPos};

use crate::chunk::{BiomeId, BlockState, ChunkAccess, ChunkStatus};
use crate::worldgen::blending::BlendingData;

const WIDTH: usize = 16;
const QUART_WIDTH: usize = 4;

/// A chunk held fully in memory.
///
/// Blocks are stored densely, one [`BlockState`] per position, and biomes
/// one per quart.
#[derive(Debug, Clone)]
pub struct ProtoChunk {
    pos: ChunkPos,
    min_y: i32,
    height: i32,
    blocks: Box<[BlockState]>,
    biomes: Box<[BiomeId]>,
    status: ChunkStatus,
    old_noise_generation: bool,
    world_surface_primed: bool,
    blending_data: Option<Arc<BlendingData>>,
}

impl ProtoChunk {
    /// Create an empty (all air, biome 0) chunk.
    ///
    /// `height` is rounded down to a multiple of 4.
    #[must_use]
    pub fn new(pos: ChunkPos, min_y: i32, height: i32) -> Self {
        let height = height.max(0) & !3;
        let layers = height as usize;
        Self {
            pos,
            min_y,
            height,
            blocks: vec![BlockState::AIR; WIDTH * WIDTH * layers].into_boxed_slice(),
            biomes: vec![BiomeId::default(); QUART_WIDTH * QUART_WIDTH * layers / 4]
                .into_boxed_slice(),
            status: ChunkStatus::Empty,
            old_noise_generation: false,
            world_surface_primed: false,
            blending_data: None,
        }
    }

    /// Lowest block y.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// One above the highest block y.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y + self.height
    }

    fn block_index(&self, pos: BlockPos) -> Option<usize> {
        if pos.chunk() != self.pos || pos.y < self.min_y || pos.y >= self.max_y() {
            return None;
        }
        let x = (pos.x & 15) as usize;
        let z = (pos.z & 15) as usize;
        let y = (pos.y - self.min_y) as usize;
        Some((y * WIDTH + z) * WIDTH + x)
    }

    fn biome_index(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> usize {
        let layers = (self.height / 4).max(1);
        let y = (quart_y - QuartPos::from_block(self.min_y)).clamp(0, layers - 1) as usize;
        let x = QuartPos::local(quart_x) as usize;
        let z = QuartPos::local(quart_z) as usize;
        (y * QUART_WIDTH + z) * QUART_WIDTH + x
    }

    /// Set the block at a position. Positions outside the chunk are ignored.
    pub fn set_block_state(&mut self, pos: BlockPos, state: BlockState) {
        if let Some(index) = self.block_index(pos) {
            self.blocks[index] = state;
        }
    }

    /// Fill every column between `from_y` (inclusive) and `to_y` (exclusive).
    pub fn fill_layers(&mut self, from_y: i32, to_y: i32, state: BlockState) {
        for y in from_y.max(self.min_y)..to_y.min(self.max_y()) {
            for z in 0..16 {
                for x in 0..16 {
                    let pos = BlockPos::new(
                        self.pos.min_block_x() + x,
                        y,
                        self.pos.min_block_z() + z,
                    );
                    self.set_block_state(pos, state);
                }
            }
        }
    }

    /// Set the biome of one quart.
    pub fn set_noise_biome(&mut self, quart_x: i32, quart_y: i32, quart_z: i32, biome: BiomeId) {
        if self.biomes.is_empty() {
            return;
        }
        let index = self.biome_index(quart_x, quart_y, quart_z);
        self.biomes[index] = biome;
    }

    /// Set every quart to one biome.
    pub fn fill_biome(&mut self, biome: BiomeId) {
        self.biomes.fill(biome);
    }

    /// Mark the world surface heightmap as computed.
    pub const fn prime_heightmaps(&mut self) {
        self.world_surface_primed = true;
    }

    /// Set the generation status.
    pub const fn set_status(&mut self, status: ChunkStatus) {
        self.status = status;
    }

    /// Mark this chunk as generated by an older algorithm.
    pub const fn set_old_noise_generation(&mut self, old: bool) {
        self.old_noise_generation = old;
    }

    /// Attach a blending cache.
    pub fn set_blending_data(&mut self, data: Option<Arc<BlendingData>>) {
        self.blending_data = data;
    }

    /// One above the highest block in a column that matches `predicate`,
    /// or `min_y` if none does.
    fn column_height(&self, x: i32, z: i32, predicate: impl Fn(&BlockState) -> bool) -> i32 {
        (self.min_y..self.max_y())
            .rev()
            .find(|&y| predicate(&self.block_state(BlockPos::new(x, y, z))))
            .map_or(self.min_y, |y| y + 1)
    }
}

impl ChunkAccess for ProtoChunk {
    fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.block_index(pos)
            .map_or(BlockState::AIR, |index| self.blocks[index])
    }

    fn world_surface_height(&self, x: i32, z: i32) -> Option<i32> {
        self.world_surface_primed
            .then(|| self.column_height(x, z, |state| !state.is_air))
    }

    fn motion_blocking_height(&self, x: i32, z: i32) -> i32 {
        self.column_height(x, z, BlockState::blocks_motion)
    }

    fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> BiomeId {
        if self.biomes.is_empty() {
            return BiomeId::default();
        }
        self.biomes[self.biome_index(quart_x, quart_y, quart_z)]
    }

    fn status(&self) -> ChunkStatus {
        self.status
    }

    fn is_old_noise_generation(&self) -> bool {
        self.old_noise_generation
    }

    fn blending_data(&self) -> Option<&Arc<BlendingData>> {
        self.blending_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmaps() {
        let mut chunk = ProtoChunk::new(ChunkPos::new(1, -1), 0, 64);
        chunk.fill_layers(0, 20, BlockState::STONE);
        chunk.set_block_state(BlockPos::new(16, 20, -16), BlockState::SHORT_GRASS);

        assert_eq!(chunk.world_surface_height(16, -16), None);
        chunk.prime_heightmaps();
        assert_eq!(chunk.world_surface_height(16, -16), Some(21));
        assert_eq!(chunk.world_surface_height(17, -16), Some(20));
        assert_eq!(chunk.motion_blocking_height(16, -16), 20);
    }

    #[test]
    fn test_outside_reads_air() {
        let mut chunk = ProtoChunk::new(ChunkPos::new(0, 0), 0, 16);
        chunk.fill_layers(0, 16, BlockState::STONE);
        assert_eq!(chunk.block_state(BlockPos::new(16, 3, 0)), BlockState::AIR);
        assert_eq!(chunk.block_state(BlockPos::new(0, -1, 0)), BlockState::AIR);
        assert_eq!(chunk.block_state(BlockPos::new(15, 15, 15)), BlockState::STONE);
    }

    #[test]
    fn test_biomes() {
        let mut chunk = ProtoChunk::new(ChunkPos::new(0, 0), -16, 32);
        chunk.fill_biome(BiomeId(1));
        chunk.set_noise_biome(2, -3, 1, BiomeId(7));
        assert_eq!(chunk.noise_biome(2, -3, 1), BiomeId(7));
        assert_eq!(chunk.noise_biome(2, -2, 1), BiomeId(1));
    }
}
