//! Block, chunk, quart and section coordinates.
//!
//! A chunk is 16x16 blocks, a section is 16 blocks tall and a quart is a
//! 4-block unit (the biome and blending cell width).

use std::fmt;

/// Blocks per chunk side.
pub const CHUNK_WIDTH: i32 = 16;

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing this block.
    #[must_use]
    pub const fn chunk(self) -> ChunkPos {
        ChunkPos::new(SectionPos::block_to_section(self.x), SectionPos::block_to_section(self.z))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A chunk position (column of sections).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    /// Chunk X coordinate
    pub x: i32,
    /// Chunk Z coordinate
    pub z: i32,
}

impl ChunkPos {
    /// Create a new chunk position.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Lowest block x in this chunk.
    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        SectionPos::section_to_block(self.x)
    }

    /// Lowest block z in this chunk.
    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        SectionPos::section_to_block(self.z)
    }

    /// Highest block x in this chunk.
    #[must_use]
    pub const fn max_block_x(self) -> i32 {
        self.min_block_x() + CHUNK_WIDTH - 1
    }

    /// Highest block z in this chunk.
    #[must_use]
    pub const fn max_block_z(self) -> i32 {
        self.min_block_z() + CHUNK_WIDTH - 1
    }

    /// Offset by whole chunks.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// Conversions between block and quart coordinates.
pub struct QuartPos;

impl QuartPos {
    /// Bits per quart.
    pub const BITS: u32 = 2;
    /// Quarts per section side.
    pub const SIZE: i32 = 4;

    /// Block to quart (floor).
    #[inline]
    #[must_use]
    pub const fn from_block(block: i32) -> i32 {
        block >> Self::BITS
    }

    /// Quart to its lowest block.
    #[inline]
    #[must_use]
    pub const fn to_block(quart: i32) -> i32 {
        quart << Self::BITS
    }

    /// Section to its lowest quart.
    #[inline]
    #[must_use]
    pub const fn from_section(section: i32) -> i32 {
        section << Self::BITS
    }

    /// Quart to the section containing it.
    #[inline]
    #[must_use]
    pub const fn to_section(quart: i32) -> i32 {
        quart >> Self::BITS
    }

    /// Position of a quart within its section (`0..4`).
    #[inline]
    #[must_use]
    pub const fn local(quart: i32) -> i32 {
        quart & 3
    }
}

/// Conversions between block and section coordinates.
pub struct SectionPos;

impl SectionPos {
    /// Block to section (floor).
    #[inline]
    #[must_use]
    pub const fn block_to_section(block: i32) -> i32 {
        block >> 4
    }

    /// Section to its lowest block.
    #[inline]
    #[must_use]
    pub const fn section_to_block(section: i32) -> i32 {
        section << 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinates_floor() {
        assert_eq!(BlockPos::new(-1, 0, -17).chunk(), ChunkPos::new(-1, -2));
        assert_eq!(QuartPos::from_block(-1), -1);
        assert_eq!(QuartPos::local(-1), 3);
        assert_eq!(QuartPos::to_section(-5), -2);
    }

    #[test]
    fn test_chunk_bounds() {
        let pos = ChunkPos::new(-2, 3);
        assert_eq!(pos.min_block_x(), -32);
        assert_eq!(pos.max_block_x(), -17);
        assert_eq!(pos.min_block_z(), 48);
        assert_eq!(pos.max_block_z(), 63);
    }
}
