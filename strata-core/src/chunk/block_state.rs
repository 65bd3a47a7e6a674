//! Block and biome identifiers as seen by blending.

/// The block properties blending cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct BlockState {
    /// Air of any kind.
    pub is_air: bool,
    /// Any leaves block.
    pub is_leaves: bool,
    /// Any log or stem.
    pub is_log: bool,
    /// Brown or red mushroom block.
    pub is_mushroom_block: bool,
    /// Whether the collision shape is non-empty.
    pub has_collision: bool,
    /// Whether the block holds a fluid (source, flowing or waterlogged).
    pub has_fluid: bool,
}

impl BlockState {
    /// Air.
    pub const AIR: Self = Self {
        is_air: true,
        is_leaves: false,
        is_log: false,
        is_mushroom_block: false,
        has_collision: false,
        has_fluid: false,
    };

    /// A full solid block.
    pub const STONE: Self = Self {
        is_air: false,
        is_leaves: false,
        is_log: false,
        is_mushroom_block: false,
        has_collision: true,
        has_fluid: false,
    };

    /// Leaves.
    pub const LEAVES: Self = Self {
        is_leaves: true,
        ..Self::STONE
    };

    /// A log.
    pub const LOG: Self = Self {
        is_log: true,
        ..Self::STONE
    };

    /// A mushroom block.
    pub const MUSHROOM_BLOCK: Self = Self {
        is_mushroom_block: true,
        ..Self::STONE
    };

    /// Water source.
    pub const WATER: Self = Self {
        has_collision: false,
        has_fluid: true,
        ..Self::STONE
    };

    /// Grass and other plants without collision.
    pub const SHORT_GRASS: Self = Self {
        has_collision: false,
        ..Self::STONE
    };

    /// Whether this block counts as terrain ground.
    ///
    /// Trees, huge mushrooms and anything without collision are skipped so
    /// the sampled surface is the terrain under them.
    #[must_use]
    pub const fn is_ground(&self) -> bool {
        !self.is_air
            && !self.is_leaves
            && !self.is_log
            && !self.is_mushroom_block
            && self.has_collision
    }

    /// Whether this block stops entity motion or holds fluid, the motion
    /// blocking heightmap predicate.
    #[must_use]
    pub const fn blocks_motion(&self) -> bool {
        self.has_collision || self.has_fluid
    }
}

/// Numeric biome identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BiomeId(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_predicate() {
        assert!(BlockState::STONE.is_ground());
        assert!(!BlockState::AIR.is_ground());
        assert!(!BlockState::LEAVES.is_ground());
        assert!(!BlockState::LOG.is_ground());
        assert!(!BlockState::MUSHROOM_BLOCK.is_ground());
        assert!(!BlockState::WATER.is_ground());
        assert!(!BlockState::SHORT_GRASS.is_ground());
    }

    #[test]
    fn test_motion_blocking() {
        assert!(BlockState::WATER.blocks_motion());
        assert!(BlockState::LEAVES.blocks_motion());
        assert!(!BlockState::SHORT_GRASS.blocks_motion());
        assert!(!BlockState::AIR.blocks_motion());
    }
}
