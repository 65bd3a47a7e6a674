use std::fmt;

/// The eight horizontal neighbours of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction8 {
    /// -z
    North,
    /// +x -z
    NorthEast,
    /// +x
    East,
    /// +x +z
    SouthEast,
    /// +z
    South,
    /// -x +z
    SouthWest,
    /// -x
    West,
    /// -x -z
    NorthWest,
}

impl Direction8 {
    /// Every direction, clockwise from north.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The four axis-aligned directions.
    pub const CARDINAL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Step along x.
    #[must_use]
    pub const fn step_x(self) -> i32 {
        match self {
            Self::NorthEast | Self::East | Self::SouthEast => 1,
            Self::North | Self::South => 0,
            Self::SouthWest | Self::West | Self::NorthWest => -1,
        }
    }

    /// Step along z.
    #[must_use]
    pub const fn step_z(self) -> i32 {
        match self {
            Self::SouthEast | Self::South | Self::SouthWest => 1,
            Self::East | Self::West => 0,
            Self::North | Self::NorthEast | Self::NorthWest => -1,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of [`Direction8`], stored as a bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Direction8Set(u8);

impl Direction8Set {
    /// No directions.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All eight directions.
    #[must_use]
    pub const fn all() -> Self {
        Self(u8::MAX)
    }

    /// Add a direction.
    pub const fn insert(&mut self, direction: Direction8) {
        self.0 |= direction.bit();
    }

    /// This set with one more direction.
    #[must_use]
    pub const fn with(self, direction: Direction8) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Whether the direction is in the set.
    #[must_use]
    pub const fn contains(self, direction: Direction8) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Directions in the set, clockwise from north.
    pub fn iter(self) -> impl Iterator<Item = Direction8> {
        Direction8::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

impl FromIterator<Direction8> for Direction8Set {
    fn from_iter<T: IntoIterator<Item = Direction8>>(iter: T) -> Self {
        let mut set = Self::empty();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl fmt::Debug for Direction8Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_unit() {
        for direction in Direction8::ALL {
            let (x, z) = (direction.step_x(), direction.step_z());
            assert!((x, z) != (0, 0));
            assert!(x.abs() <= 1 && z.abs() <= 1);
        }
        assert_eq!(Direction8::NorthWest.step_x(), -1);
        assert_eq!(Direction8::NorthWest.step_z(), -1);
    }

    #[test]
    fn test_set_operations() {
        let set: Direction8Set = [Direction8::East, Direction8::South].into_iter().collect();
        assert!(set.contains(Direction8::East));
        assert!(!set.contains(Direction8::West));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Direction8::East, Direction8::South]
        );
        assert!(Direction8Set::empty().is_empty());
        assert_eq!(Direction8Set::all().iter().count(), 8);
        assert!(Direction8Set::empty().with(Direction8::North).contains(Direction8::North));
        assert_eq!(format!("{set:?}"), "{East, South}");
    }
}
