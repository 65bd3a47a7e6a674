//! Deterministic building blocks for terrain generation.
//!
//! Everything here is pure computation: seedable random streams, gradient
//! and simplex noise with their octave combiners, the legacy terrain shape
//! noise, coordinate helpers and the interpolation math the blending code
//! in `strata-core` is built on.

pub mod density;
pub mod math;
pub mod noise;
pub mod pos;
pub mod random;

pub use pos::{BlockPos, ChunkPos, QuartPos, SectionPos};
