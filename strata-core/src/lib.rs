//! Chunk-boundary blending between old-generation and freshly generated
//! terrain.
//!
//! Chunks written by an older terrain generator keep a small
//! [`BlendingData`](worldgen::blending::BlendingData) cache of their border
//! columns. A [`Blender`](worldgen::blending::Blender) built for each chunk
//! being generated reads those caches and pulls new terrain height, density
//! and biomes toward the old values near the seam.

pub mod chunk;
pub mod worldgen;
