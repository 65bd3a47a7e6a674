//! Noise generation primitives and combiners.
//!
//! - [`ImprovedNoise`] - 3D gradient noise, the base of everything else
//! - [`SimplexNoise`] - 2D/3D simplex noise
//! - [`PerlinNoise`] - octave combiner over [`ImprovedNoise`]
//! - [`PerlinSimplexNoise`] - octave combiner over [`SimplexNoise`]
//! - [`NormalNoise`] - two [`PerlinNoise`] fields summed (climate, blending shift)
//! - [`BlendedNoise`] - legacy terrain shape density
//!
//! Every generator is immutable after construction and produces the same
//! values for the same seed on every platform.

mod blended_noise;
mod error;
mod improved_noise;
mod normal_noise;
mod parameters;
mod perlin_noise;
mod perlin_simplex_noise;
mod simplex_noise;

pub use blended_noise::{BlendedNoise, BlendedNoiseSettings};
pub use error::NoiseError;
pub use improved_noise::{ImprovedNoise, NoiseSample};
pub use normal_noise::{INPUT_FACTOR, NormalNoise};
pub use parameters::NoiseParameters;
pub use perlin_noise::{PerlinNoise, wrap};
pub use perlin_simplex_noise::PerlinSimplexNoise;
pub use simplex_noise::SimplexNoise;
