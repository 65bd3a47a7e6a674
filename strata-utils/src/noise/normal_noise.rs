//! Normal (double Perlin) noise.
//!
//! This combines two `PerlinNoise` samplers with slightly different coordinate scaling
//! to create smoother, more natural-looking noise. It's used for climate parameters
//! and the blending shift field.

use crate::noise::{NoiseError, NoiseParameters, PerlinNoise};
use crate::random::{PositionalRandom, Random, RandomSplitter};

/// Input factor for the second Perlin sampler.
///
/// The second sampler's coordinates are multiplied by this factor to create
/// variation between the two samplers.
#[allow(clippy::unreadable_literal)]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

/// Value factor numerator, the literal 0.16666666666666666 (1/6).
#[allow(clippy::unreadable_literal)]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

/// Normal (double Perlin) noise generator.
///
/// Combines two `PerlinNoise` samplers with different coordinate scales to create
/// smoother noise. The result is scaled by a value factor based on the octave span.
#[doc(alias = "DoubleNoise")]
#[derive(Debug, Clone)]
pub struct NormalNoise {
    /// First Perlin noise sampler
    first: PerlinNoise,
    /// Second Perlin noise sampler (coordinates scaled by `INPUT_FACTOR`)
    second: PerlinNoise,
    /// Factor applied to the sum of both samplers
    value_factor: f64,
    /// Maximum possible output value
    max_value: f64,
    parameters: NoiseParameters,
}

impl NormalNoise {
    /// Create a `NormalNoise` with both fields in independent mode.
    ///
    /// The first field forks its positional factory from `random` before the
    /// second does, so the two get different seeds.
    ///
    /// # Errors
    /// Returns [`NoiseError::AllAmplitudesZero`] if no amplitude is non-zero,
    /// or the error of the underlying [`PerlinNoise`] construction.
    pub fn create<R: Random + ?Sized>(
        random: &mut R,
        parameters: NoiseParameters,
    ) -> Result<Self, NoiseError> {
        let first = PerlinNoise::create(random, parameters.first_octave, &parameters.amplitudes)?;
        let second = PerlinNoise::create(random, parameters.first_octave, &parameters.amplitudes)?;
        Self::finish(first, second, parameters)
    }

    /// Create a `NormalNoise` with both fields in legacy (shared stream) mode.
    ///
    /// # Errors
    /// Same as [`create`](Self::create), plus the legacy octave checks of
    /// [`PerlinNoise::create_legacy`].
    #[deprecated = "only reproduces nether biomes of worlds created before the independent octave format"]
    pub fn create_legacy_nether_biome<R: Random + ?Sized>(
        random: &mut R,
        parameters: NoiseParameters,
    ) -> Result<Self, NoiseError> {
        let first =
            PerlinNoise::create_legacy(random, parameters.first_octave, &parameters.amplitudes)?;
        let second =
            PerlinNoise::create_legacy(random, parameters.first_octave, &parameters.amplitudes)?;
        Self::finish(first, second, parameters)
    }

    /// Create a `NormalNoise` seeded from `splitter.with_hash_of(noise_id)`.
    ///
    /// # Errors
    /// Same as [`create`](Self::create).
    pub fn create_from_splitter(
        splitter: &RandomSplitter,
        noise_id: &str,
        parameters: NoiseParameters,
    ) -> Result<Self, NoiseError> {
        let mut random = splitter.with_hash_of(noise_id);
        Self::create(&mut random, parameters)
    }

    /// Finish construction with the two `PerlinNoise` instances.
    fn finish(
        first: PerlinNoise,
        second: PerlinNoise,
        parameters: NoiseParameters,
    ) -> Result<Self, NoiseError> {
        // Span of non-zero octaves
        let mut non_zero = parameters
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| **a != 0.0)
            .map(|(i, _)| i as i32);
        let Some(min_octave) = non_zero.next() else {
            return Err(NoiseError::AllAmplitudesZero);
        };
        let max_octave = non_zero.last().unwrap_or(min_octave);

        let value_factor = TARGET_DEVIATION / expected_deviation(max_octave - min_octave);
        let max_value = (first.max_value() + second.max_value()) * value_factor;

        Ok(Self {
            first,
            second,
            value_factor,
            max_value,
            parameters,
        })
    }

    /// Sample the noise at the given coordinates.
    ///
    /// The result combines two Perlin noise samples:
    /// - First sampler at (x, y, z)
    /// - Second sampler at (x * `INPUT_FACTOR`, y * `INPUT_FACTOR`, z * `INPUT_FACTOR`)
    ///
    /// The sum is then scaled by the value factor.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let x2 = x * INPUT_FACTOR;
        let y2 = y * INPUT_FACTOR;
        let z2 = z * INPUT_FACTOR;
        (self.first.get_value(x, y, z) + self.second.get_value(x2, y2, z2)) * self.value_factor
    }

    /// Get the maximum possible output value.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Factor applied to the sum of both fields.
    #[inline]
    #[must_use]
    pub const fn value_factor(&self) -> f64 {
        self.value_factor
    }

    /// The field sampled at the unscaled coordinates.
    #[must_use]
    pub const fn first(&self) -> &PerlinNoise {
        &self.first
    }

    /// The field sampled at coordinates scaled by [`INPUT_FACTOR`].
    #[must_use]
    pub const fn second(&self) -> &PerlinNoise {
        &self.second
    }

    /// Parameters this noise was built from.
    #[must_use]
    pub const fn parameters(&self) -> &NoiseParameters {
        &self.parameters
    }
}

/// Calculate the expected deviation for a given octave span.
///
/// This is used to normalize the output of the combined noise.
/// Formula: 0.1 * (1 + 1/(span + 1))
#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span + 1))
}
