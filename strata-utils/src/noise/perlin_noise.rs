//! Octave-based Perlin noise.
//!
//! This combines multiple `ImprovedNoise` instances at different frequencies (octaves)
//! to create more natural-looking noise with detail at multiple scales.
//!
//! Two construction modes exist and both are frozen, since changing either
//! would change terrain for seeds generated with it:
//!
//! - independent: every octave is seeded by name from a positional factory
//! - legacy: octaves are drawn one after another from a single stream

use crate::noise::{ImprovedNoise, NoiseError, NoiseParameters};
use crate::random::{PositionalRandom, Random, RandomSplitter};

/// Round-off constant for coordinate wrapping to prevent precision loss.
/// This is 2^25 = 33554432.
const ROUND_OFF: f64 = 33_554_432.0;

/// Draws consumed by one skipped octave in legacy construction.
pub(crate) const SKIPPED_OCTAVE_DRAWS: u32 = 262;

/// Octave-based Perlin noise generator.
///
/// Combines multiple [`ImprovedNoise`] instances at different frequencies
/// to create noise with detail at multiple scales.
#[doc(alias = "OctaveNoise")]
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// Noise generators for each octave (None if amplitude is 0)
    noise_levels: Vec<Option<ImprovedNoise>>,
    /// Exponent of the lowest frequency octave
    first_octave: i32,
    /// Amplitude multipliers for each octave
    amplitudes: Vec<f64>,
    /// Factor applied to input coordinates for the lowest frequency octave
    lowest_freq_input_factor: f64,
    /// Factor applied to output values for the lowest frequency octave
    lowest_freq_value_factor: f64,
    /// Maximum possible output value
    max_value: f64,
}

impl PerlinNoise {
    /// Create a [`PerlinNoise`] in independent mode.
    ///
    /// Forks a positional factory from `random` (two draws for xoroshiro) and
    /// seeds each non-zero octave from `with_hash_of("octave_{octave}")`.
    /// Zero-amplitude octaves consume nothing.
    ///
    /// # Errors
    /// Returns [`NoiseError::NoOctaves`] for an empty amplitude list.
    pub fn create<R: Random + ?Sized>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Result<Self, NoiseError> {
        let splitter = random.next_positional();
        Self::create_from_splitter(&splitter, first_octave, amplitudes)
    }

    /// Create a [`PerlinNoise`] in independent mode from an existing
    /// positional factory.
    ///
    /// # Errors
    /// Returns [`NoiseError::NoOctaves`] for an empty amplitude list.
    pub fn create_from_splitter(
        splitter: &RandomSplitter,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Result<Self, NoiseError> {
        if amplitudes.is_empty() {
            return Err(NoiseError::NoOctaves);
        }

        let noise_levels = amplitudes
            .iter()
            .zip(first_octave..)
            .map(|(&amplitude, octave)| {
                (amplitude != 0.0).then(|| {
                    let mut octave_random = splitter.with_hash_of(&format!("octave_{octave}"));
                    ImprovedNoise::new(&mut octave_random)
                })
            })
            .collect();

        Ok(Self::from_parts(noise_levels, first_octave, amplitudes))
    }

    /// Create a [`PerlinNoise`] in independent mode from [`NoiseParameters`].
    ///
    /// # Errors
    /// Returns [`NoiseError::NoOctaves`] for an empty amplitude list.
    pub fn from_parameters<R: Random + ?Sized>(
        random: &mut R,
        parameters: &NoiseParameters,
    ) -> Result<Self, NoiseError> {
        Self::create(random, parameters.first_octave, &parameters.amplitudes)
    }

    /// Create a [`PerlinNoise`] in legacy (shared stream) mode.
    ///
    /// The zero octave is drawn first, then octaves from `zero_index - 1`
    /// down to `0`. An octave with zero amplitude still consumes 262 draws,
    /// which keeps the stream aligned with worlds generated before such
    /// octaves were elided.
    ///
    /// # Errors
    /// Returns [`NoiseError::PositiveOctaves`] if any octave is above zero,
    /// [`NoiseError::NoOctaves`] for an empty amplitude list, and
    /// [`NoiseError::LevelCountMismatch`] if the drawn levels do not match the
    /// non-zero amplitudes.
    pub fn create_legacy<R: Random + ?Sized>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Result<Self, NoiseError> {
        let octaves = amplitudes.len();
        if octaves == 0 {
            return Err(NoiseError::NoOctaves);
        }
        let zero_octave_index = -i64::from(first_octave);
        if zero_octave_index < octaves as i64 - 1 {
            return Err(NoiseError::PositiveOctaves);
        }
        let zero_octave_index = zero_octave_index as usize;

        let mut noise_levels: Vec<Option<ImprovedNoise>> = vec![None; octaves];

        let zero = ImprovedNoise::new(random);
        if zero_octave_index < octaves && amplitudes[zero_octave_index] != 0.0 {
            noise_levels[zero_octave_index] = Some(zero);
        }

        for i in (0..zero_octave_index).rev() {
            if i < octaves && amplitudes[i] != 0.0 {
                noise_levels[i] = Some(ImprovedNoise::new(random));
            } else {
                random.consume_count(SKIPPED_OCTAVE_DRAWS);
            }
        }

        let found = noise_levels.iter().flatten().count();
        let expected = amplitudes.iter().filter(|&&a| a != 0.0).count();
        if found != expected {
            return Err(NoiseError::LevelCountMismatch { expected, found });
        }

        Ok(Self::from_parts(noise_levels, first_octave, amplitudes))
    }

    /// Create the legacy-mode noise used by [`BlendedNoise`](super::BlendedNoise).
    ///
    /// `octaves` is a set of octave exponents; every octave between the
    /// lowest and highest is present in the layout, with amplitude 1 for the
    /// listed ones and 0 otherwise.
    ///
    /// # Errors
    /// Returns [`NoiseError::NoOctaves`] for an empty set,
    /// [`NoiseError::TooFewOctaves`] for an inverted range, and any error of
    /// [`create_legacy`](Self::create_legacy).
    pub fn create_legacy_for_blended_noise<R: Random + ?Sized>(
        random: &mut R,
        octaves: &[i32],
    ) -> Result<Self, NoiseError> {
        let (first_octave, amplitudes) = make_amplitudes(octaves)?;
        Self::create_legacy(random, first_octave, &amplitudes)
    }

    /// Build a [`PerlinNoise`] from pre-computed noise levels.
    fn from_parts(
        noise_levels: Vec<Option<ImprovedNoise>>,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let octaves = amplitudes.len() as i32;

        // lowest_freq_input_factor = 2^first_octave
        let lowest_freq_input_factor = 2.0_f64.powi(first_octave);

        // lowest_freq_value_factor = 2^(octaves-1) / (2^octaves - 1)
        let lowest_freq_value_factor = 2.0_f64.powi(octaves - 1) / (2.0_f64.powi(octaves) - 1.0);

        let max_value = edge_value(amplitudes, lowest_freq_value_factor, 2.0);

        Self {
            noise_levels,
            first_octave,
            amplitudes: amplitudes.to_vec(),
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value,
        }
    }

    /// Sample the noise at the given coordinates.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.get_value_with_y_params(x, y, z, 0.0, 0.0, false)
    }

    /// Sample the noise with Y scaling parameters.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Coordinates to sample
    /// * `y_scale` - Y scaling factor for terrain
    /// * `y_fudge` - Y fudge factor for floor snapping
    /// * `y_flat_hack` - If true, use `-yo` instead of wrapped y (for legacy biomes)
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn get_value_with_y_params(
        &self,
        x: f64,
        y: f64,
        z: f64,
        y_scale: f64,
        y_fudge: f64,
        y_flat_hack: bool,
    ) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;

        for (noise_opt, amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if let Some(noise) = noise_opt {
                let noise_val = noise.noise_with_y_scale(
                    wrap(x * input_factor),
                    if y_flat_hack {
                        -noise.yo
                    } else {
                        wrap(y * input_factor)
                    },
                    wrap(z * input_factor),
                    y_scale * input_factor,
                    y_fudge * input_factor,
                );
                value += amplitude * noise_val * value_factor;
            }

            input_factor *= 2.0;
            value_factor /= 2.0;
        }

        value
    }

    /// Get the maximum possible output value.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Upper bound of the output when sampled with a vertical snap of
    /// `y_scale`, which lets a single octave exceed its usual range.
    #[must_use]
    pub fn max_broken_value(&self, y_scale: f64) -> f64 {
        edge_value(&self.amplitudes, self.lowest_freq_value_factor, y_scale + 2.0)
    }

    /// Exponent of the lowest frequency octave.
    #[inline]
    #[must_use]
    pub const fn first_octave(&self) -> i32 {
        self.first_octave
    }

    /// Amplitude of every octave, lowest frequency first.
    #[inline]
    #[must_use]
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Get the noise generator for a specific octave (by index from highest frequency).
    ///
    /// Index 0 is the highest frequency octave.
    #[must_use]
    pub fn get_octave_noise(&self, i: usize) -> Option<&ImprovedNoise> {
        let index = self.noise_levels.len().checked_sub(i + 1)?;
        self.noise_levels[index].as_ref()
    }
}

/// Sum of `amplitude * noise_value * value_factor` over the present octaves.
fn edge_value(amplitudes: &[f64], lowest_freq_value_factor: f64, noise_value: f64) -> f64 {
    let mut value = 0.0;
    let mut value_factor = lowest_freq_value_factor;

    for &amplitude in amplitudes {
        if amplitude != 0.0 {
            value += amplitude * noise_value * value_factor;
        }
        value_factor /= 2.0;
    }

    value
}

/// Turn a set of octave exponents into `(first_octave, amplitudes)`.
fn make_amplitudes(octaves: &[i32]) -> Result<(i32, Vec<f64>), NoiseError> {
    let (Some(&lowest), Some(&highest)) = (octaves.iter().min(), octaves.iter().max()) else {
        return Err(NoiseError::NoOctaves);
    };
    let below_zero = -lowest;
    let total = below_zero + highest + 1;
    if total < 1 {
        return Err(NoiseError::TooFewOctaves(total));
    }

    let mut amplitudes = vec![0.0; total as usize];
    for &octave in octaves {
        amplitudes[(octave + below_zero) as usize] = 1.0;
    }
    Ok((-below_zero, amplitudes))
}

/// Wrap a coordinate to prevent precision loss at large values.
///
/// This wraps the coordinate to the range `[-ROUND_OFF/2, ROUND_OFF/2]` to
/// maintain numerical precision for coordinates far from the origin.
#[inline]
#[must_use]
pub fn wrap(x: f64) -> f64 {
    x - (x / ROUND_OFF + 0.5).floor() * ROUND_OFF
}
