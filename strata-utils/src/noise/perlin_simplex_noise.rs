//! Octave combiner over [`SimplexNoise`].

use crate::noise::perlin_noise::SKIPPED_OCTAVE_DRAWS;
use crate::noise::{NoiseError, SimplexNoise};
use crate::random::Random;
use crate::random::legacy_random::LegacyRandom;

/// Seed scale for the stream that draws the octaves above zero, kept as the
/// single precision literal it was introduced with.
#[allow(clippy::unreadable_literal)]
const HIGHER_OCTAVE_SEED_SCALE: f32 = 9.223372E18;

/// Octave-based simplex noise.
///
/// Unlike [`PerlinNoise`](super::PerlinNoise) the levels are stored highest
/// frequency first and only two dimensions are sampled.
#[doc(alias = "OctaveSimplexNoise")]
#[derive(Debug, Clone)]
pub struct PerlinSimplexNoise {
    noise_levels: Vec<Option<SimplexNoise>>,
    highest_freq_input_factor: f64,
    highest_freq_value_factor: f64,
}

impl PerlinSimplexNoise {
    /// Create a [`PerlinSimplexNoise`] over a set of octave exponents.
    ///
    /// Octaves at or below zero are drawn from `random`, the zero octave
    /// first. Octaves above zero come from a legacy stream seeded by sampling
    /// the zero octave at its own offsets. Every absent octave consumes 262
    /// draws from the stream it would have been drawn from.
    ///
    /// # Errors
    /// Returns [`NoiseError::NoOctaves`] for an empty set and
    /// [`NoiseError::TooFewOctaves`] for an inverted range.
    pub fn new<R: Random + ?Sized>(random: &mut R, octaves: &[i32]) -> Result<Self, NoiseError> {
        let (Some(&lowest), Some(&highest)) = (octaves.iter().min(), octaves.iter().max()) else {
            return Err(NoiseError::NoOctaves);
        };
        let below_zero = -lowest;
        let total = below_zero + highest + 1;
        if total < 1 {
            return Err(NoiseError::TooFewOctaves(total));
        }

        let zero = SimplexNoise::new(random);
        let higher_seed =
            (zero.get_value(zero.xo, zero.yo, zero.zo) * f64::from(HIGHER_OCTAVE_SEED_SCALE)) as i64;
        let zero_index = highest;
        let mut noise_levels: Vec<Option<SimplexNoise>> = vec![None; total as usize];

        if (0..total).contains(&zero_index) && octaves.contains(&0) {
            noise_levels[zero_index as usize] = Some(zero);
        }

        for i in zero_index + 1..total {
            if i >= 0 && octaves.contains(&(zero_index - i)) {
                noise_levels[i as usize] = Some(SimplexNoise::new(random));
            } else {
                random.consume_count(SKIPPED_OCTAVE_DRAWS);
            }
        }

        if highest > 0 {
            let mut higher = LegacyRandom::from_seed(higher_seed);
            for i in (0..zero_index).rev() {
                if octaves.contains(&(zero_index - i)) {
                    noise_levels[i as usize] = Some(SimplexNoise::new(&mut higher));
                } else {
                    higher.consume_count(SKIPPED_OCTAVE_DRAWS);
                }
            }
        }

        Ok(Self {
            noise_levels,
            highest_freq_input_factor: 2.0_f64.powi(highest),
            highest_freq_value_factor: 1.0 / (2.0_f64.powi(total) - 1.0),
        })
    }

    /// Sample the noise in two dimensions.
    ///
    /// With `use_offsets` each level shifts its input by its own `xo`/`yo`.
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, use_offsets: bool) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.highest_freq_input_factor;
        let mut value_factor = self.highest_freq_value_factor;

        for noise in &self.noise_levels {
            if let Some(noise) = noise {
                let (xo, yo) = if use_offsets {
                    (noise.xo, noise.yo)
                } else {
                    (0.0, 0.0)
                };
                value += noise.get_value_2d(x * input_factor + xo, y * input_factor + yo)
                    * value_factor;
            }
            input_factor /= 2.0;
            value_factor *= 2.0;
        }

        value
    }
}
