//! Legacy terrain shape noise.
//!
//! Three legacy-mode [`PerlinNoise`] fields: a main field picks, per block,
//! how far to move between a lower and an upper limit field.

// Noise code uses mathematical single-letter variables (x, y, z, i, j, k)
#![allow(clippy::many_single_char_names)]

use serde::Deserialize;

use crate::density::{DensityContext, DensityFunction};
use crate::math::clamped_lerp;
use crate::noise::perlin_noise::wrap;
use crate::noise::{NoiseError, PerlinNoise};
use crate::random::Random;
use crate::random::legacy_random::LegacyRandom;

/// Coordinate multiplier for terrain scale.
const COORDINATE_MULTIPLIER: f64 = 684.412;

const LIMIT_OCTAVES: std::ops::RangeInclusive<i32> = -15..=0;
const MAIN_OCTAVES: std::ops::RangeInclusive<i32> = -7..=0;

/// Shape settings of a [`BlendedNoise`].
///
/// Defaults are the overworld values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlendedNoiseSettings {
    /// Horizontal scale of the limit fields.
    pub xz_scale: f64,
    /// Vertical scale of the limit fields.
    pub y_scale: f64,
    /// Horizontal stretch of the main field relative to the limits.
    pub xz_factor: f64,
    /// Vertical stretch of the main field relative to the limits.
    pub y_factor: f64,
    /// How far the vertical snap smears the main field.
    pub smear_scale_multiplier: f64,
}

impl Default for BlendedNoiseSettings {
    fn default() -> Self {
        Self {
            xz_scale: 1.0,
            y_scale: 1.0,
            xz_factor: 80.0,
            y_factor: 160.0,
            smear_scale_multiplier: 8.0,
        }
    }
}

impl BlendedNoiseSettings {
    /// Check every setting against its allowed range.
    ///
    /// # Errors
    /// Returns [`NoiseError::SettingOutOfRange`] for the first setting out of range.
    pub fn validate(&self) -> Result<(), NoiseError> {
        let checks = [
            ("xz_scale", self.xz_scale, 0.001, 1000.0),
            ("y_scale", self.y_scale, 0.001, 1000.0),
            ("xz_factor", self.xz_factor, 0.001, 1000.0),
            ("y_factor", self.y_factor, 0.001, 1000.0),
            ("smear_scale_multiplier", self.smear_scale_multiplier, 1.0, 8.0),
        ];
        for (name, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(NoiseError::SettingOutOfRange {
                    name,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Blended noise generator for terrain density.
///
/// Combines three Perlin noise samplers (min limit, max limit, and main)
/// to create smooth terrain density values used for basic terrain shape.
#[doc(alias = "LegacyShapeNoise")]
#[derive(Debug, Clone)]
pub struct BlendedNoise {
    min_limit_noise: PerlinNoise,
    max_limit_noise: PerlinNoise,
    main_noise: PerlinNoise,
    settings: BlendedNoiseSettings,
    xz_multiplier: f64,
    y_multiplier: f64,
    max_value: f64,
}

impl BlendedNoise {
    /// Create a `BlendedNoise`, drawing min limit, max limit and main fields
    /// back to back from `random`.
    ///
    /// # Errors
    /// Returns [`NoiseError::SettingOutOfRange`] for invalid settings.
    pub fn new<R: Random + ?Sized>(
        random: &mut R,
        settings: BlendedNoiseSettings,
    ) -> Result<Self, NoiseError> {
        settings.validate()?;

        let limit_octaves: Vec<i32> = LIMIT_OCTAVES.collect();
        let main_octaves: Vec<i32> = MAIN_OCTAVES.collect();

        let min_limit_noise = PerlinNoise::create_legacy_for_blended_noise(random, &limit_octaves)?;
        let max_limit_noise = PerlinNoise::create_legacy_for_blended_noise(random, &limit_octaves)?;
        let main_noise = PerlinNoise::create_legacy_for_blended_noise(random, &main_octaves)?;

        let xz_multiplier = COORDINATE_MULTIPLIER * settings.xz_scale;
        let y_multiplier = COORDINATE_MULTIPLIER * settings.y_scale;
        let max_value = min_limit_noise.max_broken_value(y_multiplier);

        Ok(Self {
            min_limit_noise,
            max_limit_noise,
            main_noise,
            settings,
            xz_multiplier,
            y_multiplier,
            max_value,
        })
    }

    /// Create a `BlendedNoise` from a fixed legacy stream seeded with 0.
    ///
    /// Used before a world seed is known; [`with_new_random`](Self::with_new_random)
    /// reseeds it later.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn create_unseeded(settings: BlendedNoiseSettings) -> Result<Self, NoiseError> {
        Self::new(&mut LegacyRandom::from_seed(0), settings)
    }

    /// Rebuild the fields from another stream, keeping the settings.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn with_new_random<R: Random + ?Sized>(&self, random: &mut R) -> Result<Self, NoiseError> {
        Self::new(random, self.settings)
    }

    /// Compute terrain density at the given block coordinates.
    #[must_use]
    pub fn compute(&self, block_x: i32, block_y: i32, block_z: i32) -> f64 {
        self.sample(block_x, block_y, block_z, true)
    }

    /// With `skip_saturated` the limit field that cannot affect the result
    /// is not sampled.
    fn sample(&self, block_x: i32, block_y: i32, block_z: i32, skip_saturated: bool) -> f64 {
        let d = f64::from(block_x) * self.xz_multiplier;
        let e = f64::from(block_y) * self.y_multiplier;
        let f = f64::from(block_z) * self.xz_multiplier;

        let g = d / self.settings.xz_factor;
        let h = e / self.settings.y_factor;
        let i = f / self.settings.xz_factor;

        let j = self.y_multiplier * self.settings.smear_scale_multiplier;
        let k = j / self.settings.y_factor;

        let mut n = 0.0;
        let mut o = 1.0;
        for p in 0..8 {
            if let Some(noise) = self.main_noise.get_octave_noise(p) {
                n += noise.noise_with_y_scale(wrap(g * o), wrap(h * o), wrap(i * o), k * o, h * o)
                    / o;
            }
            o /= 2.0;
        }

        let q = f64::midpoint(n / 10.0, 1.0);
        let skip_min = skip_saturated && q >= 1.0;
        let skip_max = skip_saturated && q <= 0.0;

        let mut l = 0.0;
        let mut m = 0.0;
        o = 1.0;
        for r in 0..16 {
            let s = wrap(d * o);
            let t = wrap(e * o);
            let u = wrap(f * o);
            let v = j * o;

            if !skip_min && let Some(noise) = self.min_limit_noise.get_octave_noise(r) {
                l += noise.noise_with_y_scale(s, t, u, v, e * o) / o;
            }
            if !skip_max && let Some(noise) = self.max_limit_noise.get_octave_noise(r) {
                m += noise.noise_with_y_scale(s, t, u, v, e * o) / o;
            }

            o /= 2.0;
        }

        clamped_lerp(l / 512.0, m / 512.0, q) / 128.0
    }

    /// Get the minimum value this noise can produce.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        -self.max_value
    }

    /// Get the maximum value this noise can produce.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Settings this noise was built with.
    #[must_use]
    pub const fn settings(&self) -> &BlendedNoiseSettings {
        &self.settings
    }
}

impl DensityFunction for BlendedNoise {
    fn compute(&self, ctx: &DensityContext) -> f64 {
        Self::compute(self, ctx.x, ctx.y, ctx.z)
    }

    fn min_value(&self) -> f64 {
        Self::min_value(self)
    }

    fn max_value(&self) -> f64 {
        self.max_value
    }
}
