//! Improved Perlin (gradient) noise.
//!
//! This is the base noise generator used by [`PerlinNoise`](super::PerlinNoise)
//! for octave-based noise and by [`BlendedNoise`](super::BlendedNoise) for the
//! legacy terrain shape.

use std::ops::Add;

use crate::math::{floor, lerp2, lerp3, smoothstep, smoothstep_derivative};
use crate::random::Random;

/// Gradient vectors for Perlin noise.
///
/// These are the 16 gradient vectors used in the dot product calculation.
/// The last four repeat earlier entries so a hash can be masked with `& 15`.
pub(crate) const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// Added to the y snapping quotient so values sitting exactly on a multiple
/// of `y_scale` do not fall into the cell below. Single precision on purpose.
const SHIFT_UP_EPSILON: f32 = 1.0e-7;

/// A noise value together with its partial derivatives.
///
/// Samples from several layers can be summed with `+`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseSample {
    /// Noise value.
    pub value: f64,
    /// Partial derivative along x.
    pub dx: f64,
    /// Partial derivative along y.
    pub dy: f64,
    /// Partial derivative along z.
    pub dz: f64,
}

impl Add for NoiseSample {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
            dz: self.dz + rhs.dz,
        }
    }
}

/// Improved Perlin noise generator.
///
/// Each instance has a permutation table and offset values initialized from
/// a random source.
#[doc(alias = "GradientNoise")]
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    /// Permutation table (256 bytes)
    p: [u8; 256],
    /// X offset for the noise coordinates
    pub xo: f64,
    /// Y offset for the noise coordinates
    pub yo: f64,
    /// Z offset for the noise coordinates
    pub zo: f64,
}

impl ImprovedNoise {
    /// Creates a new `ImprovedNoise` from a random source.
    ///
    /// Draws the three offsets first, then shuffles the permutation table
    /// (Fisher-Yates) from the same stream. Changing this order changes
    /// every world generated from the seed.
    pub fn new<R: Random + ?Sized>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }

        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, i + offset);
        }

        Self { p, xo, yo, zo }
    }

    /// Sample noise at the given coordinates.
    ///
    /// This is the standard 3D Perlin noise sampling without Y scaling.
    #[inline]
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise_with_y_scale(x, y, z, 0.0, 0.0)
    }

    /// Sample noise with Y scale and fudge parameters.
    ///
    /// With a non-zero `y_scale` the y fraction used for the gradient lookup
    /// is snapped down to a multiple of `y_scale`, which tiles the noise
    /// vertically. The interpolation weight still uses the unsnapped fraction.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - The coordinates to sample
    /// * `y_scale` - Y scaling factor (0.0 to disable)
    /// * `y_fudge` - Upper limit for the snapped fraction (ignored when negative)
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn noise_with_y_scale(&self, x: f64, y: f64, z: f64, y_scale: f64, y_fudge: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xf = floor(x);
        let yf = floor(y);
        let zf = floor(z);

        let xr = x - f64::from(xf);
        let yr = y - f64::from(yf);
        let zr = z - f64::from(zf);

        #[allow(clippy::if_not_else)]
        let yr_fudge = if y_scale != 0.0 {
            let fudge_limit = if y_fudge >= 0.0 && y_fudge < yr {
                y_fudge
            } else {
                yr
            };
            (fudge_limit / y_scale + f64::from(SHIFT_UP_EPSILON)).floor() * y_scale
        } else {
            0.0
        };

        self.sample_and_lerp(xf, yf, zf, xr, yr - yr_fudge, zr, yr)
    }

    /// Sample noise and its analytic gradient.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn noise_with_derivative(&self, x: f64, y: f64, z: f64) -> NoiseSample {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xf = floor(x);
        let yf = floor(y);
        let zf = floor(z);

        let xr = x - f64::from(xf);
        let yr = y - f64::from(yf);
        let zr = z - f64::from(zf);

        self.sample_with_derivative(xf, yf, zf, xr, yr, zr)
    }

    /// Look up the permutation value at index x.
    #[inline]
    const fn p(&self, x: i32) -> usize {
        self.p[(x & 255) as usize] as usize
    }

    /// Hashes of the 8 cube corners, ordered 000, 100, 010, 110, 001, 101, 011, 111.
    #[inline]
    fn corner_hashes(&self, x: i32, y: i32, z: i32) -> [usize; 8] {
        let x0 = self.p(x);
        let x1 = self.p(x + 1);
        let xy00 = self.p(x0 as i32 + y);
        let xy01 = self.p(x0 as i32 + y + 1);
        let xy10 = self.p(x1 as i32 + y);
        let xy11 = self.p(x1 as i32 + y + 1);

        [
            self.p(xy00 as i32 + z),
            self.p(xy10 as i32 + z),
            self.p(xy01 as i32 + z),
            self.p(xy11 as i32 + z),
            self.p(xy00 as i32 + z + 1),
            self.p(xy10 as i32 + z + 1),
            self.p(xy01 as i32 + z + 1),
            self.p(xy11 as i32 + z + 1),
        ]
    }

    /// Sample noise at grid point and interpolate.
    #[allow(clippy::too_many_arguments)]
    fn sample_and_lerp(
        &self,
        x: i32,
        y: i32,
        z: i32,
        xr: f64,
        yr: f64,
        zr: f64,
        yr_original: f64,
    ) -> f64 {
        let h = self.corner_hashes(x, y, z);

        let d000 = grad_dot(h[0], xr, yr, zr);
        let d100 = grad_dot(h[1], xr - 1.0, yr, zr);
        let d010 = grad_dot(h[2], xr, yr - 1.0, zr);
        let d110 = grad_dot(h[3], xr - 1.0, yr - 1.0, zr);
        let d001 = grad_dot(h[4], xr, yr, zr - 1.0);
        let d101 = grad_dot(h[5], xr - 1.0, yr, zr - 1.0);
        let d011 = grad_dot(h[6], xr, yr - 1.0, zr - 1.0);
        let d111 = grad_dot(h[7], xr - 1.0, yr - 1.0, zr - 1.0);

        let x_alpha = smoothstep(xr);
        let y_alpha = smoothstep(yr_original);
        let z_alpha = smoothstep(zr);

        lerp3(
            x_alpha, y_alpha, z_alpha, d000, d100, d010, d110, d001, d101, d011, d111,
        )
    }

    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    fn sample_with_derivative(
        &self,
        x: i32,
        y: i32,
        z: i32,
        xr: f64,
        yr: f64,
        zr: f64,
    ) -> NoiseSample {
        let h = self.corner_hashes(x, y, z);
        let g = h.map(|hash| GRADIENT[hash & 15].map(f64::from));

        let d000 = dot(&g[0], xr, yr, zr);
        let d100 = dot(&g[1], xr - 1.0, yr, zr);
        let d010 = dot(&g[2], xr, yr - 1.0, zr);
        let d110 = dot(&g[3], xr - 1.0, yr - 1.0, zr);
        let d001 = dot(&g[4], xr, yr, zr - 1.0);
        let d101 = dot(&g[5], xr - 1.0, yr, zr - 1.0);
        let d011 = dot(&g[6], xr, yr - 1.0, zr - 1.0);
        let d111 = dot(&g[7], xr - 1.0, yr - 1.0, zr - 1.0);

        let x_alpha = smoothstep(xr);
        let y_alpha = smoothstep(yr);
        let z_alpha = smoothstep(zr);

        // Gradient term: the corner gradients interpolated per axis.
        let axis = |a: usize| {
            lerp3(
                x_alpha, y_alpha, z_alpha, g[0][a], g[1][a], g[2][a], g[3][a], g[4][a], g[5][a],
                g[6][a], g[7][a],
            )
        };

        // Fade term: corner differences along each axis, weighted by the fade slope.
        let fade_x = lerp2(y_alpha, z_alpha, d100 - d000, d110 - d010, d101 - d001, d111 - d011);
        let fade_y = lerp2(x_alpha, z_alpha, d010 - d000, d110 - d100, d011 - d001, d111 - d101);
        let fade_z = lerp2(x_alpha, y_alpha, d001 - d000, d101 - d100, d011 - d010, d111 - d110);

        NoiseSample {
            value: lerp3(
                x_alpha, y_alpha, z_alpha, d000, d100, d010, d110, d001, d101, d011, d111,
            ),
            dx: axis(0) + smoothstep_derivative(xr) * fade_x,
            dy: axis(1) + smoothstep_derivative(yr) * fade_y,
            dz: axis(2) + smoothstep_derivative(zr) * fade_z,
        }
    }
}

/// Calculate the dot product of a gradient vector and the position vector.
#[inline]
fn grad_dot(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENT[hash & 15];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}

#[inline]
fn dot(g: &[f64; 3], x: f64, y: f64, z: f64) -> f64 {
    g[0] * x + g[1] * y + g[2] * z
}
