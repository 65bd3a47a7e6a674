//! Simplex gradient noise in two and three dimensions.

use crate::math::floor;
use crate::noise::improved_noise::GRADIENT;
use crate::random::Random;

#[allow(clippy::unreadable_literal)]
const F2: f64 = 0.3660254037844386;
#[allow(clippy::unreadable_literal)]
const G2: f64 = 0.21132486540518713;
#[allow(clippy::unreadable_literal)]
const F3: f64 = 0.3333333333333333;
#[allow(clippy::unreadable_literal)]
const G3: f64 = 0.16666666666666666;

/// Simplex noise generator.
///
/// Construction draws the same values in the same order as
/// [`ImprovedNoise`](super::ImprovedNoise): three offsets, then the shuffle.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    /// Permutation table, stored twice so corner lookups never wrap.
    p: [u8; 512],
    /// X offset, used by callers that want a decorrelated origin
    pub xo: f64,
    /// Y offset
    pub yo: f64,
    /// Z offset
    pub zo: f64,
}

impl SimplexNoise {
    /// Creates a new `SimplexNoise` from a random source.
    pub fn new<R: Random + ?Sized>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            table.swap(i, i + offset);
        }

        let mut p = [0u8; 512];
        p[..256].copy_from_slice(&table);
        p[256..].copy_from_slice(&table);

        Self { p, xo, yo, zo }
    }

    #[inline]
    const fn p(&self, i: i32) -> i32 {
        self.p[(i & 511) as usize] as i32
    }

    /// Sample 2D noise. The result lies roughly in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn get_value_2d(&self, x: f64, y: f64) -> f64 {
        let g2 = G2;
        let skew = (x + y) * F2;
        let i = floor(x + skew);
        let j = floor(y + skew);
        let unskew = f64::from(i + j) * g2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + g2;
        let y1 = y0 - f64::from(j1) + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        let ii = i & 255;
        let jj = j & 255;
        let gi0 = self.p(ii + self.p(jj)) % 12;
        let gi1 = self.p(ii + i1 + self.p(jj + j1)) % 12;
        let gi2 = self.p(ii + 1 + self.p(jj + 1)) % 12;

        let n0 = corner_noise(gi0, x0, y0, 0.0, 0.5);
        let n1 = corner_noise(gi1, x1, y1, 0.0, 0.5);
        let n2 = corner_noise(gi2, x2, y2, 0.0, 0.5);
        70.0 * (n0 + n1 + n2)
    }

    /// Sample 3D noise. The result lies roughly in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let skew = (x + y + z) * F3;
        let i = floor(x + skew);
        let j = floor(y + skew);
        let k = floor(z + skew);
        let unskew = f64::from(i + j + k) * G3;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);
        let z0 = z - (f64::from(k) - unskew);

        // Offsets of the second and third corner, picked by the ordering of
        // the fractional coordinates.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - f64::from(i1) + G3;
        let y1 = y0 - f64::from(j1) + G3;
        let z1 = z0 - f64::from(k1) + G3;
        let x2 = x0 - f64::from(i2) + F3;
        let y2 = y0 - f64::from(j2) + F3;
        let z2 = z0 - f64::from(k2) + F3;
        let x3 = x0 - 1.0 + 0.5;
        let y3 = y0 - 1.0 + 0.5;
        let z3 = z0 - 1.0 + 0.5;

        let ii = i & 255;
        let jj = j & 255;
        let kk = k & 255;
        let gi0 = self.p(ii + self.p(jj + self.p(kk))) % 12;
        let gi1 = self.p(ii + i1 + self.p(jj + j1 + self.p(kk + k1))) % 12;
        let gi2 = self.p(ii + i2 + self.p(jj + j2 + self.p(kk + k2))) % 12;
        let gi3 = self.p(ii + 1 + self.p(jj + 1 + self.p(kk + 1))) % 12;

        let n0 = corner_noise(gi0, x0, y0, z0, 0.6);
        let n1 = corner_noise(gi1, x1, y1, z1, 0.6);
        let n2 = corner_noise(gi2, x2, y2, z2, 0.6);
        let n3 = corner_noise(gi3, x3, y3, z3, 0.6);
        32.0 * (n0 + n1 + n2 + n3)
    }
}

/// Kernel `max(0, base - r²)⁴` times the gradient dot product.
#[inline]
fn corner_noise(index: i32, x: f64, y: f64, z: f64, base: f64) -> f64 {
    let t = base - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let g = &GRADIENT[index as usize];
        t2 * t2 * (f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z)
    }
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
mod tests {
    use super::*;
    use crate::noise::ImprovedNoise;
    use crate::random::legacy_random::LegacyRandom;
    use crate::random::xoroshiro::Xoroshiro;

    #[test]
    fn test_deterministic() {
        let a = SimplexNoise::new(&mut LegacyRandom::from_seed(31));
        let b = SimplexNoise::new(&mut LegacyRandom::from_seed(31));
        for i in 0..32 {
            let x = f64::from(i) * 0.7;
            let y = f64::from(i) * -1.3;
            assert_eq!(a.get_value_2d(x, y).to_bits(), b.get_value_2d(x, y).to_bits());
            assert_eq!(
                a.get_value(x, y, 2.0 * x).to_bits(),
                b.get_value(x, y, 2.0 * x).to_bits()
            );
        }
    }

    #[test]
    fn test_skew_constants() {
        assert_eq!(F2.to_bits(), (0.5 * (3.0_f64.sqrt() - 1.0)).to_bits());
        assert_eq!(G2.to_bits(), ((3.0 - 3.0_f64.sqrt()) / 6.0).to_bits());
    }

    #[test]
    fn test_known_values() {
        let noise = SimplexNoise::new(&mut Xoroshiro::from_seed(12345));
        assert!((noise.get_value_2d(0.5, 1.5) - 0.43912704786429363).abs() < 1e-12);
        assert!((noise.get_value_2d(10.3, -7.7) + 0.007784816686595872).abs() < 1e-12);
        assert!((noise.get_value(0.5, 1.5, -2.25) + 0.15127237654320982).abs() < 1e-12);
    }

    #[test]
    fn test_table_is_doubled() {
        let noise = SimplexNoise::new(&mut Xoroshiro::from_seed(4));
        assert_eq!(noise.p[..256], noise.p[256..]);
    }

    #[test]
    fn test_draws_match_gradient_noise() {
        // Both generators consume the stream identically.
        let simplex = SimplexNoise::new(&mut Xoroshiro::from_seed(8));
        let gradient = ImprovedNoise::new(&mut Xoroshiro::from_seed(8));
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(simplex.xo, gradient.xo);
            assert_eq!(simplex.zo, gradient.zo);
        }
    }

    #[test]
    fn test_lattice_origin_is_zero() {
        // Every corner kernel vanishes or its offset is zero at the origin.
        let noise = SimplexNoise::new(&mut Xoroshiro::from_seed(1));
        assert!(noise.get_value_2d(0.0, 0.0).abs() < 1e-12);
        assert!(noise.get_value(0.0, 0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(&mut Xoroshiro::from_seed(77));
        let mut grid = Xoroshiro::from_seed(78);
        for _ in 0..5000 {
            let x = (grid.next_f64() - 0.5) * 1000.0;
            let y = (grid.next_f64() - 0.5) * 1000.0;
            let z = (grid.next_f64() - 0.5) * 1000.0;
            assert!(noise.get_value_2d(x, y).abs() < 1.1);
            assert!(noise.get_value(x, y, z).abs() < 1.1);
        }
    }
}
