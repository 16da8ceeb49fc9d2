//! Seeded 2D gradient noise
//!
//! Classic Perlin-style lattice noise: hash the four surrounding lattice
//! corners through a permutation table, dot their gradients with the offset
//! to the sample point and blend with the quintic fade curve. Motion only
//! needs a 1D slice, so [`NoiseField::value`] samples along y = 0.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

/// Gradient directions (the z component is unused in 2D)
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Quintic smoothstep: 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[inline]
fn dot2(g: &[f64; 3], x: f64, y: f64) -> f64 {
    g[0] * x + g[1] * y
}

/// Deterministic noise field built from a seed
#[derive(Debug, Clone)]
pub struct NoiseField {
    /// 256-entry permutation mirrored to 512 so corner lookups never wrap
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        p.shuffle(&mut Pcg32::seed_from_u64(seed));

        let perm = std::array::from_fn(|i| p[i & 255]);
        Self { perm }
    }

    /// 1D noise in [-1, 1]
    #[inline]
    pub fn value(&self, x: f64) -> f64 {
        self.sample(x, 0.0)
    }

    /// 2D noise in [-1, 1]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (xf, yf) = (x.floor(), y.floor());
        let (x, y) = (x - xf, y - yf);
        // Wrap the lattice to the table size
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let perm = &self.perm;
        let corner = |dx: usize, dy: usize| -> &'static [f64; 3] {
            let h = perm[xi + dx + perm[yi + dy] as usize] as usize;
            &GRAD3[h % 12]
        };

        let n00 = dot2(corner(0, 0), x, y);
        let n01 = dot2(corner(0, 1), x, y - 1.0);
        let n10 = dot2(corner(1, 0), x - 1.0, y);
        let n11 = dot2(corner(1, 1), x - 1.0, y - 1.0);

        let u = fade(x);
        lerp(lerp(n00, n10, u), lerp(n01, n11, u), fade(y)).clamp(-1.0, 1.0)
    }
}
