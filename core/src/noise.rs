//! Seeded 2D noise sources sampled by the fbm layer.
//! Every source returns values in [0, 1] and is fully determined by its seed.

pub trait NoiseSource {
    /// Sample the noise at (x, y). Same source + same point => same value.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// A noise source that can be rebuilt from a seed before sampling begins.
pub trait SeedableNoise: NoiseSource {
    fn from_seed(seed: u64) -> Self;
}

/// Single-octave 2D gradient (Perlin) noise remapped to [0, 1].
#[derive(Clone)]
pub struct Perlin2D {
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin2D {
    pub fn new(seed: u64) -> Self {
        let mut p: Vec<u8> = (0..256).map(|i| i as u8).collect();
        // xorshift64, seeded away from zero
        let mut x = seed ^ 0xDEADBEEFCAFEBABE_u64;
        let mut rng = || {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        };
        // Fisher–Yates shuffle p[0..256]
        for i in (1..256).rev() {
            let j = (rng() % (i as u64 + 1)) as usize;
            p.swap(i, j);
        }
        // Duplicated so lookups of perm[a + b] never need a modulo
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Self { perm }
    }

    // Quintic fade 6t^5 − 15t^4 + 10t^3, zero first and second derivative at 0 and 1
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Dot product with one of 8 gradient directions picked by the low hash bits
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        match hash & 0x7 {
            0 => x + y,
            1 => -x + y,
            2 => x - y,
            3 => -x - y,
            4 => x,
            5 => -x,
            6 => y,
            _ => -y,
        }
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    // Raw noise at (x, y), roughly in [−1, 1]
    fn raw(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(x1, x2, v)
    }
}

impl NoiseSource for Perlin2D {
    fn sample(&self, x: f64, y: f64) -> f64 {
        ((self.raw(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl SeedableNoise for Perlin2D {
    fn from_seed(seed: u64) -> Self {
        Perlin2D::new(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoiseSource, Perlin2D, SeedableNoise};

    #[test]
    fn perlin2_determinism() {
        let p1 = Perlin2D::new(1234);
        let p2 = Perlin2D::from_seed(1234);
        // Same seed ⇒ same output
        for &(x, y) in &[(10.5, -3.7), (0.25, 0.75), (311.9, 42.1)] {
            assert_eq!(p1.sample(x, y).to_bits(), p2.sample(x, y).to_bits());
        }
    }

    #[test]
    fn perlin2_seeds_differ() {
        let a = Perlin2D::new(1);
        let b = Perlin2D::new(2);
        let differs = (0..64).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            let y = i as f64 * 0.23 + 0.4;
            a.sample(x, y) != b.sample(x, y)
        });
        assert!(differs);
    }

    #[test]
    // Stays within [0.0, 1.0]
    fn perlin2_range() {
        let p = Perlin2D::new(0);
        for i in 0..2000 {
            let x = i as f64 * 0.731 - 400.0;
            let y = i as f64 * 0.419 + 17.0;
            let v = p.sample(x, y);
            assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
        }
    }

    #[test]
    fn perlin2_lattice_points_are_midrange() {
        // Gradient noise vanishes on integer lattice points
        let p = Perlin2D::new(99);
        assert_eq!(p.sample(3.0, 7.0), 0.5);
        assert_eq!(p.sample(-12.0, 0.0), 0.5);
    }

    #[test]
    fn perlin2_is_continuous() {
        let p = Perlin2D::new(7);
        let a = p.sample(1.5, 2.5);
        let b = p.sample(1.5 + 1e-6, 2.5);
        assert!((a - b).abs() < 1e-4);
    }
}
