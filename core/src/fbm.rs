use crate::error::{Result, TopoError};
use crate::noise::NoiseSource;

/// Fractal Brownian motion over any noise source.
///
/// Sums `octaves` layers with amplitude starting at 0.5 and frequency at 1,
/// then divides by the summed amplitudes so the output stays in the noise's
/// native [0, 1] range whatever the octave count or persistence.
pub struct Fbm<N> {
    noise: N,
    octaves: u32,
    lacunarity: f64, // frequency multiplier per octave
    persistence: f64, // amplitude multiplier per octave
}

impl<N: NoiseSource> Fbm<N> {
    /// Fails on zero octaves or a non-positive multiplier, which would turn
    /// every sample into NaN or a constant.
    pub fn new(noise: N, octaves: u32, lacunarity: f64, persistence: f64) -> Result<Self> {
        if octaves == 0 {
            return Err(TopoError::invalid("octaves", "at least one octave is required"));
        }
        for (field, value) in [("lacunarity", lacunarity), ("persistence", persistence)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TopoError::invalid(
                    field,
                    format!("must be finite and positive, got {}", value),
                ));
            }
        }
        Ok(Self {
            noise,
            octaves,
            lacunarity,
            persistence,
        })
    }

    /// Normalised fbm value at (x, y), in [0, 1] for a [0, 1] noise source.
    pub fn get2(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 0.5;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..self.octaves {
            value += amplitude * self.noise.sample(x * frequency, y * frequency);
            norm += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        value / norm
    }
}

#[cfg(test)]
mod tests {
    use super::Fbm;
    use crate::error::TopoError;
    use crate::noise::{NoiseSource, Perlin2D};

    struct Constant(f64);

    impl NoiseSource for Constant {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    // Steps from 0 to 1 once x passes 1.5
    struct Probe;

    impl NoiseSource for Probe {
        fn sample(&self, x: f64, _y: f64) -> f64 {
            if x > 1.5 { 1.0 } else { 0.0 }
        }
    }

    #[test]
    fn normalization_keeps_constant_noise_unchanged() {
        for octaves in 1..=8 {
            for &persistence in &[0.2, 0.4, 0.5, 0.9, 1.3] {
                let f = Fbm::new(Constant(0.7), octaves, 2.0, persistence).unwrap();
                let v = f.get2(12.0, 34.0);
                assert!((v - 0.7).abs() < 1e-12, "octaves {octaves} persistence {persistence}: {v}");
            }
        }
    }

    #[test]
    fn weights_octaves_by_persistence() {
        // Octave 0 sees x = 1 (Probe -> 0), octave 1 sees x = 2 (Probe -> 1)
        let f = Fbm::new(Probe, 2, 2.0, 0.4).unwrap();
        let expected = (0.5 * 0.4) / (0.5 + 0.5 * 0.4);
        assert!((f.get2(1.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(matches!(
            Fbm::new(Constant(0.5), 0, 2.0, 0.4),
            Err(TopoError::InvalidConfig { field: "octaves", .. })
        ));
        assert!(matches!(
            Fbm::new(Constant(0.5), 3, 0.0, 0.4),
            Err(TopoError::InvalidConfig { field: "lacunarity", .. })
        ));
        assert!(matches!(
            Fbm::new(Constant(0.5), 3, 2.0, f64::NAN),
            Err(TopoError::InvalidConfig { field: "persistence", .. })
        ));
    }

    #[test]
    fn fbm_determinism_and_range() {
        let a = Fbm::new(Perlin2D::new(5), 3, 2.0, 0.4).unwrap();
        let b = Fbm::new(Perlin2D::new(5), 3, 2.0, 0.4).unwrap();
        for i in 0..500 {
            let x = i as f64 * 0.173;
            let y = i as f64 * 0.091 - 3.0;
            let v = a.get2(x, y);
            assert_eq!(v.to_bits(), b.get2(x, y).to_bits());
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
