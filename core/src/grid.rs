use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::config::ContourConfig;
use crate::domain_warp::DomainWarp2D;
use crate::error::{Result, TopoError};
use crate::fbm::Fbm;
use crate::noise::{NoiseSource, Perlin2D, SeedableNoise};

/// Seeds drawn by `random_seed` fall in [0, SEED_RANGE)
pub const SEED_RANGE: u64 = 100_000;

/// Height samples on a regular lattice, stored row-major.
///
/// Cell `(r, c)` sits at pixel `(c * stride, r * stride)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    rows: usize,
    cols: usize,
    stride: u32,
    values: Vec<f32>,
}

impl HeightGrid {
    /// Build a grid by evaluating `f(r, c)` for every lattice point.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        stride: u32,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(TopoError::invalid("grid", "grid needs at least one row and column"));
        }
        if stride == 0 {
            return Err(TopoError::invalid("stride", "must be positive"));
        }
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                values.push(f(r, c));
            }
        }
        Ok(Self {
            rows,
            cols,
            stride,
            values,
        })
    }

    /// Build a grid from explicit rows; every row must have the same length.
    pub fn from_rows(stride: u32, rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(TopoError::invalid("grid", "rows must all have the same length"));
        }
        Self::from_fn(rows.len(), cols, stride, |r, c| rows[r][c])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.values[r * self.cols + c]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Pixel x of lattice column `c`.
    #[inline]
    pub fn x_at(&self, c: usize) -> f64 {
        (c as u64 * self.stride as u64) as f64
    }

    /// Pixel y of lattice row `r`.
    #[inline]
    pub fn y_at(&self, r: usize) -> f64 {
        (r as u64 * self.stride as u64) as f64
    }
}

/// Lattice size `(rows, cols)` covering a `width × height` canvas:
/// `height / stride + 1` rows and `width / stride + 1` columns.
pub fn grid_dims(width: u32, height: u32, stride: u32) -> Result<(usize, usize)> {
    if stride == 0 {
        return Err(TopoError::invalid("stride", "must be positive"));
    }
    Ok(((height / stride) as usize + 1, (width / stride) as usize + 1))
}

/// Sample `field` every `stride` pixels over a `width × height` canvas.
pub fn build_grid<N: NoiseSource>(
    field: &DomainWarp2D<N>,
    width: u32,
    height: u32,
    stride: u32,
) -> Result<HeightGrid> {
    let (rows, cols) = grid_dims(width, height, stride)?;
    debug!(rows, cols, stride, "sampling height grid");

    let s = stride as u64;
    HeightGrid::from_fn(rows, cols, stride, |r, c| {
        field.height_at((c as u64 * s) as f64, (r as u64 * s) as f64) as f32
    })
}

/// A seed and the grid generated from it. Regeneration produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub seed: u64,
    pub grid: HeightGrid,
}

/// Generate the height grid for `seed` using Perlin noise.
pub fn generate(config: &ContourConfig, seed: u64) -> Result<GridState> {
    generate_with::<Perlin2D>(config, seed)
}

/// Generate the height grid for `seed` with any seedable noise source.
pub fn generate_with<N: SeedableNoise>(config: &ContourConfig, seed: u64) -> Result<GridState> {
    config.validate()?;
    let start = Instant::now();

    let fbm = Fbm::new(
        N::from_seed(seed),
        config.octaves,
        config.lacunarity,
        config.persistence,
    )?;
    let field = DomainWarp2D::new(fbm, config.warp_amount)?;
    let grid = build_grid(&field, config.width, config.height, config.stride)?;

    info!(
        seed,
        rows = grid.rows(),
        cols = grid.cols(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "generated height grid"
    );
    Ok(GridState { seed, grid })
}

/// Pick a fresh seed in `[0, SEED_RANGE)`.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..SEED_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ContourConfig {
        ContourConfig {
            width: 64,
            height: 96,
            stride: 4,
            ..Default::default()
        }
    }

    #[test]
    fn grid_dimensions_follow_stride() {
        let state = generate(&small_config(), 1).unwrap();
        assert_eq!(state.grid.cols(), 17);
        assert_eq!(state.grid.rows(), 25);
        assert_eq!(state.grid.values().len(), 17 * 25);

        // Width not a multiple of stride rounds down
        let cfg = ContourConfig {
            width: 10,
            height: 10,
            stride: 4,
            ..Default::default()
        };
        let state = generate(&cfg, 1).unwrap();
        assert_eq!((state.grid.rows(), state.grid.cols()), (3, 3));
    }

    #[test]
    fn grid_determinism() {
        let a = generate(&small_config(), 4242).unwrap();
        let b = generate(&small_config(), 4242).unwrap();
        let bits = |g: &GridState| g.grid.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn different_seeds_give_different_grids() {
        let a = generate(&small_config(), 1).unwrap();
        let b = generate(&small_config(), 2).unwrap();
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn cells_map_to_pixel_coordinates() {
        let cfg = small_config();
        let state = generate(&cfg, 77).unwrap();
        let fbm = Fbm::new(Perlin2D::new(77), cfg.octaves, cfg.lacunarity, cfg.persistence)
            .unwrap();
        let field = DomainWarp2D::new(fbm, cfg.warp_amount).unwrap();
        for &(r, c) in &[(0, 0), (3, 5), (24, 16)] {
            let expected = field.height_at(c as f64 * 4.0, r as f64 * 4.0) as f32;
            assert_eq!(state.grid.get(r, c).to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn invalid_config_fails_before_sampling() {
        let cfg = ContourConfig {
            octaves: 0,
            ..small_config()
        };
        assert!(matches!(
            generate(&cfg, 1),
            Err(TopoError::InvalidConfig { field: "octaves", .. })
        ));
    }

    #[test]
    fn grid_dims_rounds_down_and_rejects_zero_stride() {
        assert_eq!(grid_dims(480, 800, 4).unwrap(), (201, 121));
        assert_eq!(grid_dims(10, 10, 4).unwrap(), (3, 3));
        assert!(matches!(
            grid_dims(10, 10, 0),
            Err(TopoError::InvalidConfig { field: "stride", .. })
        ));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = HeightGrid::from_rows(1, vec![vec![0.0, 1.0], vec![0.5]]).unwrap_err();
        assert!(matches!(err, TopoError::InvalidConfig { field: "grid", .. }));
        assert!(HeightGrid::from_rows(1, vec![]).is_err());
    }

    #[test]
    fn random_seed_in_range() {
        for _ in 0..100 {
            assert!(random_seed() < SEED_RANGE);
        }
    }
}
