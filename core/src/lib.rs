// topo builds seeded contour maps: a domain-warped fbm height grid,
// marching squares over it, and raster / BMP output
pub mod bmp;
pub mod config;
pub mod domain_warp;
pub mod error;
pub mod fbm;
pub mod grid;
pub mod marching;
pub mod noise;
pub mod raster;
pub mod render;

pub use config::ContourConfig;
pub use domain_warp::DomainWarp2D;
pub use error::{Result, TopoError};
pub use fbm::Fbm;
pub use grid::{
    GridState, HeightGrid, build_grid, generate, generate_with, grid_dims, random_seed,
};
pub use marching::{Point, Segment, contour, interp_edge};
pub use noise::{NoiseSource, Perlin2D, SeedableNoise};
pub use raster::{RasterCanvas, render_image};
pub use render::{IsoLevel, Renderer, SegmentBuffer, StrokeWeight, draw_contours, iso_levels};
