//! Anti-aliased raster output for the contour pass.
//!
//! Black strokes on a white page. Each level is collected into a single path
//! and stroked once when the level ends.

use image::RgbImage;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::ContourConfig;
use crate::error::{Result, TopoError};
use crate::grid::GridState;
use crate::marching::Segment;
use crate::render::{IsoLevel, Renderer, draw_contours};

/// White `config.width × config.height` page; stroke widths come from `config`.
pub struct RasterCanvas {
    pixmap: Pixmap,
    config: ContourConfig,
    path: PathBuilder,
}

impl RasterCanvas {
    pub fn new(config: &ContourConfig) -> Result<Self> {
        let (width, height) = (config.width, config.height);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            TopoError::Canvas(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(Color::WHITE);
        Ok(Self {
            pixmap,
            config: config.clone(),
            path: PathBuilder::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Copy out as opaque RGB.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let bytes: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();
        RgbImage::from_raw(self.width(), self.height(), bytes)
            .ok_or_else(|| TopoError::Canvas("pixel buffer size mismatch".into()))
    }
}

impl Renderer for RasterCanvas {
    fn begin_level(&mut self, _level: &IsoLevel) {
        self.path = PathBuilder::new();
    }

    fn line(&mut self, segment: &Segment) {
        self.path.move_to(segment.start.x as f32, segment.start.y as f32);
        self.path.line_to(segment.end.x as f32, segment.end.y as f32);
    }

    fn end_level(&mut self, level: &IsoLevel) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        // finish() yields None for a level without segments
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: level.weight.width(&self.config),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Draw every contour level of `state` onto a fresh canvas.
///
/// Fails with [`TopoError::InvalidConfig`] before allocating if `config` is invalid.
pub fn render_image(state: &GridState, config: &ContourConfig) -> Result<RgbImage> {
    config.validate()?;
    let mut canvas = RasterCanvas::new(config)?;
    draw_contours(state, config, &mut canvas)?;
    canvas.to_rgb_image()
}
