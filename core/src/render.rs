//! Iso-levels and the contour pass that feeds a [`Renderer`].

use tracing::debug;

use crate::config::ContourConfig;
use crate::error::Result;
use crate::grid::GridState;
use crate::marching::{Segment, contour};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeWeight {
    Major,
    Minor,
}

impl StrokeWeight {
    /// Stroke width in pixels.
    pub fn width(self, config: &ContourConfig) -> f32 {
        match self {
            StrokeWeight::Major => config.major_stroke,
            StrokeWeight::Minor => config.minor_stroke,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoLevel {
    pub index: u32,
    pub value: f64,
    pub weight: StrokeWeight,
}

impl IsoLevel {
    // Level `index` of `config.num_levels`, spread linearly over
    // [iso_min, iso_max); every `major_every`-th level is major.
    // Expects a validated config (non-zero num_levels and major_every).
    pub(crate) fn new(index: u32, config: &ContourConfig) -> Self {
        let (lo, hi) = config.iso_range;
        let value = lo + (hi - lo) * index as f64 / config.num_levels as f64;
        let weight = if index % config.major_every == 0 {
            StrokeWeight::Major
        } else {
            StrokeWeight::Minor
        };
        Self {
            index,
            value,
            weight,
        }
    }
}

/// All levels in increasing order. Fails if `config` does not validate.
pub fn iso_levels(config: &ContourConfig) -> Result<impl Iterator<Item = IsoLevel> + '_> {
    config.validate()?;
    Ok((0..config.num_levels).map(move |i| IsoLevel::new(i, config)))
}

/// Drawing surface the contour pass writes into.
pub trait Renderer {
    fn begin_level(&mut self, level: &IsoLevel);
    fn line(&mut self, segment: &Segment);
    fn end_level(&mut self, _level: &IsoLevel) {}
}

/// Run marching squares for every level in increasing order and hand the
/// segments to `renderer`. Returns the total segment count.
///
/// `config` is validated before anything is drawn.
pub fn draw_contours<R: Renderer + ?Sized>(
    state: &GridState,
    config: &ContourConfig,
    renderer: &mut R,
) -> Result<usize> {
    let mut total = 0;
    for level in iso_levels(config)? {
        renderer.begin_level(&level);
        let mut count = 0;
        for segment in contour(&state.grid, level.value) {
            renderer.line(&segment);
            count += 1;
        }
        renderer.end_level(&level);
        debug!(level = level.index, iso = level.value, segments = count, "contour level");
        total += count;
    }
    Ok(total)
}

/// Renderer that keeps every segment, grouped by level.
#[derive(Debug, Default)]
pub struct SegmentBuffer {
    pub levels: Vec<(IsoLevel, Vec<Segment>)>,
}

impl SegmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment_count(&self) -> usize {
        self.levels.iter().map(|(_, segs)| segs.len()).sum()
    }
}

impl Renderer for SegmentBuffer {
    fn begin_level(&mut self, level: &IsoLevel) {
        self.levels.push((*level, Vec::new()));
    }

    fn line(&mut self, segment: &Segment) {
        if let Some((_, segs)) = self.levels.last_mut() {
            segs.push(*segment);
        }
    }
}
