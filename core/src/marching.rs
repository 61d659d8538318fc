//! Marching squares over a [`HeightGrid`].
//!
//! Each 2×2 cell is classified by a 4-bit mask of which corners lie strictly
//! above the iso-value (top-left = 8, top-right = 4, bottom-right = 2,
//! bottom-left = 1). Masks 0 and 15 produce nothing. Every other mask joins
//! interpolated crossing points on the cell edges, one segment per pair listed
//! in the case table.
//!
//! Saddle masks 5 and 10 always emit two disjoint segments using a fixed
//! pairing and never sample the cell centre. For true saddle points this may
//! pick the topologically "wrong" connection; the result is an accepted
//! approximation.

use crate::grid::HeightGrid;

/// Edges whose values differ by less than this are treated as flat
pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line to draw, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom as B, Left as L, Right as R, Top as T};

// Edge pairs joined for each mask
const CASES: [&[(Edge, Edge)]; 16] = [
    &[],               // 0
    &[(L, B)],         // 1
    &[(B, R)],         // 2
    &[(L, R)],         // 3
    &[(T, R)],         // 4
    &[(T, R), (L, B)], // 5 saddle
    &[(T, B)],         // 6
    &[(T, L)],         // 7
    &[(T, L)],         // 8
    &[(T, B)],         // 9
    &[(T, L), (R, B)], // 10 saddle
    &[(T, R)],         // 11
    &[(L, R)],         // 12
    &[(R, B)],         // 13
    &[(L, B)],         // 14
    &[],               // 15
];

/// Edge pairs joined for `mask` (only the low 4 bits are used).
pub fn case_edges(mask: u8) -> &'static [(Edge, Edge)] {
    CASES[(mask & 0xF) as usize]
}

pub fn is_saddle(mask: u8) -> bool {
    mask == 5 || mask == 10
}

/// Corner classification. A corner equal to `iso` counts as below.
pub fn cell_mask(tl: f64, tr: f64, br: f64, bl: f64, iso: f64) -> u8 {
    (u8::from(tl > iso) << 3)
        | (u8::from(tr > iso) << 2)
        | (u8::from(br > iso) << 1)
        | u8::from(bl > iso)
}

/// Position of `iso` along an edge from `v0` to `v1`, or `None` when the
/// edge is flat. Not clamped.
pub fn edge_parameter(v0: f64, v1: f64, iso: f64) -> Option<f64> {
    if (v1 - v0).abs() < EPSILON {
        None
    } else {
        Some((iso - v0) / (v1 - v0))
    }
}

/// Crossing point of `iso` on the edge `a → b` with end values `v0`, `v1`.
/// Flat edges return the midpoint.
pub fn interp_edge(v0: f64, v1: f64, a: Point, b: Point, iso: f64) -> Point {
    match edge_parameter(v0, v1, iso) {
        None => Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5),
        Some(t) => Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)),
    }
}

/// One grid cell: corner values and its pixel-space bounds.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub tl: f64,
    pub tr: f64,
    pub br: f64,
    pub bl: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Cell {
    /// Cell whose top-left corner is grid point `(r, c)`.
    pub fn at(grid: &HeightGrid, r: usize, c: usize) -> Self {
        Self {
            tl: grid.get(r, c) as f64,
            tr: grid.get(r, c + 1) as f64,
            br: grid.get(r + 1, c + 1) as f64,
            bl: grid.get(r + 1, c) as f64,
            x0: grid.x_at(c),
            y0: grid.y_at(r),
            x1: grid.x_at(c + 1),
            y1: grid.y_at(r + 1),
        }
    }

    pub fn mask(&self, iso: f64) -> u8 {
        cell_mask(self.tl, self.tr, self.br, self.bl, iso)
    }

    // End values and end points of an edge, in a fixed orientation
    // (left to right, top to bottom) so neighbouring cells agree.
    fn edge(&self, edge: Edge) -> (f64, f64, Point, Point) {
        let (tl, tr) = (Point::new(self.x0, self.y0), Point::new(self.x1, self.y0));
        let (bl, br) = (Point::new(self.x0, self.y1), Point::new(self.x1, self.y1));
        match edge {
            Edge::Top => (self.tl, self.tr, tl, tr),
            Edge::Right => (self.tr, self.br, tr, br),
            Edge::Bottom => (self.bl, self.br, bl, br),
            Edge::Left => (self.tl, self.bl, tl, bl),
        }
    }

    pub fn crossing(&self, edge: Edge, iso: f64) -> Point {
        let (v0, v1, a, b) = self.edge(edge);
        if let Some(t) = edge_parameter(v0, v1, iso) {
            debug_assert!(
                (0.0..=1.0).contains(&t),
                "crossing parameter {t} outside [0, 1] on {edge:?} edge"
            );
        }
        interp_edge(v0, v1, a, b, iso)
    }

    /// Segments this cell contributes for `iso`: none, one, or two for saddles.
    pub fn segments(self, iso: f64) -> impl Iterator<Item = Segment> {
        case_edges(self.mask(iso)).iter().map(move |&(a, b)| Segment {
            start: self.crossing(a, iso),
            end: self.crossing(b, iso),
        })
    }
}

/// Segments of `grid` for one iso-value.
///
/// The iterator is lazy and borrows the grid; calling again yields the same
/// segments in the same order (row by row, left to right).
pub fn contour(grid: &HeightGrid, iso: f64) -> impl Iterator<Item = Segment> + '_ {
    let rows = grid.rows().saturating_sub(1);
    let cols = grid.cols().saturating_sub(1);
    (0..rows)
        .flat_map(move |r| (0..cols).map(move |c| Cell::at(grid, r, c)))
        .flat_map(move |cell| cell.segments(iso))
}
