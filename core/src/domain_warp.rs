use crate::error::{Result, TopoError};
use crate::fbm::Fbm;
use crate::noise::NoiseSource;

// Warp field frequencies: slow relative to the final field,
// with y at half the x frequency to stretch features vertically.
const WARP_FREQ_X: f64 = 0.003;
const WARP_FREQ_Y: f64 = 0.0015;

// Offsets into noise space; distinct per channel so dx and dy decorrelate
const WARP_DX_OFFSET: (f64, f64) = (5.2, 1.3);
const WARP_DY_OFFSET: (f64, f64) = (9.8, 2.7);

// Final field frequencies (portrait-axis bias)
const FIELD_FREQ_X: f64 = 0.004;
const FIELD_FREQ_Y: f64 = 0.002;

/// Height field in pixel space: fbm sampled at domain-warped coordinates.
pub struct DomainWarp2D<N> {
    fbm: Fbm<N>,
    warp_amount: f64, // maximum displacement in pixels
}

impl<N: NoiseSource> DomainWarp2D<N> {
    pub fn new(fbm: Fbm<N>, warp_amount: f64) -> Result<Self> {
        if !warp_amount.is_finite() || warp_amount < 0.0 {
            return Err(TopoError::invalid(
                "warp_amount",
                format!("must be finite and non-negative, got {}", warp_amount),
            ));
        }
        Ok(Self { fbm, warp_amount })
    }

    /// Displacement (dx, dy) applied to the sample point (wx, wy)
    pub fn offset(&self, wx: f64, wy: f64) -> (f64, f64) {
        let channel = |(ox, oy): (f64, f64)| {
            let v = self.fbm.get2(wx * WARP_FREQ_X + ox, wy * WARP_FREQ_Y + oy);
            (v - 0.5) * 2.0 * self.warp_amount
        };
        (channel(WARP_DX_OFFSET), channel(WARP_DY_OFFSET))
    }

    /// Height at pixel (wx, wy). Not clamped: warping may push slightly outside [0, 1].
    pub fn height_at(&self, wx: f64, wy: f64) -> f64 {
        let (dx, dy) = self.offset(wx, wy);
        self.fbm.get2((wx + dx) * FIELD_FREQ_X, (wy + dy) * FIELD_FREQ_Y)
    }
}
