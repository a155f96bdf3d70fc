use crate::util::wrap_angle;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// An index into a [Palette](crate::Palette). A paint doesn't know which
/// palette it belongs to, so anything that steps through paints needs the
/// palette length.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct Paint(pub u8);

impl Paint {
    /// Step `n` paints forward, wrapping at the end of the palette
    pub fn inc(self, n: u32, palette_len: usize) -> Self {
        let len = palette_len.max(1) as u32;
        Self(((self.0 as u32 + n) % len) as u8)
    }
}

/// The payload scenes keep in each lattice cell. Its color is a [Paint]
/// resolved through the scene's palette; the remaining fields control how the
/// cell is drawn. A scale of `1.0` means neighboring cells touch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub paint: Paint,
    pub alpha: f32,
    pub theta: f32,
    pub scale: f32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            paint: Paint::default(),
            alpha: 1.0,
            theta: 0.0,
            scale: 1.0,
        }
    }
}

impl Cell {
    /// Adjust alpha by `delta`, clamped to `[0, 1]`
    pub fn inc_alpha(&mut self, delta: f32) {
        self.alpha = (self.alpha + delta).clamp(0.0, 1.0);
    }

    /// Adjust rotation by `delta` radians, keeping it within one turn
    pub fn inc_theta(&mut self, delta: f32) {
        self.theta = wrap_angle(self.theta + delta);
    }

    pub fn inc_paint(&mut self, n: u32, palette_len: usize) -> Paint {
        self.paint = self.paint.inc(n, palette_len);
        self.paint
    }
}
