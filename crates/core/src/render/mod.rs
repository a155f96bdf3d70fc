#[cfg(feature = "svg")]
pub mod svg;

use crate::{
    atlas::{AtlasLayout, AtlasSlot, RingFootprint},
    lattice::cell::Paint,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::ops;
use validator::Validate;

/// One band of a ring preset. Bands are drawn as opaque hexes from the
/// outside in, so each band's shade covers everything inside its radius
/// until the next band is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingBand {
    /// Fraction of the full hex radius, in `(0, 1]`
    pub radius: f32,
    /// Brightness, 0 is black and 255 is full brightness
    pub value: u8,
}

const fn band(radius: f32, value: u8) -> RingBand {
    RingBand { radius, value }
}

/// The pre-baked hex appearances a render variant can select from
pub const HEX_RING_PRESETS: &[&[RingBand]] = &[
    &[band(1.0, 255)],
    &[band(1.0, 192), band(0.875, 220)],
    &[
        band(1.0, 220),
        band(0.875, 0),
        band(0.75, 128),
        band(0.625, 96),
    ],
    &[band(1.0, 128)],
    &[band(1.0, 192), band(0.875, 220)],
    &[
        band(1.0, 220),
        band(0.875, 192),
        band(0.75, 128),
        band(0.625, 96),
    ],
];

/// Everything about the host rendering surface that lattices need to know at
/// construction time. Build one of these up front and pass it to every
/// lattice constructor; nothing here is initialized lazily.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct RenderResources {
    /// The host surface's hard ceiling on indices in a single draw call.
    /// Lattices shrink themselves to stay under this.
    #[validate(range(min = 3))]
    max_indices: usize,
    footprint: RingFootprint,
    atlas: AtlasLayout,
}

impl RenderResources {
    /// Indices are 16-bit on the host surface, rounded down to a whole number
    /// of triangles
    pub const DEFAULT_MAX_INDICES: usize = (1 << 16) / 3 * 3;

    /// Set up resources for a surface with the given index ceiling. Returns
    /// an error if the ceiling can't even fit a single triangle.
    pub fn new(max_indices: usize) -> anyhow::Result<Self> {
        let footprint = RingFootprint::HEX_TRIANGLE;
        let atlas = AtlasLayout::compute(HEX_RING_PRESETS.len(), &footprint);
        let resources = Self {
            max_indices,
            footprint,
            atlas,
        };
        resources.validate()?;
        info!(
            "Ring atlas: {} presets in {}x{} slots ({}x{} px), max {} indices",
            HEX_RING_PRESETS.len(),
            atlas.cols,
            atlas.rows,
            atlas.width,
            atlas.height,
            max_indices
        );
        Ok(resources)
    }

    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    pub fn atlas(&self) -> &AtlasLayout {
        &self.atlas
    }

    /// Get the ring preset for a render variant. Variants past the end of
    /// the preset list wrap around.
    pub fn ring_preset(&self, render_variant: u8) -> &'static [RingBand] {
        HEX_RING_PRESETS[render_variant as usize % HEX_RING_PRESETS.len()]
    }

    /// Where the texture for a render variant lives in the atlas. Variants
    /// wrap the same way as [Self::ring_preset].
    pub fn ring_slot(&self, render_variant: u8) -> Option<AtlasSlot> {
        let index = render_variant as usize % HEX_RING_PRESETS.len();
        self.atlas.slot(index, &self.footprint)
    }
}

impl Default for RenderResources {
    fn default() -> Self {
        let footprint = RingFootprint::HEX_TRIANGLE;
        Self {
            max_indices: Self::DEFAULT_MAX_INDICES,
            footprint,
            atlas: AtlasLayout::compute(HEX_RING_PRESETS.len(), &footprint),
        }
    }
}

/// An RGB color. Values are stored as floats between 0 and 1 (inclusive).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color3 {
    /// Create a new RGB color from integer components in the [0,255] range.
    pub const fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Convert this color to a set of 3 bytes: `(red, green, blue)`
    pub fn to_ints(self) -> (u8, u8, u8) {
        (
            (self.red * 255.0) as u8,
            (self.green * 255.0) as u8,
            (self.blue * 255.0) as u8,
        )
    }

    /// Convert this color to an HTML color code: `#rrggbb`
    pub fn to_html(self) -> String {
        let (r, g, b) = self.to_ints();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

// Scale a color by a constant
impl ops::Mul<f32> for Color3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            red: (self.red * rhs).clamp(0.0, 1.0),
            green: (self.green * rhs).clamp(0.0, 1.0),
            blue: (self.blue * rhs).clamp(0.0, 1.0),
        }
    }
}

/// A fixed, ordered set of colors that [Paint]s index into
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    name: &'static str,
    colors: &'static [Color3],
}

impl Palette {
    pub const RAINBOW: Self = Self {
        name: "rainbow",
        colors: &[
            Color3::new_int(255, 0, 0),
            Color3::new_int(240, 90, 0),
            Color3::new_int(220, 220, 0),
            Color3::new_int(0, 200, 0),
            Color3::new_int(0, 0, 255),
            Color3::new_int(180, 0, 200),
        ],
    };

    pub const ALL: &'static [Self] = &[Self::RAINBOW];

    /// Look up a built-in palette by name
    pub fn named(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|palette| palette.name == name).cloned()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Resolve a paint to its color. Paints past the end wrap around.
    pub fn color(&self, paint: Paint) -> Color3 {
        self.colors[paint.0 as usize % self.colors.len()]
    }
}
