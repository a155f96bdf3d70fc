//! Sizing for the texture atlas that holds every ring preset. Each preset is
//! baked once into its own triangle of the atlas. Triangles alternate between
//! pointing down and pointing up, so neighbors in a row interlock and each
//! additional column costs less than the first one.

use crate::util::npo2;
use log::debug;
use serde::{Deserialize, Serialize};

/// The pixel footprint of one ring preset within the atlas. Extents are
/// given as multiples of `radius`: the first column/row costs `first_*`
/// radii, every one after that costs `next_*` radii. Every slot also gets
/// `padding` pixels of border on each side.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingFootprint {
    pub radius: u32,
    pub padding: u32,
    pub first_width: f64,
    pub next_width: f64,
    pub first_height: f64,
    pub next_height: f64,
}

impl RingFootprint {
    /// Height of a hex's flat side from its center, as a fraction of its
    /// radius
    pub const HEX_HEIGHT_SCALE: f64 = 0.866_025_403_784_438_6; // sqrt(3)/2

    /// A hex of radius 72 baked into a triangle that fully encloses it. The
    /// triangle is 3 radii wide, and each interlocking triangle after it
    /// adds another 1.5.
    pub const HEX_TRIANGLE: Self = Self {
        radius: 72,
        padding: 2,
        first_width: 3.0,
        next_width: 1.5,
        first_height: 4.0 * Self::HEX_HEIGHT_SCALE,
        next_height: 3.0 * Self::HEX_HEIGHT_SCALE,
    };

    /// Pixel width of `cols` columns of slots, including padding
    pub fn width(&self, cols: u32) -> u32 {
        Self::extent(cols, self.first_width, self.next_width, self)
    }

    /// Pixel height of `rows` rows of slots, including padding
    pub fn height(&self, rows: u32) -> u32 {
        Self::extent(rows, self.first_height, self.next_height, self)
    }

    fn extent(count: u32, first: f64, next: f64, footprint: &Self) -> u32 {
        if count == 0 {
            return footprint.padding;
        }
        let radii = (first + next * (count - 1) as f64).ceil() as u32;
        radii * footprint.radius + footprint.padding * (count + 1)
    }

    /// Total texture area for a `rows × cols` atlas, after rounding each
    /// side up to a power of two
    pub fn area(&self, rows: u32, cols: u32) -> u64 {
        let (width, height) = self.texture_size(rows, cols);
        width as u64 * height as u64
    }

    /// Texture dimensions for a `rows × cols` atlas: `(width, height)`
    pub fn texture_size(&self, rows: u32, cols: u32) -> (u32, u32) {
        (
            npo2(self.width(cols) + self.padding),
            npo2(self.height(rows) + self.padding),
        )
    }
}

/// The chosen arrangement of ring presets within the atlas texture
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasLayout {
    pub rows: u32,
    pub cols: u32,
    /// Texture width in pixels, always a power of two
    pub width: u32,
    /// Texture height in pixels, always a power of two
    pub height: u32,
}

/// Where a single ring preset lives in the atlas
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasSlot {
    pub row: u32,
    pub col: u32,
    /// Top-left pixel of the triangle that encloses this preset
    pub x: u32,
    pub y: u32,
    /// Odd columns hold up-pointing triangles so they interlock with their
    /// down-pointing neighbors
    pub points_up: bool,
}

impl AtlasLayout {
    /// Pick the smallest acceptable atlas that holds `count` presets of the
    /// given footprint. Starting from one row of two, the layout grows a
    /// column or a row at a time, whichever yields the smaller power-of-two
    /// texture. On a tie the more nearly square arrangement wins.
    ///
    /// Dimensions only ever grow, so the area for `count + 1` presets is
    /// never smaller than the area for `count`.
    pub fn compute(count: usize, footprint: &RingFootprint) -> Self {
        let mut rows: u32 = 1;
        let mut cols: u32 = 2;
        for n in 2..=count as u32 {
            if n <= rows * cols {
                continue;
            }
            let mut add_col = footprint.area(rows, cols + 1);
            let mut add_row = footprint.area(rows + 1, cols);
            if add_row == add_col {
                if rows as f64 * RingFootprint::HEX_HEIGHT_SCALE > cols as f64 {
                    add_row += 1;
                } else {
                    add_col += 1;
                }
            }
            if add_row >= add_col {
                cols += 1;
            } else {
                rows += 1;
            }
        }

        let (width, height) = footprint.texture_size(rows, cols);
        debug!(
            "Atlas for {} presets: {}x{} slots in {}x{} texture",
            count, cols, rows, width, height
        );
        Self {
            rows,
            cols,
            width,
            height,
        }
    }

    pub fn capacity(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Locate preset `index` within the atlas. Presets fill rows left to
    /// right, top to bottom. Returns `None` if the atlas can't hold that
    /// many presets.
    pub fn slot(
        &self,
        index: usize,
        footprint: &RingFootprint,
    ) -> Option<AtlasSlot> {
        if index >= self.capacity() {
            return None;
        }
        let index = index as u32;
        let (row, col) = (index / self.cols, index % self.cols);
        // Each column steps over by half a triangle plus its padding, each
        // row by a full triangle's height plus padding
        let col_step = (footprint.next_width * footprint.radius as f64) as u32
            + footprint.padding;
        let row_step = (footprint.next_height * footprint.radius as f64)
            as u32
            + footprint.padding;
        Some(AtlasSlot {
            row,
            col,
            x: col_step * col + footprint.padding,
            y: row_step * row + footprint.padding,
            points_up: col % 2 == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: RingFootprint = RingFootprint::HEX_TRIANGLE;

    #[test]
    fn test_hex_extents() {
        assert_eq!(HEX.width(0), 2);
        assert_eq!(HEX.width(1), 220);
        assert_eq!(HEX.width(2), 366);
        assert_eq!(HEX.width(3), 440);
        assert_eq!(HEX.height(1), 292);
        assert_eq!(HEX.height(2), 510);
        assert_eq!(HEX.height(3), 656);
    }

    #[test]
    fn test_six_hex_presets() {
        let layout = AtlasLayout::compute(6, &HEX);
        assert_eq!((layout.rows, layout.cols), (2, 3));
        assert_eq!((layout.width, layout.height), (512, 512));
        assert!(layout.capacity() >= 6);
    }

    #[test]
    fn test_small_counts_use_initial_layout() {
        for count in 0..=2 {
            let layout = AtlasLayout::compute(count, &HEX);
            assert_eq!((layout.rows, layout.cols), (1, 2));
        }
    }

    #[test]
    fn test_tie_prefers_square() {
        // Going from 1x2 to fit 3: both options are 512x512, so we add a row
        // rather than making the atlas even wider
        let layout = AtlasLayout::compute(3, &HEX);
        assert_eq!((layout.rows, layout.cols), (2, 2));
    }

    #[test]
    fn test_slots() {
        let layout = AtlasLayout::compute(6, &HEX);
        let first = layout.slot(0, &HEX).unwrap();
        assert_eq!((first.x, first.y, first.points_up), (2, 2, false));
        let second = layout.slot(1, &HEX).unwrap();
        assert_eq!((second.row, second.col, second.x), (0, 1, 112));
        assert!(second.points_up);
        let fourth = layout.slot(3, &HEX).unwrap();
        assert_eq!((fourth.row, fourth.col), (1, 0));
        assert!(layout.slot(6, &HEX).is_none());
    }
}
