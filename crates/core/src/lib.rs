//! Modus is a set of wrapping 2D lattices for cell-based animations. Every
//! lattice addresses its cells with integer coordinates on a torus, maps
//! cells to pixels on a canvas (and back), and can walk rings of cells at an
//! exact distance from any cell. Animations ("scenes") are written once
//! against the [Grid] trait and run on either topology.
//!
//! ```
//! use modus::{
//!     Cell, Grid, HexLattice, LatticeConfig, Point2, RenderResources,
//! };
//!
//! let resources = RenderResources::default();
//! let mut lattice = HexLattice::new(
//!     &LatticeConfig::default(),
//!     &resources,
//!     |_| Cell::default(),
//! )
//! .unwrap();
//!
//! // Brighten everything within two hexes of whatever's under the cursor
//! if let Some(addr) = lattice.cell_at(Point2::new(640.0, 480.0)) {
//!     lattice.splash(addr, 0, 2, |_, _, cell| cell.inc_alpha(0.1));
//! }
//! ```
//!
//! Nothing here draws to a screen. See [RenderResources] for what a host
//! surface needs to provide, and the `svg` feature for a debug renderer.

mod atlas;
mod config;
mod lattice;
mod render;
mod scene;
mod util;

pub use crate::{
    atlas::{AtlasLayout, AtlasSlot, RingFootprint},
    config::{LatticeConfig, LatticeKind, ModusConfig},
    lattice::{
        cell::{Cell, Paint},
        unit::{CellAddr, CellVec, HexDir, Point2},
        Grid, HexLattice, SquareLattice,
    },
    render::{Color3, Palette, RenderResources, RingBand, HEX_RING_PRESETS},
    scene::{run_ticks, Knight, KnightScene, Match3Scene, Scene, SceneKind},
    util::{npo2, wrap_angle},
};

#[cfg(feature = "svg")]
pub use crate::render::svg::lattice_to_svg;
