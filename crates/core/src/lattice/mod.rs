//! Integer cell addressing over wrapping 2D lattices.
//!
//! ## Coordinate Systems
//!
//! Every lattice is a `width × height` torus of cells. A [CellAddr] names a
//! cell and is always normalized into `[0, width) × [0, height)`. A [CellVec]
//! is a displacement between cells; adding one to an address wraps around
//! whichever edges it crosses.
//!
//! Cells also have a position on the canvas they're drawn onto, in pixel
//! space ([Point2]). Each lattice maps addresses to pixel centers
//! ([Grid::center_for]) and pixels back to addresses ([Grid::cell_at]). The
//! pixel mapping is **not** toroidal: a pixel outside the area the lattice
//! covers belongs to no cell.
//!
//! See [SquareLattice] and [HexLattice] for the details of each topology.

pub mod cell;
mod hex;
mod square;
mod store;
pub mod unit;

pub use hex::HexLattice;
pub use square::SquareLattice;

use crate::lattice::unit::{CellAddr, CellVec, Point2};
use rand::Rng;

/// The operations every lattice supports, regardless of topology. Code that
/// only needs these can be written once and run on either lattice.
///
/// Callbacks passed to traversal methods get a mutable reference to each
/// visited cell. That reference only lives for the duration of the callback.
pub trait Grid {
    /// The payload stored in each cell
    type Cell;

    /// Number of columns
    fn width(&self) -> i32;

    /// Number of rows
    fn height(&self) -> i32;

    /// Total number of cells
    fn len(&self) -> usize {
        (self.width() * self.height()) as usize
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the payload of a cell. Panics if the address isn't normalized.
    fn at(&self, addr: CellAddr) -> &Self::Cell;

    /// Mutably borrow the payload of a cell. Panics if the address isn't
    /// normalized.
    fn at_mut(&mut self, addr: CellAddr) -> &mut Self::Cell;

    /// Move an address by a vector, wrapping around the edges of the lattice.
    /// Also returns whether the move crossed an edge of the lattice. What
    /// counts as an edge depends on the topology, see each implementation.
    fn add_tracked(&self, addr: CellAddr, vec: CellVec) -> (CellAddr, bool);

    /// Move an address by a vector, wrapping around the edges of the lattice
    fn add(&self, addr: CellAddr, vec: CellVec) -> CellAddr {
        self.add_tracked(addr, vec).0
    }

    /// Run a function on every cell, exactly once each. The order is
    /// deterministic but has no meaning.
    fn iterate<F>(&mut self, f: F)
    where
        F: FnMut(CellAddr, &mut Self::Cell);

    /// Visit every cell whose lattice distance from `center` is in
    /// `[min, max]`, one ring at a time from the inside out. A `min` of 0
    /// includes `center` itself. The callback gets each cell's address and
    /// ring distance. Rings wrap around the lattice, so on a lattice too
    /// small for a ring, some cells are visited more than once.
    fn splash<F>(&mut self, center: CellAddr, min: usize, max: usize, f: F)
    where
        F: FnMut(CellAddr, usize, &mut Self::Cell);

    /// Visit the cells directly adjacent to `addr`
    fn neighbors<F>(&mut self, addr: CellAddr, mut f: F)
    where
        F: FnMut(CellAddr, &mut Self::Cell),
    {
        self.splash(addr, 1, 1, |addr, _, cell| f(addr, cell))
    }

    /// Pixel position of the center of a cell
    fn center_for(&self, addr: CellAddr) -> Point2;

    /// Find the cell that owns a pixel. Returns `None` if the pixel is
    /// outside the area the lattice covers.
    fn cell_at(&self, point: Point2) -> Option<CellAddr>;

    /// Vertices of a cell's outline relative to its center, clockwise on
    /// screen. Every cell in a lattice has the same outline.
    fn cell_outline(&self) -> Vec<Point2>;

    /// Number of indices the host surface needs to draw every cell
    fn index_count(&self) -> usize;

    /// The opaque appearance selector this lattice was built with
    fn render_variant(&self) -> u8;

    /// Pick a cell uniformly at random
    fn new_loc<R: Rng + ?Sized>(&self, rng: &mut R) -> CellAddr;
}
