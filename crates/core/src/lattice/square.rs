use crate::{
    config::LatticeConfig,
    lattice::{
        store::CellStore,
        unit::{CellAddr, CellVec, Point2},
        Grid,
    },
    render::RenderResources,
};
use anyhow::{bail, Context};
use log::{debug, info, warn};
use rand::Rng;
use validator::Validate;

/// A wrapping grid of square cells. Ring distance is diamond (taxicab)
/// distance, so the cells at distance 1 are the four axis neighbors.
///
/// Cells are square with an integer pixel side, as large as possible while
/// fitting the requested number of cells across the canvas's wider axis. The
/// whole lattice is then centered on the canvas.
#[derive(Clone, Debug)]
pub struct SquareLattice<T> {
    store: CellStore<T>,
    /// Side length of each cell, in pixels
    cell_size: f32,
    /// Top-left corner of the lattice on the canvas
    origin: Point2,
    render_variant: u8,
}

impl<T> SquareLattice<T> {
    /// Two triangles per cell
    pub const INDICES_PER_CELL: usize = 6;

    /// Build a lattice fitted to the configured canvas, initializing each
    /// cell's payload from its address. If the requested column count would
    /// need more indices than the host surface allows, columns are dropped
    /// until it fits. Returns an error if the config is invalid or the canvas
    /// can't hold even a single row of cells.
    pub fn new(
        config: &LatticeConfig,
        resources: &RenderResources,
        initializer: impl FnMut(CellAddr) -> T,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid lattice config")?;

        let canvas_width = config.canvas_width as i32;
        let canvas_height = config.canvas_height as i32;
        let (long_side, short_side) = if canvas_width >= canvas_height {
            (canvas_width, canvas_height)
        } else {
            (canvas_height, canvas_width)
        };

        let mut across = config.columns as i32;
        let (cell_size, along) = loop {
            if across < 1 {
                bail!(
                    "{}x{} canvas can't fit a single row of squares",
                    canvas_width,
                    canvas_height
                );
            }
            let cell_size = long_side / across;
            if cell_size > 0 {
                let along = short_side / cell_size;
                if along < 1 {
                    bail!(
                        "{}x{} canvas is too narrow for {} squares across",
                        canvas_width,
                        canvas_height,
                        across
                    );
                }
                let indices =
                    (across * along) as usize * Self::INDICES_PER_CELL;
                if indices < resources.max_indices() {
                    break (cell_size, along);
                }
            }
            across -= 1;
        };
        if across != config.columns as i32 {
            warn!(
                "Requested {} squares across, reduced to {} to fit the surface",
                config.columns, across
            );
        }

        let (width, height) = if canvas_width >= canvas_height {
            (across, along)
        } else {
            (along, across)
        };
        let origin = Point2::new(
            (canvas_width - width * cell_size) as f32 / 2.0,
            (canvas_height - height * cell_size) as f32 / 2.0,
        );
        info!(
            "Square lattice: {}x{} => {} cells",
            width,
            height,
            width * height
        );
        debug!("Square size {} px, origin {}", cell_size, origin);

        Ok(Self {
            store: CellStore::new(width, height, initializer),
            cell_size: cell_size as f32,
            origin,
            render_variant: config.render_variant,
        })
    }

    /// Side length of each cell, in pixels
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The four cardinal directions, each with the step that walks from its
    /// corner of a diamond ring to the next corner
    fn ring_edges() -> [(CellVec, CellVec); 4] {
        CellVec::CARDINALS.map(|dir| (dir, dir.quarter_turn() - dir))
    }
}

impl<T> Grid for SquareLattice<T> {
    type Cell = T;

    fn width(&self) -> i32 {
        self.store.width()
    }

    fn height(&self) -> i32 {
        self.store.height()
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn at(&self, addr: CellAddr) -> &T {
        self.store.get(addr)
    }

    fn at_mut(&mut self, addr: CellAddr) -> &mut T {
        self.store.get_mut(addr)
    }

    /// A square move wraps iff it leaves the grid's rectangle on either axis
    fn add_tracked(&self, addr: CellAddr, vec: CellVec) -> (CellAddr, bool) {
        let raw = CellAddr::new(addr.x + vec.x, addr.y + vec.y);
        let wrapped = !self.store.contains(raw);
        (self.store.offset(addr, vec), wrapped)
    }

    fn iterate<F>(&mut self, f: F)
    where
        F: FnMut(CellAddr, &mut T),
    {
        self.store.for_each_mut(f)
    }

    /// Ring `d` is the boundary of a diamond with radius `d`: `4d` cells,
    /// walked one diamond edge at a time.
    fn splash<F>(&mut self, center: CellAddr, min: usize, max: usize, f: F)
    where
        F: FnMut(CellAddr, usize, &mut T),
    {
        self.store.splash(center, min, max, &Self::ring_edges(), f)
    }

    fn center_for(&self, addr: CellAddr) -> Point2 {
        Point2::new(
            self.origin.x + self.cell_size * (addr.x as f32 + 0.5),
            self.origin.y + self.cell_size * (addr.y as f32 + 0.5),
        )
    }

    fn cell_at(&self, point: Point2) -> Option<CellAddr> {
        let u = (point.x - self.origin.x) / self.cell_size;
        let v = (point.y - self.origin.y) / self.cell_size;
        // NaN would otherwise cast to 0
        if !(u.is_finite() && v.is_finite()) {
            return None;
        }
        let addr = CellAddr::new(u.floor() as i32, v.floor() as i32);
        if self.store.contains(addr) {
            Some(addr)
        } else {
            None
        }
    }

    fn cell_outline(&self) -> Vec<Point2> {
        let half = self.cell_size / 2.0;
        vec![
            Point2::new(-half, -half),
            Point2::new(half, -half),
            Point2::new(half, half),
            Point2::new(-half, half),
        ]
    }

    fn index_count(&self) -> usize {
        self.len() * Self::INDICES_PER_CELL
    }

    fn render_variant(&self) -> u8 {
        self.render_variant
    }

    fn new_loc<R: Rng + ?Sized>(&self, rng: &mut R) -> CellAddr {
        self.store.random_addr(rng)
    }
}
