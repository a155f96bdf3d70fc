use crate::{
    config::LatticeConfig,
    lattice::{
        store::CellStore,
        unit::{CellAddr, CellVec, HexDir, Point2},
        Grid,
    },
    render::RenderResources,
};
use anyhow::{bail, Context};
use log::{debug, info, warn};
use rand::Rng;
use validator::Validate;

/// A wrapping grid of hexagons, laid out in offset rows. Each row is shifted
/// half a hex horizontally from its neighbors, and consecutive rows overlap
/// by a quarter of a hex's height so they interlock.
///
/// ## Stored vs. Visual Columns
///
/// The `x` of a [CellAddr] is the *stored* column. The column a cell actually
/// appears in is `(x + y / 2) % width`. Storing columns this way means that
/// the six [HexDir] vectors are the same from every row. The stagger only
/// matters when converting to pixels and when deciding whether a move crossed
/// the lattice's left/right seam.
///
/// ```text
///  row 0 (even):  0   1   2   3
///  row 1 (odd):     0   1   2   3
///  row 2 (even):  0   1   2   3
/// ```
/// Both rows above are labelled with *visual* columns. Even rows are shifted
/// left by half a hex.
#[derive(Clone, Debug)]
pub struct HexLattice<T> {
    store: CellStore<T>,
    /// Distance between the centers of horizontally adjacent hexes
    hex_width: f32,
    /// Full height of a hex, vertex to vertex
    hex_height: f32,
    /// Top-left corner of the lattice's bounding box on the canvas
    origin: Point2,
    render_variant: u8,
}

impl<T> HexLattice<T> {
    /// Each hex is drawn as a single textured triangle
    pub const INDICES_PER_CELL: usize = 3;

    /// Height of a regular hex relative to its width, `2/sqrt(3)`
    const HEIGHT_RATIO: f64 = 1.154_700_538_379_251_5;

    /// Build a lattice fitted to the configured canvas, initializing each
    /// cell's payload from its address.
    ///
    /// Hexes are as wide as possible (an even number of pixels, so that the
    /// half-hex stagger lands on a whole pixel) while fitting `columns` hexes
    /// plus the stagger across the canvas. Rows are then packed in until the
    /// canvas runs out of height. If that layout needs more indices than
    /// the host surface allows, columns are dropped until it fits.
    pub fn new(
        config: &LatticeConfig,
        resources: &RenderResources,
        initializer: impl FnMut(CellAddr) -> T,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid lattice config")?;

        let canvas_width = config.canvas_width as f64;
        let canvas_height = config.canvas_height as f64;
        let mut width = config.columns as i32;
        let (height, hex_width, hex_height) = loop {
            if width < 1 {
                bail!(
                    "{}x{} canvas can't fit a single column of hexes",
                    config.canvas_width,
                    config.canvas_height
                );
            }
            let mut hex_width = (canvas_width / (width as f64 + 0.5)).floor();
            if hex_width as i64 % 2 == 1 {
                hex_width -= 1.0;
            }
            if hex_width >= 2.0 {
                let hex_height = (Self::HEIGHT_RATIO * hex_width).floor();
                let height = ((canvas_height * 4.0 / hex_height - 1.0) / 3.0)
                    .floor() as i32;
                // Fewer columns means bigger hexes, which only makes this
                // worse, so there's no point in shrinking further
                if height < 1 {
                    bail!(
                        "{}x{} canvas is too short for a row of {} hexes",
                        config.canvas_width,
                        config.canvas_height,
                        width
                    );
                }
                let indices =
                    (width * height) as usize * Self::INDICES_PER_CELL;
                if indices < resources.max_indices() {
                    break (height, hex_width, hex_height);
                }
            }
            width -= 1;
        };
        if width != config.columns as i32 {
            warn!(
                "Requested {} hex columns, reduced to {} to fit the surface",
                config.columns, width
            );
        }

        let total_width = hex_width * (width as f64 + 0.5);
        let total_height = (3 * height + 1) as f64 * hex_height / 4.0;
        let origin = Point2::new(
            ((canvas_width - total_width) / 2.0).floor() as f32,
            ((canvas_height - total_height) / 2.0).floor() as f32,
        );
        info!(
            "Hex lattice: {}x{} => {} cells",
            width,
            height,
            width * height
        );
        debug!(
            "Hex size {}x{} px, origin {}",
            hex_width, hex_height, origin
        );

        Ok(Self {
            store: CellStore::new(width, height, initializer),
            hex_width: hex_width as f32,
            hex_height: hex_height as f32,
            origin,
            render_variant: config.render_variant,
        })
    }

    /// Distance between the centers of horizontally adjacent hexes, in pixels
    pub fn hex_width(&self) -> f32 {
        self.hex_width
    }

    /// Full height of a hex, in pixels
    pub fn hex_height(&self) -> f32 {
        self.hex_height
    }

    /// Vertical distance between the centers of consecutive rows, in pixels
    pub fn row_pitch(&self) -> f32 {
        self.hex_height * 3.0 / 4.0
    }

    /// The column that a cell is drawn in, as opposed to the column it's
    /// stored in
    pub fn visual_column(&self, addr: CellAddr) -> i32 {
        (addr.x + addr.y / 2).rem_euclid(self.store.width())
    }

    /// Step from a cell in one direction. If the step crosses a seam of the
    /// lattice and `wrap` is false, there is no neighbor.
    pub fn neighbor_addr(
        &self,
        addr: CellAddr,
        dir: HexDir,
        wrap: bool,
    ) -> Option<CellAddr> {
        match self.add_tracked(addr, dir.vector()) {
            (_, true) if !wrap => None,
            (neighbor, _) => Some(neighbor),
        }
    }

    /// Get the neighboring cell in one direction. The address is always the
    /// one the step lands on; the cell is `None` when the step crosses a seam
    /// and `wrap` is false.
    pub fn neighbor(
        &self,
        addr: CellAddr,
        dir: HexDir,
        wrap: bool,
    ) -> (CellAddr, Option<&T>) {
        let (neighbor, wrapped) = self.add_tracked(addr, dir.vector());
        if wrapped && !wrap {
            (neighbor, None)
        } else {
            (neighbor, Some(self.store.get(neighbor)))
        }
    }

    /// Mutable version of [Self::neighbor]
    pub fn neighbor_mut(
        &mut self,
        addr: CellAddr,
        dir: HexDir,
        wrap: bool,
    ) -> (CellAddr, Option<&mut T>) {
        let (neighbor, wrapped) = self.add_tracked(addr, dir.vector());
        if wrapped && !wrap {
            (neighbor, None)
        } else {
            (neighbor, Some(self.store.get_mut(neighbor)))
        }
    }

    /// Pick a direction uniformly at random
    pub fn new_dir<R: Rng + ?Sized>(&self, rng: &mut R) -> HexDir {
        HexDir::from_index(rng.gen_range(0..HexDir::ALL.len()))
    }

    /// Each side of a hex ring starts at the corner in one direction and walks
    /// two turns clockwise, towards the next corner
    fn ring_edges() -> [(CellVec, CellVec); 6] {
        HexDir::ALL.map(|dir| (dir.vector(), dir.right().right().vector()))
    }
}

impl<T> Grid for HexLattice<T> {
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

    /// A move wraps if it leaves the top or bottom row, or if it crosses the
    /// left/right seam. Stored columns can't tell us the latter, since the
    /// stored column can wrap while the visual one doesn't (and vice versa).
    /// Instead, compare the direction the move *should* drift horizontally,
    /// `2x + y` half-columns, against the direction the visual column
    /// actually moved. If they disagree, we went around the back.
    fn add_tracked(&self, addr: CellAddr, vec: CellVec) -> (CellAddr, bool) {
        let next = self.store.offset(addr, vec);
        if !(0..self.store.height()).contains(&(addr.y + vec.y)) {
            return (next, true);
        }
        let drift = vec.x * 2 + vec.y;
        let shift = self.visual_column(next) - self.visual_column(addr);
        (next, shift * drift < 0)
    }

    fn iterate<F>(&mut self, f: F)
    where
        F: FnMut(CellAddr, &mut T),
    {
        self.store.for_each_mut(f)
    }

    /// Ring `d` is the `6d` cells at hex distance `d`, walked one side of
    /// the hexagon at a time
    fn splash<F>(&mut self, center: CellAddr, min: usize, max: usize, f: F)
    where
        F: FnMut(CellAddr, usize, &mut T),
    {
        self.store.splash(center, min, max, &Self::ring_edges(), f)
    }

    fn center_for(&self, addr: CellAddr) -> Point2 {
        let column = self.visual_column(addr) as f32;
        let mut x = (column + 1.0) * self.hex_width;
        if addr.y % 2 == 0 {
            x -= self.hex_width / 2.0;
        }
        let y = self.hex_height * (3 * addr.y + 2) as f32 / 4.0;
        Point2::new(x + self.origin.x, y + self.origin.y)
    }

    /// Each row is split into bands one row pitch tall. The bottom 3/4 of a
    /// band belongs entirely to that band's row, but the top 1/4 is a zigzag
    /// shared with the row above. Within the zigzag, compare how far across
    /// the hex we are to how far down, which tells us which side of the
    /// slanted edge we're on.
    fn cell_at(&self, point: Point2) -> Option<CellAddr> {
        let u = (point.x - self.origin.x) / self.hex_width;
        let v = (point.y - self.origin.y) / self.row_pitch();
        // Anything a full band past the edge can't be adjusted back inside,
        // and this keeps the casts below from saturating. NaN fails too.
        let width = self.store.width() as f32;
        let height = self.store.height() as f32;
        if !((-1.0..=width + 1.0).contains(&u)
            && (-1.0..=height + 1.0).contains(&v))
        {
            return None;
        }
        let mut column = u.floor() as i32;
        let mut row = v.floor() as i32;

        // How far we are from the middle of the band, as a fraction of half
        // a hex. 0 is dead center, 1 is the edge.
        let x_offset = u - u.floor() - 0.5;
        let x_away = x_offset.abs() / 0.5;
        let y_offset = v - v.floor();

        if row.rem_euclid(2) == 1 {
            // Odd rows are shifted right, so the band splits between two
            // hexes, and the row above has its vertex in the middle
            if 1.0 - x_away > y_offset * 3.0 {
                row -= 1;
            } else if x_offset < 0.0 {
                column -= 1;
            }
        } else if x_away > y_offset * 3.0 {
            // Even rows have their top vertex in the middle of the band
            row -= 1;
            if x_offset < 0.0 {
                column -= 1;
            }
        }

        if (0..self.store.width()).contains(&column)
            && (0..self.store.height()).contains(&row)
        {
            Some(CellAddr::new(
                (column - row / 2).rem_euclid(self.store.width()),
                row,
            ))
        } else {
            None
        }
    }

    /// Hexes point up, with vertical sides
    fn cell_outline(&self) -> Vec<Point2> {
        let half_width = self.hex_width / 2.0;
        let half_height = self.hex_height / 2.0;
        let quarter_height = self.hex_height / 4.0;
        vec![
            Point2::new(0.0, -half_height),
            Point2::new(half_width, -quarter_height),
            Point2::new(half_width, quarter_height),
            Point2::new(0.0, half_height),
            Point2::new(-half_width, quarter_height),
            Point2::new(-half_width, -quarter_height),
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

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn config(columns: u32) -> LatticeConfig {
        LatticeConfig {
            canvas_width: 400,
            canvas_height: 300,
            columns,
            render_variant: 0,
        }
    }

    fn lattice(columns: u32) -> HexLattice<u32> {
        HexLattice::new(&config(columns), &RenderResources::default(), |_| 0)
            .unwrap()
    }

    /// Hex distance on the torus, checking every way around
    fn hex_distance(
        lattice: &HexLattice<u32>,
        a: CellAddr,
        b: CellAddr,
    ) -> i32 {
        let mut best = i32::MAX;
        for wrap_x in -1..=1 {
            for wrap_y in -1..=1 {
                let dx = b.x - a.x + wrap_x * lattice.width();
                let dy = b.y - a.y + wrap_y * lattice.height();
                best = best.min((dx.abs() + dy.abs() + (dx + dy).abs()) / 2);
            }
        }
        best
    }

    #[test]
    fn test_layout() {
        // 400 / 7.5 = 53 => 52 px wide, 60 px tall, 6 rows
        let lattice = lattice(7);
        assert_eq!((lattice.width(), lattice.height()), (7, 6));
        assert_approx_eq!(lattice.hex_width(), 52.0);
        assert_approx_eq!(lattice.hex_height(), 60.0);
        assert_approx_eq!(lattice.row_pitch(), 45.0);
        assert_eq!(lattice.index_count(), 126);
    }

    #[test]
    fn test_layout_shrinks_to_index_budget() {
        // 7x6 needs 126 indices and 6x5 needs 90
        let resources = RenderResources::new(100).unwrap();
        let lattice = HexLattice::new(&config(7), &resources, |_| ()).unwrap();
        assert_eq!((lattice.width(), lattice.height()), (6, 5));

        let resources = RenderResources::new(80).unwrap();
        let lattice = HexLattice::new(&config(7), &resources, |_| ()).unwrap();
        assert_eq!((lattice.width(), lattice.height()), (5, 4));
        assert_eq!(lattice.index_count(), 60);
    }

    #[test]
    fn test_layout_too_short() {
        let config = LatticeConfig {
            canvas_width: 1000,
            canvas_height: 16,
            columns: 2,
            render_variant: 0,
        };
        assert!(
            HexLattice::new(&config, &RenderResources::default(), |_| ())
                .is_err()
        );
    }

    #[test]
    fn test_center_for() {
        let lattice = lattice(7);
        let origin = lattice.center_for(CellAddr::ORIGIN);
        // Even rows are shifted half a hex left
        let odd = lattice.center_for(CellAddr::new(0, 1));
        assert_approx_eq!(odd.x - origin.x, 26.0);
        assert_approx_eq!(odd.y - origin.y, 45.0);
        // Row 2 is stored one column to the left of where it's drawn
        let below = lattice.center_for(CellAddr::new(6, 2));
        assert_approx_eq!(below.x, origin.x);
        assert_approx_eq!(below.y - origin.y, 90.0);
    }

    #[test]
    fn test_round_trip() {
        for columns in [3, 4, 7, 10] {
            let lattice = lattice(columns);
            for x in 0..lattice.width() {
                for y in 0..lattice.height() {
                    let addr = CellAddr::new(x, y);
                    assert_eq!(
                        lattice.cell_at(lattice.center_for(addr)),
                        Some(addr),
                        "{} columns",
                        columns
                    );
                }
            }
        }
    }

    #[test]
    fn test_cell_at_edges() {
        let lattice = lattice(7);
        let origin = lattice.center_for(CellAddr::ORIGIN);
        // Just inside the left vertex of the first hex
        let inside = Point2::new(origin.x - 20.0, origin.y);
        assert_eq!(lattice.cell_at(inside), Some(CellAddr::ORIGIN));
        // Top-left corner of the bounding box is empty, since even rows are
        // shifted left and the first row's top vertex is in the middle
        assert_eq!(lattice.cell_at(lattice.origin), None);
        assert_eq!(lattice.cell_at(Point2::new(-5.0, 100.0)), None);
        assert_eq!(lattice.cell_at(Point2::new(100.0, 299.0)), None);
        // The odd row sticks out half a hex past the last even hex
        let odd_last = lattice.center_for(CellAddr::new(6, 1));
        assert_eq!(
            lattice.cell_at(Point2::new(odd_last.x + 20.0, odd_last.y)),
            Some(CellAddr::new(6, 1))
        );
    }

    #[test]
    fn test_cell_at_zigzag() {
        let lattice = lattice(7);
        let center = lattice.center_for(CellAddr::new(2, 2));
        // Straight up from the center of an even-row hex, just below its top
        // vertex, is still that hex
        let top =
            Point2::new(center.x, center.y - lattice.hex_height() / 2.0 + 2.0);
        assert_eq!(lattice.cell_at(top), Some(CellAddr::new(2, 2)));
        // Up and to the side of the vertex is in the row above
        let up_left = Point2::new(center.x - 20.0, top.y);
        let up_right = Point2::new(center.x + 20.0, top.y);
        let nw = lattice.add(CellAddr::new(2, 2), HexDir::NorthWest.vector());
        let ne = lattice.add(CellAddr::new(2, 2), HexDir::NorthEast.vector());
        assert_eq!(lattice.cell_at(up_left), Some(nw));
        assert_eq!(lattice.cell_at(up_right), Some(ne));
    }

    #[test]
    fn test_outline_stays_in_cell() {
        let lattice = lattice(7);
        let outline = lattice.cell_outline();
        assert_eq!(outline.len(), 6);
        for x in 0..lattice.width() {
            for y in 0..lattice.height() {
                let addr = CellAddr::new(x, y);
                let center = lattice.center_for(addr);
                for vertex in &outline {
                    let point = Point2::new(
                        center.x + vertex.x * 0.8,
                        center.y + vertex.y * 0.8,
                    );
                    assert_eq!(lattice.cell_at(point), Some(addr));
                }
            }
        }
    }

    #[test]
    fn test_add_wrap_detection() {
        let resources = RenderResources::new(80).unwrap();
        let lattice = HexLattice::new(&config(7), &resources, |_| ()).unwrap();
        assert_eq!((lattice.width(), lattice.height()), (5, 4));

        assert_eq!(
            lattice.add_tracked(CellAddr::ORIGIN, HexDir::West.vector()),
            (CellAddr::new(4, 0), true)
        );
        assert_eq!(
            lattice.add_tracked(CellAddr::new(2, 2), HexDir::East.vector()),
            (CellAddr::new(3, 2), false)
        );
        // The stored column wraps, but the visual one doesn't
        assert_eq!(
            lattice
                .add_tracked(CellAddr::new(0, 1), HexDir::SouthWest.vector()),
            (CellAddr::new(4, 2), false)
        );
        // Off the top
        assert_eq!(
            lattice
                .add_tracked(CellAddr::new(2, 0), HexDir::NorthEast.vector()),
            (CellAddr::new(3, 3), true)
        );
    }

    /// Check every single step against where the cells are actually drawn.
    /// Anything that isn't a wrap has to land on an adjacent hex, and every
    /// wrap has to jump clear across the canvas.
    #[test]
    fn test_wrap_matches_geometry() {
        for columns in [4, 5, 6, 7, 8] {
            let lattice = lattice(columns);
            let hex_width = lattice.hex_width();
            for x in 0..lattice.width() {
                for y in 0..lattice.height() {
                    let addr = CellAddr::new(x, y);
                    for dir in HexDir::iter() {
                        let (next, wrapped) =
                            lattice.add_tracked(addr, dir.vector());
                        let distance = lattice
                            .center_for(addr)
                            .distance_to(lattice.center_for(next));
                        if wrapped {
                            assert!(
                                distance > hex_width * 1.5,
                                "{} -> {} should not wrap",
                                addr,
                                dir
                            );
                        } else {
                            assert!(
                                distance < hex_width * 1.2,
                                "{} -> {} should wrap",
                                addr,
                                dir
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_neighbor() {
        let lattice = lattice(7);
        // Stepping off the seam still reports where the step lands
        assert_eq!(
            lattice.neighbor(CellAddr::ORIGIN, HexDir::West, false),
            (CellAddr::new(6, 0), None)
        );
        assert_eq!(
            lattice.neighbor(CellAddr::ORIGIN, HexDir::West, true),
            (CellAddr::new(6, 0), Some(&0))
        );
        for dir in HexDir::iter() {
            let (next, cell) = lattice.neighbor(CellAddr::new(3, 3), dir, true);
            assert!(cell.is_some());
            let (back, _) = lattice.neighbor(next, dir.opposite(), true);
            assert_eq!(back, CellAddr::new(3, 3));
        }
    }

    #[test]
    fn test_neighbor_mut() {
        let mut lattice = lattice(7);
        let (addr, cell) =
            lattice.neighbor_mut(CellAddr::new(3, 3), HexDir::SouthEast, false);
        *cell.unwrap() = 7;
        assert_eq!(addr, CellAddr::new(3, 4));
        assert_eq!(*lattice.at(CellAddr::new(3, 4)), 7);

        let (addr, cell) =
            lattice.neighbor_mut(CellAddr::ORIGIN, HexDir::West, false);
        assert_eq!(addr, CellAddr::new(6, 0));
        assert!(cell.is_none());
    }

    #[test]
    fn test_splash_rings() {
        let config = LatticeConfig {
            canvas_width: 1200,
            canvas_height: 1200,
            columns: 12,
            render_variant: 0,
        };
        let mut lattice =
            HexLattice::new(&config, &RenderResources::default(), |_| 0u32)
                .unwrap();
        assert!(lattice.height() >= 12);

        for center in
            [CellAddr::ORIGIN, CellAddr::new(5, 6), CellAddr::new(11, 3)]
        {
            for d in 1..=3 {
                let mut visited = Vec::new();
                lattice.splash(center, d, d, |addr, depth, _| {
                    assert_eq!(depth, d);
                    visited.push(addr);
                });
                assert_eq!(visited.len(), 6 * d);
                let unique: HashSet<_> = visited.iter().copied().collect();
                assert_eq!(unique.len(), 6 * d, "duplicates in ring {}", d);
                for addr in visited {
                    assert_eq!(hex_distance(&lattice, center, addr), d as i32);
                }
            }
        }
    }

    #[test]
    fn test_neighbors_match_directions() {
        let mut lattice = lattice(7);
        let center = CellAddr::new(3, 3);
        let mut visited = HashSet::new();
        lattice.neighbors(center, |addr, cell| {
            *cell += 1;
            visited.insert(addr);
        });
        let expected: HashSet<_> = HexDir::iter()
            .map(|dir| lattice.add(center, dir.vector()))
            .collect();
        assert_eq!(visited, expected);
        assert_eq!(*lattice.at(center), 0);
    }

    #[test]
    fn test_new_dir_and_loc() {
        let lattice = lattice(7);
        let mut rng = Pcg64::seed_from_u64(3);
        let mut dirs = HashSet::new();
        for _ in 0..200 {
            dirs.insert(lattice.new_dir(&mut rng));
            let addr = lattice.new_loc(&mut rng);
            assert!((0..lattice.width()).contains(&addr.x));
            assert!((0..lattice.height()).contains(&addr.y));
        }
        assert_eq!(dirs.len(), 6);
    }
}
