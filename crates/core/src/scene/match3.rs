use crate::{
    lattice::{
        cell::{Cell, Paint},
        unit::{CellAddr, HexDir},
        Grid, HexLattice,
    },
    scene::Scene,
};
use fnv::FnvBuildHasher;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::HashSet;

/// A hands-off match-three board. Each round targets one paint: every
/// straight line of three or more hexes with that paint fades out, then the
/// faded hexes get fresh random paints and the target moves on to the next
/// paint.
///
/// Lines never continue across a seam of the lattice. Two hexes on opposite
/// edges of the screen aren't next to each other, even though the lattice
/// wraps.
#[derive(Clone, Debug)]
pub struct Match3Scene {
    rng: Pcg64,
    palette_len: usize,
    /// The paint we're currently looking for lines of
    target: Paint,
    /// Hexes that are part of a line and on their way out
    fading: Vec<CellAddr>,
}

impl Match3Scene {
    /// Alpha that fresh hexes start at
    const RESTING_ALPHA: f32 = 0.75;
    const FADE: f32 = 0.25;
    /// Shortest line that counts as a match
    const MIN_RUN: usize = 3;
    /// One direction for each axis of the lattice. Lines are walked in these
    /// directions; the opposite three directions would find the same lines.
    const AXES: [HexDir; 3] =
        [HexDir::East, HexDir::NorthEast, HexDir::NorthWest];

    /// Fill the board with random paints
    pub fn new(
        grid: &mut HexLattice<Cell>,
        palette_len: usize,
        seed: u64,
    ) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let paints = palette_len.max(1);
        grid.iterate(|_, cell| {
            cell.paint = Paint(rng.gen_range(0..paints) as u8);
            cell.alpha = Self::RESTING_ALPHA;
        });
        Self {
            rng,
            palette_len,
            target: Paint::default(),
            fading: Vec::new(),
        }
    }

    pub fn target(&self) -> Paint {
        self.target
    }

    /// Hexes that are currently fading out
    pub fn fading(&self) -> &[CellAddr] {
        &self.fading
    }

    /// Find every hex that's part of a straight line of at least three hexes
    /// with the given paint. Each hex is listed once, sorted by address.
    pub fn find_matches(
        grid: &HexLattice<Cell>,
        paint: Paint,
    ) -> Vec<CellAddr> {
        let matches_paint = |addr: CellAddr| grid.at(addr).paint == paint;
        let mut matched: HashSet<CellAddr, FnvBuildHasher> = HashSet::default();

        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let start = CellAddr::new(x, y);
                if !matches_paint(start) {
                    continue;
                }
                for dir in Self::AXES {
                    // Only walk each line from its first hex
                    let continues_back = grid
                        .neighbor_addr(start, dir.opposite(), false)
                        .is_some_and(matches_paint);
                    if continues_back {
                        continue;
                    }

                    let mut run = vec![start];
                    let mut addr = start;
                    while let Some(next) = grid
                        .neighbor_addr(addr, dir, false)
                        .filter(|next| matches_paint(*next))
                    {
                        run.push(next);
                        addr = next;
                    }
                    if run.len() >= Self::MIN_RUN {
                        trace!(
                            "Line of {} from {} going {}",
                            run.len(),
                            start,
                            dir
                        );
                        matched.extend(run);
                    }
                }
            }
        }

        let mut matched: Vec<_> = matched.into_iter().collect();
        matched.sort();
        matched
    }
}

impl Scene<HexLattice<Cell>> for Match3Scene {
    fn name(&self) -> &'static str {
        "match3"
    }

    /// Each tick either fades out the current matches a bit more, replaces
    /// them once they're gone, or looks for new ones
    fn tick(&mut self, grid: &mut HexLattice<Cell>) -> anyhow::Result<bool> {
        if self.fading.is_empty() {
            self.fading = Self::find_matches(grid, self.target);
            debug!(
                "Found {} hexes in lines of paint {}",
                self.fading.len(),
                self.target
            );
            if self.fading.is_empty() {
                self.target = self.target.inc(1, self.palette_len);
                return Ok(false);
            }
        }

        let mut faded = true;
        for addr in &self.fading {
            let cell = grid.at_mut(*addr);
            cell.inc_alpha(-Self::FADE);
            faded &= cell.alpha <= 0.0;
        }

        if faded {
            let paints = self.palette_len.max(1);
            for addr in self.fading.drain(..) {
                let cell = grid.at_mut(addr);
                cell.paint = Paint(self.rng.gen_range(0..paints) as u8);
                cell.alpha = Self::RESTING_ALPHA;
            }
            self.target = self.target.inc(1, self.palette_len);
        }
        Ok(true)
    }
}
