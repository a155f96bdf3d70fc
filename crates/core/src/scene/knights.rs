use crate::{
    lattice::{
        cell::{Cell, Paint},
        unit::{CellAddr, CellVec},
        Grid,
    },
    scene::Scene,
};
use log::debug;
use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg64;

/// A single knight and the paint it last left behind
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Knight {
    pub addr: CellAddr,
    pub paint: Paint,
}

/// A handful of knights taking turns hopping around the lattice. Wherever a
/// knight lands gets repainted and brightened, and so does everything next to
/// it. Meanwhile, every cell slowly fades. Knight moves are plain
/// [CellVec]s, so this runs the same on either lattice; on a hex lattice the
/// "L" just comes out skewed.
#[derive(Clone, Debug)]
pub struct KnightScene {
    rng: Pcg64,
    knights: Vec<Knight>,
    next_knight: usize,
    palette_len: usize,
}

impl KnightScene {
    /// How much every cell fades per tick
    const FADE: f32 = 0.001;
    /// Paint steps for the cell a knight lands on
    const LANDING_PAINT: u32 = 2;
    const LANDING_ALPHA: f32 = 0.2;
    const SPLASH_ALPHA: f32 = 0.1;

    /// Reset every cell to the first paint and drop `count` knights at
    /// random spots on the lattice
    pub fn new<G: Grid<Cell = Cell>>(
        grid: &mut G,
        count: usize,
        palette_len: usize,
        seed: u64,
    ) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        grid.iterate(|_, cell| cell.paint = Paint::default());
        let knights: Vec<Knight> = (0..count)
            .map(|i| Knight {
                addr: grid.new_loc(&mut rng),
                paint: Paint(i as u8).inc(0, palette_len),
            })
            .collect();
        debug!("Placed knights at {:?}", knights);
        Self {
            rng,
            knights,
            next_knight: 0,
            palette_len,
        }
    }

    pub fn knights(&self) -> &[Knight] {
        &self.knights
    }
}

impl<G: Grid<Cell = Cell>> Scene<G> for KnightScene {
    fn name(&self) -> &'static str {
        "knights"
    }

    /// Fade the whole lattice, then move one knight
    fn tick(&mut self, grid: &mut G) -> anyhow::Result<bool> {
        grid.iterate(|_, cell| cell.inc_alpha(-Self::FADE));

        let palette_len = self.palette_len;
        let Some(knight) = self.knights.get_mut(self.next_knight) else {
            return Ok(false);
        };
        let step = *CellVec::KNIGHT_MOVES
            .choose(&mut self.rng)
            .unwrap_or(&CellVec::ZERO);
        knight.addr = grid.add(knight.addr, step);

        let landing = grid.at_mut(knight.addr);
        knight.paint = landing.inc_paint(Self::LANDING_PAINT, palette_len);
        landing.inc_alpha(Self::LANDING_ALPHA);
        grid.neighbors(knight.addr, |_, cell| {
            cell.inc_paint(1, palette_len);
            cell.inc_alpha(Self::SPLASH_ALPHA);
        });

        self.next_knight = (self.next_knight + 1) % self.knights.len();
        Ok(true)
    }
}
