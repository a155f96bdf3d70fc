//! Scenes are the consumers of a lattice: each one owns some state of its
//! own, and mutates the lattice's cells one tick at a time. A scene never
//! draws anything, it only leaves cells in a state that something else can
//! draw.

mod knights;
mod match3;

pub use knights::{Knight, KnightScene};
pub use match3::Match3Scene;

use crate::{lattice::Grid, timed};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Selects which scene runs on a lattice
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    PartialEq,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SceneKind {
    /// Leave the lattice as it was built
    None,
    /// Knights hop around, painting wherever they land. Runs on any lattice.
    Knights,
    /// Runs of same-paint hexes fade out and get replaced. Hex lattice only.
    Match3,
}

/// Something that advances the cells of a lattice over time. Scenes hold on
/// to their own state between ticks, but the lattice is only borrowed for
/// the duration of each tick.
pub trait Scene<G: Grid> {
    fn name(&self) -> &'static str;

    /// Advance the scene by one step. Returns whether any cells changed. Any
    /// error here is a bug in the scene, not a problem with the lattice;
    /// every scene should be able to run on any lattice it accepts.
    fn tick(&mut self, grid: &mut G) -> anyhow::Result<bool>;
}

/// Run a scene for some number of ticks. Returns the number of ticks that
/// changed at least one cell.
pub fn run_ticks<G, S>(
    scene: &mut S,
    grid: &mut G,
    ticks: u32,
) -> anyhow::Result<u32>
where
    G: Grid,
    S: Scene<G> + ?Sized,
{
    let name = scene.name();
    let changed = timed!(&format!("{} x{}", name, ticks), {
        let mut changed = 0;
        for tick in 0..ticks {
            if scene
                .tick(grid)
                .with_context(|| format!("error in {} tick {}", name, tick))?
            {
                changed += 1;
            }
        }
        changed
    });
    info!("Ran {} ticks of {}, {} changed cells", ticks, name, changed);
    Ok(changed)
}
