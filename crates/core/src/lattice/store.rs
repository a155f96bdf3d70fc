use crate::lattice::unit::{CellAddr, CellVec};
use rand::Rng;

/// Flat, column-major storage for a lattice's cell payloads, plus the toroidal
/// address arithmetic both lattice types share. Whatever makes a lattice square
/// or hex (pixel mapping, wrap detection, ring shape) lives in the lattice
/// itself; this only knows about a `width × height` torus.
#[derive(Clone, Debug)]
pub(crate) struct CellStore<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T> CellStore<T> {
    pub fn new(
        width: i32,
        height: i32,
        mut initializer: impl FnMut(CellAddr) -> T,
    ) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for x in 0..width {
            for y in 0..height {
                cells.push(initializer(CellAddr::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, addr: CellAddr) -> bool {
        (0..self.width).contains(&addr.x) && (0..self.height).contains(&addr.y)
    }

    /// Index into the backing vec. Panics if the address isn't normalized,
    /// since that means whoever built it skipped the lattice's arithmetic.
    fn index(&self, addr: CellAddr) -> usize {
        assert!(
            self.contains(addr),
            "cell {} is outside of {}x{} lattice",
            addr,
            self.width,
            self.height
        );
        (addr.x * self.height + addr.y) as usize
    }

    pub fn get(&self, addr: CellAddr) -> &T {
        &self.cells[self.index(addr)]
    }

    pub fn get_mut(&mut self, addr: CellAddr) -> &mut T {
        let index = self.index(addr);
        &mut self.cells[index]
    }

    /// Move an address by a vector, wrapping around both axes
    pub fn offset(&self, addr: CellAddr, vec: CellVec) -> CellAddr {
        CellAddr::new(
            (addr.x + vec.x).rem_euclid(self.width),
            (addr.y + vec.y).rem_euclid(self.height),
        )
    }

    /// Visit every cell once, column by column
    pub fn for_each_mut(&mut self, mut f: impl FnMut(CellAddr, &mut T)) {
        let height = self.height;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let i = i as i32;
            f(CellAddr::new(i / height, i % height), cell);
        }
    }

    /// Visit the rings of cells around `center` from distance `min` to `max`
    /// (inclusive). Each entry in `edges` describes one side of the ring: a
    /// unit vector to that side's starting corner, and the unit step that
    /// walks along the side towards the next corner. A ring of distance `d`
    /// visits `edges.len() * d` cells. The callback gets the cell's address,
    /// its ring distance, and the cell itself.
    pub fn splash(
        &mut self,
        center: CellAddr,
        min: usize,
        max: usize,
        edges: &[(CellVec, CellVec)],
        mut f: impl FnMut(CellAddr, usize, &mut T),
    ) {
        let mut min = min;
        if min == 0 {
            f(center, 0, self.get_mut(center));
            min = 1;
        }
        for depth in min..=max {
            for &(corner, step) in edges {
                let mut addr = self.offset(center, corner.times(depth as i32));
                f(addr, depth, self.get_mut(addr));
                for _ in 1..depth {
                    addr = self.offset(addr, step);
                    f(addr, depth, self.get_mut(addr));
                }
            }
        }
    }

    pub fn random_addr<R: Rng + ?Sized>(&self, rng: &mut R) -> CellAddr {
        CellAddr::new(
            rng.gen_range(0..self.width),
            rng.gen_range(0..self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_wraps() {
        let store = CellStore::new(5, 4, |_| ());
        let origin = CellAddr::ORIGIN;
        assert_eq!(
            store.offset(origin, CellVec::new(-1, 0)),
            CellAddr::new(4, 0)
        );
        assert_eq!(
            store.offset(origin, CellVec::new(0, -1)),
            CellAddr::new(0, 3)
        );
        assert_eq!(
            store.offset(CellAddr::new(4, 3), CellVec::new(1, 1)),
            CellAddr::ORIGIN
        );
        assert_eq!(
            store.offset(CellAddr::new(2, 2), CellVec::new(-4, 3)),
            CellAddr::new(3, 1)
        );
    }

    #[test]
    fn test_for_each_mut_matches_initializer() {
        let mut store = CellStore::new(3, 7, |addr| addr);
        let mut visited = 0;
        store.for_each_mut(|addr, cell| {
            assert_eq!(addr, *cell);
            visited += 1;
        });
        assert_eq!(visited, 21);
    }

    #[test]
    #[should_panic(expected = "outside of 3x3 lattice")]
    fn test_get_unnormalized() {
        let store = CellStore::new(3, 3, |_| 0);
        store.get(CellAddr::new(3, 0));
    }
}
