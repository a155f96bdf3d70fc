use derive_more::{
    Add, AddAssign, Display, Div, From, Into, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The identity of a single cell in a lattice. Any address handed out by a
/// lattice is normalized into `[0, width) × [0, height)`, so two addresses
/// are the same cell iff their components are equal.
///
/// For the hex lattice, `x` is the *stored* column, not the visual one. See
/// [HexLattice](crate::HexLattice) for how the two relate.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct CellAddr {
    pub x: i32,
    pub y: i32,
}

impl CellAddr {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A movement within a lattice. Unlike [CellAddr], this is a displacement,
/// so it can be negative. Lattices assume any single displacement is smaller
/// than one full trip around the torus.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Add,
    Sub,
    Neg,
    Mul,
    AddAssign,
    SubAssign,
    MulAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "<{}, {}>", x, y)]
pub struct CellVec {
    pub x: i32,
    pub y: i32,
}

impl CellVec {
    pub const ZERO: Self = Self::new(0, 0);

    /// The four axis-aligned unit steps, each a quarter turn from the last.
    pub const CARDINALS: [Self; 4] = [
        Self::new(1, 0),
        Self::new(0, 1),
        Self::new(-1, 0),
        Self::new(0, -1),
    ];

    /// All eight moves a chess knight can make
    pub const KNIGHT_MOVES: [Self; 8] = [
        Self::new(1, 2),
        Self::new(2, 1),
        Self::new(2, -1),
        Self::new(1, -2),
        Self::new(-1, -2),
        Self::new(-2, -1),
        Self::new(-2, 1),
        Self::new(-1, 2),
    ];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale this vector by an integer
    pub const fn times(self, n: i32) -> Self {
        Self::new(self.x * n, self.y * n)
    }

    /// Rotate this vector a quarter turn, from +x towards +y
    pub const fn quarter_turn(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

/// A point in pixel space on the canvas. `x` grows to the right, `y` grows
/// downward, and the origin is the canvas's top-left corner.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Add,
    Sub,
    Mul,
    Div,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One of the six directions from a hex cell to its neighbors. The discriminant
/// is the direction's index; increasing the index turns counterclockwise on
/// screen.
///
/// Each direction maps to the same [CellVec] no matter which row the cell is
/// in. The half-cell stagger between rows is handled entirely by the hex
/// lattice's addressing, never here.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexDir {
    East = 0,
    NorthEast = 1,
    NorthWest = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
}

impl HexDir {
    /// Every direction, in index order
    pub const ALL: [Self; 6] = [
        Self::East,
        Self::NorthEast,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// Get the direction with the given index. Indexes wrap around, so `6`
    /// is [Self::East] again.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Rotate one step counterclockwise
    pub fn left(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate one step clockwise
    pub fn right(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// The integer step that moves a cell one hex in this direction
    pub fn vector(self) -> CellVec {
        match self {
            Self::East => CellVec::new(1, 0),
            Self::NorthEast => CellVec::new(1, -1),
            Self::NorthWest => CellVec::new(0, -1),
            Self::West => CellVec::new(-1, 0),
            Self::SouthWest => CellVec::new(-1, 1),
            Self::SouthEast => CellVec::new(0, 1),
        }
    }

    /// Direction of travel in pixel space, in units of (hex width, row
    /// pitch). Multiply by those to get a pixel offset.
    pub fn unit_offset(self) -> Point2 {
        match self {
            Self::East => Point2::new(1.0, 0.0),
            Self::NorthEast => Point2::new(0.5, -1.0),
            Self::NorthWest => Point2::new(-0.5, -1.0),
            Self::West => Point2::new(-1.0, 0.0),
            Self::SouthWest => Point2::new(-0.5, 1.0),
            Self::SouthEast => Point2::new(0.5, 1.0),
        }
    }
}
