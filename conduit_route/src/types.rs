// Core value types shared across the router.
//
// Defines the lattice coordinate (`Coord`), the six axis-aligned travel
// directions (`Direction`), grid cell states (`CellType`), and the pipe
// vocabulary: `PipeCategory`, `PipeGeometry`, `Pipe`, plus the routing
// request (`Problem`) and the search `State`. All types derive `Serialize`
// and `Deserialize` so the protocol crate can ship them as-is or translate
// them into flatter DTOs.
//
// `PipeGeometry` is a closed enum: the second leg of a bend lives inside the
// `Bend1` variant, so "a bend without a bend direction" cannot be built.
// Every dispatch over geometry is an exhaustive `match`; adding a piece kind
// forces each site to be revisited by the compiler.
//
// See also: `grid.rs` for how pipes map onto cells, `segment.rs` for how
// paths become pipes.

use crate::error::DirectionError;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A cell position in the routing lattice. Each component is in cell units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }

    /// Straight-line (Euclidean) distance between two coordinates.
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, scale: i32) -> Coord {
        Coord::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Mul<Coord> for i32 {
    type Output = Coord;

    fn mul(self, coord: Coord) -> Coord {
        coord * self
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned directions of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// All directions, in the fixed order searches expand neighbors.
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    /// The unit vector for this direction.
    pub const fn unit(self) -> Coord {
        match self {
            Direction::PosX => Coord::new(1, 0, 0),
            Direction::NegX => Coord::new(-1, 0, 0),
            Direction::PosY => Coord::new(0, 1, 0),
            Direction::NegY => Coord::new(0, -1, 0),
            Direction::PosZ => Coord::new(0, 0, 1),
            Direction::NegZ => Coord::new(0, 0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Axis index: 0 for X, 1 for Y, 2 for Z.
    const fn axis(self) -> u8 {
        match self {
            Direction::PosX | Direction::NegX => 0,
            Direction::PosY | Direction::NegY => 1,
            Direction::PosZ | Direction::NegZ => 2,
        }
    }

    /// True when the two directions lie on different axes.
    pub const fn is_perpendicular(self, other: Direction) -> bool {
        self.axis() != other.axis()
    }

    /// The four directions a bend can turn into from this heading.
    pub fn perpendiculars(self) -> [Direction; 4] {
        match self.axis() {
            0 => [
                Direction::PosY,
                Direction::NegY,
                Direction::PosZ,
                Direction::NegZ,
            ],
            1 => [
                Direction::PosX,
                Direction::NegX,
                Direction::PosZ,
                Direction::NegZ,
            ],
            _ => [
                Direction::PosX,
                Direction::NegX,
                Direction::PosY,
                Direction::NegY,
            ],
        }
    }

    /// Direction of the single unit step from `from` to `to`.
    ///
    /// Panics if the cells are not face-adjacent. Searches only ever produce
    /// unit steps, so a failure here is a bug in the caller.
    pub fn between(from: Coord, to: Coord) -> Direction {
        match Direction::try_from(to - from) {
            Ok(dir) => dir,
            Err(e) => panic!("step {from} -> {to} is not a unit move: {e}"),
        }
    }
}

impl From<Direction> for Coord {
    fn from(dir: Direction) -> Coord {
        dir.unit()
    }
}

impl TryFrom<Coord> for Direction {
    type Error = DirectionError;

    fn try_from(c: Coord) -> Result<Self, Self::Error> {
        Direction::ALL
            .into_iter()
            .find(|d| d.unit() == c)
            .ok_or(DirectionError::NotAxisUnit(c))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::PosX => "+X",
            Direction::NegX => "-X",
            Direction::PosY => "+Y",
            Direction::NegY => "-Y",
            Direction::PosZ => "+Z",
            Direction::NegZ => "-Z",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Cell states
// ---------------------------------------------------------------------------

/// The state of a single cell in the routing grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    Obstacle,
    HotPipe,
    ColdPipe,
}

impl CellType {
    /// Only empty cells can be routed through.
    pub const fn is_passable(self) -> bool {
        matches!(self, CellType::Empty)
    }
}

// ---------------------------------------------------------------------------
// Pipes
// ---------------------------------------------------------------------------

/// What a pipe carries. Determines the cell state it commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeCategory {
    Hot,
    Cold,
}

impl PipeCategory {
    pub const fn cell_type(self) -> CellType {
        match self {
            PipeCategory::Hot => CellType::HotPipe,
            PipeCategory::Cold => CellType::ColdPipe,
        }
    }
}

/// Physical shape of one manufacturable piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeGeometry {
    /// One-cell straight run.
    Straight1,
    /// Two-cell straight run: the anchor and the next cell along `direction`.
    Straight2,
    /// One-cell right-angle elbow. `bend` is the heading of the second leg.
    Bend1 { bend: Direction },
}

/// Fieldless mirror of `PipeGeometry` for reports and DTOs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Straight1,
    Straight2,
    Bend1,
}

impl PipeGeometry {
    pub const fn kind(self) -> GeometryKind {
        match self {
            PipeGeometry::Straight1 => GeometryKind::Straight1,
            PipeGeometry::Straight2 => GeometryKind::Straight2,
            PipeGeometry::Bend1 { .. } => GeometryKind::Bend1,
        }
    }

    /// Number of grid cells the piece covers.
    pub const fn cell_span(self) -> i32 {
        match self {
            PipeGeometry::Straight1 | PipeGeometry::Bend1 { .. } => 1,
            PipeGeometry::Straight2 => 2,
        }
    }
}

/// One placed pipe segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pipe {
    /// Anchor cell.
    pub location: Coord,
    /// Heading of travel into (and, for straights, through) the anchor.
    pub direction: Direction,
    pub geometry: PipeGeometry,
    pub category: PipeCategory,
}

impl Pipe {
    pub const fn straight1(location: Coord, direction: Direction, category: PipeCategory) -> Self {
        Self {
            location,
            direction,
            geometry: PipeGeometry::Straight1,
            category,
        }
    }

    pub const fn straight2(location: Coord, direction: Direction, category: PipeCategory) -> Self {
        Self {
            location,
            direction,
            geometry: PipeGeometry::Straight2,
            category,
        }
    }

    pub const fn bend1(
        location: Coord,
        direction: Direction,
        bend: Direction,
        category: PipeCategory,
    ) -> Self {
        Self {
            location,
            direction,
            geometry: PipeGeometry::Bend1 { bend },
            category,
        }
    }

    /// The second-leg heading of a bend; `None` for straights.
    pub const fn bend_direction(&self) -> Option<Direction> {
        match self.geometry {
            PipeGeometry::Bend1 { bend } => Some(bend),
            PipeGeometry::Straight1 | PipeGeometry::Straight2 => None,
        }
    }

    /// Heading of travel when leaving the piece.
    pub const fn exit_direction(&self) -> Direction {
        match self.geometry {
            PipeGeometry::Bend1 { bend } => bend,
            PipeGeometry::Straight1 | PipeGeometry::Straight2 => self.direction,
        }
    }

    /// The cells this piece physically covers, anchor first.
    pub fn occupied_cells(&self) -> SmallVec<[Coord; 2]> {
        match self.geometry {
            PipeGeometry::Straight1 | PipeGeometry::Bend1 { .. } => smallvec![self.location],
            PipeGeometry::Straight2 => {
                smallvec![self.location, self.location + self.direction.unit()]
            }
        }
    }

    /// The last covered cell along the direction of travel.
    pub fn last_cell(&self) -> Coord {
        self.location + self.direction.unit() * (self.geometry.cell_span() - 1)
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry {
            PipeGeometry::Straight1 => write!(f, "Straight1 {} {}", self.location, self.direction),
            PipeGeometry::Straight2 => write!(f, "Straight2 {} {}", self.location, self.direction),
            PipeGeometry::Bend1 { bend } => {
                write!(f, "Bend1 {} {}->{}", self.location, self.direction, bend)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Requests and search state
// ---------------------------------------------------------------------------

/// One routing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub start: Coord,
    /// Heading the pipe arrives with when it enters `start`.
    pub start_direction: Direction,
    pub end: Coord,
    pub category: PipeCategory,
}

impl Problem {
    pub const fn new(
        start: Coord,
        start_direction: Direction,
        end: Coord,
        category: PipeCategory,
    ) -> Self {
        Self {
            start,
            start_direction,
            end,
            category,
        }
    }
}

/// A search state: a cell plus the heading the route holds there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub location: Coord,
    pub direction: Direction,
}

impl State {
    pub const fn new(location: Coord, direction: Direction) -> Self {
        Self {
            location,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_arithmetic() {
        let a = Coord::new(1, 2, 3);
        let b = Coord::new(-4, 0, 5);
        assert_eq!(a + b, Coord::new(-3, 2, 8));
        assert_eq!(a - b, Coord::new(5, 2, -2));
        assert_eq!(a * 2, Coord::new(2, 4, 6));
        assert_eq!(3 * a, Coord::new(3, 6, 9));
        assert_eq!(-a, Coord::new(-1, -2, -3));
    }

    #[test]
    fn coord_distances() {
        let a = Coord::new(0, 0, 0);
        let b = Coord::new(3, 4, 12);
        assert_eq!(a.manhattan_distance(b), 19);
        assert_eq!(b.manhattan_distance(a), 19);
        assert_eq!(a.distance(b), 13.0);
    }

    #[test]
    fn direction_unit_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::try_from(dir.unit()), Ok(dir));
            assert_eq!(dir.opposite().unit(), -dir.unit());
        }
    }

    #[test]
    fn non_unit_vector_is_rejected() {
        assert_eq!(
            Direction::try_from(Coord::new(1, 1, 0)),
            Err(DirectionError::NotAxisUnit(Coord::new(1, 1, 0)))
        );
        assert!(Direction::try_from(Coord::new(2, 0, 0)).is_err());
        assert!(Direction::try_from(Coord::ZERO).is_err());
    }

    #[test]
    #[should_panic(expected = "not a unit move")]
    fn between_panics_on_diagonal_step() {
        Direction::between(Coord::new(0, 0, 0), Coord::new(1, 1, 0));
    }

    #[test]
    fn between_adjacent_cells() {
        let c = Coord::new(2, 2, 2);
        assert_eq!(Direction::between(c, Coord::new(2, 1, 2)), Direction::NegY);
        assert_eq!(Direction::between(c, Coord::new(2, 2, 3)), Direction::PosZ);
    }

    #[test]
    fn perpendiculars_exclude_own_axis() {
        for dir in Direction::ALL {
            let perps = dir.perpendiculars();
            assert!(!perps.contains(&dir));
            assert!(!perps.contains(&dir.opposite()));
            assert!(perps.iter().all(|p| p.is_perpendicular(dir)));
        }
    }

    #[test]
    fn straight2_covers_two_cells() {
        let p = Pipe::straight2(Coord::new(1, 1, 1), Direction::NegZ, PipeCategory::Cold);
        assert_eq!(
            p.occupied_cells().as_slice(),
            &[Coord::new(1, 1, 1), Coord::new(1, 1, 0)]
        );
        assert_eq!(p.last_cell(), Coord::new(1, 1, 0));
        assert_eq!(p.bend_direction(), None);
    }

    #[test]
    fn bend_covers_anchor_only() {
        let p = Pipe::bend1(
            Coord::new(0, 0, 0),
            Direction::PosX,
            Direction::PosY,
            PipeCategory::Hot,
        );
        assert_eq!(p.occupied_cells().as_slice(), &[Coord::new(0, 0, 0)]);
        assert_eq!(p.bend_direction(), Some(Direction::PosY));
        assert_eq!(p.exit_direction(), Direction::PosY);
        assert_eq!(p.geometry.kind(), GeometryKind::Bend1);
    }

    #[test]
    fn category_maps_to_cell_type() {
        assert_eq!(PipeCategory::Hot.cell_type(), CellType::HotPipe);
        assert_eq!(PipeCategory::Cold.cell_type(), CellType::ColdPipe);
        assert!(CellType::Empty.is_passable());
        assert!(!CellType::Obstacle.is_passable());
        assert!(!CellType::ColdPipe.is_passable());
    }

    #[test]
    fn pipe_serialization_roundtrip() {
        let p = Pipe::bend1(
            Coord::new(4, 0, 2),
            Direction::NegY,
            Direction::PosZ,
            PipeCategory::Cold,
        );
        let json = serde_json::to_string(&p).unwrap();
        let restored: Pipe = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }

    #[test]
    fn coord_display() {
        assert_eq!(Coord::new(1, -2, 3).to_string(), "(1, -2, 3)");
    }
}
