use serde::{Deserialize, Serialize};

/// One of the two parallel map layers. Both share the same width × height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    Arcanus,
    Myrror,
}

impl Plane {
    pub const COUNT: usize = 2;
    pub const ALL: [Plane; 2] = [Plane::Arcanus, Plane::Myrror];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Plane::Arcanus => 0,
            Plane::Myrror => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Plane> {
        Plane::ALL.get(index).copied()
    }

    #[inline]
    pub const fn other(self) -> Plane {
        match self {
            Plane::Arcanus => Plane::Myrror,
            Plane::Myrror => Plane::Arcanus,
        }
    }
}

/// A cell on the overland map, identified by (plane, x, y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapCoord {
    pub plane: Plane,
    pub x: u32,
    pub y: u32,
}

impl MapCoord {
    #[inline]
    pub const fn new(plane: Plane, x: u32, y: u32) -> Self {
        Self { plane, x, y }
    }

    /// Same (x, y) on the opposite plane.
    #[inline]
    pub const fn across(self) -> Self {
        Self {
            plane: self.plane.other(),
            x: self.x,
            y: self.y,
        }
    }
}

impl std::fmt::Display for MapCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.plane.index())
    }
}

/// Direction taken to enter a cell. The numeric codes are part of the output
/// contract: 1 is north and codes increase clockwise, 9 is a tower portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    PlaneShift,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Direction code as stored in the direction grid (0 is reserved for "none").
    pub const fn code(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::NorthEast => 2,
            Direction::East => 3,
            Direction::SouthEast => 4,
            Direction::South => 5,
            Direction::SouthWest => 6,
            Direction::West => 7,
            Direction::NorthWest => 8,
            Direction::PlaneShift => 9,
        }
    }

    pub const fn from_code(code: u8) -> Option<Direction> {
        match code {
            1 => Some(Direction::North),
            2 => Some(Direction::NorthEast),
            3 => Some(Direction::East),
            4 => Some(Direction::SouthEast),
            5 => Some(Direction::South),
            6 => Some(Direction::SouthWest),
            7 => Some(Direction::West),
            8 => Some(Direction::NorthWest),
            9 => Some(Direction::PlaneShift),
            _ => None,
        }
    }

    /// `(dx, dy)` step on the same plane; y grows southwards.
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::PlaneShift => (0, 0),
        }
    }

    pub const fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::PlaneShift => Direction::PlaneShift,
        }
    }
}

/// Which same-plane neighbours a cell has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    Four,
    #[default]
    Eight,
}

impl Adjacency {
    /// Same-plane directions in ascending code order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Adjacency::Four => &Direction::CARDINAL,
            Adjacency::Eight => &Direction::COMPASS,
        }
    }
}
