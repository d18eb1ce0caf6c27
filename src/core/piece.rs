//! Sides, piece kinds and piece identifiers.

use core::fmt;
use core::str::FromStr;

use super::common::ParseError;
use super::rules::Direction;

/// One of the two participants of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides in seat order.
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Seat index: 0 for A, 1 for B.
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Side::A),
            "B" => Ok(Side::B),
            _ => Err(ParseError::InvalidSide),
        }
    }
}

/// How a piece kind is allowed to step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// One cell left, right, forward or backward.
    Orthogonal,
    /// One cell along a diagonal, or one cell straight backward.
    Diagonal,
}

/// Movement class of a piece. Every side owns exactly one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    P1,
    P2,
    P3,
    H1,
    H2,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::P1,
        PieceKind::P2,
        PieceKind::P3,
        PieceKind::H1,
        PieceKind::H2,
    ];

    pub const fn movement(self) -> Movement {
        match self {
            PieceKind::P1 | PieceKind::P2 | PieceKind::P3 | PieceKind::H1 => Movement::Orthogonal,
            PieceKind::H2 => Movement::Diagonal,
        }
    }

    /// Direction tokens this kind accepts.
    pub fn directions(self) -> &'static [Direction] {
        match self.movement() {
            Movement::Orthogonal => &Direction::ORTHOGONAL,
            Movement::Diagonal => &Direction::DIAGONAL,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PieceKind::P1 => "P1",
            PieceKind::P2 => "P2",
            PieceKind::P3 => "P3",
            PieceKind::H1 => "H1",
            PieceKind::H2 => "H2",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(ParseError::InvalidKind)
    }
}

/// A piece, identified by its owner and kind (`A-P1`, `B-H2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    pub fn belongs_to(&self, side: Side) -> bool {
        self.side == side
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side, self.kind)
    }
}

impl FromStr for Piece {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, kind) = s.split_once('-').ok_or(ParseError::InvalidPieceId)?;
        Ok(Piece::new(side.parse()?, kind.parse()?))
    }
}
