//! Movement geometry for each piece kind.
//!
//! "Forward" is absolute: toward row 0 for both sides. Only geometry is
//! checked here; ownership and own-piece occupancy are the match engine's job.

use core::fmt;
use core::str::FromStr;

use super::board::{column, row, Board};
use super::common::{MoveError, ParseError};
use super::config::{CELL_COUNT, GRID_WIDTH};
use super::piece::{Piece, PieceKind, Side};

/// A symbolic one-cell step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
}

impl Direction {
    /// Tokens accepted by pawn-like kinds (P1, P2, P3, H1).
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Backward,
    ];

    /// Tokens accepted by H2.
    pub const DIAGONAL: [Direction; 5] = [
        Direction::ForwardLeft,
        Direction::ForwardRight,
        Direction::BackwardLeft,
        Direction::BackwardRight,
        Direction::Backward,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
            Direction::ForwardLeft => "ForwardLeft",
            Direction::ForwardRight => "ForwardRight",
            Direction::BackwardLeft => "BackwardLeft",
            Direction::BackwardRight => "BackwardRight",
        }
    }

    /// Abbreviation used by the browser client (`F`, `BL`, ...).
    pub const fn short(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::ForwardLeft => "FL",
            Direction::ForwardRight => "FR",
            Direction::BackwardLeft => "BL",
            Direction::BackwardRight => "BR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ORTHOGONAL
            .iter()
            .chain(Direction::DIAGONAL.iter())
            .copied()
            .find(|d| d.as_str() == s || d.short() == s)
            .ok_or(ParseError::InvalidDirection)
    }
}

/// Target index of a one-cell step from `source`, or `OutOfBounds` when the
/// step would cross an edge of the grid.
pub fn step(source: usize, kind: PieceKind, direction: Direction) -> Result<usize, MoveError> {
    if source >= CELL_COUNT {
        return Err(MoveError::OutOfBounds);
    }
    if !kind.directions().contains(&direction) {
        return Err(MoveError::UnsupportedDirection);
    }
    let left_edge = column(source) == 0;
    let right_edge = column(source) == GRID_WIDTH - 1;
    let top_edge = row(source) == 0;
    let bottom_edge = row(source) == GRID_WIDTH - 1;

    let blocked = match direction {
        Direction::Left => left_edge,
        Direction::Right => right_edge,
        Direction::Forward => top_edge,
        Direction::Backward => bottom_edge,
        Direction::ForwardLeft => left_edge || top_edge,
        Direction::ForwardRight => right_edge || top_edge,
        Direction::BackwardLeft => left_edge || bottom_edge,
        Direction::BackwardRight => right_edge || bottom_edge,
    };
    if blocked {
        return Err(MoveError::OutOfBounds);
    }

    let target = match direction {
        Direction::Left => source - 1,
        Direction::Right => source + 1,
        Direction::Forward => source - GRID_WIDTH,
        Direction::Backward => source + GRID_WIDTH,
        Direction::ForwardLeft => source - GRID_WIDTH - 1,
        Direction::ForwardRight => source - GRID_WIDTH + 1,
        Direction::BackwardLeft => source + GRID_WIDTH - 1,
        Direction::BackwardRight => source + GRID_WIDTH + 1,
    };
    Ok(target)
}

/// Locate `piece` on `board` and compute where `direction` takes it.
///
/// Returns `(source, target)`.
pub fn target_cell(
    board: &Board,
    piece: Piece,
    direction: Direction,
) -> Result<(usize, usize), MoveError> {
    let source = board.position_of(piece).ok_or(MoveError::PieceNotFound)?;
    let target = step(source, piece.kind, direction)?;
    Ok((source, target))
}

/// A move the engine would accept for the side to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalMove {
    pub piece: Piece,
    pub direction: Direction,
    pub from: usize,
    pub to: usize,
}

/// All moves available to `side` on `board`: in-bounds steps that do not
/// land on one of the side's own pieces.
pub fn legal_moves(board: &Board, side: Side) -> impl Iterator<Item = LegalMove> + '_ {
    board.pieces_of(side).flat_map(move |(from, piece)| {
        piece.kind.directions().iter().filter_map(move |&direction| {
            let to = step(from, piece.kind, direction).ok()?;
            match board.get(to) {
                Some(occupant) if occupant.belongs_to(side) => None,
                _ => Some(LegalMove {
                    piece,
                    direction,
                    from,
                    to,
                }),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_steps_from_centre() {
        let centre = 12;
        assert_eq!(step(centre, PieceKind::P1, Direction::Left), Ok(11));
        assert_eq!(step(centre, PieceKind::P2, Direction::Right), Ok(13));
        assert_eq!(step(centre, PieceKind::P3, Direction::Forward), Ok(7));
        assert_eq!(step(centre, PieceKind::H1, Direction::Backward), Ok(17));
    }

    #[test]
    fn diagonal_steps_from_centre() {
        let centre = 12;
        assert_eq!(step(centre, PieceKind::H2, Direction::ForwardLeft), Ok(6));
        assert_eq!(step(centre, PieceKind::H2, Direction::ForwardRight), Ok(8));
        assert_eq!(step(centre, PieceKind::H2, Direction::BackwardLeft), Ok(16));
        assert_eq!(step(centre, PieceKind::H2, Direction::BackwardRight), Ok(18));
        assert_eq!(step(centre, PieceKind::H2, Direction::Backward), Ok(17));
    }

    #[test]
    fn edges_block_steps() {
        assert_eq!(step(0, PieceKind::P1, Direction::Forward), Err(MoveError::OutOfBounds));
        assert_eq!(step(0, PieceKind::P1, Direction::Left), Err(MoveError::OutOfBounds));
        assert_eq!(step(4, PieceKind::P1, Direction::Right), Err(MoveError::OutOfBounds));
        assert_eq!(step(24, PieceKind::P1, Direction::Backward), Err(MoveError::OutOfBounds));
        // column 4 of row 1: ForwardRight would wrap into row 0 column 0
        assert_eq!(step(9, PieceKind::H2, Direction::ForwardRight), Err(MoveError::OutOfBounds));
        assert_eq!(step(5, PieceKind::H2, Direction::BackwardLeft), Err(MoveError::OutOfBounds));
        assert_eq!(step(22, PieceKind::H2, Direction::BackwardRight), Err(MoveError::OutOfBounds));
    }

    #[test]
    fn kind_restricts_tokens() {
        assert_eq!(
            step(12, PieceKind::H2, Direction::Forward),
            Err(MoveError::UnsupportedDirection)
        );
        assert_eq!(
            step(12, PieceKind::P1, Direction::ForwardLeft),
            Err(MoveError::UnsupportedDirection)
        );
    }

    #[test]
    fn tokens_parse_long_and_short() {
        assert_eq!("Forward".parse(), Ok(Direction::Forward));
        assert_eq!("F".parse(), Ok(Direction::Forward));
        assert_eq!("BR".parse(), Ok(Direction::BackwardRight));
        assert_eq!("Up".parse::<Direction>(), Err(ParseError::InvalidDirection));
        assert_eq!("forward".parse::<Direction>(), Err(ParseError::InvalidDirection));
    }

    #[test]
    fn opening_moves_for_a() {
        let board = Board::initial();
        // row 0: every piece can only go backward (or diagonally backward for H2)
        let moves: std::vec::Vec<_> = legal_moves(&board, Side::A).collect();
        assert!(moves.iter().all(|m| m.to >= GRID_WIDTH && m.to < 2 * GRID_WIDTH));
        assert_eq!(moves.len(), 7);
    }
}
