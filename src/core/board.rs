//! The 5x5 grid, stored row-major. Index = row * 5 + column, row 0 at the top.

use core::fmt;

use super::config::{initial_layout, CELL_COUNT, GRID_WIDTH};
use super::piece::{Piece, Side};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; CELL_COUNT],
}

impl Board {
    /// Starting layout of a fresh match.
    pub const fn initial() -> Self {
        Self {
            cells: initial_layout(),
        }
    }

    pub const fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Build a board from raw cells. Returns `None` when a piece appears twice.
    pub fn from_cells(cells: [Option<Piece>; CELL_COUNT]) -> Option<Self> {
        for (i, cell) in cells.iter().enumerate() {
            if let Some(p) = cell {
                if cells[i + 1..].contains(&Some(*p)) {
                    return None;
                }
            }
        }
        Some(Self { cells })
    }

    /// Empty board with the given pieces placed. Later placements of the same
    /// piece replace earlier ones so the board stays consistent.
    pub fn with_pieces(pieces: &[(Piece, usize)]) -> Self {
        let mut board = Self::empty();
        for &(piece, index) in pieces {
            if let Some(old) = board.position_of(piece) {
                board.cells[old] = None;
            }
            board.cells[index] = Some(piece);
        }
        board
    }

    pub fn cells(&self) -> &[Option<Piece>; CELL_COUNT] {
        &self.cells
    }

    /// Content of cell `index`, `None` when empty or out of range.
    pub fn get(&self, index: usize) -> Option<Piece> {
        self.cells.get(index).copied().flatten()
    }

    pub fn position_of(&self, piece: Piece) -> Option<usize> {
        self.cells.iter().position(|c| *c == Some(piece))
    }

    /// Pieces of `side` with their cell index, in board order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (usize, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.filter(|p| p.belongs_to(side)).map(|p| (i, p)))
    }

    pub fn has_pieces(&self, side: Side) -> bool {
        self.pieces_of(side).next().is_some()
    }

    /// Move the piece at `from` onto `to`, overwriting whatever stood there.
    /// Returns the overwritten piece, if any.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) -> Option<Piece> {
        let moving = self.cells[from].take();
        core::mem::replace(&mut self.cells[to], moving)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// Column of a cell index.
pub const fn column(index: usize) -> usize {
    index % GRID_WIDTH
}

/// Row of a cell index.
pub const fn row(index: usize) -> usize {
    index / GRID_WIDTH
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "     ")?;
        for c in 0..GRID_WIDTH {
            write!(f, "  {}   ", c)?;
        }
        writeln!(f)?;
        for r in 0..GRID_WIDTH {
            write!(f, "  {}  ", r)?;
            for c in 0..GRID_WIDTH {
                match self.cells[r * GRID_WIDTH + c] {
                    Some(p) => write!(f, " {} ", p)?,
                    None => write!(f, "  .   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.cells.iter().map(|c| CellDebug(*c)))
            .finish()
    }
}

/// Prints a cell the way it travels on the wire: `"A-P1"` or `""`.
struct CellDebug(Option<Piece>);

impl fmt::Debug for CellDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "\"{}\"", p),
            None => write!(f, "\"\""),
        }
    }
}
