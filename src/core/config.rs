use super::piece::{Piece, PieceKind, Side};

/// Number of columns (and rows) of the grid.
pub const GRID_WIDTH: usize = 5;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = GRID_WIDTH * GRID_WIDTH;
/// Pieces each side starts with.
pub const PIECES_PER_SIDE: usize = 5;

/// Column order of the back rank, shared by both sides.
pub const BACK_RANK: [PieceKind; PIECES_PER_SIDE] = [
    PieceKind::P1,
    PieceKind::P2,
    PieceKind::H1,
    PieceKind::H2,
    PieceKind::P3,
];

/// Row each side's pieces start on.
pub const fn home_row(side: Side) -> usize {
    match side {
        Side::A => 0,
        Side::B => GRID_WIDTH - 1,
    }
}

/// The starting layout: A on row 0, B on row 4, rows 1-3 empty.
pub const fn initial_layout() -> [Option<Piece>; CELL_COUNT] {
    let mut cells = [None; CELL_COUNT];
    let mut col = 0;
    while col < PIECES_PER_SIDE {
        cells[home_row(Side::A) * GRID_WIDTH + col] = Some(Piece::new(Side::A, BACK_RANK[col]));
        cells[home_row(Side::B) * GRID_WIDTH + col] = Some(Piece::new(Side::B, BACK_RANK[col]));
        col += 1;
    }
    cells
}
