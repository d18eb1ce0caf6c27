//! Error types shared by the board, the move validator and the match engine.

/// Why a move request was rejected by the validator or the ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The identifier does not name any piece of the game.
    UnknownPiece,
    /// The piece is not on the board (never was, or was captured).
    PieceNotFound,
    /// The piece belongs to the other side.
    NotOwner,
    /// The direction token is not one this piece kind understands.
    UnsupportedDirection,
    /// The step would leave the grid.
    OutOfBounds,
    /// The target cell already holds a piece of the moving side.
    OwnPieceAtTarget,
}

/// Errors returned by `MatchEngine::apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Not this side's turn, or the match is not in progress.
    TurnViolation,
    /// The move itself was rejected.
    IllegalMove(MoveError),
}

/// Failure to parse a piece identifier, side or direction token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    InvalidSide,
    InvalidKind,
    InvalidPieceId,
    InvalidDirection,
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        GameError::IllegalMove(err)
    }
}

impl core::fmt::Display for MoveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MoveError::UnknownPiece => write!(f, "Unknown piece identifier"),
            MoveError::PieceNotFound => write!(f, "Piece is not on the board"),
            MoveError::NotOwner => write!(f, "Piece does not belong to the moving side"),
            MoveError::UnsupportedDirection => write!(f, "Direction not supported for this piece"),
            MoveError::OutOfBounds => write!(f, "Target cell is outside the grid"),
            MoveError::OwnPieceAtTarget => write!(f, "Target cell holds one of the side's own pieces"),
        }
    }
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::TurnViolation => write!(f, "Not your turn"),
            GameError::IllegalMove(e) => write!(f, "Illegal move: {}", e),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::InvalidSide => write!(f, "Side must be 'A' or 'B'"),
            ParseError::InvalidKind => write!(f, "Unknown piece kind"),
            ParseError::InvalidPieceId => write!(f, "Piece identifier must look like 'A-P1'"),
            ParseError::InvalidDirection => write!(f, "Unknown direction token"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MoveError {}
#[cfg(feature = "std")]
impl std::error::Error for GameError {}
#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
