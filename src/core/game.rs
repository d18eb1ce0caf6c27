use super::{
    board::Board,
    common::{GameError, MoveError},
    piece::{Piece, Side},
    rules::{target_cell, Direction},
};

/// Lifecycle of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than two seats are filled.
    Waiting,
    /// Both seats filled, moves are accepted.
    InProgress,
    /// A side has no pieces left. Terminal until `reset`.
    Over,
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Play continues with `current_turn` to move.
    Continue { board: Board, current_turn: Side },
    /// The move removed the opponent's last piece.
    Won { board: Board, winner: Side },
}

impl MoveOutcome {
    pub fn board(&self) -> &Board {
        match self {
            MoveOutcome::Continue { board, .. } | MoveOutcome::Won { board, .. } => board,
        }
    }
}

/// Snapshot of everything the engine holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    pub board: Board,
    pub current_turn: Side,
    pub phase: Phase,
    pub winner: Option<Side>,
}

impl MatchState {
    pub const fn initial() -> Self {
        Self {
            board: Board::initial(),
            current_turn: Side::A,
            phase: Phase::Waiting,
            winner: None,
        }
    }
}

/// Authoritative match state. All board mutation goes through `apply_move`.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    state: MatchState,
}

impl MatchEngine {
    /// Fresh match: initial layout, A to move, waiting for players.
    pub fn new() -> Self {
        Self {
            state: MatchState::initial(),
        }
    }

    /// Restore an engine from a snapshot.
    pub fn from_state(state: MatchState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn current_turn(&self) -> Side {
        self.state.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Winner of a finished match, until the next `reset`.
    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    /// Both seats are filled. Returns `true` if the phase changed.
    pub fn start(&mut self) -> bool {
        if self.state.phase == Phase::Waiting {
            self.state.phase = Phase::InProgress;
            return true;
        }
        false
    }

    /// A seat emptied mid-match. Board and turn are kept.
    pub fn pause(&mut self) {
        if self.state.phase == Phase::InProgress {
            self.state.phase = Phase::Waiting;
        }
    }

    /// Back to the initial layout with A to move.
    pub fn reset(&mut self) {
        self.state = MatchState::initial();
    }

    /// Validate and apply a move given as wire strings.
    ///
    /// Either the move fully commits or nothing changes.
    pub fn apply_move(
        &mut self,
        side: Side,
        piece_id: &str,
        token: &str,
    ) -> Result<MoveOutcome, GameError> {
        self.check_turn(side)?;
        let piece: Piece = piece_id.parse().map_err(|_| MoveError::UnknownPiece)?;
        self.check_ownership(side, piece)?;
        let direction: Direction = token.parse().map_err(|_| MoveError::UnsupportedDirection)?;
        self.commit(side, piece, direction)
    }

    /// Typed variant of `apply_move`.
    pub fn apply(
        &mut self,
        side: Side,
        piece: Piece,
        direction: Direction,
    ) -> Result<MoveOutcome, GameError> {
        self.check_turn(side)?;
        self.check_ownership(side, piece)?;
        self.commit(side, piece, direction)
    }

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.state.phase != Phase::InProgress || side != self.state.current_turn {
            return Err(GameError::TurnViolation);
        }
        Ok(())
    }

    fn check_ownership(&self, side: Side, piece: Piece) -> Result<(), MoveError> {
        if self.state.board.position_of(piece).is_none() {
            return Err(MoveError::PieceNotFound);
        }
        if !piece.belongs_to(side) {
            return Err(MoveError::NotOwner);
        }
        Ok(())
    }

    fn commit(
        &mut self,
        side: Side,
        piece: Piece,
        direction: Direction,
    ) -> Result<MoveOutcome, GameError> {
        let (from, to) = target_cell(&self.state.board, piece, direction)?;
        if self.state.board.get(to).is_some_and(|p| p.belongs_to(side)) {
            return Err(MoveError::OwnPieceAtTarget.into());
        }

        // capture-by-overwrite: an opposing piece on `to` simply disappears
        self.state.board.relocate(from, to);

        if !self.state.board.has_pieces(side.opponent()) {
            self.state.phase = Phase::Over;
            self.state.winner = Some(side);
            return Ok(MoveOutcome::Won {
                board: self.state.board,
                winner: side,
            });
        }

        self.state.current_turn = side.opponent();
        Ok(MoveOutcome::Continue {
            board: self.state.board,
            current_turn: self.state.current_turn,
        })
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
