//! Pure match engine (no_std compatible).
//!
//! Board model, movement rules and the match state machine. Nothing in here
//! allocates or touches I/O.

pub mod board;
pub mod common;
pub mod config;
pub mod game;
pub mod piece;
pub mod rules;

pub use board::Board;
pub use common::{GameError, MoveError, ParseError};
pub use config::*;
pub use game::{MatchEngine, MatchState, MoveOutcome, Phase};
pub use piece::{Movement, Piece, PieceKind, Side};
pub use rules::{legal_moves, step, target_cell, Direction, LegalMove};
