//! Client-side players.
//!
//! - AiPlayer: picks a random legal move, preferring captures
//! - CliPlayer: reads moves from stdin
//! - ClientNode: speaks the protocol and asks a Player when it is its turn

use rand::rngs::SmallRng;

use crate::core::{Board, Side};
use crate::protocol::MoveRequest;

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Choose a move for `side`. `None` means the player has nothing to play.
    fn select_move(&mut self, rng: &mut SmallRng, board: &Board, side: Side) -> Option<MoveRequest>;

    /// The server refused the last move.
    fn handle_rejection(&mut self, _message: &str) {}

    /// A new board arrived from the server.
    fn handle_update(&mut self, _board: &Board, _current_turn: Side) {}
}

pub mod ai;
pub use ai::AiPlayer;

pub mod cli;
pub use cli::CliPlayer;

pub mod node;
pub use node::{ClientNode, ClientOutcome};
