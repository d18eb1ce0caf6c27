//! Commonly used types and utilities for ease of import.

pub use crate::core::{
    legal_moves, Board, Direction, GameError, MatchEngine, MoveError, MoveOutcome, Phase, Piece,
    PieceKind, Side,
};
pub use crate::player::{AiPlayer, CliPlayer, ClientNode, ClientOutcome, Player};
pub use crate::protocol::{MoveRequest, ServerMessage};
pub use crate::server::{serve_connection, GameHandle, MatchCoordinator};
pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
