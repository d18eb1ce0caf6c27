//! JSON messages exchanged between the server and its two clients.

use std::string::{String, ToString};
use std::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::core::{Board, GameError, Piece, Side, CELL_COUNT};

pub const MSG_GAME_FULL: &str = "Game is already full.";
pub const MSG_NOT_YOUR_TURN: &str = "Not your turn!";
pub const MSG_INVALID_MOVE: &str = "Invalid move!";
pub const MSG_INVALID_JSON: &str = "Invalid JSON format.";

/// The board as sent on the wire: 25 entries, `""` for an empty cell.
pub type CellSequence = Vec<String>;

/// Messages pushed from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once, to the joining connection only.
    #[serde(rename_all = "camelCase")]
    Init { player_id: Side, board: CellSequence },
    /// Both seats are filled.
    Start { message: String },
    /// Board after an accepted move, and who moves next.
    #[serde(rename_all = "camelCase")]
    Update {
        board: CellSequence,
        current_turn: Side,
    },
    /// The match ended.
    GameOver { message: String },
    /// A request was refused.
    Error { message: String },
}

impl ServerMessage {
    pub fn init(side: Side, board: &Board) -> Self {
        ServerMessage::Init {
            player_id: side,
            board: cell_sequence(board),
        }
    }

    /// Both seats are filled and `first` is to move. A fresh match always
    /// names A; a resumed one names whoever was to move when it paused.
    pub fn start(first: Side) -> Self {
        ServerMessage::Start {
            message: std::format!("Game Start! Player {} begins.", first),
        }
    }

    pub fn update(board: &Board, current_turn: Side) -> Self {
        ServerMessage::Update {
            board: cell_sequence(board),
            current_turn,
        }
    }

    pub fn game_over(winner: Side) -> Self {
        ServerMessage::GameOver {
            message: std::format!("Player {} wins!", winner),
        }
    }

    pub fn error(message: &str) -> Self {
        ServerMessage::Error {
            message: message.to_string(),
        }
    }

    /// Error reply for a rejected move.
    pub fn rejected(err: &GameError) -> Self {
        match err {
            GameError::TurnViolation => Self::error(MSG_NOT_YOUR_TURN),
            GameError::IllegalMove(_) => Self::error(MSG_INVALID_MOVE),
        }
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    pub fn decode(frame: &str) -> anyhow::Result<Self> {
        serde_json::from_str(frame).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}

/// A move submitted by a client: `{"character": "A-P1", "move": "Forward"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub character: String,
    #[serde(rename = "move")]
    pub direction: String,
}

impl MoveRequest {
    pub fn new(character: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            direction: direction.into(),
        }
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    pub fn decode(frame: &str) -> anyhow::Result<Self> {
        serde_json::from_str(frame).map_err(|e| anyhow::anyhow!("Malformed move request: {}", e))
    }
}

pub fn cell_sequence(board: &Board) -> CellSequence {
    board
        .cells()
        .iter()
        .map(|c| c.map(|p| p.to_string()).unwrap_or_default())
        .collect()
}

/// Rebuild a board from a received cell sequence.
pub fn board_from_cells(cells: &[String]) -> anyhow::Result<Board> {
    if cells.len() != CELL_COUNT {
        return Err(anyhow::anyhow!(
            "Board must have {} cells, got {}",
            CELL_COUNT,
            cells.len()
        ));
    }
    let mut parsed = [None; CELL_COUNT];
    for (slot, cell) in parsed.iter_mut().zip(cells) {
        if !cell.is_empty() {
            let piece: Piece = cell
                .parse()
                .map_err(|e| anyhow::anyhow!("Bad cell {:?}: {}", cell, e))?;
            *slot = Some(piece);
        }
    }
    Board::from_cells(parsed).ok_or_else(|| anyhow::anyhow!("Board holds a piece twice"))
}
