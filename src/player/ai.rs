use std::vec::Vec;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::core::{legal_moves, Board, LegalMove, Side};
use crate::protocol::MoveRequest;

use super::Player;

/// Random mover that always takes a capture when one is available.
#[derive(Debug, Default)]
pub struct AiPlayer;

impl AiPlayer {
    pub fn new() -> Self {
        Self
    }

    /// The move the AI would make, before wire encoding.
    pub fn choose(rng: &mut SmallRng, board: &Board, side: Side) -> Option<LegalMove> {
        let moves: Vec<LegalMove> = legal_moves(board, side).collect();
        let captures: Vec<LegalMove> = moves
            .iter()
            .copied()
            .filter(|m| board.get(m.to).is_some())
            .collect();
        if captures.is_empty() {
            moves.choose(rng).copied()
        } else {
            captures.choose(rng).copied()
        }
    }
}

impl Player for AiPlayer {
    fn select_move(&mut self, rng: &mut SmallRng, board: &Board, side: Side) -> Option<MoveRequest> {
        Self::choose(rng, board, side)
            .map(|m| MoveRequest::new(m.piece.to_string(), m.direction.as_str()))
    }
}
