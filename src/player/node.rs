use std::boxed::Box;
use std::string::String;

use log::{debug, info, warn};
use rand::rngs::SmallRng;

use crate::core::{Board, Side};
use crate::player::Player;
use crate::protocol::{board_from_cells, ServerMessage, MSG_GAME_FULL, MSG_NOT_YOUR_TURN};
use crate::transport::Transport;

/// How a client's session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    Won,
    Lost,
    /// The server had no free seat.
    Refused,
    /// The player stopped (no move to offer, or the move limit was hit).
    Abandoned,
    /// The connection dropped before the match finished.
    Disconnected,
}

/// Client side of a match: tracks what the server reports and submits the
/// player's moves when it is our turn.
pub struct ClientNode {
    player: Box<dyn Player>,
    transport: Box<dyn Transport>,
    side: Option<Side>,
    board: Board,
    current_turn: Side,
    started: bool,
    moves_sent: usize,
    max_moves: Option<usize>,
}

impl ClientNode {
    pub fn new(player: Box<dyn Player>, transport: Box<dyn Transport>) -> Self {
        Self {
            player,
            transport,
            side: None,
            board: Board::initial(),
            current_turn: Side::A,
            started: false,
            moves_sent: 0,
            max_moves: None,
        }
    }

    /// Give up after sending `limit` moves.
    pub fn with_move_limit(mut self, limit: usize) -> Self {
        self.max_moves = Some(limit);
        self
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves_sent(&self) -> usize {
        self.moves_sent
    }

    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<ClientOutcome> {
        loop {
            let frame = match self.transport.recv().await {
                Ok(frame) => frame,
                Err(e) => {
                    info!("Connection closed: {}", e);
                    return Ok(ClientOutcome::Disconnected);
                }
            };
            let message = ServerMessage::decode(&frame)?;
            debug!("Received {:?}", message);

            match message {
                ServerMessage::Init { player_id, board } => {
                    self.side = Some(player_id);
                    self.board = board_from_cells(&board)?;
                    info!("Seated as player {}", player_id);
                }
                ServerMessage::Start { message } => {
                    info!("{}", message);
                    self.started = true;
                    // a resumed match announces the turn in the update that follows
                    if self.board != Board::initial() {
                        continue;
                    }
                }
                ServerMessage::Update {
                    board,
                    current_turn,
                } => {
                    self.board = board_from_cells(&board)?;
                    self.current_turn = current_turn;
                    self.player.handle_update(&self.board, current_turn);
                }
                ServerMessage::GameOver { message } => {
                    info!("{}", message);
                    return Ok(self.outcome_from(&message));
                }
                ServerMessage::Error { message } => {
                    if message == MSG_GAME_FULL {
                        return Ok(ClientOutcome::Refused);
                    }
                    warn!("Server refused: {}", message);
                    self.player.handle_rejection(&message);
                    // our view of the turn is stale; wait for the next update
                    if message == MSG_NOT_YOUR_TURN || !self.my_turn() {
                        continue;
                    }
                }
            }

            if self.my_turn() {
                if self.max_moves.is_some_and(|limit| self.moves_sent >= limit) {
                    info!("Move limit reached after {} moves", self.moves_sent);
                    return Ok(ClientOutcome::Abandoned);
                }
                if !self.play(rng).await? {
                    return Ok(ClientOutcome::Abandoned);
                }
            }
        }
    }

    fn my_turn(&self) -> bool {
        self.started && self.side == Some(self.current_turn)
    }

    /// Ask the player for a move and submit it. `false` if it had none.
    async fn play(&mut self, rng: &mut SmallRng) -> anyhow::Result<bool> {
        let Some(side) = self.side else {
            return Ok(false);
        };
        let Some(request) = self.player.select_move(rng, &self.board, side) else {
            warn!("Player {} has no move to offer", side);
            return Ok(false);
        };
        debug!("Sending {} {}", request.character, request.direction);
        self.transport.send(&request.encode()?).await?;
        self.moves_sent += 1;
        Ok(true)
    }

    fn outcome_from(&self, message: &str) -> ClientOutcome {
        let winner: Option<String> = message
            .strip_prefix("Player ")
            .and_then(|rest| rest.strip_suffix(" wins!"))
            .map(String::from);
        match (winner.as_deref(), self.side) {
            (Some(w), Some(side)) if w == side.to_string() => ClientOutcome::Won,
            _ => ClientOutcome::Lost,
        }
    }
}
