//! The single task that owns the match.
//!
//! Connection tasks never touch `MatchEngine` or `SessionRegistry`; they send
//! `Command`s through a `GameHandle`. Commands are handled one at a time in
//! arrival order, so joins, leaves and moves never interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::{Board, MatchEngine, MatchState, MoveOutcome, Side};
use crate::protocol::{MoveRequest, ServerMessage, MSG_NOT_YOUR_TURN};

use super::broadcast::{notify, notify_all, notify_side};
use super::registry::{CapacityError, ConnectionId, Outbox, SessionRegistry};

#[derive(Debug)]
pub enum Command {
    Join {
        connection: ConnectionId,
        outbox: Outbox,
        reply: oneshot::Sender<Result<Side, CapacityError>>,
    },
    Leave {
        connection: ConnectionId,
    },
    Move {
        connection: ConnectionId,
        request: MoveRequest,
        reply_to: Outbox,
    },
    Snapshot {
        reply: oneshot::Sender<MatchState>,
    },
}

/// Cloneable entry point to the coordinator.
#[derive(Clone)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<Command>,
    next_id: Arc<AtomicU64>,
}

impl GameHandle {
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn send(&self, command: Command) -> anyhow::Result<()> {
        self.tx
            .send(command)
            .map_err(|_| anyhow::anyhow!("Match coordinator has stopped"))
    }

    /// Ask for a seat. The outer error means the coordinator is gone.
    pub async fn join(
        &self,
        connection: ConnectionId,
        outbox: Outbox,
    ) -> anyhow::Result<Result<Side, CapacityError>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Join {
            connection,
            outbox,
            reply,
        })?;
        rx.await
            .map_err(|_| anyhow::anyhow!("Match coordinator dropped the join request"))
    }

    pub fn leave(&self, connection: ConnectionId) -> anyhow::Result<()> {
        self.send(Command::Leave { connection })
    }

    /// Queue a move. Any reply arrives through the outboxes.
    pub fn submit_move(
        &self,
        connection: ConnectionId,
        request: MoveRequest,
        reply_to: Outbox,
    ) -> anyhow::Result<()> {
        self.send(Command::Move {
            connection,
            request,
            reply_to,
        })
    }

    /// Current match state, as seen after every earlier command.
    pub async fn snapshot(&self) -> anyhow::Result<MatchState> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await
            .map_err(|_| anyhow::anyhow!("Match coordinator dropped the snapshot request"))
    }
}

pub struct MatchCoordinator {
    engine: MatchEngine,
    registry: SessionRegistry,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl MatchCoordinator {
    pub fn new() -> (Self, GameHandle) {
        Self::with_engine(MatchEngine::new())
    }

    /// Coordinator starting from an existing engine (custom positions).
    pub fn with_engine(engine: MatchEngine) -> (Self, GameHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            engine,
            registry: SessionRegistry::new(),
            rx,
        };
        let handle = GameHandle {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (coordinator, handle)
    }

    /// Start the coordinator on the current runtime.
    pub fn spawn() -> (GameHandle, JoinHandle<()>) {
        Self::spawn_with(MatchEngine::new())
    }

    pub fn spawn_with(engine: MatchEngine) -> (GameHandle, JoinHandle<()>) {
        let (coordinator, handle) = Self::with_engine(engine);
        (handle, tokio::spawn(coordinator.run()))
    }

    /// Process commands until every `GameHandle` is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        info!("Match coordinator stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Join {
                connection,
                outbox,
                reply,
            } => {
                let result = self.join(connection, outbox);
                if reply.send(result).is_err() {
                    // the connection task gave up waiting; undo the seat
                    self.leave(connection);
                }
            }
            Command::Leave { connection } => self.leave(connection),
            Command::Move {
                connection,
                request,
                reply_to,
            } => self.apply_move(connection, &request, &reply_to),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.state());
            }
        }
    }

    fn join(&mut self, connection: ConnectionId, outbox: Outbox) -> Result<Side, CapacityError> {
        let side = match self.registry.join(connection, outbox) {
            Ok(side) => side,
            Err(e) => {
                warn!("Connection {} refused: game is full", connection);
                return Err(e);
            }
        };
        info!(
            "Player connected: {}, Total players: {}",
            side,
            self.registry.seated_count()
        );
        notify_side(
            &self.registry,
            side,
            ServerMessage::init(side, self.engine.board()),
        );

        if self.registry.is_full() && self.engine.start() {
            let turn = self.engine.current_turn();
            notify_all(&self.registry, &ServerMessage::start(turn));
            // a resumed match: the newcomer only saw the board, not the turn
            if *self.engine.board() != Board::initial() {
                info!("Match resumed, {} to move", turn);
                notify_all(&self.registry, &ServerMessage::update(self.engine.board(), turn));
            } else {
                info!("Both seats filled, {} to move", turn);
            }
        }
        Ok(side)
    }

    fn leave(&mut self, connection: ConnectionId) {
        let Some(side) = self.registry.leave(connection) else {
            return;
        };
        let remaining = self.registry.seated_count();
        info!(
            "Player {} disconnected, remaining players: {}",
            side, remaining
        );
        if remaining == 0 {
            self.engine.reset();
            info!("Game reset. Ready for new game.");
        } else {
            self.engine.pause();
        }
    }

    fn apply_move(&mut self, connection: ConnectionId, request: &MoveRequest, reply_to: &Outbox) {
        let Some(side) = self.registry.side_of(connection) else {
            warn!("Move from unseated connection {}", connection);
            notify(reply_to, ServerMessage::error(MSG_NOT_YOUR_TURN));
            return;
        };
        info!(
            "Received move from player: {}, Current turn: {}",
            side,
            self.engine.current_turn()
        );

        match self
            .engine
            .apply_move(side, &request.character, &request.direction)
        {
            Err(e) => {
                info!(
                    "Rejected {} {} from player {}: {}",
                    request.character, request.direction, side, e
                );
                notify(reply_to, ServerMessage::rejected(&e));
            }
            Ok(MoveOutcome::Continue {
                board,
                current_turn,
            }) => {
                notify_all(&self.registry, &ServerMessage::update(&board, current_turn));
                info!("Turn switched to: {}", current_turn);
            }
            Ok(MoveOutcome::Won { board, winner }) => {
                notify_all(&self.registry, &ServerMessage::update(&board, winner));
                notify_all(&self.registry, &ServerMessage::game_over(winner));
                info!("Player {} wins", winner);
                self.engine.reset();
                self.registry.release_all();
                info!("Game reset. Ready for new game.");
            }
        }
    }
}
