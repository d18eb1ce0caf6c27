//! Seat bookkeeping: which connection plays which side.

use core::fmt;

use tokio::sync::mpsc::UnboundedSender;

use crate::core::Side;
use crate::protocol::{ServerMessage, MSG_GAME_FULL};

/// Process-unique id handed to every accepted connection.
pub type ConnectionId = u64;

/// What the coordinator pushes to a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Flush what is queued and close the connection.
    Close,
}

pub type Outbox = UnboundedSender<Outbound>;

/// Both seats are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError;

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MSG_GAME_FULL)
    }
}

impl std::error::Error for CapacityError {}

/// A side bound to one live connection.
#[derive(Debug)]
pub struct Seat {
    pub connection: ConnectionId,
    pub(crate) outbox: Outbox,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    seats: [Option<Seat>; 2],
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `connection` on the first vacant side, A before B.
    pub fn join(&mut self, connection: ConnectionId, outbox: Outbox) -> Result<Side, CapacityError> {
        let side = Side::ALL
            .into_iter()
            .find(|s| self.seats[s.index()].is_none())
            .ok_or(CapacityError)?;
        self.seats[side.index()] = Some(Seat { connection, outbox });
        Ok(side)
    }

    /// Release the seat held by `connection`, if any.
    pub fn leave(&mut self, connection: ConnectionId) -> Option<Side> {
        let side = self.side_of(connection)?;
        self.seats[side.index()] = None;
        Some(side)
    }

    pub fn side_of(&self, connection: ConnectionId) -> Option<Side> {
        Side::ALL.into_iter().find(|s| {
            self.seats[s.index()]
                .as_ref()
                .is_some_and(|seat| seat.connection == connection)
        })
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.seated_count() == self.seats.len()
    }

    /// Occupied seats in seat order (A then B).
    pub fn seats(&self) -> impl Iterator<Item = (Side, &Seat)> {
        Side::ALL
            .into_iter()
            .filter_map(|s| self.seats[s.index()].as_ref().map(|seat| (s, seat)))
    }

    pub fn seat(&self, side: Side) -> Option<&Seat> {
        self.seats[side.index()].as_ref()
    }

    /// Vacate every seat, asking each connection to close.
    pub fn release_all(&mut self) {
        for slot in self.seats.iter_mut() {
            if let Some(seat) = slot.take() {
                let _ = seat.outbox.send(Outbound::Close);
            }
        }
    }
}
