//! Fire-and-forget delivery to seated connections.

use log::{debug, warn};

use crate::core::Side;
use crate::protocol::ServerMessage;

use super::registry::{Outbound, Outbox, SessionRegistry};

/// Queue `event` for one connection. Returns `false` if it is already gone.
pub fn notify(outbox: &Outbox, event: ServerMessage) -> bool {
    outbox.send(Outbound::Message(event)).is_ok()
}

/// Queue `event` for both seats, A first.
///
/// A seat whose connection has gone away is skipped; its `leave` will follow.
pub fn notify_all(registry: &SessionRegistry, event: &ServerMessage) {
    for (side, seat) in registry.seats() {
        if notify(&seat.outbox, event.clone()) {
            debug!("Queued {:?} for player {}", event, side);
        } else {
            warn!("Player {} is unreachable, dropping event", side);
        }
    }
}

/// Queue `event` for the connection seated as `side`, if any.
pub fn notify_side(registry: &SessionRegistry, side: Side, event: ServerMessage) -> bool {
    registry
        .seat(side)
        .is_some_and(|seat| notify(&seat.outbox, event))
}
