use std::boxed::Box;

use log::{debug, info, warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::core::Side;
use crate::protocol::{MoveRequest, ServerMessage, MSG_GAME_FULL, MSG_INVALID_JSON};
use crate::transport::{FrameReader, FrameWriter, Transport};

use super::coordinator::GameHandle;
use super::registry::{ConnectionId, Outbound, Outbox};

/// Drive one client connection from accept to close.
pub async fn serve_connection(
    handle: GameHandle,
    transport: Box<dyn Transport>,
) -> anyhow::Result<()> {
    match SeatedConnection::join(handle, transport).await? {
        Some(seated) => seated.run().await,
        None => Ok(()),
    }
}

/// A connection that holds a seat. Messages queued for it wait in its outbox
/// until `run` starts writing.
pub struct SeatedConnection {
    handle: GameHandle,
    connection: ConnectionId,
    side: Side,
    reader: Box<dyn FrameReader>,
    writer: Box<dyn FrameWriter>,
    outbox: Outbox,
    inbox: UnboundedReceiver<Outbound>,
}

impl SeatedConnection {
    /// Ask the coordinator for a seat. A refused connection is told the game
    /// is full, closed, and `None` is returned.
    pub async fn join(
        handle: GameHandle,
        transport: Box<dyn Transport>,
    ) -> anyhow::Result<Option<Self>> {
        let connection = handle.next_connection_id();
        let (reader, mut writer) = transport.split();
        let (outbox, inbox) = unbounded_channel();

        let side = match handle.join(connection, outbox.clone()).await? {
            Ok(side) => side,
            Err(e) => {
                info!("Connection {} refused: {}", connection, e);
                let frame = ServerMessage::error(MSG_GAME_FULL).encode()?;
                writer.send(&frame).await?;
                writer.close().await?;
                return Ok(None);
            }
        };
        debug!("Connection {} seated as player {}", connection, side);

        Ok(Some(Self {
            handle,
            connection,
            side,
            reader,
            writer,
            outbox,
            inbox,
        }))
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Relay inbound moves to the coordinator while a writer task drains the
    /// outbox. Returns once the peer goes away or the seat is closed.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            handle,
            connection,
            side,
            mut reader,
            writer,
            outbox,
            inbox,
        } = self;

        let mut writer_task = tokio::spawn(drain_outbox(connection, inbox, writer));
        let mut writer_done = false;

        loop {
            tokio::select! {
                frame = reader.recv() => {
                    let frame = match frame {
                        Ok(frame) => frame,
                        Err(e) => {
                            info!("Connection {} (player {}) closed: {}", connection, side, e);
                            break;
                        }
                    };
                    match MoveRequest::decode(&frame) {
                        Ok(request) => handle.submit_move(connection, request, outbox.clone())?,
                        Err(e) => {
                            warn!("Invalid JSON format received from player {}: {}", side, e);
                            let _ = outbox.send(Outbound::Message(ServerMessage::error(MSG_INVALID_JSON)));
                        }
                    }
                }
                _ = &mut writer_task => {
                    writer_done = true;
                    break;
                }
            }
        }

        handle.leave(connection)?;
        if !writer_done {
            let _ = outbox.send(Outbound::Close);
            drop(outbox);
            writer_task
                .await
                .map_err(|e| anyhow::anyhow!("Writer task failed: {}", e))?;
        }
        Ok(())
    }
}

/// Write queued messages in order until told to close or the peer is gone.
async fn drain_outbox(
    connection: ConnectionId,
    mut inbox: UnboundedReceiver<Outbound>,
    mut writer: Box<dyn FrameWriter>,
) {
    while let Some(outbound) = inbox.recv().await {
        let message = match outbound {
            Outbound::Message(message) => message,
            Outbound::Close => break,
        };
        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Connection {}: {}", connection, e);
                continue;
            }
        };
        if let Err(e) = writer.send(&frame).await {
            warn!("Connection {}: delivery failed: {}", connection, e);
            break;
        }
    }
    if let Err(e) = writer.close().await {
        debug!("Connection {}: close failed: {}", connection, e);
    }
}
