//! Networked match server: accept loop, per-connection tasks and the match
//! coordinator they report to.

pub mod broadcast;
pub mod connection;
pub mod coordinator;
pub mod registry;

use std::boxed::Box;

use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::transport::tcp::TcpTransport;

pub use connection::{serve_connection, SeatedConnection};
pub use coordinator::{GameHandle, MatchCoordinator};
pub use registry::{CapacityError, ConnectionId, Outbound, SessionRegistry};

/// Bind to `config.bind` and serve until the listener fails.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!("Server is running on {}", listener.local_addr()?);
    serve(listener, config).await
}

/// Accept connections on an already bound listener.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let (handle, _coordinator) = MatchCoordinator::spawn();
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Connection from {}", addr);
        let transport = TcpTransport::with_config(stream, config.max_frame_size, config.write_timeout);
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_connection(handle, Box::new(transport)).await {
                warn!("Connection from {} ended with an error: {}", addr, e);
            }
        });
    }
}
