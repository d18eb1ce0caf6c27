#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod core;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player;
#[cfg(feature = "std")]
pub mod prelude;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod transport;

pub use crate::core::*;
#[cfg(feature = "std")]
pub use config::ServerConfig;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use player::{AiPlayer, CliPlayer, ClientNode, ClientOutcome, Player};
#[cfg(feature = "std")]
pub use protocol::{MoveRequest, ServerMessage};
#[cfg(feature = "std")]
pub use server::{serve_connection, GameHandle, MatchCoordinator};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
