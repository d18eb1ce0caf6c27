//! Framed, bidirectional text connections.
//!
//! A frame carries one JSON message. Connections can be split into a reader
//! and a writer so inbound moves and outbound broadcasts never wait on each
//! other.

use std::boxed::Box;
use std::string::String;

#[async_trait::async_trait]
pub trait FrameReader: Send {
    /// Next inbound frame. An error means the connection is gone.
    async fn recv(&mut self) -> anyhow::Result<String>;
}

#[async_trait::async_trait]
pub trait FrameWriter: Send {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()>;

    /// Flush and close the outbound side.
    async fn close(&mut self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<String>;

    /// Separate the two directions of the connection.
    fn split(self: Box<Self>) -> (Box<dyn FrameReader>, Box<dyn FrameWriter>);
}

pub mod in_memory;
pub mod tcp;
