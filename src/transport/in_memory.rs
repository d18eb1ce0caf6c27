use std::boxed::Box;
use std::string::{String, ToString};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::{FrameReader, FrameWriter, Transport};

/// Connected pair of in-process transports, for tests and local games.
pub struct InMemoryTransport {
    reader: InMemoryReader,
    writer: InMemoryWriter,
}

pub struct InMemoryReader {
    rx: UnboundedReceiver<String>,
}

pub struct InMemoryWriter {
    tx: Option<UnboundedSender<String>>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (
            Self {
                reader: InMemoryReader { rx: rx1 },
                writer: InMemoryWriter { tx: Some(tx2) },
            },
            Self {
                reader: InMemoryReader { rx: rx2 },
                writer: InMemoryWriter { tx: Some(tx1) },
            },
        )
    }
}

#[async_trait::async_trait]
impl FrameReader for InMemoryReader {
    async fn recv(&mut self) -> anyhow::Result<String> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}

#[async_trait::async_trait]
impl FrameWriter for InMemoryWriter {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Transport is shut down"))?;
        tx.send(frame.to_string())
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.tx = None;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()> {
        self.writer.send(frame).await
    }

    async fn recv(&mut self) -> anyhow::Result<String> {
        self.reader.recv().await
    }

    fn split(self: Box<Self>) -> (Box<dyn FrameReader>, Box<dyn FrameWriter>) {
        (Box::new(self.reader), Box::new(self.writer))
    }
}
