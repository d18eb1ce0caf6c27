use std::boxed::Box;
use std::string::String;
use std::vec;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::transport::{FrameReader, FrameWriter, Transport};

/// Default timeout for a single frame write (30 seconds).
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum frame size (64 KiB). Real messages are a few hundred bytes.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// TCP connection carrying frames as a 4-byte big-endian length followed by
/// UTF-8 JSON.
///
/// Reads never time out: a seat may hold the turn as long as it likes.
pub struct TcpTransport {
    reader: TcpFrameReader,
    writer: TcpFrameWriter,
}

pub struct TcpFrameReader {
    half: OwnedReadHalf,
    max_frame_size: u32,
}

pub struct TcpFrameWriter {
    half: OwnedWriteHalf,
    max_frame_size: u32,
    write_timeout: Duration,
    closed: bool,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, MAX_FRAME_SIZE, DEFAULT_WRITE_TIMEOUT)
    }

    pub fn with_config(stream: TcpStream, max_frame_size: u32, write_timeout: Duration) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: TcpFrameReader {
                half: read,
                max_frame_size,
            },
            writer: TcpFrameWriter {
                half: write,
                max_frame_size,
                write_timeout,
                closed: false,
            },
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("Read error: {}", e),
    }
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("Write error: {}", e),
    }
}

#[async_trait::async_trait]
impl FrameReader for TcpFrameReader {
    async fn recv(&mut self) -> anyhow::Result<String> {
        let mut len_buf = [0u8; 4];
        self.half.read_exact(&mut len_buf).await.map_err(read_error)?;

        let len = u32::from_be_bytes(len_buf);
        if len > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }

        let mut buf = vec![0u8; len as usize];
        self.half.read_exact(&mut buf).await.map_err(read_error)?;

        String::from_utf8(buf).map_err(|e| anyhow::anyhow!("Frame is not valid UTF-8: {}", e))
    }
}

#[async_trait::async_trait]
impl FrameWriter for TcpFrameWriter {
    async fn send(&mut self, frame: &str) -> anyhow::Result<()> {
        if self.closed {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        let data = frame.as_bytes();
        if data.len() as u64 > self.max_frame_size as u64 {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            ));
        }

        let write_timeout = self.write_timeout;
        let half = &mut self.half;
        let send_op = async move {
            let len = (data.len() as u32).to_be_bytes();
            half.write_all(&len).await.map_err(write_error)?;
            half.write_all(data).await.map_err(write_error)?;
            anyhow::Ok(())
        };

        timeout(write_timeout, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", write_timeout))?
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.half.shutdown().await.map_err(write_error)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
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
