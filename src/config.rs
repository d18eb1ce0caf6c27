use std::string::{String, ToString};

use tokio::time::Duration;

use crate::transport::tcp::{DEFAULT_WRITE_TIMEOUT, MAX_FRAME_SIZE};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Deployment settings for the match server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub max_frame_size: u32,
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_frame_size: MAX_FRAME_SIZE,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}
