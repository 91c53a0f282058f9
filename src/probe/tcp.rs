// src/probe/tcp.rs
use super::prober::{ProbeError, Prober};
use crate::endpoint::Endpoint;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// Reachability by TCP handshake; the round-trip time is the connect time.
pub struct TcpProber {
    port: u16,
}

impl TcpProber {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, endpoint: &Endpoint, _timeout: Duration) -> Result<Duration, ProbeError> {
        let start = Instant::now();
        TcpStream::connect((endpoint.as_str(), self.port))
            .await
            .map_err(ProbeError::Connect)?;
        Ok(start.elapsed())
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}
