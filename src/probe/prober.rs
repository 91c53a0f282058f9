// src/probe/prober.rs
use crate::endpoint::Endpoint;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout as race;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to launch ping: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("host did not answer (exit code {0:?})")]
    Unreachable(Option<i32>),

    #[error("no round-trip time in ping output")]
    MissingRtt,

    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// One reachability check against a single endpoint.
///
/// Implementations report the measured round-trip time. They may ignore
/// `timeout`; [`check`] enforces it regardless.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Duration, ProbeError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub endpoint: Endpoint,
    pub alive: bool,
    pub rtt: Option<Duration>,
}

/// Run `prober` against `endpoint`, abandoning it after `timeout`.
///
/// Never fails: errors, timeouts and answers slower than `timeout` all
/// collapse to `alive == false`.
pub async fn check(prober: &dyn Prober, endpoint: &Endpoint, timeout: Duration) -> ProbeResult {
    let outcome = race(timeout, prober.probe(endpoint, timeout))
        .await
        .unwrap_or(Err(ProbeError::Timeout(timeout)));

    let (alive, rtt) = match outcome {
        Ok(rtt) if rtt < timeout => (true, Some(rtt)),
        Ok(rtt) => {
            debug!(
                %endpoint,
                rtt_ms = rtt.as_millis() as u64,
                timeout_ms = timeout.as_millis() as u64,
                "Probe answered too slowly"
            );
            (false, Some(rtt))
        }
        Err(e) => {
            warn!(%endpoint, prober = prober.name(), error = %e, "Probe failed");
            (false, None)
        }
    };

    ProbeResult {
        endpoint: endpoint.clone(),
        alive,
        rtt,
    }
}
