// src/probe/mod.rs
mod icmp;
mod prober;
mod tcp;

pub use icmp::{parse_rtt, PingProber};
pub use prober::{check, ProbeError, ProbeResult, Prober};
pub use tcp::TcpProber;

use crate::config::{ProbeConfig, ProbeKind};
use std::sync::Arc;

pub fn create_prober(config: &ProbeConfig) -> Arc<dyn Prober> {
    match config.kind {
        ProbeKind::Icmp => Arc::new(PingProber::new()),
        ProbeKind::Tcp => Arc::new(TcpProber::new(config.port)),
    }
}
