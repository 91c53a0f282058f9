// src/probe/icmp.rs
use super::prober::{ProbeError, Prober};
use crate::endpoint::Endpoint;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// ICMP echo through the system `ping` binary, so no raw-socket privileges
/// are needed.
pub struct PingProber {
    program: String,
}

impl PingProber {
    pub fn new() -> Self {
        Self::with_program("ping")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(host: &str, timeout: Duration) -> Vec<String> {
        if cfg!(windows) {
            vec![
                "-n".into(),
                "1".into(),
                "-w".into(),
                timeout.as_millis().max(1).to_string(),
                host.into(),
            ]
        } else if cfg!(target_os = "macos") {
            // BSD ping takes -W in milliseconds
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                timeout.as_millis().max(1).to_string(),
                host.into(),
            ]
        } else {
            // iputils takes whole seconds
            let secs = (timeout.as_millis() + 999) / 1000;
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                secs.max(1).to_string(),
                host.into(),
            ]
        }
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Duration, ProbeError> {
        let output = Command::new(&self.program)
            .args(Self::args(endpoint.as_str(), timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::Unreachable(output.status.code()));
        }

        parse_rtt(&String::from_utf8_lossy(&output.stdout)).ok_or(ProbeError::MissingRtt)
    }

    fn name(&self) -> &'static str {
        "icmp"
    }
}

/// Extract the reply time from ping output (`time=12.3 ms`, `time<1ms`).
pub fn parse_rtt(output: &str) -> Option<Duration> {
    let start = output
        .find("time=")
        .or_else(|| output.find("time<"))?
        + "time=".len();

    let number: String = output[start..]
        .chars()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let millis: f64 = number.parse().ok()?;
    if !millis.is_finite() || millis < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(millis / 1000.0).ok()
}
