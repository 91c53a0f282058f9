// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use uptime_monitor::notify::{Delivery, Notifier};
use uptime_monitor::probe::{ProbeError, Prober};
use uptime_monitor::Endpoint;

/// Answers from a per-endpoint script; endpoints without a script (or with
/// an exhausted one) are up.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<Endpoint, VecDeque<bool>>>,
    always_down: Vec<Endpoint>,
    hang: Vec<Endpoint>,
    panic_on: Vec<Endpoint>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, endpoint: &str, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(Endpoint::from(endpoint), outcomes.into_iter().collect());
        self
    }

    pub fn always_down(mut self, endpoint: &str) -> Self {
        self.always_down.push(Endpoint::from(endpoint));
        self
    }

    pub fn hang(mut self, endpoint: &str) -> Self {
        self.hang.push(Endpoint::from(endpoint));
        self
    }

    pub fn panic_on(mut self, endpoint: &str) -> Self {
        self.panic_on.push(Endpoint::from(endpoint));
        self
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, endpoint: &Endpoint, _timeout: Duration) -> Result<Duration, ProbeError> {
        if self.panic_on.contains(endpoint) {
            panic!("scripted probe panic for {}", endpoint);
        }
        if self.hang.contains(endpoint) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }

        let alive = if self.always_down.contains(endpoint) {
            false
        } else {
            self.scripts
                .lock()
                .unwrap()
                .get_mut(endpoint)
                .and_then(|script| script.pop_front())
                .unwrap_or(true)
        };

        if alive {
            Ok(Duration::from_millis(1))
        } else {
            Err(ProbeError::Unreachable(Some(1)))
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Delivery {
        self.messages.lock().unwrap().push(message.to_string());
        Delivery::Delivered
    }
}
