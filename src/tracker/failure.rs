// src/tracker/failure.rs
use crate::endpoint::Endpoint;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::warn;

/// Raised when an endpoint fails `max_tries` probes in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub endpoint: Endpoint,
    pub failures: u32,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn message(&self) -> String {
        format!("Domain {} is down", self.endpoint)
    }
}

/// Consecutive-failure counts for a fixed set of endpoints.
///
/// A success resets the streak. Reaching the threshold produces one
/// [`Alert`] and also resets the streak, so a host that stays down alerts
/// again only after another `max_tries` failures.
#[derive(Debug, Clone)]
pub struct FailureTracker {
    counts: BTreeMap<Endpoint, u32>,
    max_tries: u32,
}

impl FailureTracker {
    pub fn new<I>(endpoints: I, max_tries: u32) -> Self
    where
        I: IntoIterator<Item = Endpoint>,
    {
        Self {
            counts: endpoints.into_iter().map(|e| (e, 0)).collect(),
            max_tries: max_tries.max(1),
        }
    }

    /// Apply one probe outcome. Unknown endpoints are ignored.
    pub fn record(&mut self, endpoint: &Endpoint, alive: bool) -> Option<Alert> {
        let Some(count) = self.counts.get_mut(endpoint) else {
            warn!(%endpoint, "Ignoring result for unconfigured endpoint");
            return None;
        };

        if alive {
            *count = 0;
            return None;
        }

        *count += 1;
        if *count < self.max_tries {
            return None;
        }

        let failures = *count;
        *count = 0;
        Some(Alert {
            endpoint: endpoint.clone(),
            failures,
            raised_at: Utc::now(),
        })
    }

    pub fn count(&self, endpoint: &Endpoint) -> Option<u32> {
        self.counts.get(endpoint).copied()
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Endpoint, u32)> {
        self.counts.iter().map(|(e, c)| (e, *c))
    }
}
