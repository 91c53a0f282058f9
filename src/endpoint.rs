// src/endpoint.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A monitored host, e.g. `google.com` or `10.0.0.7`.
///
/// Cheap to clone; probe tasks each hold their own copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(Arc<str>);

impl Endpoint {
    pub fn new(host: impl Into<Arc<str>>) -> Self {
        Self(host.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Endpoint {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

impl From<String> for Endpoint {
    fn from(host: String) -> Self {
        Self::new(host)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
