// src/notify/mod.rs
mod webhook;

pub use webhook::{NotifyError, WebhookNotifier};

use async_trait::async_trait;

/// What happened to a single notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No sink configured; nothing was sent.
    Disabled,
    Failed,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Delivered => "delivered",
            Delivery::Disabled => "disabled",
            Delivery::Failed => "failed",
        }
    }
}

/// Sends alert messages to an external sink.
///
/// Failures are logged by the implementation and reported through the
/// returned [`Delivery`]; they never propagate to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Delivery;
}
