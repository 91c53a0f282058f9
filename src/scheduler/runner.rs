// src/scheduler/runner.rs
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::metrics::MetricsCollector;
use crate::notify::{Delivery, Notifier};
use crate::probe::{check, ProbeResult, Prober};
use crate::tracker::{Alert, FailureTracker};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("probe task for {endpoint} did not complete: {source}")]
    ProbeTask {
        endpoint: Endpoint,
        #[source]
        source: JoinError,
    },
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub up: usize,
    pub down: usize,
    pub alerts: Vec<Alert>,
}

/// Drives the probe → track → notify cycle.
///
/// Ticks never overlap: they run inline in [`Scheduler::run`] and ticks
/// missed while one overruns the interval are skipped. Notifications are
/// detached; they are reaped at the start of each tick and drained on
/// shutdown.
pub struct Scheduler {
    endpoints: Vec<Endpoint>,
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
    tracker: FailureTracker,
    probe_timeout: Duration,
    interval: Duration,
    metrics: Option<Arc<MetricsCollector>>,
    notifications: JoinSet<Delivery>,
    ticks: u64,
}

impl Scheduler {
    pub fn new(config: &Config, prober: Arc<dyn Prober>, notifier: Arc<dyn Notifier>) -> Self {
        let endpoints = config.endpoints.clone();
        let tracker = FailureTracker::new(endpoints.iter().cloned(), config.max_tries);

        Self {
            endpoints,
            prober,
            notifier,
            tracker,
            probe_timeout: config.probe_timeout(),
            interval: config.interval(),
            metrics: None,
            notifications: JoinSet::new(),
            ticks: 0,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn tracker(&self) -> &FailureTracker {
        &self.tracker
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            endpoints = self.endpoints.len(),
            prober = self.prober.name(),
            interval_ms = self.interval.as_millis() as u64,
            timeout_ms = self.probe_timeout.as_millis() as u64,
            max_tries = self.tracker.max_tries(),
            "Starting uptime monitor"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!("Tick aborted: {}", e);
                        if let Some(metrics) = &self.metrics {
                            metrics.record_tick_error();
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Uptime monitor shutting down");
                        break;
                    }
                }
            }
        }

        let pending = self.notifications.len();
        if pending > 0 {
            info!(pending, "Waiting for in-flight notifications");
        }
        self.flush_notifications().await;
    }

    /// One probe → track → notify cycle.
    ///
    /// All probes finish before the tracker is touched, and the tracker is
    /// fully updated before any notification goes out. A probe task that
    /// dies aborts the tick with no tracker update.
    pub async fn tick(&mut self) -> Result<TickReport, TickError> {
        self.reap_notifications();
        self.ticks += 1;

        let results = self.probe_all().await?;

        let mut up = 0;
        let mut alerts = Vec::new();
        for result in &results {
            if result.alive {
                up += 1;
                debug!(endpoint = %result.endpoint, "Domain {} is up", result.endpoint);
            }

            let alert = self.tracker.record(&result.endpoint, result.alive);

            if let Some(metrics) = &self.metrics {
                let name = result.endpoint.as_str();
                metrics.record_probe(name, result.alive, result.rtt);
                metrics.update_failure_streak(name, self.tracker.count(&result.endpoint).unwrap_or(0));
            }

            alerts.extend(alert);
        }

        for alert in &alerts {
            warn!(
                endpoint = %alert.endpoint,
                failures = alert.failures,
                "Domain {} is down",
                alert.endpoint
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_alert(alert.endpoint.as_str());
            }
            self.dispatch(alert.message());
        }

        let down = results.len() - up;
        if let Some(metrics) = &self.metrics {
            metrics.record_tick(up);
        }
        debug!(tick = self.ticks, up, down, alerts = alerts.len(), "Tick complete");

        Ok(TickReport {
            tick: self.ticks,
            up,
            down,
            alerts,
        })
    }

    async fn probe_all(&self) -> Result<Vec<ProbeResult>, TickError> {
        let tasks: Vec<_> = self
            .endpoints
            .iter()
            .cloned()
            .map(|endpoint| {
                let prober = self.prober.clone();
                let timeout = self.probe_timeout;
                tokio::spawn(async move { check(prober.as_ref(), &endpoint, timeout).await })
            })
            .collect();

        let joined = futures::future::join_all(tasks).await;

        self.endpoints
            .iter()
            .zip(joined)
            .map(|(endpoint, result)| {
                result.map_err(|source| TickError::ProbeTask {
                    endpoint: endpoint.clone(),
                    source,
                })
            })
            .collect()
    }

    fn dispatch(&mut self, message: String) {
        let notifier = self.notifier.clone();
        let metrics = self.metrics.clone();

        self.notifications.spawn(async move {
            let delivery = notifier.notify(&message).await;
            if let Some(metrics) = &metrics {
                metrics.record_notification(delivery.as_str());
            }
            delivery
        });
    }

    fn reap_notifications(&mut self) {
        while let Some(joined) = self.notifications.try_join_next() {
            if let Err(e) = joined {
                error!("Notification task failed: {}", e);
            }
        }
    }

    /// Wait for every in-flight notification and return their outcomes.
    pub async fn flush_notifications(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(self.notifications.len());
        while let Some(joined) = self.notifications.join_next().await {
            match joined {
                Ok(delivery) => deliveries.push(delivery),
                Err(e) => error!("Notification task failed: {}", e),
            }
        }
        deliveries
    }
}
