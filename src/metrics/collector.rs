// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Probe metrics
    pub probes_total: IntCounterVec,
    pub probe_rtt_seconds: HistogramVec,
    pub endpoint_up: IntGaugeVec,
    pub failure_streak: IntGaugeVec,

    // Alert metrics
    pub alerts_total: IntCounterVec,
    pub notifications_total: IntCounterVec,

    // Scheduler metrics
    pub ticks_total: IntCounter,
    pub tick_errors_total: IntCounter,
    pub endpoints_up: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let probes_total = IntCounterVec::new(
            Opts::new("uptime_probes_total", "Total number of probes"),
            &["endpoint", "result"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_rtt_seconds = HistogramVec::new(
            HistogramOpts::new("uptime_probe_rtt_seconds", "Measured probe round-trip time")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(probe_rtt_seconds.clone()))?;

        let endpoint_up = IntGaugeVec::new(
            Opts::new(
                "uptime_endpoint_up",
                "Result of the last probe (1=up, 0=down)",
            ),
            &["endpoint"],
        )?;
        registry.register(Box::new(endpoint_up.clone()))?;

        let failure_streak = IntGaugeVec::new(
            Opts::new(
                "uptime_failure_streak",
                "Consecutive failed probes since the last success or alert",
            ),
            &["endpoint"],
        )?;
        registry.register(Box::new(failure_streak.clone()))?;

        let alerts_total = IntCounterVec::new(
            Opts::new("uptime_alerts_total", "Total alerts raised"),
            &["endpoint"],
        )?;
        registry.register(Box::new(alerts_total.clone()))?;

        let notifications_total = IntCounterVec::new(
            Opts::new(
                "uptime_notifications_total",
                "Notification attempts by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(notifications_total.clone()))?;

        let ticks_total = IntCounter::new("uptime_ticks_total", "Completed scheduler ticks")?;
        registry.register(Box::new(ticks_total.clone()))?;

        let tick_errors_total =
            IntCounter::new("uptime_tick_errors_total", "Ticks aborted by an internal error")?;
        registry.register(Box::new(tick_errors_total.clone()))?;

        let endpoints_up = IntGauge::new("uptime_endpoints_up", "Endpoints up on the last tick")?;
        registry.register(Box::new(endpoints_up.clone()))?;

        Ok(Self {
            probes_total,
            probe_rtt_seconds,
            endpoint_up,
            failure_streak,
            alerts_total,
            notifications_total,
            ticks_total,
            tick_errors_total,
            endpoints_up,
        })
    }

    pub fn record_probe(&self, endpoint: &str, alive: bool, rtt: Option<Duration>) {
        let result = if alive { "up" } else { "down" };
        self.probes_total
            .with_label_values(&[endpoint, result])
            .inc();
        self.endpoint_up
            .with_label_values(&[endpoint])
            .set(if alive { 1 } else { 0 });

        if let Some(rtt) = rtt {
            self.probe_rtt_seconds
                .with_label_values(&[endpoint])
                .observe(rtt.as_secs_f64());
        }
    }

    pub fn update_failure_streak(&self, endpoint: &str, count: u32) {
        self.failure_streak
            .with_label_values(&[endpoint])
            .set(count as i64);
    }

    pub fn record_alert(&self, endpoint: &str) {
        self.alerts_total.with_label_values(&[endpoint]).inc();
    }

    pub fn record_notification(&self, outcome: &str) {
        self.notifications_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_tick(&self, up: usize) {
        self.ticks_total.inc();
        self.endpoints_up.set(up as i64);
    }

    pub fn record_tick_error(&self) {
        self.tick_errors_total.inc();
    }
}
