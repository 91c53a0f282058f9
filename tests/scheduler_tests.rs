// tests/scheduler_tests.rs
mod common;

use common::{RecordingNotifier, ScriptedProber};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uptime_monitor::config::Config;
use uptime_monitor::metrics::MetricsRegistry;
use uptime_monitor::notify::Delivery;
use uptime_monitor::scheduler::{Scheduler, TickError};
use uptime_monitor::Endpoint;

fn config(endpoints: &[&str], max_tries: u32) -> Config {
    Config {
        endpoints: endpoints.iter().copied().map(Endpoint::from).collect(),
        max_tries,
        probe_timeout_ms: 100,
        interval_ms: 500,
        ..Config::default()
    }
}

fn ep(name: &str) -> Endpoint {
    Endpoint::from(name)
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let prober = ScriptedProber::new().script(
        "a",
        [true, true, true, false, false, false, false, true],
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = Scheduler::new(
        &config(&["a", "b", "c"], 4),
        Arc::new(prober),
        notifier.clone(),
    );

    for _ in 1..=3 {
        let report = scheduler.tick().await.unwrap();
        assert!(report.alerts.is_empty());
        assert_eq!(report.up, 3);
        for name in ["a", "b", "c"] {
            assert_eq!(scheduler.tracker().count(&ep(name)), Some(0));
        }
    }

    let report = scheduler.tick().await.unwrap();
    assert_eq!(report.tick, 4);
    assert_eq!(report.down, 1);
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(1));
    assert_eq!(scheduler.tracker().count(&ep("b")), Some(0));
    assert_eq!(scheduler.tracker().count(&ep("c")), Some(0));

    for expected in [2, 3] {
        let report = scheduler.tick().await.unwrap();
        assert!(report.alerts.is_empty());
        assert_eq!(scheduler.tracker().count(&ep("a")), Some(expected));
    }

    let report = scheduler.tick().await.unwrap();
    assert_eq!(report.tick, 7);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].endpoint, ep("a"));
    assert_eq!(report.alerts[0].failures, 4);
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(0));

    assert_eq!(scheduler.flush_notifications().await, vec![Delivery::Delivered]);
    assert_eq!(notifier.messages(), vec!["Domain a is down".to_string()]);

    let report = scheduler.tick().await.unwrap();
    assert!(report.alerts.is_empty());
    assert_eq!(scheduler.ticks(), 8);
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(0));
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_sustained_outage_alerts_every_threshold() {
    let prober = ScriptedProber::new().always_down("down.example");
    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = Scheduler::new(
        &config(&["down.example", "up.example"], 3),
        Arc::new(prober),
        notifier.clone(),
    );

    let mut alert_ticks = Vec::new();
    for _ in 0..9 {
        let report = scheduler.tick().await.unwrap();
        if !report.alerts.is_empty() {
            assert_eq!(report.alerts.len(), 1);
            alert_ticks.push(report.tick);
        }
    }

    assert_eq!(alert_ticks, vec![3, 6, 9]);
    scheduler.flush_notifications().await;
    assert_eq!(notifier.messages().len(), 3);
    assert!(notifier
        .messages()
        .iter()
        .all(|m| m == "Domain down.example is down"));
    assert_eq!(scheduler.tracker().count(&ep("up.example")), Some(0));
}

#[tokio::test]
async fn test_recovery_restarts_streak() {
    let prober = ScriptedProber::new().script("a", [false, false, true, false]);
    let mut scheduler = Scheduler::new(
        &config(&["a"], 3),
        Arc::new(prober),
        Arc::new(RecordingNotifier::default()),
    );

    scheduler.tick().await.unwrap();
    scheduler.tick().await.unwrap();
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(2));

    scheduler.tick().await.unwrap();
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(0));

    let report = scheduler.tick().await.unwrap();
    assert!(report.alerts.is_empty());
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(1));
}

#[tokio::test]
async fn test_hung_probe_only_costs_its_timeout() {
    let prober = ScriptedProber::new().hang("slow.example");
    let mut scheduler = Scheduler::new(
        &config(&["slow.example", "fast.example"], 4),
        Arc::new(prober),
        Arc::new(RecordingNotifier::default()),
    );

    let start = Instant::now();
    let report = scheduler.tick().await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(report.up, 1);
    assert_eq!(report.down, 1);
    assert_eq!(scheduler.tracker().count(&ep("slow.example")), Some(1));
    assert_eq!(scheduler.tracker().count(&ep("fast.example")), Some(0));
}

#[tokio::test]
async fn test_probe_task_panic_aborts_tick_without_tracker_update() {
    let prober = ScriptedProber::new()
        .always_down("a")
        .panic_on("b");
    let mut scheduler = Scheduler::new(
        &config(&["a", "b"], 2),
        Arc::new(prober),
        Arc::new(RecordingNotifier::default()),
    );

    let err = scheduler.tick().await.unwrap_err();
    match err {
        TickError::ProbeTask { endpoint, .. } => assert_eq!(endpoint, ep("b")),
    }
    assert_eq!(scheduler.tracker().count(&ep("a")), Some(0));
    assert_eq!(scheduler.tracker().count(&ep("b")), Some(0));
}

#[tokio::test]
async fn test_run_loop_alerts_and_stops_on_shutdown() {
    let prober = ScriptedProber::new().always_down("a");
    let notifier = Arc::new(RecordingNotifier::default());
    let registry = MetricsRegistry::new().unwrap();

    let mut cfg = config(&["a", "b"], 2);
    cfg.interval_ms = 20;
    cfg.probe_timeout_ms = 10;

    let scheduler = Scheduler::new(&cfg, Arc::new(prober), notifier.clone())
        .with_metrics(registry.collector());

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(rx));

    let deadline = Instant::now() + Duration::from_secs(5);
    while notifier.messages().len() < 2 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler stops after shutdown")
        .unwrap();

    let messages = notifier.messages();
    assert!(messages.len() >= 2);
    assert!(messages.iter().all(|m| m == "Domain a is down"));

    let text = String::from_utf8(registry.gather().unwrap()).unwrap();
    assert!(text.contains(r#"uptime_probes_total{endpoint="b",result="up"}"#));
    assert!(text.contains(r#"uptime_alerts_total{endpoint="a"}"#));
    assert!(text.contains(r#"uptime_notifications_total{outcome="delivered"}"#));
}
