// src/main.rs
use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use uptime_monitor::{
    config,
    metrics::{start_metrics_server, MetricsRegistry},
    notify::WebhookNotifier,
    probe::create_prober,
    scheduler::Scheduler,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Config path: first argument, then UPTIME_CONFIG; neither means env + defaults only
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("UPTIME_CONFIG").ok())
        .map(PathBuf::from);

    let config = config::load_config(config_path.as_deref())?;

    init_tracing(config.debug)?;

    match &config_path {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file given, using defaults and environment"),
    }
    if config.probe_timeout() >= config.interval() {
        warn!(
            probe_timeout_ms = config.probe_timeout_ms,
            interval_ms = config.interval_ms,
            "Probe timeout is not shorter than the tick interval; overrunning ticks will be skipped"
        );
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let prober = create_prober(&config.probe);
    let notifier = WebhookNotifier::new(config.webhook()?, config.notify_timeout())?;
    if !notifier.is_enabled() {
        warn!("No webhook URL configured; alerts will only be logged");
    }

    let mut scheduler = Scheduler::new(&config, prober, Arc::new(notifier));

    if config.metrics.enabled {
        let registry = Arc::new(MetricsRegistry::new()?);
        scheduler = scheduler.with_metrics(registry.collector());

        let addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(addr, registry, config.metrics.path.clone(), shutdown_rx.clone())?;
    }

    let monitor = tokio::spawn(scheduler.run(shutdown_rx));

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    monitor.await?;

    info!("Uptime monitor stopped");
    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "uptime_monitor=debug,hyper=info"
    } else {
        "uptime_monitor=info,hyper=warn"
    };

    // RUST_LOG, when set, replaces the defaults entirely
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
