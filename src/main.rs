//! linkwatch - connection outage monitor.
//!
//! Probes network reachability on a fixed cadence, debounces the noisy
//! samples into discrete outage events, and keeps a live statistics view
//! alongside append-only disruption and summary logs.

mod config;
mod monitor;
mod probe;
mod sink;

use clap::Parser;
use config::Cli;
use monitor::Monitor;
use probe::HttpProbe;
use sink::MonitorSink;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logging goes to stderr and stays quiet by default; the live
    // display owns the terminal. RUST_LOG overrides.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("linkwatch=warn")),
        )
        .init();

    let cli = Cli::parse();
    if cli.settings {
        config::print_settings();
        return Ok(());
    }
    let cfg = cli.validate()?;

    let session_start = chrono::Utc::now();
    let probe = HttpProbe::new(cfg.endpoints.clone())?;
    let sink = MonitorSink::new(&cfg.log_dir, session_start)?;

    // Ctrl+C feeds the stop channel; the loop flushes before returning,
    // so buffered events survive an interrupt.
    let (stop_tx, stop_rx) = tokio::sync::broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(());
        }
    });

    tracing::info!(
        "Starting linkwatch: checking every {:?}, flushing every {:?}",
        cfg.check_interval,
        cfg.log_interval
    );

    let mut monitor = Monitor::new(cfg, probe, sink, session_start);
    monitor.run(stop_rx).await;

    Ok(())
}
