//! Monitor driver: the probe -> detect -> aggregate -> flush loop.

mod detector;
mod stats;

pub use detector::{OutageDetector, OutageEvent};
pub use stats::{StatsAggregator, StatsSnapshot};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::config::MonitorConfig;
use crate::probe::Probe;
use crate::sink::{LinkStatus, Sink};

/// The monitoring loop. One logical thread owns the detector and
/// aggregator exclusively, so no locking is needed anywhere.
pub struct Monitor<P: Probe, S: Sink> {
    cfg: MonitorConfig,
    probe: P,
    sink: S,
    detector: OutageDetector,
    aggregator: StatsAggregator,
    pending: Vec<OutageEvent>,
}

impl<P: Probe, S: Sink> Monitor<P, S> {
    pub fn new(cfg: MonitorConfig, probe: P, sink: S, session_start: DateTime<Utc>) -> Self {
        let detector = OutageDetector::new(cfg.min_downtime, cfg.failure_threshold);
        let aggregator = StatsAggregator::new(session_start, cfg.check_interval);

        Self {
            cfg,
            probe,
            sink,
            detector,
            aggregator,
            pending: Vec::new(),
        }
    }

    /// Run until the stop channel fires, then flush once more so an
    /// interrupt never loses buffered events.
    pub async fn run(&mut self, mut stop: broadcast::Receiver<()>) {
        let mut check = tokio::time::interval(self.cfg.check_interval);
        check.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut flush = tokio::time::interval(self.cfg.log_interval);
        flush.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stop.recv() => break,
                _ = check.tick() => self.check().await,
                _ = flush.tick() => self.flush(),
            }
        }

        self.flush();
    }

    /// One check tick: probe, feed the detector, re-render the live view.
    async fn check(&mut self) {
        let reachable = self.probe.is_reachable(self.cfg.probe_timeout).await;
        // The sample timestamp is taken once, after the multi-endpoint
        // reduction completes.
        let now = Utc::now();

        if let Some(event) = self.detector.observe(reachable, now) {
            tracing::info!(
                "outage: {} -> {} ({}s)",
                event.start,
                event.end,
                event.duration().num_seconds()
            );
            self.aggregator.record(&event);
            self.pending.push(event);
        }

        let status = match self.detector.down_since() {
            None => LinkStatus::Up,
            Some(since) => LinkStatus::Down {
                since,
                failures: self.detector.consecutive_failures(),
                confirmed: self.detector.is_confirmed(),
            },
        };

        self.sink.render(&self.aggregator.snapshot(now), status);
    }

    /// One flush tick: hand the pending batch and a fresh snapshot to the
    /// sink. The batch is only cleared once the sink accepts it.
    fn flush(&mut self) {
        let snapshot = self.aggregator.snapshot(Utc::now());

        match self.sink.flush(&self.pending, &snapshot) {
            Ok(()) => self.pending.clear(),
            Err(e) => tracing::error!("failed to flush logs, retrying next cycle: {}", e),
        }
    }

    #[cfg(test)]
    fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
