//! Sinks for outage events and statistics.
//!
//! Sinks consume what the monitor produces and have no influence on
//! detection. The monitor loop retries failed flushes on the next cycle.

mod display;
mod logfile;

pub use display::TerminalDisplay;
pub use logfile::{DisruptionLog, StatsLog};

use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;

use crate::monitor::{OutageEvent, StatsSnapshot};

/// Timestamp format shared by the logs and the live display.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Link state as shown on the live display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Up,
    Down {
        since: DateTime<Utc>,
        failures: u32,
        confirmed: bool,
    },
}

/// Consumer of detection output.
pub trait Sink {
    /// Re-render the live view. Called on every check tick; best-effort.
    fn render(&mut self, snapshot: &StatsSnapshot, status: LinkStatus);

    /// Persist a batch of events and the current snapshot. On error the
    /// caller keeps the batch and retries on the next flush cycle.
    fn flush(&mut self, events: &[OutageEvent], snapshot: &StatsSnapshot) -> io::Result<()>;
}

/// Format a duration as `H:MM:SS`. Hours grow without wrapping.
pub fn format_duration(d: chrono::Duration) -> String {
    let total = d.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// The fixed statistics block, one field per line. Written verbatim to
/// the stats log and redrawn on the live display.
pub fn stats_block(s: &StatsSnapshot) -> String {
    format!(
        "Monitoring since:      {}\n\
         Current time:          {}\n\
         Total drops:           {}\n\
         Drops this hour:       {}\n\
         Average drops/hour:    {:.2}\n\
         Total downtime:        {}\n\
         Avg downtime per drop: {}\n",
        s.session_start.format(TIME_FORMAT),
        s.now.format(TIME_FORMAT),
        s.total_drops,
        s.drops_this_hour,
        s.avg_drops_per_hour,
        format_duration(s.total_downtime),
        format_duration(s.avg_downtime_per_drop),
    )
}

/// File logs plus the live terminal view.
pub struct MonitorSink {
    disruptions: DisruptionLog,
    stats: StatsLog,
    display: TerminalDisplay,
}

impl MonitorSink {
    pub fn new(log_dir: &Path, session_start: DateTime<Utc>) -> io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        Ok(Self {
            disruptions: DisruptionLog::new(log_dir, session_start),
            stats: StatsLog::new(log_dir),
            display: TerminalDisplay::new(),
        })
    }
}

impl Sink for MonitorSink {
    fn render(&mut self, snapshot: &StatsSnapshot, status: LinkStatus) {
        if let Err(e) = self.display.render(snapshot, status) {
            tracing::debug!("display render failed: {}", e);
        }
    }

    fn flush(&mut self, events: &[OutageEvent], snapshot: &StatsSnapshot) -> io::Result<()> {
        self.disruptions.append(events)?;
        self.stats.write(snapshot)?;
        Ok(())
    }
}
