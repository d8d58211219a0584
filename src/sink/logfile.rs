//! File-backed sinks: the append-only disruption log and the
//! rewritten-on-flush stats summary.

use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{format_duration, stats_block, TIME_FORMAT};
use crate::monitor::{OutageEvent, StatsSnapshot};

/// Append-only outage log, one line per event. The file name carries the
/// session start so runs never collide.
pub struct DisruptionLog {
    path: PathBuf,
}

impl DisruptionLog {
    pub fn new(dir: &Path, session_start: DateTime<Utc>) -> Self {
        let name = format!(
            "disruptions_{}.log",
            session_start.format("%Y-%m-%d_%H-%M-%S")
        );

        Self {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, events: &[OutageEvent]) -> io::Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        for event in events {
            writeln!(
                file,
                "Disconnected at {}, Reconnected at {}, Downtime: {}",
                event.start.format(TIME_FORMAT),
                event.end.format(TIME_FORMAT),
                format_duration(event.duration()),
            )?;
        }

        Ok(())
    }
}

/// Stats summary file, replaced in full on every flush.
pub struct StatsLog {
    path: PathBuf,
}

impl StatsLog {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("linkwatch_stats.log"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, snapshot: &StatsSnapshot) -> io::Result<()> {
        std::fs::write(&self.path, stats_block(snapshot))
    }
}
