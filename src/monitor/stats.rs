//! Running outage statistics.

use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use std::time::Duration;

use super::detector::OutageEvent;

/// Additive counters over the outage event stream.
///
/// Owned exclusively by the monitor loop; constructed once per session
/// and never reset.
pub struct StatsAggregator {
    session_start: DateTime<Utc>,
    check_interval: Duration,
    total_drops: u64,
    total_downtime: ChronoDuration,
    hourly_drops: [u64; 24],
}

/// Immutable view of the counters plus derived fields, value-copied on
/// every request.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub session_start: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub total_drops: u64,
    pub drops_this_hour: u64,
    pub avg_drops_per_hour: f64,
    pub total_downtime: ChronoDuration,
    pub avg_downtime_per_drop: ChronoDuration,
}

impl StatsAggregator {
    pub fn new(session_start: DateTime<Utc>, check_interval: Duration) -> Self {
        Self {
            session_start,
            check_interval,
            total_drops: 0,
            total_downtime: ChronoDuration::zero(),
            hourly_drops: [0; 24],
        }
    }

    /// Fold one outage into the counters. Buckets by the hour of day the
    /// outage ended in.
    pub fn record(&mut self, event: &OutageEvent) {
        self.total_drops += 1;
        self.total_downtime = self.total_downtime + event.duration();
        self.hourly_drops[event.end.hour() as usize] += 1;
    }

    /// Pure read; calling it twice without a `record` in between returns
    /// identical counter fields.
    pub fn snapshot(&self, now: DateTime<Utc>) -> StatsSnapshot {
        // Floor the divisor at one check interval's worth of hours so a
        // snapshot taken at session start stays finite.
        let elapsed_hours = (now - self.session_start).num_milliseconds() as f64 / 3_600_000.0;
        let floor_hours = self.check_interval.as_secs_f64() / 3600.0;
        let avg_drops_per_hour = self.total_drops as f64 / elapsed_hours.max(floor_hours);

        let avg_downtime_per_drop = if self.total_drops == 0 {
            ChronoDuration::zero()
        } else {
            ChronoDuration::milliseconds(
                self.total_downtime.num_milliseconds() / self.total_drops as i64,
            )
        };

        StatsSnapshot {
            session_start: self.session_start,
            now,
            total_drops: self.total_drops,
            drops_this_hour: self.hourly_drops[now.hour() as usize],
            avg_drops_per_hour,
            total_downtime: self.total_downtime,
            avg_downtime_per_drop,
        }
    }
}
