//! Outage detection state machine.
//!
//! Turns noisy periodic reachability samples into a stream of outage
//! events with debounced start/end timestamps. Timestamps are supplied
//! by the caller, so the machine is deterministic and testable without
//! real time passing.

use chrono::{DateTime, Duration, Utc};

/// A single qualifying outage. Emitted once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OutageEvent {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Debouncing state machine over reachability samples.
///
/// An outage opens on the first failed sample and resolves either when
/// connectivity returns or as soon as its length crosses `min_downtime`,
/// whichever comes first. Crossing the threshold while still down emits
/// the segment so far and reopens at the emission instant, so a long
/// outage is logged incrementally in `min_downtime`-sized segments
/// rather than as one unbounded open event. Unreachable periods shorter
/// than `min_downtime` are discarded as blips.
///
/// Callers must supply non-decreasing timestamps.
pub struct OutageDetector {
    min_downtime: Duration,
    failure_threshold: u32,
    down_since: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

impl OutageDetector {
    pub fn new(min_downtime: Duration, failure_threshold: u32) -> Self {
        Self {
            min_downtime,
            failure_threshold,
            down_since: None,
            consecutive_failures: 0,
        }
    }

    /// Feed one reachability sample. Returns an event when a qualifying
    /// outage concludes on this sample; total over all inputs.
    pub fn observe(&mut self, reachable: bool, now: DateTime<Utc>) -> Option<OutageEvent> {
        match (self.down_since, reachable) {
            // Up -> Up
            (None, true) => None,
            // Up -> Down: the outage clock starts at the first failure.
            (None, false) => {
                self.down_since = Some(now);
                self.consecutive_failures = 1;
                None
            }
            // Down -> Down: log the segment as soon as it is long enough
            // to count, and reopen at the emission instant.
            (Some(since), false) => {
                self.consecutive_failures += 1;
                if now - since >= self.min_downtime {
                    self.down_since = Some(now);
                    self.consecutive_failures = 0;
                    Some(OutageEvent { start: since, end: now })
                } else {
                    None
                }
            }
            // Down -> Up: emit if long enough, otherwise discard the blip.
            (Some(since), true) => {
                self.down_since = None;
                self.consecutive_failures = 0;
                if now - since >= self.min_downtime {
                    Some(OutageEvent { start: since, end: now })
                } else {
                    None
                }
            }
        }
    }

    /// Whether an unresolved outage is currently open.
    pub fn is_down(&self) -> bool {
        self.down_since.is_some()
    }

    /// Start of the open outage, if any.
    pub fn down_since(&self) -> Option<DateTime<Utc>> {
        self.down_since
    }

    /// Failed samples since the last resolution.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Whether the open outage has met the failure threshold. Display
    /// policy only; emission is governed by `min_downtime` alone.
    pub fn is_confirmed(&self) -> bool {
        self.down_since.is_some() && self.consecutive_failures >= self.failure_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn detector(min_downtime_secs: i64) -> OutageDetector {
        OutageDetector::new(Duration::seconds(min_downtime_secs), 3)
    }

    #[test]
    fn all_up_never_emits() {
        let mut d = detector(3);
        for s in 0..20 {
            assert_eq!(d.observe(true, at(s)), None);
            assert!(!d.is_down());
        }
        assert_eq!(d.consecutive_failures(), 0);
    }

    #[test]
    fn short_blip_is_discarded() {
        let mut d = detector(3);
        assert_eq!(d.observe(true, at(0)), None);
        assert_eq!(d.observe(false, at(1)), None);
        assert!(d.is_down());
        // Recovery after 1s, under the 3s threshold: never logged.
        assert_eq!(d.observe(true, at(2)), None);
        assert!(!d.is_down());
        assert_eq!(d.consecutive_failures(), 0);
    }

    #[test]
    fn outage_at_exact_threshold_emits_once() {
        let mut d = detector(3);
        assert_eq!(d.observe(false, at(0)), None);
        assert_eq!(d.observe(false, at(1)), None);
        assert_eq!(d.observe(false, at(2)), None);
        let event = d.observe(true, at(3)).expect("outage of exactly min_downtime");
        assert_eq!(event, OutageEvent { start: at(0), end: at(3) });
        assert_eq!(event.duration(), Duration::seconds(3));
        assert!(!d.is_down());
    }

    #[test]
    fn crossing_threshold_while_down_segments_the_outage() {
        // Samples at t=0..5 all false, min_downtime=3, then recovery at t=6.
        let mut d = detector(3);
        assert_eq!(d.observe(false, at(0)), None);
        assert_eq!(d.observe(false, at(1)), None);
        assert_eq!(d.observe(false, at(2)), None);
        // Threshold crossed while still down: segment logged now, not at
        // eventual recovery, and the detector reopens at t=3.
        let first = d.observe(false, at(3)).expect("segment at crossing");
        assert_eq!(first, OutageEvent { start: at(0), end: at(3) });
        assert!(d.is_down());
        assert_eq!(d.down_since(), Some(at(3)));
        // Elapsed since the reopened start is 1s then 2s, both under 3s.
        assert_eq!(d.observe(false, at(4)), None);
        assert_eq!(d.observe(false, at(5)), None);
        let second = d.observe(true, at(6)).expect("segment at recovery");
        assert_eq!(second, OutageEvent { start: at(3), end: at(6) });
        assert!(!d.is_down());
    }

    #[test]
    fn long_outage_yields_one_segment_per_threshold() {
        // k * min_downtime + r down with r < min_downtime: exactly k events.
        let min = 4;
        let (k, r) = (3, 2);
        let mut d = detector(min);

        let mut events = Vec::new();
        for s in 0..(k * min + r) {
            events.extend(d.observe(false, at(s)));
        }
        events.extend(d.observe(true, at(k * min + r)));

        assert_eq!(events.len() as i64, k);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.start, at(i as i64 * min));
            assert_eq!(event.end, at((i as i64 + 1) * min));
        }
    }

    #[test]
    fn failure_count_tracks_open_outage() {
        let mut d = detector(60);
        assert!(!d.is_confirmed());
        d.observe(false, at(0));
        assert_eq!(d.consecutive_failures(), 1);
        d.observe(false, at(1));
        assert!(!d.is_confirmed());
        d.observe(false, at(2));
        // Third consecutive failure meets the threshold of 3.
        assert!(d.is_confirmed());
        d.observe(true, at(3));
        assert_eq!(d.consecutive_failures(), 0);
        assert!(!d.is_confirmed());
    }
}
