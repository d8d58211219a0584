//! Command-line configuration.
//!
//! All tunables arrive as flags; anything invalid is rejected here at
//! startup, before the monitor loop or any file is touched.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::probe::DEFAULT_ENDPOINTS;

/// Monitors network reachability and logs connection outages.
#[derive(Parser, Debug)]
#[command(name = "linkwatch")]
#[command(about = "Monitors network reachability and logs connection outages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Consecutive failed checks before an open outage is shown as confirmed
    #[arg(long, default_value_t = 3)]
    pub failure_threshold: u32,

    /// Minimum unreachable seconds before an outage is logged; shorter
    /// blips are discarded
    #[arg(long, default_value_t = 5.0)]
    pub min_downtime: f64,

    /// Seconds between reachability checks
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// Seconds between log flushes
    #[arg(long, default_value_t = 30.0)]
    pub log_interval: f64,

    /// Per-endpoint probe timeout in seconds
    #[arg(long, default_value_t = 5.0)]
    pub timeout: f64,

    /// Probe endpoint URL (repeatable; any single success counts as reachable)
    #[arg(long = "endpoint")]
    pub endpoints: Vec<String>,

    /// Directory for the disruption and stats logs
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Describe the tunable settings and exit
    #[arg(long)]
    pub settings: bool,
}

/// Validated configuration handed to the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub failure_threshold: u32,
    pub min_downtime: chrono::Duration,
    pub check_interval: Duration,
    pub log_interval: Duration,
    pub probe_timeout: Duration,
    pub endpoints: Vec<String>,
    pub log_dir: PathBuf,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be a positive number of seconds, got {1}")]
    NonPositive(&'static str, f64),
    #[error("--failure-threshold must be at least 1")]
    ZeroThreshold,
}

impl Cli {
    pub fn validate(self) -> Result<MonitorConfig, ConfigError> {
        let seconds = [
            ("--min-downtime", self.min_downtime),
            ("--interval", self.interval),
            ("--log-interval", self.log_interval),
            ("--timeout", self.timeout),
        ];
        for (flag, value) in seconds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive(flag, value));
            }
        }

        if self.failure_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }

        let endpoints = if self.endpoints.is_empty() {
            DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect()
        } else {
            self.endpoints
        };

        Ok(MonitorConfig {
            failure_threshold: self.failure_threshold,
            min_downtime: chrono::Duration::milliseconds((self.min_downtime * 1000.0) as i64),
            check_interval: Duration::from_secs_f64(self.interval),
            log_interval: Duration::from_secs_f64(self.log_interval),
            probe_timeout: Duration::from_secs_f64(self.timeout),
            endpoints,
            log_dir: self.log_dir,
        })
    }
}

/// Output for the `--settings` flag.
pub fn print_settings() {
    println!("linkwatch settings:");
    println!("  --failure-threshold <N>  Consecutive failed checks before an open outage");
    println!("                           is reported as confirmed (default: 3)");
    println!("  --min-downtime <SECS>    Minimum unreachable time before an outage is");
    println!("                           logged; shorter blips are discarded (default: 5)");
    println!("  --interval <SECS>        Seconds between reachability checks (default: 1)");
    println!("  --log-interval <SECS>    Seconds between log flushes (default: 30)");
    println!("  --timeout <SECS>         Per-endpoint probe timeout (default: 5)");
    println!("  --endpoint <URL>         Probe endpoint, repeatable; any single success");
    println!("                           counts as reachable (default: well-known hosts)");
    println!("  --log-dir <DIR>          Directory for disruption and stats logs (default: .)");
}
