use crate::zfs::DEFAULT_KSTAT_PATH;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Collect ZFS ARC and pool statistics from the kstat pseudo-files
#[derive(Debug, Clone, Parser)]
#[command(name = "zfs-kstat-collector", version, about)]
pub struct Config {
    /// Directory holding `arcstats` and one subdirectory per pool
    #[arg(long, env = "ZFS_KSTAT_PATH", default_value = DEFAULT_KSTAT_PATH)]
    pub base_path: PathBuf,

    /// Seconds between collection passes, 0 collects once and exits
    #[arg(short, long, default_value_t = 2)]
    pub interval: u64,

    /// Seconds a single collection pass may take
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Serve built-in sample data instead of reading the base path
    #[arg(long, env = "DEMO_MODE")]
    pub demo: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval > 0).then(|| Duration::from_secs(self.interval))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
