use crate::config::Config;
use crate::display::{
    PoolRates, RateTracker, Terminal, format_bytes, format_ops_per_second, format_rate,
    format_ratio,
};
use crate::system::{DemoFilesystemReader, FilesystemReader, RealFilesystemReader};
use crate::zfs::{ArcEfficiency, GlobalStats, PoolStats, Warnings, ZfsError, ZfsResource};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::Write as _;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{error, info};

pub type Resource = ZfsResource<Box<dyn FilesystemReader + Send>>;

/// Error types for the monitor
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("collection pass timed out after {0:?}")]
    Timeout(Duration),

    #[error("collection task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Zfs(#[from] ZfsError),
}

/// Result of one collection pass that finished in time
pub struct PassOutcome {
    pub resource: Resource,
    pub warnings: Warnings,
    pub result: Result<(), ZfsError>,
}

pub fn new_resource(config: &Config) -> Resource {
    let reader: Box<dyn FilesystemReader + Send> = if config.demo {
        Box::new(DemoFilesystemReader::new(&config.base_path))
    } else {
        Box::new(RealFilesystemReader)
    };
    ZfsResource::new(reader, config.base_path.clone())
}

/// Run one blocking collection pass on the blocking pool, bounded by `deadline`.
///
/// On timeout the resource is abandoned together with the blocked task.
pub async fn collect_pass(
    mut resource: Resource,
    deadline: Duration,
) -> Result<PassOutcome, MonitorError> {
    let task = tokio::task::spawn_blocking(move || {
        let mut warnings = Warnings::new();
        let result = resource.collect(&mut warnings);
        PassOutcome {
            resource,
            warnings,
            result,
        }
    });

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => Err(MonitorError::Task(e.to_string())),
        Err(_) => Err(MonitorError::Timeout(deadline)),
    }
}

/// Main monitoring loop and display coordination
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let terminal = Terminal::new();

    let Some(interval) = config.interval() else {
        return run_once(&config, &terminal).await;
    };

    let mut tracker = RateTracker::new();
    let mut resource = Some(new_resource(&config));

    // Set up signal handler for Ctrl+C
    let (tx, mut rx) = tokio::sync::mpsc::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(()).await;
        }
    });

    loop {
        let current = resource.take().unwrap_or_else(|| new_resource(&config));

        match collect_pass(current, config.timeout()).await {
            Ok(outcome) => {
                let rates = match (&outcome.result, outcome.resource.pool_stats()) {
                    (Ok(()), Some(pools)) => tracker.observe(pools, Instant::now()),
                    _ => {
                        tracker.reset();
                        HashMap::new()
                    }
                };

                terminal.clear_screen()?;
                print!("{}", render_report(&terminal, &outcome, &rates, Some(interval)));
                std::io::stdout().flush()?;

                if let Err(e) = &outcome.result {
                    error!("collection pass failed: {}", e);
                }
                resource = Some(outcome.resource);
            }
            Err(e) => {
                error!("{}", e);
                tracker.reset();
            }
        }

        tokio::select! {
            _ = rx.recv() => {
                info!("monitoring stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn run_once(config: &Config, terminal: &Terminal) -> Result<(), Box<dyn Error>> {
    let outcome = collect_pass(new_resource(config), config.timeout()).await?;
    print!("{}", render_report(terminal, &outcome, &HashMap::new(), None));
    std::io::stdout().flush()?;

    outcome.result.map_err(|e| MonitorError::from(e).into())
}

/// Render the result of a pass as plain text
pub fn render_report(
    terminal: &Terminal,
    outcome: &PassOutcome,
    rates: &HashMap<String, PoolRates>,
    interval: Option<Duration>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{:=^80}", " ZFS kstat collector ");
    let refresh = interval.map_or_else(|| "once".to_string(), |i| format!("{}s", i.as_secs()));
    let _ = writeln!(
        out,
        "Source: {} | Refresh: {} | Time: {}",
        outcome.resource.base_path().display(),
        refresh,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);

    render_arc(&mut out, outcome.resource.global_stats());

    match (&outcome.result, outcome.resource.pool_stats()) {
        (Err(e), _) => {
            let _ = writeln!(out, "Pools: unavailable ({})", e);
        }
        (Ok(()), None) => {
            let _ = writeln!(out, "Pools: none found");
        }
        (Ok(()), Some(pools)) => render_pools(&mut out, terminal, pools, rates),
    }

    if !outcome.warnings.is_empty() {
        let _ = writeln!(out);
        for warning in outcome.warnings.iter() {
            let _ = writeln!(
                out,
                "{}",
                terminal.warning_style().apply_to(format!("warning: {}", warning))
            );
        }
    }

    out
}

fn render_arc(out: &mut String, arc: &GlobalStats) {
    let ratio = arc.arc_hit_ratio();
    let rating = ratio
        .map(|r| format!(" ({})", ArcEfficiency::from_hit_ratio(r)))
        .unwrap_or_default();

    let _ = writeln!(out, "ARC");
    let _ = writeln!(out, "    Size:        {}", format_bytes(arc.arc_size));
    let _ = writeln!(out, "    Hits:        {}", arc.arc_hits);
    let _ = writeln!(out, "    Misses:      {}", arc.arc_misses);
    let _ = writeln!(out, "    Hit Ratio:   {}{}", format_ratio(ratio), rating);
    let _ = writeln!(out);
}

fn render_pools(
    out: &mut String,
    terminal: &Terminal,
    pools: &HashMap<String, PoolStats>,
    rates: &HashMap<String, PoolRates>,
) {
    let mut names = pools.keys().collect::<Vec<_>>();
    names.sort();

    for name in names {
        let pool = &pools[name];
        let _ = writeln!(
            out,
            "Pool {} [{}]",
            name,
            terminal.state_style(pool).apply_to(&pool.state)
        );
        let _ = writeln!(
            out,
            "    Reads:       {} ops, {}",
            pool.io.read_count,
            format_bytes(pool.io.bytes_read)
        );
        let _ = writeln!(
            out,
            "    Writes:      {} ops, {}",
            pool.io.write_count,
            format_bytes(pool.io.bytes_written)
        );
        if let Some(rate) = rates.get(name.as_str()) {
            let _ = writeln!(
                out,
                "    Rate:        r {} {} | w {} {}",
                format_ops_per_second(rate.read_ops),
                format_rate(rate.read_bytes),
                format_ops_per_second(rate.write_ops),
                format_rate(rate.write_bytes)
            );
        }
        let _ = writeln!(out);
    }
}
