use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;
use zfs_kstat_collector::config::Config;
use zfs_kstat_collector::monitor;

fn main() {
    let config = Config::parse();
    init_logging(&config);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: could not start runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(monitor::run(config)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::builder()
        .with_default_directive(config.log_level().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
