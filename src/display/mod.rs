//! Display module for terminal output and formatting

pub mod formatter;
pub mod rates;
pub mod terminal;

// Re-export commonly used items
pub use formatter::{format_bytes, format_ops_per_second, format_rate, format_ratio};
pub use rates::{PoolRates, RateTracker};
pub use terminal::Terminal;
