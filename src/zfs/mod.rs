//! ZFS kstat parsing and collection

pub mod collector;
pub mod error;
pub mod kstat;
pub mod types;
pub mod warnings;

// Re-export commonly used items
pub use collector::{DEFAULT_KSTAT_PATH, ZfsResource};
pub use error::{ZfsError, ZfsResult};
pub use types::{ArcEfficiency, GlobalStats, PoolIoStats, PoolStats};
pub use warnings::Warnings;
