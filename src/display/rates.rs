use crate::zfs::{PoolIoStats, PoolStats};
use std::collections::HashMap;
use std::time::Instant;

/// Per-second deltas of one pool's I/O counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolRates {
    pub read_ops: f64,
    pub write_ops: f64,
    pub read_bytes: f64,
    pub write_bytes: f64,
}

/// Remembers the counters of the previous pass to turn them into rates
#[derive(Debug, Default)]
pub struct RateTracker {
    previous: HashMap<String, (PoolIoStats, Instant)>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rates since the previous observation of each pool.
    ///
    /// Pools seen for the first time have no entry. Pools that disappeared are forgotten.
    pub fn observe(
        &mut self,
        pools: &HashMap<String, PoolStats>,
        now: Instant,
    ) -> HashMap<String, PoolRates> {
        let mut rates = HashMap::new();

        for (name, pool) in pools {
            if let Some((prev, prev_time)) = self.previous.get(name) {
                let elapsed = now.duration_since(*prev_time).as_secs_f64();
                rates.insert(name.clone(), Self::rates(prev, &pool.io, elapsed));
            }
        }

        self.previous = pools
            .iter()
            .map(|(name, pool)| (name.clone(), (pool.io, now)))
            .collect();
        rates
    }

    /// Drop all remembered counters, e.g. after a failed pass
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    fn rates(prev: &PoolIoStats, cur: &PoolIoStats, elapsed: f64) -> PoolRates {
        // Counters only reset on module reload, saturating_sub maps that to 0
        let per_second = |before: u64, after: u64| {
            if elapsed > 0.0 {
                after.saturating_sub(before) as f64 / elapsed
            } else {
                0.0
            }
        };

        PoolRates {
            read_ops: per_second(prev.read_count, cur.read_count),
            write_ops: per_second(prev.write_count, cur.write_count),
            read_bytes: per_second(prev.bytes_read, cur.bytes_read),
            write_bytes: per_second(prev.bytes_written, cur.bytes_written),
        }
    }
}
