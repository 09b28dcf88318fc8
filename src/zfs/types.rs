/// ARC (Adaptive Replacement Cache) counters read from `arcstats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub arc_size: u64, // Current cache size in bytes
    pub arc_hits: u64,
    pub arc_misses: u64,
}

impl GlobalStats {
    /// Hit ratio in percent, or `None` before the ARC has seen any lookups
    pub fn arc_hit_ratio(&self) -> Option<f64> {
        let total = self.arc_hits.saturating_add(self.arc_misses);
        if total == 0 {
            return None;
        }
        Some(self.arc_hits as f64 / total as f64 * 100.0)
    }
}

/// Cumulative I/O counters of one pool, monotonic since the module was loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolIoStats {
    pub read_count: u64,
    pub write_count: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// State and I/O counters of one pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub state: String, // Uppercased token, e.g. "ONLINE"
    pub io: PoolIoStats,
}

impl PoolStats {
    pub fn is_online(&self) -> bool {
        self.state == "ONLINE"
    }
}

/// Coarse rating of the ARC hit ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcEfficiency {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ArcEfficiency {
    /// Determine rating based on hit ratio percentage
    pub fn from_hit_ratio(hit_ratio: f64) -> Self {
        if hit_ratio >= 85.0 {
            ArcEfficiency::Excellent
        } else if hit_ratio >= 70.0 {
            ArcEfficiency::Good
        } else if hit_ratio >= 50.0 {
            ArcEfficiency::Fair
        } else {
            ArcEfficiency::Poor
        }
    }
}

impl std::fmt::Display for ArcEfficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ArcEfficiency::Excellent => write!(f, "Excellent"),
            ArcEfficiency::Good => write!(f, "Good"),
            ArcEfficiency::Fair => write!(f, "Fair"),
            ArcEfficiency::Poor => write!(f, "Poor"),
        }
    }
}
