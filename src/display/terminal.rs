use crate::zfs::PoolStats;
use std::io::{self, Write};

/// Terminal control and ANSI color handling
pub struct Terminal {
    pub supports_color: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            supports_color: console::colors_enabled(),
        }
    }

    /// Clear the entire screen
    pub fn clear_screen(&self) -> io::Result<()> {
        print!("\x1B[2J\x1B[1;1H");
        io::stdout().flush()
    }

    /// Color style for the state of a pool
    pub fn state_style(&self, pool: &PoolStats) -> console::Style {
        let style = console::Style::new();
        if !self.supports_color {
            style
        } else if pool.is_online() {
            style.green()
        } else if pool.state == "DEGRADED" {
            style.yellow()
        } else {
            style.red().bold()
        }
    }

    /// Color style for warning lines
    pub fn warning_style(&self) -> console::Style {
        if self.supports_color {
            console::Style::new().yellow()
        } else {
            console::Style::new()
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}
