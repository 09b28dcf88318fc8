//! Parsers for the line-oriented kstat formats under `/proc/spl/kstat/zfs`
//!
//! All parsers work on file contents that were already read into memory, so
//! they can be exercised without touching the filesystem. The `source` path is
//! only used to give errors a location.

use super::error::{ZfsError, ZfsResult};
use super::types::PoolIoStats;
use super::warnings::Warnings;
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

/// Name of the global ARC statistics file below the kstat base directory
pub const ARCSTATS_FILE: &str = "arcstats";
/// Per-pool file holding the single state token
pub const POOL_STATE_FILE: &str = "state";
/// Per-pool file holding the I/O counter table
pub const POOL_IO_FILE: &str = "io";

/// kstat data type tag for unsigned 64 bit integers
const KSTAT_TYPE_UINT64: &str = "4";
const ARCSTATS_HEADER: [&str; 3] = ["name", "type", "data"];
/// The I/O table header carries at least this many columns
const IO_HEADER_MIN_COLUMNS: usize = 12;
const IO_HEADER_FIRST_COLUMN: &str = "nread";

/// Split a line into its whitespace separated fields
pub fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse the `name type data` table of `arcstats`.
///
/// Only uint64 rows are kept. A row whose value does not parse is reported to
/// `warnings` and skipped; the rest of the table is still read. Fails with
/// [`ZfsError::MissingHeader`] if the header line never shows up.
pub fn parse_arcstats(
    content: &str,
    source: &Path,
    warnings: &mut Warnings,
) -> ZfsResult<HashMap<String, u64>> {
    let mut metrics = HashMap::new();
    let mut header_found = false;

    for line in content.lines() {
        let parts = fields(line);

        if !header_found {
            header_found = parts == ARCSTATS_HEADER;
            continue;
        }
        if parts.len() < 3 {
            continue;
        }

        let (key, kind, raw) = (parts[0], parts[1], parts[2]);
        if kind != KSTAT_TYPE_UINT64 {
            continue;
        }

        match raw.parse::<u64>() {
            Ok(value) => {
                metrics.insert(key.to_string(), value);
            }
            Err(e) => {
                let err = ZfsError::value_parse_failed(ARCSTATS_FILE, key, raw, e);
                warnings.add(err.to_string());
            }
        }
    }

    if !header_found {
        return Err(ZfsError::missing_header(source, &ARCSTATS_HEADER.join(" ")));
    }

    trace!(path = %source.display(), metrics = metrics.len(), "parsed arcstats");
    Ok(metrics)
}

/// Parse the pool `state` file: first line, trimmed and uppercased.
pub fn parse_pool_state(content: &str, source: &Path) -> ZfsResult<String> {
    let first = content.lines().next().ok_or_else(|| ZfsError::EmptyState {
        path: source.to_path_buf(),
    })?;

    Ok(first.trim().to_uppercase())
}

/// Where the I/O table parser currently is
#[derive(Debug, Clone, PartialEq, Eq)]
enum IoTableState {
    SeekingHeader,
    ReadingRows { columns: Vec<String> },
}

impl IoTableState {
    /// Advance by one line. Rows are applied to `stats` as they are read.
    fn step(self, line: &str, source: &Path, stats: &mut PoolIoStats) -> ZfsResult<Self> {
        let parts = fields(line);

        match self {
            IoTableState::SeekingHeader => {
                if parts.len() >= IO_HEADER_MIN_COLUMNS && parts[0] == IO_HEADER_FIRST_COLUMN {
                    let columns = parts.iter().map(|c| c.to_string()).collect();
                    return Ok(IoTableState::ReadingRows { columns });
                }
                Ok(IoTableState::SeekingHeader)
            }
            IoTableState::ReadingRows { columns } => {
                if !parts.is_empty() {
                    apply_io_row(&columns, &parts, source, stats)?;
                }
                Ok(IoTableState::ReadingRows { columns })
            }
        }
    }
}

fn apply_io_row(
    columns: &[String],
    parts: &[&str],
    source: &Path,
    stats: &mut PoolIoStats,
) -> ZfsResult<()> {
    for (position, column) in columns.iter().enumerate() {
        let raw = parts.get(position).ok_or_else(|| ZfsError::ShortRow {
            path: source.to_path_buf(),
            column: column.clone(),
            position,
        })?;
        let value = raw
            .parse::<u64>()
            .map_err(|e| ZfsError::value_parse_failed(POOL_IO_FILE, column, raw, e))?;

        match column.as_str() {
            "reads" => stats.read_count = value,
            "writes" => stats.write_count = value,
            "nread" => stats.bytes_read = value,
            "nwritten" => stats.bytes_written = value,
            _ => {}
        }
    }

    Ok(())
}

/// Parse the pool `io` table.
///
/// A file without the `nread ...` header yields zeroed counters. Once the
/// header is found every value of every row must be numeric; the last row wins.
pub fn parse_pool_io(content: &str, source: &Path) -> ZfsResult<PoolIoStats> {
    let mut stats = PoolIoStats::default();
    let mut state = IoTableState::SeekingHeader;

    for line in content.lines() {
        state = state.step(line, source, &mut stats)?;
    }

    if state == IoTableState::SeekingHeader {
        trace!(path = %source.display(), "no i/o header found");
    }

    Ok(stats)
}
