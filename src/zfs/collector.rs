use super::error::{ZfsError, ZfsResult};
use super::kstat::{self, ARCSTATS_FILE, POOL_IO_FILE, POOL_STATE_FILE};
use super::types::{GlobalStats, PoolStats};
use super::warnings::Warnings;
use crate::system::FilesystemReader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the ZFS kstat pseudo-files on Linux
pub const DEFAULT_KSTAT_PATH: &str = "/proc/spl/kstat/zfs";

/// Collects ARC and per-pool statistics from one kstat directory.
///
/// The results of the last pass stay available through [`ZfsResource::global_stats`]
/// and [`ZfsResource::pool_stats`] until the next call to [`ZfsResource::collect`].
pub struct ZfsResource<F: FilesystemReader> {
    filesystem_reader: F,
    base_path: PathBuf,
    global_stats: GlobalStats,
    pool_stats: Option<HashMap<String, PoolStats>>,
}

impl<F: FilesystemReader> ZfsResource<F> {
    pub fn new(filesystem_reader: F, base_path: impl Into<PathBuf>) -> Self {
        Self {
            filesystem_reader,
            base_path: base_path.into(),
            global_stats: GlobalStats::default(),
            pool_stats: None,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn global_stats(&self) -> &GlobalStats {
        &self.global_stats
    }

    /// Pools of the last pass; `None` if no pool was found or the pass failed
    pub fn pool_stats(&self) -> Option<&HashMap<String, PoolStats>> {
        self.pool_stats.as_ref()
    }

    /// Run one collection pass.
    ///
    /// ARC problems end up in `warnings`. Any pool problem fails the pass and
    /// leaves no pool map behind.
    pub fn collect(&mut self, warnings: &mut Warnings) -> ZfsResult<()> {
        let result = self.collect_global(warnings).and_then(|global| {
            self.global_stats = global;
            self.collect_pools()
        });

        match result {
            Ok(pools) => {
                info!(
                    pools = pools.as_ref().map_or(0, HashMap::len),
                    warnings = warnings.len(),
                    "zfs collection finished"
                );
                self.pool_stats = pools;
                Ok(())
            }
            Err(e) => {
                self.pool_stats = None;
                Err(e)
            }
        }
    }

    /// Read `arcstats` and merge the fields of interest into the previous values
    fn collect_global(&self, warnings: &mut Warnings) -> ZfsResult<GlobalStats> {
        let metrics = self.read_global_metrics(warnings);
        merge_global(self.global_stats, metrics, warnings)
    }

    fn read_global_metrics(&self, warnings: &mut Warnings) -> ZfsResult<HashMap<String, u64>> {
        let path = self.base_path.join(ARCSTATS_FILE);
        let content = self.read_file(&path)?;
        kstat::parse_arcstats(&content, &path, warnings)
    }

    /// Names and directories of all pools, i.e. matches of `<base>/*/io`, sorted by name.
    ///
    /// Like a glob, an unreadable base directory simply has no matches.
    pub fn discover_pools(&self) -> Vec<(String, PathBuf)> {
        let entries = match self.filesystem_reader.read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %self.base_path.display(), error = %e, "kstat directory not listable");
                return Vec::new();
            }
        };

        let mut pools = entries
            .into_iter()
            .filter(|dir| self.filesystem_reader.exists(&dir.join(POOL_IO_FILE)))
            .filter_map(|dir| {
                let name = dir.file_name()?.to_string_lossy().into_owned();
                Some((name, dir))
            })
            .collect::<Vec<_>>();
        pools.sort();

        debug!(count = pools.len(), "discovered zfs pools");
        pools
    }

    fn collect_pools(&self) -> ZfsResult<Option<HashMap<String, PoolStats>>> {
        let pools = self.discover_pools();
        if pools.is_empty() {
            return Ok(None);
        }

        let mut stats = HashMap::with_capacity(pools.len());
        for (name, dir) in pools {
            let pool = self
                .read_pool(&dir)
                .map_err(|e| ZfsError::pool_failed(&name, e))?;
            stats.insert(name, pool);
        }

        Ok(Some(stats))
    }

    /// Read state and I/O counters of the pool living in `pool_path`
    pub fn read_pool(&self, pool_path: &Path) -> ZfsResult<PoolStats> {
        let state_path = pool_path.join(POOL_STATE_FILE);
        let io_path = pool_path.join(POOL_IO_FILE);

        let state_content = self.read_file(&state_path)?;
        let io_content = self.read_file(&io_path)?;

        let state = kstat::parse_pool_state(&state_content, &state_path)?;
        let io = kstat::parse_pool_io(&io_content, &io_path)?;

        debug!(pool = %pool_path.display(), state = %state, "read pool statistics");
        Ok(PoolStats { state, io })
    }

    fn read_file(&self, path: &Path) -> ZfsResult<String> {
        self.filesystem_reader
            .read_to_string(path)
            .map_err(|e| ZfsError::open_failed(path, e))
    }
}

/// Copy the fields of interest over `previous`.
///
/// Soft failures become a warning and keep `previous`; anything else is returned.
fn merge_global(
    previous: GlobalStats,
    metrics: ZfsResult<HashMap<String, u64>>,
    warnings: &mut Warnings,
) -> ZfsResult<GlobalStats> {
    let mut stats = previous;

    match metrics {
        Ok(metrics) => {
            if let Some(&value) = metrics.get("size") {
                stats.arc_size = value;
            }
            if let Some(&value) = metrics.get("hits") {
                stats.arc_hits = value;
            }
            if let Some(&value) = metrics.get("misses") {
                stats.arc_misses = value;
            }
        }
        Err(e) if e.is_soft() => {
            warnings.add(format!("could not gather arc statistics: {}", e));
        }
        Err(e) => return Err(e),
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{MockFilesystem, RealFilesystemReader};
    use crate::zfs::types::PoolIoStats;

    const BASE: &str = "/proc/spl/kstat/zfs";

    const ARCSTATS: &str = "\
13 1 0x01 147 39984 5206542355 1095433357591428
name type data
size 4 1024
hits 4 50
misses 4 5
";

    const IO: &str = "\
14 3 0x00 1 80 5213391234 1095437772178219
nread nwritten reads writes wtime wlentime wupdate rtime rlentime rupdate wcnt rcnt
2048 4096 10 20 0 0 0 0 0 0 0 0
";

    fn base() -> PathBuf {
        PathBuf::from(BASE)
    }

    fn healthy_fs() -> MockFilesystem {
        MockFilesystem::new()
            .with_file(base().join("arcstats"), ARCSTATS)
            .with_file(base().join("tank/state"), "ONLINE\n")
            .with_file(base().join("tank/io"), IO)
    }

    #[test]
    fn test_collect_end_to_end() {
        let mut resource = ZfsResource::new(healthy_fs(), BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(
            *resource.global_stats(),
            GlobalStats {
                arc_size: 1024,
                arc_hits: 50,
                arc_misses: 5,
            }
        );
        let pools = resource.pool_stats().unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(
            pools["tank"],
            PoolStats {
                state: "ONLINE".to_string(),
                io: PoolIoStats {
                    read_count: 10,
                    write_count: 20,
                    bytes_read: 2048,
                    bytes_written: 4096,
                },
            }
        );
    }

    #[test]
    fn test_missing_arcstats_is_a_warning() {
        let fs = MockFilesystem::new()
            .with_file(base().join("tank/state"), "ONLINE\n")
            .with_file(base().join("tank/io"), IO);
        let mut resource = ZfsResource::new(fs, BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings.iter().next().unwrap().starts_with("could not gather arc statistics"));
        assert_eq!(*resource.global_stats(), GlobalStats::default());
        assert!(resource.pool_stats().unwrap().contains_key("tank"));
    }

    #[test]
    fn test_arcstats_without_header_leaves_stats_untouched() {
        let fs = healthy_fs().with_file(base().join("arcstats"), "size 4 1024\nhits 4 50\n");
        let mut resource = ZfsResource::new(fs, BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings.iter().next().unwrap().contains("no statistics parsed"));
        assert_eq!(*resource.global_stats(), GlobalStats::default());
    }

    #[test]
    fn test_fields_missing_from_arcstats_keep_previous_values() {
        let mut resource = ZfsResource::new(healthy_fs(), BASE);
        resource.collect(&mut Warnings::new()).unwrap();

        resource.filesystem_reader.add_file(
            base().join("arcstats"),
            "name type data\nhits 4 60\nmisses 4 oops\n",
        );
        let mut warnings = Warnings::new();
        resource.collect(&mut warnings).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(
            *resource.global_stats(),
            GlobalStats {
                arc_size: 1024,
                arc_hits: 60,
                arc_misses: 5,
            }
        );
    }

    #[test]
    fn test_no_pools_leaves_map_absent() {
        let fs = MockFilesystem::new().with_file(base().join("arcstats"), ARCSTATS);
        let mut resource = ZfsResource::new(fs, BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert!(resource.pool_stats().is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_base_directory_is_not_an_error() {
        let mut resource = ZfsResource::new(MockFilesystem::new(), BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert!(resource.pool_stats().is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_base_path_that_is_a_file_has_no_pools() {
        let fs = MockFilesystem::new().with_file(BASE, "not a directory");
        let mut resource = ZfsResource::new(fs, BASE);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert!(resource.pool_stats().is_none());
        assert!(resource.discover_pools().is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_base_path_that_is_a_real_file_has_no_pools() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("kstat");
        std::fs::write(&base, "name type data\n").unwrap();
        let mut resource = ZfsResource::new(RealFilesystemReader, &base);
        let mut warnings = Warnings::new();

        resource.collect(&mut warnings).unwrap();

        assert!(resource.pool_stats().is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_discovery_keeps_non_utf8_pool_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let pool_dir = base().join(OsStr::from_bytes(b"pool\xff"));
        let fs = MockFilesystem::new()
            .with_file(pool_dir.join("state"), "ONLINE\n")
            .with_file(pool_dir.join("io"), IO);
        let mut resource = ZfsResource::new(fs, BASE);

        resource.collect(&mut Warnings::new()).unwrap();

        let pools = resource.pool_stats().unwrap();
        assert_eq!(pools.len(), 1);
        assert!(pools.contains_key("pool\u{FFFD}"));
    }

    #[test]
    fn test_merge_global_absorbs_soft_and_returns_hard_errors() {
        let previous = GlobalStats {
            arc_size: 1,
            arc_hits: 2,
            arc_misses: 3,
        };
        let mut warnings = Warnings::new();

        let soft = ZfsError::missing_header(Path::new("/x/arcstats"), "name type data");
        assert_eq!(merge_global(previous, Err(soft), &mut warnings).unwrap(), previous);
        assert_eq!(warnings.len(), 1);

        let hard = ZfsError::EmptyState {
            path: PathBuf::from("/x/state"),
        };
        let result = merge_global(previous, Err(hard), &mut warnings);
        assert!(matches!(result, Err(ZfsError::EmptyState { .. })));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_discovery_ignores_directories_without_io() {
        let fs = healthy_fs()
            .with_file(base().join("not-a-pool/state"), "ONLINE\n")
            .with_file(base().join("alpha/io"), IO)
            .with_file(base().join("alpha/state"), "ONLINE\n");
        let resource = ZfsResource::new(fs, BASE);

        let pools = resource.discover_pools();

        let names = pools.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["alpha", "tank"]);
        assert_eq!(pools[1].1, base().join("tank"));
    }

    #[test]
    fn test_io_without_header_yields_zero_counters() {
        let fs = healthy_fs().with_file(base().join("tank/io"), "14 3 0x00 1 80\n");
        let mut resource = ZfsResource::new(fs, BASE);

        resource.collect(&mut Warnings::new()).unwrap();

        let pools = resource.pool_stats().unwrap();
        assert_eq!(pools["tank"].io, PoolIoStats::default());
        assert_eq!(pools["tank"].state, "ONLINE");
    }

    #[test]
    fn test_bad_io_row_fails_whole_pass() {
        let bad_io = "\
nread nwritten reads writes wtime wlentime wupdate rtime rlentime rupdate wcnt rcnt
2048 4096 ten 20 0 0 0 0 0 0 0 0
";
        let fs = healthy_fs()
            .with_file(base().join("alpha/state"), "ONLINE\n")
            .with_file(base().join("alpha/io"), IO)
            .with_file(base().join("tank/io"), bad_io);
        let mut resource = ZfsResource::new(fs, BASE);

        let err = resource.collect(&mut Warnings::new()).unwrap_err();

        match &err {
            ZfsError::PoolFailed { pool, source } => {
                assert_eq!(pool, "tank");
                assert!(matches!(
                    source.as_ref(),
                    ZfsError::ValueParseFailed { key, .. } if key == "reads"
                ));
            }
            other => panic!("Expected PoolFailed, got {:?}", other),
        }
        assert!(err.to_string().contains("[reads]"));
        assert!(resource.pool_stats().is_none());
    }

    #[test]
    fn test_failed_pass_discards_previous_pools() {
        let mut resource = ZfsResource::new(healthy_fs(), BASE);
        resource.collect(&mut Warnings::new()).unwrap();
        assert!(resource.pool_stats().is_some());

        resource
            .filesystem_reader
            .add_file(base().join("tank/state"), "");
        let err = resource.collect(&mut Warnings::new()).unwrap_err();

        assert!(err.to_string().contains("EOF"));
        assert!(resource.pool_stats().is_none());
    }

    #[test]
    fn test_missing_state_file_fails() {
        let fs = MockFilesystem::new()
            .with_file(base().join("arcstats"), ARCSTATS)
            .with_file(base().join("tank/io"), IO);
        let mut resource = ZfsResource::new(fs, BASE);

        let err = resource.collect(&mut Warnings::new()).unwrap_err();

        match err {
            ZfsError::PoolFailed { source, .. } => {
                assert!(matches!(*source, ZfsError::OpenFailed { .. }));
            }
            other => panic!("Expected PoolFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_read_pool_directly() {
        let resource = ZfsResource::new(healthy_fs(), BASE);
        let pool = resource.read_pool(&base().join("tank")).unwrap();
        assert!(pool.is_online());
        assert_eq!(pool.io.bytes_written, 4096);
    }
}
