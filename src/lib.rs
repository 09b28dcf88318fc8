//! Collects ZFS ARC and pool statistics from the kstat pseudo-files
//! under `/proc/spl/kstat/zfs`.

pub mod config;
pub mod demo;
pub mod display;
pub mod monitor;
pub mod system;
pub mod zfs;
