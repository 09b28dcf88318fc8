//! Canned kstat files for running without ZFS

pub mod data;
