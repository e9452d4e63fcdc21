//! Filesystem utilities for swarmctl.
//!
//! Reports and scaffolded files are always written atomically so a crashed
//! run never leaves a truncated JSON document behind.

pub mod atomic;

pub use atomic::atomic_write_file;
