//! File-evidence scanner.
//!
//! A profile lists probes (file checks) grouped into sections. Scanning a
//! root directory runs the probes, collects evidence lines and detail
//! values, and then applies the profile's rules to pick a root cause and
//! recommendations. Missing files are recorded, never treated as errors.

pub mod profile;
mod scanner;
mod synthesis;

pub use profile::ScanProfile;
pub use scanner::{ScanReport, scan};
