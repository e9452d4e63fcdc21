//! Identifier generation for agents, tasks, and swarms.

use chrono::Utc;

/// `{prefix}-{unix millis}-{hex}` with `hex_len` random hex characters.
///
/// Uniqueness within a registry is enforced by the caller; this only makes
/// collisions unlikely.
pub fn generate_id(prefix: &str, hex_len: usize) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    let hex_len = hex_len.min(random.len());
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_millis(),
        &random[..hex_len]
    )
}
