//! Root cause and recommendation rules over collected evidence.

use super::profile::ScanProfile;
use std::collections::BTreeMap;

fn mentioned(evidence: &[String], needle: &str) -> bool {
    evidence.iter().any(|line| line.contains(needle))
}

fn rule_matches(evidence: &[String], when_all: &[String], unless_any: &[String]) -> bool {
    when_all.iter().all(|n| mentioned(evidence, n)) && !unless_any.iter().any(|n| mentioned(evidence, n))
}

/// Text of the first matching root-cause rule, or the profile default.
pub fn root_cause_for(profile: &ScanProfile, evidence: &[String]) -> String {
    profile
        .root_causes
        .iter()
        .find(|r| rule_matches(evidence, &r.when_all, &r.unless_any))
        .map(|r| r.text.clone())
        .unwrap_or_else(|| profile.default_root_cause.clone())
}

/// Every matching recommendation, keyed by rule key. A later rule with the
/// same key does not replace an earlier one.
pub fn recommendations_for(profile: &ScanProfile, evidence: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for rule in &profile.recommendations {
        if rule_matches(evidence, &rule.when_all, &rule.unless_any) {
            out.entry(rule.key.clone()).or_insert_with(|| rule.text.clone());
        }
    }
    out
}
