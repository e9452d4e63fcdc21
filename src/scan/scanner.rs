//! Probe execution against a codebase directory.

use super::profile::{Check, Probe, ScanProfile, Section, compile_glob};
use super::synthesis::{recommendations_for, root_cause_for};
use crate::error::{Result, SwarmError};
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Findings of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub name: String,
    pub capability: String,
    pub evidence: Vec<String>,
    /// Files the section's probes expected but did not find.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub profile: String,
    pub root: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<SectionReport>,
    /// All evidence lines in section order.
    pub evidence: Vec<String>,
    /// Probe values keyed by each probe's `detail`.
    pub details: BTreeMap<String, Value>,
    pub missing_files: Vec<String>,
    pub root_cause: String,
    pub recommendations: BTreeMap<String, String>,
}

/// Outcome of a single probe.
struct ProbeOutcome {
    value: Value,
    evidence: Option<String>,
    missing: Option<String>,
}

impl ProbeOutcome {
    fn found(value: Value, evidence: String) -> Self {
        Self {
            value,
            evidence: Some(evidence),
            missing: None,
        }
    }

    fn absent(value: Value) -> Self {
        Self {
            value,
            evidence: None,
            missing: None,
        }
    }

    fn missing(value: Value, file: &str) -> Self {
        Self {
            value,
            evidence: None,
            missing: Some(file.to_string()),
        }
    }
}

/// Run the profile's sections (optionally only those with a listed
/// capability) against `root`.
///
/// # Errors
///
/// - root is not a directory
/// - `capabilities` selects no section
/// - a file exists but cannot be read
pub fn scan(root: &Path, profile: &ScanProfile, capabilities: &[String]) -> Result<ScanReport> {
    if !root.is_dir() {
        return Err(SwarmError::UserError(format!(
            "scan root '{}' is not a directory",
            root.display()
        )));
    }

    let sections: Vec<&Section> = profile
        .sections
        .iter()
        .filter(|s| capabilities.is_empty() || capabilities.iter().any(|c| c == &s.capability))
        .collect();
    if sections.is_empty() && !capabilities.is_empty() {
        return Err(SwarmError::UserError(format!(
            "no sections match capabilities [{}]; available: {}",
            capabilities.join(", "),
            profile.capabilities().join(", ")
        )));
    }

    let mut report = ScanReport {
        profile: profile.name.clone(),
        root: root.to_path_buf(),
        generated_at: Utc::now(),
        sections: Vec::with_capacity(sections.len()),
        evidence: Vec::new(),
        details: BTreeMap::new(),
        missing_files: Vec::new(),
        root_cause: String::new(),
        recommendations: BTreeMap::new(),
    };

    for section in sections {
        let mut section_report = SectionReport {
            name: section.name.clone(),
            capability: section.capability.clone(),
            evidence: Vec::new(),
            missing: Vec::new(),
        };

        for probe in &section.probes {
            let outcome = run_probe(root, probe)?;
            report.details.insert(probe.detail.clone(), outcome.value);
            if let Some(line) = outcome.evidence {
                section_report.evidence.push(line);
            }
            if let Some(file) = outcome.missing {
                if !section_report.missing.contains(&file) {
                    section_report.missing.push(file.clone());
                }
                if !report.missing_files.contains(&file) {
                    report.missing_files.push(file);
                }
            }
        }

        tracing::debug!(
            section = %section_report.name,
            evidence = section_report.evidence.len(),
            missing = section_report.missing.len(),
            "section scanned"
        );
        report.evidence.extend(section_report.evidence.iter().cloned());
        report.sections.push(section_report);
    }

    report.root_cause = root_cause_for(profile, &report.evidence);
    report.recommendations = recommendations_for(profile, &report.evidence);
    Ok(report)
}

fn render(template: &str, value: &str) -> String {
    template.replace("{value}", value)
}

fn run_probe(root: &Path, probe: &Probe) -> Result<ProbeOutcome> {
    let file = probe.file.as_deref().unwrap_or_default();

    let outcome = match &probe.check {
        Check::GlobCount { pattern } => {
            let count = glob_count(root, pattern)?;
            ProbeOutcome::found(json!(count), render(&probe.evidence, &count.to_string()))
        }
        Check::Exists => {
            if root.join(file).is_file() {
                ProbeOutcome::found(json!(true), render(&probe.evidence, file))
            } else {
                ProbeOutcome::missing(json!(false), file)
            }
        }
        Check::Contains { needle, ignore_case } => match read_probe_file(root, file)? {
            None => ProbeOutcome::missing(json!(false), file),
            Some(content) if fold(&content, *ignore_case).contains(&*fold(needle, *ignore_case)) => {
                ProbeOutcome::found(json!(true), render(&probe.evidence, needle))
            }
            Some(_) => ProbeOutcome::absent(json!(false)),
        },
        Check::Count { needle, ignore_case } => match read_probe_file(root, file)? {
            None => ProbeOutcome::missing(json!(0), file),
            Some(content) => {
                let count = if needle.is_empty() {
                    0
                } else {
                    let needle = fold(needle, *ignore_case);
                    fold(&content, *ignore_case).matches(&*needle).count()
                };
                ProbeOutcome::found(json!(count), render(&probe.evidence, &count.to_string()))
            }
        },
        Check::Regex { pattern } => match read_probe_file(root, file)? {
            None => ProbeOutcome::missing(Value::Null, file),
            Some(content) => {
                let regex = Regex::new(pattern).map_err(|e| {
                    SwarmError::ValidationError(format!("invalid regex '{}' - {}", pattern, e))
                })?;
                let first = regex.captures(&content).and_then(|caps| {
                    caps.get(1)
                        .or_else(|| caps.get(0))
                        .map(|m| m.as_str().to_string())
                });
                match first {
                    Some(value) => {
                        let count = regex.find_iter(&content).count();
                        let line = render(&probe.evidence, &value).replace("{count}", &count.to_string());
                        ProbeOutcome::found(Value::String(value), line)
                    }
                    None => ProbeOutcome::absent(Value::Null),
                }
            }
        },
    };
    Ok(outcome)
}

fn fold(text: &str, ignore_case: bool) -> Cow<'_, str> {
    if ignore_case {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// File content, or `None` when the file does not exist.
fn read_probe_file(root: &Path, file: &str) -> Result<Option<String>> {
    let path = root.join(file);
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(&path)
        .map_err(|e| SwarmError::Io(format!("failed to read '{}': {}", path.display(), e)))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Count files under `root` whose root-relative path matches `pattern`.
///
/// Hidden files and ignore files are not honoured; every file counts.
fn glob_count(root: &Path, pattern: &str) -> Result<usize> {
    let matcher = compile_glob(pattern).map_err(SwarmError::ValidationError)?;

    let mut count = 0;
    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable path during scan");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if matcher.is_match(&relative) {
            count += 1;
        }
    }
    Ok(count)
}
