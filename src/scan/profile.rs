//! Scan profiles: what to look for, and how to read the evidence.
//!
//! # File Format
//!
//! ```yaml
//! name: wordpress-script-loading
//! sections:
//!   - name: javascript_system
//!     capability: javascript_modules
//!     probes:
//!       - file: public/js/fabric-global-exposer.js
//!         check: { kind: contains, needle: "window.fabric" }
//!         detail: fabric_exposer_sets_global
//!         evidence: "Fabric global exposure logic found"
//!       - check: { kind: glob_count, pattern: "public/js/*.js" }
//!         detail: public_js_files
//!         evidence: "Found {value} public JavaScript files"
//! root_causes:
//!   - when_all: ["Canvas polling timeout", "Design preview"]
//!     unless_any: ["canvas element found"]
//!     text: "Frontend canvas code runs in an admin context without a canvas"
//! recommendations:
//!   - when_all: ["Webpack extraction"]
//!     key: webpack_fix
//!     text: "Load the library directly instead of extracting it from the bundle"
//! default_root_cause: "No single root cause identified"
//! ```

use crate::error::{Result, SwarmError};
use globset::{Glob, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Built-in profile used when `--profile` is not given.
pub const DEFAULT_PROFILE_YAML: &str = include_str!("default_profile.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProfile {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub root_causes: Vec<RootCauseRule>,
    #[serde(default)]
    pub recommendations: Vec<RecommendationRule>,
    #[serde(default = "default_root_cause")]
    pub default_root_cause: String,
}

fn default_root_cause() -> String {
    "No single root cause identified from the collected evidence".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Capability tag used by `--capability` filtering.
    pub capability: String,
    #[serde(default)]
    pub probes: Vec<Probe>,
}

/// One file check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    /// Path relative to the scan root. Not used by `glob_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub check: Check,
    /// Key under which the probe's value is recorded in the report details.
    pub detail: String,
    /// Evidence line template; `{value}` is replaced by the probe's value.
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// File is present. Evidence when it is.
    Exists,
    /// File contains `needle`. Evidence when it does.
    Contains {
        needle: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        ignore_case: bool,
    },
    /// Occurrences of `needle`. Evidence always, value is the count.
    Count {
        needle: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        ignore_case: bool,
    },
    /// Regex matches. Evidence when there is at least one match; the value
    /// is the first capture group (or the whole first match) and `{count}`
    /// in the evidence template is the number of matches.
    Regex { pattern: String },
    /// Files under the root whose relative path matches `pattern`.
    /// Evidence always, value is the count.
    GlobCount { pattern: String },
}

impl Check {
    pub fn kind(&self) -> &'static str {
        match self {
            Check::Exists => "exists",
            Check::Contains { .. } => "contains",
            Check::Count { .. } => "count",
            Check::Regex { .. } => "regex",
            Check::GlobCount { .. } => "glob_count",
        }
    }
}

/// Picks the root cause when every `when_all` needle appears in some
/// evidence line and no `unless_any` needle does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCauseRule {
    pub when_all: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless_any: Vec<String>,
    pub text: String,
}

/// Adds a keyed recommendation; matching works as for [`RootCauseRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub when_all: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless_any: Vec<String>,
    pub key: String,
    pub text: String,
}

impl ScanProfile {
    /// The built-in profile.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(DEFAULT_PROFILE_YAML)
    }

    /// Load and validate a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Io(format!(
                "failed to read scan profile '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let profile: ScanProfile = serde_yaml::from_str(content).map_err(|e| {
            SwarmError::ValidationError(format!("invalid scan profile: {}", e))
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check patterns compile and the profile is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let mut details = HashSet::new();

        for section in &self.sections {
            for probe in &section.probes {
                let at = format!("section '{}', probe '{}'", section.name, probe.detail);

                if !details.insert(probe.detail.as_str()) {
                    return Err(SwarmError::ValidationError(format!(
                        "duplicate detail key in {}",
                        at
                    )));
                }

                match &probe.check {
                    Check::GlobCount { pattern } => {
                        compile_glob(pattern).map_err(|e| {
                            SwarmError::ValidationError(format!("{}: {}", at, e))
                        })?;
                    }
                    check => {
                        if probe.file.as_deref().is_none_or(|f| f.trim().is_empty()) {
                            return Err(SwarmError::ValidationError(format!(
                                "{}: '{}' check needs a file",
                                at,
                                check.kind()
                            )));
                        }
                        if let Check::Regex { pattern } = check {
                            Regex::new(pattern).map_err(|e| {
                                SwarmError::ValidationError(format!(
                                    "{}: invalid regex '{}' - {}",
                                    at, pattern, e
                                ))
                            })?;
                        }
                    }
                }
            }
        }

        let empty_rule = self.root_causes.iter().any(|r| r.when_all.is_empty())
            || self.recommendations.iter().any(|r| r.when_all.is_empty());
        if empty_rule {
            return Err(SwarmError::ValidationError(
                "every rule needs at least one when_all entry".to_string(),
            ));
        }

        Ok(())
    }

    /// Distinct capability tags in section order.
    pub fn capabilities(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for section in &self.sections {
            if !seen.contains(&section.capability.as_str()) {
                seen.push(section.capability.as_str());
            }
        }
        seen
    }
}

pub(crate) fn compile_glob(pattern: &str) -> std::result::Result<GlobMatcher, String> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| format!("invalid glob pattern '{}' - {}", pattern, e))
}
