//! Analysis results and the analyzer seam.
//!
//! The default [`KeywordAnalyzer`] does no real investigation: it routes the
//! description to one of four fixed payloads. Other analyzers can be plugged
//! into the orchestrator through the [`Analyzer`] trait.

use super::Task;
use super::router::{Topic, route};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    FabricJsLoadingFailure,
    WebpackBundleInvestigation,
    PhantomScriptDetection,
    GenericInvestigation,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::FabricJsLoadingFailure => "fabric_js_loading_failure",
            AnalysisKind::WebpackBundleInvestigation => "webpack_bundle_investigation",
            AnalysisKind::PhantomScriptDetection => "phantom_script_detection",
            AnalysisKind::GenericInvestigation => "generic_investigation",
        }
    }

    /// The kind a description routes to.
    pub fn for_description(description: &str) -> Self {
        match route(description) {
            Some(Topic::Fabric) => AnalysisKind::FabricJsLoadingFailure,
            Some(Topic::Webpack) => AnalysisKind::WebpackBundleInvestigation,
            Some(Topic::Phantom) => AnalysisKind::PhantomScriptDetection,
            None => AnalysisKind::GenericInvestigation,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        })
    }
}

/// Structured output of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_type: AnalysisKind,
    pub summary: String,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub confidence: Confidence,
    /// Echo of the task description; only set on generic results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Produces a result for a task.
///
/// Implementations run on executor threads and must not assume which
/// thread calls them. A returned error fails the task.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, task: &Task) -> Result<AnalysisResult>;
}

/// Keyword-routed canned analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, task: &Task) -> Result<AnalysisResult> {
        Ok(canned_result(&task.description, Utc::now()))
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The fixed payload for a description.
pub fn canned_result(description: &str, analyzed_at: DateTime<Utc>) -> AnalysisResult {
    let kind = AnalysisKind::for_description(description);
    match kind {
        AnalysisKind::FabricJsLoadingFailure => AnalysisResult {
            analysis_type: kind,
            summary: "The global exposer script ships with the plugin but its handle is never registered, \
                      so the library stays inside the vendor bundle"
                .to_string(),
            findings: lines(&[
                "public/js/fabric-global-exposer.js is present on disk",
                "the public enqueue hook registers the designer exposer but not the fabric exposer",
                "the vendor bundle contains the library as a module with no global assignment",
                "window.fabric is never defined before dependent scripts run",
            ]),
            recommendations: lines(&[
                "register fabric-global-exposer with the vendor bundle as its dependency",
                "make the designer exposer depend on the fabric exposer handle",
                "confirm window.fabric is defined after the vendor bundle loads",
            ]),
            confidence: Confidence::High,
            task_description: None,
            analyzed_at,
        },
        AnalysisKind::WebpackBundleInvestigation => AnalysisResult {
            analysis_type: kind,
            summary: "The vendor bundle includes the library as a webpack module that is exported \
                      but never exposed globally"
                .to_string(),
            findings: lines(&[
                "vendor.bundle.js resolves the library from node_modules",
                "the bundle exports its classes only through the webpack module registry",
                "no script assigns the export to window",
            ]),
            recommendations: lines(&["load a dedicated exposer script after the vendor bundle"]),
            confidence: Confidence::High,
            task_description: None,
            analyzed_at,
        },
        AnalysisKind::PhantomScriptDetection => AnalysisResult {
            analysis_type: kind,
            summary: "Requests for deleted scripts come from stale registrations or cached markup"
                .to_string(),
            findings: lines(&[
                "emergency-fabric-loader.js is still requested after removal",
                "the references survive in the script registry or a page cache",
            ]),
            recommendations: lines(&["clear the object cache and the browser cache"]),
            confidence: Confidence::Medium,
            task_description: None,
            analyzed_at,
        },
        AnalysisKind::GenericInvestigation => AnalysisResult {
            analysis_type: kind,
            summary: "No specialised analysis matches this task".to_string(),
            findings: Vec::new(),
            recommendations: Vec::new(),
            confidence: Confidence::Low,
            task_description: Some(description.to_string()),
            analyzed_at,
        },
    }
}
