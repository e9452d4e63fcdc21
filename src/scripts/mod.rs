//! Script registration manifests and dependency ordering.
//!
//! A manifest declares script handles with their sources and dependencies,
//! the way a WordPress plugin registers scripts. Resolution produces a load
//! order in which every handle comes after all of its dependencies.
//!
//! # File Format
//!
//! ```yaml
//! scripts:
//!   - handle: vendor
//!     src: public/js/dist/vendor.bundle.js
//!   - handle: fabric-global-exposer
//!     src: public/js/fabric-global-exposer.js
//!     deps: [vendor]
//!   - handle: designer
//!     src: public/js/dist/designer.bundle.js
//!     deps: [fabric-global-exposer, jquery]
//!     in_footer: true
//! external: [jquery]
//! ```
//!
//! # Ordering Rules
//!
//! - Among handles whose dependencies are already placed, the one declared
//!   first goes next (stable order)
//! - Handles listed in `external` are provided elsewhere and count as loaded
//! - A footer script that a header script depends on is moved to the header
//! - Header scripts load before footer scripts

use crate::error::{Result, SwarmError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub handle: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub in_footer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScriptManifest {
    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,
    /// Handles registered outside this manifest (core or theme scripts).
    #[serde(default)]
    pub external: Vec<String>,
}

/// One script in resolved load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScript {
    pub handle: String,
    pub src: String,
    /// Effective placement after header promotion.
    pub in_footer: bool,
    /// Declared for the footer but moved to the header.
    pub promoted: bool,
}

/// Whether the declared order already satisfies a handle's dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleCheck {
    pub handle: String,
    /// Transitive manifest dependencies, in resolved load order.
    pub dependencies: Vec<String>,
    /// Transitive dependencies that are external.
    pub external: Vec<String>,
    /// Dependencies declared after the handle itself.
    pub declared_after: Vec<String>,
}

impl HandleCheck {
    pub fn is_satisfied(&self) -> bool {
        self.declared_after.is_empty()
    }
}

impl ScriptManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Io(format!(
                "failed to read script manifest '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| SwarmError::ValidationError(format!("invalid script manifest: {}", e)))
    }

    fn position_index(&self) -> Result<HashMap<&str, usize>> {
        let mut index = HashMap::new();
        for (i, script) in self.scripts.iter().enumerate() {
            if script.handle.trim().is_empty() {
                return Err(SwarmError::ValidationError(format!(
                    "script #{} has an empty handle",
                    i + 1
                )));
            }
            if index.insert(script.handle.as_str(), i).is_some() {
                return Err(SwarmError::ValidationError(format!(
                    "duplicate handle '{}'",
                    script.handle
                )));
            }
        }
        Ok(index)
    }

    /// Check handles are unique and every dependency is declared or external.
    pub fn validate(&self) -> Result<()> {
        let index = self.position_index()?;
        let external: HashSet<&str> = self.external.iter().map(String::as_str).collect();

        for script in &self.scripts {
            for dep in &script.deps {
                if !index.contains_key(dep.as_str()) && !external.contains(dep.as_str()) {
                    return Err(SwarmError::ValidationError(format!(
                        "'{}' depends on unknown handle '{}'; declare it or list it under external",
                        script.handle, dep
                    )));
                }
            }
        }
        Ok(())
    }

    /// Handles in dependency order, ignoring header/footer placement.
    pub fn dependency_order(&self) -> Result<Vec<&ScriptEntry>> {
        self.validate()?;
        let external: HashSet<&str> = self.external.iter().map(String::as_str).collect();

        let mut placed: HashSet<&str> = HashSet::new();
        let mut order: Vec<&ScriptEntry> = Vec::with_capacity(self.scripts.len());

        while order.len() < self.scripts.len() {
            let next = self.scripts.iter().find(|s| {
                !placed.contains(s.handle.as_str())
                    && s.deps
                        .iter()
                        .all(|d| placed.contains(d.as_str()) || external.contains(d.as_str()))
            });
            match next {
                Some(script) => {
                    placed.insert(script.handle.as_str());
                    order.push(script);
                }
                None => return Err(self.cycle_error(&placed)),
            }
        }
        Ok(order)
    }

    /// Resolve the full load order: header scripts first, then footer
    /// scripts, each group in dependency order.
    pub fn resolve(&self) -> Result<Vec<ResolvedScript>> {
        let order = self.dependency_order()?;
        let header = self.header_handles();

        let resolved: Vec<ResolvedScript> = order
            .into_iter()
            .map(|s| {
                let in_header = header.contains(s.handle.as_str());
                ResolvedScript {
                    handle: s.handle.clone(),
                    src: s.src.clone(),
                    in_footer: !in_header,
                    promoted: s.in_footer && in_header,
                }
            })
            .collect();

        let (head, foot): (Vec<_>, Vec<_>) = resolved.into_iter().partition(|s| !s.in_footer);
        Ok(head.into_iter().chain(foot).collect())
    }

    /// Handles that load in the header: declared there, or needed by one
    /// that is.
    fn header_handles(&self) -> HashSet<&str> {
        let by_handle: HashMap<&str, &ScriptEntry> = self
            .scripts
            .iter()
            .map(|s| (s.handle.as_str(), s))
            .collect();

        let mut header = HashSet::new();
        let mut stack: Vec<&str> = self
            .scripts
            .iter()
            .filter(|s| !s.in_footer)
            .map(|s| s.handle.as_str())
            .collect();

        while let Some(handle) = stack.pop() {
            if !header.insert(handle) {
                continue;
            }
            if let Some(script) = by_handle.get(handle) {
                stack.extend(
                    script
                        .deps
                        .iter()
                        .map(String::as_str)
                        .filter(|d| by_handle.contains_key(d)),
                );
            }
        }
        header
    }

    /// Check whether `handle` is declared after all of its transitive
    /// dependencies.
    pub fn check_handle(&self, handle: &str) -> Result<HandleCheck> {
        let order = self.dependency_order()?;
        let index = self.position_index()?;
        let Some(&own_position) = index.get(handle) else {
            return Err(SwarmError::NotFound(format!("Script handle '{}'", handle)));
        };

        let mut required: HashSet<&str> = HashSet::new();
        let mut external: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = self.scripts[own_position]
            .deps
            .iter()
            .map(String::as_str)
            .collect();
        while let Some(dep) = stack.pop() {
            match index.get(dep) {
                Some(&i) => {
                    if required.insert(dep) {
                        stack.extend(self.scripts[i].deps.iter().map(String::as_str));
                    }
                }
                None => {
                    if !external.iter().any(|e| e == dep) {
                        external.push(dep.to_string());
                    }
                }
            }
        }
        external.sort();

        let dependencies: Vec<String> = order
            .iter()
            .filter(|s| required.contains(s.handle.as_str()))
            .map(|s| s.handle.clone())
            .collect();
        let declared_after = dependencies
            .iter()
            .filter(|d| index.get(d.as_str()).is_some_and(|&i| i > own_position))
            .cloned()
            .collect();

        Ok(HandleCheck {
            handle: handle.to_string(),
            dependencies,
            external,
            declared_after,
        })
    }

    /// Build an error naming one cycle among the unplaced handles.
    fn cycle_error(&self, placed: &HashSet<&str>) -> SwarmError {
        let remaining: HashMap<&str, &ScriptEntry> = self
            .scripts
            .iter()
            .filter(|s| !placed.contains(s.handle.as_str()))
            .map(|s| (s.handle.as_str(), s))
            .collect();

        // Every remaining handle has an unplaced dependency, so following the
        // first one from any start must revisit a handle.
        let mut path: Vec<&str> = Vec::new();
        let mut current = self
            .scripts
            .iter()
            .map(|s| s.handle.as_str())
            .find(|h| remaining.contains_key(h));

        while let Some(handle) = current {
            if let Some(start) = path.iter().position(|h| *h == handle) {
                let mut cycle: Vec<&str> = path[start..].to_vec();
                cycle.push(handle);
                return SwarmError::ValidationError(format!(
                    "dependency cycle: {}",
                    cycle.join(" -> ")
                ));
            }
            path.push(handle);
            current = remaining.get(handle).and_then(|s| {
                s.deps
                    .iter()
                    .map(String::as_str)
                    .find(|d| remaining.contains_key(d))
            });
        }

        SwarmError::ValidationError(format!(
            "dependency cycle among: {}",
            path.join(", ")
        ))
    }
}
