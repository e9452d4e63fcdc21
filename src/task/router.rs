//! Keyword routing of task descriptions.
//!
//! A description is lower-cased and checked for fixed keywords in a fixed
//! priority order. The first keyword present picks the topic; no keyword
//! means the generic investigation. Routing never fails.

use serde::{Deserialize, Serialize};

/// Recognized task topics, in routing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Fabric,
    Webpack,
    Phantom,
}

impl Topic {
    /// Priority order: earlier topics win when several keywords appear.
    pub const ALL: [Topic; 3] = [Topic::Fabric, Topic::Webpack, Topic::Phantom];

    pub fn keyword(&self) -> &'static str {
        match self {
            Topic::Fabric => "fabric",
            Topic::Webpack => "webpack",
            Topic::Phantom => "phantom",
        }
    }
}

/// Every topic whose keyword appears in `description`, in priority order.
pub fn topics_in(description: &str) -> Vec<Topic> {
    let lowered = description.to_lowercase();
    Topic::ALL
        .iter()
        .copied()
        .filter(|t| lowered.contains(t.keyword()))
        .collect()
}

/// The topic that decides the analysis result, if any.
pub fn route(description: &str) -> Option<Topic> {
    topics_in(description).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabric_is_case_insensitive() {
        assert_eq!(route("Why is FABRIC.js undefined?"), Some(Topic::Fabric));
        assert_eq!(route("fabric"), Some(Topic::Fabric));
    }

    #[test]
    fn fabric_wins_over_webpack_regardless_of_position() {
        assert_eq!(route("webpack bundle traps fabric"), Some(Topic::Fabric));
    }

    #[test]
    fn webpack_wins_over_phantom() {
        assert_eq!(route("phantom scripts in the webpack output"), Some(Topic::Webpack));
    }

    #[test]
    fn phantom_alone() {
        assert_eq!(route("404 on phantom loader"), Some(Topic::Phantom));
    }

    #[test]
    fn no_keyword_routes_to_none() {
        assert_eq!(route("tidy up CORS console noise"), None);
        assert_eq!(route(""), None);
    }

    #[test]
    fn topics_in_lists_all_matches_in_priority_order() {
        assert_eq!(
            topics_in("PHANTOM webpack Fabric"),
            vec![Topic::Fabric, Topic::Webpack, Topic::Phantom]
        );
    }
}
