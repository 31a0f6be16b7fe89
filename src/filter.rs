use regex::Regex;

use crate::error::PsshError;

/// Keeps the node names an unanchored regex finds a match in.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    pattern: Regex,
}

impl NodeFilter {
    pub const MATCH_ALL: &'static str = ".*";

    pub fn new(pattern: &str) -> Result<Self, PsshError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, node: &str) -> bool {
        self.pattern.is_match(node)
    }

    /// Order is preserved and duplicates are kept.
    pub fn filter(&self, nodes: Vec<String>) -> Vec<String> {
        nodes.into_iter().filter(|n| self.is_match(n)).collect()
    }
}

impl Default for NodeFilter {
    fn default() -> Self {
        Self {
            pattern: Regex::new(Self::MATCH_ALL).expect("match-all pattern compiles"),
        }
    }
}
