//! Path-based resolution policy.
//!
//! A policy document maps glob patterns to the side of a conflict that
//! should win for matching files:
//!
//! ```toml
//! [files]
//! ours   = ["src/*", "Cargo.lock"]
//! theirs = ["docs/*"]
//! ```
//!
//! The document decodes into an ordered list of [`PolicyRule`]s (all `ours`
//! patterns first, then `theirs`, each in document order) and lookup is
//! first-match-wins. Files matched by no rule fall back to keeping both
//! sides at resolution time.
//!
//! Policy loading is deliberately forgiving: a missing or malformed
//! document yields the empty rule set, never an error, so a resolve run
//! always completes. The strict decoder is only used by `validate`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::PolicyError;
use crate::pattern::PathMatcher;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// The side of a conflict a policy rule selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep the region between the start marker and the delimiter.
    Ours,
    /// Keep the region between the delimiter and the end marker.
    Theirs,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy document
// ---------------------------------------------------------------------------

/// The on-disk TOML policy document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Pattern lists keyed by strategy.
    #[serde(default)]
    pub files: FilesSection,
}

/// The `[files]` section of the policy document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesSection {
    /// Patterns whose matches keep the "ours" side.
    #[serde(default)]
    pub ours: Vec<String>,

    /// Patterns whose matches keep the "theirs" side.
    #[serde(default)]
    pub theirs: Vec<String>,
}

impl PolicyDocument {
    /// Strictly load and decode a policy document.
    pub fn load_from_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| PolicyError::Parse {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Flatten into the ordered `(pattern, strategy)` list: `ours` rules
    /// first, then `theirs`, each preserving document order.
    pub fn into_rules(self) -> Vec<(String, Strategy)> {
        let mut rules = Vec::with_capacity(self.files.ours.len() + self.files.theirs.len());
        rules.extend(self.files.ours.into_iter().map(|p| (p, Strategy::Ours)));
        rules.extend(self.files.theirs.into_iter().map(|p| (p, Strategy::Theirs)));
        rules
    }
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// One compiled policy rule.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    matcher: PathMatcher,
    strategy: Strategy,
}

impl PolicyRule {
    /// The rule's original glob pattern.
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    /// The strategy this rule selects.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

/// Ordered rule list with first-match-wins lookup.
#[derive(Debug, Clone, Default)]
pub struct PolicyRuleSet {
    rules: Vec<PolicyRule>,
}

impl PolicyRuleSet {
    /// The rule set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile an ordered `(pattern, strategy)` list.
    ///
    /// Patterns that fail to compile are skipped with a warning; rule-set
    /// construction itself never fails.
    pub fn from_rules(rules: Vec<(String, Strategy)>) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        for (pattern, strategy) in rules {
            match PathMatcher::new(&pattern) {
                Ok(matcher) => compiled.push(PolicyRule { matcher, strategy }),
                Err(e) => {
                    warn!(pattern = pattern.as_str(), error = %e, "policy rule skipped");
                }
            }
        }
        Self { rules: compiled }
    }

    /// Load the policy document at `path`, degrading to the empty rule set
    /// when the document is missing or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no policy document, resolving without rules");
            return Self::empty();
        }
        match PolicyDocument::load_from_file(path) {
            Ok(doc) => {
                let set = Self::from_rules(doc.into_rules());
                debug!(path = %path.display(), rules = set.len(), "policy document loaded");
                set
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable policy document, resolving without rules");
                Self::empty()
            }
        }
    }

    /// Strategy of the first rule matching `path`, if any.
    ///
    /// `path` is relative to the scan root, forward-slash separated.
    pub fn resolve_strategy(&self, path: &str) -> Option<Strategy> {
        for rule in &self.rules {
            if rule.matcher.matches(path) {
                debug!(
                    path,
                    pattern = rule.pattern(),
                    strategy = %rule.strategy,
                    "policy rule matched"
                );
                return Some(rule.strategy);
            }
        }
        None
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when no rules are present.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The compiled rules, in lookup order.
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }
}
