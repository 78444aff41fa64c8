//! Diagnostic reports produced by the validator and consistency checker.
//!
//! Reports are developer-facing; the HTTP layer never forwards their issue
//! strings to end users.

use serde::Serialize;

use super::model::Analysis;

/// Outcome of structural validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// One human-readable line per violated rule.
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Creates an empty (valid) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violated rule.
    pub fn push(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// True when no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Outcome of cross-field consistency checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub issues: Vec<String>,
    /// Corrected analysis covering every issue, when one could be produced.
    pub corrected: Option<Analysis>,
}

impl ConsistencyReport {
    /// True when no cross-field invariant was violated.
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when issues exist and every one of them was corrected.
    pub fn is_correctable(&self) -> bool {
        !self.issues.is_empty() && self.corrected.is_some()
    }
}
