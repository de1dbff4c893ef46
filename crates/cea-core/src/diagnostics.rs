//! Findings of street network and line catalog validation.
//!
//! Validation records every problem instead of stopping at the first one,
//! so a caller can print the full report and then decide whether the data
//! is usable ([`Diagnostics::has_errors`]).
//!
//! ```
//! use cea_core::diagnostics::{Diagnostics, Subject};
//! use cea_core::NodeId;
//!
//! let mut diag = Diagnostics::new();
//! diag.warning(Subject::Node(NodeId::new(3)), "Consumer has no peak demand");
//! diag.error(Subject::LineType(2), "Non-positive current rating");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert!(diag.has_errors());
//! ```

use crate::{NodeId, SegmentId};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious data that still yields a plan
    Warning,
    /// Data that breaks candidate generation or gene decoding
    Error,
}

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Subject {
    /// The street network as a whole
    Network,
    Node(NodeId),
    Segment(SegmentId),
    /// Catalog entry by gene index
    LineType(usize),
    /// The catalog as a whole
    Catalog,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Network => f.write_str("network"),
            Subject::Node(id) => write!(f, "node {}", id.value()),
            Subject::Segment(id) => write!(f, "segment {}", id.value()),
            Subject::LineType(index) => write!(f, "line type {index}"),
            Subject::Catalog => f.write_str("catalog"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    pub subject: Subject,
    pub message: String,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}: {}: {}", self.subject, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning(&mut self, subject: Subject, message: impl Into<String>) {
        self.push(Severity::Warning, subject, message.into());
    }

    pub fn error(&mut self, subject: Subject, message: impl Into<String>) {
        self.push(Severity::Error, subject, message.into());
    }

    fn push(&mut self, severity: Severity, subject: Subject, message: String) {
        self.issues.push(DiagnosticIssue {
            severity,
            subject,
            message,
        });
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// "No issues", "2 warnings", "1 warning, 3 errors", ...
    pub fn summary(&self) -> String {
        let plural = |n: usize, word: &str| format!("{n} {word}{}", if n == 1 { "" } else { "s" });
        match (self.warning_count(), self.error_count()) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => plural(w, "warning"),
            (0, e) => plural(e, "error"),
            (w, e) => format!("{}, {}", plural(w, "warning"), plural(e, "error")),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pluralizes() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.summary(), "No issues");

        diag.warning(Subject::Network, "no consumer");
        assert_eq!(diag.summary(), "1 warning");

        diag.error(Subject::Catalog, "empty");
        assert_eq!(diag.summary(), "1 warning, 1 error");

        diag.warning(Subject::Segment(SegmentId::new(4)), "zero length");
        assert_eq!(diag.summary(), "2 warnings, 1 error");
    }

    #[test]
    fn issue_names_its_subject() {
        let mut diag = Diagnostics::new();
        diag.error(Subject::LineType(2), "Non-positive current rating");
        let text = diag.errors().next().unwrap().to_string();
        assert_eq!(text, "error: line type 2: Non-positive current rating");
    }

    #[test]
    fn serializes_subject_with_id() {
        let mut diag = Diagnostics::new();
        diag.error(Subject::Node(NodeId::new(7)), "Negative peak demand");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains(r#""subject":{"kind":"node","id":7}"#), "{json}");
        assert!(json.contains(r#""severity":"error""#));
    }
}
