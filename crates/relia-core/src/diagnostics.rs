//! Non-fatal issues collected during a run.
//!
//! Errors abort the run (see [`crate::error`]); everything recorded here is a
//! warning that must reach the user without stopping the computation:
//!
//! - an ASAI value that had to be clamped into `[0, 1]`
//! - a conductor model string with no recognizable component
//!
//! ```
//! use relia_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning_with_entity("laying", "no laying component recognized", "B1-2");
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.issues_by_category("laying").count(), 1);
//! ```

use serde::Serialize;

/// A single warning raised during loading or aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticIssue {
    /// Category for grouping (e.g., "laying", "index")
    pub category: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Optional physical line in the source file (1-based, header on line 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Optional entity reference (segment id, summary scope)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
            line: None,
            entity: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[warning:{}] {}", self.category, self.message)?;

        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }

        Ok(())
    }
}

/// Collection of warnings for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: DiagnosticIssue) {
        self.issues.push(issue);
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.issues.push(DiagnosticIssue::new(category, message));
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(category, message).with_entity(entity));
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Merge another diagnostics into this one
    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn summary(&self) -> String {
        match self.warning_count() {
            0 => "No issues".to_string(),
            w => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
        }
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = DiagnosticIssue::new("laying", "defaulted to overhead")
            .with_entity("T4")
            .with_line(7);
        assert_eq!(
            issue.to_string(),
            "[warning:laying] defaulted to overhead (T4) at line 7"
        );
    }

    #[test]
    fn test_merge_and_summary() {
        let mut a = Diagnostics::new();
        a.add_warning("index", "ASAI clamped");
        let mut b = Diagnostics::new();
        b.add_warning_with_entity("laying", "no component", "B1-1");
        b.add_warning_with_entity("laying", "no component", "B1-2");
        a.merge(b);

        assert_eq!(a.warning_count(), 3);
        assert_eq!(a.summary(), "3 warnings");
        assert_eq!(a.issues_by_category("laying").count(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let diag = Diagnostics::new();
        assert!(!diag.has_warnings());
        assert_eq!(diag.summary(), "No issues");
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let mut diag = Diagnostics::new();
        diag.add_warning("index", "clamped");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"category\":\"index\""));
        assert!(!json.contains("line"));
        assert!(!json.contains("entity"));
    }
}
