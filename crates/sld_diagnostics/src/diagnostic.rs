//! Structured diagnostic messages with severity, codes, locations, and labels.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use sld_geom::Point;

/// A structured diagnostic message about one connection or the whole batch.
///
/// Each diagnostic includes:
/// - A severity level and unique code
/// - A primary message and, when meaningful, a plane location
/// - The connection it concerns, if any
/// - Optional secondary labels, notes, and help text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The connection this diagnostic concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// Where on the diagram the issue was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
    /// Additional annotated locations providing context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Explanatory footnotes (e.g., "note: ...").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            connection: None,
            location: None,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new critical diagnostic.
    pub fn critical(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, code, message)
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    /// Attaches the connection this diagnostic concerns.
    pub fn for_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    /// Sets the primary location.
    pub fn at(mut self, location: Point) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Route, 102);
        let diag = Diagnostic::error(code, "sharp bend");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "sharp bend");
        assert_eq!(format!("{}", diag.code), "R102");
        assert!(diag.location.is_none());
    }

    #[test]
    fn create_critical_and_note() {
        let code = DiagnosticCode::new(Category::Collision, 201);
        assert_eq!(Diagnostic::critical(code, "x").severity, Severity::Critical);
        assert_eq!(Diagnostic::note(code, "x").severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Collision, 201);
        let diag = Diagnostic::warning(code, "wire crosses component")
            .for_connection("c1")
            .at(Point::new(40.0, 0.0))
            .with_label(Label::new(Point::new(50.0, 0.0), "INV1 body"))
            .with_note("obstacle priority 9")
            .with_help("try the doubled-clearance alternative");
        assert_eq!(diag.connection.as_deref(), Some("c1"));
        assert_eq!(diag.location, Some(Point::new(40.0, 0.0)));
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn serde_skips_empty_fields() {
        let code = DiagnosticCode::new(Category::Route, 101);
        let diag = Diagnostic::warning(code, "too long");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("labels"));
        assert!(!json.contains("location"));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
