//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[R102]: sharp bend of 150.0° exceeds the 135.0° limit
///   --> connection pv-to-inv at (120, 40)
///    - (140, 40): next segment turns back here
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let severity = diag.severity.to_string();
        if !self.color {
            return format!("{severity}[{}]: {}", diag.code, diag.message);
        }
        let ansi = match diag.severity {
            crate::Severity::Critical => "1;35",
            crate::Severity::Error => "1;31",
            crate::Severity::Warning => "1;33",
            crate::Severity::Note => "1;36",
        };
        format!(
            "\x1b[{ansi}m{severity}[{}]\x1b[0m: {}",
            diag.code, diag.message
        )
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = self.header(diag);
        out.push('\n');

        // Location line
        match (&diag.connection, diag.location) {
            (Some(conn), Some(at)) => out.push_str(&format!("  --> connection {conn} at {at}\n")),
            (Some(conn), None) => out.push_str(&format!("  --> connection {conn}\n")),
            (None, Some(at)) => out.push_str(&format!("  --> {at}\n")),
            (None, None) => {}
        }

        for label in &diag.labels {
            out.push_str(&format!("   - {}: {}\n", label.location, label.message));
        }

        // Notes
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        // Help
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as a single-line JSON object.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        serde_json::to_string(diag).unwrap_or_else(|_| "{}".to_string())
    }
}
