//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic or collision record.
///
/// Ordered from least severe (`Note`) to most severe (`Critical`), matching the
/// derived `PartialOrd`/`Ord` implementation based on declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory information that doesn't indicate a problem.
    Note,
    /// A potential issue that should be reviewed.
    Warning,
    /// A definite drafting problem the caller may refuse to accept.
    Error,
    /// A problem severe enough that the drawing is likely unsafe to issue.
    Critical,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error) or worse.
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
