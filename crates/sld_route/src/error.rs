//! Error types for requests the engine cannot honour.

use thiserror::Error;

/// Hard failures surfaced to the caller.
///
/// Geometry problems and collisions are never errors; they degrade to a
/// best-effort path plus advisory records. Only unresolvable references and
/// unsupported output formats end up here.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A connection names a component that is not in the batch.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    /// A connection names a terminal the component does not expose.
    #[error("component '{component}' has no terminal '{terminal}'")]
    UnknownTerminal {
        /// The component that was searched.
        component: String,
        /// The terminal id that was requested.
        terminal: String,
    },

    /// The component exposes no terminals at all.
    #[error("component '{0}' has no terminals")]
    NoTerminals(String),

    /// The requested export format is not supported.
    #[error("unsupported export format '{0}' (expected csv or json)")]
    UnsupportedFormat(String),

    /// Serializing an export failed.
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_terminal() {
        let err = RouteError::UnknownTerminal {
            component: "INV1".into(),
            terminal: "dc_in".into(),
        };
        assert_eq!(err.to_string(), "component 'INV1' has no terminal 'dc_in'");
    }

    #[test]
    fn display_unsupported_format() {
        let err = RouteError::UnsupportedFormat("xml".into());
        assert!(err.to_string().contains("'xml'"));
    }
}
