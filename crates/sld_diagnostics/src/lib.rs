//! Diagnostic creation, severity management, and rendering for the router.
//!
//! Routing never fails on geometry: bends, lengths, collisions and fallbacks
//! are reported as structured [`Diagnostic`]s with a severity, a category-coded
//! [`DiagnosticCode`], and an optional plane location. The thread-safe
//! [`DiagnosticSink`] accumulates them across a batch, and
//! [`DiagnosticRenderer`] implementations format them for a terminal or JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::Label;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
