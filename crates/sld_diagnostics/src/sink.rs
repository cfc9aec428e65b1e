//! Shared collector for the issues a routing batch raises.
//!
//! One sink lives for one batch. Input failures, algorithm fallbacks, and the
//! per-connection issue lists all land here in routing order, so the caller
//! can render them together once the batch is done.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects diagnostics from every connection routed in a batch.
///
/// `emit` takes `&self`, so one sink can be shared by reference across a
/// batch (or across threads). Error and critical diagnostics also bump an
/// atomic counter; the CLI derives its exit code from [`has_errors`](Self::has_errors)
/// without locking the list.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a sink for a new batch.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.diagnostics.lock().unwrap().push(diag);
    }

    /// Records a connection's whole issue list in order.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// Returns `true` once any connection has raised an error or critical issue.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Error and critical diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Diagnostics recorded so far at exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Snapshot of everything recorded, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
