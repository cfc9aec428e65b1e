//! Bounded, append-only routing history.
//!
//! The history is the one piece of state a [`RoutingSession`](crate::RoutingSession)
//! shares across batches. Routing only ever writes to it; it is read back for
//! statistics and export, never fed into path computation. All access goes
//! through a single mutex so concurrent batches can record safely.

use crate::error::RouteError;
use crate::ids::HistoryEntryId;
use crate::path::length;
use crate::scoring::complexity;
use crate::session::RoutingResult;
use serde::{Deserialize, Serialize};
use sld_config::RoutingMethod;
use sld_geom::Point;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Column order of the CSV export. Stable within a release.
pub const CSV_COLUMNS: &str = "id,connection,length,complexity,collisions,confidence,processing_ms";

/// One routed connection as remembered by the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sequence number, unique within a session.
    pub id: HistoryEntryId,
    /// Connection id.
    pub connection: String,
    /// Strategy that produced the path.
    pub algorithm: RoutingMethod,
    /// Final path length.
    pub length: f64,
    /// Final path complexity.
    pub complexity: f64,
    /// Collision records on the final path.
    pub collisions: usize,
    /// Reported confidence.
    pub confidence: f64,
    /// Optimizer improvement.
    pub improvement_percent: f64,
    /// Optimizer wall-clock time.
    pub processing_ms: f64,
}

/// A user correction to a routed connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Connection id.
    pub connection: String,
    /// The path the user drew instead.
    pub corrected_path: Vec<Point>,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Capability and usage summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Strategies the engine implements.
    pub algorithms: Vec<RoutingMethod>,
    /// Routes currently retained in the history.
    pub historical_routes: usize,
    /// Mean optimizer improvement over retained routes.
    pub average_improvement_percent: f64,
    /// Feedback entries currently retained.
    pub feedback_count: usize,
}

/// History export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of entries.
    Json,
}

impl FromStr for ExportFormat {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(RouteError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct HistoryLog {
    routes: VecDeque<HistoryEntry>,
    feedback: VecDeque<FeedbackEntry>,
    next_id: u32,
}

/// Thread-safe bounded log of routing results and feedback.
///
/// Each list keeps at most `capacity` entries; the oldest go first.
#[derive(Debug)]
pub struct RoutingHistory {
    log: Mutex<HistoryLog>,
    capacity: usize,
}

impl RoutingHistory {
    /// Creates an empty history. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            log: Mutex::new(HistoryLog::default()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a summary of `result` and returns its id.
    pub fn record(&self, result: &RoutingResult) -> HistoryEntryId {
        let mut log = self.lock();
        let id = HistoryEntryId::from_raw(log.next_id);
        log.next_id = log.next_id.wrapping_add(1);
        if log.routes.len() == self.capacity {
            log.routes.pop_front();
        }
        log.routes.push_back(HistoryEntry {
            id,
            connection: result.connection_id.clone(),
            algorithm: result.algorithm_used,
            length: length(&result.path),
            complexity: complexity(&result.path),
            collisions: result.collisions.len(),
            confidence: result.confidence,
            improvement_percent: result.stats.improvement_percent,
            processing_ms: result.stats.processing_ms,
        });
        id
    }

    /// Stores a user correction.
    pub fn record_feedback(&self, connection: &str, corrected_path: Vec<Point>, note: Option<String>) {
        let mut log = self.lock();
        if log.feedback.len() == self.capacity {
            log.feedback.pop_front();
        }
        log.feedback.push_back(FeedbackEntry {
            connection: connection.to_string(),
            corrected_path,
            note,
        });
    }

    /// Number of retained routes.
    pub fn len(&self) -> usize {
        self.lock().routes.len()
    }

    /// Returns `true` if no routes are retained.
    pub fn is_empty(&self) -> bool {
        self.lock().routes.is_empty()
    }

    /// Snapshot of the retained routes, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().routes.iter().cloned().collect()
    }

    /// Snapshot of the retained feedback, oldest first.
    pub fn feedback(&self) -> Vec<FeedbackEntry> {
        self.lock().feedback.iter().cloned().collect()
    }

    /// Capability and usage summary.
    pub fn stats(&self) -> EngineStats {
        let log = self.lock();
        let average_improvement_percent = if log.routes.is_empty() {
            0.0
        } else {
            log.routes.iter().map(|e| e.improvement_percent).sum::<f64>() / log.routes.len() as f64
        };
        EngineStats {
            algorithms: RoutingMethod::ALL.to_vec(),
            historical_routes: log.routes.len(),
            average_improvement_percent,
            feedback_count: log.feedback.len(),
        }
    }

    /// Exports retained routes in `format`.
    pub fn export(&self, format: ExportFormat) -> Result<String, RouteError> {
        let entries = self.entries();
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
            ExportFormat::Csv => {
                let mut out = String::from(CSV_COLUMNS);
                out.push('\n');
                for e in &entries {
                    let _ = writeln!(
                        out,
                        "{},{},{:.2},{:.4},{},{:.4},{:.3}",
                        e.id,
                        csv_field(&e.connection),
                        e.length,
                        e.complexity,
                        e.collisions,
                        e.confidence,
                        e.processing_ms
                    );
                }
                Ok(out)
            }
        }
    }

    /// Exports retained routes in the format named by `format`.
    ///
    /// Unknown names fail with [`RouteError::UnsupportedFormat`].
    pub fn export_as(&self, format: &str) -> Result<String, RouteError> {
        self.export(format.parse()?)
    }
}

impl Default for RoutingHistory {
    fn default() -> Self {
        Self::new(sld_config::HistorySettings::default().capacity)
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::OptimizationStats;
    use crate::path::RoutingPoint;
    use crate::style::{resolve_style, style_segments};
    use crate::model::{ConductorClass, Connection, Endpoint};

    fn result(id: &str, improvement: f64) -> RoutingResult {
        let path = vec![
            RoutingPoint::start(Point::new(0.0, 0.0)),
            RoutingPoint::end(Point::new(30.0, 40.0)),
        ];
        let conn = Connection::new(
            id,
            Endpoint::component("A"),
            Endpoint::component("B"),
            240.0,
            10.0,
            ConductorClass::Ac,
        );
        let style = resolve_style(&conn, &Default::default());
        RoutingResult {
            connection_id: id.to_string(),
            segments: style_segments(&path, &style),
            path,
            style,
            alternatives: Vec::new(),
            confidence: 0.9,
            score: 0.99,
            stats: OptimizationStats {
                improver: "waypoint-nudge".into(),
                iterations: 1,
                initial_score: 0.9,
                final_score: 0.9,
                improvement_percent: improvement,
                processing_ms: 0.5,
            },
            collisions: Vec::new(),
            issues: Vec::new(),
            requested_method: RoutingMethod::Manhattan,
            algorithm_used: RoutingMethod::Manhattan,
        }
    }

    #[test]
    fn record_assigns_sequential_ids() {
        let history = RoutingHistory::new(10);
        assert!(history.is_empty());
        assert_eq!(history.record(&result("a", 0.0)).as_raw(), 0);
        assert_eq!(history.record(&result("b", 0.0)).as_raw(), 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].length, 50.0);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let history = RoutingHistory::new(2);
        for id in ["a", "b", "c"] {
            history.record(&result(id, 0.0));
        }
        let ids: Vec<String> = history.entries().into_iter().map(|e| e.connection).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn stats_average_improvement() {
        let history = RoutingHistory::new(10);
        history.record(&result("a", 10.0));
        history.record(&result("b", 30.0));
        history.record_feedback("a", vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)], None);
        let stats = history.stats();
        assert_eq!(stats.historical_routes, 2);
        assert_eq!(stats.average_improvement_percent, 20.0);
        assert_eq!(stats.feedback_count, 1);
        assert_eq!(stats.algorithms.len(), 3);
    }

    #[test]
    fn csv_export_has_stable_header() {
        let history = RoutingHistory::new(10);
        history.record(&result("pv,1", 0.0));
        let csv = history.export(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_COLUMNS));
        assert_eq!(lines.next(), Some("0,\"pv,1\",50.00,0.0000,0,0.9000,0.500"));
    }

    #[test]
    fn json_export_parses() {
        let history = RoutingHistory::new(10);
        history.record(&result("a", 5.0));
        let json = history.export_as("json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["connection"], "a");
        assert_eq!(value[0]["algorithm"], "manhattan");
    }

    #[test]
    fn unknown_format_is_an_error() {
        let history = RoutingHistory::new(10);
        let err = history.export_as("xlsx").unwrap_err();
        assert!(matches!(err, RouteError::UnsupportedFormat(ref f) if f == "xlsx"));
    }

    #[test]
    fn concurrent_records() {
        use std::sync::Arc;
        use std::thread;

        let history = Arc::new(RoutingHistory::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let history = Arc::clone(&history);
                thread::spawn(move || {
                    for i in 0..25 {
                        history.record(&result(&format!("t{t}-{i}"), 0.0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(history.len(), 200);
    }
}
