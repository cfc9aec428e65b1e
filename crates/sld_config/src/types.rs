//! Configuration types deserialized from `sldroute.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The top-level engine configuration parsed from `sldroute.toml`.
///
/// Every section is optional; missing sections and fields take the defaults
/// documented on each type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-batch routing constraints.
    pub routing: RoutingConstraints,
    /// Iterative optimizer settings.
    pub optimizer: OptimizerSettings,
    /// Voltage thresholds used by the style resolver.
    pub style: StyleThresholds,
    /// Diagnostics history log sizing.
    pub history: HistorySettings,
}

/// Path generation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMethod {
    /// Straight segment from start to end, no collision avoidance.
    Direct,
    /// Orthogonal (horizontal/vertical) route with accept/reject collision checks.
    #[default]
    Manhattan,
    /// Grid-discretized A* search around obstacles.
    Astar,
}

impl RoutingMethod {
    /// All methods the engine implements, in declaration order.
    pub const ALL: [RoutingMethod; 3] = [
        RoutingMethod::Direct,
        RoutingMethod::Manhattan,
        RoutingMethod::Astar,
    ];

    /// The lowercase name used in configuration and output.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingMethod::Direct => "direct",
            RoutingMethod::Manhattan => "manhattan",
            RoutingMethod::Astar => "astar",
        }
    }
}

impl fmt::Display for RoutingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum wire spacing that applies from a voltage upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageSpacing {
    /// Lowest voltage (inclusive) this spacing applies to.
    pub min_voltage: f64,
    /// Required clearance around obstacles, in plane units.
    pub spacing: f64,
}

/// Routing constraints supplied per batch. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConstraints {
    /// Path generation strategy.
    pub method: RoutingMethod,
    /// Minimum clearance between a wire and a foreign component body.
    pub min_clearance: f64,
    /// Grid pitch for A* discretization and optimizer nudges.
    pub grid_size: f64,
    /// Bend count above which a route is flagged.
    pub max_bends: usize,
    /// Largest allowed deviation from straight at a bend, in degrees.
    pub max_bend_angle: f64,
    /// Segment headings considered conventional, in degrees.
    pub preferred_angles: Vec<f64>,
    /// Margin added around every component body to form its obstacle.
    pub component_padding: f64,
    /// Route length above which a route is flagged.
    pub max_wire_length: f64,
    /// Voltage-class spacing table; the highest matching row wins.
    pub voltage_spacing: Vec<VoltageSpacing>,
    /// Prefer candidates that cross fewer already-routed wires.
    pub minimize_crossings: bool,
    /// Keep intermediate segments horizontal or vertical.
    pub prefer_orthogonal: bool,
    /// Offset jogs of wires that share a component pair so they run side by side.
    pub group_parallel_wires: bool,
    /// Route connections in descending `voltage + current × 10` order.
    pub sort_by_priority: bool,
    /// Number of alternative paths computed per connection (0 to 3).
    pub alternative_count: usize,
    /// Cross-product tolerance for removing collinear waypoints.
    pub collinear_tolerance: f64,
}

impl Default for RoutingConstraints {
    fn default() -> Self {
        Self {
            method: RoutingMethod::Manhattan,
            min_clearance: 10.0,
            grid_size: 20.0,
            max_bends: 4,
            max_bend_angle: 135.0,
            preferred_angles: vec![0.0, 90.0, 180.0, 270.0],
            component_padding: 10.0,
            max_wire_length: 1000.0,
            voltage_spacing: vec![
                VoltageSpacing {
                    min_voltage: 600.0,
                    spacing: 15.0,
                },
                VoltageSpacing {
                    min_voltage: 1000.0,
                    spacing: 25.0,
                },
            ],
            minimize_crossings: true,
            prefer_orthogonal: true,
            group_parallel_wires: false,
            sort_by_priority: true,
            alternative_count: 3,
            collinear_tolerance: 1.0,
        }
    }
}

impl RoutingConstraints {
    /// Required clearance for a wire at `voltage`.
    ///
    /// Never less than [`min_clearance`](Self::min_clearance).
    pub fn spacing_for_voltage(&self, voltage: f64) -> f64 {
        self.voltage_spacing
            .iter()
            .filter(|row| voltage >= row.min_voltage)
            .map(|row| row.spacing)
            .fold(self.min_clearance, f64::max)
    }
}

/// Settings for the iterative path optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Hard cap on perturbation rounds per connection.
    pub max_iterations: usize,
    /// Relative score improvement below which the loop stops early.
    pub convergence_threshold: f64,
    /// Confidence reported for an unimproved, collision-free route.
    pub baseline_confidence: f64,
    /// Seed for the perturbation RNG, so runs are reproducible.
    pub seed: u64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_threshold: 0.001,
            baseline_confidence: 0.85,
            seed: 0x5f4d,
        }
    }
}

/// Voltage thresholds that select a wire style preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleThresholds {
    /// Voltage at or above which the high-voltage preset applies.
    pub high_voltage_threshold: f64,
    /// Voltage at or above which the standard preset applies.
    pub standard_voltage_threshold: f64,
}

impl Default for StyleThresholds {
    fn default() -> Self {
        Self {
            high_voltage_threshold: 480.0,
            standard_voltage_threshold: 120.0,
        }
    }
}

/// Sizing for the append-only routing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum retained entries; oldest entries are evicted first.
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}
