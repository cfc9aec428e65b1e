//! Wire styling from a connection's electrical attributes.
//!
//! Conductor class picks a fixed preset for DC, ground, and control wiring.
//! Everything else is styled by voltage against the configured thresholds.
//! Resolution is a pure function of the connection and the thresholds.

use crate::model::{ConductorClass, Connection};
use crate::path::{segments, RoutingPoint};
use serde::{Deserialize, Serialize};
use sld_config::StyleThresholds;
use sld_geom::Point;

/// Named style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    /// At or above the high-voltage threshold.
    HighVoltage,
    /// At or above the standard threshold.
    Standard,
    /// Below the standard threshold.
    LowVoltage,
    /// DC conductors.
    Dc,
    /// Grounding conductors.
    Ground,
    /// Control wiring.
    Control,
}

/// Everything a renderer needs to draw a wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireStyle {
    /// Preset this style came from.
    pub preset: StylePreset,
    /// Stroke width in plane units.
    pub stroke_width: f64,
    /// Stroke color as `#rrggbb`.
    pub color: String,
    /// Dash pattern; empty for a solid stroke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
    /// Inline label, e.g. `480V AC 30A`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WireStyle {
    fn preset(preset: StylePreset) -> Self {
        let (stroke_width, color, dash): (f64, &str, &[f64]) = match preset {
            StylePreset::HighVoltage => (4.0, "#d32f2f", &[]),
            StylePreset::Standard => (2.0, "#212121", &[]),
            StylePreset::LowVoltage => (1.5, "#616161", &[6.0, 3.0]),
            StylePreset::Dc => (2.5, "#ef6c00", &[]),
            StylePreset::Ground => (1.5, "#2e7d32", &[8.0, 3.0, 2.0, 3.0]),
            StylePreset::Control => (1.0, "#7b1fa2", &[4.0, 4.0]),
        };
        Self {
            preset,
            stroke_width,
            color: color.to_string(),
            dash: dash.to_vec(),
            label: None,
        }
    }

    /// Returns `true` for a dashed stroke.
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// Resolves the style for a connection.
pub fn resolve_style(connection: &Connection, thresholds: &StyleThresholds) -> WireStyle {
    let preset = match connection.class {
        ConductorClass::Dc => StylePreset::Dc,
        ConductorClass::Ground => StylePreset::Ground,
        ConductorClass::Control => StylePreset::Control,
        ConductorClass::Power | ConductorClass::Ac => {
            if connection.voltage >= thresholds.high_voltage_threshold {
                StylePreset::HighVoltage
            } else if connection.voltage >= thresholds.standard_voltage_threshold {
                StylePreset::Standard
            } else {
                StylePreset::LowVoltage
            }
        }
    };
    WireStyle {
        label: label(connection),
        ..WireStyle::preset(preset)
    }
}

fn label(connection: &Connection) -> Option<String> {
    let mut parts = Vec::new();
    match connection.class {
        ConductorClass::Ground => return Some("GND".to_string()),
        ConductorClass::Dc if connection.voltage > 0.0 => {
            parts.push(format!("{}VDC", connection.voltage));
        }
        ConductorClass::Control => {
            if connection.voltage > 0.0 {
                parts.push(format!("{}V", connection.voltage));
            }
            parts.push("CTRL".to_string());
        }
        ConductorClass::Ac if connection.voltage > 0.0 => {
            parts.push(format!("{}V AC", connection.voltage));
        }
        _ if connection.voltage > 0.0 => parts.push(format!("{}V", connection.voltage)),
        _ => {}
    }
    if connection.current > 0.0 {
        parts.push(format!("{}A", connection.current));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// One drawable segment of a routed wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledSegment {
    /// Segment start.
    pub start: Point,
    /// Segment end.
    pub end: Point,
    /// Full style; only the longest segment carries the label.
    pub style: WireStyle,
}

/// Splits a path into styled segments, placing the label on the longest one.
pub fn style_segments(path: &[RoutingPoint], style: &WireStyle) -> Vec<StyledSegment> {
    let pairs: Vec<(Point, Point)> = segments(path).collect();
    let longest = pairs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.0.distance(a.1).total_cmp(&b.0.distance(b.1)))
        .map(|(i, _)| i);

    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| {
            let mut segment_style = style.clone();
            if Some(i) != longest {
                segment_style.label = None;
            }
            StyledSegment {
                start,
                end,
                style: segment_style,
            }
        })
        .collect()
}
