//! Input records for a routing batch: components, terminals, and connections.
//!
//! These mirror what a diagram editor hands the engine. Components carry a
//! free-form type tag; [`ComponentKind::from_tag`] maps it onto the kinds the
//! engine knows a terminal layout for.

use serde::{Deserialize, Serialize};
use sld_geom::{Point, Rect};
use std::fmt;

/// Electrical role of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalRole {
    /// Receives power or signal.
    Input,
    /// Supplies power or signal.
    Output,
    /// Either direction (battery, utility tie).
    Bidirectional,
    /// Equipment ground.
    Ground,
    /// Neutral conductor.
    Neutral,
}

/// Conductor class of a terminal or connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConductorClass {
    /// Generic power conductor, styled by voltage.
    #[default]
    Power,
    /// Low-energy control or signal wiring.
    Control,
    /// Direct current.
    Dc,
    /// Alternating current.
    Ac,
    /// Grounding conductor.
    Ground,
}

impl ConductorClass {
    /// The lowercase name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            ConductorClass::Power => "power",
            ConductorClass::Control => "control",
            ConductorClass::Dc => "dc",
            ConductorClass::Ac => "ac",
            ConductorClass::Ground => "ground",
        }
    }
}

impl fmt::Display for ConductorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component kinds with a known terminal layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Panelboard or switchboard.
    Panel,
    /// PV array.
    Array,
    /// Inverter.
    Inverter,
    /// DC combiner box.
    Combiner,
    /// Disconnect, breaker, or fuse.
    Disconnect,
    /// Revenue or production meter.
    Meter,
    /// Transformer.
    Transformer,
    /// Battery bank.
    Battery,
    /// Generator.
    Generator,
    /// Utility service point.
    Utility,
    /// Load or motor.
    Load,
    /// Ground bar or electrode.
    Ground,
    /// Controller or relay.
    Controller,
    /// Anything else.
    Generic,
}

impl ComponentKind {
    /// Maps a component type tag onto a kind. Unknown tags become [`Generic`](Self::Generic).
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "panel" | "panelboard" | "switchboard" => ComponentKind::Panel,
            "array" | "pv_array" | "solar_array" => ComponentKind::Array,
            "inverter" => ComponentKind::Inverter,
            "combiner" => ComponentKind::Combiner,
            "disconnect" | "breaker" | "fuse" => ComponentKind::Disconnect,
            "meter" => ComponentKind::Meter,
            "transformer" => ComponentKind::Transformer,
            "battery" => ComponentKind::Battery,
            "generator" => ComponentKind::Generator,
            "utility" | "grid" => ComponentKind::Utility,
            "load" | "motor" => ComponentKind::Load,
            "ground" | "ground_bar" => ComponentKind::Ground,
            "controller" | "relay" => ComponentKind::Controller,
            _ => ComponentKind::Generic,
        }
    }

    /// Default avoidance priority for obstacles of this kind (0 to 10).
    ///
    /// Wires crossing anything above 7 are reported as critical.
    pub fn default_priority(self) -> u8 {
        match self {
            ComponentKind::Transformer | ComponentKind::Utility => 9,
            ComponentKind::Panel | ComponentKind::Disconnect => 8,
            ComponentKind::Meter | ComponentKind::Generator => 7,
            ComponentKind::Inverter | ComponentKind::Battery => 6,
            ComponentKind::Combiner | ComponentKind::Load | ComponentKind::Generic => 5,
            ComponentKind::Array | ComponentKind::Controller => 4,
            ComponentKind::Ground => 3,
        }
    }
}

/// A terminal declared relative to its component's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSpec {
    /// Terminal id, unique within the component.
    pub id: String,
    /// Offset from the component position.
    pub offset: Point,
    /// Electrical role.
    pub role: TerminalRole,
    /// Conductor class.
    #[serde(default)]
    pub class: ConductorClass,
}

impl TerminalSpec {
    /// Creates a terminal layout entry.
    pub fn new(id: &str, offset: Point, role: TerminalRole, class: ConductorClass) -> Self {
        Self {
            id: id.to_string(),
            offset,
            role,
            class,
        }
    }
}

/// A terminal resolved to absolute plane coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    /// Owning component id.
    pub component: String,
    /// Terminal id.
    pub id: String,
    /// Absolute position: component position plus local offset.
    pub position: Point,
    /// Electrical role.
    pub role: TerminalRole,
    /// Conductor class.
    pub class: ConductorClass,
}

/// A placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique component id.
    pub id: String,
    /// Free-form type tag, e.g. `"inverter"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Top-left corner.
    pub position: Point,
    /// Body width.
    pub width: f64,
    /// Body height.
    pub height: f64,
    /// Rotation in degrees. Accepted but ignored: terminals are computed axis-aligned.
    #[serde(default)]
    pub rotation: f64,
    /// Explicit terminal list; overrides the layout derived from `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminals: Option<Vec<TerminalSpec>>,
    /// Explicit avoidance priority; overrides the kind default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl Component {
    /// Creates a component with a derived terminal layout.
    pub fn new(id: &str, kind: &str, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            kind: kind.to_string(),
            position,
            width,
            height,
            rotation: 0.0,
            terminals: None,
            priority: None,
        }
    }

    /// The kind this component's type tag maps to.
    pub fn component_kind(&self) -> ComponentKind {
        ComponentKind::from_tag(&self.kind)
    }

    /// The unpadded body rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }
}

/// One end of a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Component id.
    pub component: String,
    /// Terminal id; when absent the engine picks a terminal by role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

impl Endpoint {
    /// An endpoint that lets the engine choose the terminal.
    pub fn component(component: &str) -> Self {
        Self {
            component: component.to_string(),
            terminal: None,
        }
    }

    /// An endpoint pinned to a specific terminal.
    pub fn terminal(component: &str, terminal: &str) -> Self {
        Self {
            component: component.to_string(),
            terminal: Some(terminal.to_string()),
        }
    }
}

/// A requested point-to-point connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection id.
    pub id: String,
    /// Source end.
    pub source: Endpoint,
    /// Target end.
    pub target: Endpoint,
    /// Declared voltage.
    #[serde(default)]
    pub voltage: f64,
    /// Declared current in amperes.
    #[serde(default)]
    pub current: f64,
    /// Conductor class.
    #[serde(default)]
    pub class: ConductorClass,
}

impl Connection {
    /// Creates a connection.
    pub fn new(
        id: &str,
        source: Endpoint,
        target: Endpoint,
        voltage: f64,
        current: f64,
        class: ConductorClass,
    ) -> Self {
        Self {
            id: id.to_string(),
            source,
            target,
            voltage,
            current,
            class,
        }
    }

    /// Routing priority: `voltage + current × 10`.
    pub fn priority(&self) -> f64 {
        self.voltage + self.current * 10.0
    }
}

/// A diagram as read from disk: the inputs of one routing batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagram {
    /// Placed components.
    pub components: Vec<Component>,
    /// Connections to route.
    pub connections: Vec<Connection>,
}
