//! `sldroute init`: scaffold a routing project.
//!
//! Writes an `sldroute.toml` with every setting at its default and a small
//! solar-plus-service sample `diagram.json` that routes cleanly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sld_config::CONFIG_FILE_NAME;
use sld_geom::Point;
use sld_route::{Component, ConductorClass, Connection, Diagram, Endpoint};

use crate::GlobalArgs;

/// File name of the sample diagram.
pub const SAMPLE_DIAGRAM: &str = "diagram.json";

const DEFAULT_CONFIG: &str = r#"# sldroute configuration. Every field is optional.

[routing]
method = "manhattan"          # direct | manhattan | astar
min_clearance = 10.0
grid_size = 20.0
max_bends = 4
max_bend_angle = 135.0        # largest deviation from straight, degrees
preferred_angles = [0.0, 90.0, 180.0, 270.0]
component_padding = 10.0
max_wire_length = 1000.0
minimize_crossings = true
prefer_orthogonal = true
group_parallel_wires = false
sort_by_priority = true
alternative_count = 3
collinear_tolerance = 1.0

[[routing.voltage_spacing]]
min_voltage = 600.0
spacing = 15.0

[[routing.voltage_spacing]]
min_voltage = 1000.0
spacing = 25.0

[optimizer]
max_iterations = 100
convergence_threshold = 0.001
baseline_confidence = 0.85
seed = 24397

[style]
high_voltage_threshold = 480.0
standard_voltage_threshold = 120.0

[history]
capacity = 1000
"#;

/// Runs the `sldroute init` command.
///
/// Creates `dir` if needed. Refuses to overwrite an existing configuration.
/// Returns exit code 0 on success.
pub fn run(dir: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match dir {
        Some(d) => {
            let dir = PathBuf::from(d);
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(format!("'{}' already exists", config_path.display()).into());
    }

    if !global.quiet {
        eprintln!("  Initializing sldroute project in {}", project_dir.display());
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    write_sample_diagram(&project_dir)?;

    if !global.quiet {
        eprintln!("     Created {}", config_path.display());
        eprintln!("     Created {}", project_dir.join(SAMPLE_DIAGRAM).display());
    }
    Ok(0)
}

/// The sample diagram: PV array, inverter, AC disconnect, service panel, ground.
pub fn sample_diagram() -> Diagram {
    let components = vec![
        Component::new("PV1", "array", Point::new(0.0, 0.0), 120.0, 60.0),
        Component::new("INV1", "inverter", Point::new(200.0, 160.0), 80.0, 60.0),
        Component::new("DISC1", "disconnect", Point::new(380.0, 40.0), 40.0, 60.0),
        Component::new("MSP", "panel", Point::new(560.0, 160.0), 100.0, 140.0),
        Component::new("GND1", "ground", Point::new(230.0, 360.0), 20.0, 20.0),
    ];
    let connections = vec![
        Connection::new(
            "pv-inv",
            Endpoint::component("PV1"),
            Endpoint::component("INV1"),
            600.0,
            9.5,
            ConductorClass::Dc,
        ),
        Connection::new(
            "inv-disc",
            Endpoint::component("INV1"),
            Endpoint::component("DISC1"),
            240.0,
            32.0,
            ConductorClass::Ac,
        ),
        Connection::new(
            "disc-msp",
            Endpoint::terminal("DISC1", "load"),
            Endpoint::component("MSP"),
            240.0,
            32.0,
            ConductorClass::Ac,
        ),
        Connection::new(
            "inv-gnd",
            Endpoint::component("INV1"),
            Endpoint::component("GND1"),
            0.0,
            0.0,
            ConductorClass::Ground,
        ),
    ];
    Diagram {
        components,
        connections,
    }
}

fn write_sample_diagram(root: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&sample_diagram())?;
    fs::write(root.join(SAMPLE_DIAGRAM), json + "\n")
}
