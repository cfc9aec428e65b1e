//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::EngineConfig;
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE_NAME: &str = "sldroute.toml";

/// Loads and validates an `sldroute.toml` configuration from a project directory.
///
/// Reads `<project_dir>/sldroute.toml`, parses it, and validates every section.
pub fn load_config(project_dir: &Path) -> Result<EngineConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `sldroute.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are in range and mutually consistent.
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    let routing = &config.routing;
    if !(routing.grid_size > 0.0) {
        return Err(invalid("routing.grid_size must be positive"));
    }
    if routing.min_clearance < 0.0 {
        return Err(invalid("routing.min_clearance must not be negative"));
    }
    if routing.component_padding < 0.0 {
        return Err(invalid("routing.component_padding must not be negative"));
    }
    if !(routing.max_bend_angle > 0.0 && routing.max_bend_angle <= 180.0) {
        return Err(invalid("routing.max_bend_angle must be in (0, 180]"));
    }
    if !(routing.max_wire_length > 0.0) {
        return Err(invalid("routing.max_wire_length must be positive"));
    }
    if routing.alternative_count > 3 {
        return Err(invalid("routing.alternative_count must be at most 3"));
    }
    if routing.collinear_tolerance < 0.0 {
        return Err(invalid("routing.collinear_tolerance must not be negative"));
    }
    if let Some(row) = routing.voltage_spacing.iter().find(|r| r.spacing < 0.0) {
        return Err(invalid(format!(
            "routing.voltage_spacing row for {} V has negative spacing",
            row.min_voltage
        )));
    }

    let optimizer = &config.optimizer;
    if optimizer.max_iterations == 0 {
        return Err(invalid("optimizer.max_iterations must be at least 1"));
    }
    if optimizer.convergence_threshold < 0.0 {
        return Err(invalid("optimizer.convergence_threshold must not be negative"));
    }
    if !(0.0..=1.0).contains(&optimizer.baseline_confidence) {
        return Err(invalid("optimizer.baseline_confidence must be in [0, 1]"));
    }

    let style = &config.style;
    if style.standard_voltage_threshold > style.high_voltage_threshold {
        return Err(invalid(
            "style.standard_voltage_threshold must not exceed style.high_voltage_threshold",
        ));
    }

    if config.history.capacity == 0 {
        return Err(invalid("history.capacity must be at least 1"));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoutingMethod;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[routing]
method = "astar"
min_clearance = 12.0
grid_size = 10.0
max_bends = 6
max_bend_angle = 120.0
preferred_angles = [0.0, 90.0]
component_padding = 8.0
max_wire_length = 2500.0
minimize_crossings = false
prefer_orthogonal = true
group_parallel_wires = true
sort_by_priority = false
alternative_count = 2
collinear_tolerance = 0.5

[[routing.voltage_spacing]]
min_voltage = 480.0
spacing = 18.0

[optimizer]
max_iterations = 50
convergence_threshold = 0.01
baseline_confidence = 0.7
seed = 7

[style]
high_voltage_threshold = 600.0
standard_voltage_threshold = 100.0

[history]
capacity = 16
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.routing.method, RoutingMethod::Astar);
        assert_eq!(config.routing.max_bends, 6);
        assert_eq!(config.routing.voltage_spacing.len(), 1);
        assert!(config.routing.group_parallel_wires);
        assert!(!config.routing.sort_by_priority);
        assert_eq!(config.optimizer.max_iterations, 50);
        assert_eq!(config.optimizer.seed, 7);
        assert_eq!(config.style.high_voltage_threshold, 600.0);
        assert_eq!(config.history.capacity, 16);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[routing]\ngrid_size = 5.0\n").unwrap();
        assert_eq!(config.routing.grid_size, 5.0);
        assert_eq!(config.routing.min_clearance, 10.0);
        assert_eq!(config.optimizer.max_iterations, 100);
    }

    #[test]
    fn zero_grid_errors() {
        let err = load_config_from_str("[routing]\ngrid_size = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bend_angle_out_of_range_errors() {
        let err = load_config_from_str("[routing]\nmax_bend_angle = 200.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn baseline_confidence_out_of_range_errors() {
        let err = load_config_from_str("[optimizer]\nbaseline_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn inverted_style_thresholds_error() {
        let toml = "[style]\nhigh_voltage_threshold = 100.0\nstandard_voltage_threshold = 200.0\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_method_is_parse_error() {
        let err = load_config_from_str("[routing]\nmethod = \"diagonal\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[history]\ncapacity = 3\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.history.capacity, 3);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
