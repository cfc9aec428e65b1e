//! sldroute CLI: wire routing for electrical single-line diagrams.
//!
//! Provides `sldroute init` for scaffolding a configuration and sample
//! diagram, and `sldroute route` for routing a JSON diagram and reporting the
//! resulting paths and diagnostics.

#![warn(missing_docs)]

mod init;
mod route;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use sld_config::RoutingMethod;

/// sldroute: automatic wire routing for single-line diagrams.
#[derive(Parser, Debug)]
#[command(name = "sldroute", version, about = "Single-line diagram wire router")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-connection optimizer details.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `sldroute.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default `sldroute.toml` and a sample diagram.
    Init {
        /// Target directory. If omitted, initializes in the current directory.
        dir: Option<String>,
    },
    /// Route every connection in a JSON diagram.
    Route(RouteArgs),
}

/// Arguments for the `sldroute route` subcommand.
#[derive(Parser, Debug)]
pub struct RouteArgs {
    /// Diagram file (JSON with `components` and `connections`).
    pub diagram: String,

    /// Output format for results and diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Override the routing method from the configuration.
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Write the routing history to this file; `.csv` or `.json` picks the format.
    #[arg(long)]
    pub history_out: Option<String>,
}

/// Routing method selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Straight segment, no avoidance.
    Direct,
    /// Orthogonal routes with collision checks.
    Manhattan,
    /// Grid search, falling back to Manhattan.
    Astar,
}

impl From<MethodArg> for RoutingMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Direct => RoutingMethod::Direct,
            MethodArg::Manhattan => RoutingMethod::Manhattan,
            MethodArg::Astar => RoutingMethod::Astar,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Result and diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-connection details.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { dir } => init::run(dir, &global),
        Command::Route(ref args) => route::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["sldroute", "init"]);
        match cli.command {
            Command::Init { dir } => assert!(dir.is_none()),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_dir() {
        let cli = Cli::parse_from(["sldroute", "init", "plant"]);
        match cli.command {
            Command::Init { dir } => assert_eq!(dir.as_deref(), Some("plant")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_route_default() {
        let cli = Cli::parse_from(["sldroute", "route", "diagram.json"]);
        match cli.command {
            Command::Route(ref args) => {
                assert_eq!(args.diagram, "diagram.json");
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.method.is_none());
                assert!(args.history_out.is_none());
            }
            _ => panic!("expected Route command"),
        }
    }

    #[test]
    fn parse_route_with_args() {
        let cli = Cli::parse_from([
            "sldroute",
            "route",
            "site/diagram.json",
            "--format",
            "json",
            "--method",
            "astar",
            "--history-out",
            "history.csv",
        ]);
        match cli.command {
            Command::Route(ref args) => {
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.method, Some(MethodArg::Astar));
                assert_eq!(args.history_out.as_deref(), Some("history.csv"));
            }
            _ => panic!("expected Route command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["sldroute", "--quiet", "--color", "never", "route", "d.json"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["sldroute", "--config", "/etc/sldroute.toml", "route", "d.json"]);
        assert_eq!(cli.config.as_deref(), Some("/etc/sldroute.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sldroute", "route", "d.json", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn method_arg_maps_to_routing_method() {
        assert_eq!(RoutingMethod::from(MethodArg::Direct), RoutingMethod::Direct);
        assert_eq!(RoutingMethod::from(MethodArg::Manhattan), RoutingMethod::Manhattan);
        assert_eq!(RoutingMethod::from(MethodArg::Astar), RoutingMethod::Astar);
    }
}
