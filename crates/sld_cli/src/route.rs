//! `sldroute route`: route a JSON diagram.
//!
//! The full pipeline:
//!
//! 1. Load config (`--config`, else `sldroute.toml` beside the diagram, else defaults)
//! 2. Apply the `--method` override
//! 3. Read and parse the diagram
//! 4. Route every connection through one session
//! 5. Print results and render diagnostics
//! 6. Export the routing history if `--history-out` is given

use std::error::Error;
use std::fs;
use std::path::Path;

use serde_json::json;
use sld_config::{EngineConfig, CONFIG_FILE_NAME};
use sld_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use sld_route::path::length;
use sld_route::{Diagram, RoutingBatch, RoutingSession};

use crate::{GlobalArgs, ReportFormat, RouteArgs};

/// Runs the `sldroute route` command.
///
/// Returns exit code 0 if no error-level diagnostics were emitted, 1 otherwise.
pub fn run(args: &RouteArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let diagram_path = Path::new(&args.diagram);
    let mut config = resolve_config(diagram_path, global)?;
    if let Some(method) = args.method {
        config.routing.method = method.into();
    }

    let text = fs::read_to_string(diagram_path)
        .map_err(|e| format!("cannot read '{}': {e}", diagram_path.display()))?;
    let diagram: Diagram = serde_json::from_str(&text)
        .map_err(|e| format!("invalid diagram '{}': {e}", diagram_path.display()))?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "    Routing {} connection(s) among {} component(s) [{}]",
            diagram.connections.len(),
            diagram.components.len(),
            config.routing.method
        );
    }

    let session = RoutingSession::new(config);
    let sink = DiagnosticSink::new();
    let batch = session.route_diagram(&diagram, &sink);
    let diagnostics = sink.diagnostics();

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print_results(&batch, global.verbose);
            }
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let report = json!({
                "results": batch.results,
                "failures": batch
                    .failures
                    .iter()
                    .map(|f| json!({ "connection": f.connection, "error": f.error.to_string() }))
                    .collect::<Vec<_>>(),
                "diagnostics": diagnostics,
                "stats": session.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(out) = &args.history_out {
        write_history(&session, Path::new(out))?;
        if !global.quiet && args.format == ReportFormat::Text {
            eprintln!("     Wrote history to {out}");
        }
    }

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} routed, {} failed, {} error(s), {} warning(s)",
            batch.results.len(),
            batch.failures.len(),
            sink.error_count(),
            sink.count(Severity::Warning)
        );
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Picks the configuration: an explicit `--config` file, else `sldroute.toml`
/// next to the diagram, else the defaults.
fn resolve_config(diagram: &Path, global: &GlobalArgs) -> Result<EngineConfig, Box<dyn Error>> {
    if let Some(path) = &global.config {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config '{path}': {e}"))?;
        return Ok(sld_config::load_config_from_str(&content)?);
    }
    let dir = match diagram.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if dir.join(CONFIG_FILE_NAME).is_file() {
        return Ok(sld_config::load_config(dir)?);
    }
    Ok(EngineConfig::default())
}

fn print_results(batch: &RoutingBatch, verbose: bool) {
    for result in &batch.results {
        let fallback = if result.fell_back() {
            format!(" (fell back from {})", result.requested_method)
        } else {
            String::new()
        };
        println!(
            "{}: {} points, length {:.1}, score {:.3}, confidence {:.2}, {}{}",
            result.connection_id,
            result.path.len(),
            length(&result.path),
            result.score,
            result.confidence,
            result.algorithm_used,
            fallback
        );
        if verbose {
            let stats = &result.stats;
            eprintln!(
                "        {}: {} iteration(s), {:.3} -> {:.3} ({:+.1}%), {:.2} ms, {} alternative(s)",
                stats.improver,
                stats.iterations,
                stats.initial_score,
                stats.final_score,
                stats.improvement_percent,
                stats.processing_ms,
                result.alternatives.len()
            );
        }
    }
    for failure in &batch.failures {
        println!("{}: skipped ({})", failure.connection, failure.error);
    }
}

/// Writes the history in the format named by the file extension.
fn write_history(session: &RoutingSession, out: &Path) -> Result<(), Box<dyn Error>> {
    let format = out.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let body = session.history().export_as(format)?;
    fs::write(out, body)?;
    Ok(())
}
