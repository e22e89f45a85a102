//! Time-of-use simulator entry point: CLI wiring and config-driven engine construction.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tou_sim::config::{MAX_HORIZON_HOURS, ScenarioConfig};
use tou_sim::forecast::{load_forecast_csv, truncate_to_horizon};
use tou_sim::io::export::export_csv;
use tou_sim::sim::SimulationReport;
use tou_sim::sim::types::{HourlyForecast, UsagePattern};

/// Time-of-use energy simulator and tariff analyser.
///
/// If neither --scenario nor --preset is given, the baseline preset is used.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Load scenario from TOML config file.
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, flat_rate, evening_heavy).
    #[arg(long)]
    preset: Option<String>,

    /// Read the hourly forecast from CSV (`time,predicted_kwh`) instead of
    /// generating a synthetic one.
    #[arg(long)]
    forecast: Option<PathBuf>,

    /// Usage pattern: normal, peak_focused, off_peak_focused.
    #[arg(long)]
    pattern: Option<UsagePattern>,

    /// Number of hours to simulate (clamped to 1..=48).
    #[arg(long)]
    hours: Option<usize>,

    /// Base electricity rate in USD/kWh.
    #[arg(long, env = "TOU_SIM_BASE_RATE")]
    base_rate: Option<f64>,

    /// Simulate every usage pattern and print one report each.
    #[arg(long)]
    compare: bool,

    /// Export simulated points to CSV.
    #[arg(long, conflicts_with = "compare")]
    points_out: Option<PathBuf>,

    /// Print shifting suggestions for heavy hours in priced slots.
    #[arg(long, conflicts_with_all = ["compare", "json"])]
    suggest: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Start REST API server after simulation.
    #[cfg(feature = "api")]
    #[arg(long, conflicts_with = "compare")]
    serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let scenario = load_scenario(args)?;
    let s = &scenario.simulation;

    let simulator = scenario.build_simulator()?;
    let forecasts = load_forecasts(args.forecast.as_deref(), &scenario)?;
    info!(
        hours = forecasts.len(),
        source = if args.forecast.is_some() { "csv" } else { "synthetic" },
        "loaded forecast"
    );

    let reports = if args.compare {
        simulator.compare(&forecasts, s.base_rate_usd_per_kwh)?
    } else {
        vec![simulator.run(&forecasts, s.pattern, s.base_rate_usd_per_kwh)?]
    };

    print_reports(&reports, args.json)?;

    // Single-report flags; clap rejects them together with --compare.
    let Some(report) = reports.first() else {
        return Ok(());
    };

    if args.suggest {
        print_suggestions(&scenario, report)?;
    }

    if let Some(path) = &args.points_out {
        export_csv(&report.points, path)
            .with_context(|| format!("failed to write CSV \"{}\"", path.display()))?;
        info!(path = %path.display(), "points written");
    }

    #[cfg(feature = "api")]
    if args.serve {
        serve(scenario, reports, args.port)?;
    }

    Ok(())
}

/// Resolves the scenario (--scenario, then --preset, then baseline) and
/// applies CLI overrides.
fn load_scenario(args: &Args) -> anyhow::Result<ScenarioConfig> {
    let mut scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(pattern) = args.pattern {
        scenario.simulation.pattern = pattern;
    }
    if let Some(rate) = args.base_rate {
        scenario.simulation.base_rate_usd_per_kwh = rate;
    }
    if let Some(hours) = args.hours {
        let clamped = hours.clamp(1, MAX_HORIZON_HOURS);
        if clamped != hours {
            warn!(requested = hours, used = clamped, "horizon clamped");
        }
        scenario.simulation.horizon_hours = clamped;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

fn load_forecasts(
    path: Option<&Path>,
    scenario: &ScenarioConfig,
) -> anyhow::Result<Vec<HourlyForecast>> {
    let hours = scenario.simulation.horizon_hours;
    let Some(path) = path else {
        return Ok(scenario.forecast.to_synthetic().generate(hours));
    };

    let forecasts = load_forecast_csv(path)?;
    if forecasts.len() < hours {
        warn!(
            requested = hours,
            available = forecasts.len(),
            "forecast shorter than requested horizon"
        );
    }
    Ok(truncate_to_horizon(&forecasts, hours))
}

fn print_reports(reports: &[SimulationReport], json: bool) -> anyhow::Result<()> {
    if json {
        let out = if let [report] = reports {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string_pretty(reports)?
        };
        println!("{out}");
        return Ok(());
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if reports.len() == 1 {
            for p in &report.points {
                println!("{p}");
            }
            println!();
        }
        println!("{report}");
    }

    if let Some(best) = cheapest(reports).filter(|_| reports.len() > 1) {
        println!(
            "\nCheapest pattern:      {} (${:.2})",
            best.pattern, best.totals.total_cost_usd
        );
    }
    Ok(())
}

fn print_suggestions(scenario: &ScenarioConfig, report: &SimulationReport) -> anyhow::Result<()> {
    let rules = scenario.suggestions.to_rules()?;
    let suggestions = rules.suggest(&report.points);
    println!("\n--- Suggestions (> {:.2} kWh) ---", rules.threshold_kwh());
    if suggestions.is_empty() {
        println!("Usage is within normal ranges in every priced hour.");
    }
    for s in &suggestions {
        println!("{s}");
    }
    Ok(())
}

fn cheapest(reports: &[SimulationReport]) -> Option<&SimulationReport> {
    reports
        .iter()
        .min_by(|a, b| a.totals.total_cost_usd.total_cmp(&b.totals.total_cost_usd))
}

#[cfg(feature = "api")]
fn serve(scenario: ScenarioConfig, reports: Vec<SimulationReport>, port: u16) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let Some(report) = reports.into_iter().next() else {
        return Ok(());
    };
    let state = Arc::new(tou_sim::api::AppState {
        tariff: scenario.tariff.to_schedule()?,
        report,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(tou_sim::api::serve(state, addr))
        .with_context(|| format!("API server on {addr} failed"))
}
