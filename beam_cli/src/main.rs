//! # Beam Calculator CLI
//!
//! Command-line front end for `beam_core`: solve a beam, print its diagrams,
//! create and open share links, manage saved scenarios and check the input
//! stages.
//!
//! ```text
//! beam_cli solve --support cantilever --load-type udl --load 12
//! beam_cli diagram --points 20
//! beam_cli share --base-url https://example.com/beam-calculator
//! beam_cli open "https://example.com/beam-calculator?beam=eyJsZW5ndGgi..."
//! beam_cli scenario save "Garage Header" --length 4.2
//! beam_cli stages --length 0
//! ```
//!
//! Set `RUST_LOG` to change log verbosity (default `beam_cli=info,beam_core=info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use beam_core::calculations::{evaluate, render_diagram, solve, AnalysisResult, Evaluation};
use beam_core::codec;
use beam_core::configuration::{BeamConfiguration, LoadType, SectionShape, SupportType};
use beam_core::errors::{CalcError, CalcResult};
use beam_core::file_io::{load_settings, FileStore};
use beam_core::materials::Material;
use beam_core::report::report_lines;
use beam_core::settings::AnalysisSettings;
use beam_core::store::ScenarioStore;
use beam_core::units::UnitSystem;
use beam_core::validation::{validate, Severity, Stage, Warning};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_STORE: &str = "beam_scenarios.json";
const LOCK_OWNER: &str = "beam_cli";

#[derive(Parser)]
#[command(name = "beam_cli")]
#[command(version, about = "Beam calculator - shear, moment and deflection for a single span")]
struct Cli {
    /// Engine settings file (JSON); defaults are used if it does not exist
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Scenario store file
    #[arg(long, global = true, default_value = DEFAULT_STORE)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a beam and print the results.
    Solve {
        #[command(flatten)]
        beam: BeamArgs,

        /// Print the full export bundle as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print sampled shear, moment and deflection.
    Diagram {
        #[command(flatten)]
        beam: BeamArgs,

        /// Number of intervals along the span.
        #[arg(long)]
        points: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Print a share token, or a full link with --base-url.
    Share {
        #[command(flatten)]
        beam: BeamArgs,

        #[arg(long)]
        base_url: Option<String>,
    },

    /// Decode a share token or link and analyse it.
    Open {
        /// Token, query string or full URL.
        token: String,

        #[arg(long)]
        json: bool,
    },

    /// Manage saved scenarios.
    Scenario {
        #[command(subcommand)]
        action: ScenarioAction,
    },

    /// Check each input stage and report blocking errors.
    Stages {
        #[command(flatten)]
        beam: BeamArgs,
    },
}

#[derive(Subcommand)]
enum ScenarioAction {
    /// Save a configuration under a name (overwrites).
    Save {
        name: String,

        #[command(flatten)]
        beam: BeamArgs,
    },
    /// Analyse a saved scenario.
    Load {
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// List saved scenario names.
    List,
    /// Delete a saved scenario.
    Delete { name: String },
}

/// Beam configuration: an optional JSON file, then per-field overrides.
#[derive(Args)]
struct BeamArgs {
    /// Configuration file (JSON); the default beam is used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Span (m or ft).
    #[arg(long)]
    length: Option<f64>,

    #[arg(long, value_enum)]
    material: Option<MaterialArg>,

    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    diameter: Option<f64>,

    #[arg(long, value_enum)]
    load_type: Option<LoadTypeArg>,

    /// Load magnitude, kN or kN/m.
    #[arg(long)]
    load: Option<f64>,

    /// Point load position from the left end (m or ft).
    #[arg(long)]
    position: Option<f64>,

    #[arg(long, value_enum)]
    support: Option<SupportArg>,

    #[arg(long, value_enum)]
    units: Option<UnitsArg>,

    #[arg(long)]
    load_factor: Option<f64>,

    /// Serviceability denominator, e.g. 360 for L/360.
    #[arg(long)]
    deflection_limit: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaterialArg {
    Steel,
    Concrete,
    Wood,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Rectangular,
    Circular,
}

#[derive(Clone, Copy, ValueEnum)]
enum LoadTypeArg {
    Point,
    Udl,
}

#[derive(Clone, Copy, ValueEnum)]
enum SupportArg {
    Simple,
    Cantilever,
    Fixed,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Metric,
    Imperial,
}

impl BeamArgs {
    fn configuration(&self, settings: &AnalysisSettings) -> CalcResult<BeamConfiguration> {
        let mut config = match &self.config {
            Some(path) => read_configuration(path)?,
            None => settings.default_configuration.clone(),
        };

        // Convert first so the overrides below are read in the chosen units
        if let Some(units) = self.units {
            config = config.with_unit_system(match units {
                UnitsArg::Metric => UnitSystem::Metric,
                UnitsArg::Imperial => UnitSystem::Imperial,
            });
        }
        if let Some(v) = self.length {
            config.length = v;
        }
        if let Some(m) = self.material {
            config.material = match m {
                MaterialArg::Steel => Material::Steel,
                MaterialArg::Concrete => Material::Concrete,
                MaterialArg::Wood => Material::Wood,
            };
        }
        if let Some(s) = self.shape {
            config.section_shape = match s {
                ShapeArg::Rectangular => SectionShape::Rectangular,
                ShapeArg::Circular => SectionShape::Circular,
            };
        }
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.diameter {
            config.diameter = v;
        }
        if let Some(t) = self.load_type {
            config.load_type = match t {
                LoadTypeArg::Point => LoadType::PointLoad,
                LoadTypeArg::Udl => LoadType::UniformDistributed,
            };
        }
        if let Some(v) = self.load {
            config.load_value = v;
        }
        if let Some(v) = self.position {
            config.load_position = v;
        }
        if let Some(s) = self.support {
            config.support_type = match s {
                SupportArg::Simple => SupportType::SimplySupported,
                SupportArg::Cantilever => SupportType::Cantilever,
                SupportArg::Fixed => SupportType::FixedBothEnds,
            };
        }
        if let Some(v) = self.load_factor {
            config.load_factor = v;
        }
        if let Some(v) = self.deflection_limit {
            config.deflection_limit = v;
        }
        Ok(config)
    }
}

fn read_configuration(path: &Path) -> CalcResult<BeamConfiguration> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read configuration", path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&contents)?)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beam_cli=info,beam_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("Error: {}", e);
            if e.is_recoverable() {
                eprintln!("The store is busy; try again shortly.");
            }
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CalcResult<ExitCode> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => AnalysisSettings::default(),
    };
    let mut scenarios = open_store(&cli.store);

    match cli.command {
        Commands::Solve { beam, json } => {
            let config = beam.configuration(&settings)?;
            remember(&mut scenarios, &config);
            let evaluation = evaluate(&config, &settings);
            print_evaluation(&evaluation, json)
        }
        Commands::Diagram { beam, points, json } => {
            let config = beam.configuration(&settings)?;
            let points = points.unwrap_or_else(|| settings.diagram_intervals());
            remember(&mut scenarios, &config);
            let result = solve(&config, &settings);
            let Some(series) = render_diagram(&config, &result, points) else {
                print_warnings(&result.warnings);
                println!("[FAIL] Diagram not available for this configuration");
                return Ok(ExitCode::FAILURE);
            };
            if json {
                print_json(&series)?;
            } else {
                let unit = config.unit_system.length_label();
                println!(
                    "{:>10} {:>12} {:>14} {:>14}",
                    format!("x ({})", unit),
                    "V (kN)",
                    "M (kN·m)",
                    "δ (mm)"
                );
                for (x, v, m, d) in series.rows() {
                    println!("{:>10.3} {:>12.3} {:>14.3} {:>14.4}", x, v, m, d);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Share { beam, base_url } => {
            let config = beam.configuration(&settings)?;
            let out = match base_url {
                Some(url) => codec::share_link(&url, &config, &settings.share_param)?,
                None => codec::encode(&config)?,
            };
            println!("{}", out);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Open { token, json } => {
            let fallback = scenarios.last_used(&settings.default_configuration);
            let config = codec::open_shared(&token, &settings.share_param, &fallback);
            remember(&mut scenarios, &config);
            print_evaluation(&evaluate(&config, &settings), json)
        }
        Commands::Scenario { action } => match action {
            ScenarioAction::Save { name, beam } => {
                let config = beam.configuration(&settings)?;
                let saved = scenarios.save(&name, &config)?;
                println!("[OK] Saved '{}' ({})", saved.name, saved.id);
                Ok(ExitCode::SUCCESS)
            }
            ScenarioAction::Load { name, json } => {
                let config = scenarios.load(&name)?;
                remember(&mut scenarios, &config);
                print_evaluation(&evaluate(&config, &settings), json)
            }
            ScenarioAction::List => {
                let names = scenarios.list()?;
                if names.is_empty() {
                    println!("No saved scenarios in {}", cli.store.display());
                }
                for name in names {
                    println!("  {}", name);
                }
                Ok(ExitCode::SUCCESS)
            }
            ScenarioAction::Delete { name } => {
                scenarios.delete(&name)?;
                println!("[OK] Deleted '{}'", name);
                Ok(ExitCode::SUCCESS)
            }
        },
        Commands::Stages { beam } => {
            let config = beam.configuration(&settings)?;
            let mut all_ok = true;
            for stage in Stage::ALL {
                let errors = validate(&config, stage);
                println!(
                    "{} Step {}: {} - {}",
                    status_icon(errors.is_empty()),
                    stage.number(),
                    stage.title(),
                    stage.description()
                );
                for e in &errors {
                    println!("       {}", e);
                }
                all_ok &= errors.is_empty();
            }
            Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn open_store(path: &Path) -> ScenarioStore<FileStore> {
    ScenarioStore::new(FileStore::new(path).with_owner(LOCK_OWNER))
}

/// Exit code for an analysis: failure whenever a warning has error severity
fn exit_code(result: &AnalysisResult) -> ExitCode {
    if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Record the last-used configuration; a failure here is not fatal
fn remember(scenarios: &mut ScenarioStore<FileStore>, config: &BeamConfiguration) {
    if let Err(e) = scenarios.set_last_used(config) {
        tracing::warn!(error = %e, "Could not record last-used configuration");
    }
}

fn print_json<T: Serialize>(value: &T) -> CalcResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation, json: bool) -> CalcResult<ExitCode> {
    if json {
        print_json(evaluation)?;
        return Ok(exit_code(&evaluation.result));
    }

    let summary = &evaluation.configuration_summary;
    let result = &evaluation.result;

    println!("═══════════════════════════════════════");
    println!("  BEAM ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    for (label, value) in summary.entries() {
        println!("  {:<9} {}", format!("{}:", label), value);
    }
    if (result.load_factor - 1.0).abs() > f64::EPSILON {
        println!("  {:<9} {:.2}", "Factor:", result.load_factor);
    }
    println!();
    for line in report_lines(summary, result).iter().skip(2).take(4) {
        println!("  {}", line);
    }
    println!();
    println!("Checks:");
    println!(
        "  Strength:       SF {:.2} {}",
        result.safety_factor,
        status_icon(result.safety_factor >= 1.0)
    );
    let ratio = if result.deflection_ratio.is_finite() {
        format!("L/{:.0}", result.deflection_ratio)
    } else {
        "no deflection".to_string()
    };
    println!(
        "  Serviceability: {} {}",
        ratio,
        status_icon(result.serviceability_pass)
    );
    print_warnings(&result.warnings);
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if result.passes() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");

    Ok(exit_code(result))
}

fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("Warnings:");
    for w in warnings {
        let tag = match w.severity {
            Severity::Info => "[INFO]",
            Severity::Warn => "[WARN]",
            Severity::Error => "[FAIL]",
        };
        println!("  {} {}: {}", tag, w.code, w.message);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_to_defaults() {
        let cli = Cli::parse_from([
            "beam_cli", "solve", "--support", "cantilever", "--load-type", "udl", "--load", "12",
        ]);
        let Commands::Solve { beam, json } = cli.command else {
            panic!("expected solve");
        };
        assert!(!json);
        let config = beam.configuration(&AnalysisSettings::default()).unwrap();
        assert_eq!(config.support_type, SupportType::Cantilever);
        assert_eq!(config.load_type, LoadType::UniformDistributed);
        assert_eq!(config.load_value, 12.0);
        assert_eq!(config.length, 6.0);
    }

    #[test]
    fn test_units_convert_before_overrides() {
        let cli = Cli::parse_from([
            "beam_cli", "solve", "--units", "imperial", "--height", "1.5",
        ]);
        let Commands::Solve { beam, .. } = cli.command else {
            panic!("expected solve");
        };
        let config = beam.configuration(&AnalysisSettings::default()).unwrap();
        assert_eq!(config.unit_system, UnitSystem::Imperial);
        assert!((config.length - 6.0 * 3.28084).abs() < 1e-9);
        assert_eq!(config.height, 1.5);
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::parse_from(["beam_cli", "scenario", "list", "--store", "x.json"]);
        assert_eq!(cli.store, PathBuf::from("x.json"));
    }

    #[test]
    fn test_store_records_cli_as_lock_owner() {
        let store = open_store(Path::new("x.json"));
        assert_eq!(store.backend().owner(), LOCK_OWNER);
    }

    #[test]
    fn test_exit_code_follows_error_warnings() {
        let settings = AnalysisSettings::default();
        let good = solve(&BeamConfiguration::default(), &settings);
        assert_eq!(format!("{:?}", exit_code(&good)), format!("{:?}", ExitCode::SUCCESS));

        let unsupported = BeamConfiguration {
            support_type: SupportType::FixedBothEnds,
            load_type: LoadType::PointLoad,
            ..Default::default()
        };
        let bad = solve(&unsupported, &settings);
        assert_eq!(format!("{:?}", exit_code(&bad)), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_diagram_records_last_used() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.json");
        let cli = Cli::parse_from([
            "beam_cli",
            "diagram",
            "--points",
            "4",
            "--length",
            "4.5",
            "--store",
            store.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let scenarios = open_store(&store);
        let last = scenarios.last_used(&BeamConfiguration::default());
        assert_eq!(last.length, 4.5);
    }

    #[test]
    fn test_open_padded_token() {
        use base64::Engine;

        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.json");
        let shared = BeamConfiguration {
            length: 3.0,
            load_position: 1.0,
            ..Default::default()
        };
        let mut json = serde_json::to_string(&shared).unwrap();
        while json.len() % 3 != 1 {
            json.push(' ');
        }
        let token = base64::engine::general_purpose::STANDARD.encode(json);
        assert!(token.ends_with('='));

        let cli = Cli::parse_from([
            "beam_cli",
            "open",
            token.as_str(),
            "--json",
            "--store",
            store.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let last = open_store(&store).last_used(&BeamConfiguration::default());
        assert_eq!(last, shared);
    }
}
