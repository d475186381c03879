use clap::{Parser, Subcommand, ValueEnum};
use fb_controls::StateSnapshot;
use fb_sim::{ActiveController, SimResult, Trace};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fb-cli")]
#[command(about = "Feedback controller scenarios - run PID loops against a simulated plant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run a scenario and export its trace
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Export format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> SimResult<()> {
    // Logs go to stderr so stdout stays clean for exported data.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            format,
            output,
        } => cmd_run(&scenario_path, format, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> SimResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = fb_sim::load_yaml(scenario_path)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn cmd_run(scenario_path: &Path, format: Format, output: Option<&Path>) -> SimResult<()> {
    let scenario = fb_sim::load_yaml(scenario_path)?;
    tracing::info!(scenario = %scenario.name, "running");
    let trace = fb_sim::run_scenario(&scenario)?;

    let content = match format {
        Format::Csv => trace.to_csv(),
        Format::Json => trace.to_json()?,
    };

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!(
            "✓ Exported {} samples to {}",
            trace.records.len(),
            path.display()
        );
        print_summary(&trace)?;
    } else {
        print!("{}", content);
    }

    Ok(())
}

fn print_summary(trace: &Trace) -> SimResult<()> {
    let Some(last) = trace.last() else {
        return Ok(());
    };
    let state = match (last.active, last.secondary) {
        (ActiveController::Secondary, Some(secondary)) => secondary,
        _ => last.primary,
    };
    let snapshot = StateSnapshot::new(chrono::Utc::now(), &state);
    println!("Final state of the {} controller:", last.active.as_str());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
