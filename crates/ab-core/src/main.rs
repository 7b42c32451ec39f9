//! `abtest` - evaluate Bayesian A/B experiments from the command line.
//!
//! Reports are written to stdout as JSON; logs go to stderr.

use ab_config::validate::validate_settings;
use ab_config::{load_settings, resolve_config, SimulationSettings};
use ab_core::exit_codes::ExitCode;
use ab_core::experiment::ExperimentFile;
use ab_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ab_core::Error;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Bayesian A/B testing: posterior simulation and decision metrics
#[derive(Parser)]
#[command(name = "abtest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (JSON or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an experiment file and print the report
    Evaluate(EvaluateArgs),

    /// Print the resolved simulation settings
    Settings,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Experiment definition (JSON, or TOML with a .toml extension)
    file: PathBuf,

    /// Posterior draws per variant
    #[arg(long)]
    sim_count: Option<usize>,

    /// Root seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Treat the smallest effect as best
    #[arg(long)]
    min_is_best: bool,

    /// Credible interval mass, strictly between 0 and 1
    #[arg(long)]
    interval_alpha: Option<f64>,

    /// Also report highest-density intervals
    #[arg(long)]
    hdi: bool,

    /// Print compact JSON on one line
    #[arg(long)]
    compact: bool,
}

impl EvaluateArgs {
    fn apply(&self, settings: &mut SimulationSettings) {
        if let Some(n) = self.sim_count {
            settings.sim_count = n;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(alpha) = self.interval_alpha {
            settings.interval_alpha = alpha;
        }
        settings.min_is_best |= self.min_is_best;
        settings.include_hdi |= self.hdi;
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here
            let code = if err.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                ExitCode::Clean.as_i32()
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(&LogConfig::from_env(cli.global.log_level, cli.global.log_format));

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(CliError::Eval(err)) => {
            eprintln!("Error [{}]: {}", err.code(), err);
            ExitCode::from(&err)
        }
        Err(CliError::Output(err)) => {
            eprintln!("Error: failed to write report: {}", err);
            ExitCode::IoError
        }
    };
    std::process::exit(exit_code.as_i32());
}

enum CliError {
    Eval(Error),
    Output(String),
}

impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        CliError::Eval(err)
    }
}

fn resolved_settings(global: &GlobalOpts) -> Result<SimulationSettings, Error> {
    let paths = resolve_config(global.config.as_deref());
    let settings = load_settings(&paths)?;
    debug!(
        source = %paths.settings_source,
        path = ?paths.settings,
        "resolved simulation settings"
    );
    Ok(settings)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), CliError> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| CliError::Output(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Evaluate(args) => {
            let mut settings = resolved_settings(&cli.global)?;
            args.apply(&mut settings);
            validate_settings(&settings).map_err(Error::from)?;

            let file = ExperimentFile::from_path(&args.file).map_err(Error::from)?;
            info!(
                family = file.family(),
                path = %args.file.display(),
                sim_count = settings.sim_count,
                "evaluating experiment"
            );
            let report = file.evaluate(&settings)?;
            print_json(&report, args.compact)
        }
        Commands::Settings => {
            let settings = resolved_settings(&cli.global)?;
            print_json(&settings, false)
        }
    }
}
