use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use thorpe_transect::{
    read_binned_csv, read_point_estimates, render_figures, run, FigureData, OutputPaths,
    TransectConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Thorpe-scale dissipation along a CTD transect",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log every station and overturn count
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate dissipation for every cast and write the station and binned tables
    Process(ProcessArgs),
    /// Draw the binned dissipation transect
    Figure(FigureArgs),
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// CTD table with one row per sample
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Directory for the results of this run
    #[arg(long, default_value = "method_results", value_hint = ValueHint::DirPath)]
    results: PathBuf,

    /// Shared directory receiving a copy of the binned dissipation table
    #[arg(long, default_value = "derived_data", value_hint = ValueHint::DirPath)]
    derived: PathBuf,

    /// Optional TOML file overriding analysis parameters
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FigureArgs {
    /// Binned dissipation table
    #[arg(long, value_hint = ValueHint::FilePath)]
    binned: PathBuf,

    /// Binned neutral density table, contoured at the water mass boundaries
    #[arg(long, value_hint = ValueHint::FilePath)]
    boundaries: Option<PathBuf>,

    /// Point estimates drawn over the transect
    #[arg(long, value_hint = ValueHint::FilePath)]
    points: Option<PathBuf>,

    /// Output path without extension, a PNG and an SVG are written
    #[arg(short, long, default_value = "eps_transect", value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Optional TOML file overriding figure settings
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Process(args) => handle_process(args),
        Command::Figure(args) => handle_figure(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<TransectConfig> {
    match path {
        Some(path) => TransectConfig::from_toml_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(TransectConfig::default()),
    }
}

fn handle_process(args: ProcessArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let input = args.input;
    let paths = OutputPaths {
        results: args.results,
        derived: args.derived,
    };

    let output = run(&cfg, &input, &paths)
        .with_context(|| format!("processing {} failed", input.display()))?;

    info!(
        "{} stations kept, {} rejected, {} files written",
        output.processed.transect.n_stations(),
        output.processed.rejected.len(),
        output.files.len()
    );
    Ok(())
}

fn handle_figure(args: FigureArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref())?;

    let eps = read_binned_csv(&args.binned)
        .with_context(|| format!("failed to read {}", args.binned.display()))?;
    let boundaries = match &args.boundaries {
        Some(path) => Some(
            read_binned_csv(path).with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let points = match &args.points {
        Some(path) => read_point_estimates(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => vec![],
    };

    let data = FigureData {
        eps,
        boundaries,
        points,
    };
    let files = render_figures(&data, &cfg.figure, &args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    for file in files {
        info!("Wrote plot: {}", file.display());
    }

    Ok(())
}
