//! Podium CLI — data collection and reporting commands.
//!
//! Commands:
//! - `collect` — run the full collection sequence and print the summary
//! - `summary` — re-run the file inventory over an existing data directory
//! - `analyze` — weather-impact report over collected tables

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use podium_core::data::{
    ErgastClient, HistoricalWeatherSource, OpenF1Client, OpenWeatherClient, RequestPacer,
    StdoutProgress,
};
use podium_runner::analysis;
use podium_runner::export::{RESULTS_FILE, WEATHER_FILE};
use podium_runner::summary::render_report;
use podium_runner::{run_collection, summarize, CollectionConfig};

#[derive(Parser)]
#[command(
    name = "podium",
    about = "Podium CLI — Singapore GP data collection pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect every domain table from the upstream APIs.
    Collect {
        /// Path to a TOML config file; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the snapshot tables.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Minimum interval between requests to one host, in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,

        /// OpenWeatherMap credential; the commercial weather source is
        /// skipped without one.
        #[arg(long)]
        openweather_key: Option<String>,
    },
    /// Report which output files exist and how many records they hold.
    Summary {
        /// Data directory to inventory.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Weather-impact report over collected tables.
    Analyze {
        /// Data directory holding the results and weather tables.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            config,
            data_dir,
            delay_ms,
            openweather_key,
        } => run_collect(config, data_dir, delay_ms, openweather_key),
        Commands::Summary { data_dir } => run_summary(&data_dir),
        Commands::Analyze { data_dir } => run_analyze(&data_dir),
    }
}

fn run_collect(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    delay_ms: Option<u64>,
    openweather_key: Option<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => CollectionConfig::from_file(&path)?,
        None => CollectionConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(delay) = delay_ms {
        config.request_delay_ms = delay;
    }
    if let Some(key) = openweather_key {
        config.openweather_api_key = Some(key);
    }

    let ergast = ErgastClient::new(config.timeout(), RequestPacer::new(config.request_delay()));
    let openf1 = OpenF1Client::new(config.timeout(), RequestPacer::new(config.request_delay()));
    let openweather = config.openweather_api_key.as_deref().map(|key| {
        OpenWeatherClient::new(key, config.timeout(), RequestPacer::new(config.request_delay()))
    });
    let commercial = openweather
        .as_ref()
        .map(|c| c as &dyn HistoricalWeatherSource);

    let report = run_collection(&config, &ergast, &openf1, commercial, &StdoutProgress)?;

    println!();
    println!("=== Collection Summary ===");
    print!("{}", render_report(&report.summary));
    println!("Data saved to: {}", config.data_dir.display());

    Ok(())
}

fn run_summary(data_dir: &Path) -> Result<()> {
    let summary = summarize(data_dir)
        .with_context(|| format!("failed to inventory {}", data_dir.display()))?;
    print!("{}", render_report(&summary));
    Ok(())
}

fn run_analyze(data_dir: &Path) -> Result<()> {
    let results_path = data_dir.join(RESULTS_FILE);
    let weather_path = data_dir.join(WEATHER_FILE);
    if !results_path.exists() || !weather_path.exists() {
        println!("Cannot analyze weather impact: results or weather table is missing.");
        println!("Run `podium collect` first.");
        return Ok(());
    }

    let results = analysis::load_results(&results_path)?;
    let weather = analysis::load_weather(&weather_path)?;
    let impact = analysis::analyze(&results, &weather);

    println!("=== Weather Impact ===");
    print!("{}", analysis::render_report(&impact));
    Ok(())
}
