mod commands;
mod config;
mod detect_client;
mod error;
mod pdf;

use std::path::PathBuf;
use std::process::ExitCode;

use canvas::consts::MIN_GRID_SIZE_PT;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "formmap", about = "Map and generate fillable PDF form fields")]
struct Cli {
    /// Detection service base URL. Overrides `FORMMAP_DETECT_URL`.
    #[arg(long, global = true)]
    detect_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print page count and page sizes.
    Inspect { pdf: PathBuf },
    /// Check a field map for blank or duplicate names.
    Validate { map: PathBuf },
    /// Write a fillable PDF from a source PDF and a field map.
    Generate {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long)]
        map: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Snap every field in a map to the grid.
    Snap {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long)]
        map: PathBuf,
        /// Grid pitch in points. Overrides `FORMMAP_GRID_SIZE`.
        #[arg(long)]
        grid: Option<f64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Detect fields from pre-rendered `page-{n}.png` rasters.
    Detect {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long)]
        images: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.detect_url {
        config.detect_url = Some(url.trim_end_matches('/').to_string());
    }

    match cli.command {
        Command::Inspect { pdf } => commands::inspect(&pdf),
        Command::Validate { map } => commands::validate_map(&map),
        Command::Generate { pdf, map, out } => commands::generate(&pdf, &map, &out),
        Command::Snap { pdf, map, grid, out } => {
            let grid = grid.filter(|g| g.is_finite() && *g >= MIN_GRID_SIZE_PT).unwrap_or(config.grid_size);
            commands::snap(&pdf, &map, grid, out)
        }
        Command::Detect { pdf, images, out } => commands::detect(&config, &pdf, &images, out).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", err.error_code());
            ExitCode::FAILURE
        }
    }
}
