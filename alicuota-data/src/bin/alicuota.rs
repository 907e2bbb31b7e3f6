use std::path::PathBuf;

use alicuota_core::{AlicuotaService, FilterSelection};
use alicuota_data::DatasetLoader;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Query the tax-rate dataset from the command line.
///
/// The CSV file is described in the `alicuota_data::loader` documentation;
/// both canonical and source (Spanish) column names are accepted.
#[derive(Parser, Debug)]
#[command(name = "alicuota")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the tax-rate dataset
    #[arg(short, long, env = "ALICUOTA_DATA")]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-column value counts
    Audit,

    /// List the values still valid for a field
    Options {
        /// Field to list, e.g. `activity` or `subactividad`
        #[arg(long)]
        field: String,

        /// Prior choice as `name=value`; repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Resolve the rate for a selection (province and year are required)
    Rate {
        /// Choice as `name=value`; repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("missing filter name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Logs go to stderr so results on stdout stay machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let dataset = DatasetLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load dataset: {}", args.file.display()))?;
    let service = AlicuotaService::from(dataset);

    match args.command {
        Command::Audit => {
            println!("{}", service.dataset().summary());
        }
        Command::Options { field, filters } => {
            let filters: FilterSelection = filters.into_iter().collect();
            let options = service.filter_options(&field, &filters);
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Command::Rate { filters } => {
            let filters: FilterSelection = filters.into_iter().collect();
            let outcome = service.rate(&filters);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
