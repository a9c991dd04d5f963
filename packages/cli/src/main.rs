#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for the microplastics trend and hotspot engine.
//!
//! Reads a sample table from CSV (or JSON), runs one analysis and prints the
//! result as pretty JSON on stdout. Logs go to stderr; set `RUST_LOG=info`
//! or `RUST_LOG=debug` for more detail.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use microplastics_prepare::csv_file::write_csv;
use microplastics_prepare::locations::sample_locations;
use microplastics_prepare::{
    LoadOptions, SampleTable, SyntheticConfig, generate_samples, load, load_dataset, load_json,
};
use microplastics_sample_models::profiles::{all_profiles, polymer_profile};
use microplastics_trend::alerts::{hotspot_count_alert, new_upload_alert};
use microplastics_trend::{
    PredictionRequest, check_thresholds, detect_hotspots, predict, summarize, trend_alert,
    validate_prediction,
};
use microplastics_trend_models::{ModelTier, TrendConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "microplastics",
    about = "Microplastics trend prediction and hotspot detection"
)]
struct Cli {
    /// TOML config file (defaults apply to any missing key)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic sample dataset to CSV
    Generate {
        /// Number of samples
        #[arg(long, default_value_t = 1000)]
        samples: usize,
        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Output CSV path
        #[arg(long, default_value = "data/sample_data.csv")]
        output: PathBuf,
    },
    /// Forecast concentration for a region
    Predict {
        /// Sample table (CSV or JSON); generated if missing
        #[arg(long, default_value = "data/sample_data.csv")]
        data: PathBuf,
        /// Region label, e.g. "North America Pacific"
        #[arg(long)]
        region: String,
        /// Years to project forward
        #[arg(long)]
        years: Option<u32>,
        /// Model tier: simple or advanced
        #[arg(long)]
        model: Option<ModelTier>,
    },
    /// List the top hotspot cells
    Hotspots {
        /// Sample table (CSV or JSON); generated if missing
        #[arg(long, default_value = "data/sample_data.csv")]
        data: PathBuf,
        /// Concentration threshold, particles/m³
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Summarize a region, or every region
    Summary {
        /// Sample table (CSV or JSON); generated if missing
        #[arg(long, default_value = "data/sample_data.csv")]
        data: PathBuf,
        /// Region label; omit for all regions
        #[arg(long)]
        region: Option<String>,
    },
    /// Decide which alerts a region warrants
    Alerts {
        /// Sample table (CSV or JSON); generated if missing
        #[arg(long, default_value = "data/sample_data.csv")]
        data: PathBuf,
        /// Region label
        #[arg(long)]
        region: String,
    },
    /// Simulate citizen uploads at coastal sites and describe their alerts
    Uploads {
        /// Number of uploads
        #[arg(long, default_value_t = 13)]
        count: usize,
        /// RNG seed for locations and concentrations
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Show polymer reference profiles
    Profile {
        /// Polymer label; omit for all
        #[arg(long)]
        polymer: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrendConfig::load(path)?,
        None => TrendConfig::default(),
    };
    let options = LoadOptions::default();
    let now = Utc::now();

    match cli.command {
        Commands::Generate {
            samples,
            seed,
            output,
        } => {
            let records = generate_samples(&SyntheticConfig {
                samples,
                seed,
                ..SyntheticConfig::default()
            });
            write_csv(&output, &records)?;
            log::info!("Wrote {} samples to {}", records.len(), output.display());
        }
        Commands::Predict {
            data,
            region,
            years,
            model,
        } => {
            let table = read_table(&data, &options)?;
            let mut request = PredictionRequest::from_config(region, &config);
            if let Some(years) = years {
                request = request.with_horizon(years);
            }
            if let Some(model) = model {
                request = request.with_model(model);
            }
            let outcome =
                predict(&table.records, &request, &config.ensemble, now).map(validate_prediction);
            print_json(&outcome)?;
        }
        Commands::Hotspots { data, threshold } => {
            let table = read_table(&data, &options)?;
            let threshold = threshold.unwrap_or(config.hotspot_threshold);
            print_json(&detect_hotspots(&table.records, threshold, now))?;
        }
        Commands::Summary { data, region } => {
            let table = read_table(&data, &options)?;
            match summarize(&table.records, region.as_deref()) {
                Some(summary) => print_json(&summary)?,
                None => log::warn!("No samples matched"),
            }
        }
        Commands::Alerts { data, region } => {
            let table = read_table(&data, &options)?;
            let regional: Vec<_> = table
                .records
                .iter()
                .filter(|r| r.region.as_ref() == region)
                .cloned()
                .collect();

            let prediction = predict(
                &table.records,
                &PredictionRequest::from_config(region.as_str(), &config),
                &config.ensemble,
                now,
            );
            let hotspots = detect_hotspots(&regional, config.hotspot_threshold, now);

            let events: Vec<_> = [
                check_thresholds(&regional, &region, &config.alerts, now),
                hotspot_count_alert(hotspots.value(), &region, &config.alerts, now),
                (!prediction.is_fallback())
                    .then(|| trend_alert(prediction.value(), &config.alerts, now))
                    .flatten(),
            ]
            .into_iter()
            .flatten()
            .collect();

            log::info!("{} alert(s) for {region}", events.len());
            print_json(&events)?;
        }
        Commands::Uploads { count, seed } => {
            let rows: Vec<serde_json::Value> = sample_locations(count, seed)
                .into_iter()
                .map(|(lat, lon)| serde_json::json!({ "latitude": lat, "longitude": lon }))
                .collect();
            let table = load(
                &rows,
                &LoadOptions {
                    concentration_seed: seed,
                    ..options
                },
            );
            let events: Vec<_> = table
                .records
                .iter()
                .map(|sample| new_upload_alert(sample, now))
                .collect();
            print_json(&events)?;
        }
        Commands::Profile { polymer } => match polymer {
            Some(name) => match polymer_profile(&name) {
                Some(profile) => print_json(profile)?,
                None => return Err(format!("Unknown polymer '{name}'").into()),
            },
            None => print_json(&all_profiles())?,
        },
    }

    Ok(())
}

/// Reads a sample table, dispatching on the file extension.
fn read_table(path: &Path, options: &LoadOptions) -> Result<SampleTable, std::io::Error> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let table = if is_json {
        load_json(&std::fs::read_to_string(path)?, options)
    } else {
        load_dataset(path, options)
    };

    if table.is_degraded() {
        log::warn!(
            "Results are based on {} synthetic samples, not {}",
            table.len(),
            path.display()
        );
    }
    Ok(table)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
