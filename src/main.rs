//! CLI entry point for the EBF survey statistics tool.
//!
//! Loads the survey CSV, aggregates it per region and year, and emits the
//! views a dashboard front end consumes: region profiles, the national
//! profile, rankings, the heatmap, and raw-data exports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ebf_stats::config::Settings;
use ebf_stats::dashboard::{Dashboard, SUBGROUP_LABELS};
use ebf_stats::dataset::Dataset;
use ebf_stats::fetch::load_source;
use ebf_stats::output::{
    RAW_EXPORT_FILE_NAME, print_json, rankings_file_name, write_bundle, write_raw_export,
    write_rankings,
};
use ebf_stats::record::NumericPolicy;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ebf_stats")]
#[command(about = "Aggregate exclusive breastfeeding survey data by region and year", long_about = None)]
struct Cli {
    /// Path or URL of the survey CSV (overrides EBF_DATA_SOURCE)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Drop rows whose EBF_Rate is not a number instead of carrying NaN
    #[arg(long, global = true, default_value_t = false)]
    strict: bool,

    /// Target EBF rate used for KPI gaps (overrides EBF_TARGET_RATE)
    #[arg(long, global = true)]
    target: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every region's profile as JSON
    Summary {
        /// Year whose value each region reports (defaults to the latest)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Print the national profile and its KPI for a year
    National {
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Export the ranking table for a year as CSV
    Rankings {
        #[arg(short, long)]
        year: Option<i32>,

        /// CSV file to write (defaults to ebf_rankings_<YEAR>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gzip the CSV and append .gz to the file name
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print the region-by-year heatmap as JSON
    Heatmap,
    /// Re-export the raw survey rows as CSV
    ExportRaw {
        #[arg(short, long, default_value = RAW_EXPORT_FILE_NAME)]
        output: PathBuf,

        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Write regions, national, heatmap and ingest JSON files for a front end
    Bundle {
        #[arg(short = 'd', long, default_value = "dist")]
        output_dir: PathBuf,

        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut settings = Settings::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ebf_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Some(source) = cli.source {
        settings.source = source;
    }
    if cli.strict {
        settings.numeric_policy = NumericPolicy::Reject;
    }
    if let Some(target) = cli.target {
        settings.target_rate = target;
    }

    let bytes = load_source(&settings.source).await?;
    let dataset = Dataset::from_csv(&bytes, settings.numeric_policy)?;

    match cli.command {
        Commands::Summary { year } => {
            let dashboard = open_dashboard(&dataset, year, settings.target_rate);
            print_json(&dashboard.regions())?;
        }
        Commands::National { year } => {
            let dashboard = open_dashboard(&dataset, year, settings.target_rate);

            match dashboard.national_kpi() {
                Some(kpi) => info!(
                    year = kpi.year,
                    value = kpi.value,
                    gap_to_target = kpi.gap_to_target,
                    target_met = kpi.target_met(),
                    "National KPI"
                ),
                None => warn!(year = ?dashboard.selected_year(), "No national data for year"),
            }

            if let Some(cmp) = dashboard.subgroup_comparison() {
                for (label, value) in SUBGROUP_LABELS.iter().zip(cmp.national) {
                    info!(subgroup = *label, value, "National subgroup average");
                }
            }

            print_json(&dashboard.national())?;
        }
        Commands::Rankings {
            year,
            output,
            gzip,
        } => {
            let dashboard = open_dashboard(&dataset, year, settings.target_rate);
            let Some(year) = dashboard.selected_year() else {
                warn!("Dataset has no surveyed years, nothing to rank");
                return Ok(());
            };

            let path = output.unwrap_or_else(|| PathBuf::from(rankings_file_name(year)));
            write_rankings(&path, &dashboard.rankings(), gzip)?;
        }
        Commands::Heatmap => {
            let dashboard = open_dashboard(&dataset, None, settings.target_rate);
            print_json(&dashboard.heatmap())?;
        }
        Commands::ExportRaw { output, gzip } => {
            write_raw_export(&output, dataset.raw_rows(), gzip)?;
        }
        Commands::Bundle { output_dir, year } => {
            let dashboard = open_dashboard(&dataset, year, settings.target_rate);
            write_bundle(&output_dir, &dashboard, dataset.report())?;
        }
    }

    Ok(())
}

/// Builds the dashboard state, switching to `year` when one is given.
fn open_dashboard(dataset: &Dataset, year: Option<i32>, target: f64) -> Dashboard {
    let mut dashboard = Dashboard::new(dataset.list_regions().to_vec(), target);
    if let Some(year) = year {
        dashboard.select_year(year);
    }
    dashboard
}
