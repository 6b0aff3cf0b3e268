//! Output formatting and persistence for aggregated survey results.
//!
//! Writes JSON to stdout or files, and CSV exports with optional gzip.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::dashboard::{Dashboard, RankingRow};
use crate::error::IngestReport;
use crate::record::RawRecord;

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Default file name for a ranking export.
pub fn rankings_file_name(year: i32) -> String {
    format!("ebf_rankings_{year}.csv")
}

pub const RAW_EXPORT_FILE_NAME: &str = "ebf_full_raw_data.csv";

/// Serializes `rows` as CSV with a header row.
pub fn to_csv_bytes<S: Serialize>(rows: impl IntoIterator<Item = S>) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV buffer: {}", e.error()))
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Writes `bytes` to `path`, gzip-compressed with a `.gz` suffix when asked.
/// Returns the path actually written.
fn write_file(path: &Path, bytes: Vec<u8>, compress: bool) -> Result<PathBuf> {
    let (body, target) = if compress {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        (gzip(&bytes)?, PathBuf::from(name))
    } else {
        (bytes, path.to_path_buf())
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&target, &body).with_context(|| format!("failed to write {}", target.display()))?;

    debug!(path = %target.display(), bytes = body.len(), compress, "File written");
    Ok(target)
}

/// Writes the `Region,Year,Rate` ranking table.
pub fn write_rankings(path: &Path, rows: &[RankingRow], compress: bool) -> Result<PathBuf> {
    let written = write_file(path, to_csv_bytes(rows)?, compress)?;
    info!(path = %written.display(), rows = rows.len(), "Rankings exported");
    Ok(written)
}

/// Re-exports the raw survey rows as loaded.
pub fn write_raw_export(path: &Path, rows: &[RawRecord], compress: bool) -> Result<PathBuf> {
    let written = write_file(path, to_csv_bytes(rows)?, compress)?;
    info!(path = %written.display(), rows = rows.len(), "Raw data exported");
    Ok(written)
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<PathBuf> {
    write_file(path, serde_json::to_vec_pretty(value)?, false)
}

/// A JSON document stamped with its generation time and active year.
#[derive(Debug, Serialize)]
pub struct Snapshot<T> {
    pub generated_at: DateTime<Utc>,
    pub year: Option<i32>,
    pub data: T,
}

impl<T> Snapshot<T> {
    pub fn new(year: Option<i32>, data: T) -> Self {
        Snapshot {
            generated_at: Utc::now(),
            year,
            data,
        }
    }
}

/// Writes `regions.json`, `national.json`, `heatmap.json` and `ingest.json`
/// into `dir` for a static front end to load.
#[tracing::instrument(skip(dashboard, report), fields(dir = %dir.display()))]
pub fn write_bundle(
    dir: &Path,
    dashboard: &Dashboard,
    report: &IngestReport,
) -> Result<Vec<PathBuf>> {
    let year = dashboard.selected_year();

    let written = vec![
        write_json(
            &dir.join("regions.json"),
            &Snapshot::new(year, dashboard.regions()),
        )?,
        write_json(
            &dir.join("national.json"),
            &Snapshot::new(year, dashboard.national()),
        )?,
        write_json(
            &dir.join("heatmap.json"),
            &Snapshot::new(year, dashboard.heatmap()),
        )?,
        write_json(&dir.join("ingest.json"), &Snapshot::new(year, report))?,
    ];

    info!(files = written.len(), "Bundle written");
    Ok(written)
}
