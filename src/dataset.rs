//! The loaded survey: raw rows plus the regional profiles aggregated from them.

use anyhow::Result;
use tracing::{debug, info};

use crate::aggregate::RegionalAggregator;
use crate::error::IngestReport;
use crate::parser::parse_dataset;
use crate::record::{NumericPolicy, RawRecord, normalize_all};
use crate::summary::{RegionProfile, build_profiles};

/// Raw rows → normalized records → region-year accumulators → sorted profiles.
#[derive(Debug, Clone)]
pub struct Dataset {
    raw: Vec<RawRecord>,
    regions: Vec<RegionProfile>,
    report: IngestReport,
}

impl Dataset {
    /// Runs the full aggregation pipeline over already-parsed rows.
    #[tracing::instrument(skip(raw), fields(rows = raw.len()))]
    pub fn from_rows(raw: Vec<RawRecord>, policy: NumericPolicy) -> Self {
        let (records, report) = normalize_all(&raw, policy);
        let aggregator = RegionalAggregator::from_records(&records);
        debug!(regions = aggregator.region_count(), "Records grouped");
        let regions = build_profiles(aggregator);

        info!(
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            rows_dropped = report.rows_dropped(),
            missing_region = report.missing_region,
            unparseable_year = report.unparseable_year,
            unparseable_rate = report.unparseable_rate,
            regions = regions.len(),
            "Survey aggregated"
        );

        Dataset {
            raw,
            regions,
            report,
        }
    }

    /// Parses CSV bytes and aggregates them.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid CSV.
    pub fn from_csv(bytes: &[u8], policy: NumericPolicy) -> Result<Self> {
        Ok(Self::from_rows(parse_dataset(bytes)?, policy))
    }

    /// Regional profiles in display order.
    pub fn list_regions(&self) -> &[RegionProfile] {
        &self.regions
    }

    pub fn raw_rows(&self) -> &[RawRecord] {
        &self.raw
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn into_regions(self) -> Vec<RegionProfile> {
        self.regions
    }
}
