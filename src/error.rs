//! Row-level issues raised while normalizing survey records.

use thiserror::Error;

/// Why a raw survey row was kept out of the aggregation.
///
/// None of these abort a run; the pipeline counts them in an
/// [`IngestReport`] and moves on to the next row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    /// The `Region` field is empty or absent.
    #[error("row has no region")]
    MissingRegion,

    /// The `Year` field is not an integer.
    #[error("unparseable year: {0:?}")]
    UnparseableYear(String),

    /// The `EBF_Rate` field is not a number and the reject policy is active.
    #[error("unparseable EBF rate: {0:?}")]
    UnparseableRate(String),
}

/// Counts of rows read, kept, and dropped by a normalization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub missing_region: usize,
    pub unparseable_year: usize,
    pub unparseable_rate: usize,
}

impl IngestReport {
    /// Tallies a dropped row under its issue.
    pub fn record_drop(&mut self, issue: &RowIssue) {
        match issue {
            RowIssue::MissingRegion => self.missing_region += 1,
            RowIssue::UnparseableYear(_) => self.unparseable_year += 1,
            RowIssue::UnparseableRate(_) => self.unparseable_rate += 1,
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_kept)
    }
}
