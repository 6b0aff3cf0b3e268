//! CSV parser for the breastfeeding survey dataset.

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::record::RawRecord;

/// Decodes CSV bytes (with a header row) into [`RawRecord`]s.
///
/// Blank lines are skipped and ragged rows are tolerated; columns the file
/// lacks come through as `None`.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV or not UTF-8.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: RawRecord = result.with_context(|| format!("malformed CSV row {}", i + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes_returns_no_rows() {
        let rows = parse_dataset(&[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_header_only() {
        let rows = parse_dataset(b"Region,Year,EBF_Rate\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_valid_rows() {
        let data = b"Region,Year,EBF_Rate,Type,Child_Sex,Wealth_Index,Age_Month\n\
NCR,2022,45.5,Urban,Male,Richest,3\n\
\n\
Region V,2017,,Rural,Female,Poorest,0\n";
        let rows = parse_dataset(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region.as_deref(), Some("NCR"));
        assert_eq!(rows[0].ebf_rate.as_deref(), Some("45.5"));
        assert_eq!(rows[0].age_month.as_deref(), Some("3"));
        assert_eq!(rows[1].region.as_deref(), Some("Region V"));
        assert_eq!(rows[1].ebf_rate, None);
        assert_eq!(rows[1].education, None);
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let data = b"Region,Year\n\xFF\xFE,2022\n";
        assert!(parse_dataset(data).is_err());
    }
}
