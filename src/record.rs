//! Survey rows: the raw CSV shape and its typed, normalized form.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestReport, RowIssue};

/// Number of age buckets tracked (completed months 0 through 5).
pub const AGE_BUCKETS: usize = 6;

/// One survey respondent exactly as read from the dataset.
///
/// Every field is optional text; empty cells deserialize to `None`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
    #[serde(rename = "EBF_Rate", default)]
    pub ebf_rate: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Type", default)]
    pub settlement_type: Option<String>,
    #[serde(rename = "Education", default)]
    pub education: Option<String>,
    #[serde(rename = "Age_Month", default)]
    pub age_month: Option<String>,
    #[serde(rename = "Wealth_Index", default)]
    pub wealth_index: Option<String>,
    #[serde(rename = "Child_Sex", default)]
    pub child_sex: Option<String>,
}

/// How an unparseable `EBF_Rate` is handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Keep the row and carry `NaN` into every sum it touches.
    #[default]
    Propagate,
    /// Drop the row with [`RowIssue::UnparseableRate`].
    Reject,
}

impl std::str::FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(NumericPolicy::Propagate),
            "reject" | "strict" => Ok(NumericPolicy::Reject),
            other => Err(format!("unknown numeric policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementType {
    Urban,
    Rural,
    Other,
}

impl SettlementType {
    /// Case-sensitive: only `"Urban"` and `"Rural"` are recognized.
    pub fn parse(s: &str) -> Self {
        match s {
            "Urban" => SettlementType::Urban,
            "Rural" => SettlementType::Rural,
            _ => SettlementType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSex {
    Male,
    Female,
    Other,
}

impl ChildSex {
    /// Case-sensitive: only `"Male"` and `"Female"` are recognized.
    pub fn parse(s: &str) -> Self {
        match s {
            "Male" => ChildSex::Male,
            "Female" => ChildSex::Female,
            _ => ChildSex::Other,
        }
    }
}

/// Household wealth bracket, poorest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WealthQuintile {
    Poorest,
    Poorer,
    Middle,
    Richer,
    Richest,
}

impl WealthQuintile {
    pub const ALL: [WealthQuintile; 5] = [
        WealthQuintile::Poorest,
        WealthQuintile::Poorer,
        WealthQuintile::Middle,
        WealthQuintile::Richer,
        WealthQuintile::Richest,
    ];

    /// Exact name match; anything else (including "Unknown") is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WealthQuintile::Poorest => "Poorest",
            WealthQuintile::Poorer => "Poorer",
            WealthQuintile::Middle => "Middle",
            WealthQuintile::Richer => "Richer",
            WealthQuintile::Richest => "Richest",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Infant age in completed months, guaranteed to lie in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgeMonth(u8);

impl AgeMonth {
    pub fn new(months: i64) -> Option<Self> {
        if (0..AGE_BUCKETS as i64).contains(&months) {
            Some(AgeMonth(months as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A survey row with its fields parsed into domain types.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub region: String,
    pub year: i32,
    /// May be `NaN` under [`NumericPolicy::Propagate`].
    pub ebf_rate: f64,
    pub settlement: SettlementType,
    pub sex: ChildSex,
    pub wealth: Option<WealthQuintile>,
    /// `None` when the age is unparseable or outside `0..=5`.
    pub age: Option<AgeMonth>,
}

impl NormalizedRecord {
    /// Parses a raw row.
    ///
    /// # Errors
    ///
    /// Returns [`RowIssue::MissingRegion`] for an empty region,
    /// [`RowIssue::UnparseableYear`] when the year does not start with an integer,
    /// and [`RowIssue::UnparseableRate`] when the rate does not start with a number and
    /// `policy` is [`NumericPolicy::Reject`].
    pub fn from_raw(raw: &RawRecord, policy: NumericPolicy) -> Result<Self, RowIssue> {
        let region = match raw.region.as_deref() {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => return Err(RowIssue::MissingRegion),
        };

        let year_text = raw.year.as_deref().unwrap_or_default();
        let year = parse_integer(year_text)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| RowIssue::UnparseableYear(year_text.to_string()))?;

        let rate_text = raw.ebf_rate.as_deref().unwrap_or_default();
        let ebf_rate = match (parse_rate(rate_text), policy) {
            (Some(rate), _) => rate,
            (None, NumericPolicy::Propagate) => f64::NAN,
            (None, NumericPolicy::Reject) => {
                return Err(RowIssue::UnparseableRate(rate_text.to_string()));
            }
        };

        Ok(NormalizedRecord {
            region,
            year,
            ebf_rate,
            settlement: SettlementType::parse(raw.settlement_type.as_deref().unwrap_or_default()),
            sex: ChildSex::parse(raw.child_sex.as_deref().unwrap_or_default()),
            wealth: raw.wealth_index.as_deref().and_then(WealthQuintile::parse),
            age: raw
                .age_month
                .as_deref()
                .and_then(parse_integer)
                .and_then(AgeMonth::new),
        })
    }
}

/// Normalizes every raw row, keeping the valid ones and tallying the rest.
pub fn normalize_all(
    rows: &[RawRecord],
    policy: NumericPolicy,
) -> (Vec<NormalizedRecord>, IngestReport) {
    let mut report = IngestReport {
        rows_read: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (line, raw) in rows.iter().enumerate() {
        match NormalizedRecord::from_raw(raw, policy) {
            Ok(record) => records.push(record),
            Err(issue) => {
                debug!(row = line + 1, %issue, "Dropping survey row");
                report.record_drop(&issue);
            }
        }
    }

    report.rows_kept = records.len();
    (records, report)
}

/// Reads the leading integer of `s` (`"2022-23"` -> 2022, `"3 months"` -> 3,
/// `"2022.0"` -> 2022). `None` when the text does not start with digits.
fn parse_integer(s: &str) -> Option<i64> {
    numeric_prefix(s, false).parse::<i64>().ok()
}

/// Reads the leading decimal number of `s` (`"45%"` -> 45.0). Non-finite
/// results count as unparseable.
fn parse_rate(s: &str) -> Option<f64> {
    numeric_prefix(s, true)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Longest prefix of `s` (after leading whitespace) that forms a number:
/// optional sign and digits, plus a fraction and exponent when `fractional`.
/// Empty when no digit is found.
fn numeric_prefix(s: &str, fractional: bool) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if fractional {
        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_from(end + 1);
            if has_digits || frac_end > end + 1 {
                has_digits = true;
                end = frac_end;
            }
        }

        if has_digits && matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            if exp_end > exp {
                end = exp_end;
            }
        }
    }

    if has_digits { &s[..end] } else { "" }
}
