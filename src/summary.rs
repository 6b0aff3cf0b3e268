//! Finalized per-year summaries and the region profiles built from them.

use std::cmp::Ordering;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::aggregate::{RegionalAggregator, YearAccumulator};
use crate::record::{AGE_BUCKETS, WealthQuintile};
use crate::utility::{rounded_mean, rounded_ratio};

/// Rounded EBF rate per age month, index 0 through 5.
pub type AgeTrend = [f64; AGE_BUCKETS];

/// Record counts per wealth quintile. Raw counts, not shares.
///
/// Serializes as an object keyed by quintile name, poorest first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WealthDistribution([u32; 5]);

impl WealthDistribution {
    pub fn from_counts(counts: [u32; 5]) -> Self {
        WealthDistribution(counts)
    }

    pub fn get(&self, quintile: WealthQuintile) -> u32 {
        self.0[quintile.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Adds another distribution bucket by bucket.
    pub fn add(&mut self, other: &WealthDistribution) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            *mine += theirs;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WealthQuintile, u32)> + '_ {
        WealthQuintile::ALL.into_iter().map(|q| (q, self.get(q)))
    }
}

impl Serialize for WealthDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WealthQuintile::ALL.len()))?;
        for (q, count) in self.iter() {
            map.serialize_entry(q.as_str(), &count)?;
        }
        map.end()
    }
}

/// Statistics for one region (or the nation) in one survey year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    /// Mean over every record of the region-year.
    pub value: f64,
    pub urban_avg: f64,
    pub rural_avg: f64,
    pub male_avg: f64,
    pub female_avg: f64,
    pub wealth_dist: WealthDistribution,
    pub age_trend: AgeTrend,
}

impl YearSummary {
    /// Converts running sums into rounded averages. Empty subgroups yield 0.
    pub fn finalize(year: i32, acc: &YearAccumulator) -> Self {
        YearSummary {
            year,
            value: rounded_ratio(acc.total.sum, acc.total.count),
            urban_avg: rounded_ratio(acc.urban.sum, acc.urban.count),
            rural_avg: rounded_ratio(acc.rural.sum, acc.rural.count),
            male_avg: rounded_ratio(acc.male.sum, acc.male.count),
            female_avg: rounded_ratio(acc.female.sum, acc.female.count),
            wealth_dist: WealthDistribution::from_counts(acc.wealth_counts),
            age_trend: std::array::from_fn(|i| rounded_mean(&acc.age_buckets[i])),
        }
    }

    /// `[urban, rural, male, female]`, the order the subgroup comparison uses.
    pub fn subgroups(&self) -> [f64; 4] {
        [self.urban_avg, self.rural_avg, self.male_avg, self.female_avg]
    }
}

/// One region's history, oldest year first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfile {
    #[serde(rename = "Region")]
    pub region: String,
    pub history: Vec<YearSummary>,
    /// Value of the active year; starts as the latest year's value.
    pub value: f64,
}

impl RegionProfile {
    /// Builds a profile from summaries already sorted by year.
    pub fn new(region: impl Into<String>, history: Vec<YearSummary>) -> Self {
        let value = history.last().map_or(0.0, |h| h.value);
        RegionProfile {
            region: region.into(),
            history,
            value,
        }
    }

    pub fn year(&self, year: i32) -> Option<&YearSummary> {
        self.history
            .binary_search_by_key(&year, |h| h.year)
            .ok()
            .map(|i| &self.history[i])
    }

    pub fn latest(&self) -> Option<&YearSummary> {
        self.history.last()
    }

    /// Value recorded for `year`, or 0 when the region has no data for it.
    pub fn value_for(&self, year: i32) -> f64 {
        self.year(year).map_or(0.0, |h| h.value)
    }

    /// Points `value` at `year`.
    pub fn set_active_year(&mut self, year: i32) {
        self.value = self.value_for(year);
    }
}

/// Finalizes every region-year and returns profiles in display order.
pub fn build_profiles(aggregator: RegionalAggregator) -> Vec<RegionProfile> {
    let mut profiles: Vec<RegionProfile> = aggregator
        .into_regions()
        .into_iter()
        .map(|(region, years)| {
            let history: Vec<YearSummary> = years
                .iter()
                .map(|(&year, acc)| YearSummary::finalize(year, acc))
                .collect();

            for h in history.iter().filter(|h| h.value.is_nan()) {
                warn!(
                    region = %region,
                    year = h.year,
                    "Non-numeric EBF rate corrupted the average"
                );
            }

            RegionProfile::new(region, history)
        })
        .collect();

    profiles.sort_by(|a, b| compare_names(&a.region, &b.region));
    profiles
}

/// Orders names the way a human-facing list would.
///
/// Letters compare by base letter first, ignoring case and Latin-1 accents
/// (`Ñ` sorts with `N`). Ties go to the unaccented name, then to lowercase
/// at the first difference. Accents outside Latin-1 are not folded.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let base = |s: &str| lower(s).into_iter().map(base_letter).collect::<Vec<_>>();
    base(a)
        .cmp(&base(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn base_letter(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}
