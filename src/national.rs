//! Countrywide profile derived from the regional profiles.
//!
//! Each national figure is the mean of the regional figures for that year,
//! over the regions that surveyed it. Regions count equally regardless of how
//! many records stand behind them, so the result is not a record-weighted
//! average of the raw data.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::Tally;
use crate::record::AGE_BUCKETS;
use crate::summary::{RegionProfile, WealthDistribution, YearSummary};
use crate::utility::{rounded_mean, rounded_ratio};

pub const NATIONAL_REGION: &str = "National Average";
pub const NATIONAL_DISPLAY_NAME: &str = "National Avg";

/// Synthetic region holding the countrywide averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalProfile {
    #[serde(rename = "Region")]
    pub region: String,
    pub display_name: String,
    pub history: Vec<YearSummary>,
    /// Value of the most recent year, or 0 with no history.
    pub value: f64,
}

impl NationalProfile {
    pub fn year(&self, year: i32) -> Option<&YearSummary> {
        self.history
            .binary_search_by_key(&year, |h| h.year)
            .ok()
            .map(|i| &self.history[i])
    }
}

/// Every year that appears in any region's history, ascending.
pub fn all_years(regions: &[RegionProfile]) -> Vec<i32> {
    regions
        .iter()
        .flat_map(|r| r.history.iter().map(|h| h.year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Recomputes the national profile from scratch.
///
/// A pure function of `regions`: calling it twice on the same list gives the
/// same result, and the list itself is never touched.
#[tracing::instrument(skip(regions), fields(regions = regions.len()))]
pub fn national_profile(regions: &[RegionProfile]) -> NationalProfile {
    let history: Vec<YearSummary> = all_years(regions)
        .into_iter()
        .map(|year| national_year(regions, year))
        .collect();

    debug!(years = history.len(), "National profile computed");

    NationalProfile {
        region: NATIONAL_REGION.to_string(),
        display_name: NATIONAL_DISPLAY_NAME.to_string(),
        value: history.last().map_or(0.0, |h| h.value),
        history,
    }
}

fn national_year(regions: &[RegionProfile], year: i32) -> YearSummary {
    let mut value = Tally::default();
    let mut urban = Tally::default();
    let mut rural = Tally::default();
    let mut male = Tally::default();
    let mut female = Tally::default();
    let mut wealth = WealthDistribution::default();
    let mut ages: [Vec<f64>; AGE_BUCKETS] = Default::default();

    for h in regions.iter().filter_map(|r| r.year(year)) {
        value.add(h.value);
        urban.add(h.urban_avg);
        rural.add(h.rural_avg);
        male.add(h.male_avg);
        female.add(h.female_avg);
        wealth.add(&h.wealth_dist);
        for (bucket, avg) in ages.iter_mut().zip(h.age_trend) {
            bucket.push(avg);
        }
    }

    YearSummary {
        year,
        value: rounded_ratio(value.sum, value.count),
        urban_avg: rounded_ratio(urban.sum, urban.count),
        rural_avg: rounded_ratio(rural.sum, rural.count),
        male_avg: rounded_ratio(male.sum, male.count),
        female_avg: rounded_ratio(female.sum, female.count),
        wealth_dist: wealth,
        age_trend: std::array::from_fn(|i| rounded_mean(&ages[i])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(year: i32, value: f64) -> YearSummary {
        YearSummary {
            year,
            value,
            urban_avg: 0.0,
            rural_avg: 0.0,
            male_avg: 0.0,
            female_avg: 0.0,
            wealth_dist: WealthDistribution::default(),
            age_trend: [0.0; AGE_BUCKETS],
        }
    }

    #[test]
    fn test_empty_regions() {
        let n = national_profile(&[]);
        assert_eq!(n.region, NATIONAL_REGION);
        assert!(n.history.is_empty());
        assert_eq!(n.value, 0.0);
    }

    #[test]
    fn test_missing_years_are_excluded_not_zero() {
        let regions = vec![
            RegionProfile::new("A", vec![summary(2017, 30.0), summary(2022, 50.0)]),
            RegionProfile::new("B", vec![summary(2022, 80.0)]),
        ];

        let n = national_profile(&regions);
        let years: Vec<i32> = n.history.iter().map(|h| h.year).collect();
        assert_eq!(years, vec![2017, 2022]);
        assert_eq!(n.year(2017).map(|h| h.value), Some(30.0));
        assert_eq!(n.year(2022).map(|h| h.value), Some(65.0));
        assert_eq!(n.value, 65.0);
    }

    #[test]
    fn test_wealth_sums_and_ages_average() {
        let mut a = summary(2022, 50.0);
        a.wealth_dist = WealthDistribution::from_counts([1, 2, 3, 4, 5]);
        a.age_trend = [60.0, 50.0, 0.0, 0.0, 0.0, 10.0];
        let mut b = summary(2022, 70.0);
        b.wealth_dist = WealthDistribution::from_counts([5, 0, 0, 0, 1]);
        b.age_trend = [80.0, 45.0, 0.0, 0.0, 0.0, 0.0];

        let n = national_profile(&[
            RegionProfile::new("A", vec![a]),
            RegionProfile::new("B", vec![b]),
        ]);
        let h = &n.history[0];

        assert_eq!(h.wealth_dist, WealthDistribution::from_counts([6, 2, 3, 4, 6]));
        assert_eq!(h.age_trend, [70.0, 47.5, 0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_idempotent() {
        let regions = vec![
            RegionProfile::new("A", vec![summary(2022, 33.3)]),
            RegionProfile::new("B", vec![summary(2022, 66.7)]),
        ];
        assert_eq!(national_profile(&regions), national_profile(&regions));
    }

    #[test]
    fn test_national_value_ignores_active_year() {
        let mut regions = vec![RegionProfile::new(
            "A",
            vec![summary(2017, 30.0), summary(2022, 50.0)],
        )];
        regions[0].set_active_year(2017);

        assert_eq!(national_profile(&regions).value, 50.0);
    }

    #[test]
    fn test_all_years_sorted_unique() {
        let regions = vec![
            RegionProfile::new("A", vec![summary(2022, 1.0)]),
            RegionProfile::new("B", vec![summary(2003, 1.0), summary(2022, 1.0)]),
        ];
        assert_eq!(all_years(&regions), vec![2003, 2022]);
    }
}
