//! Presentation-facing views over the regional profiles.
//!
//! Everything here is a read model for the charts, map, leaderboard and
//! heatmap. Renderers receive these values; nothing in this module draws.

use serde::Serialize;
use tracing::debug;

use crate::band::{NO_DATA_COLOR, RateBand};
use crate::national::{NationalProfile, all_years, national_profile};
use crate::region_names::{dataset_name, display_name};
use crate::summary::{AgeTrend, RegionProfile, YearSummary};
use crate::utility::round1;

/// Programme target for the exclusive breastfeeding rate, in percent.
pub const DEFAULT_TARGET_RATE: f64 = 70.0;

/// Labels for [`SubgroupComparison`] values, in order.
pub const SUBGROUP_LABELS: [&str; 4] = ["Urban", "Rural", "Male", "Female"];

/// Points every region's `value` at `year` in place (0 where absent).
pub fn set_active_year(regions: &mut [RegionProfile], year: i32) {
    for region in regions.iter_mut() {
        region.set_active_year(year);
    }
}

/// Returns a copy of `regions` with `value` pointed at `year`.
pub fn with_active_year(regions: &[RegionProfile], year: i32) -> Vec<RegionProfile> {
    let mut out = regions.to_vec();
    set_active_year(&mut out, year);
    out
}

/// Every surveyed year, newest first.
pub fn available_years(regions: &[RegionProfile]) -> Vec<i32> {
    let mut years = all_years(regions);
    years.reverse();
    years
}

/// One line of the ranking export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Rate")]
    pub rate: f64,
}

/// Regions with a positive rate for `year`, highest first.
///
/// Ties keep the regions' display order.
pub fn ranking_table(regions: &[RegionProfile], year: i32) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = regions
        .iter()
        .map(|r| RankingRow {
            region: r.region.clone(),
            year,
            rate: r.value_for(year),
        })
        .filter(|row| row.rate > 0.0)
        .collect();

    rows.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub region: String,
    pub rate: f64,
    pub band: RateBand,
    pub color: &'static str,
}

/// The ranking for `year`, annotated with band colours for the bar chart.
pub fn leaderboard(regions: &[RegionProfile], year: i32) -> Vec<LeaderboardEntry> {
    ranking_table(regions, year)
        .into_iter()
        .map(|row| {
            let band = RateBand::classify(row.rate);
            LeaderboardEntry {
                region: row.region,
                rate: row.rate,
                band,
                color: band.color(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatCell {
    pub value: f64,
    pub band: RateBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub region: String,
    /// One cell per entry of [`Heatmap::years`]; `None` where not surveyed.
    pub cells: Vec<Option<HeatCell>>,
}

/// Region × year matrix of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub years: Vec<i32>,
    pub rows: Vec<HeatmapRow>,
}

pub fn heatmap(regions: &[RegionProfile]) -> Heatmap {
    let years = all_years(regions);
    let rows = regions
        .iter()
        .map(|r| HeatmapRow {
            region: r.region.clone(),
            cells: years
                .iter()
                .map(|&y| {
                    r.year(y).map(|h| HeatCell {
                        value: h.value,
                        band: RateBand::classify(h.value),
                    })
                })
                .collect(),
        })
        .collect();

    Heatmap { years, rows }
}

/// Headline national figure for a year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NationalKpi {
    pub year: i32,
    pub value: f64,
    /// `value - target`; negative while below target.
    pub gap_to_target: f64,
}

impl NationalKpi {
    pub fn target_met(&self) -> bool {
        self.gap_to_target >= 0.0
    }
}

/// `None` when no region surveyed `year`.
pub fn national_kpi(national: &NationalProfile, year: i32, target: f64) -> Option<NationalKpi> {
    national.year(year).map(|h| NationalKpi {
        year,
        value: h.value,
        gap_to_target: round1(h.value - target),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    Met,
    /// Percentage points still needed.
    Below { gap: f64 },
}

/// Sidebar card for the focused region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionKpi {
    pub name: String,
    pub value: f64,
    pub band: RateBand,
    pub target: TargetStatus,
}

pub fn region_kpi(profile: &RegionProfile, target: f64) -> RegionKpi {
    let gap = round1(target - profile.value);
    RegionKpi {
        name: display_name(&profile.region),
        value: profile.value,
        band: RateBand::classify(profile.value),
        target: if gap > 0.0 {
            TargetStatus::Below { gap }
        } else {
            TargetStatus::Met
        },
    }
}

/// Subgroup averages of one profile beside the national ones, ordered as
/// [`SUBGROUP_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubgroupComparison {
    pub year: i32,
    pub focus: [f64; 4],
    pub national: [f64; 4],
}

/// `None` when the focused profile has no summary for `year`. The national
/// side is all zeros when the nation lacks that year.
pub fn subgroup_comparison(
    focus: &[YearSummary],
    national: &NationalProfile,
    year: i32,
) -> Option<SubgroupComparison> {
    let summary = focus.iter().find(|h| h.year == year)?;
    Some(SubgroupComparison {
        year,
        focus: summary.subgroups(),
        national: national.year(year).map_or([0.0; 4], YearSummary::subgroups),
    })
}

/// Either a selected region or the national profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus<'a> {
    Region(&'a RegionProfile),
    National(NationalProfile),
}

impl Focus<'_> {
    pub fn name(&self) -> String {
        match self {
            Focus::Region(r) => display_name(&r.region),
            Focus::National(n) => n.display_name.clone(),
        }
    }

    pub fn history(&self) -> &[YearSummary] {
        match self {
            Focus::Region(r) => &r.history,
            Focus::National(n) => &n.history,
        }
    }

    pub fn year(&self, year: i32) -> Option<&YearSummary> {
        self.history().iter().find(|h| h.year == year)
    }
}

/// Selection state shared by every view.
///
/// Holds the region list together with the current year and region
/// selection; they change only through the methods below.
#[derive(Debug, Clone)]
pub struct Dashboard {
    regions: Vec<RegionProfile>,
    selected_year: Option<i32>,
    selected_region: Option<String>,
    target: f64,
}

impl Dashboard {
    /// Starts on the most recent surveyed year with no region selected.
    pub fn new(regions: Vec<RegionProfile>, target: f64) -> Self {
        let mut dashboard = Dashboard {
            regions,
            selected_year: None,
            selected_region: None,
            target,
        };
        if let Some(&latest) = available_years(&dashboard.regions).first() {
            dashboard.select_year(latest);
        }
        dashboard
    }

    pub fn regions(&self) -> &[RegionProfile] {
        &self.regions
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    pub fn selected_region(&self) -> Option<&RegionProfile> {
        let name = self.selected_region.as_deref()?;
        self.regions.iter().find(|r| r.region == name)
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Switches the active year; region values are re-pointed on a fresh list.
    pub fn select_year(&mut self, year: i32) {
        debug!(year, "Selecting year");
        self.regions = with_active_year(&self.regions, year);
        self.selected_year = Some(year);
    }

    /// Selects a region by dataset name. Returns `false` (and leaves the
    /// selection alone) when no such region exists.
    pub fn select_region(&mut self, region: &str) -> bool {
        if self.regions.iter().any(|r| r.region == region) {
            self.selected_region = Some(region.to_string());
            true
        } else {
            false
        }
    }

    /// Selects the region a boundary-file feature refers to.
    pub fn select_map_feature(&mut self, map_name: &str) -> bool {
        let region = dataset_name(map_name).to_string();
        self.select_region(&region)
    }

    pub fn clear_region(&mut self) {
        self.selected_region = None;
    }

    pub fn national(&self) -> NationalProfile {
        national_profile(&self.regions)
    }

    /// The selected region, or the nation when nothing is selected.
    pub fn focus(&self) -> Focus<'_> {
        match self.selected_region() {
            Some(r) => Focus::Region(r),
            None => Focus::National(self.national()),
        }
    }

    /// Active-year value for a boundary-file feature; 0 when unmatched.
    pub fn map_value(&self, map_name: &str) -> f64 {
        let region = dataset_name(map_name);
        self.regions
            .iter()
            .find(|r| r.region == region)
            .map_or(0.0, |r| r.value)
    }

    /// Band for a boundary-file feature; `None` when it has no value for the
    /// active year.
    pub fn map_band(&self, map_name: &str) -> Option<RateBand> {
        RateBand::for_map(self.map_value(map_name))
    }

    /// Fill colour for a boundary-file feature, grey when there is no data.
    pub fn map_color(&self, map_name: &str) -> &'static str {
        self.map_band(map_name).map_or(NO_DATA_COLOR, RateBand::color)
    }

    pub fn national_kpi(&self) -> Option<NationalKpi> {
        national_kpi(&self.national(), self.selected_year?, self.target)
    }

    /// Sidebar card; `None` while the nation is focused.
    pub fn region_kpi(&self) -> Option<RegionKpi> {
        self.selected_region().map(|r| region_kpi(r, self.target))
    }

    pub fn subgroup_comparison(&self) -> Option<SubgroupComparison> {
        let year = self.selected_year?;
        let national = self.national();
        match self.selected_region() {
            Some(r) => subgroup_comparison(&r.history, &national, year),
            None => subgroup_comparison(&national.history, &national, year),
        }
    }

    /// Age-bucket averages of the focused profile for the selected year.
    pub fn age_trend(&self) -> Option<AgeTrend> {
        let year = self.selected_year?;
        self.focus().year(year).map(|h| h.age_trend)
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.selected_year
            .map(|y| leaderboard(&self.regions, y))
            .unwrap_or_default()
    }

    pub fn rankings(&self) -> Vec<RankingRow> {
        self.selected_year
            .map(|y| ranking_table(&self.regions, y))
            .unwrap_or_default()
    }

    pub fn heatmap(&self) -> Heatmap {
        heatmap(&self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AGE_BUCKETS;
    use crate::summary::WealthDistribution;

    fn summary(year: i32, value: f64) -> YearSummary {
        YearSummary {
            year,
            value,
            urban_avg: value,
            rural_avg: 0.0,
            male_avg: 0.0,
            female_avg: value,
            wealth_dist: WealthDistribution::default(),
            age_trend: [value; AGE_BUCKETS],
        }
    }

    fn regions() -> Vec<RegionProfile> {
        vec![
            RegionProfile::new("NCR", vec![summary(2017, 20.0), summary(2022, 45.0)]),
            RegionProfile::new("Region V", vec![summary(2022, 75.0)]),
            RegionProfile::new("Region X", vec![summary(2017, 55.0)]),
        ]
    }

    #[test]
    fn test_with_active_year_leaves_input_untouched() {
        let original = regions();
        let moved = with_active_year(&original, 2017);

        assert_eq!(original[0].value, 45.0);
        assert_eq!(moved[0].value, 20.0);
        assert_eq!(moved[1].value, 0.0);
        assert_eq!(moved[2].value, 55.0);
    }

    #[test]
    fn test_set_active_year_in_place() {
        let mut r = regions();
        set_active_year(&mut r, 2022);
        let values: Vec<f64> = r.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![45.0, 75.0, 0.0]);
    }

    #[test]
    fn test_available_years_newest_first() {
        assert_eq!(available_years(&regions()), vec![2022, 2017]);
    }

    #[test]
    fn test_ranking_table_filters_and_sorts() {
        let rows = ranking_table(&regions(), 2022);
        assert_eq!(
            rows,
            vec![
                RankingRow {
                    region: "Region V".into(),
                    year: 2022,
                    rate: 75.0,
                },
                RankingRow {
                    region: "NCR".into(),
                    year: 2022,
                    rate: 45.0,
                },
            ]
        );
    }

    #[test]
    fn test_ranking_table_ties_keep_order() {
        let r = vec![
            RegionProfile::new("A", vec![summary(2022, 50.0)]),
            RegionProfile::new("B", vec![summary(2022, 50.0)]),
        ];
        let names: Vec<String> = ranking_table(&r, 2022)
            .into_iter()
            .map(|r| r.region)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_leaderboard_bands() {
        let board = leaderboard(&regions(), 2022);
        assert_eq!(board[0].band, RateBand::High);
        assert_eq!(board[1].band, RateBand::Medium);
        assert_eq!(board[1].color, "#f39c12");
    }

    #[test]
    fn test_heatmap_cells() {
        let map = heatmap(&regions());
        assert_eq!(map.years, vec![2017, 2022]);
        assert_eq!(map.rows.len(), 3);
        assert_eq!(map.rows[1].cells[0], None);
        assert_eq!(
            map.rows[1].cells[1],
            Some(HeatCell {
                value: 75.0,
                band: RateBand::High,
            })
        );
        assert_eq!(map.rows[0].cells[0].map(|c| c.band), Some(RateBand::Low));
    }

    #[test]
    fn test_national_kpi_gap() {
        let national = national_profile(&regions());
        let kpi = national_kpi(&national, 2022, DEFAULT_TARGET_RATE).unwrap();
        assert_eq!(kpi.value, 60.0);
        assert_eq!(kpi.gap_to_target, -10.0);
        assert!(!kpi.target_met());
        assert!(national_kpi(&national, 1999, DEFAULT_TARGET_RATE).is_none());
    }

    #[test]
    fn test_region_kpi_target_status() {
        let r = regions();
        assert_eq!(
            region_kpi(&r[0], 70.0).target,
            TargetStatus::Below { gap: 25.0 }
        );
        assert_eq!(region_kpi(&r[1], 70.0).target, TargetStatus::Met);
    }

    #[test]
    fn test_subgroup_comparison_missing_national_year() {
        let r = regions();
        let national = national_profile(&r[..1]);
        let cmp = subgroup_comparison(&r[2].history, &national, 2017).unwrap();
        assert_eq!(cmp.focus, [55.0, 0.0, 0.0, 55.0]);
        assert_eq!(cmp.national, [20.0, 0.0, 0.0, 20.0]);

        let only_b = national_profile(&r[1..2]);
        let cmp = subgroup_comparison(&r[2].history, &only_b, 2017).unwrap();
        assert_eq!(cmp.national, [0.0; 4]);
    }

    #[test]
    fn test_dashboard_starts_on_latest_year() {
        let d = Dashboard::new(regions(), DEFAULT_TARGET_RATE);
        assert_eq!(d.selected_year(), Some(2022));
        assert!(matches!(d.focus(), Focus::National(_)));
        assert_eq!(d.focus().name(), "National Avg");
        assert!(d.region_kpi().is_none());
    }

    #[test]
    fn test_dashboard_selection() {
        let mut d = Dashboard::new(regions(), DEFAULT_TARGET_RATE);

        assert!(!d.select_region("Atlantis"));
        assert!(d.select_map_feature("Bicol Region"));
        assert_eq!(d.focus().name(), "Region V");
        assert_eq!(d.age_trend(), Some([75.0; AGE_BUCKETS]));

        d.select_year(2017);
        assert_eq!(d.map_value("Bicol Region"), 0.0);
        assert_eq!(d.map_value("National Capital Region"), 20.0);
        assert_eq!(d.map_band("Bicol Region"), None);
        assert_eq!(d.map_color("Bicol Region"), "#d1d8e0");
        assert_eq!(d.map_band("National Capital Region"), Some(RateBand::Low));
        assert_eq!(d.map_color("National Capital Region"), "#c0392b");
        assert_eq!(d.map_color("Atlantis"), "#d1d8e0");
        assert_eq!(d.age_trend(), None);
        assert_eq!(d.national_kpi().map(|k| k.value), Some(37.5));

        d.clear_region();
        assert!(matches!(d.focus(), Focus::National(_)));
    }

    #[test]
    fn test_dashboard_empty() {
        let d = Dashboard::new(Vec::new(), DEFAULT_TARGET_RATE);
        assert_eq!(d.selected_year(), None);
        assert!(d.rankings().is_empty());
        assert!(d.national_kpi().is_none());
        assert!(d.heatmap().years.is_empty());
    }
}
