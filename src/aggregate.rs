//! Single-pass grouping of normalized records into region-year accumulators.

use std::collections::BTreeMap;

use crate::record::{AGE_BUCKETS, ChildSex, NormalizedRecord, SettlementType};

/// A running sum with the number of values folded into it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Tally {
    pub sum: f64,
    pub count: usize,
}

impl Tally {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }
}

/// In-progress statistics for one region in one survey year.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct YearAccumulator {
    pub total: Tally,
    pub urban: Tally,
    pub rural: Tally,
    pub male: Tally,
    pub female: Tally,
    pub wealth_counts: [u32; 5],
    pub age_buckets: [Vec<f64>; AGE_BUCKETS],
}

impl YearAccumulator {
    /// Folds one record in.
    ///
    /// The total always moves; each subgroup moves only when the record
    /// carries a recognized value for it.
    pub fn push(&mut self, record: &NormalizedRecord) {
        let rate = record.ebf_rate;
        self.total.add(rate);

        match record.settlement {
            SettlementType::Urban => self.urban.add(rate),
            SettlementType::Rural => self.rural.add(rate),
            SettlementType::Other => {}
        }

        match record.sex {
            ChildSex::Male => self.male.add(rate),
            ChildSex::Female => self.female.add(rate),
            ChildSex::Other => {}
        }

        if let Some(q) = record.wealth {
            self.wealth_counts[q.index()] += 1;
        }

        if let Some(age) = record.age {
            self.age_buckets[age.index()].push(rate);
        }
    }
}

/// Region name → year → accumulator.
///
/// Both levels are ordered maps, so iteration yields regions by byte order
/// and years ascending without a separate sort.
#[derive(Debug, Default, Clone)]
pub struct RegionalAggregator {
    regions: BTreeMap<String, BTreeMap<i32, YearAccumulator>>,
}

impl RegionalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an aggregator from a full record set in one pass.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        let mut agg = Self::new();
        for record in records {
            agg.push(record);
        }
        agg
    }

    pub fn push(&mut self, record: &NormalizedRecord) {
        self.regions
            .entry(record.region.clone())
            .or_default()
            .entry(record.year)
            .or_default()
            .push(record);
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn into_regions(self) -> BTreeMap<String, BTreeMap<i32, YearAccumulator>> {
        self.regions
    }
}
