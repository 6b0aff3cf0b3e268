use serde::Serialize;

/// Map fill for regions with no value in the active year.
pub const NO_DATA_COLOR: &str = "#d1d8e0";

/// Performance band for an EBF rate, used to colour the leaderboard, the
/// heatmap cells, and the map.
///
/// | Range   | Band   |
/// |---------|--------|
/// | >= 50   | High   |
/// | >= 30   | Medium |
/// | < 30    | Low    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBand {
    High,
    Medium,
    Low,
}

impl RateBand {
    pub fn classify(rate: f64) -> Self {
        match rate {
            r if r >= 50.0 => RateBand::High,
            r if r >= 30.0 => RateBand::Medium,
            _ => RateBand::Low,
        }
    }

    /// Band for a map region. A value of exactly 0 means not surveyed that
    /// year (or not matched to the dataset) and gets no band.
    pub fn for_map(rate: f64) -> Option<Self> {
        (rate != 0.0).then(|| Self::classify(rate))
    }

    /// Hex colour the dashboard paints this band with.
    pub fn color(self) -> &'static str {
        match self {
            RateBand::High => "#27ae60",
            RateBand::Medium => "#f39c12",
            RateBand::Low => "#c0392b",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RateBand::classify(100.0), RateBand::High);
        assert_eq!(RateBand::classify(50.0), RateBand::High);
        assert_eq!(RateBand::classify(49.9), RateBand::Medium);
        assert_eq!(RateBand::classify(30.0), RateBand::Medium);
        assert_eq!(RateBand::classify(29.9), RateBand::Low);
        assert_eq!(RateBand::classify(0.0), RateBand::Low);
    }

    #[test]
    fn test_nan_is_low() {
        assert_eq!(RateBand::classify(f64::NAN), RateBand::Low);
    }

    #[test]
    fn test_map_band_zero_is_no_data() {
        assert_eq!(RateBand::for_map(0.0), None);
        assert_eq!(RateBand::for_map(12.5), Some(RateBand::Low));
        assert_eq!(RateBand::for_map(55.0), Some(RateBand::High));
    }

    #[test]
    fn test_colors() {
        assert_eq!(RateBand::High.color(), "#27ae60");
        assert_eq!(RateBand::Low.color(), "#c0392b");
    }
}
