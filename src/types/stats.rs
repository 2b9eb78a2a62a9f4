use super::Trend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of an RTSI ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub code: String,
    pub name: String,
    pub rtsi: f64,
    pub trend: Trend,
}

/// Trend filter applied when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendFilter {
    /// Any bullish category (weak, moderate or strong).
    Up,
    /// Any bearish category (weak, moderate or strong).
    Down,
    /// Exactly this trend.
    Exact(Trend),
}

impl TrendFilter {
    /// Parse a filter name: "up"/"bull", "down"/"bear", "strong_up"/"strong_down",
    /// or any trend name for an exact match.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "bull" | "bullish" => Some(Self::Up),
            "down" | "bear" | "bearish" => Some(Self::Down),
            "strong_up" => Some(Self::Exact(Trend::StrongBull)),
            "strong_down" => Some(Self::Exact(Trend::StrongBear)),
            other => Trend::from_str(other).map(Self::Exact),
        }
    }

    pub fn matches(&self, trend: Trend) -> bool {
        match self {
            Self::Up => trend.is_bullish(),
            Self::Down => trend.is_bearish(),
            Self::Exact(expected) => trend == *expected,
        }
    }
}

/// Descriptive statistics over valid RTSI values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtsiMoments {
    /// Valid / total, as a percentage.
    pub success_rate_pct: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

/// Aggregate view of a batch result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Number of entries in the result set.
    pub total: usize,
    /// Entries with RTSI > 0.
    pub valid: usize,
    /// Present only when at least one entry is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moments: Option<RtsiMoments>,
    /// Trend frequency over all entries. Empty when no entry is valid.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub trend_distribution: BTreeMap<Trend, usize>,
}

impl StatisticsSummary {
    /// True for the summary of an empty result set.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
