use super::Trend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Numeric fields of a successful scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendScore {
    /// Rating trend strength index, 0-100 (2 decimals).
    pub rtsi: f64,
    /// Trend category from slope and significance.
    pub trend: Trend,
    /// Significance of the slope, 0-1 (3 decimals).
    pub confidence: f64,
    /// Regression slope in score units per observation (4 decimals).
    pub slope: f64,
    /// Coefficient of determination, 0-1 (3 decimals).
    pub r_squared: f64,
    /// Latest encoded score.
    pub recent_score: Option<u8>,
    /// Latest score minus the score five observations earlier.
    pub score_change_5d: Option<f64>,
    /// Number of valid (encoded) observations.
    pub data_points: usize,
}

/// Outcome of scoring one rating series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RtsiOutcome {
    /// Regression succeeded.
    Scored(TrendScore),
    /// Fewer valid points than the configured minimum.
    InsufficientData { data_points: usize },
    /// Regression failed numerically.
    CalculationError { error: String, data_points: usize },
}

impl RtsiOutcome {
    pub fn rtsi(&self) -> f64 {
        match self {
            Self::Scored(score) => score.rtsi,
            _ => 0.0,
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            Self::Scored(score) => score.trend,
            Self::InsufficientData { .. } => Trend::InsufficientData,
            Self::CalculationError { .. } => Trend::CalculationError,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Self::Scored(score) => score.confidence,
            _ => 0.0,
        }
    }

    pub fn slope(&self) -> f64 {
        match self {
            Self::Scored(score) => score.slope,
            _ => 0.0,
        }
    }

    pub fn r_squared(&self) -> f64 {
        match self {
            Self::Scored(score) => score.r_squared,
            _ => 0.0,
        }
    }

    pub fn recent_score(&self) -> Option<u8> {
        match self {
            Self::Scored(score) => score.recent_score,
            _ => None,
        }
    }

    pub fn score_change_5d(&self) -> Option<f64> {
        match self {
            Self::Scored(score) => score.score_change_5d,
            _ => None,
        }
    }

    pub fn data_points(&self) -> usize {
        match self {
            Self::Scored(score) => score.data_points,
            Self::InsufficientData { data_points } => *data_points,
            Self::CalculationError { data_points, .. } => *data_points,
        }
    }

    /// Error description for calculation failures.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::CalculationError { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored(_))
    }

    /// Counts toward ranking and statistics (strictly positive RTSI).
    pub fn is_valid(&self) -> bool {
        self.rtsi() > 0.0
    }
}

/// Scoring outcome with entity metadata, as produced by the batch engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityResult {
    pub code: String,
    pub name: String,
    pub industry: String,
    #[serde(flatten)]
    pub outcome: RtsiOutcome,
}

/// Batch results keyed by entity identifier, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<EntityResult>", into = "Vec<EntityResult>")]
pub struct BatchResultSet {
    entries: Vec<EntityResult>,
    index: HashMap<String, usize>,
}

impl BatchResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result. Returns the replaced result when the code was already present;
    /// the replacement keeps the original position.
    pub fn insert(&mut self, result: EntityResult) -> Option<EntityResult> {
        match self.index.get(&result.code) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], result)),
            None => {
                self.index.insert(result.code.clone(), self.entries.len());
                self.entries.push(result);
                None
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&EntityResult> {
        self.index.get(code).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Results in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<EntityResult>> for BatchResultSet {
    fn from(entries: Vec<EntityResult>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry);
        }
        set
    }
}

impl From<BatchResultSet> for Vec<EntityResult> {
    fn from(set: BatchResultSet) -> Self {
        set.entries
    }
}

impl FromIterator<EntityResult> for BatchResultSet {
    fn from_iter<I: IntoIterator<Item = EntityResult>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}
