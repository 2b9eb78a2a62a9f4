use crate::error::{Result, RtsiError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Highest ordinal score on the rating scale (8 tiers: 0-7).
pub const RATING_SCALE_MAX: u8 = 7;

/// Placeholder symbol meaning "no rating for this period".
pub const NO_RATING_SYMBOL: &str = "-";

/// Mapping from rating symbol to ordinal score.
///
/// A `None` value marks a known symbol that carries no score (the placeholder).
/// Symbols absent from the map are treated the same way by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingMap {
    scores: BTreeMap<String, Option<u8>>,
}

impl Default for RatingMap {
    fn default() -> Self {
        let scores = [
            ("大多", Some(7)),
            ("中多", Some(6)),
            ("小多", Some(5)),
            ("微多", Some(4)),
            ("微空", Some(3)),
            ("小空", Some(2)),
            ("中空", Some(1)),
            ("大空", Some(0)),
            (NO_RATING_SYMBOL, None),
        ]
        .into_iter()
        .map(|(symbol, score)| (symbol.to_string(), score))
        .collect();

        Self { scores }
    }
}

impl RatingMap {
    /// Build a map from explicit entries, validating the score range.
    pub fn new(scores: BTreeMap<String, Option<u8>>) -> Result<Self> {
        let map = Self { scores };
        map.validate()?;
        Ok(map)
    }

    /// Parse a JSON object of `symbol -> score|null`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: RatingMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Load a JSON rating map from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Score for a symbol, or None when the symbol is unscored or unknown.
    pub fn score(&self, symbol: &str) -> Option<u8> {
        self.scores.get(symbol.trim()).copied().flatten()
    }

    /// Number of symbols that map to a score.
    pub fn scored_len(&self) -> usize {
        self.scores.values().filter(|s| s.is_some()).count()
    }

    fn validate(&self) -> Result<()> {
        if self.scored_len() == 0 {
            return Err(RtsiError::InvalidConfig(
                "rating map has no scored symbols".to_string(),
            ));
        }
        if let Some((symbol, score)) = self
            .scores
            .iter()
            .find_map(|(sym, score)| score.filter(|s| *s > RATING_SCALE_MAX).map(|s| (sym, s)))
        {
            return Err(RtsiError::InvalidConfig(format!(
                "rating '{}' maps to {} (scale is 0-{})",
                symbol, score, RATING_SCALE_MAX
            )));
        }
        Ok(())
    }
}

/// Whether a column name follows the time-key convention (4-digit year prefix).
pub fn is_time_key(column: &str) -> bool {
    column.len() >= 4 && column.as_bytes()[..4].iter().all(u8::is_ascii_digit)
}

/// Parse a `YYYYMMDD` time key into a calendar date.
pub fn time_key_date(key: &str) -> Option<NaiveDate> {
    let digits = key.get(..8)?;
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// One observation in a rating series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub time_key: String,
    pub symbol: String,
}

/// Time-ordered rating observations for one entity. Time keys are unique and ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSeries {
    points: Vec<RatingPoint>,
}

impl RatingSeries {
    /// Build a series from (time key, symbol) pairs.
    /// Pairs are sorted by key; for a repeated key the last pair wins.
    pub fn from_pairs<K, S>(pairs: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        let ordered: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, s)| (k.into(), s.into()))
            .collect();

        Self {
            points: ordered
                .into_iter()
                .map(|(time_key, symbol)| RatingPoint { time_key, symbol })
                .collect(),
        }
    }

    /// Build a series from symbols already in time order, keyed by position.
    pub fn from_symbols<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            points: symbols
                .into_iter()
                .enumerate()
                .map(|(i, symbol)| RatingPoint {
                    time_key: format!("{:08}", i),
                    symbol: symbol.into(),
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[RatingPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keep only the most recent `window` observations.
    pub fn tail(&self, window: usize) -> Self {
        let start = self.points.len().saturating_sub(window);
        Self {
            points: self.points[start..].to_vec(),
        }
    }
}

/// Encoded ordinal scores, in the same order as the source ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSeries(Vec<u8>);

impl ScoreSeries {
    pub fn new(scores: Vec<u8>) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent score.
    pub fn last(&self) -> Option<u8> {
        self.0.last().copied()
    }

    /// Difference between the latest score and the score `lag` positions earlier.
    pub fn change_over(&self, lag: usize) -> Option<f64> {
        if self.0.len() < lag + 1 {
            return None;
        }
        let latest = self.0[self.0.len() - 1];
        let earlier = self.0[self.0.len() - 1 - lag];
        Some(latest as f64 - earlier as f64)
    }

    /// Scores as floating point values for regression.
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&s| s as f64).collect()
    }

    /// Lowest and highest score, if any.
    pub fn range(&self) -> Option<(u8, u8)> {
        let min = *self.0.iter().min()?;
        let max = *self.0.iter().max()?;
        Some((min, max))
    }
}

/// One entity row of a batch table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRow {
    /// Entity identifier (e.g. stock code).
    #[serde(default)]
    pub code: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Industry tag.
    #[serde(default)]
    pub industry: Option<String>,
    /// Column name -> rating symbol. Columns that are not time keys are ignored.
    #[serde(default)]
    pub ratings: BTreeMap<String, String>,
}

impl RatingRow {
    /// Extract the rating series across the given (sorted) time-key columns.
    /// Columns absent from this row are skipped.
    pub fn series(&self, time_keys: &[String]) -> RatingSeries {
        RatingSeries::from_pairs(time_keys.iter().filter_map(|key| {
            self.ratings
                .get(key)
                .map(|symbol| (key.clone(), symbol.clone()))
        }))
    }
}

/// Entities x time-indexed rating columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTable {
    pub rows: Vec<RatingRow>,
}

impl RatingTable {
    pub fn new(rows: Vec<RatingRow>) -> Self {
        Self { rows }
    }

    /// Load a table from a JSON file (`{"rows": [...]}`).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All time-key columns across the table, sorted ascending.
    pub fn time_keys(&self) -> Vec<String> {
        let keys: BTreeSet<&String> = self
            .rows
            .iter()
            .flat_map(|row| row.ratings.keys())
            .filter(|key| is_time_key(key))
            .collect();
        keys.into_iter().cloned().collect()
    }
}
