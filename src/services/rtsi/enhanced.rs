//! Enhanced RTSI.
//!
//! Post-processes the base index into a normalized score in `[0, 1]`, optionally
//! weighting it by rating volatility, recent trend strength and momentum.

use super::batch::row_code;
use super::encoder::encode;
use super::regression::ols_slope;
use super::scorer::score_scores;
use crate::config::{EnhancedConfig, ScoringConfig};
use crate::types::{RatingSeries, RatingTable, RtsiOutcome, ScoreSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of most recent scores used for the trend strength factor.
pub const TREND_STRENGTH_WINDOW: usize = 20;
/// Number of most recent rating changes averaged into momentum.
pub const MOMENTUM_WINDOW: usize = 10;

/// Enhanced score together with the base result it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedScore {
    pub enhanced_rtsi: f64,
    pub base: RtsiOutcome,
    pub data_points: usize,
    /// Lowest and highest encoded score.
    pub rating_range: (u8, u8),
}

/// Enhanced score of a single series, restricted to the last `time_window` observations.
pub fn enhanced_score(
    series: &RatingSeries,
    scoring: &ScoringConfig,
    config: &EnhancedConfig,
) -> Option<EnhancedScore> {
    let scores = encode(&series.tail(config.time_window), &scoring.rating_map);
    enhanced_from_scores(&scores, scoring.min_data_points, config)
}

/// Enhanced score of already encoded scores.
///
/// Returns `None` when there are fewer than `config.min_data_points` scores or
/// the base RTSI is zero.
pub fn enhanced_from_scores(
    scores: &ScoreSeries,
    base_min_data_points: usize,
    config: &EnhancedConfig,
) -> Option<EnhancedScore> {
    if scores.len() < config.min_data_points {
        return None;
    }

    let base = score_scores(scores, base_min_data_points);
    if base.rtsi() == 0.0 {
        return None;
    }

    let values = scores.to_f64();
    let mut enhanced = base.rtsi() / 100.0;

    if config.use_volatility_adjustment {
        enhanced *= volatility_factor(&values, config);
    }
    if config.use_momentum_adjustment {
        enhanced *= momentum_factor(&values);
    }
    if enhanced < config.rtsi_threshold {
        enhanced *= 0.8;
    }

    Some(EnhancedScore {
        enhanced_rtsi: enhanced.min(1.0),
        data_points: scores.len(),
        rating_range: scores.range()?,
        base,
    })
}

/// Enhanced scores for every identified row of a table.
///
/// Rows without an identifier or without an enhanced score are skipped.
pub fn batch_enhanced(
    table: &RatingTable,
    scoring: &ScoringConfig,
    config: &EnhancedConfig,
) -> Vec<(String, EnhancedScore)> {
    let time_keys = table.time_keys();
    let start = time_keys.len().saturating_sub(config.time_window);
    let window = &time_keys[start..];

    let mut results = Vec::new();
    let mut failed = 0usize;
    for (idx, row) in table.rows.iter().enumerate() {
        if row.code.as_deref().map_or(true, |c| c.trim().is_empty()) {
            failed += 1;
            continue;
        }
        match enhanced_score(&row.series(window), scoring, config) {
            Some(score) => results.push((row_code(row, idx), score)),
            None => failed += 1,
        }
    }

    debug!(
        "Enhanced RTSI batch: {} scored, {} skipped",
        results.len(),
        failed
    );
    results
}

// ============================================================================
// Adjustment Factors
// ============================================================================

fn volatility_factor(values: &[f64], config: &EnhancedConfig) -> f64 {
    let (mean, std) = mean_and_std(values);
    let cv = if mean > 0.0 { std / mean } else { 0.0 };

    let mut factor = if cv > config.volatility_threshold {
        0.8
    } else if cv < config.volatility_threshold / 2.0 {
        1.2
    } else {
        1.0
    };

    if values.len() >= TREND_STRENGTH_WINDOW {
        let recent = &values[values.len() - TREND_STRENGTH_WINDOW..];
        factor *= if ols_slope(recent).abs() > config.trend_strength_threshold {
            1.1
        } else {
            0.95
        };
    }

    factor
}

fn momentum_factor(values: &[f64]) -> f64 {
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    if diffs.is_empty() {
        return 1.0;
    }

    let recent = &diffs[diffs.len().saturating_sub(MOMENTUM_WINDOW)..];
    let momentum = recent.iter().sum::<f64>() / recent.len() as f64;
    let (_, std) = mean_and_std(&diffs);
    let consistency = 1.0 / (1.0 + std);

    1.0 + momentum * consistency * 0.1
}

/// Mean and population standard deviation.
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingRow;

    const STAIRS: [u8; 10] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5];

    fn plain() -> EnhancedConfig {
        EnhancedConfig {
            use_momentum_adjustment: false,
            use_volatility_adjustment: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_min_data_points() {
        let scores = ScoreSeries::new(STAIRS[..9].to_vec());
        assert!(enhanced_from_scores(&scores, 5, &EnhancedConfig::default()).is_none());
    }

    #[test]
    fn test_flat_series_has_no_enhanced_score() {
        let scores = ScoreSeries::new(vec![4; 12]);
        assert!(enhanced_from_scores(&scores, 5, &EnhancedConfig::default()).is_none());
    }

    #[test]
    fn test_plain_is_normalized_base() {
        let scores = ScoreSeries::new(STAIRS.to_vec());
        let result = enhanced_from_scores(&scores, 5, &plain()).expect("enhanced score");
        let base = result.base.rtsi() / 100.0;
        assert!(base >= 0.4);
        assert!((result.enhanced_rtsi - base).abs() < 1e-12);
        assert_eq!(result.data_points, 10);
        assert_eq!(result.rating_range, (1, 5));
    }

    #[test]
    fn test_low_scores_damped_below_threshold() {
        let scores = ScoreSeries::new(STAIRS.to_vec());
        let config = EnhancedConfig {
            rtsi_threshold: 1.0,
            ..plain()
        };
        let result = enhanced_from_scores(&scores, 5, &config).expect("enhanced score");
        let base = result.base.rtsi() / 100.0;
        assert!((result.enhanced_rtsi - base * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_positive_momentum_boosts() {
        let scores = ScoreSeries::new(STAIRS.to_vec());
        let without = enhanced_from_scores(&scores, 5, &plain()).expect("enhanced score");
        let with = enhanced_from_scores(&scores, 5, &EnhancedConfig::default())
            .expect("enhanced score");
        assert!(with.enhanced_rtsi > without.enhanced_rtsi);
        assert!(with.enhanced_rtsi <= 1.0);
    }

    #[test]
    fn test_momentum_factor() {
        assert_eq!(momentum_factor(&[3.0]), 1.0);
        // constant step: momentum 1, consistency 1
        assert!((momentum_factor(&[1.0, 2.0, 3.0, 4.0]) - 1.1).abs() < 1e-12);
        assert!(momentum_factor(&[4.0, 3.0, 2.0, 1.0]) < 1.0);
    }

    #[test]
    fn test_volatility_factor() {
        let config = EnhancedConfig::default();
        // cv = 0 for a flat series, short of the trend strength window
        assert_eq!(volatility_factor(&[4.0; 10], &config), 1.2);
        // high dispersion around a low mean
        assert_eq!(volatility_factor(&[0.0, 7.0, 0.0, 7.0], &config), 0.8);

        let steep: Vec<f64> = (0..20).map(|i| (i % 8) as f64).collect();
        let flat = vec![5.0; 20];
        assert!((volatility_factor(&flat, &config) - 1.2 * 0.95).abs() < 1e-12);
        assert!(volatility_factor(&steep, &config) < 1.0);
    }

    #[test]
    fn test_series_respects_time_window() {
        const BY_SCORE: [&str; 8] = ["大空", "中空", "小空", "微空", "微多", "小多", "中多", "大多"];
        // ten top ratings, then a 60-point climb from 0 to 6
        let symbols = std::iter::repeat("大多")
            .take(10)
            .chain((0..60).map(|i| BY_SCORE[i * 7 / 60]));
        let series = RatingSeries::from_symbols(symbols);
        assert_eq!(series.len(), 70);

        let result = enhanced_score(&series, &ScoringConfig::default(), &EnhancedConfig::default())
            .expect("enhanced score");
        assert_eq!(result.data_points, 60);
        assert_eq!(result.rating_range, (0, 6));
        assert!(result.base.trend().is_bullish());
    }

    #[test]
    fn test_batch_skips_rows_without_code() {
        let ratings = ["中空", "中空", "小空", "小空", "微空", "微空", "微多", "微多", "小多", "小多"]
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("202506{:02}", i + 1), s.to_string()))
            .collect();
        let scored = RatingRow {
            code: Some("000001".to_string()),
            ratings,
            ..Default::default()
        };
        let anonymous = RatingRow {
            code: None,
            ..scored.clone()
        };
        let short = RatingRow {
            code: Some("000002".to_string()),
            ratings: scored.ratings.iter().take(5).map(|(k, v)| (k.clone(), v.clone())).collect(),
            ..Default::default()
        };

        let table = RatingTable::new(vec![scored, anonymous, short]);
        let results = batch_enhanced(&table, &ScoringConfig::default(), &EnhancedConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "000001");
        assert_eq!(results[0].1.rating_range, (1, 5));
    }
}
