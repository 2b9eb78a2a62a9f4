//! RTSI composite scoring.
//!
//! Combines trend consistency (R²), slope significance and normalized amplitude
//! into a single 0-100 index:
//!
//! `rtsi = 100 * (0.4 * consistency + 0.3 * significance + 0.3 * amplitude)`

use super::classifier::classify_trend;
use super::encoder::encode;
use super::regression::linear_regression;
use crate::config::ScoringConfig;
use crate::types::{RatingSeries, RtsiOutcome, ScoreSeries, TrendScore, RATING_SCALE_MAX};
use tracing::debug;

/// Weight of trend consistency (R²).
pub const CONSISTENCY_WEIGHT: f64 = 0.4;
/// Weight of slope significance.
pub const SIGNIFICANCE_WEIGHT: f64 = 0.3;
/// Weight of normalized amplitude.
pub const AMPLITUDE_WEIGHT: f64 = 0.3;

/// Lag of the short-horizon score change.
pub const SCORE_CHANGE_LAG: usize = 5;

/// Total projected movement over the window, relative to the rating scale, capped at 1.
pub fn amplitude(slope: f64, data_points: usize) -> f64 {
    (slope.abs() * data_points as f64 / RATING_SCALE_MAX as f64).min(1.0)
}

/// Weighted RTSI in 0-100, rounded to 2 decimals.
pub fn composite_rtsi(consistency: f64, significance: f64, amplitude: f64) -> f64 {
    let raw = (consistency * CONSISTENCY_WEIGHT
        + significance * SIGNIFICANCE_WEIGHT
        + amplitude * AMPLITUDE_WEIGHT)
        * 100.0;
    round_to(raw.clamp(0.0, 100.0), 2)
}

/// Encode and score a rating series.
pub fn score_series(series: &RatingSeries, config: &ScoringConfig) -> RtsiOutcome {
    if series.is_empty() {
        return RtsiOutcome::InsufficientData { data_points: 0 };
    }
    let scores = encode(series, &config.rating_map);
    score_scores(&scores, config.min_data_points)
}

/// Score an already encoded series.
pub fn score_scores(scores: &ScoreSeries, min_data_points: usize) -> RtsiOutcome {
    let data_points = scores.len();
    if data_points < min_data_points {
        return RtsiOutcome::InsufficientData { data_points };
    }

    let fit = match linear_regression(&scores.to_f64()) {
        Ok(fit) => fit,
        Err(e) => {
            debug!("RTSI regression failed on {} points: {}", data_points, e);
            return RtsiOutcome::CalculationError {
                error: e.to_string(),
                data_points,
            };
        }
    };

    let consistency = fit.consistency();
    let significance = fit.significance();
    let amplitude = amplitude(fit.slope, data_points);

    RtsiOutcome::Scored(TrendScore {
        rtsi: composite_rtsi(consistency, significance, amplitude),
        trend: classify_trend(fit.slope, significance),
        confidence: round_to(significance, 3),
        slope: round_to(fit.slope, 4),
        r_squared: round_to(consistency, 3),
        recent_score: scores.last(),
        score_change_5d: scores.change_over(SCORE_CHANGE_LAG),
        data_points,
    })
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RatingMap, Trend};

    fn series(symbols: &[&str]) -> RatingSeries {
        RatingSeries::from_symbols(symbols.iter().copied())
    }

    #[test]
    fn test_perfect_uptrend_scores_100() {
        let outcome = score_series(
            &series(&["中空", "小空", "微空", "微多", "小多", "中多", "大多"]),
            &ScoringConfig::default(),
        );
        let RtsiOutcome::Scored(score) = outcome else {
            panic!("expected a scored outcome");
        };
        assert_eq!(score.rtsi, 100.0);
        assert_eq!(score.trend, Trend::StrongBull);
        assert_eq!(score.confidence, 1.0);
        assert_eq!(score.slope, 1.0);
        assert_eq!(score.r_squared, 1.0);
        assert_eq!(score.recent_score, Some(7));
        assert_eq!(score.score_change_5d, Some(5.0));
        assert_eq!(score.data_points, 7);
    }

    #[test]
    fn test_perfect_downtrend_is_strong_bear() {
        let outcome = score_series(
            &series(&["大多", "中多", "小多", "微多", "微空", "小空"]),
            &ScoringConfig::default(),
        );
        assert_eq!(outcome.trend(), Trend::StrongBear);
        assert_eq!(outcome.slope(), -1.0);
        assert_eq!(outcome.score_change_5d(), Some(-5.0));
        // amplitude = 6 / 7, so the composite stops short of 100
        assert_eq!(outcome.rtsi(), 95.71);
    }

    #[test]
    fn test_empty_series_insufficient() {
        let outcome = score_series(&RatingSeries::default(), &ScoringConfig::default());
        assert_eq!(outcome, RtsiOutcome::InsufficientData { data_points: 0 });
    }

    #[test]
    fn test_insufficient_counts_valid_points_only() {
        let outcome = score_series(
            &series(&["大多", "-", "中多", "-", "小多", "???", "微多"]),
            &ScoringConfig::default(),
        );
        assert_eq!(outcome, RtsiOutcome::InsufficientData { data_points: 4 });
    }

    #[test]
    fn test_constant_series_is_neutral_zero() {
        let outcome = score_series(
            &series(&["微多", "微多", "微多", "微多", "微多", "微多"]),
            &ScoringConfig::default(),
        );
        let RtsiOutcome::Scored(score) = outcome else {
            panic!("expected a scored outcome");
        };
        assert_eq!(score.rtsi, 0.0);
        assert_eq!(score.trend, Trend::Neutral);
        assert_eq!(score.r_squared, 0.0);
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.slope, 0.0);
        assert_eq!(score.score_change_5d, Some(0.0));
    }

    #[test]
    fn test_regression_failure_is_calculation_error() {
        let outcome = score_scores(&ScoreSeries::new(vec![1, 2]), 2);
        assert_eq!(outcome.trend(), Trend::CalculationError);
        assert_eq!(outcome.rtsi(), 0.0);
        assert_eq!(outcome.confidence(), 0.0);
        assert_eq!(outcome.data_points(), 2);
        assert!(outcome.error().is_some());
    }

    #[test]
    fn test_noisy_series_insignificant() {
        // scores [1, 3, 2, 5, 4]: r² = 0.64, p ≈ 0.104 so significance collapses to 0
        let outcome = score_scores(&ScoreSeries::new(vec![1, 3, 2, 5, 4]), 5);
        let RtsiOutcome::Scored(score) = outcome else {
            panic!("expected a scored outcome");
        };
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.trend, Trend::Neutral);
        assert_eq!(score.r_squared, 0.64);
        // amplitude = min(1, 0.8 * 5 / 7) = 0.5714...
        let expected = round_to((0.64 * 0.4 + 0.3 * (0.8 * 5.0 / 7.0)) * 100.0, 2);
        assert_eq!(score.rtsi, expected);
        assert_eq!(score.score_change_5d, None);
    }

    #[test]
    fn test_custom_rating_map() {
        let map = RatingMap::from_json_str(r#"{"sell": 0, "hold": 3, "buy": 7}"#).unwrap();
        let config = ScoringConfig::default().with_rating_map(map);
        let outcome = score_series(&series(&["sell", "sell", "hold", "hold", "buy", "buy"]), &config);
        assert!(outcome.is_scored());
        assert!(outcome.trend().is_bullish());
    }

    #[test]
    fn test_amplitude_capped() {
        assert_eq!(amplitude(2.0, 10), 1.0);
        assert!((amplitude(-0.35, 10) - 0.5).abs() < 1e-12);
        assert_eq!(amplitude(0.0, 10), 0.0);
    }

    #[test]
    fn test_composite_monotone_in_significance() {
        let mut previous = composite_rtsi(0.5, 0.0, 0.5);
        for step in 1..=10 {
            let current = composite_rtsi(0.5, step as f64 / 10.0, 0.5);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_composite_bounds() {
        assert_eq!(composite_rtsi(0.0, 0.0, 0.0), 0.0);
        assert_eq!(composite_rtsi(1.0, 1.0, 1.0), 100.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let ratings = series(&["中空", "微空", "小空", "微多", "小多", "微多", "中多", "大多"]);
        let config = ScoringConfig::default();
        assert_eq!(score_series(&ratings, &config), score_series(&ratings, &config));
    }
}
