//! Ranking and aggregate statistics over batch results.

use crate::types::{BatchResultSet, RankingEntry, RtsiMoments, StatisticsSummary, TrendFilter};
use std::collections::BTreeMap;

/// Top `top_n` entries by RTSI, descending.
///
/// Entries with `rtsi <= 0` (insufficient data, calculation errors, flat series)
/// are excluded. Ties keep input order.
pub fn ranking(
    results: &BatchResultSet,
    top_n: usize,
    filter: Option<TrendFilter>,
) -> Vec<RankingEntry> {
    let mut ranked: Vec<RankingEntry> = results
        .iter()
        .filter(|entry| entry.outcome.is_valid())
        .filter(|entry| filter.map_or(true, |f| f.matches(entry.outcome.trend())))
        .map(|entry| RankingEntry {
            code: entry.code.clone(),
            name: entry.name.clone(),
            rtsi: entry.outcome.rtsi(),
            trend: entry.outcome.trend(),
        })
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| b.rtsi.total_cmp(&a.rtsi));
    ranked.truncate(top_n);
    ranked
}

/// Aggregate statistics over a result set.
///
/// Moments are computed over entries with `rtsi > 0`; the trend distribution
/// counts every entry, including terminal labels.
pub fn statistics(results: &BatchResultSet) -> StatisticsSummary {
    if results.is_empty() {
        return StatisticsSummary::default();
    }

    let total = results.len();
    let mut valid: Vec<f64> = results
        .iter()
        .map(|entry| entry.outcome.rtsi())
        .filter(|&rtsi| rtsi > 0.0)
        .collect();

    if valid.is_empty() {
        return StatisticsSummary {
            total,
            valid: 0,
            moments: None,
            trend_distribution: BTreeMap::new(),
        };
    }

    let mut trend_distribution = BTreeMap::new();
    for entry in results.iter() {
        *trend_distribution.entry(entry.outcome.trend()).or_insert(0) += 1;
    }

    let count = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / count;
    let std_dev = (valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count).sqrt();

    valid.sort_by(|a, b| a.total_cmp(b));
    let mid = valid.len() / 2;
    let median = if valid.len() % 2 == 0 {
        (valid[mid - 1] + valid[mid]) / 2.0
    } else {
        valid[mid]
    };

    StatisticsSummary {
        total,
        valid: valid.len(),
        moments: Some(RtsiMoments {
            success_rate_pct: count / total as f64 * 100.0,
            mean,
            median,
            std_dev,
            max: valid[valid.len() - 1],
            min: valid[0],
        }),
        trend_distribution,
    }
}
