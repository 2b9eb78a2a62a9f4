//! Calculator facade bundling a scoring configuration with an optional
//! shared calculation counter.

use super::{batch, classifier, enhanced, ranking, scorer};
use crate::config::{EnhancedConfig, ScoringConfig};
use crate::types::{
    BatchResultSet, RankingEntry, RatingSeries, RatingTable, RtsiOutcome, ScoreSeries,
    StatisticsSummary, Trend, TrendFilter,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Number of RTSI calculations performed. Informational only.
#[derive(Debug, Default)]
pub struct CalculationCounter {
    count: AtomicU64,
}

impl CalculationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn add(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

/// RTSI calculator.
#[derive(Debug, Clone)]
pub struct RtsiCalculator {
    config: ScoringConfig,
    progress_interval: usize,
    counter: Option<Arc<CalculationCounter>>,
}

impl RtsiCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            progress_interval: 0,
            counter: None,
        }
    }

    /// Attach a counter, possibly shared with other calculators.
    pub fn with_counter(mut self, counter: Arc<CalculationCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Log batch progress every `interval` rows (0 disables it).
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Calculations performed so far, 0 without a counter.
    pub fn calculations(&self) -> u64 {
        self.counter.as_ref().map_or(0, |c| c.get())
    }

    pub fn calculate(&self, series: &RatingSeries) -> RtsiOutcome {
        self.count(1);
        scorer::score_series(series, &self.config)
    }

    pub fn calculate_scores(&self, scores: &ScoreSeries) -> RtsiOutcome {
        self.count(1);
        scorer::score_scores(scores, self.config.min_data_points)
    }

    pub fn batch_calculate(&self, table: &RatingTable) -> BatchResultSet {
        self.count(table.len() as u64);
        batch::batch_calculate(table, &self.config, self.progress_interval)
    }

    pub fn ranking(
        &self,
        results: &BatchResultSet,
        top_n: usize,
        filter: Option<TrendFilter>,
    ) -> Vec<RankingEntry> {
        ranking::ranking(results, top_n, filter)
    }

    pub fn statistics(&self, results: &BatchResultSet) -> StatisticsSummary {
        ranking::statistics(results)
    }

    pub fn classify_by_value(&self, rtsi: f64) -> Trend {
        classifier::classify_by_value(rtsi)
    }

    pub fn enhanced(
        &self,
        series: &RatingSeries,
        config: &EnhancedConfig,
    ) -> Option<enhanced::EnhancedScore> {
        self.count(1);
        enhanced::enhanced_score(series, &self.config, config)
    }

    fn count(&self, n: u64) {
        if let Some(counter) = &self.counter {
            counter.add(n);
        }
    }
}

impl Default for RtsiCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl fmt::Display for RtsiCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RtsiCalculator(calculations={}, min_points={})",
            self.calculations(),
            self.config.min_data_points
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingRow;

    #[test]
    fn test_counter_increment_and_reset() {
        let counter = CalculationCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_calculator_counts_calculations() {
        let counter = Arc::new(CalculationCounter::new());
        let calc = RtsiCalculator::default().with_counter(counter.clone());

        calc.calculate(&RatingSeries::from_symbols(["微多", "小多"]));
        calc.calculate_scores(&ScoreSeries::new(vec![1, 2, 3, 4, 5]));
        assert_eq!(counter.get(), 2);

        let table = RatingTable::new(vec![RatingRow::default(), RatingRow::default()]);
        calc.batch_calculate(&table);
        assert_eq!(calc.calculations(), 4);
    }

    #[test]
    fn test_counter_shared_between_calculators() {
        let counter = Arc::new(CalculationCounter::new());
        let a = RtsiCalculator::default().with_counter(counter.clone());
        let b = RtsiCalculator::new(ScoringConfig::default().with_min_data_points(3))
            .with_counter(counter.clone());

        a.calculate_scores(&ScoreSeries::new(vec![1, 2, 3]));
        b.calculate_scores(&ScoreSeries::new(vec![1, 2, 3]));
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_calculator_without_counter() {
        let calc = RtsiCalculator::default();
        calc.calculate_scores(&ScoreSeries::new(vec![1, 2, 3, 4, 5]));
        assert_eq!(calc.calculations(), 0);
    }

    #[test]
    fn test_calculator_matches_scorer() {
        let calc = RtsiCalculator::new(ScoringConfig::default().with_min_data_points(3));
        let scores = ScoreSeries::new(vec![2, 3, 4, 5]);
        assert_eq!(calc.calculate_scores(&scores), scorer::score_scores(&scores, 3));
        assert_eq!(calc.classify_by_value(62.0), Trend::ModerateBull);
    }

    #[test]
    fn test_display() {
        let counter = Arc::new(CalculationCounter::new());
        let calc = RtsiCalculator::default().with_counter(counter);
        calc.calculate_scores(&ScoreSeries::new(vec![1, 2, 3, 4, 5]));
        assert_eq!(
            calc.to_string(),
            "RtsiCalculator(calculations=1, min_points=5)"
        );
    }
}
