//! Rating symbol to ordinal score encoding.

use crate::types::{RatingMap, RatingSeries, ScoreSeries};

/// Map each rating to its score, dropping unscored and unknown symbols.
/// Order is preserved.
pub fn encode(series: &RatingSeries, map: &RatingMap) -> ScoreSeries {
    ScoreSeries::new(
        series
            .points()
            .iter()
            .filter_map(|point| map.score(&point.symbol))
            .collect(),
    )
}
