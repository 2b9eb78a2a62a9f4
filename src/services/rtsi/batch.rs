//! Batch scoring across a table of entities.

use super::scorer::score_series;
use crate::config::ScoringConfig;
use crate::types::{BatchResultSet, EntityResult, RatingRow, RatingTable};
use chrono::Utc;
use tracing::{info, warn};

/// Name used when a row has none.
pub const DEFAULT_NAME: &str = "Unknown";
/// Industry used when a row has none.
pub const DEFAULT_INDUSTRY: &str = "Unclassified";

/// Identifier for a row, falling back to its position.
pub fn row_code(row: &RatingRow, index: usize) -> String {
    row.code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("ROW_{}", index))
}

/// Score every row of the table.
///
/// Each row yields exactly one result (scored, insufficient data or calculation
/// error). A table without time-key columns yields an empty set.
/// `progress_interval` controls progress logging (0 disables it).
pub fn batch_calculate(
    table: &RatingTable,
    config: &ScoringConfig,
    progress_interval: usize,
) -> BatchResultSet {
    let mut results = BatchResultSet::new();
    if table.is_empty() {
        return results;
    }

    let time_keys = table.time_keys();
    if time_keys.is_empty() {
        warn!("No time-key columns found in {} rows, nothing to score", table.len());
        return results;
    }

    let started = Utc::now();
    info!(
        "Starting RTSI batch: {} entities x {} time keys ({} .. {})",
        table.len(),
        time_keys.len(),
        time_keys[0],
        time_keys[time_keys.len() - 1]
    );

    for (idx, row) in table.rows.iter().enumerate() {
        let code = row_code(row, idx);
        let outcome = score_series(&row.series(&time_keys), config);

        if let Some(error) = outcome.error() {
            warn!("RTSI calculation failed for {}: {}", code, error);
        }

        let result = EntityResult {
            code: code.clone(),
            name: row.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
            industry: row
                .industry
                .clone()
                .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string()),
            outcome,
        };

        if results.insert(result).is_some() {
            warn!("Duplicate entity code {}, keeping the later row", code);
        }

        if progress_interval > 0 && (idx + 1) % progress_interval == 0 {
            info!("Processed {} / {} entities", idx + 1, table.len());
        }
    }

    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    info!(
        "RTSI batch complete: {} results in {} ms",
        results.len(),
        elapsed_ms
    );

    results
}
