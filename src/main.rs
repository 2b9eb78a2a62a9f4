use anyhow::Context;
use rtsi::config::Config;
use rtsi::services::rtsi::{batch_enhanced, CalculationCounter, RtsiCalculator};
use rtsi::types::RatingTable;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtsi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let table_path = config
        .table_path
        .clone()
        .context("RTSI_TABLE_PATH is not set")?;

    let table = RatingTable::from_json_file(&table_path)
        .with_context(|| format!("failed to load rating table from {}", table_path.display()))?;
    info!(
        "Loaded {} rows from {} ({} time keys)",
        table.len(),
        table_path.display(),
        table.time_keys().len()
    );

    let counter = Arc::new(CalculationCounter::new());
    let calculator = RtsiCalculator::new(config.scoring.clone())
        .with_progress_interval(config.progress_interval)
        .with_counter(counter.clone());

    let results = calculator.batch_calculate(&table);
    let summary = calculator.statistics(&results);
    match &summary.moments {
        Some(m) => info!(
            "Statistics: {} / {} valid ({:.1}%), mean {:.2}, median {:.2}, std {:.2}, range {:.2} .. {:.2}",
            summary.valid, summary.total, m.success_rate_pct, m.mean, m.median, m.std_dev, m.min, m.max
        ),
        None => info!("Statistics: 0 / {} valid", summary.total),
    }
    for (trend, count) in &summary.trend_distribution {
        debug!("  {}: {}", trend, count);
    }

    let ranking = calculator.ranking(&results, config.top_n, None);
    for (rank, entry) in ranking.iter().enumerate() {
        info!(
            "#{:<3} {} {} rtsi={:.2} ({})",
            rank + 1,
            entry.code,
            entry.name,
            entry.rtsi,
            entry.trend
        );
    }

    let enhanced = batch_enhanced(&table, calculator.config(), &config.enhanced);
    info!("Enhanced RTSI computed for {} entities", enhanced.len());

    info!("{}", calculator);
    println!("{}", serde_json::to_string_pretty(&ranking)?);

    Ok(())
}
