//! Rating Trend Strength Index.
//!
//! Pipeline: [`encoder`] maps rating symbols to ordinal scores, [`regression`]
//! fits a least-squares line, [`scorer`] combines fit quality, significance and
//! amplitude into a 0-100 index, and [`classifier`] labels the trend.
//! [`batch`] and [`ranking`] lift this to tables of entities.

pub mod batch;
pub mod calculator;
pub mod classifier;
pub mod encoder;
pub mod enhanced;
pub mod ranking;
pub mod regression;
pub mod scorer;

pub use batch::batch_calculate;
pub use calculator::{CalculationCounter, RtsiCalculator};
pub use classifier::{classify_by_value, classify_trend, risk_level, terminology, terminology_by_name};
pub use encoder::encode;
pub use enhanced::{batch_enhanced, enhanced_score, EnhancedScore};
pub use ranking::{ranking, statistics};
pub use regression::{linear_regression, LinearFit};
pub use scorer::{score_scores, score_series};
