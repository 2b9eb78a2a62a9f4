//! RTSI - Rating Trend Strength Index scoring for time-indexed analyst ratings

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RtsiError};
pub use services::rtsi::{RtsiCalculator, CalculationCounter};
pub use types::*;
