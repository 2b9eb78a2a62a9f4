use crate::types::RatingMap;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default minimum number of valid ratings required for scoring.
pub const DEFAULT_MIN_DATA_POINTS: usize = 5;

/// Parameters of a single scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Rating symbol to score mapping.
    pub rating_map: RatingMap,
    /// Minimum number of valid (mapped) ratings (default: 5).
    pub min_data_points: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rating_map: RatingMap::default(),
            min_data_points: DEFAULT_MIN_DATA_POINTS,
        }
    }
}

impl ScoringConfig {
    pub fn with_rating_map(mut self, rating_map: RatingMap) -> Self {
        self.rating_map = rating_map;
        self
    }

    pub fn with_min_data_points(mut self, min_data_points: usize) -> Self {
        self.min_data_points = min_data_points;
        self
    }
}

/// Parameters of the enhanced RTSI post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedConfig {
    /// Enhanced scores below this value are damped by 0.8 (default: 0.4).
    pub rtsi_threshold: f64,
    /// Coefficient of variation above which scores are damped (default: 0.2).
    pub volatility_threshold: f64,
    /// Absolute 20-point slope above which scores are boosted (default: 0.6).
    pub trend_strength_threshold: f64,
    /// Apply the rating momentum factor (default: true).
    pub use_momentum_adjustment: bool,
    /// Apply volatility and trend strength factors (default: false).
    pub use_volatility_adjustment: bool,
    /// Number of most recent time keys considered (default: 60).
    pub time_window: usize,
    /// Minimum valid ratings for an enhanced score (default: 10).
    pub min_data_points: usize,
}

impl Default for EnhancedConfig {
    fn default() -> Self {
        Self {
            rtsi_threshold: 0.4,
            volatility_threshold: 0.2,
            trend_strength_threshold: 0.6,
            use_momentum_adjustment: true,
            use_volatility_adjustment: false,
            time_window: 60,
            min_data_points: 10,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring parameters.
    pub scoring: ScoringConfig,
    /// Enhanced scoring parameters.
    pub enhanced: EnhancedConfig,
    /// Log batch progress every N rows (0 = never).
    pub progress_interval: usize,
    /// Default ranking length.
    pub top_n: usize,
    /// Batch table to score (binary only).
    pub table_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            enhanced: EnhancedConfig::default(),
            progress_interval: 1000,
            top_n: 50,
            table_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `RTSI_RATING_MAP_PATH` silently selects the built-in rating map;
    /// an unreadable or invalid file is logged and also falls back to it.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rating_map = match env::var("RTSI_RATING_MAP_PATH") {
            Ok(path) => match RatingMap::from_json_file(&path) {
                Ok(map) => {
                    debug!("Loaded rating map from {} ({} scored symbols)", path, map.scored_len());
                    map
                }
                Err(e) => {
                    warn!("Failed to load rating map from {}: {}, using built-in map", path, e);
                    RatingMap::default()
                }
            },
            Err(_) => RatingMap::default(),
        };

        let min_data_points = parse_env("RTSI_MIN_DATA_POINTS", DEFAULT_MIN_DATA_POINTS);

        let enhanced = EnhancedConfig {
            rtsi_threshold: parse_env("RTSI_ENHANCED_THRESHOLD", defaults.enhanced.rtsi_threshold),
            volatility_threshold: parse_env(
                "RTSI_VOLATILITY_THRESHOLD",
                defaults.enhanced.volatility_threshold,
            ),
            trend_strength_threshold: parse_env(
                "RTSI_TREND_STRENGTH_THRESHOLD",
                defaults.enhanced.trend_strength_threshold,
            ),
            use_momentum_adjustment: parse_env(
                "RTSI_USE_MOMENTUM_ADJUSTMENT",
                defaults.enhanced.use_momentum_adjustment,
            ),
            use_volatility_adjustment: parse_env(
                "RTSI_USE_VOLATILITY_ADJUSTMENT",
                defaults.enhanced.use_volatility_adjustment,
            ),
            time_window: parse_env("RTSI_TIME_WINDOW", defaults.enhanced.time_window),
            min_data_points: parse_env(
                "RTSI_ENHANCED_MIN_DATA_POINTS",
                defaults.enhanced.min_data_points,
            ),
        };

        Self {
            scoring: ScoringConfig {
                rating_map,
                min_data_points,
            },
            enhanced,
            progress_interval: parse_env("RTSI_PROGRESS_INTERVAL", defaults.progress_interval),
            top_n: parse_env("RTSI_TOP_N", defaults.top_n),
            table_path: env::var("RTSI_TABLE_PATH").ok().map(PathBuf::from),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when unset or invalid.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid value for {}: {:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_config_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.min_data_points, 5);
        assert_eq!(config.rating_map, RatingMap::default());
    }

    #[test]
    fn test_scoring_config_builders() {
        let map = RatingMap::from_json_str(r#"{"up": 7, "down": 0}"#).unwrap();
        let config = ScoringConfig::default()
            .with_rating_map(map.clone())
            .with_min_data_points(3);
        assert_eq!(config.min_data_points, 3);
        assert_eq!(config.rating_map, map);
    }

    #[test]
    fn test_enhanced_config_defaults() {
        let config = EnhancedConfig::default();
        assert_eq!(config.rtsi_threshold, 0.4);
        assert_eq!(config.volatility_threshold, 0.2);
        assert_eq!(config.trend_strength_threshold, 0.6);
        assert!(config.use_momentum_adjustment);
        assert!(!config.use_volatility_adjustment);
        assert_eq!(config.time_window, 60);
        assert_eq!(config.min_data_points, 10);
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.progress_interval, 1000);
        assert_eq!(config.top_n, 50);
        assert!(config.table_path.is_none());
    }

    #[test]
    fn test_parse_env_fallbacks() {
        assert_eq!(parse_env("RTSI_TEST_UNSET_VARIABLE", 7usize), 7);

        env::set_var("RTSI_TEST_INVALID_NUMBER", "not-a-number");
        assert_eq!(parse_env("RTSI_TEST_INVALID_NUMBER", 3usize), 3);

        env::set_var("RTSI_TEST_VALID_NUMBER", " 12 ");
        assert_eq!(parse_env("RTSI_TEST_VALID_NUMBER", 3usize), 12);
    }
}
