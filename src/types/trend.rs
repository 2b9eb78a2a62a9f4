use serde::{Deserialize, Serialize};
use std::fmt;

/// Trend label attached to a scoring result.
///
/// The seven ordered categories run from `StrongBear` to `StrongBull`;
/// `InsufficientData` and `CalculationError` are terminal non-trend labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StrongBear,
    ModerateBear,
    WeakBear,
    Neutral,
    WeakBull,
    ModerateBull,
    StrongBull,
    InsufficientData,
    CalculationError,
}

impl Trend {
    /// The seven trend categories, bearish to bullish.
    pub const CATEGORIES: [Trend; 7] = [
        Trend::StrongBear,
        Trend::ModerateBear,
        Trend::WeakBear,
        Trend::Neutral,
        Trend::WeakBull,
        Trend::ModerateBull,
        Trend::StrongBull,
    ];

    /// Parse from the snake_case name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strong_bear" => Some(Self::StrongBear),
            "moderate_bear" => Some(Self::ModerateBear),
            "weak_bear" => Some(Self::WeakBear),
            "neutral" => Some(Self::Neutral),
            "weak_bull" => Some(Self::WeakBull),
            "moderate_bull" => Some(Self::ModerateBull),
            "strong_bull" => Some(Self::StrongBull),
            "insufficient_data" => Some(Self::InsufficientData),
            "calculation_error" => Some(Self::CalculationError),
            _ => None,
        }
    }

    /// snake_case name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBear => "strong_bear",
            Self::ModerateBear => "moderate_bear",
            Self::WeakBear => "weak_bear",
            Self::Neutral => "neutral",
            Self::WeakBull => "weak_bull",
            Self::ModerateBull => "moderate_bull",
            Self::StrongBull => "strong_bull",
            Self::InsufficientData => "insufficient_data",
            Self::CalculationError => "calculation_error",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::WeakBull | Self::ModerateBull | Self::StrongBull)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Self::WeakBear | Self::ModerateBear | Self::StrongBear)
    }

    /// True for the seven trend categories, false for terminal labels.
    pub fn is_category(&self) -> bool {
        !matches!(self, Self::InsufficientData | Self::CalculationError)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable description of a trend category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendTerminology {
    /// Short label.
    pub short: &'static str,
    /// Detailed description with a suggested posture.
    pub detailed: &'static str,
    /// English label.
    pub english: &'static str,
    /// Minimum confidence at which the category is considered reliable.
    pub confidence_required: f64,
}

/// Risk tier derived from an RTSI value and its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    Elevated,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Elevated => "Elevated Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
        }
    }
}

/// Risk tier plus the condition that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub reason: &'static str,
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.level.label(), self.reason)
    }
}
