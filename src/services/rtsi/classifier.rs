//! Trend classification, terminology and risk tiers.

use crate::types::{RiskAssessment, RiskLevel, Trend, TrendTerminology};

/// Classify a trend from regression slope and significance.
///
/// Rules are evaluated in order and the first match wins.
pub fn classify_trend(slope: f64, significance: f64) -> Trend {
    if significance < 0.3 {
        return Trend::Neutral;
    }

    if slope > 0.15 && significance > 0.7 {
        Trend::StrongBull
    } else if slope > 0.08 && significance > 0.5 {
        Trend::ModerateBull
    } else if slope > 0.03 {
        Trend::WeakBull
    } else if slope < -0.15 && significance > 0.7 {
        Trend::StrongBear
    } else if slope < -0.08 && significance > 0.5 {
        Trend::ModerateBear
    } else if slope < -0.03 {
        Trend::WeakBear
    } else {
        Trend::Neutral
    }
}

/// Classify a trend from a finished RTSI value.
///
/// Brackets are closed below and open above. Values outside 0-100 land in the
/// extremal brackets; NaN falls through to `StrongBear`.
pub fn classify_by_value(rtsi: f64) -> Trend {
    match rtsi {
        v if v >= 75.0 => Trend::StrongBull,
        v if v >= 60.0 => Trend::ModerateBull,
        v if v >= 50.0 => Trend::WeakBull,
        v if v >= 40.0 => Trend::Neutral,
        v if v >= 30.0 => Trend::WeakBear,
        v if v >= 20.0 => Trend::ModerateBear,
        _ => Trend::StrongBear,
    }
}

const UNKNOWN_TERMINOLOGY: TrendTerminology = TrendTerminology {
    short: "未知趋势",
    detailed: "趋势方向不明确，建议谨慎操作",
    english: "Unknown Trend",
    confidence_required: 0.5,
};

/// Terminology for a trend. Non-category labels get the "unknown" entry.
pub fn terminology(trend: Trend) -> TrendTerminology {
    match trend {
        Trend::StrongBull => TrendTerminology {
            short: "强势多头",
            detailed: "强势多头趋势，技术面极度乐观，建议积极配置",
            english: "Strong Bullish Trend",
            confidence_required: 0.7,
        },
        Trend::ModerateBull => TrendTerminology {
            short: "温和多头",
            detailed: "温和多头趋势，上升动能充足，适合中线持有",
            english: "Moderate Bullish Trend",
            confidence_required: 0.5,
        },
        Trend::WeakBull => TrendTerminology {
            short: "弱势多头",
            detailed: "弱势多头格局，上升空间有限，谨慎乐观",
            english: "Weak Bullish Bias",
            confidence_required: 0.4,
        },
        Trend::Neutral => TrendTerminology {
            short: "横盘整理",
            detailed: "横盘整理格局，方向选择待定，观望为主",
            english: "Sideways Consolidation",
            confidence_required: 0.3,
        },
        Trend::WeakBear => TrendTerminology {
            short: "弱势空头",
            detailed: "弱势空头格局，下跌空间有限，适度防御",
            english: "Weak Bearish Bias",
            confidence_required: 0.4,
        },
        Trend::ModerateBear => TrendTerminology {
            short: "温和空头",
            detailed: "温和空头趋势，下跌动能充足，建议减仓",
            english: "Moderate Bearish Trend",
            confidence_required: 0.5,
        },
        Trend::StrongBear => TrendTerminology {
            short: "强势空头",
            detailed: "强势空头趋势，技术面极度悲观，严格风控",
            english: "Strong Bearish Trend",
            confidence_required: 0.7,
        },
        Trend::InsufficientData | Trend::CalculationError => UNKNOWN_TERMINOLOGY,
    }
}

/// Terminology looked up by trend name, with the "unknown" fallback.
pub fn terminology_by_name(name: &str) -> TrendTerminology {
    Trend::from_str(name)
        .map(terminology)
        .unwrap_or(UNKNOWN_TERMINOLOGY)
}

/// Risk tier for an RTSI value and its confidence.
pub fn risk_level(rtsi: f64, confidence: f64) -> RiskAssessment {
    let (level, reason) = if rtsi >= 75.0 && confidence >= 0.7 {
        (RiskLevel::VeryLow, "strong trend confirmed")
    } else if rtsi >= 75.0 && confidence >= 0.4 {
        (RiskLevel::Medium, "strong trend awaiting confirmation")
    } else if rtsi >= 60.0 && confidence >= 0.5 {
        (RiskLevel::Low, "moderate uptrend")
    } else if rtsi >= 50.0 && confidence >= 0.4 {
        (RiskLevel::Medium, "weak bullish bias")
    } else if rtsi >= 40.0 {
        (RiskLevel::Medium, "neutral range")
    } else if rtsi >= 30.0 {
        (RiskLevel::Elevated, "weak bearish bias")
    } else if rtsi >= 20.0 && confidence >= 0.5 {
        (RiskLevel::High, "moderate downtrend")
    } else if rtsi < 20.0 && confidence >= 0.7 {
        (RiskLevel::VeryHigh, "strong downtrend confirmed")
    } else {
        (RiskLevel::High, "unconfirmed")
    };

    RiskAssessment { level, reason }
}
