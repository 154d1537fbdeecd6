//! Danger level classification for the platform weight total.
//!
//! All threshold logic lives here. Nothing else duplicates it.

use serde::{Deserialize, Serialize};

/// Ratio thresholds against the configured item limit.
pub const WARNING_RATIO: f64 = 0.75;
pub const CRITICAL_RATIO: f64 = 0.90;
pub const SINKING_RATIO: f64 = 1.0;

/// Platform danger level, ordered from calm to catastrophic. Callers compare
/// by ordinal; `Sinking` additionally gates item generation outright.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DangerLevel {
    Safe,
    Warning,
    Critical,
    Sinking,
}

impl DangerLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Sinking => "sinking",
        }
    }
}

/// Classify a weight total against a capacity limit. Pure; boundary
/// inclusive, so `classify(limit, limit)` is exactly `Sinking`.
pub fn classify(weight: i64, limit: i64) -> (DangerLevel, f64) {
    let ratio = weight as f64 / limit.max(1) as f64;
    let level = if ratio >= SINKING_RATIO {
        DangerLevel::Sinking
    } else if ratio >= CRITICAL_RATIO {
        DangerLevel::Critical
    } else if ratio >= WARNING_RATIO {
        DangerLevel::Warning
    } else {
        DangerLevel::Safe
    };
    (level, ratio)
}
