//! Score and qualitative severity types
//!
//! Scores are derived values: they are never stored apart from the vector
//! they were computed from. The numeric value is a fixed-point `Decimal`
//! with one decimal place so that `9.8` is exactly `9.8` on every platform.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest representable score, in tenths
pub const MAX_TENTHS: u32 = 100;

/// Qualitative severity rating shared by v3.1 and v4.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// 0.0
    None,
    /// 0.1 – 3.9
    Low,
    /// 4.0 – 6.9
    Medium,
    /// 7.0 – 8.9
    High,
    /// 9.0 – 10.0
    Critical,
}

impl Severity {
    /// Rating for a score expressed in tenths (0..=100)
    pub fn from_tenths(tenths: u32) -> Self {
        match tenths {
            0 => Severity::None,
            1..=39 => Severity::Low,
            40..=69 => Severity::Medium,
            70..=89 => Severity::High,
            _ => Severity::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A computed CVSS score with its severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    /// Score value, 0.0–10.0, one decimal place
    pub value: Decimal,
    /// Severity derived from `value`
    pub severity: Severity,
}

impl Score {
    /// Build a score from an integer number of tenths.
    ///
    /// Values above 100 are clamped to 10.0.
    pub fn from_tenths(tenths: u32) -> Self {
        let tenths = tenths.min(MAX_TENTHS);
        Self {
            value: Decimal::new(i64::from(tenths), 1),
            severity: Severity::from_tenths(tenths),
        }
    }

    /// The 0.0 score
    pub fn zero() -> Self {
        Self::from_tenths(0)
    }

    /// Score in tenths (e.g. 98 for 9.8)
    pub fn tenths(&self) -> u32 {
        (self.value * Decimal::TEN)
            .round()
            .to_u32()
            .unwrap_or(0)
            .min(MAX_TENTHS)
    }

    /// Lossy conversion for display widgets that need a float
    pub fn as_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(0.0)
    }

    /// Single-decimal string form (`"9.8"`, `"10.0"`, `"0.0"`)
    pub fn formatted(&self) -> String {
        format!("{:.1}", self.value.round_dp(1))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}


// ── Property-Based Tests ────────────────────────────────────────────

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_tenths_survive_formatting(tenths in 0u32..=100) {
            let score = Score::from_tenths(tenths);
            let reparsed = Decimal::from_str_exact(&score.formatted()).unwrap();
            prop_assert_eq!(reparsed, score.value);
            prop_assert_eq!(score.tenths(), tenths);
        }

        #[test]
        fn prop_severity_is_monotonic(a in 0u32..=100, b in 0u32..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Severity::from_tenths(lo) <= Severity::from_tenths(hi));
        }
    }
}
