//! Metric definition types
//!
//! Definitions are compile-time constants owned by the registry in
//! `cvss-core`; these types only describe their shape.

use serde::Serialize;
use std::fmt;

/// Value code meaning "Not Defined" for every optional metric.
pub const NOT_DEFINED: &str = "X";

/// Metric group a definition belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricGroupKind {
    /// Mandatory intrinsic metrics (both versions)
    Base,
    /// v3.1 Temporal metrics
    Temporal,
    /// v4.0 Threat metrics
    Threat,
    /// Environmental (modified base + security requirements)
    Environmental,
    /// v4.0 Supplemental metrics (never affect the score)
    Supplemental,
}

impl MetricGroupKind {
    /// Display name of the group
    pub fn name(&self) -> &'static str {
        match self {
            MetricGroupKind::Base => "Base",
            MetricGroupKind::Temporal => "Temporal",
            MetricGroupKind::Threat => "Threat",
            MetricGroupKind::Environmental => "Environmental",
            MetricGroupKind::Supplemental => "Supplemental",
        }
    }
}

impl fmt::Display for MetricGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static definition of a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDefinition {
    /// Short code used on the wire (e.g. `AV`)
    pub code: &'static str,
    /// Long name (e.g. `Attack Vector`)
    pub name: &'static str,
    /// Allowed value codes, in the standard's display order
    pub allowed_values: &'static [&'static str],
    /// `Some("X")` for optional metrics, `None` for mandatory ones
    pub not_defined: Option<&'static str>,
}

impl MetricDefinition {
    /// Mandatory metric: every vector must carry it.
    pub const fn mandatory(
        code: &'static str,
        name: &'static str,
        allowed_values: &'static [&'static str],
    ) -> Self {
        Self {
            code,
            name,
            allowed_values,
            not_defined: None,
        }
    }

    /// Optional metric: absent means "Not Defined".
    ///
    /// `allowed_values` must list `X` itself.
    pub const fn optional(
        code: &'static str,
        name: &'static str,
        allowed_values: &'static [&'static str],
    ) -> Self {
        Self {
            code,
            name,
            allowed_values,
            not_defined: Some(NOT_DEFINED),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.not_defined.is_some()
    }

    /// Check a value code against the allowed set
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.contains(&value)
    }

    /// Whether `value` is this metric's "Not Defined" default
    pub fn is_not_defined(&self, value: &str) -> bool {
        self.not_defined == Some(value)
    }
}

/// Ordered group of metric definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricGroup {
    pub kind: MetricGroupKind,
    pub metrics: &'static [MetricDefinition],
}

impl MetricGroup {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Find a metric of this group by code
    pub fn find(&self, code: &str) -> Option<&'static MetricDefinition> {
        self.metrics.iter().find(|m| m.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AV: MetricDefinition =
        MetricDefinition::mandatory("AV", "Attack Vector", &["N", "A", "L", "P"]);
    const E: MetricDefinition =
        MetricDefinition::optional("E", "Exploit Maturity", &["X", "A", "P", "U"]);

    #[test]
    fn test_mandatory_metric() {
        assert!(!AV.is_optional());
        assert!(AV.allows("N"));
        assert!(!AV.allows("X"));
        assert!(!AV.is_not_defined("X"));
    }

    #[test]
    fn test_optional_metric() {
        assert!(E.is_optional());
        assert!(E.allows("X"));
        assert!(E.is_not_defined("X"));
        assert!(!E.is_not_defined("A"));
    }

    #[test]
    fn test_group_find() {
        static METRICS: [MetricDefinition; 2] = [AV, E];
        let group = MetricGroup {
            kind: MetricGroupKind::Base,
            metrics: &METRICS,
        };
        assert_eq!(group.find("E").map(|m| m.name), Some("Exploit Maturity"));
        assert!(group.find("MAV").is_none());
        assert_eq!(group.name(), "Base");
    }
}
