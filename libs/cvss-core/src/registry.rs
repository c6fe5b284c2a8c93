//! Metric Registry: static, versioned metric definitions
//!
//! The order of groups and of metrics inside each group is the canonical
//! wire order of the standard and drives serialization. Definitions are
//! compiled in and never mutated.

use cvss_types::errors::CvssError;
use cvss_types::metric::{MetricDefinition, MetricGroup, MetricGroupKind};
use cvss_types::version::CvssVersion;

// ---------------------------------------------------------------------------
// CVSS v3.1
// ---------------------------------------------------------------------------

static V3_BASE: [MetricDefinition; 8] = [
    MetricDefinition::mandatory("AV", "Attack Vector", &["N", "A", "L", "P"]),
    MetricDefinition::mandatory("AC", "Attack Complexity", &["L", "H"]),
    MetricDefinition::mandatory("PR", "Privileges Required", &["N", "L", "H"]),
    MetricDefinition::mandatory("UI", "User Interaction", &["N", "R"]),
    MetricDefinition::mandatory("S", "Scope", &["U", "C"]),
    MetricDefinition::mandatory("C", "Confidentiality", &["H", "L", "N"]),
    MetricDefinition::mandatory("I", "Integrity", &["H", "L", "N"]),
    MetricDefinition::mandatory("A", "Availability", &["H", "L", "N"]),
];

static V3_TEMPORAL: [MetricDefinition; 3] = [
    MetricDefinition::optional("E", "Exploit Code Maturity", &["X", "H", "F", "P", "U"]),
    MetricDefinition::optional("RL", "Remediation Level", &["X", "U", "W", "T", "O"]),
    MetricDefinition::optional("RC", "Report Confidence", &["X", "C", "R", "U"]),
];

static V3_ENVIRONMENTAL: [MetricDefinition; 11] = [
    MetricDefinition::optional("CR", "Confidentiality Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("IR", "Integrity Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("AR", "Availability Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("MAV", "Modified Attack Vector", &["X", "N", "A", "L", "P"]),
    MetricDefinition::optional("MAC", "Modified Attack Complexity", &["X", "L", "H"]),
    MetricDefinition::optional("MPR", "Modified Privileges Required", &["X", "N", "L", "H"]),
    MetricDefinition::optional("MUI", "Modified User Interaction", &["X", "N", "R"]),
    MetricDefinition::optional("MS", "Modified Scope", &["X", "U", "C"]),
    MetricDefinition::optional("MC", "Modified Confidentiality", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MI", "Modified Integrity", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MA", "Modified Availability", &["X", "H", "L", "N"]),
];

static V3_GROUPS: [MetricGroup; 3] = [
    MetricGroup {
        kind: MetricGroupKind::Base,
        metrics: &V3_BASE,
    },
    MetricGroup {
        kind: MetricGroupKind::Temporal,
        metrics: &V3_TEMPORAL,
    },
    MetricGroup {
        kind: MetricGroupKind::Environmental,
        metrics: &V3_ENVIRONMENTAL,
    },
];

// ---------------------------------------------------------------------------
// CVSS v4.0
// ---------------------------------------------------------------------------

static V4_BASE: [MetricDefinition; 11] = [
    MetricDefinition::mandatory("AV", "Attack Vector", &["N", "A", "L", "P"]),
    MetricDefinition::mandatory("AC", "Attack Complexity", &["L", "H"]),
    MetricDefinition::mandatory("AT", "Attack Requirements", &["N", "P"]),
    MetricDefinition::mandatory("PR", "Privileges Required", &["N", "L", "H"]),
    MetricDefinition::mandatory("UI", "User Interaction", &["N", "P", "A"]),
    MetricDefinition::mandatory("VC", "Vulnerable System Confidentiality", &["H", "L", "N"]),
    MetricDefinition::mandatory("VI", "Vulnerable System Integrity", &["H", "L", "N"]),
    MetricDefinition::mandatory("VA", "Vulnerable System Availability", &["H", "L", "N"]),
    MetricDefinition::mandatory("SC", "Subsequent System Confidentiality", &["H", "L", "N"]),
    MetricDefinition::mandatory("SI", "Subsequent System Integrity", &["H", "L", "N"]),
    MetricDefinition::mandatory("SA", "Subsequent System Availability", &["H", "L", "N"]),
];

static V4_THREAT: [MetricDefinition; 1] = [MetricDefinition::optional(
    "E",
    "Exploit Maturity",
    &["X", "A", "P", "U"],
)];

static V4_ENVIRONMENTAL: [MetricDefinition; 14] = [
    MetricDefinition::optional("CR", "Confidentiality Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("IR", "Integrity Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("AR", "Availability Requirement", &["X", "H", "M", "L"]),
    MetricDefinition::optional("MAV", "Modified Attack Vector", &["X", "N", "A", "L", "P"]),
    MetricDefinition::optional("MAC", "Modified Attack Complexity", &["X", "L", "H"]),
    MetricDefinition::optional("MAT", "Modified Attack Requirements", &["X", "N", "P"]),
    MetricDefinition::optional("MPR", "Modified Privileges Required", &["X", "N", "L", "H"]),
    MetricDefinition::optional("MUI", "Modified User Interaction", &["X", "N", "P", "A"]),
    MetricDefinition::optional("MVC", "Modified Vulnerable System Confidentiality", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MVI", "Modified Vulnerable System Integrity", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MVA", "Modified Vulnerable System Availability", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MSC", "Modified Subsequent System Confidentiality", &["X", "H", "L", "N"]),
    MetricDefinition::optional("MSI", "Modified Subsequent System Integrity", &["X", "S", "H", "L", "N"]),
    MetricDefinition::optional("MSA", "Modified Subsequent System Availability", &["X", "S", "H", "L", "N"]),
];

static V4_SUPPLEMENTAL: [MetricDefinition; 6] = [
    MetricDefinition::optional("S", "Safety", &["X", "N", "P"]),
    MetricDefinition::optional("AU", "Automatable", &["X", "N", "Y"]),
    MetricDefinition::optional("R", "Recovery", &["X", "A", "U", "I"]),
    MetricDefinition::optional("V", "Value Density", &["X", "D", "C"]),
    MetricDefinition::optional("RE", "Vulnerability Response Effort", &["X", "L", "M", "H"]),
    MetricDefinition::optional("U", "Provider Urgency", &["X", "Clear", "Green", "Amber", "Red"]),
];

static V4_GROUPS: [MetricGroup; 4] = [
    MetricGroup {
        kind: MetricGroupKind::Base,
        metrics: &V4_BASE,
    },
    MetricGroup {
        kind: MetricGroupKind::Threat,
        metrics: &V4_THREAT,
    },
    MetricGroup {
        kind: MetricGroupKind::Environmental,
        metrics: &V4_ENVIRONMENTAL,
    },
    MetricGroup {
        kind: MetricGroupKind::Supplemental,
        metrics: &V4_SUPPLEMENTAL,
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Metric groups of a version, in canonical order.
pub fn metrics_for(version: CvssVersion) -> &'static [MetricGroup] {
    match version {
        CvssVersion::V3 => &V3_GROUPS,
        CvssVersion::V4 => &V4_GROUPS,
    }
}

/// Same as [`metrics_for`] for a version given as text (`"3.1"`, `"V4"`, ...).
pub fn metrics_for_label(version: &str) -> Result<&'static [MetricGroup], CvssError> {
    Ok(metrics_for(version.parse()?))
}

/// Mandatory Base metrics of a version, in canonical order.
pub fn base_metrics(version: CvssVersion) -> &'static [MetricDefinition] {
    match version {
        CvssVersion::V3 => &V3_BASE,
        CvssVersion::V4 => &V4_BASE,
    }
}

/// Every metric of a version, in canonical wire order.
pub fn all_metrics(version: CvssVersion) -> impl Iterator<Item = &'static MetricDefinition> {
    metrics_for(version).iter().flat_map(|g| g.metrics.iter())
}

/// Look up a metric definition by code.
pub fn find_metric(version: CvssVersion, code: &str) -> Option<&'static MetricDefinition> {
    all_metrics(version).find(|m| m.code == code)
}

/// Group a metric code belongs to.
pub fn group_of(version: CvssVersion, code: &str) -> Option<MetricGroupKind> {
    metrics_for(version)
        .iter()
        .find(|g| g.find(code).is_some())
        .map(|g| g.kind)
}
