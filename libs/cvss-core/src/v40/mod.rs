//! CVSS v4.0 calculator
//!
//! Scores via the macrovector method: the vector's macrovector gives a
//! table score, which is then lowered by how far the vector sits from the
//! highest-severity vector of its class, interpolated against the scores
//! of the next lower macrovectors.
//!
//! # Rounding
//! The interpolated score is rounded half-up to one decimal on
//! `round(x * 100_000)` as an integer, so float noise such as
//! `8.549999999999999` still rounds to `8.6`.

pub mod macrovector;
pub mod tables;

use cvss_types::errors::{CvssError, ParseError};
use cvss_types::score::Score;
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use tracing::error;

use crate::registry;

pub use macrovector::{
    effective, macro_vector, nomenclature, severity_breakdown, EqDimension, Level, MacroVector,
    Nomenclature,
};

/// Impact metrics; all None forces a 0.0 score.
const IMPACT: [&str; 6] = ["VC", "VI", "VA", "SC", "SI", "SA"];

/// Metrics taking part in severity distances, in table order.
const DISTANCE_METRICS: [&str; 15] = [
    "AV", "PR", "UI", "AC", "AT", "VC", "VI", "VA", "SC", "SI", "SA", "CR", "IR", "AR", "E",
];

// Indices into DISTANCE_METRICS
const AV: usize = 0;
const PR: usize = 1;
const UI: usize = 2;
const AC: usize = 3;
const AT: usize = 4;
const VC: usize = 5;
const VI: usize = 6;
const VA: usize = 7;
const SC: usize = 8;
const SI: usize = 9;
const SA: usize = 10;
const CR: usize = 11;
const IR: usize = 12;
const AR: usize = 13;

type Levels = [f64; DISTANCE_METRICS.len()];

/// Compute the v4.0 score of validated selections.
pub fn compute(selections: &Selections) -> Result<Score, CvssError> {
    ensure_base(selections)?;

    if IMPACT.iter().all(|code| effective(selections, code) == "N") {
        return Ok(Score::zero());
    }

    let mv = MacroVector::classify(selections)?;
    let raw = interpolate(selections, &mv).map_err(|err| {
        if let CvssError::InternalTableMiss { macro_vector } = &err {
            error!(%macro_vector, "no table entry for macrovector");
        }
        err
    })?;
    Ok(Score::from_tenths(round_half_up(raw)))
}

fn interpolate(selections: &Selections, mv: &MacroVector) -> Result<f64, CvssError> {
    let miss = || CvssError::InternalTableMiss {
        macro_vector: mv.to_string(),
    };
    let value = tables::lookup(&mv.to_string()).ok_or_else(miss)?;
    let lower = |by: [u8; 6]| tables::lookup(&mv.shifted(by).to_string());

    let lower_eq1 = lower([1, 0, 0, 0, 0, 0]);
    let lower_eq2 = lower([0, 1, 0, 0, 0, 0]);
    let lower_eq3_eq6 = match (mv.eq3, mv.eq6) {
        (0, 1) | (1, 1) => lower([0, 0, 1, 0, 0, 0]),
        (1, 0) => lower([0, 0, 0, 0, 0, 1]),
        (0, 0) => {
            let left = lower([0, 0, 0, 0, 0, 1]);
            let right = lower([0, 0, 1, 0, 0, 0]);
            left.zip(right).map(|(l, r)| l.max(r))
        }
        _ => lower([0, 0, 1, 0, 0, 1]),
    };
    let lower_eq4 = lower([0, 0, 0, 1, 0, 0]);
    let lower_eq5 = lower([0, 0, 0, 0, 1, 0]);

    let current = effective_levels(selections)?;
    let distance = max_vector_distance(&current, mv)?.ok_or_else(miss)?;

    let eq1_distance = distance[AV] + distance[PR] + distance[UI];
    let eq2_distance = distance[AC] + distance[AT];
    let eq3_eq6_distance = distance[VC]
        + distance[VI]
        + distance[VA]
        + distance[CR]
        + distance[IR]
        + distance[AR];
    let eq4_distance = distance[SC] + distance[SI] + distance[SA];

    let max_eq1 = tables::max_severity_eq1(mv.eq1).ok_or_else(miss)?;
    let max_eq2 = tables::max_severity_eq2(mv.eq2).ok_or_else(miss)?;
    let max_eq3_eq6 = tables::max_severity_eq3_eq6(mv.eq3, mv.eq6).ok_or_else(miss)?;
    let max_eq4 = tables::max_severity_eq4(mv.eq4).ok_or_else(miss)?;

    // (score of lower macrovector, proportion of the class already descended)
    let steps = [
        (lower_eq1, eq1_distance / (f64::from(max_eq1) * tables::STEP)),
        (lower_eq2, eq2_distance / (f64::from(max_eq2) * tables::STEP)),
        (lower_eq3_eq6, eq3_eq6_distance / (f64::from(max_eq3_eq6) * tables::STEP)),
        (lower_eq4, eq4_distance / (f64::from(max_eq4) * tables::STEP)),
        // EQ5 has a single vector per class
        (lower_eq5, 0.0),
    ];

    let mut count = 0u32;
    let mut total = 0.0;
    for (lower, proportion) in steps {
        if let Some(lower) = lower {
            count += 1;
            total += (value - lower) * proportion;
        }
    }
    let mean = if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    };

    Ok((value - mean).clamp(0.0, 10.0))
}

/// Distance from the first highest-severity vector of the class that the
/// current vector does not exceed.
fn max_vector_distance(current: &Levels, mv: &MacroVector) -> Result<Option<Levels>, CvssError> {
    for &eq1 in tables::max_composed_eq1(mv.eq1) {
        for &eq2 in tables::max_composed_eq2(mv.eq2) {
            for &eq3_eq6 in tables::max_composed_eq3_eq6(mv.eq3, mv.eq6) {
                for &eq4 in tables::max_composed_eq4(mv.eq4) {
                    for &eq5 in tables::max_composed_eq5(mv.eq5) {
                        let max = max_levels(&[eq1, eq2, eq3_eq6, eq4, eq5], mv)?;
                        let mut distance = [0.0; DISTANCE_METRICS.len()];
                        for (i, d) in distance.iter_mut().enumerate() {
                            *d = current[i] - max[i];
                        }
                        if distance.iter().all(|d| *d >= 0.0) {
                            return Ok(Some(distance));
                        }
                    }
                }
            }
        }
    }
    Ok(None)
}

fn max_levels(parts: &[&str], mv: &MacroVector) -> Result<Levels, CvssError> {
    let miss = || CvssError::InternalTableMiss {
        macro_vector: mv.to_string(),
    };
    let mut levels = [None; DISTANCE_METRICS.len()];
    for token in parts.iter().flat_map(|p| p.split('/')) {
        let (code, value) = token.split_once(':').ok_or_else(miss)?;
        let idx = DISTANCE_METRICS
            .iter()
            .position(|c| *c == code)
            .ok_or_else(miss)?;
        levels[idx] = Some(tables::level(code, value).ok_or_else(miss)?);
    }
    let mut out = [0.0; DISTANCE_METRICS.len()];
    for (slot, level) in out.iter_mut().zip(levels) {
        *slot = level.ok_or_else(miss)?;
    }
    Ok(out)
}

fn effective_levels(selections: &Selections) -> Result<Levels, CvssError> {
    let mut out = [0.0; DISTANCE_METRICS.len()];
    for (slot, code) in out.iter_mut().zip(DISTANCE_METRICS) {
        let value = effective(selections, code);
        *slot = tables::level(code, value).ok_or_else(|| ParseError::InvalidValue {
            code: code.to_string(),
            value: value.to_string(),
        })?;
    }
    Ok(out)
}

/// Round half-up to one decimal, returned in tenths.
fn round_half_up(x: f64) -> u32 {
    let scaled = (x * 100_000.0).round().max(0.0) as u64;
    let tenths = (scaled + 5_000) / 10_000;
    u32::try_from(tenths).unwrap_or(u32::MAX)
}

fn ensure_base(selections: &Selections) -> Result<(), CvssError> {
    let missing: Vec<String> = registry::base_metrics(CvssVersion::V4)
        .iter()
        .filter(|m| !selections.contains(m.code))
        .map(|m| m.code.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CvssError::IncompleteVector { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use cvss_types::score::Severity;

    const CRITICAL: &str = "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N";

    fn score_of(raw: &str) -> String {
        compute(&codec::parse(raw, CvssVersion::V4).unwrap())
            .unwrap()
            .formatted()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(8.549_999_999_999_999), 86);
        assert_eq!(round_half_up(8.54), 85);
        assert_eq!(round_half_up(8.55), 86);
        assert_eq!(round_half_up(10.0), 100);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_known_base_scores() {
        assert_eq!(score_of(CRITICAL), "9.3");
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:H/SI:H/SA:H"),
            "10.0"
        );
        assert_eq!(
            score_of("CVSS:4.0/AV:L/AC:L/AT:N/PR:L/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N"),
            "8.5"
        );
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:P/VC:N/VI:N/VA:N/SC:L/SI:L/SA:N"),
            "5.3"
        );
        assert_eq!(
            score_of("CVSS:4.0/AV:P/AC:H/AT:P/PR:H/UI:A/VC:L/VI:N/VA:N/SC:N/SI:N/SA:N"),
            "1.0"
        );
    }

    #[test]
    fn test_no_impact_is_zero() {
        let sel = codec::parse(
            "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:N/VI:N/VA:N/SC:N/SI:N/SA:N",
            CvssVersion::V4,
        )
        .unwrap();
        let score = compute(&sel).unwrap();
        assert_eq!(score, Score::zero());
        assert_eq!(score.severity, Severity::None);
    }

    #[test]
    fn test_modified_impact_lifts_no_impact_vector() {
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:N/VI:N/VA:N/SC:N/SI:N/SA:N/MVC:H"),
            "8.7"
        );
    }

    #[test]
    fn test_threat_metric() {
        assert_eq!(score_of(&format!("{CRITICAL}/E:U")), "8.1");
        assert_eq!(score_of(&format!("{CRITICAL}/E:P")), "8.9");
        assert_eq!(score_of(&format!("{CRITICAL}/E:A")), "9.3");
    }

    #[test]
    fn test_environmental_metrics() {
        assert_eq!(score_of(&format!("{CRITICAL}/MSI:S")), "10.0");
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:L/SC:N/SI:N/SA:N/E:A/MAV:A"),
            "8.7"
        );
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:L/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/CR:L/IR:L/AR:L"),
            "7.3"
        );
    }

    #[test]
    fn test_float_edge_rounds_up() {
        assert_eq!(
            score_of("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:P/VC:N/VI:L/VA:H/SC:H/SI:H/SA:H"),
            "8.6"
        );
    }

    #[test]
    fn test_supplemental_metrics_do_not_score() {
        assert_eq!(score_of(&format!("{CRITICAL}/S:P/AU:Y/U:Red")), "9.3");
    }

    #[test]
    fn test_missing_base_metric() {
        let mut sel = codec::parse(CRITICAL, CvssVersion::V4).unwrap();
        sel.remove("AT");
        assert_eq!(
            compute(&sel),
            Err(CvssError::IncompleteVector {
                missing: vec!["AT".to_string()],
            })
        );
    }
}
