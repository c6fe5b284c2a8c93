//! CVSS v3.1 calculator
//!
//! Base, Temporal and Environmental equations of the v3.1 standard.
//! Weights are fixed by the standard and are not configurable.
//!
//! # Rounding
//! `roundup` works on `round(x * 100_000)` as an integer so that values a
//! hair above a tenth boundary due to float error (e.g. `4.000000000000001`)
//! do not round up to the next tenth.

use cvss_types::errors::{CvssError, ParseError};
use cvss_types::metric::MetricGroupKind;
use cvss_types::score::Score;
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use serde::{Deserialize, Serialize};

use crate::registry;

/// Scores of every v3.1 metric group that carries data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct V31Scores {
    pub base: Score,
    /// Present when any Temporal metric is defined
    pub temporal: Option<Score>,
    /// Present when any Environmental metric is defined
    pub environmental: Option<Score>,
}

impl V31Scores {
    /// The most specific score available.
    pub fn overall(&self) -> Score {
        self.environmental.or(self.temporal).unwrap_or(self.base)
    }
}

/// How bad a single Base value is, used to colour selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorSeverity {
    Worst,
    Worse,
    Bad,
    Good,
}

/// Compute all v3.1 scores from validated selections.
pub fn compute(selections: &Selections) -> Result<V31Scores, CvssError> {
    ensure_base(selections)?;

    let base = base_tenths(selections)?;
    let threat = temporal_multiplier(selections)?;

    let temporal = if has_any(selections, MetricGroupKind::Temporal) {
        Some(Score::from_tenths(roundup(tenths_to_f64(base) * threat)))
    } else {
        None
    };
    let environmental = if has_any(selections, MetricGroupKind::Environmental) {
        Some(Score::from_tenths(environmental_tenths(selections, threat)?))
    } else {
        None
    };

    Ok(V31Scores {
        base: Score::from_tenths(base),
        temporal,
        environmental,
    })
}

/// Qualitative rating of one Base metric value.
pub fn factor_severity(code: &str, value: &str) -> Option<FactorSeverity> {
    use FactorSeverity::*;
    let rating = match (code, value) {
        ("AV", "N") => Worst,
        ("AV", "A") => Worse,
        ("AV", "L" | "P") => Bad,
        ("AC", "L") => Worst,
        ("AC", "H") => Bad,
        ("PR", "N") => Worst,
        ("PR", "L") => Worse,
        ("PR", "H") => Bad,
        ("UI", "N") => Worst,
        ("UI", "R") => Bad,
        ("S", "C") => Worst,
        ("S", "U") => Bad,
        ("C" | "I" | "A", "H") => Worst,
        ("C" | "I" | "A", "L") => Bad,
        ("C" | "I" | "A", "N") => Good,
        _ => return None,
    };
    Some(rating)
}

/// Round up to one decimal, returned in tenths.
pub fn roundup(x: f64) -> u32 {
    if !(x > 0.0) {
        return 0;
    }
    let scaled = (x * 100_000.0).round() as u64;
    let tenths = if scaled % 10_000 == 0 {
        scaled / 10_000
    } else {
        scaled / 10_000 + 1
    };
    u32::try_from(tenths).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Equations
// ---------------------------------------------------------------------------

fn base_tenths(sel: &Selections) -> Result<u32, CvssError> {
    let changed = base(sel, "S")? == "C";
    let iss = 1.0
        - (1.0 - cia(base(sel, "C")?)?)
            * (1.0 - cia(base(sel, "I")?)?)
            * (1.0 - cia(base(sel, "A")?)?);
    let impact = if changed {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02).powf(15.0)
    } else {
        6.42 * iss
    };
    let exploitability = exploitability(
        base(sel, "AV")?,
        base(sel, "AC")?,
        base(sel, "PR")?,
        base(sel, "UI")?,
        changed,
    )?;
    Ok(combine(impact, exploitability, changed))
}

fn environmental_tenths(sel: &Selections, threat: f64) -> Result<u32, CvssError> {
    let changed = modified(sel, "S")? == "C";
    let miss = (1.0
        - (1.0 - requirement(sel, "CR")? * cia(modified(sel, "C")?)?)
            * (1.0 - requirement(sel, "IR")? * cia(modified(sel, "I")?)?)
            * (1.0 - requirement(sel, "AR")? * cia(modified(sel, "A")?)?))
    .min(0.915);
    let impact = if changed {
        7.52 * (miss - 0.029) - 3.25 * (miss * 0.9731 - 0.02).powf(13.0)
    } else {
        6.42 * miss
    };
    let exploitability = exploitability(
        modified(sel, "AV")?,
        modified(sel, "AC")?,
        modified(sel, "PR")?,
        modified(sel, "UI")?,
        changed,
    )?;
    if impact <= 0.0 {
        return Ok(0);
    }
    let adjusted = combine(impact, exploitability, changed);
    Ok(roundup(tenths_to_f64(adjusted) * threat))
}

fn exploitability(av: &str, ac: &str, pr: &str, ui: &str, changed: bool) -> Result<f64, CvssError> {
    let av = match av {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        _ => return Err(invalid("AV", av)),
    };
    let ac = match ac {
        "L" => 0.77,
        "H" => 0.44,
        _ => return Err(invalid("AC", ac)),
    };
    let pr = match (pr, changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        _ => return Err(invalid("PR", pr)),
    };
    let ui = match ui {
        "N" => 0.85,
        "R" => 0.62,
        _ => return Err(invalid("UI", ui)),
    };
    Ok(8.22 * av * ac * pr * ui)
}

fn combine(impact: f64, exploitability: f64, changed: bool) -> u32 {
    if impact <= 0.0 {
        return 0;
    }
    let sum = if changed {
        1.08 * (impact + exploitability)
    } else {
        impact + exploitability
    };
    roundup(sum.min(10.0))
}

fn temporal_multiplier(sel: &Selections) -> Result<f64, CvssError> {
    let e = match sel.get_or("E", "X") {
        "X" | "H" => 1.0,
        "F" => 0.97,
        "P" => 0.94,
        "U" => 0.91,
        other => return Err(invalid("E", other)),
    };
    let rl = match sel.get_or("RL", "X") {
        "X" | "U" => 1.0,
        "W" => 0.97,
        "T" => 0.96,
        "O" => 0.95,
        other => return Err(invalid("RL", other)),
    };
    let rc = match sel.get_or("RC", "X") {
        "X" | "C" => 1.0,
        "R" => 0.96,
        "U" => 0.92,
        other => return Err(invalid("RC", other)),
    };
    Ok(e * rl * rc)
}

fn cia(value: &str) -> Result<f64, CvssError> {
    match value {
        "H" => Ok(0.56),
        "L" => Ok(0.22),
        "N" => Ok(0.0),
        other => Err(invalid("C/I/A", other)),
    }
}

fn requirement(sel: &Selections, code: &str) -> Result<f64, CvssError> {
    match sel.get_or(code, "X") {
        "X" | "M" => Ok(1.0),
        "H" => Ok(1.5),
        "L" => Ok(0.5),
        other => Err(invalid(code, other)),
    }
}

// ---------------------------------------------------------------------------
// Selection access
// ---------------------------------------------------------------------------

fn ensure_base(sel: &Selections) -> Result<(), CvssError> {
    let missing: Vec<String> = registry::base_metrics(CvssVersion::V3)
        .iter()
        .filter(|m| !sel.contains(m.code))
        .map(|m| m.code.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CvssError::IncompleteVector { missing })
    }
}

fn base<'a>(sel: &'a Selections, code: &str) -> Result<&'a str, CvssError> {
    sel.get(code).ok_or_else(|| CvssError::IncompleteVector {
        missing: vec![code.to_string()],
    })
}

/// `M<code>` when defined, else the Base value.
fn modified<'a>(sel: &'a Selections, code: &str) -> Result<&'a str, CvssError> {
    match sel.get(&format!("M{code}")) {
        Some(value) if value != "X" => Ok(value),
        _ => base(sel, code),
    }
}

fn has_any(sel: &Selections, kind: MetricGroupKind) -> bool {
    registry::metrics_for(CvssVersion::V3)
        .iter()
        .filter(|g| g.kind == kind)
        .flat_map(|g| g.metrics.iter())
        .any(|m| sel.get(m.code).is_some_and(|v| !m.is_not_defined(v)))
}

fn tenths_to_f64(tenths: u32) -> f64 {
    f64::from(tenths) / 10.0
}

fn invalid(code: &str, value: &str) -> CvssError {
    ParseError::InvalidValue {
        code: code.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use cvss_types::score::Severity;

    const CRITICAL: &str = "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H";

    fn scores(raw: &str) -> V31Scores {
        compute(&codec::parse(raw, CvssVersion::V3).unwrap()).unwrap()
    }

    fn base_of(raw: &str) -> String {
        scores(raw).base.formatted()
    }

    #[test]
    fn test_roundup() {
        assert_eq!(roundup(4.0), 40);
        assert_eq!(roundup(4.000_000_000_000_001), 40);
        assert_eq!(roundup(4.02), 41);
        assert_eq!(roundup(0.0), 0);
        assert_eq!(roundup(-1.0), 0);
        assert_eq!(roundup(9.999), 100);
    }

    #[test]
    fn test_known_base_scores() {
        assert_eq!(base_of(CRITICAL), "9.8");
        assert_eq!(base_of("CVSS:3.1/AV:N/AC:H/PR:H/UI:N/S:U/C:L/I:N/A:N"), "2.2");
        assert_eq!(base_of("CVSS:3.1/AV:N/AC:L/PR:N/UI:R/S:C/C:L/I:L/A:N"), "6.1");
        assert_eq!(base_of("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:L/I:L/A:N"), "7.2");
        assert_eq!(base_of("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H"), "10.0");
        assert_eq!(base_of("CVSS:3.1/AV:L/AC:L/PR:L/UI:N/S:U/C:H/I:N/A:N"), "5.5");
        assert_eq!(base_of("CVSS:3.1/AV:P/AC:H/PR:H/UI:R/S:U/C:L/I:N/A:N"), "1.6");
    }

    #[test]
    fn test_no_impact_is_zero() {
        let s = scores("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:N/I:N/A:N");
        assert_eq!(s.base, Score::zero());
        assert_eq!(s.base.severity, Severity::None);
    }

    #[test]
    fn test_base_only_has_no_optional_scores() {
        let s = scores(CRITICAL);
        assert!(s.temporal.is_none());
        assert!(s.environmental.is_none());
        assert_eq!(s.overall(), s.base);
        assert_eq!(s.base.severity, Severity::Critical);
    }

    #[test]
    fn test_temporal_score() {
        let s = scores(&format!("{CRITICAL}/E:P/RL:O/RC:C"));
        assert_eq!(s.base.formatted(), "9.8");
        assert_eq!(s.temporal.unwrap().formatted(), "8.8");
        assert!(s.environmental.is_none());
        assert_eq!(s.overall().formatted(), "8.8");
    }

    #[test]
    fn test_environmental_requirements() {
        let s = scores(&format!("{CRITICAL}/CR:L/IR:L/AR:L"));
        assert_eq!(s.environmental.unwrap().formatted(), "8.0");
        assert_eq!(s.overall().formatted(), "8.0");
    }

    #[test]
    fn test_environmental_modified_base() {
        let s = scores(&format!("{CRITICAL}/MAV:L/MPR:H"));
        assert_eq!(s.environmental.unwrap().formatted(), "6.7");
    }

    #[test]
    fn test_modified_scope_changes_pr_weights() {
        let raw = "CVSS:3.1/AV:N/AC:L/PR:L/UI:N/S:U/C:H/I:H/A:H";
        assert_eq!(base_of(raw), "8.8");
        let s = scores(&format!("{raw}/MS:C"));
        assert_eq!(s.environmental.unwrap().formatted(), "10.0");
    }

    #[test]
    fn test_full_vector() {
        let s = scores(&format!(
            "{CRITICAL}/E:U/RL:O/RC:U/CR:H/IR:H/AR:H/MAV:N/MAC:L/MPR:N/MUI:N/MS:C/MC:H/MI:H/MA:H"
        ));
        assert_eq!(s.temporal.unwrap().formatted(), "7.8");
        assert_eq!(s.environmental.unwrap().formatted(), "8.0");
    }

    #[test]
    fn test_modified_impact_none_is_zero() {
        let s = scores(&format!("{CRITICAL}/MC:N/MI:N/MA:N"));
        assert_eq!(s.environmental.unwrap(), Score::zero());
    }

    #[test]
    fn test_missing_base_metric() {
        let mut sel = codec::parse(CRITICAL, CvssVersion::V3).unwrap();
        sel.remove("S");
        sel.remove("AV");
        assert_eq!(
            compute(&sel),
            Err(CvssError::IncompleteVector {
                missing: vec!["AV".to_string(), "S".to_string()],
            })
        );
    }

    #[test]
    fn test_unvalidated_value_is_rejected() {
        let mut sel = codec::parse(CRITICAL, CvssVersion::V3).unwrap();
        sel.insert("AC", "Q");
        assert!(matches!(
            compute(&sel),
            Err(CvssError::Parse(ParseError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_factor_severity() {
        assert_eq!(factor_severity("AV", "N"), Some(FactorSeverity::Worst));
        assert_eq!(factor_severity("PR", "L"), Some(FactorSeverity::Worse));
        assert_eq!(factor_severity("S", "U"), Some(FactorSeverity::Bad));
        assert_eq!(factor_severity("A", "N"), Some(FactorSeverity::Good));
        assert_eq!(factor_severity("E", "P"), None);
    }
}
