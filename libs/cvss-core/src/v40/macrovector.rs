//! Macrovector classification
//!
//! A v4.0 vector collapses into six equivalence-class digits (EQ1..EQ6)
//! computed from its *effective* values: a defined `M*` metric overrides
//! its Base value, and Not Defined `E`/`CR`/`IR`/`AR` count as worst case.

use std::fmt;

use cvss_types::errors::{CvssError, ParseError};
use cvss_types::metric::{MetricGroupKind, NOT_DEFINED};
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use serde::{Deserialize, Serialize};

use crate::registry;

/// Effective value of a metric after Threat/Environmental overrides.
pub fn effective<'a>(selections: &'a Selections, code: &str) -> &'a str {
    let defined = |c: &str| selections.get(c).filter(|v| *v != NOT_DEFINED);
    match code {
        "E" => defined("E").unwrap_or("A"),
        "CR" | "IR" | "AR" => defined(code).unwrap_or("H"),
        _ => defined(&format!("M{code}"))
            .or_else(|| defined(code))
            .unwrap_or(NOT_DEFINED),
    }
}

/// Six equivalence-class digits of a v4.0 vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroVector {
    /// AV/PR/UI
    pub eq1: u8,
    /// AC/AT
    pub eq2: u8,
    /// VC/VI/VA
    pub eq3: u8,
    /// SC/SI/SA
    pub eq4: u8,
    /// E
    pub eq5: u8,
    /// CR/IR/AR against VC/VI/VA
    pub eq6: u8,
}

impl MacroVector {
    pub fn classify(selections: &Selections) -> Result<Self, CvssError> {
        let e = |code: &str| effective(selections, code);

        let (av, pr, ui) = (e("AV"), e("PR"), e("UI"));
        let eq1 = if av == "N" && pr == "N" && ui == "N" {
            0
        } else if (av == "N" || pr == "N" || ui == "N") && av != "P" {
            1
        } else {
            2
        };

        let eq2 = if e("AC") == "L" && e("AT") == "N" { 0 } else { 1 };

        let (vc, vi, va) = (e("VC"), e("VI"), e("VA"));
        let eq3 = if vc == "H" && vi == "H" {
            0
        } else if vc == "H" || vi == "H" || va == "H" {
            1
        } else {
            2
        };

        let eq4 = if e("SI") == "S" || e("SA") == "S" {
            0
        } else if e("SC") == "H" || e("SI") == "H" || e("SA") == "H" {
            1
        } else {
            2
        };

        let eq5 = match e("E") {
            "A" => 0,
            "P" => 1,
            "U" => 2,
            other => {
                return Err(ParseError::InvalidValue {
                    code: "E".to_string(),
                    value: other.to_string(),
                }
                .into())
            }
        };

        let eq6 = if (e("CR") == "H" && vc == "H")
            || (e("IR") == "H" && vi == "H")
            || (e("AR") == "H" && va == "H")
        {
            0
        } else {
            1
        };

        Ok(Self {
            eq1,
            eq2,
            eq3,
            eq4,
            eq5,
            eq6,
        })
    }

    /// Digits in EQ order
    pub fn digits(&self) -> [u8; 6] {
        [self.eq1, self.eq2, self.eq3, self.eq4, self.eq5, self.eq6]
    }

    /// Same macrovector with each digit raised by the given amount.
    pub fn shifted(&self, by: [u8; 6]) -> Self {
        Self {
            eq1: self.eq1 + by[0],
            eq2: self.eq2 + by[1],
            eq3: self.eq3 + by[2],
            eq4: self.eq4 + by[3],
            eq5: self.eq5 + by[4],
            eq6: self.eq6 + by[5],
        }
    }
}

impl fmt::Display for MacroVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

/// Macrovector of validated selections.
pub fn macro_vector(selections: &Selections) -> Result<MacroVector, CvssError> {
    MacroVector::classify(selections)
}

// ---------------------------------------------------------------------------
// Descriptive helpers
// ---------------------------------------------------------------------------

/// Which metric groups a v4.0 score takes into account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nomenclature {
    #[serde(rename = "CVSS-B")]
    Base,
    #[serde(rename = "CVSS-BT")]
    BaseThreat,
    #[serde(rename = "CVSS-BE")]
    BaseEnvironmental,
    #[serde(rename = "CVSS-BTE")]
    BaseThreatEnvironmental,
}

impl Nomenclature {
    pub fn label(&self) -> &'static str {
        match self {
            Nomenclature::Base => "CVSS-B",
            Nomenclature::BaseThreat => "CVSS-BT",
            Nomenclature::BaseEnvironmental => "CVSS-BE",
            Nomenclature::BaseThreatEnvironmental => "CVSS-BTE",
        }
    }
}

impl fmt::Display for Nomenclature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn nomenclature(selections: &Selections) -> Nomenclature {
    let threat = has_any(selections, MetricGroupKind::Threat);
    let environmental = has_any(selections, MetricGroupKind::Environmental);
    match (threat, environmental) {
        (false, false) => Nomenclature::Base,
        (true, false) => Nomenclature::BaseThreat,
        (false, true) => Nomenclature::BaseEnvironmental,
        (true, true) => Nomenclature::BaseThreatEnvironmental,
    }
}

fn has_any(selections: &Selections, kind: MetricGroupKind) -> bool {
    registry::metrics_for(CvssVersion::V4)
        .iter()
        .filter(|g| g.kind == kind)
        .flat_map(|g| g.metrics.iter())
        .any(|m| selections.get(m.code).is_some_and(|v| !m.is_not_defined(v)))
}

/// Equivalence set named by its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EqDimension {
    Exploitability,
    Complexity,
    VulnerableSystem,
    SubsequentSystem,
    Exploitation,
    SecurityRequirements,
}

impl EqDimension {
    pub const ALL: [EqDimension; 6] = [
        EqDimension::Exploitability,
        EqDimension::Complexity,
        EqDimension::VulnerableSystem,
        EqDimension::SubsequentSystem,
        EqDimension::Exploitation,
        EqDimension::SecurityRequirements,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EqDimension::Exploitability => "Exploitability",
            EqDimension::Complexity => "Complexity",
            EqDimension::VulnerableSystem => "Vulnerable system",
            EqDimension::SubsequentSystem => "Subsequent system",
            EqDimension::Exploitation => "Exploitation",
            EqDimension::SecurityRequirements => "Security requirements",
        }
    }

    fn is_binary(&self) -> bool {
        matches!(self, EqDimension::Complexity | EqDimension::SecurityRequirements)
    }
}

/// Qualitative level of one macrovector digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Per-dimension level of a macrovector, in EQ order.
pub fn severity_breakdown(macro_vector: &MacroVector) -> Vec<(EqDimension, Level)> {
    EqDimension::ALL
        .into_iter()
        .zip(macro_vector.digits())
        .map(|(dim, digit)| {
            let level = match (digit, dim.is_binary()) {
                (0, _) => Level::High,
                (1, false) => Level::Medium,
                _ => Level::Low,
            };
            (dim, level)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    fn sel(raw: &str) -> Selections {
        codec::parse(raw, CvssVersion::V4).unwrap()
    }

    #[test]
    fn test_effective_defaults_and_overrides() {
        let s = sel("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:L/SC:N/SI:N/SA:N/MAV:A/IR:L");
        assert_eq!(effective(&s, "AV"), "A");
        assert_eq!(effective(&s, "AC"), "L");
        assert_eq!(effective(&s, "E"), "A");
        assert_eq!(effective(&s, "CR"), "H");
        assert_eq!(effective(&s, "IR"), "L");
    }

    #[test]
    fn test_classify_with_modified_vector() {
        let s = sel("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:L/SC:N/SI:N/SA:N/E:A/MAV:A");
        let mv = MacroVector::classify(&s).unwrap();
        assert_eq!(mv.to_string(), "100200");
    }

    #[test]
    fn test_safety_drives_eq4() {
        let s = sel("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/MSI:S");
        assert_eq!(macro_vector(&s).unwrap().to_string(), "000000");
    }

    #[test]
    fn test_physical_vector_is_eq1_two() {
        let s = sel("CVSS:4.0/AV:P/AC:H/AT:P/PR:N/UI:N/VC:L/VI:N/VA:N/SC:N/SI:N/SA:N/E:U/CR:L");
        let mv = macro_vector(&s).unwrap();
        assert_eq!(mv.digits(), [2, 1, 2, 2, 2, 1]);
    }

    #[test]
    fn test_nomenclature() {
        let base = "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N";
        assert_eq!(nomenclature(&sel(base)), Nomenclature::Base);
        assert_eq!(nomenclature(&sel(&format!("{base}/E:P"))), Nomenclature::BaseThreat);
        assert_eq!(
            nomenclature(&sel(&format!("{base}/MAV:L"))),
            Nomenclature::BaseEnvironmental
        );
        assert_eq!(
            nomenclature(&sel(&format!("{base}/E:U/CR:L"))).to_string(),
            "CVSS-BTE"
        );
        // supplemental metrics do not count
        assert_eq!(nomenclature(&sel(&format!("{base}/AU:Y"))), Nomenclature::Base);
    }

    #[test]
    fn test_severity_breakdown() {
        let mv = MacroVector {
            eq1: 1,
            eq2: 0,
            eq3: 0,
            eq4: 2,
            eq5: 0,
            eq6: 0,
        };
        let breakdown = severity_breakdown(&mv);
        assert_eq!(
            breakdown,
            vec![
                (EqDimension::Exploitability, Level::Medium),
                (EqDimension::Complexity, Level::High),
                (EqDimension::VulnerableSystem, Level::High),
                (EqDimension::SubsequentSystem, Level::Low),
                (EqDimension::Exploitation, Level::High),
                (EqDimension::SecurityRequirements, Level::High),
            ]
        );
        let worst = mv.shifted([1, 1, 2, 0, 2, 1]);
        let levels: Vec<Level> = severity_breakdown(&worst).into_iter().map(|(_, l)| l).collect();
        assert_eq!(
            levels,
            vec![Level::Low, Level::Low, Level::Low, Level::Low, Level::Low, Level::Low]
        );
    }
}
