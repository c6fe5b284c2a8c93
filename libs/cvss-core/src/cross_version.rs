//! Projection of Base metrics between v3.1 and v4.0
//!
//! Keeps the two vectors of one assessment in step: shared Base metrics are
//! copied over, everything without a one-to-one counterpart is kept as is.

use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;

/// Base metrics with the same code and values in both versions
const SHARED: [&str; 3] = ["AV", "AC", "PR"];

/// (v3.1 code, v4.0 code)
const IMPACT: [(&str, &str); 3] = [("C", "VC"), ("I", "VI"), ("A", "VA")];

/// Copy the Base metrics of a v3.1 selection onto v4.0 selections.
///
/// v3.1 `UI:R` is either v4.0 `P` or `A`, so UI is only copied when `N`.
pub fn project_v3_onto_v4(v3: &Selections, v4: &Selections) -> Selections {
    let mut out = v4.clone();
    copy_shared(v3, &mut out);
    for (from, to) in IMPACT {
        if let Some(value) = v3.get(from) {
            out.insert(to, value);
        }
    }
    if v3.get("UI") == Some("N") {
        out.insert("UI", "N");
    }
    out
}

/// Copy the Base metrics of a v4.0 selection onto v3.1 selections.
///
/// Scope has no v4.0 counterpart and is kept.
pub fn project_v4_onto_v3(v4: &Selections, v3: &Selections) -> Selections {
    let mut out = v3.clone();
    copy_shared(v4, &mut out);
    for (to, from) in IMPACT {
        if let Some(value) = v4.get(from) {
            out.insert(to, value);
        }
    }
    match v4.get("UI") {
        Some("N") => {
            out.insert("UI", "N");
        }
        Some("P" | "A") => {
            out.insert("UI", "R");
        }
        _ => {}
    }
    out
}

/// Project `source` (of `from`) onto `target` of the other version.
pub fn project(from: CvssVersion, source: &Selections, target: &Selections) -> Selections {
    match from {
        CvssVersion::V3 => project_v3_onto_v4(source, target),
        CvssVersion::V4 => project_v4_onto_v3(source, target),
    }
}

fn copy_shared(from: &Selections, to: &mut Selections) {
    for code in SHARED {
        if let Some(value) = from.get(code) {
            to.insert(code, value);
        }
    }
}
