//! Vector Comparator
//!
//! Compares an assessment against another issuer's (typically RH against
//! NVD) and reports where the other issuer's vector differs, character by
//! character, so the UI can highlight it.

use cvss_types::assessment::CvssAssessment;
use cvss_types::errors::CvssError;
use cvss_types::version::CvssVersion;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator;
use crate::vector::Vector;

/// Placeholder shown when one side has nothing to compare
const ABSENT: &str = "-";

/// One rendered piece of the compared string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedChar {
    pub text: String,
    pub is_highlighted: bool,
}

impl HighlightedChar {
    fn new(text: impl Into<String>, is_highlighted: bool) -> Self {
        Self {
            text: text.into(),
            is_highlighted,
        }
    }
}

/// Outcome of comparing two vectors of the same version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Second side's `"<score> <vector>"`, aligned with the first
    pub highlights: Vec<HighlightedChar>,
    /// Whether the mismatch-reason workflow should be offered
    pub scores_effectively_differ: bool,
    /// Second score minus first score
    pub score_delta: Decimal,
}

impl ComparisonResult {
    /// Consecutive characters with the same highlight state, merged.
    pub fn segments(&self) -> Vec<HighlightedChar> {
        let mut out: Vec<HighlightedChar> = Vec::new();
        for item in &self.highlights {
            match out.last_mut() {
                Some(last) if last.is_highlighted == item.is_highlighted => {
                    last.text.push_str(&item.text);
                }
                _ => out.push(item.clone()),
            }
        }
        out
    }

    pub fn has_highlights(&self) -> bool {
        self.highlights.iter().any(|h| h.is_highlighted)
    }
}

/// Compare two vectors, neither carrying a comment.
pub fn compare(a: &Vector, b: &Vector) -> Result<ComparisonResult, CvssError> {
    compare_with_comments(a, "", b, "")
}

/// Compare two vectors; a non-empty comment on either side counts as a
/// difference on its own.
pub fn compare_with_comments(
    a: &Vector,
    a_comment: &str,
    b: &Vector,
    b_comment: &str,
) -> Result<ComparisonResult, CvssError> {
    ensure_same_version(a.version(), b.version())?;

    let a_score = calculator::score(a)?;
    let b_score = calculator::score(b)?;
    let (a_text, b_text) = (a_score.formatted(), b_score.formatted());

    let differ = scores_effectively_differ(
        &display(&a_text, a.raw()),
        a_comment,
        &display(&b_text, b.raw()),
        b_comment,
    );

    Ok(ComparisonResult {
        highlights: highlight(&a_text, a.raw(), &b_text, b.raw(), differ),
        scores_effectively_differ: differ,
        score_delta: b_score.value - a_score.value,
    })
}

/// Compare stored assessments as persisted, without re-scoring.
///
/// Highlights run over `other`. When either side has no vector the result
/// is a single plain `-`.
pub fn compare_assessments(
    rh: &CvssAssessment,
    other: &CvssAssessment,
) -> Result<ComparisonResult, CvssError> {
    ensure_same_version(rh.cvss_version, other.cvss_version)?;

    let score_delta = match (rh.score, other.score) {
        (Some(a), Some(b)) => b - a,
        _ => Decimal::ZERO,
    };

    let (Some(rh_vector), Some(other_vector)) = (present(&rh.vector), present(&other.vector)) else {
        return Ok(ComparisonResult {
            highlights: vec![HighlightedChar::new(ABSENT, false)],
            scores_effectively_differ: false,
            score_delta,
        });
    };

    let differ = scores_effectively_differ(
        &rh.display_string(),
        &rh.comment,
        &other.display_string(),
        &other.comment,
    );
    Ok(ComparisonResult {
        highlights: highlight(
            &rh.formatted_score(),
            rh_vector,
            &other.formatted_score(),
            other_vector,
            differ,
        ),
        scores_effectively_differ: differ,
        score_delta,
    })
}

/// Mismatch rule on `"<score> <vector>"` display strings.
///
/// Nothing to compare on either side → `false`; a comment on either side →
/// `true`; otherwise the display strings decide.
pub fn scores_effectively_differ(
    a_display: &str,
    a_comment: &str,
    b_display: &str,
    b_comment: &str,
) -> bool {
    let absent = |s: &str| s.is_empty() || s == ABSENT;
    if absent(a_display) || absent(b_display) {
        return false;
    }
    if !a_comment.is_empty() || !b_comment.is_empty() {
        return true;
    }
    a_display != b_display
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn highlight(
    a_score: &str,
    a_vector: &str,
    b_score: &str,
    b_vector: &str,
    differ: bool,
) -> Vec<HighlightedChar> {
    let mut out = Vec::with_capacity(b_vector.len() + 2);
    if a_score != b_score {
        out.push(HighlightedChar::new(b_score, true));
        out.push(HighlightedChar::new(" ", false));
    }

    let a_chars: Vec<char> = a_vector.chars().collect();
    let b_chars: Vec<char> = b_vector.chars().collect();
    for i in 0..a_chars.len().max(b_chars.len()) {
        let a_char = a_chars.get(i);
        let b_char = b_chars.get(i);
        let text = b_char.map(char::to_string).unwrap_or_default();
        out.push(HighlightedChar::new(text, differ && a_char != b_char));
    }
    out
}

fn display(score: &str, vector: &str) -> String {
    format!("{score} {vector}")
}

fn present(vector: &Option<String>) -> Option<&str> {
    vector.as_deref().filter(|v| !v.is_empty() && *v != ABSENT)
}

fn ensure_same_version(left: CvssVersion, right: CvssVersion) -> Result<(), CvssError> {
    if left == right {
        Ok(())
    } else {
        Err(CvssError::VersionMismatch {
            left: left.label().to_string(),
            right: right.label().to_string(),
        })
    }
}
