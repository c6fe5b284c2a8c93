//! Persisted CVSS assessment records
//!
//! The storage layer keeps `{score, vector, issuer, version}` tuples
//! opaquely; these types mirror that record so the comparator can work on
//! what was actually stored (including a missing vector).

use crate::score::Score;
use crate::version::CvssVersion;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Organization that produced an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Issuer {
    /// Red Hat
    Rh,
    /// NIST / NVD
    Nist,
    /// CVE.org
    Cveorg,
    /// OSV
    Osv,
}

impl Issuer {
    /// Short label shown next to a score
    pub fn label(&self) -> &'static str {
        match self {
            Issuer::Rh => "RH",
            Issuer::Nist => "NVD",
            Issuer::Cveorg => "CVEOrg",
            Issuer::Osv => "OSV",
        }
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored CVSS assessment of a flaw or affect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvssAssessment {
    /// Server-side identifier; `None` until first saved
    pub uuid: Option<Uuid>,
    /// Score as stored by the backend
    pub score: Option<Decimal>,
    /// Raw vector string as stored by the backend
    pub vector: Option<String>,
    /// Free-text explanation (e.g. why RH disagrees with NVD)
    pub comment: String,
    pub cvss_version: CvssVersion,
    pub issuer: Issuer,
    /// Creation time; `None` until first saved
    pub created_dt: Option<DateTime<Utc>>,
}

impl CvssAssessment {
    /// Blank assessment for an entity that has no score of this version yet
    pub fn blank(cvss_version: CvssVersion, issuer: Issuer) -> Self {
        Self {
            uuid: None,
            score: None,
            vector: None,
            comment: String::new(),
            cvss_version,
            issuer,
            created_dt: None,
        }
    }

    /// Assessment carrying a freshly computed score and vector
    pub fn scored(
        cvss_version: CvssVersion,
        issuer: Issuer,
        score: Score,
        vector: impl Into<String>,
    ) -> Self {
        Self {
            score: Some(score.value),
            vector: Some(vector.into()),
            ..Self::blank(cvss_version, issuer)
        }
    }

    /// Attach an explanatory comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Whether the backend has ever stored this record
    pub fn is_persisted(&self) -> bool {
        self.created_dt.is_some()
    }

    /// Score formatted with one decimal, or empty when absent
    pub fn formatted_score(&self) -> String {
        self.score
            .map(|s| format!("{:.1}", s.round_dp(1)))
            .unwrap_or_default()
    }

    /// `"<score> <vector>"`, skipping absent parts; `"-"` when both are absent
    pub fn display_string(&self) -> String {
        let parts: Vec<String> = [Some(self.formatted_score()), self.vector.clone()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" ")
        }
    }
}
