//! CVSS version identifiers
//!
//! Only the two versions the console scores are representable. Anything else
//! is rejected at the boundary with `CvssError::UnsupportedVersion`.

use crate::errors::CvssError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported CVSS specification versions
///
/// Serialized as `V3` / `V4`, which is how the persistence layer tags
/// stored `{score, vector, issuer, version}` tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CvssVersion {
    /// CVSS v3.1
    V3,
    /// CVSS v4.0
    V4,
}

impl CvssVersion {
    /// All supported versions, oldest first
    pub const ALL: [CvssVersion; 2] = [CvssVersion::V3, CvssVersion::V4];

    /// Leading token of a vector string of this version
    pub fn prefix(&self) -> &'static str {
        match self {
            CvssVersion::V3 => "CVSS:3.1",
            CvssVersion::V4 => "CVSS:4.0",
        }
    }

    /// Human-readable version number
    pub fn label(&self) -> &'static str {
        match self {
            CvssVersion::V3 => "3.1",
            CvssVersion::V4 => "4.0",
        }
    }

    /// The other supported version
    pub fn other(&self) -> Self {
        match self {
            CvssVersion::V3 => CvssVersion::V4,
            CvssVersion::V4 => CvssVersion::V3,
        }
    }
}

impl fmt::Display for CvssVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CvssVersion {
    type Err = CvssError;

    /// Accepts `V3`, `3.1`, `CVSS:3.1`, `V4`, `4.0` and `CVSS:4.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "V3" | "3.1" | "CVSS:3.1" => Ok(CvssVersion::V3),
            "V4" | "4.0" | "CVSS:4.0" => Ok(CvssVersion::V4),
            other => Err(CvssError::UnsupportedVersion {
                version: other.to_string(),
            }),
        }
    }
}
