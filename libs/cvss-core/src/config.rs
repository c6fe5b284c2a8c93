//! Engine configuration
//!
//! Knobs the embedding UI may tune. Nothing here changes a score: scoring
//! is fixed by the standard.

use cvss_types::assessment::{CvssAssessment, Issuer};
use cvss_types::version::CvssVersion;
use serde::{Deserialize, Serialize};

/// Configuration for vector parsing and selection synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version used for a blank assessment when an entity has none yet.
    pub default_version: CvssVersion,
    /// Project Base edits onto an attached companion vector of the other version.
    pub mirror_base_metrics: bool,
    /// Accept a leading `#` before the vector prefix.
    pub accept_fragment_prefix: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_version: CvssVersion::V3,
            mirror_base_metrics: true,
            accept_fragment_prefix: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Unsaved assessment of the configured default version.
    pub fn blank_assessment(&self, issuer: Issuer) -> CvssAssessment {
        CvssAssessment::blank(self.default_version, issuer)
    }
}
