//! The `Vector` value object
//!
//! A vector holds its canonical string and its structured selections side
//! by side. Fields are private and every constructor goes through the
//! codec, so the two halves cannot drift apart.

use std::fmt;

use cvss_types::errors::ParseError;
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use serde::Serialize;

use crate::codec;
use crate::config::EngineConfig;

/// A validated CVSS vector of one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Vector {
    version: CvssVersion,
    raw: String,
    selections: Selections,
}

impl Vector {
    /// Parse a vector string with the default configuration.
    pub fn parse(raw: &str, version: CvssVersion) -> Result<Self, ParseError> {
        Self::parse_with(raw, version, &EngineConfig::default())
    }

    pub fn parse_with(
        raw: &str,
        version: CvssVersion,
        config: &EngineConfig,
    ) -> Result<Self, ParseError> {
        let selections = codec::parse_with(raw, version, config)?;
        Ok(Self::assemble(version, selections))
    }

    /// Build from structured selections, validating them first.
    pub fn from_selections(version: CvssVersion, selections: &Selections) -> Result<Self, ParseError> {
        let selections = codec::validate(version, selections)?;
        Ok(Self::assemble(version, selections))
    }

    /// Copy of this vector with one metric changed.
    ///
    /// Setting an optional metric to `X` removes it.
    pub fn with_selection(&self, code: &str, value: &str) -> Result<Self, ParseError> {
        let mut selections = self.selections.clone();
        selections.insert(code, value);
        Self::from_selections(self.version, &selections)
    }

    fn assemble(version: CvssVersion, selections: Selections) -> Self {
        let raw = codec::serialize(&selections, version);
        Self {
            version,
            raw,
            selections,
        }
    }

    pub fn version(&self) -> CvssVersion {
        self.version
    }

    /// Canonical string form
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Selected value of a metric; `None` for Not Defined optional metrics.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.selections.get(code)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
