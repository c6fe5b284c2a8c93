//! Version dispatch for scoring

use cvss_types::errors::CvssError;
use cvss_types::score::Score;
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;

use crate::vector::Vector;
use crate::{v31, v40};

/// Score selections of the given version.
///
/// For v3.1 this is the most specific of the base, temporal and
/// environmental scores.
pub fn compute(version: CvssVersion, selections: &Selections) -> Result<Score, CvssError> {
    match version {
        CvssVersion::V3 => v31::compute(selections).map(|scores| scores.overall()),
        CvssVersion::V4 => v40::compute(selections),
    }
}

/// Score a validated vector.
pub fn score(vector: &Vector) -> Result<Score, CvssError> {
    compute(vector.version(), vector.selections())
}
