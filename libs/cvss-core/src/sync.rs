//! Selection Synchronizer
//!
//! Owns one vector and its score, and applies UI edits coming from either
//! side (raw string or single metric) as one atomic step. A rejected edit
//! leaves every field as it was.
//!
//! An optional companion vector of the other version follows Base edits of
//! the primary when `mirror_base_metrics` is set.

use cvss_types::errors::CvssError;
use cvss_types::score::Score;
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use tracing::{debug, info, warn};

use crate::calculator;
use crate::config::EngineConfig;
use crate::cross_version;
use crate::vector::Vector;

/// A vector with the score computed from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub vector: Vector,
    pub score: Score,
}

impl Scored {
    fn compute(vector: Vector) -> Result<Self, CvssError> {
        let score = calculator::score(&vector)?;
        Ok(Self { vector, score })
    }
}

/// Keeps a vector's string form, selections and score consistent.
#[derive(Debug)]
pub struct ScoreSynchronizer {
    current: Scored,
    companion: Option<Scored>,
    config: EngineConfig,
    /// Number of edits that changed the vector
    revision: u64,
}

impl ScoreSynchronizer {
    pub fn new(vector: Vector, config: EngineConfig) -> Result<Self, CvssError> {
        let current = Scored::compute(vector)?;
        info!(
            version = %current.vector.version(),
            mirror = config.mirror_base_metrics,
            "score synchronizer created"
        );
        Ok(Self {
            current,
            companion: None,
            config,
            revision: 0,
        })
    }

    /// Start from a raw vector string.
    pub fn from_raw(raw: &str, version: CvssVersion, config: EngineConfig) -> Result<Self, CvssError> {
        let vector = Vector::parse_with(raw, version, &config)?;
        Self::new(vector, config)
    }

    /// Attach a vector of the other version that follows Base edits.
    pub fn with_companion(mut self, companion: Vector) -> Result<Self, CvssError> {
        let version = self.current.vector.version();
        if companion.version() == version {
            return Err(CvssError::VersionMismatch {
                left: version.label().to_string(),
                right: companion.version().label().to_string(),
            });
        }
        self.companion = Some(Scored::compute(companion)?);
        Ok(self)
    }

    pub fn vector(&self) -> &Vector {
        &self.current.vector
    }

    pub fn raw(&self) -> &str {
        self.current.vector.raw()
    }

    pub fn selections(&self) -> &Selections {
        self.current.vector.selections()
    }

    pub fn score(&self) -> Score {
        self.current.score
    }

    pub fn companion(&self) -> Option<&Scored> {
        self.companion.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply a single metric edit made through the structured selectors.
    pub fn on_selection_changed(&mut self, code: &str, value: &str) -> Result<Score, CvssError> {
        let next = self
            .current
            .vector
            .with_selection(code, value)
            .map_err(CvssError::from);
        self.commit(next)
    }

    /// Apply an edit of the raw vector string.
    pub fn on_raw_vector_changed(&mut self, raw: &str) -> Result<Score, CvssError> {
        let next = Vector::parse_with(raw, self.current.vector.version(), &self.config)
            .map_err(CvssError::from);
        self.commit(next)
    }

    /// Validate and score everything first, then swap it in at once.
    fn commit(&mut self, next: Result<Vector, CvssError>) -> Result<Score, CvssError> {
        let prepared = next.and_then(|vector| self.prepare(vector));
        match prepared {
            Ok(None) => Ok(self.current.score),
            Ok(Some((current, companion))) => {
                debug!(
                    version = %current.vector.version(),
                    score = %current.score,
                    revision = self.revision + 1,
                    "vector recomputed"
                );
                self.current = current;
                if companion.is_some() {
                    self.companion = companion;
                }
                self.revision += 1;
                Ok(self.current.score)
            }
            Err(error) => {
                warn!(raw = %self.current.vector.raw(), %error, "edit rejected, keeping previous vector");
                Err(error)
            }
        }
    }

    /// `None` when the edit does not change the vector.
    fn prepare(&self, vector: Vector) -> Result<Option<(Scored, Option<Scored>)>, CvssError> {
        if vector == self.current.vector {
            return Ok(None);
        }
        let companion = match &self.companion {
            Some(companion) if self.config.mirror_base_metrics => {
                let projected = cross_version::project(
                    vector.version(),
                    vector.selections(),
                    companion.vector.selections(),
                );
                let follower = Vector::from_selections(companion.vector.version(), &projected)?;
                Some(Scored::compute(follower)?)
            }
            _ => None,
        };
        let current = Scored::compute(vector)?;
        Ok(Some((current, companion)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvss_types::errors::ParseError;

    const V3: &str = "CVSS:3.1/AV:N/AC:L/PR:N/UI:R/S:C/C:L/I:L/A:N";
    const V4: &str = "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N";

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    fn sync_v3() -> ScoreSynchronizer {
        init_tracing();
        ScoreSynchronizer::from_raw(V3, CvssVersion::V3, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sync = sync_v3();
        assert_eq!(sync.raw(), V3);
        assert_eq!(sync.selections().len(), 8);
        assert_eq!(sync.score().formatted(), "6.1");
        assert_eq!(sync.revision(), 0);
    }

    #[test]
    fn test_selection_edit_updates_both_halves() {
        let mut sync = sync_v3();
        let score = sync.on_selection_changed("UI", "N").unwrap();
        assert_eq!(score.formatted(), "7.2");
        assert_eq!(sync.raw(), "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:L/I:L/A:N");
        assert_eq!(sync.selections().get("UI"), Some("N"));
        assert_eq!(sync.revision(), 1);
    }

    #[test]
    fn test_raw_edit_is_canonicalized() {
        let mut sync = sync_v3();
        sync.on_raw_vector_changed("CVSS:3.1/S:U/AV:N/AC:L/PR:N/UI:N/C:H/I:H/A:H")
            .unwrap();
        assert_eq!(sync.raw(), "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H");
        assert_eq!(sync.score().formatted(), "9.8");
    }

    #[test]
    fn test_rejected_raw_edit_keeps_state() {
        let mut sync = sync_v3();
        let before = sync.vector().clone();
        let err = sync.on_raw_vector_changed("CVSS:3.1/AV:N/AC:L").unwrap_err();
        assert!(matches!(err, CvssError::Parse(ParseError::Incomplete { .. })));
        assert_eq!(sync.vector(), &before);
        assert_eq!(sync.score().formatted(), "6.1");
        assert_eq!(sync.revision(), 0);
    }

    #[test]
    fn test_rejected_selection_edit_keeps_state() {
        let mut sync = sync_v3();
        let err = sync.on_selection_changed("AV", "Q").unwrap_err();
        assert!(matches!(err, CvssError::Parse(ParseError::InvalidValue { .. })));
        assert_eq!(sync.raw(), V3);
        assert_eq!(sync.revision(), 0);
    }

    #[test]
    fn test_repeated_input_is_idempotent() {
        let mut sync = sync_v3();
        let first = sync.on_selection_changed("C", "H").unwrap();
        let snapshot = sync.vector().clone();
        let second = sync.on_selection_changed("C", "H").unwrap();
        assert_eq!(first, second);
        assert_eq!(sync.vector(), &snapshot);
        assert_eq!(sync.revision(), 1);

        let raw = sync.raw().to_string();
        sync.on_raw_vector_changed(&raw).unwrap();
        assert_eq!(sync.revision(), 1);
    }

    #[test]
    fn test_companion_follows_base_edits() {
        init_tracing();
        let v4 = Vector::parse(V4, CvssVersion::V4).unwrap();
        let mut sync = ScoreSynchronizer::from_raw(
            "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H",
            CvssVersion::V3,
            EngineConfig::default(),
        )
        .unwrap()
        .with_companion(v4)
        .unwrap();

        sync.on_selection_changed("AV", "L").unwrap();
        sync.on_selection_changed("PR", "L").unwrap();
        let companion = sync.companion().unwrap();
        assert_eq!(
            companion.vector.raw(),
            "CVSS:4.0/AV:L/AC:L/AT:N/PR:L/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N"
        );
        assert_eq!(companion.score.formatted(), "8.5");
    }

    #[test]
    fn test_companion_untouched_without_mirroring() {
        init_tracing();
        let config = EngineConfig {
            mirror_base_metrics: false,
            ..EngineConfig::default()
        };
        let v3 = Vector::parse("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H", CvssVersion::V3).unwrap();
        let mut sync = ScoreSynchronizer::from_raw(V4, CvssVersion::V4, config)
            .unwrap()
            .with_companion(v3.clone())
            .unwrap();
        sync.on_selection_changed("AV", "P").unwrap();
        assert_eq!(sync.companion().unwrap().vector, v3);
    }

    #[test]
    fn test_companion_must_be_other_version() {
        let other = Vector::parse(V3, CvssVersion::V3).unwrap();
        let err = sync_v3().with_companion(other).err().unwrap();
        assert!(matches!(err, CvssError::VersionMismatch { .. }));
    }
}
