//! CVSS Core: Vector Scoring Computation Layer
//!
//! Provides deterministic computation over CVSS v3.1 and v4.0 vectors:
//! - Metric registry and vector string codec
//! - v3.1 formula scoring (base, temporal, environmental)
//! - v4.0 macrovector scoring with severity-distance interpolation
//! - Selection synchronization between raw strings and structured metrics
//! - Vector comparison for issuer mismatch detection
//!
//! # Determinism
//! All functions are pure: no system time, no RNG, no external calls.
//! Scores are `Decimal` tenths and selections iterate as a `BTreeMap`.
//!
//! # Version
//! v1.0.0

pub mod config;
pub mod registry;
pub mod codec;
pub mod vector;
pub mod v31;
pub mod v40;
pub mod calculator;
pub mod cross_version;
pub mod sync;
pub mod compare;

pub use calculator::{compute, score};
pub use codec::{canonicalize, detect_version, parse, parse_with, serialize};
pub use compare::{compare, compare_assessments, compare_with_comments, ComparisonResult};
pub use config::EngineConfig;
pub use sync::ScoreSynchronizer;
pub use vector::Vector;

/// Crate version constant
pub const CVSS_CORE_VERSION: &str = "1.0.0";
