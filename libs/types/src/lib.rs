//! Types library for the CVSS vector scoring engine
//!
//! This library provides the value types shared by the scoring engine and the
//! layers that consume it, keeping scores deterministic and the persisted
//! record format stable.
//!
//! # Version
//! v1.0.0
//!
//! # Modules
//! - `version`: Supported CVSS versions and their wire prefixes
//! - `metric`: Metric definition shapes (groups, codes, allowed values)
//! - `selections`: Structured metric selections (code → value)
//! - `score`: Fixed-point scores and severity ratings
//! - `assessment`: Persisted `{score, vector, issuer, version}` records
//! - `errors`: Error taxonomy

// Public modules
pub mod version;
pub mod metric;
pub mod selections;
pub mod score;
pub mod assessment;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::version::*;
    pub use crate::metric::*;
    pub use crate::selections::*;
    pub use crate::score::*;
    pub use crate::assessment::*;
    pub use crate::errors::*;
}
