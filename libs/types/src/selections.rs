//! Structured metric selections
//!
//! The structured half of a vector: metric code → selected value code.
//! Keys are unique by construction. Optional metrics left at "Not Defined"
//! are simply absent, so two semantically equal selection sets always
//! compare equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric code → selected value code
///
/// Backed by a `BTreeMap` for deterministic iteration. Iteration order is
/// alphabetical, never the wire order; serialization order belongs to the
/// registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<String, String>);

impl Selections {
    /// Create an empty selection set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Selected value for a metric, if any
    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Selected value, or `default` when the metric is absent
    pub fn get_or<'a>(&'a self, code: &str, default: &'a str) -> &'a str {
        self.get(code).unwrap_or(default)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// Set a metric, returning the previous value
    pub fn insert(&mut self, code: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(code.into(), value.into())
    }

    /// Remove a metric, returning its value
    pub fn remove(&mut self, code: &str) -> Option<String> {
        self.0.remove(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(code, value)` pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Selections {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
