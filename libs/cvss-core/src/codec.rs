//! Vector Codec: string ⇄ selections
//!
//! Parsing accepts tokens in any order, as third-party producers (NVD,
//! scanners) emit them. Serialization always walks the registry, so two
//! semantically equal selection sets produce byte-identical strings.
//!
//! Optional metrics set to Not Defined (`X`) are accepted on input and
//! never stored, which keeps `parse(serialize(x)) == x`.

use std::collections::BTreeSet;

use cvss_types::errors::{CvssError, ParseError};
use cvss_types::selections::Selections;
use cvss_types::version::CvssVersion;
use tracing::debug;

use crate::config::EngineConfig;
use crate::registry;

/// Parse a vector string with the default configuration.
pub fn parse(raw: &str, version: CvssVersion) -> Result<Selections, ParseError> {
    parse_with(raw, version, &EngineConfig::default())
}

/// Parse a vector string of `version` into normalized selections.
pub fn parse_with(
    raw: &str,
    version: CvssVersion,
    config: &EngineConfig,
) -> Result<Selections, ParseError> {
    parse_tokens(raw, version, config).map_err(|error| {
        debug!(%version, %error, "vector rejected");
        error
    })
}

fn parse_tokens(
    raw: &str,
    version: CvssVersion,
    config: &EngineConfig,
) -> Result<Selections, ParseError> {
    let body = strip_decorations(raw, config);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens = body.split('/');
    let prefix = tokens.next().unwrap_or_default();
    if prefix != version.prefix() {
        return Err(ParseError::InvalidPrefix {
            expected: version.prefix().to_string(),
            found: prefix.to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut selections = Selections::new();
    for token in tokens {
        let (code, value) = split_token(token)?;
        if !seen.insert(code) {
            return Err(ParseError::DuplicateMetric {
                code: code.to_string(),
            });
        }
        accept(version, code, value, &mut selections)?;
    }

    ensure_complete(version, &selections)?;
    Ok(selections)
}

/// Check structured selections against the registry and normalize them.
///
/// Used when selections come from the UI rather than from a string: the
/// same rules apply, minus the token syntax.
pub fn validate(version: CvssVersion, selections: &Selections) -> Result<Selections, ParseError> {
    let mut normalized = Selections::new();
    for (code, value) in selections.iter() {
        accept(version, code, value, &mut normalized)?;
    }
    ensure_complete(version, &normalized)?;
    Ok(normalized)
}

/// Render selections in canonical registry order.
///
/// Not Defined optional metrics are omitted. Codes unknown to `version`
/// are ignored.
pub fn serialize(selections: &Selections, version: CvssVersion) -> String {
    let mut out = String::from(version.prefix());
    for metric in registry::all_metrics(version) {
        let Some(value) = selections.get(metric.code) else {
            continue;
        };
        if metric.is_not_defined(value) {
            continue;
        }
        out.push('/');
        out.push_str(metric.code);
        out.push(':');
        out.push_str(value);
    }
    out
}

/// `serialize(parse(raw))`: the canonical form of a vector string.
pub fn canonicalize(raw: &str, version: CvssVersion) -> Result<String, ParseError> {
    parse(raw, version).map(|selections| serialize(&selections, version))
}

/// Determine the version of a vector string from its prefix.
pub fn detect_version(raw: &str) -> Result<CvssVersion, CvssError> {
    let body = strip_decorations(raw, &EngineConfig::default());
    if body.is_empty() {
        return Err(ParseError::Empty.into());
    }
    let prefix = body.split('/').next().unwrap_or_default();
    CvssVersion::ALL
        .into_iter()
        .find(|v| v.prefix() == prefix)
        .ok_or_else(|| CvssError::UnsupportedVersion {
            version: prefix.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn strip_decorations<'a>(raw: &'a str, config: &EngineConfig) -> &'a str {
    let trimmed = raw.trim();
    if config.accept_fragment_prefix {
        trimmed.strip_prefix('#').unwrap_or(trimmed)
    } else {
        trimmed
    }
}

fn split_token(token: &str) -> Result<(&str, &str), ParseError> {
    let malformed = || ParseError::MalformedToken {
        token: token.to_string(),
    };
    let (code, value) = token.split_once(':').ok_or_else(malformed)?;
    if code.is_empty() || value.is_empty() || value.contains(':') {
        return Err(malformed());
    }
    Ok((code, value))
}

fn accept(
    version: CvssVersion,
    code: &str,
    value: &str,
    selections: &mut Selections,
) -> Result<(), ParseError> {
    let metric = registry::find_metric(version, code).ok_or_else(|| ParseError::UnknownMetric {
        code: code.to_string(),
    })?;
    if !metric.allows(value) {
        return Err(ParseError::InvalidValue {
            code: code.to_string(),
            value: value.to_string(),
        });
    }
    if !metric.is_not_defined(value) {
        selections.insert(code, value);
    }
    Ok(())
}

fn ensure_complete(version: CvssVersion, selections: &Selections) -> Result<(), ParseError> {
    let missing: Vec<String> = registry::base_metrics(version)
        .iter()
        .filter(|m| !selections.contains(m.code))
        .map(|m| m.code.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::Incomplete { missing })
    }
}
