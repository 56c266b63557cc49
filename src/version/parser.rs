//! PEP 440 version parsing and the literal/parsed version pair

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pep508_rs::pep440_rs::Version;

use crate::error::{Error, Result};

/// Parse a version string using the PEP 440 grammar.
///
/// Surrounding whitespace is rejected since the text doubles as a
/// directory name on upload.
///
/// Examples:
/// - "1.0.0" -> Version(1.0.0)
/// - "2.0.0-beta" -> Version(2.0.0b0)
/// - "abcd" -> Err(InvalidVersion)
pub fn parse_version(text: &str) -> Result<Version> {
    if text.is_empty() || text.trim() != text {
        return Err(Error::InvalidVersion(text.to_string()));
    }
    Version::from_str(text).map_err(|_| Error::InvalidVersion(text.to_string()))
}

/// Normalized public form of a version (local segment dropped).
///
/// Unlike `==` on [`Version`], this keeps the number of release
/// segments, so "1" and "1.0.0" have different public forms.
pub fn public_form(version: &Version) -> String {
    version.clone().without_local().to_string()
}

/// A version directory: its literal name on disk and its parsed value.
///
/// Ordering and equality only look at the parsed value.
#[derive(Debug, Clone)]
pub struct DocVersion {
    literal: String,
    parsed: Version,
}

impl DocVersion {
    /// Build from a directory name, failing if it isn't a valid version.
    pub fn from_literal(literal: impl Into<String>) -> Result<Self> {
        let literal = literal.into();
        let parsed = parse_version(&literal)?;
        Ok(Self { literal, parsed })
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn parsed(&self) -> &Version {
        &self.parsed
    }

    pub fn public(&self) -> String {
        public_form(&self.parsed)
    }

    /// Whether `other` names this version by its normalized public form.
    pub fn matches_public(&self, other: &Version) -> bool {
        self.public() == public_form(other)
    }
}

impl PartialEq for DocVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl Eq for DocVersion {}

impl PartialOrd for DocVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed.cmp(&other.parsed)
    }
}

impl fmt::Display for DocVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
