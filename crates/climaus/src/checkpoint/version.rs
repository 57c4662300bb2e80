//! Version strings and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Version assigned when nothing usable can be parsed.
pub const DEFAULT_VERSION: &str = "v0.1.0";

/// Version that auto-increment pretends precedes the first save.
pub const INITIAL_VERSION: &str = "v0.0.0";

/// A parsed `v<major>.<minor>.<patch>` version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next minor version with the patch reset to zero, or `None` if the
    /// minor component would overflow.
    pub fn bump_minor(self) -> Option<Self> {
        Some(Self::new(self.major, self.minor.checked_add(1)?, 0))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a string is not a `v<major>.<minor>.<patch>` version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version string: {:?}", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let body = s.strip_prefix('v').ok_or_else(err)?;

        let mut parts = body.split('.');
        let mut next = || -> Result<u64, ParseVersionError> {
            parts.next().ok_or_else(err)?.parse().map_err(|_| err())
        };
        let version = Version::new(next()?, next()?, next()?);

        if parts.next().is_some() {
            return Err(err());
        }
        Ok(version)
    }
}

/// Compute the next version after `version`.
///
/// Only the leading `v<major>.<minor>` is read; anything past the second
/// component is discarded and the patch is written as `0`. Malformed input
/// and a minor component that cannot be bumped never fail: a warning is
/// logged and [`DEFAULT_VERSION`] is returned.
pub fn increment_version(version: &str) -> String {
    match parse_major_minor(version).and_then(Version::bump_minor) {
        Some(next) => next.to_string(),
        None => {
            tracing::warn!(
                version,
                "Invalid version string, resetting to {}",
                DEFAULT_VERSION
            );
            DEFAULT_VERSION.to_string()
        }
    }
}

fn parse_major_minor(version: &str) -> Option<Version> {
    let mut parts = version.trim_start_matches('v').split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some(Version::new(major, minor, 0))
}

/// How version directory names are ordered when looking for the latest one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VersionOrdering {
    /// Compare parsed components numerically, so `v0.10.0` follows `v0.9.0`.
    /// Names that do not parse sort before all parsed versions.
    #[default]
    Numeric,
    /// Plain string comparison of directory names.
    Lexicographic,
}

impl VersionOrdering {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            VersionOrdering::Lexicographic => a.cmp(b),
            VersionOrdering::Numeric => {
                let key = |s: &str| (s.parse::<Version>().ok(), s.to_string());
                key(a).cmp(&key(b))
            }
        }
    }

    /// Sort `versions` ascending in place.
    pub fn sort(&self, versions: &mut [String]) {
        versions.sort_by(|a, b| self.compare(a, b));
    }
}

/// Last element of an already sorted version list.
pub fn latest_version(versions: &[String]) -> Option<&str> {
    versions.last().map(String::as_str)
}
