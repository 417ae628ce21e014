//! Semantic version parsing and ordering for release lines.
//!
//! Parsing is lenient (non-matching input is simply "not a version"), while
//! comparison is strict: ordering two strings that are not both versions is an
//! error, since there is no meaningful answer.

use crate::error::{HotfixError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z\-.]+))?(?:\+([0-9A-Za-z\-.]+))?$")
            .expect("version regex is valid")
    })
}

/// Semantic version representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl SemanticVersion {
    /// Create a release version without prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Attach a prerelease identifier (e.g. "hotfix.1")
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Parse `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`, with an optional leading `v`.
    ///
    /// Returns `None` for anything that does not match.
    pub fn parse(text: &str) -> Option<Self> {
        let clean = strip_v_prefix(text);
        let caps = version_regex().captures(clean)?;

        Some(SemanticVersion {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
            prerelease: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }

    /// Precedence ordering. Build metadata never participates.
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Remove a single leading `v` (e.g. "v1.2.3" -> "1.2.3")
pub fn strip_v_prefix(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Parse a version string; `None` means "not a version", not a failure.
pub fn parse_version(text: &str) -> Option<SemanticVersion> {
    SemanticVersion::parse(text)
}

/// Compare two version strings.
///
/// # Returns
/// * `Ok(Ordering)` - ordering of `a` relative to `b`
/// * `Err(HotfixError::Validation)` - if either side is not a version
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let va = parse_version(a).ok_or_else(|| HotfixError::validation(a))?;
    let vb = parse_version(b).ok_or_else(|| HotfixError::validation(b))?;
    Ok(va.precedence(&vb))
}

/// True iff `target` orders strictly after `base`
pub fn is_version_newer(base: &str, target: &str) -> Result<bool> {
    Ok(compare_versions(target, base)? == Ordering::Greater)
}

/// True iff both strings denote the same version precedence
pub fn is_version_same(a: &str, b: &str) -> Result<bool> {
    Ok(compare_versions(a, b)? == Ordering::Equal)
}
