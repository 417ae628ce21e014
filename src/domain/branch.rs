use crate::domain::version::strip_v_prefix;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Prefix shared by every hotfix branch in the repository
pub const HOTFIX_PREFIX: &str = "hotfix/";

/// Prefix of release line branches
pub const RELEASE_PREFIX: &str = "release/";

fn branch_version_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^release/v?(.+)$").expect("release pattern is valid"),
            Regex::new(r"^hotfix/v?(.+)$").expect("hotfix pattern is valid"),
            Regex::new(r"^v?(\d+\.\d+\.\d+(?:-[^/]+)?)$").expect("bare pattern is valid"),
        ]
    })
}

/// Name of a hotfix branch, derived from a base version and a suffix.
///
/// Always `hotfix/v{version}-{suffix}` with any leading `v` on the input
/// version normalized away, so every caller computes the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotfixBranchName {
    clean_version: String,
    suffix: String,
}

impl HotfixBranchName {
    pub fn new(version: &str, suffix: &str) -> Self {
        HotfixBranchName {
            clean_version: strip_v_prefix(version).to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Version without the `v` prefix (e.g. "1.2.3")
    pub fn clean_version(&self) -> &str {
        &self.clean_version
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl fmt::Display for HotfixBranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}-{}", HOTFIX_PREFIX, self.clean_version, self.suffix)
    }
}

/// Check whether a branch name belongs to the hotfix namespace
pub fn is_hotfix_branch(name: &str) -> bool {
    name.starts_with(HOTFIX_PREFIX)
}

/// Extract the version part of a branch name.
///
/// Tries `release/v?X`, then `hotfix/v?X`, then a bare `v?MAJOR.MINOR.PATCH[-pre]`.
/// The prefix rules win over the bare rule.
///
/// # Example
/// ```
/// # use hotfix_propagator::domain::branch::extract_version_from_branch;
/// assert_eq!(extract_version_from_branch("release/v1.2.3").as_deref(), Some("1.2.3"));
/// assert_eq!(extract_version_from_branch("main"), None);
/// ```
pub fn extract_version_from_branch(name: &str) -> Option<String> {
    branch_version_patterns()
        .iter()
        .find_map(|re| re.captures(name))
        .map(|caps| caps[1].to_string())
}

/// A tier-1 target pattern as configured by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchPattern {
    /// A concrete branch name such as `main`
    Literal(String),
    /// `release/*`: release lines newer than the hotfix base version
    NewerReleases,
    /// Any other wildcard; not expanded
    Unsupported(String),
}

impl BranchPattern {
    /// Classify a raw pattern. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let pattern = raw.trim();
        if pattern.is_empty() {
            return None;
        }

        Some(if pattern == "release/*" {
            BranchPattern::NewerReleases
        } else if pattern.contains('*') {
            BranchPattern::Unsupported(pattern.to_string())
        } else {
            BranchPattern::Literal(pattern.to_string())
        })
    }
}
