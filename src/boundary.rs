use serde::Serialize;
use std::fmt;

/// Warnings raised while propagating a hotfix.
/// These are non-fatal: the run continues and the warning is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropagationWarning {
    /// An update-then-merge branch does not exist in the repository
    MissingBranch { branch: String },
    /// The hotfix base version is not a version, so `release/*` cannot be expanded
    InvalidBaseVersion { version: String },
    /// A release branch whose version cannot be ordered against the base version
    UnparsableReleaseBranch { branch: String, reason: String },
    /// A direct-merge pattern that is neither a literal name nor `release/*`
    UnsupportedPattern { pattern: String },
    /// The hotfix branch could not be deleted after a clean run
    CleanupFailed { branch: String, reason: String },
}

impl fmt::Display for PropagationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationWarning::MissingBranch { branch } => {
                write!(f, "Branch {} does not exist, skipping", branch)
            }
            PropagationWarning::InvalidBaseVersion { version } => {
                write!(
                    f,
                    "Base version '{}' is not a valid version, release branches skipped",
                    version
                )
            }
            PropagationWarning::UnparsableReleaseBranch { branch, reason } => {
                write!(f, "Cannot order release branch '{}': {}", branch, reason)
            }
            PropagationWarning::UnsupportedPattern { pattern } => {
                write!(
                    f,
                    "Pattern '{}' is not supported (use a branch name or 'release/*')",
                    pattern
                )
            }
            PropagationWarning::CleanupFailed { branch, reason } => {
                write!(f, "Could not delete branch {}: {}", branch, reason)
            }
        }
    }
}
