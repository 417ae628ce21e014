//! Inputs and results of the two orchestrator operations.

use crate::boundary::PropagationWarning;
use crate::error::HotfixError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a propagation PR is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    #[default]
    Merge,
    Squash,
    Rebase,
}

impl MergeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMethod::Merge => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMethod {
    type Err = HotfixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(MergeMethod::Merge),
            "squash" => Ok(MergeMethod::Squash),
            "rebase" => Ok(MergeMethod::Rebase),
            other => Err(HotfixError::config(format!(
                "Invalid merge method: '{}'. Must be 'merge', 'squash' or 'rebase'",
                other
            ))),
        }
    }
}

/// Caller-owned options for a propagation run
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationOptions {
    pub version: String,
    pub hotfix_suffix: String,
    /// Tier-1 patterns (`main`, `release/*`, or literal branch names)
    pub direct_merge_branches: Vec<String>,
    /// Tier-2 branch names, processed in order
    pub update_then_merge_branches: Vec<String>,
    pub auto_cleanup: bool,
}

/// Overall outcome of a propagation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationStatus {
    Success,
    Partial,
    Failed,
}

impl PropagationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropagationStatus::Success => "success",
            PropagationStatus::Partial => "partial",
            PropagationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PropagationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single target branch did not receive the hotfix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchFailure {
    pub branch: String,
    pub reason: String,
}

/// Result of `propagate_hotfix`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropagationResult {
    pub status: PropagationStatus,
    pub successful_branches: Vec<String>,
    pub failed_branches: Vec<String>,
    pub created_prs: Vec<u64>,
    pub failures: Vec<BranchFailure>,
    pub warnings: Vec<PropagationWarning>,
    pub error: Option<String>,
}

impl PropagationResult {
    /// Result of a run that aborted before any branch was attempted
    pub fn aborted(error: impl Into<String>) -> Self {
        PropagationResult {
            status: PropagationStatus::Failed,
            successful_branches: Vec::new(),
            failed_branches: Vec::new(),
            created_prs: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PropagationStatus::Success
    }
}

/// Accumulates per-branch outcomes while a propagation run is in progress
#[derive(Debug, Default)]
pub struct PropagationTally {
    successful: Vec<String>,
    failed: Vec<String>,
    created_prs: Vec<u64>,
    failures: Vec<BranchFailure>,
    warnings: Vec<PropagationWarning>,
}

impl PropagationTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, branch: &str, pr: Option<u64>) {
        if !self.successful.iter().any(|b| b == branch) {
            self.successful.push(branch.to_string());
        }
        if let Some(number) = pr {
            self.created_prs.push(number);
        }
    }

    pub fn record_failure(&mut self, branch: &str, reason: impl Into<String>) {
        if !self.failed.iter().any(|b| b == branch) {
            self.failed.push(branch.to_string());
        }
        self.failures.push(BranchFailure {
            branch: branch.to_string(),
            reason: reason.into(),
        });
    }

    pub fn warn(&mut self, warning: PropagationWarning) {
        self.warnings.push(warning);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Derive the final status: no failures is success, a mix is partial,
    /// and failures with no success at all is failed.
    pub fn status(&self) -> PropagationStatus {
        if self.failed.is_empty() {
            PropagationStatus::Success
        } else if !self.successful.is_empty() {
            PropagationStatus::Partial
        } else {
            PropagationStatus::Failed
        }
    }

    pub fn finish(self) -> PropagationResult {
        let status = self.status();
        let error = (status == PropagationStatus::Failed)
            .then(|| format!("Failed to propagate hotfix to: {}", self.failed.join(", ")));

        PropagationResult {
            status,
            successful_branches: self.successful,
            failed_branches: self.failed,
            created_prs: self.created_prs,
            failures: self.failures,
            warnings: self.warnings,
            error,
        }
    }
}

/// Result of `create_hotfix_branch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateHotfixResult {
    pub success: bool,
    pub hotfix_branch: Option<String>,
    pub base_version: Option<String>,
    pub error: Option<String>,
}

impl CreateHotfixResult {
    pub fn created(hotfix_branch: impl Into<String>, base_version: impl Into<String>) -> Self {
        CreateHotfixResult {
            success: true,
            hotfix_branch: Some(hotfix_branch.into()),
            base_version: Some(base_version.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        CreateHotfixResult {
            success: false,
            hotfix_branch: None,
            base_version: None,
            error: Some(error.into()),
        }
    }
}
