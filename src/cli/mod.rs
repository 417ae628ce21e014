//! Command-line and action input handling

pub mod orchestration;

use crate::config::Config;
use crate::error::{HotfixError, Result};
use orchestration::{AutoMergeArgs, BranchCreateArgs, WorkflowArgs};
use std::fmt;
use std::str::FromStr;

/// Which operation a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cut a hotfix branch from a release tag
    BranchCreate,
    /// Propagate an existing hotfix branch
    AutoMerge,
}

impl FromStr for Mode {
    type Err = HotfixError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "branch-create" => Ok(Mode::BranchCreate),
            "auto-merge" => Ok(Mode::AutoMerge),
            other => Err(HotfixError::config(format!(
                "Invalid mode: {}. Must be 'branch-create' or 'auto-merge'",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::BranchCreate => write!(f, "branch-create"),
            Mode::AutoMerge => write!(f, "auto-merge"),
        }
    }
}

/// Split a comma-separated input, trimming entries and dropping blanks
pub fn split_branch_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Action boolean inputs are true only for the literal `true`
pub fn parse_flag(raw: &str) -> bool {
    raw.trim() == "true"
}

/// Inputs as supplied on the command line or by the action runner.
///
/// Empty strings count as "not supplied", matching how runners pass
/// unset optional inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub version: String,
    pub hotfix_suffix: Option<String>,
    pub direct_merge_branches: Option<String>,
    pub update_then_merge_branches: Option<String>,
    pub auto_cleanup: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Combine raw inputs with configured defaults into the arguments of one run
pub fn resolve_workflow_args(mode: Mode, inputs: &RawInputs, config: &Config) -> Result<WorkflowArgs> {
    let version = inputs.version.trim();
    if version.is_empty() {
        return Err(HotfixError::config("Input required and not supplied: version"));
    }

    let hotfix_suffix = supplied(&inputs.hotfix_suffix)
        .unwrap_or(&config.defaults.hotfix_suffix)
        .to_string();

    Ok(match mode {
        Mode::BranchCreate => WorkflowArgs::BranchCreate(BranchCreateArgs {
            version: version.to_string(),
            hotfix_suffix,
        }),
        Mode::AutoMerge => WorkflowArgs::AutoMerge(AutoMergeArgs {
            version: version.to_string(),
            hotfix_suffix,
            direct_merge_branches: supplied(&inputs.direct_merge_branches)
                .map(split_branch_list)
                .unwrap_or_else(|| config.defaults.direct_merge_branches.clone()),
            update_then_merge_branches: supplied(&inputs.update_then_merge_branches)
                .map(split_branch_list)
                .unwrap_or_else(|| config.defaults.update_then_merge_branches.clone()),
            auto_cleanup: supplied(&inputs.auto_cleanup)
                .map(parse_flag)
                .unwrap_or(config.defaults.auto_cleanup),
        }),
    })
}
