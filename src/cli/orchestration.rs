//! Mode workflows
//!
//! This module runs the two action modes against an orchestrator and turns
//! their results into action outputs. It is independent of clap so the
//! workflows can be driven programmatically and tested with a mock gateway.

use crate::domain::{HotfixBranchName, PropagationOptions, PropagationResult, PropagationStatus};
use crate::error::Result;
use crate::gateway::RemoteGateway;
use crate::orchestrator::HotfixOrchestrator;
use crate::outputs::ActionOutputs;

/// Inputs of the `branch-create` mode
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCreateArgs {
    pub version: String,
    pub hotfix_suffix: String,
}

/// Inputs of the `auto-merge` mode
#[derive(Debug, Clone, PartialEq)]
pub struct AutoMergeArgs {
    pub version: String,
    pub hotfix_suffix: String,
    pub direct_merge_branches: Vec<String>,
    pub update_then_merge_branches: Vec<String>,
    pub auto_cleanup: bool,
}

/// A fully resolved request for one run
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowArgs {
    BranchCreate(BranchCreateArgs),
    AutoMerge(AutoMergeArgs),
}

/// How a run ended, for exit-status purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Succeeded,
    /// Some targets failed; manual intervention may be required
    Partial,
    Failed(String),
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: WorkflowOutcome,
    pub outputs: ActionOutputs,
    /// Present for `auto-merge` runs
    pub propagation: Option<PropagationResult>,
}

/// Run the workflow selected by `args`
pub fn run_workflow<G: RemoteGateway>(
    orchestrator: &HotfixOrchestrator<G>,
    args: &WorkflowArgs,
) -> Result<WorkflowResult> {
    match args {
        WorkflowArgs::BranchCreate(args) => Ok(run_branch_create(orchestrator, args)),
        WorkflowArgs::AutoMerge(args) => run_auto_merge(orchestrator, args),
    }
}

/// Create the hotfix branch and report `hotfix-branch` / `base-version`
pub fn run_branch_create<G: RemoteGateway>(
    orchestrator: &HotfixOrchestrator<G>,
    args: &BranchCreateArgs,
) -> WorkflowResult {
    let result = orchestrator.create_hotfix_branch(&args.version, &args.hotfix_suffix);

    let mut outputs = ActionOutputs::new();
    outputs.set("hotfix-branch", result.hotfix_branch.clone().unwrap_or_default());
    outputs.set("base-version", result.base_version.clone().unwrap_or_default());

    let outcome = if result.success {
        WorkflowOutcome::Succeeded
    } else {
        WorkflowOutcome::Failed(result.error.unwrap_or_else(|| "unknown error".to_string()))
    };

    WorkflowResult {
        outcome,
        outputs,
        propagation: None,
    }
}

/// Propagate the hotfix and report the per-branch results
pub fn run_auto_merge<G: RemoteGateway>(
    orchestrator: &HotfixOrchestrator<G>,
    args: &AutoMergeArgs,
) -> Result<WorkflowResult> {
    let options = PropagationOptions {
        version: args.version.clone(),
        hotfix_suffix: args.hotfix_suffix.clone(),
        direct_merge_branches: args.direct_merge_branches.clone(),
        update_then_merge_branches: args.update_then_merge_branches.clone(),
        auto_cleanup: args.auto_cleanup,
    };
    let result = orchestrator.propagate_hotfix(&options);

    let mut outputs = ActionOutputs::new();
    outputs.set(
        "hotfix-branch",
        HotfixBranchName::new(&args.version, &args.hotfix_suffix).to_string(),
    );
    outputs.set("propagation-result", result.status.as_str());
    outputs.set_json("successful-branches", &result.successful_branches)?;
    outputs.set_json("failed-branches", &result.failed_branches)?;
    outputs.set_json("created-prs", &result.created_prs)?;

    let outcome = match result.status {
        PropagationStatus::Success => WorkflowOutcome::Succeeded,
        PropagationStatus::Partial => WorkflowOutcome::Partial,
        PropagationStatus::Failed => WorkflowOutcome::Failed(
            result
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        ),
    };

    Ok(WorkflowResult {
        outcome,
        outputs,
        propagation: Some(result),
    })
}
