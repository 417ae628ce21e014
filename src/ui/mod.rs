//! User interface module - run reporting.
//!
//! - `formatter` - formatting and styled printing
//! - This module - reporting a finished workflow to the terminal

pub mod formatter;

use crate::cli::orchestration::{WorkflowOutcome, WorkflowResult};
use crate::cli::Mode;

pub use formatter::{
    display_error, display_hotfix_created, display_propagation_report, display_status,
    display_success, display_warning,
};

/// Print the human-facing summary of a finished run.
///
/// Failures are printed as errors; the caller decides the exit status.
pub fn report_workflow(mode: Mode, result: &WorkflowResult) {
    if let Some(propagation) = &result.propagation {
        display_propagation_report(propagation);
    }

    match (&result.outcome, mode) {
        (WorkflowOutcome::Succeeded, Mode::BranchCreate) => {
            let branch = result.outputs.get("hotfix-branch").unwrap_or_default();
            let base = result.outputs.get("base-version").unwrap_or_default();
            display_hotfix_created(branch, base);
        }
        (WorkflowOutcome::Succeeded, Mode::AutoMerge) => {
            display_success("Hotfix propagation completed successfully");
        }
        (WorkflowOutcome::Partial, _) => display_warning(
            "Hotfix propagation completed with some failures - manual intervention may be required",
        ),
        (WorkflowOutcome::Failed(error), Mode::BranchCreate) => {
            display_error(&format!("Failed to create hotfix branch: {}", error));
        }
        (WorkflowOutcome::Failed(error), Mode::AutoMerge) => {
            display_error(&format!("Hotfix propagation failed: {}", error));
        }
    }
}
