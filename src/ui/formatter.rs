//! Pure formatting functions for UI output.
//!
//! The `summary_lines` / `format_*` helpers build plain strings and are
//! testable; the `display_*` functions print them with terminal styling.
//! Everything here goes to stderr: stdout is reserved for action outputs.

use crate::domain::PropagationResult;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Format and print a warning message.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Render PR numbers as `#12, #13`
pub fn format_pr_list(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summary lines of a propagation run, without styling.
pub fn summary_lines(result: &PropagationResult) -> Vec<String> {
    let mut lines = vec![
        format!("Status: {}", result.status),
        format!("Successful branches: {}", result.successful_branches.len()),
        format!("Failed branches: {}", result.failed_branches.len()),
        format!("Created PRs: {}", result.created_prs.len()),
    ];

    if !result.successful_branches.is_empty() {
        lines.push(format!(
            "Successfully propagated to: {}",
            result.successful_branches.join(", ")
        ));
    }
    for failure in &result.failures {
        lines.push(format!("Failed {}: {}", failure.branch, failure.reason));
    }
    if !result.created_prs.is_empty() {
        lines.push(format!("Created PRs: {}", format_pr_list(&result.created_prs)));
    }

    lines
}

/// Display the outcome of a propagation run.
pub fn display_propagation_report(result: &PropagationResult) {
    eprintln!("\n{}", style("Propagation Results:").bold());
    for line in summary_lines(result) {
        if line.starts_with("Failed ") && !line.starts_with("Failed branches") {
            display_warning(&line);
        } else {
            eprintln!("  {}", line);
        }
    }
    for warning in &result.warnings {
        display_warning(&warning.to_string());
    }
}

/// Display a freshly created hotfix branch.
pub fn display_hotfix_created(branch: &str, base_version: &str) {
    display_success(&format!("Hotfix branch created successfully: {}", branch));
    eprintln!("  Base version: {}", style(base_version).cyan());
}
