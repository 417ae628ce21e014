// tests/cli_orchestration_test.rs
use hotfix_propagator::cli::orchestration::{
    run_workflow, AutoMergeArgs, BranchCreateArgs, WorkflowArgs, WorkflowOutcome,
};
use hotfix_propagator::gateway::mock::Fault;
use hotfix_propagator::gateway::MockGateway;
use hotfix_propagator::orchestrator::HotfixOrchestrator;
use hotfix_propagator::poll::PollPolicy;

const HOTFIX: &str = "hotfix/v1.0.0-hotfix.1";

fn orchestrator(gateway: MockGateway) -> HotfixOrchestrator<MockGateway> {
    HotfixOrchestrator::new(gateway).with_poll_policy(PollPolicy::immediate(2))
}

fn auto_merge(direct: &[&str], update: &[&str]) -> WorkflowArgs {
    WorkflowArgs::AutoMerge(AutoMergeArgs {
        version: "1.0.0".to_string(),
        hotfix_suffix: "hotfix.1".to_string(),
        direct_merge_branches: direct.iter().map(|s| s.to_string()).collect(),
        update_then_merge_branches: update.iter().map(|s| s.to_string()).collect(),
        auto_cleanup: false,
    })
}

#[test]
fn test_branch_create_outputs() {
    let mut gateway = MockGateway::new();
    gateway.add_tag("v1.0.0", "tag-sha");
    let args = WorkflowArgs::BranchCreate(BranchCreateArgs {
        version: "1.0.0".to_string(),
        hotfix_suffix: "hotfix.1".to_string(),
    });

    let result = run_workflow(&orchestrator(gateway), &args).unwrap();

    assert_eq!(result.outcome, WorkflowOutcome::Succeeded);
    assert_eq!(result.outputs.get("hotfix-branch"), Some(HOTFIX));
    assert_eq!(result.outputs.get("base-version"), Some("v1.0.0"));
    assert!(result.propagation.is_none());
}

#[test]
fn test_branch_create_failure_outputs_are_empty() {
    let args = WorkflowArgs::BranchCreate(BranchCreateArgs {
        version: "1.0.0".to_string(),
        hotfix_suffix: "hotfix.1".to_string(),
    });

    let result = run_workflow(&orchestrator(MockGateway::new()), &args).unwrap();

    assert_eq!(
        result.outcome,
        WorkflowOutcome::Failed("Tag 'v1.0.0' does not exist".to_string())
    );
    assert_eq!(result.outputs.get("hotfix-branch"), Some(""));
    assert_eq!(result.outputs.get("base-version"), Some(""));
}

#[test]
fn test_auto_merge_outputs_are_json_encoded() {
    let mut gateway = MockGateway::new();
    gateway.add_branch("main", "main-sha");
    gateway.add_branch("dev", "dev-sha");
    gateway.add_branch(HOTFIX, "hotfix-sha");
    gateway.set_next_pr_number(12);

    let result = run_workflow(&orchestrator(gateway), &auto_merge(&["main"], &["dev"])).unwrap();

    assert_eq!(result.outcome, WorkflowOutcome::Succeeded);
    assert_eq!(result.outputs.get("hotfix-branch"), Some(HOTFIX));
    assert_eq!(result.outputs.get("propagation-result"), Some("success"));
    assert_eq!(
        result.outputs.get("successful-branches"),
        Some(r#"["main","dev"]"#)
    );
    assert_eq!(result.outputs.get("failed-branches"), Some("[]"));
    assert_eq!(result.outputs.get("created-prs"), Some("[12,13]"));
}

#[test]
fn test_auto_merge_partial_is_not_failed() {
    let mut gateway = MockGateway::new();
    gateway.add_branch("main", "main-sha");
    gateway.add_branch("dev", "dev-sha");
    gateway.add_branch(HOTFIX, "hotfix-sha");
    gateway.fail(Fault::CreatePullRequest("dev".to_string()), "Validation Failed");

    let result = run_workflow(&orchestrator(gateway), &auto_merge(&["main"], &["dev"])).unwrap();

    assert_eq!(result.outcome, WorkflowOutcome::Partial);
    assert_eq!(result.outputs.get("propagation-result"), Some("partial"));
    assert_eq!(result.outputs.get("failed-branches"), Some(r#"["dev"]"#));
}

#[test]
fn test_auto_merge_missing_hotfix_fails() {
    let result = run_workflow(&orchestrator(MockGateway::new()), &auto_merge(&["main"], &[])).unwrap();

    assert_eq!(
        result.outcome,
        WorkflowOutcome::Failed("Hotfix branch 'hotfix/v1.0.0-hotfix.1' does not exist".to_string())
    );
    assert_eq!(result.outputs.get("propagation-result"), Some("failed"));
    assert_eq!(result.outputs.get("created-prs"), Some("[]"));
}

#[test]
fn test_rendered_outputs() {
    let mut gateway = MockGateway::new();
    gateway.add_tag("v1.0.0", "tag-sha");
    let args = WorkflowArgs::BranchCreate(BranchCreateArgs {
        version: "1.0.0".to_string(),
        hotfix_suffix: "hotfix.1".to_string(),
    });

    let result = run_workflow(&orchestrator(gateway), &args).unwrap();

    assert_eq!(
        result.outputs.render(),
        "hotfix-branch=hotfix/v1.0.0-hotfix.1\nbase-version=v1.0.0\n"
    );
}
