//! Hotfix lifecycle orchestration
//!
//! [HotfixOrchestrator] implements the two operations of the tool:
//!
//! - [HotfixOrchestrator::create_hotfix_branch]: cut `hotfix/v{version}-{suffix}`
//!   from the release tag `v{version}`
//! - [HotfixOrchestrator::propagate_hotfix]: bring the hotfix into the
//!   configured target branches through pull requests, in two tiers
//!
//! # Single hotfix precondition
//!
//! At most one `hotfix/*` branch may exist in the repository at any time.
//! Branch creation checks this before creating anything; it is a convention,
//! not a lock, and two concurrent invocations can still race.
//!
//! All remote calls are issued sequentially; the orchestrator keeps no state
//! between calls.

mod create;
mod propagate;
pub mod targets;

use crate::domain::tag::branch_ref_path;
use crate::domain::MergeMethod;
use crate::error::{HotfixError, Result};
use crate::gateway::{Comparison, MergeStatus, NewPullRequest, RemoteGateway};
use crate::poll::PollPolicy;
use tracing::{debug, info, warn};

/// Page size used when listing branches
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// What happened when a hotfix was carried into one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrOutcome {
    /// The target already contains every hotfix commit; no PR was opened
    NoChanges,
    Merged(u64),
}

impl PrOutcome {
    fn pr_number(self) -> Option<u64> {
        match self {
            PrOutcome::NoChanges => None,
            PrOutcome::Merged(number) => Some(number),
        }
    }
}

/// Creates hotfix branches and propagates them through a [RemoteGateway]
pub struct HotfixOrchestrator<G: RemoteGateway> {
    gateway: G,
    poll: PollPolicy,
    merge_method: MergeMethod,
    page_size: u32,
}

impl<G: RemoteGateway> HotfixOrchestrator<G> {
    pub fn new(gateway: G) -> Self {
        HotfixOrchestrator {
            gateway,
            poll: PollPolicy::default(),
            merge_method: MergeMethod::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the mergeability polling bound
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_merge_method(mut self, merge_method: MergeMethod) -> Self {
        self.merge_method = merge_method;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.gateway.get_branch(name)?.is_some())
    }

    fn find_existing_hotfix_branches(&self) -> Result<Vec<String>> {
        Ok(self
            .gateway
            .list_branches(self.page_size)?
            .into_iter()
            .map(|b| b.name)
            .filter(|name| crate::domain::branch::is_hotfix_branch(name))
            .collect())
    }

    /// Open a PR from `head` into `base`, wait for a mergeability verdict and merge it.
    ///
    /// No PR is opened when `head` has nothing `base` lacks.
    fn create_and_merge_pr(&self, head: &str, base: &str) -> Result<PrOutcome> {
        let comparison = self.gateway.compare_commits(base, head)?;
        if comparison.ahead_by == 0 {
            info!("No changes to propagate from {} to {}", head, base);
            return Ok(PrOutcome::NoChanges);
        }

        let request = NewPullRequest {
            title: format!("Hotfix: Propagate {} to {}", head, base),
            body: pull_request_body(head, base, &comparison, self.merge_method),
            head: head.to_string(),
            base: base.to_string(),
        };
        let pr = self.gateway.create_pull_request(&request)?;
        info!("Opened PR #{}: {} -> {}", pr.number, head, base);

        self.wait_for_mergeability(pr.number)?;

        let current = self.gateway.get_pull_request(pr.number)?;
        if current.mergeable == Some(false) {
            return Err(HotfixError::conflict(format!(
                "PR #{} has merge conflicts",
                pr.number
            )));
        }

        self.gateway.merge_pull_request(pr.number, self.merge_method)?;
        info!("Successfully merged PR #{}: {} -> {}", pr.number, head, base);

        Ok(PrOutcome::Merged(pr.number))
    }

    /// Poll until the platform has decided whether the PR can merge.
    /// Running out of attempts is not an error.
    fn wait_for_mergeability(&self, number: u64) -> Result<()> {
        let verdict = self.poll.run(|attempt| {
            let pr = self.gateway.get_pull_request(number)?;
            debug!(pr = number, attempt, mergeable = ?pr.mergeable, "mergeability check");
            Ok(pr.mergeable)
        })?;

        if verdict.is_none() {
            warn!(
                "Mergeability of PR #{} still unknown after {} attempts",
                number, self.poll.attempts
            );
        }
        Ok(())
    }

    /// Merge `source` into the hotfix branch so it is current before merging back
    fn update_branch(&self, hotfix: &str, source: &str) -> Result<()> {
        let source_sha = self.head_sha(source)?;
        let hotfix_sha = self.head_sha(hotfix)?;

        let comparison = self.gateway.compare_commits(&hotfix_sha, &source_sha)?;
        if comparison.ahead_by == 0 {
            info!("{} is already up to date with {}", hotfix, source);
            return Ok(());
        }

        let message = format!("Update {} with latest changes from {}", hotfix, source);
        match self.gateway.merge_branches(hotfix, source, &message)? {
            MergeStatus::Created => {
                info!("Successfully updated {} with {}", hotfix, source);
                Ok(())
            }
            MergeStatus::UpToDate => {
                info!("{} is already up to date with {}", hotfix, source);
                Ok(())
            }
            MergeStatus::Conflict => Err(HotfixError::conflict(
                "Merge conflicts detected during branch update",
            )),
        }
    }

    fn head_sha(&self, branch: &str) -> Result<String> {
        self.gateway
            .get_ref(&branch_ref_path(branch))?
            .ok_or_else(|| HotfixError::not_found(format!("Branch '{}' has no head ref", branch)))
    }

    /// Best-effort branch deletion; the error is returned for reporting only
    fn delete_branch(&self, name: &str) -> Result<()> {
        self.gateway.delete_ref(&branch_ref_path(name))?;
        info!("Deleted branch: {}", name);
        Ok(())
    }
}

fn pull_request_body(head: &str, base: &str, comparison: &Comparison, method: MergeMethod) -> String {
    format!(
        "**Hotfix Propagation**\n\n\
         Automatically propagating hotfix changes from `{head}` to `{base}`.\n\n\
         **Changes:**\n\
         - {ahead} commit(s) ahead\n\
         - {count} commit(s) to be merged\n\n\
         **Merge Method:** {method}\n\n\
         Generated by hotfix-propagator",
        head = head,
        base = base,
        ahead = comparison.ahead_by,
        count = comparison.commits.len(),
        method = method,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Fault, GatewayCall};
    use crate::gateway::{CommitSummary, MockGateway};

    const HOTFIX: &str = "hotfix/v1.0.0-hotfix.1";

    fn orchestrator(gateway: MockGateway) -> HotfixOrchestrator<MockGateway> {
        HotfixOrchestrator::new(gateway).with_poll_policy(PollPolicy::immediate(3))
    }

    #[test]
    fn test_pull_request_body_lists_counts() {
        let comparison = Comparison {
            ahead_by: 2,
            commits: vec![
                CommitSummary { sha: "a".to_string() },
                CommitSummary { sha: "b".to_string() },
            ],
        };
        let body = pull_request_body(HOTFIX, "main", &comparison, MergeMethod::Squash);
        assert!(body.contains("`hotfix/v1.0.0-hotfix.1` to `main`"));
        assert!(body.contains("- 2 commit(s) ahead"));
        assert!(body.contains("**Merge Method:** squash"));
    }

    #[test]
    fn test_create_and_merge_pr_skips_when_nothing_ahead() {
        let mut gateway = MockGateway::new();
        gateway.set_ahead_by("main", HOTFIX, 0);
        let orch = orchestrator(gateway);

        assert_eq!(orch.create_and_merge_pr(HOTFIX, "main").unwrap(), PrOutcome::NoChanges);
        assert!(orch.gateway().opened_pull_requests().is_empty());
    }

    #[test]
    fn test_create_and_merge_pr_merges_after_indeterminate_verdicts() {
        let mut gateway = MockGateway::new();
        gateway.script_mergeability("main", vec![None, None, Some(true)]);
        let orch = orchestrator(gateway).with_merge_method(MergeMethod::Rebase);

        assert_eq!(orch.create_and_merge_pr(HOTFIX, "main").unwrap(), PrOutcome::Merged(1));
        assert!(orch.gateway().calls().contains(&GatewayCall::MergePullRequest {
            number: 1,
            method: MergeMethod::Rebase,
        }));
    }

    #[test]
    fn test_indeterminate_verdict_is_not_a_conflict() {
        let mut gateway = MockGateway::new();
        gateway.script_mergeability("main", vec![None]);
        let orch = orchestrator(gateway);

        assert_eq!(orch.create_and_merge_pr(HOTFIX, "main").unwrap(), PrOutcome::Merged(1));

        // three polls plus the final read
        let reads = orch
            .gateway()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::GetPullRequest(_)))
            .count();
        assert_eq!(reads, 4);
    }

    #[test]
    fn test_explicit_unmergeable_verdict_is_a_conflict() {
        let mut gateway = MockGateway::new();
        gateway.script_mergeability("main", vec![Some(false)]);
        let orch = orchestrator(gateway);

        let err = orch.create_and_merge_pr(HOTFIX, "main").unwrap_err();
        assert_eq!(err.detail(), "PR #1 has merge conflicts");
        assert!(orch.gateway().merged_pull_requests().is_empty());
    }

    #[test]
    fn test_update_branch_skips_merge_when_current() {
        let mut gateway = MockGateway::new();
        gateway.add_branch(HOTFIX, "sha-hotfix");
        gateway.add_branch("dev", "sha-dev");
        gateway.set_ahead_by("sha-hotfix", "sha-dev", 0);
        let orch = orchestrator(gateway);

        orch.update_branch(HOTFIX, "dev").unwrap();
        assert!(!orch
            .gateway()
            .calls()
            .iter()
            .any(|c| matches!(c, GatewayCall::MergeBranches { .. })));
    }

    #[test]
    fn test_update_branch_conflict() {
        let mut gateway = MockGateway::new();
        gateway.add_branch(HOTFIX, "sha-hotfix");
        gateway.add_branch("dev", "sha-dev");
        gateway.set_merge_outcome(HOTFIX, "dev", MergeStatus::Conflict);
        let orch = orchestrator(gateway);

        let err = orch.update_branch(HOTFIX, "dev").unwrap_err();
        assert_eq!(err.detail(), "Merge conflicts detected during branch update");
    }

    #[test]
    fn test_update_branch_merge_message() {
        let mut gateway = MockGateway::new();
        gateway.add_branch(HOTFIX, "sha-hotfix");
        gateway.add_branch("dev", "sha-dev");
        let orch = orchestrator(gateway);

        orch.update_branch(HOTFIX, "dev").unwrap();
        assert!(orch.gateway().calls().contains(&GatewayCall::MergeBranches {
            base: HOTFIX.to_string(),
            head: "dev".to_string(),
            message: format!("Update {} with latest changes from dev", HOTFIX),
        }));
    }

    #[test]
    fn test_find_existing_hotfix_branches_propagates_listing_errors() {
        let mut gateway = MockGateway::new();
        gateway.fail(Fault::ListBranches, "rate limited");
        let orch = orchestrator(gateway);

        assert!(orch.find_existing_hotfix_branches().is_err());
    }
}
