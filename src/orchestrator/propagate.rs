use super::targets::{needs_branch_listing, resolve_targets};
use super::HotfixOrchestrator;
use crate::boundary::PropagationWarning;
use crate::domain::{
    BranchPattern, HotfixBranchName, PropagationOptions, PropagationResult, PropagationTally,
};
use crate::error::Result;
use crate::gateway::RemoteGateway;
use tracing::{error, info, warn};

impl<G: RemoteGateway> HotfixOrchestrator<G> {
    /// Propagate an existing hotfix branch to its target branches.
    ///
    /// Tier 1 opens and merges a PR from the hotfix into each direct-merge
    /// target. Tier 2 first merges each update-then-merge branch into the
    /// hotfix, then merges the hotfix back through a PR. Branches are handled
    /// one at a time, in order, and a failure on one branch never stops the
    /// rest. The hotfix branch is deleted afterwards only when `auto_cleanup`
    /// is set and nothing failed.
    pub fn propagate_hotfix(&self, options: &PropagationOptions) -> PropagationResult {
        let hotfix = HotfixBranchName::new(&options.version, &options.hotfix_suffix).to_string();

        match self.try_propagate_hotfix(options, &hotfix) {
            Ok(result) => result,
            Err(e) => {
                error!("Hotfix propagation aborted: {}", e);
                PropagationResult::aborted(e.detail())
            }
        }
    }

    fn try_propagate_hotfix(
        &self,
        options: &PropagationOptions,
        hotfix: &str,
    ) -> Result<PropagationResult> {
        info!("Verifying hotfix branch {} exists...", hotfix);
        if !self.branch_exists(hotfix)? {
            return Ok(PropagationResult::aborted(format!(
                "Hotfix branch '{}' does not exist",
                hotfix
            )));
        }

        let mut tally = PropagationTally::new();

        info!("Stage 1: Processing direct merge branches...");
        let targets = self.find_target_branches(&options.direct_merge_branches, &options.version)?;
        for warning in targets.warnings {
            tally.warn(warning);
        }
        for target in &targets.branches {
            self.propagate_direct(hotfix, target, &mut tally);
        }

        info!("Stage 2: Processing update then merge branches...");
        for target in options
            .update_then_merge_branches
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
        {
            self.propagate_with_update(hotfix, target, &mut tally);
        }

        if options.auto_cleanup && !tally.has_failures() {
            info!("Cleaning up hotfix branch {}...", hotfix);
            if let Err(e) = self.delete_branch(hotfix) {
                warn!("Could not delete branch {}: {}", hotfix, e);
                tally.warn(PropagationWarning::CleanupFailed {
                    branch: hotfix.to_string(),
                    reason: e.detail(),
                });
            }
        }

        Ok(tally.finish())
    }

    fn find_target_branches(
        &self,
        raw_patterns: &[String],
        base_version: &str,
    ) -> Result<super::targets::ResolvedTargets> {
        let patterns: Vec<BranchPattern> = raw_patterns
            .iter()
            .filter_map(|p| BranchPattern::parse(p))
            .collect();

        let existing: Vec<String> = if needs_branch_listing(&patterns) {
            self.gateway
                .list_branches(self.page_size)?
                .into_iter()
                .map(|b| b.name)
                .collect()
        } else {
            Vec::new()
        };

        Ok(resolve_targets(&patterns, &existing, base_version))
    }

    /// Tier 1: PR the hotfix straight into `target`
    fn propagate_direct(&self, hotfix: &str, target: &str, tally: &mut PropagationTally) {
        match self.create_and_merge_pr(hotfix, target) {
            Ok(outcome) => tally.record_success(target, outcome.pr_number()),
            Err(e) => {
                error!("Failed to propagate to {}: {}", target, e);
                tally.record_failure(target, e.detail());
            }
        }
    }

    /// Tier 2: bring `target` into the hotfix, then PR the hotfix into `target`
    fn propagate_with_update(&self, hotfix: &str, target: &str, tally: &mut PropagationTally) {
        match self.branch_exists(target) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Branch {} does not exist, skipping...", target);
                tally.warn(PropagationWarning::MissingBranch {
                    branch: target.to_string(),
                });
                return;
            }
            Err(e) => {
                error!("Failed to look up branch {}: {}", target, e);
                tally.record_failure(target, e.detail());
                return;
            }
        }

        info!("Updating hotfix branch {} with {}...", hotfix, target);
        if let Err(e) = self.update_branch(hotfix, target) {
            error!("Failed to update hotfix branch with {}: {}", target, e);
            tally.record_failure(target, e.detail());
            return;
        }

        self.propagate_direct(hotfix, target, tally);
    }
}
