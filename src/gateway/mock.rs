use crate::domain::MergeMethod;
use crate::error::{HotfixError, Result};
use crate::gateway::{
    BranchInfo, CommitSummary, Comparison, MergeStatus, NewPullRequest, PullRequest,
    RemoteGateway,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call observed by [MockGateway], in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetRef(String),
    CreateRef { name: String, sha: String },
    DeleteRef(String),
    GetBranch(String),
    ListBranches,
    Compare { base: String, head: String },
    MergeBranches { base: String, head: String, message: String },
    CreatePullRequest { head: String, base: String, title: String },
    GetPullRequest(u64),
    MergePullRequest { number: u64, method: MergeMethod },
}

/// Operations that can be made to fail with a remote error
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    GetRef(String),
    CreateRef,
    DeleteRef,
    GetBranch(String),
    ListBranches,
    /// Comparison whose `base` is this branch
    Compare(String),
    /// Branch merge into this base
    MergeBranches(String),
    /// Pull request targeting this base
    CreatePullRequest(String),
    /// Merge of a pull request targeting this base
    MergePullRequest(String),
}

#[derive(Default)]
struct MockState {
    tags: HashMap<String, String>,
    branches: Vec<(String, String)>,
    ahead_by: HashMap<(String, String), u64>,
    merge_outcomes: HashMap<(String, String), MergeStatus>,
    verdicts: HashMap<String, VecDeque<Option<bool>>>,
    faults: HashMap<Fault, String>,
    pulls: HashMap<u64, String>,
    next_pr: u64,
    calls: Vec<GatewayCall>,
}

/// In-memory remote repository for testing without network access
///
/// Unless configured otherwise, every comparison reports one commit ahead,
/// every branch merge creates a merge commit and every pull request is
/// immediately mergeable. A created merge commit advances the base branch
/// head from `sha` to `sha+head`.
pub struct MockGateway {
    state: Mutex<MockState>,
    default_ahead_by: u64,
}

impl MockGateway {
    /// Create an empty mock repository
    pub fn new() -> Self {
        MockGateway {
            state: Mutex::new(MockState {
                next_pr: 1,
                ..MockState::default()
            }),
            default_ahead_by: 1,
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a tag pointing at a SHA
    pub fn add_tag(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.state_mut().tags.insert(name.into(), sha.into());
    }

    /// Add a branch; listing order follows insertion order
    pub fn add_branch(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.state_mut().branches.push((name.into(), sha.into()));
    }

    /// Set how many commits `head` is ahead of `base`
    pub fn set_ahead_by(&mut self, base: &str, head: &str, ahead_by: u64) {
        self.state_mut()
            .ahead_by
            .insert((base.to_string(), head.to_string()), ahead_by);
    }

    /// Set the comparison result used when no explicit pair is configured
    pub fn set_default_ahead_by(&mut self, ahead_by: u64) {
        self.default_ahead_by = ahead_by;
    }

    /// Set the outcome of merging `head` into `base`
    pub fn set_merge_outcome(&mut self, base: &str, head: &str, status: MergeStatus) {
        self.state_mut()
            .merge_outcomes
            .insert((base.to_string(), head.to_string()), status);
    }

    /// Script the mergeability verdicts returned for PRs targeting `base`.
    /// The last verdict repeats once the script is exhausted.
    pub fn script_mergeability(&mut self, base: &str, verdicts: Vec<Option<bool>>) {
        self.state_mut()
            .verdicts
            .insert(base.to_string(), verdicts.into());
    }

    /// Make an operation fail with a remote error carrying `message`
    pub fn fail(&mut self, fault: Fault, message: impl Into<String>) {
        self.state_mut().faults.insert(fault, message.into());
    }

    /// Number assigned to the next created pull request
    pub fn set_next_pr_number(&mut self, number: u64) {
        self.state_mut().next_pr = number;
    }

    /// All calls issued so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    /// Names of refs created so far
    pub fn created_refs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::CreateRef { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Ref paths deleted so far
    pub fn deleted_refs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::DeleteRef(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// `(head, base)` of every pull request opened so far
    pub fn opened_pull_requests(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::CreatePullRequest { head, base, .. } => Some((head, base)),
                _ => None,
            })
            .collect()
    }

    /// Numbers of pull requests merged so far
    pub fn merged_pull_requests(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::MergePullRequest { number, .. } => Some(number),
                _ => None,
            })
            .collect()
    }

    /// Names of the branches currently present
    pub fn branch_names(&self) -> Vec<String> {
        self.state().branches.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn check(&self, fault: &Fault) -> Result<()> {
        match self.faults.get(fault) {
            Some(message) => Err(HotfixError::remote(message.clone())),
            None => Ok(()),
        }
    }

    fn branch_sha(&self, name: &str) -> Option<String> {
        self.branches
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sha)| sha.clone())
    }
}

impl RemoteGateway for MockGateway {
    fn get_ref(&self, ref_path: &str) -> Result<Option<String>> {
        let mut state = self.state();
        state.calls.push(GatewayCall::GetRef(ref_path.to_string()));
        state.check(&Fault::GetRef(ref_path.to_string()))?;

        if let Some(tag) = ref_path.strip_prefix("tags/") {
            Ok(state.tags.get(tag).cloned())
        } else if let Some(branch) = ref_path.strip_prefix("heads/") {
            Ok(state.branch_sha(branch))
        } else {
            Ok(None)
        }
    }

    fn create_ref(&self, ref_name: &str, sha: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(GatewayCall::CreateRef {
            name: ref_name.to_string(),
            sha: sha.to_string(),
        });
        state.check(&Fault::CreateRef)?;

        if let Some(branch) = ref_name.strip_prefix("refs/heads/") {
            if state.branch_sha(branch).is_some() {
                return Err(HotfixError::remote("Reference already exists"));
            }
            state.branches.push((branch.to_string(), sha.to_string()));
        }
        Ok(())
    }

    fn delete_ref(&self, ref_path: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(GatewayCall::DeleteRef(ref_path.to_string()));
        state.check(&Fault::DeleteRef)?;

        let branch = ref_path.strip_prefix("heads/").unwrap_or(ref_path);
        let before = state.branches.len();
        state.branches.retain(|(n, _)| n != branch);
        if state.branches.len() == before {
            return Err(HotfixError::remote("Reference does not exist"));
        }
        Ok(())
    }

    fn get_branch(&self, name: &str) -> Result<Option<BranchInfo>> {
        let mut state = self.state();
        state.calls.push(GatewayCall::GetBranch(name.to_string()));
        state.check(&Fault::GetBranch(name.to_string()))?;

        Ok(state.branch_sha(name).map(|_| BranchInfo {
            name: name.to_string(),
        }))
    }

    fn list_branches(&self, _per_page: u32) -> Result<Vec<BranchInfo>> {
        let mut state = self.state();
        state.calls.push(GatewayCall::ListBranches);
        state.check(&Fault::ListBranches)?;

        Ok(state
            .branches
            .iter()
            .map(|(name, _)| BranchInfo { name: name.clone() })
            .collect())
    }

    fn compare_commits(&self, base: &str, head: &str) -> Result<Comparison> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Compare {
            base: base.to_string(),
            head: head.to_string(),
        });
        state.check(&Fault::Compare(base.to_string()))?;

        let ahead_by = state
            .ahead_by
            .get(&(base.to_string(), head.to_string()))
            .copied()
            .unwrap_or(self.default_ahead_by);

        Ok(Comparison {
            ahead_by,
            commits: (0..ahead_by)
                .map(|i| CommitSummary {
                    sha: format!("{}-{}", head, i),
                })
                .collect(),
        })
    }

    fn merge_branches(&self, base: &str, head: &str, message: &str) -> Result<MergeStatus> {
        let mut state = self.state();
        state.calls.push(GatewayCall::MergeBranches {
            base: base.to_string(),
            head: head.to_string(),
            message: message.to_string(),
        });
        state.check(&Fault::MergeBranches(base.to_string()))?;

        let status = state
            .merge_outcomes
            .get(&(base.to_string(), head.to_string()))
            .copied()
            .unwrap_or(MergeStatus::Created);

        // a merge commit moves the base head to "{old}+{head}"
        if status == MergeStatus::Created {
            if let Some(entry) = state.branches.iter_mut().find(|(n, _)| n == base) {
                entry.1 = format!("{}+{}", entry.1, head);
            }
        }
        Ok(status)
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let mut state = self.state();
        state.calls.push(GatewayCall::CreatePullRequest {
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
        });
        state.check(&Fault::CreatePullRequest(request.base.clone()))?;

        let number = state.next_pr;
        state.next_pr += 1;
        state.pulls.insert(number, request.base.clone());

        Ok(PullRequest {
            number,
            mergeable: None,
        })
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let mut state = self.state();
        state.calls.push(GatewayCall::GetPullRequest(number));

        let base = state
            .pulls
            .get(&number)
            .cloned()
            .ok_or_else(|| HotfixError::not_found(format!("pull request #{}", number)))?;

        let mergeable = match state.verdicts.get_mut(&base) {
            Some(script) if script.len() > 1 => script.pop_front().flatten(),
            Some(script) => script.front().copied().flatten(),
            None => Some(true),
        };

        Ok(PullRequest { number, mergeable })
    }

    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> Result<()> {
        let mut state = self.state();
        state
            .calls
            .push(GatewayCall::MergePullRequest { number, method });

        if let Some(base) = state.pulls.get(&number).cloned() {
            state.check(&Fault::MergePullRequest(base))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gateway_refs() {
        let mut gateway = MockGateway::new();
        gateway.add_tag("v1.0.0", "abc123");
        gateway.add_branch("main", "def456");

        assert_eq!(gateway.get_ref("tags/v1.0.0").unwrap(), Some("abc123".to_string()));
        assert_eq!(gateway.get_ref("tags/v2.0.0").unwrap(), None);
        assert_eq!(gateway.get_ref("heads/main").unwrap(), Some("def456".to_string()));
    }

    #[test]
    fn test_mock_gateway_create_and_delete_branch() {
        let gateway = MockGateway::new();
        gateway.create_ref("refs/heads/hotfix/v1.0.0-hotfix.1", "abc").unwrap();
        assert!(gateway.get_branch("hotfix/v1.0.0-hotfix.1").unwrap().is_some());

        assert!(gateway.create_ref("refs/heads/hotfix/v1.0.0-hotfix.1", "abc").is_err());

        gateway.delete_ref("heads/hotfix/v1.0.0-hotfix.1").unwrap();
        assert!(gateway.branch_names().is_empty());
        assert!(gateway.delete_ref("heads/hotfix/v1.0.0-hotfix.1").is_err());
    }

    #[test]
    fn test_mock_gateway_scripted_verdicts() {
        let mut gateway = MockGateway::new();
        gateway.script_mergeability("main", vec![None, None, Some(false)]);

        let pr = gateway
            .create_pull_request(&NewPullRequest {
                title: "t".to_string(),
                body: "b".to_string(),
                head: "hotfix/x".to_string(),
                base: "main".to_string(),
            })
            .unwrap();

        assert_eq!(pr.number, 1);
        assert_eq!(gateway.get_pull_request(1).unwrap().mergeable, None);
        assert_eq!(gateway.get_pull_request(1).unwrap().mergeable, None);
        assert_eq!(gateway.get_pull_request(1).unwrap().mergeable, Some(false));
        assert_eq!(gateway.get_pull_request(1).unwrap().mergeable, Some(false));
    }

    #[test]
    fn test_mock_gateway_merge_advances_base_head() {
        let mut gateway = MockGateway::new();
        gateway.add_branch("hotfix/x", "h0");
        gateway.set_merge_outcome("hotfix/x", "staging", MergeStatus::Conflict);

        gateway.merge_branches("hotfix/x", "dev", "m").unwrap();
        assert_eq!(gateway.get_ref("heads/hotfix/x").unwrap().as_deref(), Some("h0+dev"));

        gateway.merge_branches("hotfix/x", "staging", "m").unwrap();
        assert_eq!(gateway.get_ref("heads/hotfix/x").unwrap().as_deref(), Some("h0+dev"));
    }

    #[test]
    fn test_mock_gateway_faults() {
        let mut gateway = MockGateway::new();
        gateway.fail(Fault::ListBranches, "rate limited");

        let err = gateway.list_branches(100).unwrap_err();
        assert_eq!(err.detail(), "rate limited");
        assert_eq!(gateway.calls(), vec![GatewayCall::ListBranches]);
    }

    #[test]
    fn test_mock_gateway_default() {
        let gateway = MockGateway::default();
        assert!(gateway.list_branches(100).unwrap().is_empty());
        assert_eq!(gateway.compare_commits("main", "dev").unwrap().ahead_by, 1);
    }
}
