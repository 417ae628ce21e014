//! Remote repository gateway
//!
//! This module provides a trait-based abstraction over the hosting
//! platform's ref, branch, comparison and pull-request operations, allowing
//! the orchestrator to run against the real platform API or an in-memory
//! double in tests.
//!
//! # Overview
//!
//! The primary abstraction is the [RemoteGateway] trait. The concrete
//! implementations are:
//!
//! - [github::GithubGateway]: GitHub REST API over a blocking HTTP client
//! - [mock::MockGateway]: in-memory repository state for testing
//!
//! # Absence vs failure
//!
//! Lookups return `Result<Option<T>>`. `Ok(None)` means the object does not
//! exist, which is an ordinary answer. `Err` is reserved for real failures
//! (authentication, network, unexpected status codes).
//!
//! ```rust
//! # use hotfix_propagator::gateway::RemoteGateway;
//! # fn example<G: RemoteGateway>(gateway: &G) -> hotfix_propagator::Result<()> {
//! match gateway.get_ref("tags/v1.0.0")? {
//!     Some(sha) => println!("v1.0.0 points at {}", sha),
//!     None => println!("v1.0.0 does not exist"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;

pub use github::GithubGateway;
pub use mock::MockGateway;

use crate::domain::MergeMethod;
use crate::error::Result;
use serde::Deserialize;

/// A branch as listed by the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchInfo {
    pub name: String,
}

/// A commit included in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
}

/// Result of comparing `base...head`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comparison {
    /// Commits on head that are not on base
    pub ahead_by: u64,
    pub commits: Vec<CommitSummary>,
}

/// Outcome of merging one branch into another on the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// A merge commit was created (HTTP 201)
    Created,
    /// Base already contains head; nothing was merged (HTTP 204)
    UpToDate,
    /// The merge conflicts (HTTP 409)
    Conflict,
}

/// Request body for opening a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// Pull request state relevant to merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// `None` while the platform is still computing mergeability
    pub mergeable: Option<bool>,
}

/// Capabilities the orchestrator consumes from the hosting platform
///
/// All calls are blocking and are issued one at a time by the orchestrator.
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`.
///
/// ## Ref paths
///
/// `get_ref` and `delete_ref` take paths relative to `refs/`
/// (e.g. `tags/v1.2.3`, `heads/main`); `create_ref` takes the fully
/// qualified name (e.g. `refs/heads/hotfix/v1.2.3-hotfix.1`).
pub trait RemoteGateway: Send + Sync {
    /// Resolve a ref to the SHA of the object it points at
    ///
    /// # Returns
    /// * `Ok(Some(sha))` - The ref exists
    /// * `Ok(None)` - The ref does not exist
    /// * `Err` - Any other remote failure
    fn get_ref(&self, ref_path: &str) -> Result<Option<String>>;

    /// Create a new ref pointing at `sha`
    fn create_ref(&self, ref_name: &str, sha: &str) -> Result<()>;

    /// Delete an existing ref
    fn delete_ref(&self, ref_path: &str) -> Result<()>;

    /// Look up a branch by name
    ///
    /// # Returns
    /// * `Ok(Some(BranchInfo))` - The branch exists
    /// * `Ok(None)` - The branch does not exist
    fn get_branch(&self, name: &str) -> Result<Option<BranchInfo>>;

    /// List all branches, fetching `per_page` branches per request
    fn list_branches(&self, per_page: u32) -> Result<Vec<BranchInfo>>;

    /// Compare two commits or branches (`base...head`)
    fn compare_commits(&self, base: &str, head: &str) -> Result<Comparison>;

    /// Merge `head` into `base` with the given commit message
    ///
    /// A conflict is reported as [MergeStatus::Conflict], not as an error.
    fn merge_branches(&self, base: &str, head: &str, message: &str) -> Result<MergeStatus>;

    /// Open a pull request
    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest>;

    /// Fetch the current state of a pull request
    fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// Merge a pull request using the given method
    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> Result<()>;
}
