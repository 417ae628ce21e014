use super::HotfixOrchestrator;
use crate::domain::{CreateHotfixResult, HotfixBranchName, ReleaseTag};
use crate::error::Result;
use crate::gateway::RemoteGateway;
use tracing::info;

impl<G: RemoteGateway> HotfixOrchestrator<G> {
    /// Create `hotfix/v{version}-{suffix}` from the release tag `v{version}`.
    ///
    /// Fails without side effects when the tag is missing or when any
    /// `hotfix/*` branch already exists. Creating the ref is the last step, so
    /// an error at any earlier point leaves the repository untouched.
    pub fn create_hotfix_branch(&self, version: &str, suffix: &str) -> CreateHotfixResult {
        let hotfix = HotfixBranchName::new(version, suffix);
        let tag = ReleaseTag::for_version(version);

        match self.try_create_hotfix_branch(&hotfix, &tag) {
            Ok(result) => result,
            Err(e) => CreateHotfixResult::failed(e.detail()),
        }
    }

    fn try_create_hotfix_branch(
        &self,
        hotfix: &HotfixBranchName,
        tag: &ReleaseTag,
    ) -> Result<CreateHotfixResult> {
        info!("Checking if tag {} exists...", tag);
        let sha = match self.gateway.get_ref(&tag.ref_path())? {
            Some(sha) => sha,
            None => {
                return Ok(CreateHotfixResult::failed(format!(
                    "Tag '{}' does not exist",
                    tag
                )))
            }
        };

        info!("Checking for existing hotfix branches...");
        let existing = self.find_existing_hotfix_branches()?;
        if !existing.is_empty() {
            return Ok(CreateHotfixResult::failed(format!(
                "Existing hotfix branch found: {}. Only one hotfix can exist at a time.",
                existing.join(", ")
            )));
        }

        info!("Creating hotfix branch {} from tag {}...", hotfix, tag);
        self.gateway
            .create_ref(&format!("refs/heads/{}", hotfix), &sha)?;

        info!("Hotfix branch created successfully: {}", hotfix);
        Ok(CreateHotfixResult::created(hotfix.to_string(), tag.name.clone()))
    }
}
