//! Resolution of direct-merge patterns into concrete target branches.

use crate::boundary::PropagationWarning;
use crate::domain::branch::{extract_version_from_branch, BranchPattern, RELEASE_PREFIX};
use crate::domain::{is_version_newer, parse_version};
use tracing::{debug, warn};

/// Concrete targets plus anything worth reporting about the patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTargets {
    pub branches: Vec<String>,
    pub warnings: Vec<PropagationWarning>,
}

impl ResolvedTargets {
    fn push(&mut self, branch: &str) {
        if !self.branches.iter().any(|b| b == branch) {
            self.branches.push(branch.to_string());
        }
    }
}

/// Whether any pattern needs the repository's branch listing
pub fn needs_branch_listing(patterns: &[BranchPattern]) -> bool {
    patterns.contains(&BranchPattern::NewerReleases)
}

/// Expand patterns against the existing branches.
///
/// `release/*` selects release branches strictly newer than `base_version`,
/// so a hotfix never flows back into a superseded release line. An invalid
/// `base_version` selects no release branch and yields one warning naming it.
/// Duplicates are dropped, keeping the first occurrence.
pub fn resolve_targets(
    patterns: &[BranchPattern],
    existing: &[String],
    base_version: &str,
) -> ResolvedTargets {
    let mut resolved = ResolvedTargets::default();

    for pattern in patterns {
        match pattern {
            BranchPattern::Literal(name) => resolved.push(name),
            BranchPattern::NewerReleases => {
                if parse_version(base_version).is_none() {
                    let warning = PropagationWarning::InvalidBaseVersion {
                        version: base_version.to_string(),
                    };
                    if !resolved.warnings.contains(&warning) {
                        warn!("Cannot expand release/*: invalid base version {}", base_version);
                        resolved.warnings.push(warning);
                    }
                    continue;
                }

                for branch in existing.iter().filter(|b| b.starts_with(RELEASE_PREFIX)) {
                    let Some(version) = extract_version_from_branch(branch) else {
                        continue;
                    };

                    match is_version_newer(base_version, &version) {
                        Ok(true) => resolved.push(branch),
                        Ok(false) => debug!("Skipping {}: not newer than {}", branch, base_version),
                        Err(e) => {
                            warn!("Cannot order release branch {}: {}", branch, e);
                            resolved
                                .warnings
                                .push(PropagationWarning::UnparsableReleaseBranch {
                                    branch: branch.clone(),
                                    reason: e.to_string(),
                                });
                        }
                    }
                }
            }
            BranchPattern::Unsupported(raw) => {
                warn!("Unsupported direct merge pattern: {}", raw);
                resolved.warnings.push(PropagationWarning::UnsupportedPattern {
                    pattern: raw.clone(),
                });
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(raw: &[&str]) -> Vec<BranchPattern> {
        raw.iter().filter_map(|p| BranchPattern::parse(p)).collect()
    }

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_main_resolves_literally() {
        let resolved = resolve_targets(&patterns(&["main"]), &[], "1.0.0");
        assert_eq!(resolved.branches, vec!["main"]);
        assert!(!needs_branch_listing(&patterns(&["main", "dev"])));
    }

    #[test]
    fn test_release_wildcard_keeps_only_newer_lines() {
        let existing = branches(&[
            "main",
            "release/v0.9.0",
            "release/v1.0.0",
            "release/v1.1.0",
            "release/2.0.0",
            "feature/release/v3.0.0",
        ]);
        let resolved = resolve_targets(&patterns(&["main", "release/*"]), &existing, "v1.0.0");

        assert_eq!(resolved.branches, vec!["main", "release/v1.1.0", "release/2.0.0"]);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let existing = branches(&["release/v1.1.0"]);
        let resolved = resolve_targets(
            &patterns(&["release/v1.1.0", "main", "release/*", "main"]),
            &existing,
            "1.0.0",
        );
        assert_eq!(resolved.branches, vec!["release/v1.1.0", "main"]);
    }

    #[test]
    fn test_unparsable_release_branch_is_reported() {
        let existing = branches(&["release/next", "release/v1.2.0"]);
        let resolved = resolve_targets(&patterns(&["release/*"]), &existing, "1.0.0");

        assert_eq!(resolved.branches, vec!["release/v1.2.0"]);
        assert_eq!(
            resolved.warnings,
            vec![PropagationWarning::UnparsableReleaseBranch {
                branch: "release/next".to_string(),
                reason: "Invalid version format: next".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_base_version_is_reported_once() {
        let existing = branches(&["release/v1.1.0", "release/v1.2.0"]);
        let resolved = resolve_targets(
            &patterns(&["main", "release/*", "release/*"]),
            &existing,
            "1.0",
        );

        assert_eq!(resolved.branches, vec!["main"]);
        assert_eq!(
            resolved.warnings,
            vec![PropagationWarning::InvalidBaseVersion {
                version: "1.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_unsupported_and_blank_patterns() {
        let resolved = resolve_targets(&patterns(&["", " ", "feature/*"]), &[], "1.0.0");
        assert!(resolved.branches.is_empty());
        assert_eq!(
            resolved.warnings,
            vec![PropagationWarning::UnsupportedPattern {
                pattern: "feature/*".to_string(),
            }]
        );
    }
}
