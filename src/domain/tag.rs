use crate::domain::version::strip_v_prefix;
use std::fmt;

/// Release tag a hotfix is cut from (always `v{version}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
}

impl ReleaseTag {
    /// Build the tag for a version, with or without its `v` prefix
    pub fn for_version(version: &str) -> Self {
        ReleaseTag {
            name: format!("v{}", strip_v_prefix(version)),
        }
    }

    /// Ref path relative to `refs/` (e.g. "tags/v1.2.3")
    pub fn ref_path(&self) -> String {
        format!("tags/{}", self.name)
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ref path of a branch head relative to `refs/` (e.g. "heads/main")
pub fn branch_ref_path(branch: &str) -> String {
    format!("heads/{}", branch)
}
