//! Domain logic - pure rules independent of the hosting platform

pub mod branch;
pub mod outcome;
pub mod tag;
pub mod version;

pub use branch::{extract_version_from_branch, BranchPattern, HotfixBranchName};
pub use outcome::{
    BranchFailure, CreateHotfixResult, MergeMethod, PropagationOptions, PropagationResult,
    PropagationStatus, PropagationTally,
};
pub use tag::ReleaseTag;
pub use version::{
    compare_versions, is_version_newer, is_version_same, parse_version, SemanticVersion,
};
