// tests/version_test.rs
use hotfix_propagator::domain::{
    compare_versions, extract_version_from_branch, is_version_newer, parse_version,
};
use std::cmp::Ordering;

#[test]
fn test_parse_normalizes_prefix_and_keeps_components() {
    for (input, expected) in [
        ("1.2.3", (1, 2, 3)),
        ("v1.2.3", (1, 2, 3)),
        ("v10.0.42-hotfix.1", (10, 0, 42)),
        ("0.0.0", (0, 0, 0)),
    ] {
        let version = parse_version(input).unwrap();
        assert_eq!(
            (version.major, version.minor, version.patch),
            expected,
            "{}",
            input
        );
        assert!(!version.to_string().starts_with('v'));
    }
}

#[test]
fn test_parse_rejects_incomplete_versions() {
    for input in ["", "1.2", "invalid", "v", "1.2.x"] {
        assert!(parse_version(input).is_none(), "{}", input);
    }
}

#[test]
fn test_versions_sort_in_release_order() {
    let ascending = [
        "v1.0.0-hotfix.1",
        "v1.0.0-hotfix.2",
        "v1.0.0",
        "v1.0.1",
        "v1.0.2",
        "v1.1.0",
        "v1.2.0",
        "v2.0.0",
    ];

    for (i, a) in ascending.iter().enumerate() {
        for (j, b) in ascending.iter().enumerate() {
            assert_eq!(compare_versions(a, b).unwrap(), i.cmp(&j), "{} vs {}", a, b);
        }
    }
}

#[test]
fn test_prefix_does_not_affect_order() {
    assert_eq!(compare_versions("v1.4.0", "1.4.0").unwrap(), Ordering::Equal);
}

#[test]
fn test_is_version_newer_matches_compare() {
    assert!(is_version_newer("v1.0.0", "v1.0.1").unwrap());
    assert!(!is_version_newer("v1.0.1", "v1.0.0").unwrap());
    assert!(!is_version_newer("v1.0.0", "v1.0.0").unwrap());
    assert!(is_version_newer("1.0.0", "v1.1.0").unwrap());
}

#[test]
fn test_is_version_newer_rejects_malformed_input() {
    let err = is_version_newer("v1.0.0", "next").unwrap_err();
    assert!(err.to_string().contains("next"));
}

#[test]
fn test_extract_version_from_branch_names() {
    assert_eq!(extract_version_from_branch("release/v1.2.3").as_deref(), Some("1.2.3"));
    assert_eq!(extract_version_from_branch("release/1.2.3").as_deref(), Some("1.2.3"));
    assert_eq!(extract_version_from_branch("v1.2.3").as_deref(), Some("1.2.3"));
    assert_eq!(extract_version_from_branch("main"), None);
    assert_eq!(extract_version_from_branch("feature/test"), None);
}
