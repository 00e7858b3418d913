//! # Discovery Integration Tests / 发现集成测试
//!
//! Checks which provider owns a directory and that each provider's output
//! reaches the caller unchanged.
//!
//! 检查由哪个提供者负责某个目录，以及每个提供者的输出是否原样返回给调用者。

use fixture_harness::core::case::{CommandTest, TestDescriptor};
use fixture_harness::core::convention::ConventionProvider;
use fixture_harness::core::discovery::TestCollection;
use fixture_harness::core::manifest::ManifestProvider;
use fixture_harness::{DiscoveryError, ProviderRegistry, Strategy, TestProvider};
use std::path::Path;

mod common;

fn names(tests: &TestCollection) -> Vec<String> {
    tests.iter().map(|t| t.name().to_string()).collect()
}

#[test]
fn test_manifest_output_is_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture(dir.path(), "a.impala", "", None);
    common::write_manifest(
        dir.path(),
        r#"
[[tests]]
name = "second"
args = ["b.impala"]

[[tests]]
name = "first"
args = ["a.impala"]
expect_failure = true
"#,
    );

    let expected = ManifestProvider::new("tests.toml")
        .produce_tests(dir.path())
        .unwrap();
    let discovery = ProviderRegistry::default().resolve(dir.path()).unwrap();

    assert!(matches!(discovery.strategy, Strategy::Manifest(_)));
    assert_eq!(discovery.tests, expected);
    assert_eq!(names(&discovery.tests), ["second", "first"]);
}

#[test]
fn test_convention_counts_only_matching_files() {
    let fixtures = common::setup_convention_fixtures();

    let discovery = ProviderRegistry::default().resolve(fixtures.path()).unwrap();

    assert_eq!(discovery.strategy, Strategy::Convention);
    assert_eq!(discovery.tests.len(), 3);
    assert_eq!(
        names(&discovery.tests),
        ["arith.impala", "closures.impala", "loops.impala"]
    );
}

#[test]
fn test_discovery_is_deterministic() {
    let fixtures = common::setup_convention_fixtures();
    let registry = ProviderRegistry::new(ConventionProvider::default());

    let first = registry.resolve(fixtures.path()).unwrap();
    let second = registry.resolve(fixtures.path()).unwrap();
    assert_eq!(first.tests, second.tests);
}

#[test]
fn test_empty_manifest_hides_convention_files() {
    let fixtures = common::setup_empty_manifest();

    let discovery = ProviderRegistry::default().resolve(fixtures.path()).unwrap();
    assert!(matches!(discovery.strategy, Strategy::Manifest(_)));
    assert!(discovery.tests.is_empty());
}

#[test]
fn test_broken_manifest_is_a_parse_error() {
    let fixtures = common::setup_broken_manifest();

    let err = ProviderRegistry::default()
        .resolve(fixtures.path())
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::ManifestParse { .. }), "{err:?}");
}

#[test]
fn test_manifest_without_entry_point_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    common::write_manifest(dir.path(), "[defaults]\ntimeout_secs = 5\n");

    let err = ProviderRegistry::default().resolve(dir.path()).unwrap_err();
    assert!(matches!(err, DiscoveryError::MissingEntryPoint { .. }), "{err:?}");
}

/// A provider compiled into the harness, registered for one directory.
struct GeneratedProvider {
    count: usize,
}

impl TestProvider for GeneratedProvider {
    fn name(&self) -> &str {
        "generated"
    }

    fn produce_tests(&self, dir: &Path) -> Result<TestCollection, DiscoveryError> {
        Ok((0..self.count)
            .map(|i| {
                TestDescriptor::Command(CommandTest::new(
                    format!("case-{i}"),
                    dir,
                    vec![format!("{i}")],
                ))
            })
            .collect())
    }
}

#[test]
fn test_registered_provider_is_passed_through() {
    let fixtures = common::setup_convention_fixtures();
    let other = common::setup_convention_fixtures();

    let mut registry = ProviderRegistry::default();
    registry.register(fixtures.path(), GeneratedProvider { count: 2 });

    let discovery = registry.resolve(fixtures.path()).unwrap();
    assert_eq!(discovery.strategy, Strategy::Registered("generated".to_string()));
    assert_eq!(
        discovery.tests,
        GeneratedProvider { count: 2 }
            .produce_tests(fixtures.path())
            .unwrap()
    );

    // Other directories are unaffected.
    let discovery = registry.resolve(other.path()).unwrap();
    assert_eq!(discovery.strategy, Strategy::Convention);
    assert_eq!(discovery.tests.len(), 3);
}

#[test]
fn test_missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProviderRegistry::default()
        .resolve(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::DirectoryRead { .. }));
    assert!(err.to_string().contains("nope"));
}
