// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Creates a fixture directory with three `.impala` files whose `.output`
/// sidecars equal their content. Running them with `cat` passes.
pub fn setup_convention_fixtures() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for (name, body) in [
        ("arith.impala", "fn main() -> int { 1 + 2 }\n"),
        ("loops.impala", "fn main() { while true { } }\n"),
        ("closures.impala", "fn main() { |x| x }\n"),
    ] {
        write_fixture(temp_dir.path(), name, body, Some(body));
    }
    // Not part of the convention.
    fs::write(temp_dir.path().join("README.md"), "fixtures\n").expect("Failed to write README");
    temp_dir
}

/// Writes `name` and, when given, its `.output` sidecar.
pub fn write_fixture(dir: &Path, name: &str, body: &str, expected_output: Option<&str>) {
    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write fixture");
    if let Some(expected) = expected_output {
        fs::write(path.with_extension("output"), expected).expect("Failed to write sidecar");
    }
}

/// Writes a `tests.toml` manifest into `dir`.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("tests.toml");
    fs::write(&path, content).expect("Failed to write tests.toml");
    path
}

/// A directory whose manifest declares an empty test list.
pub fn setup_empty_manifest() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    // Convention would find this file; the manifest hides it.
    write_fixture(temp_dir.path(), "ignored.impala", "", None);
    write_manifest(temp_dir.path(), "tests = []\n");
    temp_dir
}

/// A directory whose manifest cannot be parsed.
pub fn setup_broken_manifest() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    write_fixture(temp_dir.path(), "a.impala", "", None);
    write_manifest(
        temp_dir.path(),
        r#"
# Invalid TOML - missing closing bracket
[[tests]
name = "invalid-case"
"#,
    );
    temp_dir
}
