//! # Convention-Based Discovery / 基于约定的发现
//!
//! Default discovery for directories without a manifest: every file with the
//! configured extension is one test, in lexicographic file name order.
//! Sibling files sharing its stem add expectations:
//!
//! | file            | role                    |
//! |-----------------|-------------------------|
//! | `loops.impala`  | the test, passed as arg |
//! | `loops.in`      | fed to stdin            |
//! | `loops.output`  | expected stdout         |
//!
//! 没有清单的目录的默认发现方式：每个具有指定扩展名的文件就是一个测试，
//! 按文件名字典序排列。

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::{
    core::{
        case::{CompileTest, TestDescriptor},
        config::{DEFAULT_EXTENSION, EXPECTED_OUTPUT_EXTENSION, STDIN_EXTENSION},
        discovery::{DiscoveryError, TestCollection, TestProvider},
    },
    infra::fs::{list_files_with_extension, sidecar},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionProvider {
    extension: String,
}

impl Default for ConventionProvider {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ConventionProvider {
    /// `extension` may be given with or without its leading dot.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl TestProvider for ConventionProvider {
    fn name(&self) -> &str {
        "convention"
    }

    fn produce_tests(&self, dir: &Path) -> Result<TestCollection, DiscoveryError> {
        let files = list_files_with_extension(dir, &self.extension).map_err(|source| {
            DiscoveryError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            }
        })?;

        let tests: TestCollection = files
            .into_iter()
            .filter_map(|path| {
                let file_name = PathBuf::from(path.file_name()?);
                trace!(file = %file_name.display(), "found fixture");
                Some(TestDescriptor::Compile(CompileTest {
                    name: file_name.to_string_lossy().into_owned(),
                    dir: dir.to_path_buf(),
                    stdin: sidecar(&path, STDIN_EXTENSION).and_then(relative_to_dir),
                    expected_output: sidecar(&path, EXPECTED_OUTPUT_EXTENSION)
                        .and_then(relative_to_dir),
                    source: file_name,
                }))
            })
            .collect();

        debug!(count = tests.len(), dir = %dir.display(), "convention discovery finished");
        Ok(tests)
    }
}

/// Sidecars live next to their fixture, and tests run inside the fixture
/// directory, so the bare file name is all a descriptor needs.
fn relative_to_dir(path: PathBuf) -> Option<PathBuf> {
    path.file_name().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn compile(test: &TestDescriptor) -> &CompileTest {
        match test {
            TestDescriptor::Compile(test) => test,
            other => panic!("expected a compile test, got {other:?}"),
        }
    }

    #[test]
    fn one_test_per_matching_file() {
        let dir = tempdir().unwrap();
        for name in ["b.impala", "a.impala", "c.impala", "a.output", "README.md", "tests.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let tests = ConventionProvider::default().produce_tests(dir.path()).unwrap();
        let names: Vec<_> = tests.iter().map(TestDescriptor::name).collect();
        assert_eq!(names, ["a.impala", "b.impala", "c.impala"]);
    }

    #[test]
    fn sidecars_are_attached() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("echo.impala"), "").unwrap();
        fs::write(dir.path().join("echo.in"), "1 2").unwrap();
        fs::write(dir.path().join("echo.output"), "3").unwrap();
        fs::write(dir.path().join("plain.impala"), "").unwrap();

        let tests = ConventionProvider::default().produce_tests(dir.path()).unwrap();
        let echo = compile(&tests[0]);
        assert_eq!(echo.source, PathBuf::from("echo.impala"));
        assert_eq!(echo.stdin, Some(PathBuf::from("echo.in")));
        assert_eq!(echo.expected_output, Some(PathBuf::from("echo.output")));
        assert_eq!(echo.dir, dir.path());

        let plain = compile(&tests[1]);
        assert_eq!(plain.stdin, None);
        assert_eq!(plain.expected_output, None);
    }

    #[test]
    fn extension_is_configurable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.impala"), "").unwrap();
        fs::write(dir.path().join("b.rs"), "").unwrap();

        let provider = ConventionProvider::new(".rs");
        assert_eq!(provider.extension(), "rs");
        let tests = provider.produce_tests(dir.path()).unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name(), "b.rs");
    }

    #[test]
    fn empty_directory_yields_no_tests() {
        let dir = tempdir().unwrap();
        let tests = ConventionProvider::default().produce_tests(dir.path()).unwrap();
        assert!(tests.is_empty());
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ConventionProvider::default()
            .produce_tests(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::DirectoryRead { .. }));
    }
}
