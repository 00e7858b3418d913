//! # Test Manifest Module / 测试清单模块
//!
//! The custom descriptor of a directory: a `tests.toml` file listing the
//! directory's tests explicitly. When present it replaces convention-based
//! discovery completely.
//!
//! 目录的自定义描述符：一个显式列出该目录测试的 `tests.toml` 文件。
//! 若存在，它将完全取代基于约定的发现。
//!
//! ```toml
//! [defaults]
//! timeout_secs = 10
//! args = ["--emit-llvm"]
//!
//! [[tests]]
//! name = "loops"
//! args = "-O2 loops.impala"
//! stdin = "loops.in"
//! expected_output = "loops.output"
//! expect_exit = 0
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::{
    case::{CommandTest, ExpectedExit, ExpectedOutput, TestDescriptor},
    discovery::{DiscoveryError, TestCollection, TestProvider},
};

/// Arguments written either as a list or as one shell-style line.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Arguments {
    List(Vec<String>),
    Line(String),
}

impl Arguments {
    /// Expands a line form (`$VAR`, `~`) and splits it with shell quoting
    /// rules. The list form is taken verbatim.
    fn into_vec(self) -> Result<Vec<String>, String> {
        match self {
            Arguments::List(args) => Ok(args),
            Arguments::Line(line) => {
                let expanded = shellexpand::full(&line)
                    .map_err(|e| format!("failed to expand `{line}`: {e}"))?;
                shlex::split(&expanded).ok_or_else(|| format!("failed to parse `{expanded}`"))
            }
        }
    }
}

/// Settings applied to every case of the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDefaults {
    /// Timeout for cases that do not set their own.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Arguments placed before each case's own arguments.
    #[serde(default)]
    pub args: Option<Arguments>,
}

/// One `[[tests]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestCase {
    pub name: String,
    #[serde(default)]
    pub args: Option<Arguments>,
    /// File fed to stdin, relative to the directory.
    #[serde(default)]
    pub stdin: Option<PathBuf>,
    /// File holding the expected stdout, relative to the directory.
    #[serde(default)]
    pub expected_output: Option<PathBuf>,
    /// Expected stdout given inline.
    #[serde(default)]
    pub output: Option<String>,
    /// Exact expected exit code.
    #[serde(default)]
    pub expect_exit: Option<i32>,
    /// Expect any unsuccessful exit.
    #[serde(default)]
    pub expect_failure: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// The whole manifest file. `tests` is the entry point and must be present,
/// even if empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub defaults: ManifestDefaults,
    pub tests: Option<Vec<ManifestCase>>,
}

const ZERO_TIMEOUT: &str = "timeout_secs must be at least 1";

/// Loads and parses a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, DiscoveryError> {
    let content = fs::read_to_string(path).map_err(|source| DiscoveryError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| DiscoveryError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

impl Manifest {
    /// Converts the manifest into descriptors for `dir`, in file order.
    ///
    /// `path` is only used in error messages.
    pub fn into_tests(self, dir: &Path, path: &Path) -> Result<TestCollection, DiscoveryError> {
        let cases = self
            .tests
            .ok_or_else(|| DiscoveryError::MissingEntryPoint {
                path: path.to_path_buf(),
            })?;

        let invalid = |name: &str, reason: String| DiscoveryError::InvalidCase {
            path: path.to_path_buf(),
            name: name.to_string(),
            reason,
        };

        if self.defaults.timeout_secs == Some(0) {
            return Err(invalid("[defaults]", ZERO_TIMEOUT.to_string()));
        }

        let default_args = match self.defaults.args {
            Some(args) => args.into_vec().map_err(|reason| invalid("[defaults]", reason))?,
            None => Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut tests = Vec::with_capacity(cases.len());
        for case in cases {
            if case.name.trim().is_empty() {
                return Err(invalid(&case.name, "name must not be empty".to_string()));
            }
            if !seen.insert(case.name.clone()) {
                return Err(invalid(&case.name, "duplicate test name".to_string()));
            }

            let expected_exit = match (case.expect_exit, case.expect_failure) {
                (Some(_), true) => {
                    return Err(invalid(
                        &case.name,
                        "`expect_exit` and `expect_failure` are mutually exclusive".to_string(),
                    ));
                }
                (Some(code), false) => ExpectedExit::Code(code),
                (None, true) => ExpectedExit::Failure,
                (None, false) => ExpectedExit::Success,
            };

            let expected_output = match (case.expected_output, case.output) {
                (Some(_), Some(_)) => {
                    return Err(invalid(
                        &case.name,
                        "`expected_output` and `output` are mutually exclusive".to_string(),
                    ));
                }
                (Some(file), None) => Some(ExpectedOutput::File(file)),
                (None, Some(text)) => Some(ExpectedOutput::Inline(text)),
                (None, None) => None,
            };

            let mut args = default_args.clone();
            if let Some(own) = case.args {
                args.extend(own.into_vec().map_err(|reason| invalid(&case.name, reason))?);
            }

            if case.timeout_secs == Some(0) {
                return Err(invalid(&case.name, ZERO_TIMEOUT.to_string()));
            }

            let timeout = case
                .timeout_secs
                .or(self.defaults.timeout_secs)
                .map(Duration::from_secs);

            tests.push(TestDescriptor::Command(CommandTest {
                name: case.name,
                dir: dir.to_path_buf(),
                args,
                stdin: case.stdin,
                expected_output,
                expected_exit,
                timeout,
            }));
        }
        Ok(tests)
    }
}

/// Discovery through a directory's manifest file.
#[derive(Debug, Clone)]
pub struct ManifestProvider {
    file_name: String,
}

impl ManifestProvider {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl TestProvider for ManifestProvider {
    fn name(&self) -> &str {
        "manifest"
    }

    fn produce_tests(&self, dir: &Path) -> Result<TestCollection, DiscoveryError> {
        let path = dir.join(&self.file_name);
        let tests = load_manifest(&path)?.into_tests(dir, &path)?;
        debug!(count = tests.len(), manifest = %path.display(), "loaded test manifest");
        Ok(tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<TestCollection, DiscoveryError> {
        let manifest: Manifest = toml::from_str(content).expect("manifest should parse");
        manifest.into_tests(Path::new("/fixtures"), Path::new("/fixtures/tests.toml"))
    }

    fn command(test: &TestDescriptor) -> &CommandTest {
        match test {
            TestDescriptor::Command(test) => test,
            other => panic!("expected a command test, got {other:?}"),
        }
    }

    #[test]
    fn cases_keep_file_order() {
        let tests = parse(
            r#"
[[tests]]
name = "zeta"

[[tests]]
name = "alpha"

[[tests]]
name = "mu"
"#,
        )
        .unwrap();
        let names: Vec<_> = tests.iter().map(TestDescriptor::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mu"]);
    }

    #[test]
    fn empty_tests_list_is_valid() {
        assert!(parse("tests = []").unwrap().is_empty());
    }

    #[test]
    fn missing_tests_entry_is_an_error() {
        let err = parse("[defaults]\ntimeout_secs = 3\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingEntryPoint { .. }), "{err:?}");
    }

    #[test]
    fn fields_are_carried_over() {
        let tests = parse(
            r#"
[defaults]
timeout_secs = 10
args = ["--emit-llvm"]

[[tests]]
name = "loops"
args = "-O2 'loops file.impala'"
stdin = "loops.in"
expected_output = "loops.output"
expect_exit = 3

[[tests]]
name = "broken"
args = ["broken.impala"]
output = "error\n"
expect_failure = true
timeout_secs = 2
"#,
        )
        .unwrap();

        let loops = command(&tests[0]);
        assert_eq!(loops.args, ["--emit-llvm", "-O2", "loops file.impala"]);
        assert_eq!(loops.stdin, Some(PathBuf::from("loops.in")));
        assert_eq!(
            loops.expected_output,
            Some(ExpectedOutput::File(PathBuf::from("loops.output")))
        );
        assert_eq!(loops.expected_exit, ExpectedExit::Code(3));
        assert_eq!(loops.timeout, Some(Duration::from_secs(10)));
        assert_eq!(loops.dir, PathBuf::from("/fixtures"));

        let broken = command(&tests[1]);
        assert_eq!(broken.args, ["--emit-llvm", "broken.impala"]);
        assert_eq!(
            broken.expected_output,
            Some(ExpectedOutput::Inline("error\n".to_string()))
        );
        assert_eq!(broken.expected_exit, ExpectedExit::Failure);
        assert_eq!(broken.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn contradicting_expectations_are_rejected() {
        let err = parse(
            r#"
[[tests]]
name = "both"
expect_exit = 1
expect_failure = true
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidCase { ref name, .. } if name == "both"));

        let err = parse(
            r#"
[[tests]]
name = "two-outputs"
expected_output = "a.output"
output = "a"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidCase { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse(
            r#"
[defaults]
timeout_secs = 0

[[tests]]
name = "quick"
args = ["-c", "true"]
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, DiscoveryError::InvalidCase { ref name, ref reason, .. }
                if name == "[defaults]" && reason.contains("at least 1")),
            "{err:?}"
        );

        let err = parse("[[tests]]\nname = \"quick\"\ntimeout_secs = 0\n").unwrap_err();
        assert!(
            matches!(err, DiscoveryError::InvalidCase { ref name, .. } if name == "quick"),
            "{err:?}"
        );
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let err = parse("[[tests]]\nname = \"a\"\n[[tests]]\nname = \"a\"\n").unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");

        let err = parse("[[tests]]\nname = \" \"\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidCase { .. }));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let err = parse("[[tests]]\nname = \"q\"\nargs = \"'unterminated\"\n").unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidCase { .. }));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tests.toml");
        fs::write(&path, "[[tests]]\nname = \"a\"\nexpect = 1\n").unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, DiscoveryError::ManifestParse { .. }));
    }

    #[test]
    fn provider_reads_the_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tests.toml"), "[[tests]]\nname = \"only\"\n").unwrap();
        let tests = ManifestProvider::new("tests.toml")
            .produce_tests(dir.path())
            .unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].dir(), dir.path());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = ManifestProvider::new("tests.toml")
            .produce_tests(dir.path())
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::ManifestRead { .. }));
    }
}
