//! # Test Descriptor Module / 测试描述符模块
//!
//! A [`TestDescriptor`] is one unit of test work. Whatever produced it, the
//! driver only ever calls [`TestDescriptor::run`], which invokes the executable
//! under test and judges what it did.
//!
//! [`TestDescriptor`] 是一个测试工作单元。无论由谁产生，
//! 驱动器只调用 [`TestDescriptor::run`]，它调用被测可执行文件并判定其行为。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, trace};

use crate::{
    core::{
        config::RunConfiguration,
        models::{FailureReason, TestResult},
    },
    infra::{
        command::{self, CapturedOutput, ProcessOutcome},
        t,
    },
};

/// The exit behaviour a test expects from the executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpectedExit {
    /// Exit status 0.
    #[default]
    Success,
    /// Any unsuccessful termination, including death by signal.
    Failure,
    /// Exactly this exit code.
    Code(i32),
}

impl ExpectedExit {
    /// Checks an exit code (`None` when the process was killed by a signal).
    pub fn matches(&self, code: Option<i32>) -> bool {
        match self {
            ExpectedExit::Success => code == Some(0),
            ExpectedExit::Failure => code != Some(0),
            ExpectedExit::Code(expected) => code == Some(*expected),
        }
    }

    fn describe(&self) -> String {
        match self {
            ExpectedExit::Success => "0".to_string(),
            ExpectedExit::Failure => "non-zero".to_string(),
            ExpectedExit::Code(code) => code.to_string(),
        }
    }
}

/// Where the expected standard output of a test comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutput {
    /// Read from this file when the test runs.
    File(PathBuf),
    /// Given literally.
    Inline(String),
}

/// A fixture found by convention: the executable is run on one source file.
///
/// `loops.impala` runs as `<executable> loops.impala` inside its directory.
/// A sibling `loops.in` is fed to stdin and a sibling `loops.output` holds the
/// expected stdout. The run must exit with status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileTest {
    pub name: String,
    pub dir: PathBuf,
    pub source: PathBuf,
    pub stdin: Option<PathBuf>,
    pub expected_output: Option<PathBuf>,
}

/// A test spelled out explicitly, by a `tests.toml` manifest or by a
/// registered provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTest {
    pub name: String,
    pub dir: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub expected_output: Option<ExpectedOutput>,
    pub expected_exit: ExpectedExit,
    pub timeout: Option<Duration>,
}

impl CommandTest {
    /// A command test expecting a successful exit and nothing else.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            args,
            stdin: None,
            expected_output: None,
            expected_exit: ExpectedExit::Success,
            timeout: None,
        }
    }
}

/// One unit of test work.
/// 一个测试工作单元。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestDescriptor {
    Compile(CompileTest),
    Command(CommandTest),
}

/// The provider-independent view of a descriptor: what to spawn and what
/// to expect.
struct Invocation<'a> {
    dir: &'a Path,
    args: Vec<String>,
    stdin: Option<&'a Path>,
    expected_output: Option<ExpectedOutput>,
    expected_exit: ExpectedExit,
    timeout: Option<Duration>,
}

impl TestDescriptor {
    pub fn name(&self) -> &str {
        match self {
            TestDescriptor::Compile(test) => &test.name,
            TestDescriptor::Command(test) => &test.name,
        }
    }

    /// The directory the test runs in.
    pub fn dir(&self) -> &Path {
        match self {
            TestDescriptor::Compile(test) => &test.dir,
            TestDescriptor::Command(test) => &test.dir,
        }
    }

    fn invocation(&self) -> Invocation<'_> {
        match self {
            TestDescriptor::Compile(test) => Invocation {
                dir: &test.dir,
                args: vec![test.source.to_string_lossy().into_owned()],
                stdin: test.stdin.as_deref(),
                expected_output: test.expected_output.clone().map(ExpectedOutput::File),
                expected_exit: ExpectedExit::Success,
                timeout: None,
            },
            TestDescriptor::Command(test) => Invocation {
                dir: &test.dir,
                args: test.args.clone(),
                stdin: test.stdin.as_deref(),
                expected_output: test.expected_output.clone(),
                expected_exit: test.expected_exit,
                timeout: test.timeout,
            },
        }
    }

    /// Runs the test against the configured executable and judges the result.
    ///
    /// Mismatches are reported as `Failed` and timeouts as `Errored`, both
    /// inside `Ok`. `Err` is reserved for faults that kept the test from
    /// running at all (unreadable fixture files, spawn failures); the driver
    /// records those as `Errored` as well.
    ///
    /// 针对配置的可执行文件运行测试并判定结果。
    /// 不匹配报告为 `Failed`，超时报告为 `Errored`，两者都在 `Ok` 中返回。
    /// `Err` 仅用于导致测试根本无法运行的故障。
    pub async fn run(&self, config: &RunConfiguration) -> Result<TestResult> {
        let invocation = self.invocation();
        let name = self.name().to_string();
        let executable = config.executable();

        let stdin = match invocation.stdin {
            Some(path) => Some(
                tokio::fs::read(invocation.dir.join(path))
                    .await
                    .with_context(|| {
                        t!("run.stdin_read_failed", path = path.display()).to_string()
                    })?,
            ),
            None => None,
        };

        let mut cmd = Command::new(executable);
        cmd.args(&invocation.args).current_dir(invocation.dir);

        let timeout = invocation.timeout.or(config.default_timeout());
        debug!(
            test = %name,
            executable = %executable.display(),
            args = ?invocation.args,
            dir = %invocation.dir.display(),
            "running test"
        );

        let start_time = Instant::now();
        let outcome = command::spawn_and_capture(cmd, stdin, timeout)
            .await
            .with_context(|| {
                t!("run.spawn_failed", executable = executable.display()).to_string()
            })?;
        let duration = start_time.elapsed();

        let captured = match outcome {
            ProcessOutcome::Exited(captured) => captured,
            ProcessOutcome::TimedOut(limit) => {
                return Ok(TestResult::Errored {
                    name,
                    diagnostic: t!("run.test_timeout", timeout = limit.as_secs_f64()).to_string(),
                    duration,
                });
            }
        };
        trace!(test = %name, status = ?captured.status, "process exited");

        let command_log = format!(
            "{} {} {}\n",
            t!("run.command_prefix").blue(),
            executable.display(),
            invocation.args.join(" ")
        );
        let output = format!("{command_log}{}", captured.combined());

        let code = captured.status.code();
        if !invocation.expected_exit.matches(code) {
            let actual = code
                .map(|c| c.to_string())
                .unwrap_or_else(|| t!("run.killed_by_signal").to_string());
            return Ok(TestResult::Failed {
                name,
                output,
                reason: FailureReason::ExitStatus,
                diagnostic: t!(
                    "run.exit_status_mismatch",
                    expected = invocation.expected_exit.describe(),
                    actual = actual
                )
                .to_string(),
                duration,
            });
        }

        if let Some(expected) = &invocation.expected_output {
            let expected = load_expected(expected, invocation.dir).await?;
            if let Some(diagnostic) = compare_output(&expected, &captured) {
                return Ok(TestResult::Failed {
                    name,
                    output,
                    reason: FailureReason::OutputMismatch,
                    diagnostic,
                    duration,
                });
            }
        }

        Ok(TestResult::Passed {
            name,
            output,
            duration,
        })
    }
}

async fn load_expected(expected: &ExpectedOutput, dir: &Path) -> Result<String> {
    match expected {
        ExpectedOutput::Inline(text) => Ok(text.clone()),
        ExpectedOutput::File(path) => tokio::fs::read_to_string(dir.join(path))
            .await
            .with_context(|| t!("run.expected_read_failed", path = path.display()).to_string()),
    }
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Compares expected and actual stdout. Returns a diagnostic naming the
/// first differing line, or `None` when they match.
fn compare_output(expected: &str, captured: &CapturedOutput) -> Option<String> {
    let expected = normalize(expected);
    let actual = normalize(&captured.stdout);
    if expected == actual {
        return None;
    }

    let mut expected_lines = expected.split('\n');
    let mut actual_lines = actual.split('\n');
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (e, a) => {
                return Some(
                    t!(
                        "run.output_mismatch",
                        line = line,
                        expected = e.unwrap_or("<end of output>"),
                        actual = a.unwrap_or("<end of output>")
                    )
                    .to_string(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_exit_matching() {
        assert!(ExpectedExit::Success.matches(Some(0)));
        assert!(!ExpectedExit::Success.matches(Some(1)));
        assert!(!ExpectedExit::Success.matches(None));
        assert!(ExpectedExit::Failure.matches(Some(2)));
        assert!(ExpectedExit::Failure.matches(None));
        assert!(!ExpectedExit::Failure.matches(Some(0)));
        assert!(ExpectedExit::Code(3).matches(Some(3)));
        assert!(!ExpectedExit::Code(3).matches(Some(0)));
    }

    #[cfg(unix)]
    fn captured(stdout: &str) -> CapturedOutput {
        use std::os::unix::process::ExitStatusExt;
        CapturedOutput {
            status: std::process::ExitStatus::from_raw(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn output_comparison_ignores_line_ending_style() {
        assert_eq!(compare_output("a\nb\n", &captured("a\r\nb\r\n")), None);
    }

    #[cfg(unix)]
    #[test]
    fn output_comparison_names_first_differing_line() {
        let diagnostic = compare_output("a\nb\nc\n", &captured("a\nx\nc\n")).unwrap();
        assert!(diagnostic.contains('2'), "{diagnostic}");
        assert!(diagnostic.contains('b'), "{diagnostic}");
        assert!(diagnostic.contains('x'), "{diagnostic}");
    }

    #[cfg(unix)]
    #[test]
    fn output_comparison_reports_missing_lines() {
        let diagnostic = compare_output("a\nb", &captured("a")).unwrap();
        assert!(diagnostic.contains("<end of output>"), "{diagnostic}");
    }

    #[test]
    fn descriptor_exposes_name_and_dir() {
        let test = TestDescriptor::Command(CommandTest::new("loops", "/fixtures", vec![]));
        assert_eq!(test.name(), "loops");
        assert_eq!(test.dir(), Path::new("/fixtures"));
    }
}
