//! # Data Models Module / 数据模型模块
//!
//! This module defines the result types produced by the execution driver:
//! the per-test [`TestResult`] with its [`TestOutcome`], and the aggregated
//! [`RunReport`].
//!
//! 此模块定义执行驱动器产生的结果类型：
//! 单个测试的 [`TestResult`] 及其 [`TestOutcome`]，以及汇总的 [`RunReport`]。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::infra::t;

/// The three possible verdicts of a single test.
/// 单个测试的三种可能结论。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// Actual behaviour matched the expectation.
    /// 实际行为与预期相符。
    Pass,
    /// The executable ran, but its behaviour did not match the expectation.
    /// 可执行文件已运行，但其行为与预期不符。
    Fail,
    /// The test could not be carried out: spawn failure, timeout, unreadable
    /// fixture or a fault inside the harness.
    /// 测试无法执行：派生失败、超时、夹具不可读或测试工具内部故障。
    Error,
}

/// Enumerates why a test that ran to completion was judged a failure.
/// 枚举运行完成的测试被判定为失败的原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The exit status did not match the expected one.
    /// 退出状态与预期不符。
    ExitStatus,
    /// The standard output differed from the expected output.
    /// 标准输出与预期输出不同。
    OutputMismatch,
}

/// Represents the final result of a single test execution.
///
/// 表示单个测试执行的最终结果。
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// The test passed.
    /// 测试通过。
    Passed {
        /// Name of the test / 测试名称
        name: String,
        /// Captured output of the run / 运行捕获的输出
        output: String,
        /// Wall-clock time of the run / 运行耗时
        duration: Duration,
    },
    /// The test ran and did not meet its expectation.
    /// 测试已运行但未满足预期。
    Failed {
        /// Name of the test / 测试名称
        name: String,
        /// Captured output of the run / 运行捕获的输出
        output: String,
        /// What did not match / 不匹配之处
        reason: FailureReason,
        /// Human-readable explanation of the mismatch / 不匹配的可读说明
        diagnostic: String,
        /// Wall-clock time of the run / 运行耗时
        duration: Duration,
    },
    /// The test could not be carried out.
    /// 测试无法执行。
    Errored {
        /// Name of the test / 测试名称
        name: String,
        /// What went wrong / 出错原因
        diagnostic: String,
        /// Time spent before the fault / 故障发生前的耗时
        duration: Duration,
    },
}

impl TestResult {
    pub fn outcome(&self) -> TestOutcome {
        match self {
            TestResult::Passed { .. } => TestOutcome::Pass,
            TestResult::Failed { .. } => TestOutcome::Fail,
            TestResult::Errored { .. } => TestOutcome::Error,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TestResult::Passed { name, .. }
            | TestResult::Failed { name, .. }
            | TestResult::Errored { name, .. } => name,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            TestResult::Passed { duration, .. }
            | TestResult::Failed { duration, .. }
            | TestResult::Errored { duration, .. } => *duration,
        }
    }

    /// Captured process output. Empty for errored tests, which may not have
    /// produced a process at all.
    pub fn output(&self) -> &str {
        match self {
            TestResult::Passed { output, .. } | TestResult::Failed { output, .. } => output.as_str(),
            TestResult::Errored { .. } => "",
        }
    }

    /// Diagnostic text for non-passing results.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            TestResult::Passed { .. } => None,
            TestResult::Failed { diagnostic, .. } | TestResult::Errored { diagnostic, .. } => {
                Some(diagnostic.as_str())
            }
        }
    }

    /// True for `Fail` and `Error` alike.
    pub fn is_failure(&self) -> bool {
        !matches!(self, TestResult::Passed { .. })
    }

    /// Gets the status of the test result as a localized string for display.
    /// 以本地化字符串形式获取测试结果的状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            TestResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            TestResult::Failed { .. } => t!("report.status_failed", locale = locale).to_string(),
            TestResult::Errored { .. } => t!("report.status_errored", locale = locale).to_string(),
        }
    }

    /// Gets the CSS class used for this status in the HTML report.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            TestResult::Passed { .. } => "status-passed",
            TestResult::Failed { .. } => "status-failed",
            TestResult::Errored { .. } => "status-errored",
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestOutcome::Pass => "pass",
            TestOutcome::Fail => "fail",
            TestOutcome::Error => "error",
        };
        f.write_str(label)
    }
}

/// Results of a whole run, in the order the tests were discovered.
/// 整次运行的结果，按测试被发现的顺序排列。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    results: Vec<TestResult>,
}

impl RunReport {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.count(TestOutcome::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(TestOutcome::Fail)
    }

    pub fn errored(&self) -> usize {
        self.count(TestOutcome::Error)
    }

    /// True iff no test failed or errored. An empty run is a success.
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| !r.is_failure())
    }

    /// The outcomes alone, in run order.
    pub fn outcomes(&self) -> Vec<TestOutcome> {
        self.results.iter().map(TestResult::outcome).collect()
    }

    /// Results that did not pass, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Sum of all test durations.
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(TestResult::duration).sum()
    }

    fn count(&self, outcome: TestOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome() == outcome).count()
    }
}
