//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! The execution driver runs a [`TestCollection`] against one executable,
//! strictly one test at a time and in collection order, and aggregates the
//! results into a [`RunReport`].
//!
//! 执行驱动器针对单个可执行文件运行 [`TestCollection`]，
//! 严格按集合顺序逐个运行测试，并将结果汇总为 [`RunReport`]。

use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::{
    case::TestDescriptor,
    config::RunConfiguration,
    discovery::TestCollection,
    models::{RunReport, TestResult},
};

/// Hooks called by the driver while a run progresses. All methods default
/// to doing nothing.
pub trait RunObserver {
    /// Called once before the first test with the collection size.
    fn on_start(&mut self, _total: usize) {}

    /// Called after each test, with its zero-based position in the collection.
    fn on_test_finished(&mut self, _index: usize, _result: &TestResult) {}

    /// Called once after the last test.
    fn on_finish(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Runs every test of `tests` against `config.executable()`.
///
/// A failing or erroring test never stops the run: the report always holds
/// exactly one result per input descriptor, in input order.
///
/// 针对 `config.executable()` 运行 `tests` 中的每个测试。
/// 失败或出错的测试不会中止运行：报告中每个输入描述符恰好对应一个结果，顺序不变。
pub async fn execute_tests(
    tests: TestCollection,
    config: &RunConfiguration,
    observer: &mut dyn RunObserver,
) -> RunReport {
    observer.on_start(tests.len());

    let mut results = Vec::with_capacity(tests.len());
    for (index, test) in tests.into_iter().enumerate() {
        let result = run_isolated(test, config).await;
        debug!(test = result.name(), outcome = %result.outcome(), "test finished");
        observer.on_test_finished(index, &result);
        results.push(result);
    }

    let report = RunReport::new(results);
    observer.on_finish(&report);
    report
}

/// Runs one test in its own task so that neither an error nor a panic in
/// the run capability can escape into the driver. The task is awaited
/// before returning, which keeps execution sequential.
async fn run_isolated(test: TestDescriptor, config: &RunConfiguration) -> TestResult {
    let name = test.name().to_string();
    let config = config.clone();
    let start_time = Instant::now();

    let handle = tokio::spawn(async move { test.run(&config).await });
    contain(name, start_time, handle).await
}

/// Awaits a test task and turns every way it can end into a [`TestResult`].
async fn contain(
    name: String,
    start_time: Instant,
    handle: JoinHandle<anyhow::Result<TestResult>>,
) -> TestResult {
    match handle.await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!(test = %name, error = %format!("{e:#}"), "test could not be run");
            TestResult::Errored {
                name,
                diagnostic: format!("{e:#}"),
                duration: start_time.elapsed(),
            }
        }
        Err(e) => {
            let diagnostic = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            };
            warn!(test = %name, %diagnostic, "test task aborted");
            TestResult::Errored {
                name,
                diagnostic: format!("Critical error during test execution: {diagnostic}"),
                duration: start_time.elapsed(),
            }
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
