//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the end-of-run report to the console: a status line
//! per test, the details of every test that did not pass, and the totals.
//!
//! 此模块将运行结束报告打印到控制台：每个测试一行状态、
//! 每个未通过测试的详细信息以及汇总。

use colored::*;

use crate::core::models::{RunReport, TestResult};
use crate::infra::t;

/// Prints a formatted summary of test results to the console.
/// Displays one line per test with status, name and duration, in run order,
/// using color coding to highlight different statuses.
///
/// 在控制台打印格式化的测试结果摘要。
/// 按运行顺序每个测试显示一行，包含状态、名称和持续时间，
/// 使用颜色编码突出显示不同的状态。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed   | loops.impala                            |    12.31ms
///   - Failed   | closures.impala                         |     8.02ms
///   - Error    | generics.impala                         |     0.10ms
/// ```
pub fn print_summary(report: &RunReport, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    if report.total() == 0 {
        println!("  {}", t!("report.no_tests", locale = locale).dimmed());
        return;
    }

    for result in report.results() {
        println!("{}", format_result_line(result, locale));
    }
}

/// One summary line for `result`, colored by outcome.
pub fn format_result_line(result: &TestResult, locale: &str) -> String {
    let status_str = result.get_status_str(locale);
    let status_colored = match result {
        TestResult::Passed { .. } => status_str.green(),
        TestResult::Failed { .. } => status_str.red(),
        TestResult::Errored { .. } => status_str.magenta(),
    };
    format!(
        "  - {:<8} | {:<40} | {:>10}",
        status_colored,
        result.name(),
        format!("{:.2?}", result.duration())
    )
}

/// Prints the diagnostic and captured output of every test that failed or
/// errored. Prints nothing when all tests passed.
///
/// 打印每个失败或出错测试的诊断信息和捕获的输出。
/// 如果所有测试都通过，则不打印任何内容。
pub fn print_failure_details(report: &RunReport, locale: &str) {
    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            result.get_status_str(locale).red(),
            result.name().cyan()
        );
        if let Some(diagnostic) = result.diagnostic() {
            println!("{}", diagnostic.yellow());
        }
        let output = result.output().trim_end();
        if !output.is_empty() {
            println!("\n--- {} ---\n", t!("report.output_log", locale = locale).yellow());
            println!("{}", output);
        }
        println!("\n{}", "-".repeat(80));
    }
}

/// Prints the aggregate line and the final verdict.
pub fn print_totals(report: &RunReport, locale: &str) {
    let totals = t!(
        "report.totals",
        locale = locale,
        passed = report.passed(),
        failed = report.failed(),
        errored = report.errored(),
        total = report.total(),
        duration = format!("{:.2?}", report.total_duration())
    );
    println!("\n{}", totals.bold());

    if report.success() {
        println!("{}", t!("report.all_passed", locale = locale).green().bold());
    } else {
        println!("{}", t!("report.some_failed", locale = locale).red().bold());
    }
}
