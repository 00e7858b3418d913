//! # JSON Report Module / JSON 报告模块
//!
//! Machine-readable run report.
//!
//! 机器可读的运行报告。

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

use crate::core::discovery::Strategy;
use crate::core::models::{RunReport, TestResult};

/// Builds the JSON document for `report`.
pub fn report_to_json(report: &RunReport, directory: &Path, strategy: &Strategy) -> Value {
    let tests: Vec<Value> = report.results().iter().map(result_to_json).collect();
    json!({
        "directory": directory.display().to_string(),
        "discovery": strategy.to_string(),
        "success": report.success(),
        "summary": {
            "total": report.total(),
            "passed": report.passed(),
            "failed": report.failed(),
            "errored": report.errored(),
        },
        "tests": tests,
    })
}

fn result_to_json(result: &TestResult) -> Value {
    let mut value = json!({
        "name": result.name(),
        "outcome": result.outcome(),
        "duration_secs": result.duration().as_secs_f64(),
        "output": result.output(),
    });
    if let TestResult::Failed { reason, .. } = result {
        value["reason"] = json!(reason);
    }
    if let Some(diagnostic) = result.diagnostic() {
        value["diagnostic"] = json!(diagnostic);
    }
    value
}

/// Writes the JSON report of a run to `output_path`.
pub fn write_json_report(
    report: &RunReport,
    directory: &Path,
    strategy: &Strategy,
    output_path: &Path,
) -> Result<()> {
    let document = report_to_json(report, directory, strategy);
    let text = serde_json::to_string_pretty(&document)?;
    fs::write(output_path, text)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
