//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML report of a run: summary
//! counters, a results table in run order, and collapsible diagnostics and
//! output for every test that did not pass.
//!
//! 此模块生成一次运行的独立 HTML 报告：汇总计数、按运行顺序排列的结果表格，
//! 以及每个未通过测试的可折叠诊断信息和输出。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::RunReport;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.6em; }
.meta { color: #666; margin-bottom: 1.5em; }
.summary-container { display: flex; gap: 1em; margin-bottom: 2em; }
.summary-item { border: 1px solid #ddd; border-radius: 6px; padding: 0.8em 1.2em; text-align: center; }
.summary-item .count { display: block; font-size: 1.8em; font-weight: bold; }
.passed-text { color: #2e7d32; }
.failed-text { color: #c62828; }
.errored-text { color: #8e24aa; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #eee; padding: 0.5em; text-align: left; vertical-align: top; }
.duration-cell { text-align: right; white-space: nowrap; }
.status-cell { font-weight: bold; }
.status-passed { color: #2e7d32; }
.status-failed { color: #c62828; }
.status-errored { color: #8e24aa; }
details pre { background: #f6f8fa; padding: 0.8em; overflow-x: auto; }
"#;

/// Renders the report document.
pub fn render_html_report(report: &RunReport, directory: &Path, locale: &str) -> Markup {
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p.meta {
                    (t!("html_report.meta", locale = locale, dir = directory.display(), time = generated_at))
                }
                div.summary-container {
                    div.summary-item {
                        span.count { (report.total()) }
                        span.label { (t!("html_report.summary.total", locale = locale)) }
                    }
                    div.summary-item {
                        span.count.passed-text { (report.passed()) }
                        span.label { (t!("html_report.summary.passed", locale = locale)) }
                    }
                    div.summary-item {
                        span.count.failed-text { (report.failed()) }
                        span.label { (t!("html_report.summary.failed", locale = locale)) }
                    }
                    div.summary-item {
                        span.count.errored-text { (report.errored()) }
                        span.label { (t!("html_report.summary.errored", locale = locale)) }
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th { (t!("html_report.table.header.status", locale = locale)) }
                            th.duration-cell { (t!("html_report.table.header.duration", locale = locale)) }
                        }
                    }
                    tbody {
                        @for result in report.results() {
                            tr {
                                td {
                                    (result.name())
                                    @if result.is_failure() {
                                        details {
                                            summary { (t!("html_report.toggle_output", locale = locale)) }
                                            @if let Some(diagnostic) = result.diagnostic() {
                                                pre { (diagnostic) }
                                            }
                                            @if !result.output().is_empty() {
                                                pre { (result.output()) }
                                            }
                                        }
                                    }
                                }
                                td {
                                    span class={ "status-cell " (result.get_status_class()) } {
                                        (result.get_status_str(locale))
                                    }
                                }
                                td.duration-cell { (format!("{:.2}s", result.duration().as_secs_f64())) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Generates an HTML report from a run and writes it to `output_path`.
///
/// 从一次运行生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件，则返回错误。
pub fn generate_html_report(
    report: &RunReport,
    directory: &Path,
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let markup = render_html_report(report, directory, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
