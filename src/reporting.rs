//! # Reporting Module / 报告模块
//!
//! This module handles everything the user sees of a run: the progress bar
//! while tests execute, the colored console summary, and the optional HTML
//! and JSON report files.
//!
//! 此模块处理用户能看到的所有运行信息：测试执行期间的进度条、
//! 彩色控制台摘要，以及可选的 HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;
pub mod progress;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary, print_totals};
pub use html::generate_html_report;
pub use json::write_json_report;
pub use progress::observer_for;
