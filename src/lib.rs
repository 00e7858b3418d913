//! # Fixture Harness Library / Fixture Harness 库
//!
//! This library provides the core functionality of the `run_tests` harness:
//! it discovers the test cases of a fixture directory and runs them, one by one,
//! against an external executable under test.
//!
//! 此库为 `run_tests` 测试工具提供核心功能：
//! 它发现测试夹具目录中的测试用例，并针对被测可执行文件逐个运行它们。
//!
//! ## Modules / 模块
//!
//! - `core` - Discovery providers, test descriptors and the execution driver
//! - `infra` - Process spawning and file system helpers
//! - `reporting` - Console summaries, progress display, HTML and JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 发现提供者、测试描述符和执行驱动器
//! - `infra` - 进程派生和文件系统辅助函数
//! - `reporting` - 控制台摘要、进度显示、HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config::RunConfiguration;
pub use core::discovery::{Discovery, DiscoveryError, ProviderRegistry, Strategy, TestProvider};
pub use core::execution::{RunObserver, execute_tests};
pub use core::models::{RunReport, TestOutcome, TestResult};

/// Selects the message language for the current process and returns it.
///
/// An explicitly requested language wins; otherwise the system locale is
/// detected. The full locale (e.g. "zh-CN") is tried first, then the bare
/// language code (e.g. "en" from "en-US"), and finally "en".
pub fn init_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
