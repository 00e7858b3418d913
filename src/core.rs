//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the harness: the run
//! configuration, test descriptors, the discovery providers and the
//! execution driver.
//!
//! 此模块包含测试工具的核心功能：运行配置、测试描述符、
//! 发现提供者以及执行驱动器。

pub mod case;
pub mod config;
pub mod convention;
pub mod discovery;
pub mod execution;
pub mod manifest;
pub mod models;

// Re-exports
pub use case::TestDescriptor;
pub use config::RunConfiguration;
pub use discovery::{ProviderRegistry, TestCollection};
pub use execution::execute_tests;
pub use models::{RunReport, TestResult};
