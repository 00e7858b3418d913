//! # Run Configuration Module / 运行配置模块
//!
//! Defaults shared by the CLI and the library, and the immutable
//! [`RunConfiguration`] handed to the execution driver.
//!
//! CLI 和库共享的默认值，以及交给执行驱动器的不可变 [`RunConfiguration`]。

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::fs::resolve_executable;

/// Executable used when `-e/--executable` is not given, relative to the
/// directory the harness is started from.
pub const DEFAULT_EXECUTABLE: &str = "../build/bin/impala";

/// File extension scanned for by the convention-based provider.
pub const DEFAULT_EXTENSION: &str = "impala";

/// Name of the custom descriptor file that overrides convention discovery.
pub const MANIFEST_FILE_NAME: &str = "tests.toml";

/// Sidecar extension holding the expected standard output of a fixture.
pub const EXPECTED_OUTPUT_EXTENSION: &str = "output";

/// Sidecar extension holding the standard input fed to a fixture run.
pub const STDIN_EXTENSION: &str = "in";

/// Settings for one harness invocation. Built once from the command line and
/// never modified while the run is in progress.
///
/// 单次测试工具调用的设置。由命令行构建一次，运行期间不会被修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    executable: PathBuf,
    progress_enabled: bool,
    default_timeout: Option<Duration>,
}

impl RunConfiguration {
    /// Creates a configuration for `executable`.
    ///
    /// Tests run with their fixture directory as working directory, so a
    /// relative executable path with a directory component is made absolute
    /// here. A bare program name is left alone and found through `PATH`.
    pub fn new(executable: impl AsRef<Path>, progress_enabled: bool) -> Result<Self> {
        Ok(Self {
            executable: resolve_executable(executable.as_ref())?,
            progress_enabled,
            default_timeout: None,
        })
    }

    /// Sets the timeout applied to tests that do not declare their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn progress_enabled(&self) -> bool {
        self.progress_enabled
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}
