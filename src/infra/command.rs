//! # Command Execution Module / 命令执行模块
//!
//! Spawns the executable under test, feeds its standard input and captures
//! standard output and standard error, optionally bounded by a timeout.
//!
//! 派生被测可执行文件，为其提供标准输入并捕获标准输出和标准错误，
//! 可选地受超时限制。

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Everything a finished process left behind.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Stdout followed by stderr, the way a terminal would have shown them.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// How a spawned process ended.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// The process exited on its own.
    Exited(CapturedOutput),
    /// The process outlived its time limit and was killed.
    TimedOut(Duration),
}

/// Spawns a command, writes `stdin` to it and captures stdout and stderr.
///
/// Both output streams are drained concurrently with the stdin writer, so a
/// child producing a lot of output while still reading input cannot
/// deadlock. When `timeout` elapses first the child is killed and reaped.
///
/// 派生一个命令，向其写入 `stdin` 并捕获 stdout 和 stderr。
/// 两个输出流与 stdin 写入并发进行，因此子进程不会死锁。
/// 如果先到达 `timeout`，子进程会被终止并回收。
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `stdin` - Bytes for the child's standard input; `None` attaches null.
/// * `timeout` - Optional wall-clock limit for the whole run.
///
/// # Returns
/// The process outcome, or the I/O error that prevented spawning or waiting.
pub async fn spawn_and_capture(
    mut cmd: Command,
    stdin: Option<Vec<u8>>,
    timeout: Option<Duration>,
) -> io::Result<ProcessOutcome> {
    let stdin_cfg = if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    };
    let mut child = cmd
        .stdin(stdin_cfg)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    if let (Some(mut pipe), Some(bytes)) = (child.stdin.take(), stdin) {
        tokio::spawn(async move {
            // A child that exits without reading its input closes the pipe;
            // that is its own business, not a harness fault.
            let _ = pipe.write_all(&bytes).await;
        });
    }

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stdout"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

    let collect = async {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let (out_res, err_res) = tokio::join!(
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err)
        );
        out_res?;
        err_res?;
        let status = child.wait().await?;
        Ok::<_, io::Error>(CapturedOutput {
            status,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        })
    };

    let finished = match timeout {
        Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
        None => Some(collect.await),
    };

    match finished {
        Some(captured) => captured.map(ProcessOutcome::Exited),
        None => {
            let limit = timeout.unwrap_or_default();
            // kill() also waits, so no zombie is left behind.
            let _ = child.kill().await;
            Ok(ProcessOutcome::TimedOut(limit))
        }
    }
}
