//! # Commands Module / 命令模块
//!
//! Command implementations behind the `run_tests` CLI.
//!
//! `run_tests` CLI 背后的命令实现。

pub mod run;
