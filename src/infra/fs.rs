//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file system queries discovery relies on:
//! deterministic directory listings, sidecar lookups and executable path
//! resolution.
//!
//! 此模块提供发现过程所依赖的文件系统查询：
//! 确定性的目录列表、附属文件查找和可执行文件路径解析。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the regular files directly inside `dir` whose extension is
/// `extension`, sorted lexicographically by file name.
///
/// Directory listing order is platform dependent; sorting here keeps
/// discovery, execution and report order identical across runs and systems.
///
/// # Arguments
/// * `dir` - Directory to scan (not recursive)
/// * `extension` - Extension without the leading dot, e.g. `impala`
///
/// # Returns
/// The matching paths, or the I/O error raised while reading the directory
pub fn list_files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Follows symlinks, so linked fixtures count as files.
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Returns the sibling of `file` with its extension replaced by `extension`,
/// if such a file exists.
///
/// `loops.impala` + `output` → `loops.output`
pub fn sidecar(file: &Path, extension: &str) -> Option<PathBuf> {
    let candidate = file.with_extension(extension);
    candidate.is_file().then_some(candidate)
}

/// Resolves the executable under test against the current directory.
///
/// Paths with more than one component (`../build/bin/impala`, `./a.out`) are
/// made absolute so they stay valid once a test changes its working
/// directory. Single-component names (`cat`) are returned untouched and
/// resolved through `PATH` at spawn time.
pub fn resolve_executable(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() || path.components().count() <= 1 {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path)
}
