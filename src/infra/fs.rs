//! # File System Operations Module / 文件系统操作模块
//!
//! Path resolution for the project directory and the config file.
//!
//! 项目目录和配置文件的路径解析。

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Resolves the project directory to an absolute path.
/// All child processes run inside it.
///
/// # Arguments
/// * `path` - Directory given on the command line, `~` and variables allowed
///
/// # Returns
/// The canonical path, or an error if it is missing or not a directory.
pub fn resolve_project_dir(path: &Path) -> Result<PathBuf> {
    let expanded = expand_path(path)?;
    if !is_directory(&expanded) {
        bail!(t!("fs.project_dir_not_found", path = expanded.display()));
    }
    fs::canonicalize(&expanded)
        .with_context(|| t!("fs.project_dir_not_found", path = expanded.display()))
}

/// Resolves the config path. Relative paths are taken relative to the
/// project directory.
/// 解析配置文件路径。相对路径以项目目录为基准。
pub fn resolve_config_path(project_dir: &Path, config: &Path) -> Result<PathBuf> {
    let expanded = expand_path(config)?;
    Ok(if expanded.is_absolute() {
        expanded
    } else {
        project_dir.join(expanded)
    })
}

/// Expands `~` and environment variables in a path.
fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| t!("command.expand_failed", command = &raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
