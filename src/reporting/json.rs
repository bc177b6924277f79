//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes the `RunReport` to disk as pretty-printed JSON, for CI systems that
//! want to know which step failed without scraping console output.
//!
//! 将 `RunReport` 以格式化 JSON 写入磁盘，供 CI 系统读取失败步骤而无需解析控制台输出。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::RunReport;
use crate::infra::t;

/// Serializes `report` and writes it to `path`, creating parent directories.
/// 序列化 `report` 并写入 `path`，必要时创建父目录。
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| t!("report.write_failed", path = path.display()))?;
    }

    let json = serde_json::to_string_pretty(report)
        .with_context(|| t!("report.serialize_failed"))?;
    fs::write(path, json).with_context(|| t!("report.write_failed", path = path.display()))?;
    Ok(())
}

/// Reads a report written by `write_report`.
pub fn read_report(path: &Path) -> Result<RunReport> {
    let content =
        fs::read_to_string(path).with_context(|| t!("report.read_failed", path = path.display()))?;
    serde_json::from_str(&content).with_context(|| t!("report.read_failed", path = path.display()))
}
