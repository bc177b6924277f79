//! # Compose Harness Library / Compose Harness 库
//!
//! This library provides the core functionality for the `compose-harness`
//! tool: bring docker-compose services up, wait, run a test suite against
//! them and tear them down again.
//!
//! 此库为 `compose-harness` 工具提供核心功能：
//! 启动 docker-compose 服务、等待、针对它们运行测试套件，然后再将其关闭。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, run planning, data models and the harness run
//! - `infra` - Process execution, compose/test runner adapters and path handling
//! - `reporting` - Console summaries and JSON reports
//! - `cli` / `commands` - Command-line interface and its subcommands
//!
//! - `core` - 配置、运行计划、数据模型和运行流程
//! - `infra` - 进程执行、compose/测试运行器适配和路径处理
//! - `reporting` - 控制台摘要和 JSON 报告
//! - `cli` / `commands` - 命令行接口及其子命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::harness;
pub use crate::core::models;
pub use crate::core::planner;

/// Picks the UI language from the system locale.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en"), and finally falls back to "en".
pub fn detect_locale() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    resolve_locale(&locale)
}

/// Maps a requested locale onto one of the bundled translations.
/// POSIX forms such as `zh_CN.UTF-8` are accepted.
/// 将请求的语言映射到内置翻译之一。
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    // "zh_CN.UTF-8" -> "zh-CN"
    let normalized = requested
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    if available_locales.contains(&normalized.as_str()) {
        return normalized;
    }
    normalized
        .split('-')
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
