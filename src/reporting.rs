//! # Reporting Module / 报告模块
//!
//! This module handles the display and persistence of run results: colorful,
//! localized console summaries and a machine-readable JSON report.
//!
//! 此模块处理运行结果的展示与持久化：彩色本地化的控制台摘要以及机器可读的 JSON 报告。

pub mod console;
pub mod json;

// Re-export common reporting functions
pub use console::{print_outcome, print_plan, print_summary};
pub use json::write_report;
