//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the harness,
//! including process execution, the compose and test runner adapters,
//! path resolution and i18n support.
//!
//! 此模块为 harness 提供基础设施服务，
//! 包括进程执行、compose 与测试运行器适配、路径解析和国际化支持。

pub mod command;
pub mod compose;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
