//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the harness,
//! including configuration, run planning, data models and the run itself.
//!
//! 此模块包含 harness 的核心功能，
//! 包括配置、运行计划、数据模型以及运行流程本身。

pub mod config;
pub mod harness;
pub mod models;
pub mod planner;

// Re-exports
pub use config::HarnessConfig;
pub use harness::Harness;
pub use models::RunReport;
