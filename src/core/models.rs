//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures produced by a harness run: the
//! steps, their recorded outcomes, the error taxonomy and the final report.
//!
//! 此模块定义运行过程中产生的数据结构：步骤、记录的结果、错误分类以及最终报告。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::infra::t;

/// Exit code used when the run is cancelled by Ctrl-C, as a shell would report it.
/// 被 Ctrl-C 取消时使用的退出码，与 shell 的报告方式相同。
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The four stages of a harness run, in execution order.
/// 一次运行的四个阶段，按执行顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// `compose up -d <services>`
    Up,
    /// The fixed readiness delay.
    Wait,
    /// `<test-command> [target]`
    Test,
    /// `compose down`
    Down,
}

impl Step {
    /// Gets the localized display name of the step.
    /// 获取步骤的本地化显示名称。
    pub fn label(&self) -> String {
        match self {
            Step::Up => t!("step.up").to_string(),
            Step::Wait => t!("step.wait").to_string(),
            Step::Test => t!("step.test").to_string(),
            Step::Down => t!("step.down").to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Up => "up",
            Step::Wait => "wait",
            Step::Test => "test",
            Step::Down => "down",
        };
        f.write_str(name)
    }
}

/// The outcome of one executed step.
/// 单个已执行步骤的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    /// Exit code of the external tool; `0` for a completed wait.
    /// 外部工具的退出码；等待完成时为 `0`。
    pub exit_code: i32,
    pub duration: Duration,
}

impl StepRecord {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Everything that can abort a harness run.
/// 所有可能中止运行的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HarnessError {
    /// The orchestration tool failed to bring the services up.
    #[error("failed to start services [{}] (exit code {code})", .services.join(", "))]
    Startup { services: Vec<String>, code: i32 },
    /// The test runner returned non-zero.
    #[error("test runner failed (exit code {code})")]
    TestFailure { code: i32 },
    /// The orchestration tool failed to stop the services.
    #[error("failed to stop services (exit code {code})")]
    Teardown { code: i32 },
    /// A shutdown signal arrived during the wait or the test run.
    #[error("run interrupted")]
    Interrupted,
}

impl HarnessError {
    /// The process exit code this error propagates.
    /// 此错误传播的进程退出码。
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Startup { code, .. }
            | HarnessError::TestFailure { code }
            | HarnessError::Teardown { code } => *code,
            HarnessError::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }

    /// The step at which this error was raised.
    pub fn step(&self) -> Option<Step> {
        match self {
            HarnessError::Startup { .. } => Some(Step::Up),
            HarnessError::TestFailure { .. } => Some(Step::Test),
            HarnessError::Teardown { .. } => Some(Step::Down),
            HarnessError::Interrupted => None,
        }
    }
}

/// The complete record of one harness run.
/// 一次运行的完整记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the profile that was run.
    /// 所运行配置档的名称。
    pub profile: String,
    pub services: Vec<String>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Executed steps, in order. Steps skipped by an abort are absent.
    /// 按顺序记录已执行的步骤。因中止而跳过的步骤不会出现。
    pub steps: Vec<StepRecord>,
    /// The error that decided the exit code, if any.
    /// 决定退出码的错误（如有）。
    pub error: Option<HarnessError>,
    /// A teardown failure that happened after `error` had already been set.
    /// 在 `error` 已设置后发生的清理失败。
    pub teardown_error: Option<HarnessError>,
}

impl RunReport {
    pub fn new(profile: &str, services: &[String]) -> Self {
        let now = Local::now();
        Self {
            profile: profile.to_string(),
            services: services.to_vec(),
            started_at: now,
            finished_at: now,
            steps: Vec::new(),
            error: None,
            teardown_error: None,
        }
    }

    /// `0` on full success, otherwise the exit code of the deciding error.
    /// 完全成功时为 `0`，否则为决定性错误的退出码。
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map_or(0, HarnessError::exit_code)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.teardown_error.is_none()
    }

    pub fn record(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == step)
    }

    /// How many times a step was executed.
    pub fn count(&self, step: Step) -> usize {
        self.steps.iter().filter(|r| r.step == step).count()
    }

    /// True when `up` succeeded but no successful `down` followed it.
    /// 当 `up` 成功但之后没有成功的 `down` 时为真。
    pub fn containers_left_running(&self) -> bool {
        let started = self.record(Step::Up).is_some_and(StepRecord::succeeded);
        let stopped = self.record(Step::Down).is_some_and(StepRecord::succeeded);
        started && !stopped
    }
}
