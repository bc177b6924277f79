//! # Run Planner Module / 运行计划模块
//!
//! Resolves the selected profile and any command-line overrides into a
//! concrete `RunPlan`, the only input the harness needs.
//!
//! 将所选配置档及命令行覆盖项解析为具体的 `RunPlan`，这是 harness 唯一需要的输入。

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::{ComposeSettings, HarnessConfig, TeardownPolicy};
use crate::infra::command::parse_command_line;
use crate::infra::t;

/// Command-line values that take precedence over the profile.
/// 优先于配置档的命令行值。
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub profile: Option<String>,
    /// Replaces the profile's service list when non-empty.
    pub services: Vec<String>,
    pub wait_secs: Option<u64>,
    pub target: Option<String>,
    pub teardown: Option<TeardownPolicy>,
    pub test_command: Option<String>,
    pub compose_command: Option<String>,
    pub compose_file: Option<PathBuf>,
}

/// A fully resolved harness run.
/// 完全解析后的一次运行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub profile: String,
    pub services: Vec<String>,
    pub wait: Duration,
    pub target: Option<String>,
    pub teardown: TeardownPolicy,
    /// Program and leading arguments of the test runner.
    /// 测试运行器的程序及前置参数。
    pub test_command: Vec<String>,
    /// Program and leading arguments of the orchestration tool.
    /// 编排工具的程序及前置参数。
    pub compose_command: Vec<String>,
    pub compose: ComposeSettings,
    /// Working directory of every child process.
    /// 所有子进程的工作目录。
    pub project_dir: PathBuf,
}

/// Creates a run plan from the configuration and the overrides.
///
/// # Arguments
/// * `config` - The loaded (or built-in) configuration
/// * `overrides` - Values given on the command line
/// * `project_dir` - Absolute project directory
///
/// # Returns
/// A `RunPlan`, or an error if the profile does not exist or a command line
/// cannot be parsed.
pub fn plan_run(
    config: &HarnessConfig,
    overrides: &Overrides,
    project_dir: PathBuf,
) -> Result<RunPlan> {
    let profile = config.profile(overrides.profile.as_deref())?;

    let services = if overrides.services.is_empty() {
        profile.services.clone()
    } else {
        overrides.services.clone()
    };
    if services.iter().any(|service| service.trim().is_empty()) {
        bail!(t!("config.invalid_services", name = &profile.name));
    }

    let mut compose = config.compose.clone();
    if let Some(command) = &overrides.compose_command {
        compose.command = command.clone();
    }
    if let Some(file) = &overrides.compose_file {
        compose.file = Some(file.clone());
    }

    let test_command = overrides
        .test_command
        .as_deref()
        .unwrap_or(&config.test.command);

    Ok(RunPlan {
        profile: profile.name.clone(),
        services,
        wait: Duration::from_secs(overrides.wait_secs.unwrap_or(profile.wait_secs)),
        target: overrides.target.clone().or_else(|| profile.target.clone()),
        teardown: overrides.teardown.unwrap_or(profile.teardown),
        test_command: parse_command_line(test_command)?,
        compose_command: parse_command_line(&compose.command)?,
        compose,
        project_dir,
    })
}
