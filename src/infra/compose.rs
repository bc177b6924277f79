//! # Compose Module / Compose 模块
//!
//! The real orchestration tool and test runner behind the harness traits.
//! Both shell out through `infra::command` and report plain exit codes.
//!
//! harness trait 背后的真实编排工具和测试运行器。两者都通过 `infra::command` 调用外部进程并报告退出码。

use std::path::PathBuf;
use tokio::process::Command;

use crate::core::harness::{Orchestrator, TestRunner};
use crate::core::planner::RunPlan;
use crate::infra::command::{build_command, run_inherited};

/// A docker-compose style orchestration tool.
/// docker-compose 风格的编排工具。
#[derive(Debug, Clone)]
pub struct DockerCompose {
    /// Program, its leading arguments and the global compose flags.
    base: Vec<String>,
    project_dir: PathBuf,
}

impl DockerCompose {
    pub fn from_plan(plan: &RunPlan) -> Self {
        let mut base = plan.compose_command.clone();
        if let Some(file) = &plan.compose.file {
            base.push("-f".to_string());
            base.push(file.to_string_lossy().into_owned());
        }
        if let Some(name) = &plan.compose.project_name {
            base.push("-p".to_string());
            base.push(name.clone());
        }
        if let Some(env_file) = &plan.compose.env_file {
            base.push("--env-file".to_string());
            base.push(env_file.to_string_lossy().into_owned());
        }
        Self {
            base,
            project_dir: plan.project_dir.clone(),
        }
    }

    /// `<compose> up -d <service...>`
    pub fn up_command(&self, services: &[String]) -> Command {
        let args = ["up", "-d"]
            .into_iter()
            .map(str::to_string)
            .chain(services.iter().cloned());
        let mut cmd = build_command(&self.base, args);
        cmd.current_dir(&self.project_dir);
        cmd
    }

    /// `<compose> down`
    pub fn down_command(&self) -> Command {
        let mut cmd = build_command(&self.base, ["down"]);
        cmd.current_dir(&self.project_dir);
        cmd
    }
}

impl Orchestrator for DockerCompose {
    async fn up(&self, services: &[String]) -> i32 {
        run_inherited(self.up_command(services)).await
    }

    async fn down(&self) -> i32 {
        run_inherited(self.down_command()).await
    }
}

/// Runs the configured test command, e.g. `pytest tests/`.
/// 运行配置的测试命令，例如 `pytest tests/`。
#[derive(Debug, Clone)]
pub struct CommandTestRunner {
    command: Vec<String>,
    project_dir: PathBuf,
}

impl CommandTestRunner {
    pub fn from_plan(plan: &RunPlan) -> Self {
        Self {
            command: plan.test_command.clone(),
            project_dir: plan.project_dir.clone(),
        }
    }

    /// `<test-command> [target]`
    pub fn test_command(&self, target: Option<&str>) -> Command {
        let mut cmd = build_command(&self.command, target);
        cmd.current_dir(&self.project_dir);
        cmd
    }
}

impl TestRunner for CommandTestRunner {
    async fn run(&self, target: Option<&str>) -> i32 {
        run_inherited(self.test_command(target)).await
    }
}
