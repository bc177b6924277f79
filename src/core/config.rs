//! # Configuration Module / 配置模块
//!
//! Defines the `Harness.toml` schema: compose settings, the test command and
//! the named profiles that describe one harness run each.
//!
//! 定义 `Harness.toml` 的结构：compose 设置、测试命令以及描述单次运行的命名配置档。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::infra::t;

/// The file name looked up in the project directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Harness.toml";

/// Decides whether `down` runs after a failing test.
/// 决定测试失败后是否执行 `down`。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeardownPolicy {
    /// Tear down only when the test runner passed. A failing test leaves the
    /// containers running, exactly like a fail-fast shell script.
    /// 仅在测试通过时清理。测试失败会让容器继续运行，与 fail-fast 脚本一致。
    #[default]
    OnSuccess,
    /// Tear down whenever the services came up, regardless of the test outcome.
    /// 只要服务启动成功，无论测试结果如何都进行清理。
    Always,
}

impl fmt::Display for TeardownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownPolicy::OnSuccess => write!(f, "on-success"),
            TeardownPolicy::Always => write!(f, "always"),
        }
    }
}

impl FromStr for TeardownPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "on-success" => Ok(TeardownPolicy::OnSuccess),
            "always" => Ok(TeardownPolicy::Always),
            other => bail!(t!("config.unknown_teardown_policy", value = other)),
        }
    }
}

/// How the orchestration tool is invoked.
/// 编排工具的调用方式。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComposeSettings {
    /// The compose command line, e.g. `docker-compose` or `docker compose`.
    #[serde(default = "default_compose_command")]
    pub command: String,
    /// Passed as `-f <file>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Passed as `-p <name>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Passed as `--env-file <file>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            command: default_compose_command(),
            file: None,
            project_name: None,
            env_file: None,
        }
    }
}

/// The test runner invocation. The target is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestSettings {
    #[serde(default = "default_test_command")]
    pub command: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            command: default_test_command(),
        }
    }
}

/// One named harness run: which services to start, how long to wait and
/// what to test.
/// 一次命名的运行：启动哪些服务、等待多久、测试什么。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Unique profile name, selected with `--profile`.
    /// 唯一的配置档名称，通过 `--profile` 选择。
    pub name: String,
    /// Services passed to `up -d`, in order.
    /// 按顺序传给 `up -d` 的服务。
    pub services: Vec<String>,
    /// Fixed delay between `up` and the test runner.
    /// `up` 与测试运行之间的固定等待时间。
    #[serde(default)]
    pub wait_secs: u64,
    /// Test file or directory. The runner is invoked without one when absent.
    /// 测试文件或目录。缺省时不带目标调用测试运行器。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub teardown: TeardownPolicy,
}

/// The whole `Harness.toml` document.
/// 整个 `Harness.toml` 文档。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// The language for console messages (e.g., "en", "zh-CN"). `--lang`
    /// wins over it; the system locale is used when neither is set.
    /// 控制台消息的语言（例如 "en", "zh-CN"）。`--lang` 优先；两者都未设置时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Profile used when `--profile` is not given. Defaults to the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub compose: ComposeSettings,
    #[serde(default)]
    pub test: TestSettings,
    pub profiles: Vec<Profile>,
}

impl Default for HarnessConfig {
    /// The two stock setups: the general suite against the database only, and
    /// the integration suite against the database plus the API.
    fn default() -> Self {
        Self {
            language: None,
            default_profile: Some("all".to_string()),
            compose: ComposeSettings::default(),
            test: TestSettings::default(),
            profiles: vec![
                Profile {
                    name: "all".to_string(),
                    services: vec!["test_db".to_string()],
                    wait_secs: 10,
                    target: Some("tests/".to_string()),
                    teardown: TeardownPolicy::OnSuccess,
                },
                Profile {
                    name: "integration".to_string(),
                    services: vec!["test_db".to_string(), "api".to_string()],
                    wait_secs: 15,
                    target: Some("tests/test_integration.py".to_string()),
                    teardown: TeardownPolicy::OnSuccess,
                },
            ],
        }
    }
}

impl HarnessConfig {
    /// Looks up a profile by name, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<&Profile> {
        let wanted = name.or(self.default_profile.as_deref());
        match wanted {
            Some(wanted) => self
                .profiles
                .iter()
                .find(|p| p.name == wanted)
                .with_context(|| t!("config.profile_not_found", name = wanted)),
            None => self
                .profiles
                .first()
                .with_context(|| t!("config.no_profiles")),
        }
    }

    /// Checks the invariants `serde` cannot express.
    /// 检查 `serde` 无法表达的约束。
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            bail!(t!("config.no_profiles"));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                bail!(t!("config.empty_profile_name"));
            }
            if !seen.insert(profile.name.as_str()) {
                bail!(t!("config.duplicate_profile", name = &profile.name));
            }
            if profile.services.is_empty() || profile.services.iter().any(|s| s.trim().is_empty()) {
                bail!(t!("config.invalid_services", name = &profile.name));
            }
        }

        if let Some(default) = &self.default_profile {
            if !seen.contains(default.as_str()) {
                bail!(t!("config.profile_not_found", name = default));
            }
        }

        if self.compose.command.trim().is_empty() {
            bail!(t!("config.empty_command", field = "compose.command"));
        }
        if self.test.command.trim().is_empty() {
            bail!(t!("config.empty_command", field = "test.command"));
        }

        Ok(())
    }
}

/// Reads, parses and validates a `Harness.toml` file.
/// 读取、解析并验证 `Harness.toml` 文件。
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()))?;
    let config: HarnessConfig = toml::from_str(&content)
        .with_context(|| t!("config.parse_failed", path = path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Loads `path` if it exists. A missing file is only acceptable when the
/// caller did not ask for it explicitly; the built-in profiles are used then.
/// 如果 `path` 存在则加载。仅当调用方未显式指定时，缺失的文件才会回退到内置配置。
pub fn load_or_default(path: &Path, explicit: bool) -> Result<HarnessConfig> {
    if !explicit && !path.exists() {
        return Ok(HarnessConfig::default());
    }
    load_config(path)
}

fn default_compose_command() -> String {
    "docker-compose".to_string()
}

fn default_test_command() -> String {
    "pytest".to_string()
}
