//! # Harness Initialization Module / Harness 初始化模块
//!
//! This module writes a starter `Harness.toml`, either straight from the
//! built-in profiles or through a short interactive wizard.
//!
//! 此模块生成初始的 `Harness.toml`，可以直接使用内置配置档，也可以通过简短的交互式向导生成。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Asks for the compose command, test command and profile values
//! - **Overwrite Protection**: Confirmation prompt before overwriting an existing file
//!
//! - **交互式向导**: 询问 compose 命令、测试命令和配置档参数
//! - **覆盖保护**: 覆盖现有文件前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{HarnessConfig, Profile};
use crate::infra::t;

/// Runs the wizard and writes the result to `config_path`.
///
/// In non-interactive mode the built-in profiles are written as they are and
/// an existing file is overwritten without asking.
///
/// 运行向导并将结果写入 `config_path`。非交互模式下直接写入内置配置档，并且不询问即覆盖已有文件。
pub fn run_init_wizard(config_path: &Path, language: &str, non_interactive: bool) -> Result<()> {
    let mut config = HarnessConfig {
        language: Some(language.to_string()),
        ..HarnessConfig::default()
    };

    if non_interactive {
        return write_config(config_path, &config);
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome").cyan().bold());
    println!("{}", t!("init.description"));

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = config_path.display()))
            .default(false)
            .interact()
            .with_context(|| t!("init.user_confirmation_failed"))?;
        if !confirmation {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    config.compose.command = Input::with_theme(&theme)
        .with_prompt(t!("init.compose_command_prompt"))
        .default(config.compose.command.clone())
        .interact_text()
        .with_context(|| t!("init.user_confirmation_failed"))?;

    config.test.command = Input::with_theme(&theme)
        .with_prompt(t!("init.test_command_prompt"))
        .default(config.test.command.clone())
        .interact_text()
        .with_context(|| t!("init.user_confirmation_failed"))?;

    let mut profiles = Vec::with_capacity(config.profiles.len());
    for profile in &config.profiles {
        let keep = Confirm::with_theme(&theme)
            .with_prompt(t!("init.include_profile_prompt", name = &profile.name))
            .default(true)
            .interact()
            .with_context(|| t!("init.user_confirmation_failed"))?;
        if keep {
            profiles.push(prompt_profile(&theme, profile)?);
        }
    }

    if profiles.is_empty() {
        println!("{}", t!("init.no_profiles_selected").yellow());
    } else {
        config.profiles = profiles;
    }

    let default_profile = config.profiles.first().map(|p| p.name.clone());
    config.default_profile = default_profile;

    write_config(config_path, &config)
}

/// Asks for the services, wait time and target of one profile.
fn prompt_profile(theme: &ColorfulTheme, template: &Profile) -> Result<Profile> {
    let services: String = Input::with_theme(theme)
        .with_prompt(t!("init.services_prompt", name = &template.name))
        .default(template.services.join(","))
        .validate_with(|input: &String| {
            if split_services(input).is_empty() {
                Err(t!("init.services_required").to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()
        .with_context(|| t!("init.user_confirmation_failed"))?;

    let wait_secs: u64 = Input::with_theme(theme)
        .with_prompt(t!("init.wait_prompt", name = &template.name))
        .default(template.wait_secs)
        .interact_text()
        .with_context(|| t!("init.user_confirmation_failed"))?;

    let target: String = Input::with_theme(theme)
        .with_prompt(t!("init.target_prompt", name = &template.name))
        .default(template.target.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .with_context(|| t!("init.user_confirmation_failed"))?;

    Ok(Profile {
        name: template.name.clone(),
        services: split_services(&services),
        wait_secs,
        target: Some(target).filter(|s| !s.trim().is_empty()),
        teardown: template.teardown,
    })
}

/// Splits a comma-separated service list, dropping blanks.
/// 拆分以逗号分隔的服务列表，忽略空项。
pub fn split_services(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_config(path: &Path, config: &HarnessConfig) -> Result<()> {
    config.validate()?;
    let toml_string =
        toml::to_string_pretty(config).with_context(|| t!("init.serialize_failed"))?;

    fs::write(path, toml_string).with_context(|| t!("init.write_failed", path = path.display()))?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success_created", path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint"));

    Ok(())
}
