//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which resolves a profile into
//! a run plan and executes it against the real compose tool and test runner.
//!
//! 此模块实现 `run` 命令：将配置档解析为运行计划，并针对真实的 compose 工具和测试运行器执行。

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config,
        harness::Harness,
        planner::{self, Overrides},
    },
    infra::{
        compose::{CommandTestRunner, DockerCompose},
        fs, t,
    },
    reporting::{print_outcome, print_plan, print_summary, write_report},
};

/// Everything the `run` subcommand was asked to do.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    /// Whether `--config` was given; only then is a missing file an error.
    pub config_explicit: bool,
    pub project_dir: PathBuf,
    pub overrides: Overrides,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
    /// Whether `--lang` was given; it then wins over the config's language.
    pub lang_explicit: bool,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// The exit code of the harness run, or an error if the configuration could
/// not be loaded or planned.
pub async fn execute(args: RunArgs) -> Result<i32> {
    let project_dir = fs::resolve_project_dir(&args.project_dir)?;
    let config_path = fs::resolve_config_path(&project_dir, &args.config)?;
    let config = config::load_or_default(&config_path, args.config_explicit)?;

    if !args.lang_explicit {
        if let Some(language) = &config.language {
            rust_i18n::set_locale(&crate::resolve_locale(language));
        }
    }

    println!(
        "{}",
        t!("run.project_dir", path = project_dir.display())
    );
    if config_path.exists() {
        println!("{}", t!("run.loaded_config", path = config_path.display()));
    } else {
        println!("{}", t!("run.builtin_config").dimmed());
    }

    let plan = planner::plan_run(&config, &args.overrides, project_dir)?;
    println!(
        "{}",
        t!(
            "run.profile_selected",
            profile = &plan.profile,
            teardown = plan.teardown
        )
        .bold()
    );

    if args.dry_run {
        print_plan(&plan);
        return Ok(0);
    }

    let stop_token = setup_signal_handler();
    let harness = Harness::new(
        DockerCompose::from_plan(&plan),
        CommandTestRunner::from_plan(&plan),
    )
    .with_stop_token(stop_token);

    let report = harness.run(&plan).await;

    print_summary(&report);

    if let Some(report_path) = &args.report {
        match write_report(&report, report_path) {
            Ok(()) => println!(
                "\n{}",
                t!("run.report_written", path = report_path.display())
            ),
            Err(e) => eprintln!("{} {:#}", t!("run.report_failed").red(), e),
        }
    }

    print_outcome(&report, &plan);

    Ok(report.exit_code())
}

/// Sets up a signal handler that cancels the returned token on Ctrl-C.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        // If the listener cannot be installed the run is simply not interruptible.
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
