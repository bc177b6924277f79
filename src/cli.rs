// src/cli.rs
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::commands::run::RunArgs;
use crate::config::{DEFAULT_CONFIG_FILE, TeardownPolicy};
use crate::planner::Overrides;
use crate::{commands, infra::t};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

fn build_cli() -> Command {
    Command::new("compose-harness")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about").to_string())
                .args_override_self(true)
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config").to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help(t!("cli.arg_project_dir").to_string())
                        .value_name("PROJECT_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("profile")
                        .short('p')
                        .long("profile")
                        .help(t!("cli.arg_profile").to_string())
                        .value_name("PROFILE")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("service")
                        .short('s')
                        .long("service")
                        .help(t!("cli.arg_service").to_string())
                        .value_name("SERVICE")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("wait")
                        .short('w')
                        .long("wait")
                        .help(t!("cli.arg_wait").to_string())
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .help(t!("cli.arg_target").to_string())
                        .value_name("TARGET")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("test-command")
                        .long("test-command")
                        .help(t!("cli.arg_test_command").to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("compose-command")
                        .long("compose-command")
                        .help(t!("cli.arg_compose_command").to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("compose-file")
                        .short('f')
                        .long("compose-file")
                        .help(t!("cli.arg_compose_file").to_string())
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("teardown")
                        .long("teardown")
                        .help(t!("cli.arg_teardown").to_string())
                        .value_name("POLICY")
                        .value_parser(["on-success", "always"])
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help(t!("cli.arg_report").to_string())
                        .value_name("REPORT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help(t!("cli.arg_dry_run").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about").to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_init_config").to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args(matches: &ArgMatches, lang_explicit: bool) -> Result<RunArgs> {
    let teardown = matches
        .get_one::<String>("teardown")
        .map(|value| value.parse::<TeardownPolicy>())
        .transpose()?;

    let overrides = Overrides {
        profile: matches.get_one::<String>("profile").cloned(),
        services: matches
            .get_many::<String>("service")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        wait_secs: matches.get_one::<u64>("wait").copied(),
        target: matches.get_one::<String>("target").cloned(),
        teardown,
        test_command: matches.get_one::<String>("test-command").cloned(),
        compose_command: matches.get_one::<String>("compose-command").cloned(),
        compose_file: matches.get_one::<PathBuf>("compose-file").cloned(),
    };

    Ok(RunArgs {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        config_explicit: matches.value_source("config") == Some(ValueSource::CommandLine),
        project_dir: matches
            .get_one::<PathBuf>("project-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        overrides,
        report: matches.get_one::<PathBuf>("report").cloned(),
        dry_run: matches.get_flag("dry-run"),
        lang_explicit,
    })
}

/// Parses the command line and dispatches to a subcommand.
///
/// # Returns
/// The process exit code.
pub async fn run() -> Result<i32> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language();
    let language = explicit_language
        .as_deref()
        .map(crate::resolve_locale)
        .unwrap_or_else(crate::detect_locale);
    rust_i18n::set_locale(&language);

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = run_args(run_matches, explicit_language.is_some())?;
            commands::run::execute(args).await
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let config = init_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

            // Show language detection message if it was auto-detected
            if explicit_language.is_none() && !non_interactive {
                println!("{}", t!("init.system_language_detected", lang = &language));
            }
            commands::init::run_init_wizard(&config, &language, non_interactive)?;
            Ok(0)
        }
        // `arg_required_else_help` has already printed the help.
        _ => Ok(0),
    }
}
