//! # Command Execution Module / 命令执行模块
//!
//! Parses configured command lines and runs child processes with the
//! harness's stdio, translating their outcome into shell-style exit codes.
//!
//! 解析配置的命令行，以继承的标准输入输出运行子进程，并将其结果转换为 shell 风格的退出码。

use anyhow::{Context, Result, bail};
use colored::*;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::infra::t;

/// Exit code reported when the program could not be found.
pub const NOT_FOUND_EXIT_CODE: i32 = 127;
/// Exit code reported when the program exists but could not be started.
pub const CANNOT_EXECUTE_EXIT_CODE: i32 = 126;

/// Splits a configured command line into program and arguments.
/// Environment variables and `~` are expanded first.
///
/// # Arguments
/// * `command_line` - e.g. `"docker compose"` or `"$HOME/venv/bin/pytest -x"`
///
/// # Returns
/// The non-empty list of words, program first.
///
/// 将配置的命令行拆分为程序和参数。会先展开环境变量和 `~`。
pub fn parse_command_line(command_line: &str) -> Result<Vec<String>> {
    let expanded = shellexpand::full(command_line)
        .with_context(|| t!("command.expand_failed", command = command_line))?
        .to_string();

    let parts = shlex::split(&expanded)
        .with_context(|| t!("command.parse_failed", command = &expanded))?;

    if parts.is_empty() {
        bail!(t!("command.empty", command = command_line));
    }
    Ok(parts)
}

/// Builds a `tokio::process::Command` from a parsed command line plus extra arguments.
/// 根据解析后的命令行及额外参数构建 `tokio::process::Command`。
pub fn build_command<I, S>(command_line: &[String], extra_args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let (program, args) = match command_line.split_first() {
        Some((program, args)) => (program.as_str(), args),
        None => ("", &[][..]),
    };
    let mut cmd = Command::new(program);
    cmd.args(args).args(extra_args);
    cmd
}

/// Renders a command the way a user would type it, for logging.
/// 以用户输入的形式呈现命令，用于日志输出。
pub fn display_command(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            shlex::try_quote(&part)
                .map(|quoted| quoted.into_owned())
                .unwrap_or_else(|_| part.into_owned())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a command to completion with inherited stdio, so the
/// tool's own output reaches the user unchanged.
///
/// # Returns
/// The process exit code, mapped the way a POSIX shell reports it:
/// the exit status itself, `128 + signal` for a killed child, `127` when the
/// program does not exist and `126` for any other spawn failure.
///
/// 运行命令直至结束，继承标准输入输出，使工具自身的输出原样呈现给用户。
pub async fn run_inherited(mut cmd: Command) -> i32 {
    println!("{} {}", t!("command.prefix").blue(), display_command(&cmd));

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await;

    match status {
        Ok(status) => exit_code_of(&status),
        Err(e) => {
            let code = spawn_failure_code(&e);
            let program = cmd.as_std().get_program().to_string_lossy().into_owned();
            eprintln!(
                "{}",
                t!("command.spawn_failed", program = program, error = e).red()
            );
            code
        }
    }
}

/// Converts an `ExitStatus` into a single integer exit code.
/// 将 `ExitStatus` 转换为单个整数退出码。
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Maps a spawn error to the exit code a shell would report for it.
pub fn spawn_failure_code(error: &io::Error) -> i32 {
    match error.kind() {
        io::ErrorKind::NotFound => NOT_FOUND_EXIT_CODE,
        _ => CANNOT_EXECUTE_EXIT_CODE,
    }
}
