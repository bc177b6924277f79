//! # Commands Module / 命令模块
//!
//! The subcommands of the `compose-harness` CLI.
//!
//! `compose-harness` 命令行的子命令。

pub mod init;
pub mod run;
