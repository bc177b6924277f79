//! # CLI Integration Tests / CLI 集成测试
//!
//! Runs the `compose-harness` binary against fake compose and test runner
//! scripts that record every invocation, so the full up/wait/test/down
//! sequence is checked without Docker.
//!
//! 针对记录每次调用的假 compose 和测试运行器脚本运行 `compose-harness`，无需 Docker 即可检查完整流程。

#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::{read_call_log, write_fake_compose, write_fake_test_runner};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

/// A project directory with fake tools and a call log.
struct Fixture {
    dir: TempDir,
    compose: String,
    test_runner: String,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        let compose = write_fake_compose(dir.path());
        let test_runner = write_fake_test_runner(dir.path());
        let log = dir.path().join("calls.log");
        Self {
            dir,
            compose,
            test_runner,
            log,
        }
    }

    /// `compose-harness --lang en run` wired to the fake tools, with no wait.
    fn run_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("compose-harness").unwrap();
        cmd.env("CALL_LOG", &self.log)
            .env("NO_COLOR", "1")
            .arg("--lang")
            .arg("en")
            .arg("run")
            .arg("--project-dir")
            .arg(self.dir.path())
            .arg("--compose-command")
            .arg(&self.compose)
            .arg("--test-command")
            .arg(&self.test_runner)
            .arg("--wait")
            .arg("0");
        cmd
    }

    fn calls(&self) -> Vec<String> {
        read_call_log(&self.log)
    }
}

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn test_successful_run_with_builtin_profile() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .assert()
            .success()
            .stdout(predicate::str::contains("built-in profiles"))
            .stdout(predicate::str::contains("HARNESS RUN PASSED"));

        assert_eq!(
            fixture.calls(),
            vec!["compose up -d test_db", "test tests/", "compose down"]
        );
    }

    #[test]
    fn test_integration_profile() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--profile")
            .arg("integration")
            .assert()
            .success();

        assert_eq!(
            fixture.calls(),
            vec![
                "compose up -d test_db api",
                "test tests/test_integration.py",
                "compose down",
            ]
        );
    }

    #[test]
    fn test_failing_tests_propagate_exit_code_and_skip_teardown() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .env("TEST_EXIT", "1")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("still running"))
            .stdout(predicate::str::contains("HARNESS RUN FAILED"));

        assert_eq!(fixture.calls(), vec!["compose up -d test_db", "test tests/"]);
    }

    #[test]
    fn test_always_teardown_policy_runs_down_after_failure() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .env("TEST_EXIT", "2")
            .arg("--teardown")
            .arg("always")
            .assert()
            .code(2);

        assert_eq!(
            fixture.calls(),
            vec!["compose up -d test_db", "test tests/", "compose down"]
        );
    }

    #[test]
    fn test_startup_failure_propagates_compose_exit_code() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .env("UP_EXIT", "3")
            .arg("--teardown")
            .arg("always")
            .assert()
            .code(3)
            .stdout(predicate::str::contains("Failed to start services"));

        assert_eq!(fixture.calls(), vec!["compose up -d test_db"]);
    }

    #[test]
    fn test_teardown_failure_propagates_exit_code() {
        let fixture = Fixture::new();

        fixture.run_cmd().env("DOWN_EXIT", "4").assert().code(4);

        assert_eq!(fixture.calls().len(), 3);
    }

    #[test]
    fn test_service_and_target_overrides() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--service")
            .arg("postgres")
            .arg("-s")
            .arg("redis")
            .arg("--target")
            .arg("tests/test_pgvector_database.py")
            .assert()
            .success();

        assert_eq!(
            fixture.calls(),
            vec![
                "compose up -d postgres redis",
                "test tests/test_pgvector_database.py",
                "compose down",
            ]
        );
    }

    #[test]
    fn test_sigint_during_tests_reports_interruption() {
        let fixture = Fixture::new();
        let child = fixture
            .run_cmd()
            .env("TEST_SLEEP", "30")
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(20);
        while !fixture.calls().iter().any(|call| call.starts_with("test")) {
            assert!(Instant::now() < deadline, "test runner never started");
            thread::sleep(Duration::from_millis(50));
        }
        let status = Command::new("kill")
            .arg("-INT")
            .arg(child.id().to_string())
            .status()
            .unwrap();
        assert!(status.success());

        let output = child.wait_with_output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(output.status.code(), Some(130));
        assert!(stdout.contains("Test run interrupted"), "stdout: {stdout}");
        assert!(!stdout.contains("Tests failed"), "stdout: {stdout}");
        assert_eq!(fixture.calls(), vec!["compose up -d test_db", "test tests/"]);
    }

    #[test]
    fn test_missing_compose_tool_exits_127() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--compose-command")
            .arg("this_command_definitely_does_not_exist_12345")
            .assert()
            .code(127);

        assert!(fixture.calls().is_empty());
    }
}

#[cfg(test)]
mod config_file_tests {
    use super::*;

    #[test]
    fn test_profile_from_config_file() {
        let fixture = Fixture::new();
        let config = r#"
default_profile = "vectors"

[[profiles]]
name = "vectors"
services = ["pgvector"]
wait_secs = 0
target = "tests/test_pgvector_database.py"
"#;
        fs::write(fixture.dir.path().join("Harness.toml"), config).unwrap();

        fixture
            .run_cmd()
            .assert()
            .success()
            .stdout(predicate::str::contains("Loaded configuration"))
            .stdout(predicate::str::contains("'vectors'"));

        assert_eq!(
            fixture.calls(),
            vec![
                "compose up -d pgvector",
                "test tests/test_pgvector_database.py",
                "compose down",
            ]
        );
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--config")
            .arg("nope.toml")
            .assert()
            .failure()
            .stderr(predicate::str::contains("nope.toml"));

        assert!(fixture.calls().is_empty());
    }

    #[test]
    fn test_unknown_profile_fails_before_running_anything() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--profile")
            .arg("nightly")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Profile 'nightly' not found"));

        assert!(fixture.calls().is_empty());
    }

    #[test]
    fn test_invalid_teardown_value_is_rejected_by_the_parser() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--teardown")
            .arg("sometimes")
            .assert()
            .failure();
    }
}

#[cfg(test)]
mod output_tests {
    use super::*;

    #[test]
    fn test_dry_run_prints_commands_without_running_them() {
        let fixture = Fixture::new();

        fixture
            .run_cmd()
            .arg("--profile")
            .arg("integration")
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains("up -d test_db api"))
            .stdout(predicate::str::contains("tests/test_integration.py"))
            .stdout(predicate::str::contains("teardown: on-success"));

        assert!(fixture.calls().is_empty());
    }

    #[test]
    fn test_json_report_is_written() {
        let fixture = Fixture::new();
        let report_path = fixture.dir.path().join("out").join("report.json");

        fixture
            .run_cmd()
            .env("TEST_EXIT", "1")
            .arg("--report")
            .arg(&report_path)
            .assert()
            .code(1);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["profile"], "all");
        assert_eq!(report["error"]["kind"], "test-failure");
        assert_eq!(report["steps"].as_array().unwrap().len(), 3);
    }
}

#[cfg(test)]
mod init_tests {
    use super::*;
    use compose_harness::config::load_config;

    #[test]
    fn test_non_interactive_init_writes_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Harness.toml");

        Command::cargo_bin("compose-harness")
            .unwrap()
            .env("NO_COLOR", "1")
            .arg("--lang")
            .arg("en")
            .arg("init")
            .arg("--non-interactive")
            .arg("--config")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let config = load_config(&path).unwrap();
        assert_eq!(config.language.as_deref(), Some("en"));
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profile(None).unwrap().name, "all");
    }

    #[test]
    fn test_no_subcommand_prints_help() {
        Command::cargo_bin("compose-harness")
            .unwrap()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage"));
    }
}
