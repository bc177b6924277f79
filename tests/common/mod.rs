// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use compose_harness::config::{ComposeSettings, TeardownPolicy};
use compose_harness::harness::{Orchestrator, TestRunner};
use compose_harness::planner::RunPlan;

/// One call made by the harness into a fake collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Up(Vec<String>),
    Test(Option<String>),
    Down,
}

/// Calls shared between the fake orchestrator and the fake test runner,
/// stamped with the tokio clock so paused-time tests can measure the wait.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl CallLog {
    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn count(&self, wanted: fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|(c, _)| wanted(c)).count()
    }

    /// Time between the first `Up` and the first `Test` call.
    pub fn up_to_test(&self) -> Option<Duration> {
        let calls = self.calls.lock().unwrap();
        let up = calls.iter().find(|(c, _)| matches!(c, Call::Up(_)))?.1;
        let test = calls.iter().find(|(c, _)| matches!(c, Call::Test(_)))?.1;
        Some(test.duration_since(up))
    }
}

pub struct FakeCompose {
    pub log: Arc<CallLog>,
    pub up_code: i32,
    pub down_code: i32,
}

impl Orchestrator for FakeCompose {
    async fn up(&self, services: &[String]) -> i32 {
        self.log.push(Call::Up(services.to_vec()));
        self.up_code
    }

    async fn down(&self) -> i32 {
        self.log.push(Call::Down);
        self.down_code
    }
}

pub struct FakeRunner {
    pub log: Arc<CallLog>,
    pub code: i32,
    /// Never finish, so only cancellation can end the test step.
    pub hang: bool,
}

impl TestRunner for FakeRunner {
    async fn run(&self, target: Option<&str>) -> i32 {
        self.log.push(Call::Test(target.map(str::to_string)));
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.code
    }
}

/// Builds a fake orchestrator/runner pair sharing one call log.
pub fn fakes(up_code: i32, test_code: i32, down_code: i32) -> (FakeCompose, FakeRunner, Arc<CallLog>) {
    let log = Arc::new(CallLog::default());
    (
        FakeCompose {
            log: Arc::clone(&log),
            up_code,
            down_code,
        },
        FakeRunner {
            log: Arc::clone(&log),
            code: test_code,
            hang: false,
        },
        log,
    )
}

pub fn plan(services: &[&str], wait_secs: u64, target: Option<&str>, teardown: TeardownPolicy) -> RunPlan {
    RunPlan {
        profile: "test".to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
        wait: Duration::from_secs(wait_secs),
        target: target.map(str::to_string),
        teardown,
        test_command: vec!["pytest".to_string()],
        compose_command: vec!["docker-compose".to_string()],
        compose: ComposeSettings::default(),
        project_dir: PathBuf::from("/project"),
    }
}

/// Writes a fake compose tool that appends its arguments to `calls.log` and
/// exits with `$UP_EXIT` / `$DOWN_EXIT`. Returns the command line to use.
pub fn write_fake_compose(dir: &Path) -> String {
    let script = dir.join("fake-compose.sh");
    let content = r#"#!/bin/sh
echo "compose $*" >> "$CALL_LOG"
case "$1" in
  up) exit "${UP_EXIT:-0}" ;;
  down) exit "${DOWN_EXIT:-0}" ;;
esac
exit 0
"#;
    fs::write(&script, content).expect("Failed to write fake compose script");
    format!("sh '{}'", script.display())
}

/// Writes a fake test runner that records its arguments and exits with `$TEST_EXIT`.
/// With `$TEST_SLEEP` set it becomes `sleep $TEST_SLEEP` instead.
pub fn write_fake_test_runner(dir: &Path) -> String {
    let script = dir.join("fake-test.sh");
    let content = r#"#!/bin/sh
echo "test $*" >> "$CALL_LOG"
if [ -n "$TEST_SLEEP" ]; then exec sleep "$TEST_SLEEP"; fi
exit "${TEST_EXIT:-0}"
"#;
    fs::write(&script, content).expect("Failed to write fake test runner script");
    format!("sh '{}'", script.display())
}

/// Reads the call log written by the fake scripts, one call per line.
pub fn read_call_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
