//! # Harness Module / Harness 模块
//!
//! This module drives one harness run: bring the services up, wait a fixed
//! time, run the tests and bring the services down again. Each step is awaited
//! before the next one starts.
//!
//! 此模块驱动一次运行：启动服务、固定等待、运行测试、再关闭服务。每个步骤都在下一步开始前完成。
//!
//! ## Failure handling / 失败处理
//!
//! A failing `up` aborts the run without teardown. A failing test aborts
//! before teardown under `TeardownPolicy::OnSuccess`, leaving the containers
//! running; under `TeardownPolicy::Always` the services are still brought down
//! and the test's exit code is kept.
//!
//! `up` 失败时直接中止且不清理。在 `TeardownPolicy::OnSuccess` 下测试失败会在清理前中止，
//! 容器继续运行；在 `TeardownPolicy::Always` 下仍会关闭服务并保留测试的退出码。

use chrono::Local;
use colored::*;
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::config::TeardownPolicy;
use crate::core::models::{HarnessError, INTERRUPTED_EXIT_CODE, RunReport, Step, StepRecord};
use crate::core::planner::RunPlan;
use crate::infra::t;

/// Starts and stops the declared services.
/// 启动和停止声明的服务。
pub trait Orchestrator {
    /// Brings the services up detached. Returns the tool's exit code.
    fn up(&self, services: &[String]) -> impl Future<Output = i32> + Send;
    /// Stops and removes the services. Returns the tool's exit code.
    fn down(&self) -> impl Future<Output = i32> + Send;
}

/// Executes the test suite.
/// 执行测试套件。
pub trait TestRunner {
    /// Runs the tests against `target`. Returns the runner's exit code.
    fn run(&self, target: Option<&str>) -> impl Future<Output = i32> + Send;
}

/// Runs harness plans with a fixed orchestrator and test runner.
pub struct Harness<O, R> {
    orchestrator: O,
    runner: R,
    stop_token: CancellationToken,
}

/// Outcome of a step raced against the stop token.
enum Interruptible<T> {
    Completed(T),
    Cancelled,
}

impl<O: Orchestrator, R: TestRunner> Harness<O, R> {
    pub fn new(orchestrator: O, runner: R) -> Self {
        Self {
            orchestrator,
            runner,
            stop_token: CancellationToken::new(),
        }
    }

    /// Cancelling `token` interrupts the wait and the test step.
    /// 取消 `token` 会中断等待和测试步骤。
    pub fn with_stop_token(mut self, token: CancellationToken) -> Self {
        self.stop_token = token;
        self
    }

    /// Executes `plan` and returns the full record of what happened.
    /// The process exit code is `RunReport::exit_code()`.
    ///
    /// 执行 `plan` 并返回完整的运行记录。进程退出码为 `RunReport::exit_code()`。
    pub async fn run(&self, plan: &RunPlan) -> RunReport {
        let mut report = RunReport::new(&plan.profile, &plan.services);
        self.execute(plan, &mut report).await;
        report.finished_at = Local::now();
        report
    }

    async fn execute(&self, plan: &RunPlan, report: &mut RunReport) {
        // 1. up
        println!(
            "{}",
            t!("harness.starting_services", services = plan.services.join(", ")).blue()
        );
        let start = Instant::now();
        let code = self.orchestrator.up(&plan.services).await;
        report.steps.push(StepRecord {
            step: Step::Up,
            exit_code: code,
            duration: start.elapsed(),
        });
        if code != 0 {
            println!("{}", t!("harness.startup_failed", code = code).red());
            report.error = Some(HarnessError::Startup {
                services: plan.services.clone(),
                code,
            });
            return;
        }

        // 2. wait
        println!(
            "{}",
            t!("harness.waiting", secs = plan.wait.as_secs()).cyan()
        );
        let start = Instant::now();
        let waited = self.interruptible(tokio::time::sleep(plan.wait)).await;
        let interrupted = matches!(waited, Interruptible::Cancelled);
        report.steps.push(StepRecord {
            step: Step::Wait,
            exit_code: if interrupted { INTERRUPTED_EXIT_CODE } else { 0 },
            duration: start.elapsed(),
        });
        if interrupted {
            self.abort(plan, report, HarnessError::Interrupted).await;
            return;
        }

        // 3. test
        println!(
            "{}",
            t!("harness.running_tests", target = plan.target.as_deref().unwrap_or("-")).blue()
        );
        let start = Instant::now();
        let outcome = self
            .interruptible(self.runner.run(plan.target.as_deref()))
            .await;
        let (code, error) = match outcome {
            Interruptible::Completed(0) => (0, None),
            Interruptible::Completed(code) => (code, Some(HarnessError::TestFailure { code })),
            Interruptible::Cancelled => (INTERRUPTED_EXIT_CODE, Some(HarnessError::Interrupted)),
        };
        let duration = start.elapsed();
        report.steps.push(StepRecord {
            step: Step::Test,
            exit_code: code,
            duration,
        });
        if let Some(error) = error {
            let message = match &error {
                HarnessError::Interrupted => t!("harness.tests_interrupted"),
                _ => t!("harness.tests_failed", code = code, duration = format!("{:.2?}", duration)),
            };
            println!("{}", message.red());
            self.abort(plan, report, error).await;
            return;
        }
        println!(
            "{}",
            t!("harness.tests_passed", duration = format!("{:.2?}", duration)).green()
        );

        // 4. down
        let teardown_error = self.teardown(report).await;
        report.error = teardown_error;
    }

    /// Records `error` as the deciding error and tears down if the policy asks for it.
    async fn abort(&self, plan: &RunPlan, report: &mut RunReport, error: HarnessError) {
        report.error = Some(error);
        match plan.teardown {
            TeardownPolicy::Always => {
                let teardown_error = self.teardown(report).await;
                report.teardown_error = teardown_error;
            }
            TeardownPolicy::OnSuccess => {
                println!("{}", t!("harness.skipping_teardown").yellow());
            }
        }
    }

    async fn teardown(&self, report: &mut RunReport) -> Option<HarnessError> {
        println!("{}", t!("harness.stopping_services").blue());
        let start = Instant::now();
        let code = self.orchestrator.down().await;
        report.steps.push(StepRecord {
            step: Step::Down,
            exit_code: code,
            duration: start.elapsed(),
        });
        if code == 0 {
            None
        } else {
            println!("{}", t!("harness.teardown_failed", code = code).red());
            Some(HarnessError::Teardown { code })
        }
    }

    async fn interruptible<F: Future>(&self, future: F) -> Interruptible<F::Output> {
        tokio::select! {
            biased;
            _ = self.stop_token.cancelled() => Interruptible::Cancelled,
            output = future => Interruptible::Completed(output),
        }
    }
}
