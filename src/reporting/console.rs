//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the run summary to the console with color coding and
//! internationalization support.
//!
//! 以彩色格式及国际化支持在控制台打印运行摘要。

use colored::*;

use crate::core::models::{RunReport, StepRecord};
use crate::core::planner::RunPlan;
use crate::infra::compose::{CommandTestRunner, DockerCompose};
use crate::infra::command::display_command;
use crate::infra::t;

/// Prints a formatted summary of the executed steps.
///
/// 打印已执行步骤的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary (profile: all) ---
///   - Status   | Step                 |  Exit |   Duration
///   - Passed   | Start services       |     0 |      1.20s
///   - Passed   | Wait for services    |     0 |     10.00s
///   - Failed   | Run tests            |     1 |      4.31s
/// ```
pub fn print_summary(report: &RunReport) {
    println!(
        "\n{}",
        t!("report.summary_banner", profile = &report.profile).bold()
    );
    println!(
        "  - {:<8} | {:<20} | {:>5} | {:>10}",
        t!("report.column_status"),
        t!("report.column_step"),
        t!("report.column_exit"),
        t!("report.column_duration")
    );

    for record in &report.steps {
        println!(
            "  - {:<8} | {:<20} | {:>5} | {:>10}",
            status_of(record),
            record.step.label(),
            record.exit_code,
            format!("{:.2?}", record.duration)
        );
    }

    if let Some(error) = &report.teardown_error {
        println!("\n{}", t!("report.secondary_error", error = error).yellow());
    }
}

/// Prints the final verdict and, when the containers were left up, how to
/// stop them by hand.
/// 打印最终结论；若容器仍在运行，则提示如何手动停止。
pub fn print_outcome(report: &RunReport, plan: &RunPlan) {
    if report.containers_left_running() {
        let down = DockerCompose::from_plan(plan).down_command();
        println!(
            "\n{}",
            t!(
                "report.containers_left_running",
                services = report.services.join(", "),
                command = display_command(&down)
            )
            .yellow()
            .bold()
        );
    }

    match &report.error {
        None => println!("\n{}", t!("report.run_passed").green().bold()),
        Some(error) => println!(
            "\n{}",
            t!("report.run_failed", error = error, code = report.exit_code())
                .red()
                .bold()
        ),
    }
}

/// Prints the commands a plan would execute, without running anything.
/// 打印计划将执行的命令，但不实际运行。
pub fn print_plan(plan: &RunPlan) {
    let compose = DockerCompose::from_plan(plan);
    let runner = CommandTestRunner::from_plan(plan);

    println!("{}", t!("report.plan_banner", profile = &plan.profile).bold());
    println!(
        "  {} {}",
        t!("report.plan_up").cyan(),
        display_command(&compose.up_command(&plan.services))
    );
    println!(
        "  {} {}s",
        t!("report.plan_wait").cyan(),
        plan.wait.as_secs()
    );
    println!(
        "  {} {}",
        t!("report.plan_test").cyan(),
        display_command(&runner.test_command(plan.target.as_deref()))
    );
    println!(
        "  {} {} ({})",
        t!("report.plan_down").cyan(),
        display_command(&compose.down_command()),
        t!("report.plan_teardown", policy = plan.teardown)
    );
}

fn status_of(record: &StepRecord) -> ColoredString {
    if record.succeeded() {
        t!("report.status_passed").green()
    } else {
        t!("report.status_failed").red()
    }
}
