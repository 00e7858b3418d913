//! # Run Command Module / 运行命令模块
//!
//! This module implements the only command of the `run_tests` CLI: discover
//! the tests of a directory, run them against the executable under test and
//! report the results.
//!
//! 此模块实现了 `run_tests` CLI 的唯一命令：发现目录中的测试，
//! 针对被测可执行文件运行它们并报告结果。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    core::{
        config::RunConfiguration,
        convention::ConventionProvider,
        discovery::ProviderRegistry,
        execution::execute_tests,
    },
    infra::t,
    reporting::{
        console::{print_failure_details, print_summary, print_totals},
        html::generate_html_report,
        json::write_json_report,
        progress::observer_for,
    },
};

/// Inputs of the run command, as collected from the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub directory: PathBuf,
    pub executable: PathBuf,
    pub progress_enabled: bool,
    pub extension: String,
    pub timeout_secs: Option<u64>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `Ok(true)` if every test passed, `Ok(false)` if any test failed or
/// errored, and `Err` if the tests could not be discovered.
pub async fn execute(args: RunArgs, locale: &str) -> Result<bool> {
    let config = RunConfiguration::new(&args.executable, args.progress_enabled)
        .with_context(|| {
            t!("run.executable_resolve_failed", locale = locale, path = args.executable.display())
                .to_string()
        })?
        .with_default_timeout(args.timeout_secs.map(Duration::from_secs));

    println!(
        "{}",
        t!("run.discovering", locale = locale, dir = args.directory.display())
    );

    let registry = ProviderRegistry::new(ConventionProvider::new(&args.extension));
    let discovery = registry.resolve(&args.directory).with_context(|| {
        t!("run.discovery_failed", locale = locale, dir = args.directory.display()).to_string()
    })?;

    println!(
        "{}",
        t!(
            "run.discovered",
            locale = locale,
            count = discovery.tests.len(),
            strategy = &discovery.strategy
        )
        .cyan()
    );
    println!(
        "{}",
        t!("run.executable", locale = locale, path = config.executable().display()).cyan()
    );

    let mut observer = observer_for(config.progress_enabled(), locale);
    let report = execute_tests(discovery.tests, &config, observer.as_mut()).await;

    print_summary(&report, locale);
    print_failure_details(&report, locale);

    if let Some(report_path) = &args.html {
        println!(
            "\n{}",
            t!("run.writing_html", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&report, &args.directory, report_path, locale) {
            eprintln!("{} {:#}", t!("run.report_failed", locale = locale).red(), e);
        }
    }

    if let Some(report_path) = &args.json {
        println!(
            "\n{}",
            t!("run.writing_json", locale = locale, path = report_path.display())
        );
        if let Err(e) =
            write_json_report(&report, &args.directory, &discovery.strategy, report_path)
        {
            eprintln!("{} {:#}", t!("run.report_failed", locale = locale).red(), e);
        }
    }

    print_totals(&report, locale);
    Ok(report.success())
}
