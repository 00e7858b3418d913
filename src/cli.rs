// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::config::{DEFAULT_EXECUTABLE, DEFAULT_EXTENSION};
use crate::infra::t;

pub mod commands;

use commands::run::RunArgs;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built, so that
/// help texts are already localized. It looks for `--lang <VALUE>` and
/// `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("run_tests")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .arg(
            Arg::new("directory")
                .help(t!("cli.arg_directory", locale = locale).to_string())
                .value_name("DIRECTORY")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("executable")
                .short('e')
                .long("executable")
                .help(t!("cli.arg_executable", locale = locale).to_string())
                .value_name("EXECUTABLE")
                .default_value(DEFAULT_EXECUTABLE)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("disable-progressbar")
                .long("disable-progressbar")
                .help(t!("cli.arg_disable_progressbar", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .help(t!("cli.arg_extension", locale = locale).to_string())
                .value_name("EXTENSION")
                .default_value(DEFAULT_EXTENSION)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help(t!("cli.arg_timeout", locale = locale).to_string())
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("cli.arg_html", locale = locale).to_string())
                .value_name("HTML")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help(t!("cli.arg_json", locale = locale).to_string())
                .value_name("JSON")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.arg_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.arg_verbose", locale = locale).to_string())
                .action(ArgAction::Count),
        )
}

/// Extracts the `run` command arguments from parsed matches.
pub fn run_args_from_matches(matches: &ArgMatches) -> RunArgs {
    RunArgs {
        directory: matches
            .get_one::<PathBuf>("directory")
            .cloned()
            .unwrap_or_default(), // Required by clap
        executable: matches
            .get_one::<PathBuf>("executable")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
        progress_enabled: !matches.get_flag("disable-progressbar"),
        extension: matches
            .get_one::<String>("extension")
            .cloned()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
    }
}

/// Installs the diagnostic log subscriber. Logs go to stderr so they never
/// mix with the test summary on stdout; `RUST_LOG` overrides `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fixture_harness={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parses the command line and runs the harness.
///
/// Returns `Ok(true)` when every test passed (including the vacuous case of
/// an empty collection), `Ok(false)` when at least one test failed or errored,
/// and `Err` when discovery itself failed.
pub async fn run() -> Result<bool> {
    // Pre-parse language and initialize i18n first.
    let language = crate::init_locale(pre_parse_language().as_deref());

    let matches = build_cli(&language).get_matches();
    init_tracing(matches.get_count("verbose"));

    let args = run_args_from_matches(&matches);
    commands::run::execute(args, &language).await
}
