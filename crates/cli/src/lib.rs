pub mod commands;
pub mod workspace;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use linkwise_core::config::{AppConfig, LoadOptions, LoggingConfig};

use crate::commands::related::RelatedArgs;

#[derive(Debug, Parser)]
#[command(
    name = "linkwise",
    about = "Linkwise internal-linking CLI",
    long_about = "Recommend related tools for catalog pages and audit the inbound-link distribution across the catalog.",
    after_help = "Examples:\n  linkwise related merge-pdf --explain\n  linkwise audit --json\n  linkwise validate\n  linkwise --config linkwise.toml config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Read configuration from this TOML file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Report inbound-link counts, buckets and distribution statistics")]
    Audit {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Fail (exit 1) when any catalog item is an orphan")]
    Validate {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List related tools for a catalog item")]
    Related {
        #[arg(value_name = "ID", help = "Source item id")]
        id: String,
        #[arg(long, help = "Maximum number of related tools (defaults to the configured per-page count)")]
        count: Option<usize>,
        #[arg(long, value_name = "ID", help = "Item id to leave out; repeatable")]
        exclude: Vec<String>,
        #[arg(long, help = "Include scores and contributing factors")]
        explain: bool,
        #[arg(long, help = "Audit first and score against the recomputed link counts")]
        recompute: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = load_options(cli.config);

    let logging = AppConfig::load(options.clone()).map(|config| config.logging).unwrap_or_default();
    init_logging(&logging);

    let result = match cli.command {
        Command::Audit { json } => commands::audit::run(options, json),
        Command::Validate { json } => commands::validate::run(options, json),
        Command::Related { id, count, exclude, explain, recompute, json } => {
            commands::related::run(
                options,
                RelatedArgs { id, count, exclude, explain, recompute, json },
            )
        }
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// An explicit `--config` path must exist; otherwise the default locations are optional.
pub fn load_options(config_path: Option<PathBuf>) -> LoadOptions {
    LoadOptions { require_file: config_path.is_some(), config_path, ..LoadOptions::default() }
}

/// Logs go to stderr so stdout stays parseable.
fn init_logging(config: &LoggingConfig) {
    use linkwise_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder =
        tracing_subscriber::fmt().with_writer(std::io::stderr).with_target(false).with_max_level(log_level);

    match config.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
