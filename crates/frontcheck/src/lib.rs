//! # Frontcheck
//!
//! Command-line front end tying the pipeline together:
//! discovery → extraction → decoding → validation → report.
//!
//! The binary only parses arguments, sets up logging and exits with the code
//! returned by [`run`]. Reports go to the writer passed to [`run`] (stdout
//! in the binary); logs go to stderr.
//!
//! ## Exit codes
//!
//! - [`EXIT_OK`]: every document valid
//! - [`EXIT_FAILURES`]: at least one invalid or errored document
//! - [`EXIT_USAGE`]: bad arguments, bad configuration or unreadable input path

pub mod cli;

pub use cli::Args;
pub use frontcheck_batch::{BatchOutcome, BatchRunner};
pub use frontcheck_core::prelude::*;
pub use frontcheck_export::{GroupBy, ReportFormat};

use anyhow::Context;
use frontcheck_core::CheckConfigBuilder;
use frontcheck_export::{render_metadata, render_reports};
use std::io::Write;

/// Every document valid
pub const EXIT_OK: i32 = 0;
/// At least one document invalid or errored
pub const EXIT_FAILURES: i32 = 1;
/// Usage, configuration or input-path error
pub const EXIT_USAGE: i32 = 2;

/// Load the configuration file (if any) and apply command-line overrides
pub fn load_config(args: &Args) -> anyhow::Result<CheckConfig> {
    let loaded = CheckConfig::load(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("cannot load configuration from {}", path.display()),
        None => "cannot load configuration".to_string(),
    })?;

    let mut builder = CheckConfigBuilder::new(loaded);
    if args.yaml_fallback {
        builder = builder.yaml_fallback(true);
    }
    if let Some(schema) = &args.schema {
        builder = builder.default_schema(schema);
    }
    Ok(builder.build()?)
}

/// Log level from the `-v` count, falling back to the configured level
pub fn log_level(verbose: u8, config: &CheckConfig) -> log::LevelFilter {
    match verbose {
        0 => config.level_filter(),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Run one invocation, writing the report to `out`.
///
/// Returns the exit code for a completed run. An `Err` is a usage,
/// configuration or input-path problem and maps to [`EXIT_USAGE`].
pub async fn run(args: &Args, config: CheckConfig, out: &mut impl Write) -> anyhow::Result<i32> {
    if args.list_schemas {
        for schema in config.registry()?.iter() {
            match &schema.description {
                Some(description) => writeln!(out, "{}\t{}", schema.name, description)?,
                None => writeln!(out, "{}", schema.name)?,
            }
        }
        return Ok(EXIT_OK);
    }

    let path = args
        .path
        .as_deref()
        .context("a PATH to a document or directory is required")?;
    let format: ReportFormat = args.output.parse().map_err(anyhow::Error::msg)?;
    let group_by: GroupBy = args.group_by.parse().map_err(anyhow::Error::msg)?;

    let outcome = if args.validate {
        let schema = config.registry()?.get(&config.default_schema)?.clone();
        log::info!("Validating against schema '{}'", schema.name);
        BatchRunner::validating(config, schema)?.run(path).await
    } else {
        BatchRunner::new(config).run(path).await
    }
    .with_context(|| format!("cannot check {}", path.display()))?;

    let rendered = if args.validate {
        render_reports(&outcome.reports, format, group_by)?
    } else {
        render_metadata(&outcome.reports, format)?
    };
    out.write_all(rendered.as_bytes())?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()?;

    Ok(if outcome.summary.all_valid() {
        EXIT_OK
    } else {
        EXIT_FAILURES
    })
}
