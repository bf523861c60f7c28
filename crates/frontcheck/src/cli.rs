//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Frontcheck - extract, decode and validate markdown frontmatter
#[derive(Parser, Debug, Clone)]
#[command(name = "frontcheck", author, version, about, long_about = None)]
pub struct Args {
    /// Document or directory of documents to check
    #[arg(required_unless_present = "list_schemas")]
    pub path: Option<PathBuf>,

    /// Validate against a schema instead of exporting metadata
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub validate: bool,

    /// Schema to validate against (defaults to the configured schema)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Output format (text, json, csv, html)
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Grouping for csv and html reports (category, status, rule)
    #[arg(long, default_value = "category")]
    pub group_by: String,

    /// Configuration file (YAML or TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Retry unsupported YAML constructs with a full YAML parser
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub yaml_fallback: bool,

    /// List available schemas and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub list_schemas: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
