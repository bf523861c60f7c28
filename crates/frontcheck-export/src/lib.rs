//! # Report Emitter
//!
//! Renders batch results for humans and machines. Every renderer returns a
//! `String`; writing it anywhere is the caller's business.
//!
//! ## Quick Start
//!
//! ```
//! use frontcheck_core::prelude::*;
//! use frontcheck_export::{GroupBy, ReportFormat, render_reports};
//!
//! let validator = FieldValidator::new(Schema::agent()).unwrap();
//! let mut metadata = MetadataMapping::new();
//! metadata.insert("name", MetaValue::String("cs-example".into()));
//! metadata.insert("description", MetaValue::String("Example".into()));
//! let result = validator.validate(&metadata, "cs-example.md");
//! let reports = vec![DocumentReport::validated("cs-example.md", ".", metadata, result)];
//!
//! let text = render_reports(&reports, ReportFormat::Text, GroupBy::Category).unwrap();
//! assert!(text.ends_with("Results: 1/1\n"));
//! ```
//!
//! ## Formats
//!
//! ### Validation reports ([`render_reports`])
//! - **Text**: `Valid (n):`, `Invalid (n):` and `Errored (n):` sections with
//!   one marker line per document (`✓`, `✗`, `!`), failing rules and errors
//!   indented beneath, then the summary
//! - **JSON**: pretty-printed array, one object per document with its rule
//!   outcomes
//! - **CSV**: `group_key,passed_count,total_count,percent` rows grouped by
//!   category, status or rule, sorted by key
//! - **HTML**: the CSV rows as a table plus a summary paragraph
//!
//! ### Metadata export ([`render_metadata`])
//! - **JSON**: `[{"document": ..., "metadata": {...}}]` with key order kept
//! - **Text**: each document's metadata rendered back as frontmatter YAML
//! - **CSV/HTML**: one `document,field,value` row per field
//!
//! Output is deterministic: documents keep their input order and grouped
//! rows are sorted by key.

pub mod metadata;
pub mod reports;
pub mod tabular;

pub use metadata::MetadataExporter;
pub use reports::ReportExporter;
pub use tabular::{GroupRow, group_rows};

use frontcheck_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for reports and metadata exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text for terminal output
    #[default]
    Text,
    /// JSON format (pretty-printed)
    Json,
    /// Grouped tabular CSV
    Csv,
    /// Grouped HTML table
    Html,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" => Ok(Self::Html),
            _ => Err(format!(
                "Unknown output format '{}'. Valid options: text, json, csv, html",
                s
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Grouping key for tabular output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Parent directory of each document
    #[default]
    Category,
    /// Document status (`valid`, `invalid`, `errored`)
    Status,
    /// Rule name; counts rule outcomes instead of documents
    Rule,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "status" => Ok(Self::Status),
            "rule" => Ok(Self::Rule),
            _ => Err(format!(
                "Unknown grouping '{}'. Valid options: category, status, rule",
                s
            )),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Status => write!(f, "status"),
            Self::Rule => write!(f, "rule"),
        }
    }
}

/// Render validation reports in the requested format
pub fn render_reports(
    reports: &[DocumentReport],
    format: ReportFormat,
    group_by: GroupBy,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(ReportExporter::to_text(reports)),
        ReportFormat::Json => ReportExporter::to_json(reports),
        ReportFormat::Csv => Ok(ReportExporter::to_csv(reports, group_by)),
        ReportFormat::Html => Ok(ReportExporter::to_html(reports, group_by)),
    }
}

/// Render decoded metadata in the requested format
pub fn render_metadata(reports: &[DocumentReport], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(MetadataExporter::to_text(reports)),
        ReportFormat::Json => MetadataExporter::to_json(reports),
        ReportFormat::Csv => Ok(MetadataExporter::to_csv(reports)),
        ReportFormat::Html => Ok(MetadataExporter::to_html(reports)),
    }
}
