//! # Frontcheck Core
//!
//! Core data model, error types, schemas and the field validator shared by
//! every frontcheck crate.
//!
//! ## Architecture Principles
//!
//! - **Tagged values**: decoded frontmatter is a [`MetaValue`] enum, matched
//!   by the validator instead of probed at runtime
//! - **Zero Panic in Libraries**: All errors are `Result<T, Error>`
//! - **Validation failures are data**: a failing rule is a [`RuleOutcome`],
//!   never an error
//! - **Immutable inputs**: documents and mappings are never mutated after
//!   construction
//!
//! ## Core Modules
//!
//! - [`models`] - Documents, metadata values and per-document reports
//! - [`error`] - Error taxonomy and Result alias
//! - [`validation`] - Rules, schemas and the [`FieldValidator`]
//! - [`schema`] - Built-in schemas and the [`SchemaRegistry`]
//! - [`config`] - Run configuration
//! - [`utils`] - Serialization helpers
//!
//! ## Usage Example
//!
//! ```
//! use frontcheck_core::prelude::*;
//!
//! let schema = Schema::new("example")
//!     .rule(ValidationRule::required("name", FieldType::String))
//!     .rule(
//!         ValidationRule::optional("color", FieldType::String)
//!             .with_allowed(["blue", "green", "red", "purple", "orange"]),
//!     );
//! let validator = FieldValidator::new(schema).unwrap();
//!
//! let mut mapping = MetadataMapping::new();
//! mapping.insert("name", MetaValue::String("cs-example".into()));
//! mapping.insert("color", MetaValue::String("teal".into()));
//!
//! let result = validator.validate(&mapping, "cs-example.md");
//! assert_eq!(result.passed_count(), 1);
//! assert_eq!(result.failed_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod utils;
pub mod validation;

pub use config::{CheckConfig, CheckConfigBuilder, DEFAULT_MAX_FRONTMATTER_LINES};
pub use error::{Error, Result};
pub use models::*;
pub use schema::SchemaRegistry;
pub use utils::{CSVBuilder, csv_field, html_escape, to_json_string};
pub use validation::{
    FieldType, FieldValidator, RuleOutcome, RuleStatus, Schema, ValidationResult, ValidationRule,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CheckConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        BatchSummary, Document, DocumentReport, DocumentStatus, MetaValue, MetadataMapping,
    };
    pub use crate::schema::SchemaRegistry;
    pub use crate::validation::{
        FieldType, FieldValidator, RuleOutcome, RuleStatus, Schema, ValidationResult,
        ValidationRule,
    };
}
