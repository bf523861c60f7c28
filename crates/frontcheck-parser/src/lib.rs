//! # Frontcheck Parser
//!
//! Frontmatter extraction and the restricted YAML decoder.
//!
//! This crate provides:
//! - Frontmatter extraction between `---` delimiter lines, with a bounded
//!   search for the closing delimiter
//! - A restricted YAML decoder producing an ordered [`MetadataMapping`]
//! - A renderer that writes a mapping back in the same YAML subset
//! - An optional `serde_yaml` fallback for constructs the decoder refuses
//!
//! ## Quick Start
//!
//! ```
//! use frontcheck_parser::FrontmatterParser;
//! use frontcheck_core::MetaValue;
//!
//! let content = "---\nname: example-item\ntags: [a, b, c]\nenabled: true\n---\n# Body\n";
//!
//! let parsed = FrontmatterParser::new().parse(content).unwrap();
//! assert_eq!(parsed.document.body(), "# Body\n");
//! assert_eq!(parsed.metadata.get("enabled"), Some(&MetaValue::Bool(true)));
//! ```
//!
//! ### Individual Stages
//!
//! ```
//! use frontcheck_parser::{decode, extract, render};
//!
//! let document = extract("---\nname: x\n---\n").unwrap();
//! let metadata = decode(document.frontmatter_block()).unwrap();
//! assert_eq!(render(&metadata), "name: x\n");
//! ```
//!
//! ## Supported YAML
//!
//! - `key: value` scalars, quoted or plain, with boolean and numeric coercion
//! - Inline `[a, b]` and block `- item` lists (items are always strings)
//! - One level of nested mapping
//! - Comments and blank lines
//!
//! Everything else is an error; see [`yaml`] for the full list.

pub mod fallback;
pub mod frontmatter;
pub mod render;
pub mod yaml;

pub use fallback::{DecodeMode, decode_with_fallback};
pub use frontmatter::{DELIMITER, extract, extract_with_limit, has_frontmatter};
pub use render::{render, render_frontmatter};
pub use yaml::decode;

use frontcheck_core::{
    CheckConfig, DEFAULT_MAX_FRONTMATTER_LINES, Document, MetadataMapping, Result,
};

/// A document together with its decoded frontmatter
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub document: Document,
    pub metadata: MetadataMapping,
}

/// Extractor and decoder configured for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterParser {
    max_lines: usize,
    mode: DecodeMode,
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterParser {
    /// Parser with the default line limit and strict decoding
    pub fn new() -> Self {
        Self {
            max_lines: DEFAULT_MAX_FRONTMATTER_LINES,
            mode: DecodeMode::Strict,
        }
    }

    /// Parser configured from a run configuration
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            max_lines: config.max_frontmatter_lines,
            mode: DecodeMode::from_flag(config.yaml_fallback),
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Extract and decode the frontmatter of one document
    pub fn parse(&self, content: impl Into<String>) -> Result<ParsedDocument> {
        let document = extract_with_limit(content, self.max_lines)?;
        let metadata = decode_with_fallback(document.frontmatter_block(), self.mode)?;
        Ok(ParsedDocument { document, metadata })
    }
}

/// Convenient prelude for common imports.
pub mod prelude {
    pub use crate::{
        DecodeMode, FrontmatterParser, ParsedDocument, decode, decode_with_fallback, extract,
        extract_with_limit, render,
    };
    pub use frontcheck_core::{Document, MetaValue, MetadataMapping};
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontcheck_core::{Error, MetaValue};

    #[test]
    fn test_parse_document() {
        let parsed = FrontmatterParser::new()
            .parse("---\nname: cs-example\ncolor: teal\n---\nBody text")
            .unwrap();
        assert_eq!(parsed.document.body(), "Body text");
        assert_eq!(
            parsed.metadata.get("color"),
            Some(&MetaValue::String("teal".into()))
        );
    }

    #[test]
    fn test_parse_missing_closing_delimiter() {
        let err = FrontmatterParser::new()
            .parse("---\nname: x\nno closing line")
            .unwrap_err();
        assert!(matches!(err, Error::MissingFrontmatter { .. }));
    }

    #[test]
    fn test_from_config() {
        let config = CheckConfig::builder()
            .max_frontmatter_lines(2)
            .yaml_fallback(true)
            .build()
            .unwrap();
        let parser = FrontmatterParser::from_config(&config);
        assert_eq!(parser.mode(), DecodeMode::Fallback);
        assert!(parser.parse("---\na: 1\nb: 2\nc: 3\n---\n").is_err());
        assert!(parser.parse("---\na: &x 1\n---\n").is_ok());
    }

    #[test]
    fn test_decode_errors_propagate() {
        let err = FrontmatterParser::new()
            .parse("---\nname: x\nbad line\n---\n")
            .unwrap_err();
        assert!(matches!(err, Error::YamlSyntax { line: 2, .. }));
    }
}
