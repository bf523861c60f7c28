//! Core data types: documents, decoded metadata and per-document reports.

use crate::validation::ValidationResult;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// A markdown document split into its frontmatter block and body.
///
/// The raw text is kept intact; the block and body are byte ranges into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    raw_text: String,
    frontmatter: Range<usize>,
    body: Range<usize>,
}

impl Document {
    /// Build a document from its raw text and the ranges found by the extractor.
    ///
    /// Ranges must lie on character boundaries of `raw_text`.
    pub fn from_parts(raw_text: String, frontmatter: Range<usize>, body: Range<usize>) -> Self {
        debug_assert!(frontmatter.end <= raw_text.len() && body.end <= raw_text.len());
        Self {
            raw_text,
            frontmatter,
            body,
        }
    }

    /// Full file contents
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Text between the delimiter lines (exclusive of both)
    pub fn frontmatter_block(&self) -> &str {
        &self.raw_text[self.frontmatter.clone()]
    }

    /// Everything after the closing delimiter line
    pub fn body(&self) -> &str {
        &self.raw_text[self.body.clone()]
    }
}

/// A decoded frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Ordered list of string items
    List(Vec<String>),
    /// One level of nesting; holds only scalars and lists
    Mapping(MetadataMapping),
}

impl MetaValue {
    /// Type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) | Self::Float(_) => "number",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Whether this is a string, number or boolean
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MetadataMapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Plain text of a scalar value (`None` for lists and mappings)
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            Self::Bool(b) => Some(b.to_string()),
            Self::List(_) | Self::Mapping(_) => None,
        }
    }
}

/// Formats a float so that it always reads back as a float (`1.0`, not `1`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Mapping(map) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            scalar => write!(f, "{}", scalar.scalar_text().unwrap_or_default()),
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(map) => map.serialize(serializer),
        }
    }
}

/// Ordered mapping of frontmatter keys to values.
///
/// Keys are unique and iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMapping {
    entries: Vec<(String, MetaValue)>,
}

impl MetadataMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a value, replacing (in place) and returning any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Levels of mapping nesting below this one (0 when no value is a mapping)
    pub fn nesting_depth(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(_, v)| v.as_mapping())
            .map(|m| 1 + m.nesting_depth())
            .max()
            .unwrap_or(0)
    }
}

impl Serialize for MetadataMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, MetaValue)> for MetadataMapping {
    fn from_iter<I: IntoIterator<Item = (K, MetaValue)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// Outcome of processing one document in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Decoded and passed every rule (or was only exported)
    Valid,
    /// Decoded but failed at least one rule
    Invalid,
    /// Could not be read, extracted or decoded
    Errored,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about one document after a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    /// Document id (path relative to the batch root)
    pub document: String,
    /// Grouping key, the parent directory of the document
    pub category: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataMapping>,
}

impl DocumentReport {
    /// Report for a document that was validated
    pub fn validated(
        document: impl Into<String>,
        category: impl Into<String>,
        metadata: MetadataMapping,
        result: ValidationResult,
    ) -> Self {
        let status = if result.is_valid() {
            DocumentStatus::Valid
        } else {
            DocumentStatus::Invalid
        };
        Self {
            document: document.into(),
            category: category.into(),
            status,
            result: Some(result),
            error: None,
            metadata: Some(metadata),
        }
    }

    /// Report for a document that was decoded but not validated
    pub fn decoded(
        document: impl Into<String>,
        category: impl Into<String>,
        metadata: MetadataMapping,
    ) -> Self {
        Self {
            document: document.into(),
            category: category.into(),
            status: DocumentStatus::Valid,
            result: None,
            error: None,
            metadata: Some(metadata),
        }
    }

    /// Report for a document that could not be processed
    pub fn errored(
        document: impl Into<String>,
        category: impl Into<String>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            document: document.into(),
            category: category.into(),
            status: DocumentStatus::Errored,
            result: None,
            error: Some(error.to_string()),
            metadata: None,
        }
    }
}

/// Aggregate counts for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errored: usize,
}

impl BatchSummary {
    /// Count one more document with the given status
    pub fn record(mut self, status: DocumentStatus) -> Self {
        self.total += 1;
        match status {
            DocumentStatus::Valid => self.valid += 1,
            DocumentStatus::Invalid => self.invalid += 1,
            DocumentStatus::Errored => self.errored += 1,
        }
        self
    }

    /// Fold a finished list of reports into a summary
    pub fn from_reports(reports: &[DocumentReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |summary, report| summary.record(report.status))
    }

    /// True when every document is valid
    pub fn all_valid(&self) -> bool {
        self.invalid == 0 && self.errored == 0
    }
}
