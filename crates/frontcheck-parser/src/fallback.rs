//! Optional full-YAML fallback for blocks the restricted decoder refuses.
//!
//! Only [`Error::UnsupportedYamlFeature`] is retried. The `serde_yaml` value
//! must still fit the metadata model: scalars, lists of scalars and one
//! level of nested mapping.

use crate::yaml::decode;
use frontcheck_core::{Error, MetaValue, MetadataMapping, Result};
use serde_yaml::Value;

/// How a frontmatter block is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Restricted decoder only
    #[default]
    Strict,
    /// Retry unsupported constructs with a full YAML parser
    Fallback,
}

impl DecodeMode {
    pub fn from_flag(yaml_fallback: bool) -> Self {
        if yaml_fallback {
            Self::Fallback
        } else {
            Self::Strict
        }
    }
}

/// Decode a block, retrying unsupported constructs in `Fallback` mode
pub fn decode_with_fallback(block: &str, mode: DecodeMode) -> Result<MetadataMapping> {
    match decode(block) {
        Err(Error::UnsupportedYamlFeature { line, feature }) if mode == DecodeMode::Fallback => {
            log::debug!(
                "Restricted decoder rejected {} on line {}, retrying with full YAML",
                feature,
                line
            );
            let value: Value = match serde_yaml::from_str(block) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("Full YAML parse failed: {}", e);
                    return Err(Error::unsupported_feature(line, feature));
                }
            };
            convert_document(value).map_err(|reason| Error::unsupported_feature(line, reason))
        }
        other => other,
    }
}

fn convert_document(value: Value) -> std::result::Result<MetadataMapping, &'static str> {
    match untag(value) {
        Value::Null => Ok(MetadataMapping::new()),
        Value::Mapping(map) => convert_mapping(map, 0),
        _ => Err("frontmatter that is not a mapping"),
    }
}

fn convert_mapping(
    map: serde_yaml::Mapping,
    depth: usize,
) -> std::result::Result<MetadataMapping, &'static str> {
    let mut mapping = MetadataMapping::new();
    for (key, value) in map {
        let key = scalar_text(untag(key)).ok_or("complex mapping keys")?;
        let value = match untag(value) {
            Value::Mapping(_) if depth >= 1 => return Err("nesting deeper than one level"),
            Value::Mapping(nested) => MetaValue::Mapping(convert_mapping(nested, depth + 1)?),
            Value::Sequence(items) => MetaValue::List(convert_list(items)?),
            Value::Null => MetaValue::String(String::new()),
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => convert_number(&n),
            Value::String(s) => MetaValue::String(s),
            Value::Tagged(_) => return Err("tags"),
        };
        mapping.insert(key, value);
    }
    Ok(mapping)
}

fn convert_list(items: Vec<Value>) -> std::result::Result<Vec<String>, &'static str> {
    items
        .into_iter()
        .map(|item| match untag(item) {
            Value::Sequence(_) => Err("nested lists"),
            Value::Mapping(_) => Err("lists of mappings"),
            scalar => scalar_text(scalar).ok_or("tags"),
        })
        .collect()
}

fn convert_number(n: &serde_yaml::Number) -> MetaValue {
    if let Some(i) = n.as_i64() {
        MetaValue::Integer(i)
    } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && !n.is_u64()) {
        MetaValue::Float(f)
    } else {
        MetaValue::String(n.to_string())
    }
}

/// Text of a scalar value; `None` for collections
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

/// Drop YAML tags, keeping the tagged value
fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}
