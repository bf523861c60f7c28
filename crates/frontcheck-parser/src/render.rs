//! Render a [`MetadataMapping`] back to the YAML subset accepted by
//! [`decode`](crate::yaml::decode).
//!
//! Strings are written plain when that reads back unchanged and
//! double-quoted otherwise. Lists use block style (`[]` when empty).

use crate::yaml::is_coercible;
use frontcheck_core::{MetaValue, MetadataMapping, format_float};

const INDENT: &str = "  ";

/// Render a mapping as frontmatter text (without delimiter lines)
pub fn render(mapping: &MetadataMapping) -> String {
    let mut out = String::new();
    for (key, value) in mapping.iter() {
        render_entry(&mut out, key, value, "");
    }
    out
}

/// Render a mapping wrapped in `---` delimiter lines
pub fn render_frontmatter(mapping: &MetadataMapping) -> String {
    format!("---\n{}---\n", render(mapping))
}

fn render_entry(out: &mut String, key: &str, value: &MetaValue, indent: &str) {
    out.push_str(indent);
    out.push_str(&render_key(key));
    out.push(':');

    match value {
        MetaValue::List(items) if items.is_empty() => out.push_str(" []\n"),
        MetaValue::List(items) => {
            out.push('\n');
            for item in items {
                out.push_str(indent);
                out.push_str(INDENT);
                out.push_str("- ");
                out.push_str(&render_string(item));
                out.push('\n');
            }
        }
        MetaValue::Mapping(nested) => {
            out.push('\n');
            let child_indent = format!("{}{}", indent, INDENT);
            for (sub_key, sub_value) in nested.iter() {
                render_entry(out, sub_key, sub_value, &child_indent);
            }
        }
        MetaValue::String(s) => {
            out.push(' ');
            out.push_str(&render_string(s));
            out.push('\n');
        }
        MetaValue::Integer(n) => {
            out.push(' ');
            out.push_str(&n.to_string());
            out.push('\n');
        }
        MetaValue::Float(f) => {
            out.push(' ');
            out.push_str(&format_float(*f));
            out.push('\n');
        }
        MetaValue::Bool(b) => {
            out.push(' ');
            out.push_str(if *b { "true" } else { "false" });
            out.push('\n');
        }
    }
}

fn render_key(key: &str) -> String {
    if is_plain_safe(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn render_string(value: &str) -> String {
    if is_plain_safe(value) && !is_coercible(value) && !is_reserved_word(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Whether text can be written without quotes and decode to itself
fn is_plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };

    text == text.trim()
        && !text.chars().any(char::is_control)
        && !matches!(
            first,
            '"' | '\''
                | '['
                | ']'
                | '{'
                | '}'
                | '&'
                | '*'
                | '!'
                | '|'
                | '>'
                | '#'
                | '-'
                | '%'
                | '@'
                | '`'
                | ','
                | '?'
                | ':'
        )
        && !text.contains(": ")
        && !text.contains(" #")
        && !text.ends_with(':')
        && text != "..."
}

/// Words other YAML parsers read as null or booleans
fn is_reserved_word(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "null" | "~" | "yes" | "no" | "on" | "off" | "true" | "false"
    )
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
