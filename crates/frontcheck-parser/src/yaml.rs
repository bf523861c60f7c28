//! Restricted YAML decoder for frontmatter blocks.
//!
//! Supported:
//! - `key: value` scalars (quoted or plain, with `true`/`false`, integer and
//!   float coercion for plain values)
//! - inline lists `key: [a, b, c]` and block lists (`key:` + `- item` lines)
//! - one level of nested mapping (`key:` + indented `sub: value` lines, where
//!   a nested value may itself be a list)
//! - `#` comments and blank lines
//!
//! Anchors, aliases, tags, block scalars, multi-line scalars, flow mappings
//! and deeper nesting are rejected with [`Error::UnsupportedYamlFeature`]. Malformed input is
//! rejected with [`Error::YamlSyntax`]. There is no partial recovery.

use frontcheck_core::{Error, MetaValue, MetadataMapping, Result};
use regex::Regex;
use std::sync::LazyLock;

static INTEGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").unwrap());

const UNTERMINATED_QUOTE: &str = "unterminated quoted string";
const UNTERMINATED_LIST: &str = "unterminated inline list";
const MULTI_LINE_SCALARS: &str = "multi-line scalars";

/// One meaningful (non-blank, non-comment) line of the block
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// 1-based line number within the block
    number: usize,
    indent: usize,
    /// Content with indentation and trailing whitespace removed
    text: &'a str,
}

impl<'a> Line<'a> {
    fn is_list_item(&self) -> bool {
        self.text == "-" || self.text.starts_with("- ")
    }

    /// Text after the `-` marker of a list item
    fn item_text(&self) -> &'a str {
        self.text[1..].trim_start()
    }

    fn syntax(&self, reason: impl Into<String>) -> Error {
        Error::yaml_syntax(self.number, self.text, reason)
    }

    fn unsupported(&self, feature: impl Into<String>) -> Error {
        Error::unsupported_feature(self.number, feature)
    }
}

/// Decode a frontmatter block into an ordered mapping
pub fn decode(block: &str) -> Result<MetadataMapping> {
    let lines = tokenize(block)?;
    let mut mapping = MetadataMapping::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        if line.indent != 0 {
            return Err(line.syntax("unexpected indentation"));
        }
        if line.is_list_item() {
            return Err(line.syntax("list item without a parent key"));
        }

        let (key, rest) = split_entry(&line)?;
        if mapping.contains_key(&key) {
            return Err(line.syntax(format!("duplicate key '{}'", key)));
        }

        let children = child_count(&lines, index + 1, line.indent, rest.is_empty());
        let children_lines = &lines[index + 1..index + 1 + children];
        let value = if rest.is_empty() {
            parse_block_value(children_lines, &line, 0)?
        } else {
            parse_entry_value(rest, &line, children_lines)?
        };

        mapping.insert(key, value);
        index += 1 + children;
    }

    Ok(mapping)
}

fn tokenize(block: &str) -> Result<Vec<Line<'_>>> {
    let mut lines = Vec::new();

    for (idx, raw) in block.lines().enumerate() {
        let number = idx + 1;
        let content = raw.trim_end();
        let text = content.trim_start();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let leading = &content[..content.len() - text.len()];
        if leading.contains('\t') {
            return Err(Error::yaml_syntax(number, text, "tab used for indentation"));
        }
        if text == "---" || text == "..." {
            return Err(Error::unsupported_feature(number, "multiple YAML documents"));
        }

        lines.push(Line {
            number,
            indent: leading.len(),
            text,
        });
    }

    Ok(lines)
}

/// Number of lines after `start` that belong to an entry at `parent_indent`.
///
/// Children are either more indented, or, for an entry without an inline
/// value, list items at the parent's own indentation (`key:` followed by
/// `- item` in the same column).
fn child_count(
    lines: &[Line<'_>],
    start: usize,
    parent_indent: usize,
    allow_compact: bool,
) -> usize {
    let compact_list = allow_compact
        && lines
            .get(start)
            .is_some_and(|l| l.indent == parent_indent && l.is_list_item());

    lines[start.min(lines.len())..]
        .iter()
        .take_while(|l| {
            l.indent > parent_indent
                || (compact_list && l.indent == parent_indent && l.is_list_item())
        })
        .count()
}

/// Value of a `key:` entry with no inline value
fn parse_block_value(
    children: &[Line<'_>],
    parent: &Line<'_>,
    depth: usize,
) -> Result<MetaValue> {
    let Some(first) = children.first() else {
        return Ok(MetaValue::String(String::new()));
    };

    if first.is_list_item() {
        return parse_block_list(children).map(MetaValue::List);
    }

    if depth >= 1 {
        return Err(first.unsupported("nesting deeper than one level"));
    }

    parse_nested_mapping(children, parent).map(MetaValue::Mapping)
}

fn parse_block_list(children: &[Line<'_>]) -> Result<Vec<String>> {
    let indent = children[0].indent;
    let mut items = Vec::with_capacity(children.len());

    for line in children {
        if line.indent > indent {
            return Err(line.unsupported("nested structure inside a list item"));
        }
        if line.indent < indent {
            return Err(line.syntax("inconsistent indentation"));
        }
        if !line.is_list_item() {
            return Err(line.syntax("mixed list items and mapping entries"));
        }
        items.push(parse_list_item(line.item_text(), line)?);
    }

    Ok(items)
}

fn parse_nested_mapping(children: &[Line<'_>], parent: &Line<'_>) -> Result<MetadataMapping> {
    let indent = children[0].indent;
    if indent <= parent.indent {
        return Err(children[0].syntax("inconsistent indentation"));
    }

    let mut mapping = MetadataMapping::new();
    let mut index = 0;

    while index < children.len() {
        let line = children[index];
        if line.indent > indent {
            return Err(line.syntax("unexpected indentation"));
        }
        if line.indent < indent {
            return Err(line.syntax("inconsistent indentation"));
        }
        if line.is_list_item() {
            return Err(line.syntax("mixed list items and mapping entries"));
        }

        let (key, rest) = split_entry(&line)?;
        if mapping.contains_key(&key) {
            return Err(line.syntax(format!("duplicate key '{}'", key)));
        }

        let nested = child_count(children, index + 1, indent, rest.is_empty());
        let nested_lines = &children[index + 1..index + 1 + nested];
        let value = if rest.is_empty() {
            parse_block_value(nested_lines, &line, 1)?
        } else {
            parse_entry_value(rest, &line, nested_lines)?
        };

        mapping.insert(key, value);
        index += 1 + nested;
    }

    Ok(mapping)
}

/// Split `key: value` into the key and the (possibly empty) value text
fn split_entry<'a>(line: &Line<'a>) -> Result<(String, &'a str)> {
    let text = line.text;

    if text.starts_with('"') || text.starts_with('\'') {
        let (key, rest) = parse_quoted(text, line)?;
        let Some(rest) = rest.strip_prefix(':') else {
            return Err(line.syntax("expected ':' after quoted key"));
        };
        if !(rest.is_empty() || rest.starts_with(' ')) {
            return Err(line.syntax("expected a space after ':'"));
        }
        return Ok((key, value_text(rest)));
    }

    if let Some(first) = text.chars().next() {
        match first {
            '&' => return Err(line.unsupported("anchors")),
            '*' => return Err(line.unsupported("aliases")),
            '!' => return Err(line.unsupported("tags")),
            '?' => return Err(line.unsupported("complex mapping keys")),
            '[' | '{' => return Err(line.unsupported("flow collections as keys")),
            _ => {}
        }
    }

    let separator = text
        .char_indices()
        .find(|&(pos, ch)| ch == ':' && text[pos + 1..].chars().next().is_none_or(|c| c == ' '))
        .map(|(pos, _)| pos);

    let Some(pos) = separator else {
        return Err(line.syntax("expected 'key: value'"));
    };

    let key = text[..pos].trim_end();
    if key.is_empty() {
        return Err(line.syntax("empty key"));
    }

    Ok((key.to_string(), value_text(&text[pos + 1..])))
}

/// Trimmed value text; a value that is only a comment is empty
fn value_text(rest: &str) -> &str {
    let rest = rest.trim();
    if rest.starts_with('#') { "" } else { rest }
}

/// Decode an inline value together with any lines indented under it.
///
/// Indented lines after a plain scalar, an unclosed quote or an unclosed
/// inline list continue that value over several lines, which the decoder
/// does not support.
fn parse_entry_value(
    rest: &str,
    line: &Line<'_>,
    continuation: &[Line<'_>],
) -> Result<MetaValue> {
    let Some(next) = continuation.first() else {
        return parse_inline_value(rest, line);
    };

    match rest.chars().next() {
        Some('"' | '\'') if is_unterminated(parse_quoted(rest, line)) => {
            return Err(line.unsupported(MULTI_LINE_SCALARS));
        }
        Some('[') if is_unterminated(parse_inline_list(rest, line)) => {
            return Err(line.unsupported("multi-line inline lists"));
        }
        _ => {}
    }

    parse_inline_value(rest, line)?;
    let plain = !rest.starts_with(['"', '\'', '[']);
    let entry_like = next.text.contains(": ") || next.text.ends_with(':');
    if plain && !next.is_list_item() && !entry_like {
        return Err(line.unsupported(MULTI_LINE_SCALARS));
    }
    Err(next.syntax("unexpected indentation after a value"))
}

/// Whether a parse failed only because its closing character is on a later line
fn is_unterminated<T>(parsed: Result<T>) -> bool {
    matches!(
        parsed,
        Err(Error::YamlSyntax { ref reason, .. })
            if reason == UNTERMINATED_QUOTE || reason == UNTERMINATED_LIST
    )
}

/// Reject plain scalars that start with a YAML indicator
fn check_plain_start(plain: &str, line: &Line<'_>) -> Result<()> {
    if plain == "-" || plain.starts_with("- ") {
        return Err(line.syntax("'- ' cannot start a plain value; quote the value"));
    }
    match plain.chars().next() {
        Some(indicator @ ('@' | '`')) => Err(line.syntax(format!(
            "reserved indicator '{}' cannot start a plain value; quote the value",
            indicator
        ))),
        _ => Ok(()),
    }
}

/// Decode the text after `key: `
fn parse_inline_value(text: &str, line: &Line<'_>) -> Result<MetaValue> {
    let first = text.chars().next().unwrap_or(' ');
    match first {
        '"' | '\'' => {
            let (value, rest) = parse_quoted(text, line)?;
            expect_end(rest, line)?;
            Ok(MetaValue::String(value))
        }
        '[' => parse_inline_list(text, line).map(MetaValue::List),
        '{' => Err(line.unsupported("flow mappings")),
        '&' => Err(line.unsupported("anchors")),
        '*' => Err(line.unsupported("aliases")),
        '!' => Err(line.unsupported("tags")),
        '|' | '>' => Err(line.unsupported("block scalars")),
        _ => {
            let plain = strip_comment(text);
            check_plain_start(plain, line)?;
            if plain.contains(": ") {
                return Err(line.syntax("ambiguous ': ' inside a plain value; quote the value"));
            }
            Ok(coerce(plain))
        }
    }
}

/// Decode the text after `- ` in a block list
fn parse_list_item(text: &str, line: &Line<'_>) -> Result<String> {
    let first = text.chars().next().unwrap_or(' ');
    match first {
        '"' | '\'' => {
            let (value, rest) = parse_quoted(text, line)?;
            expect_end(rest, line)?;
            Ok(value)
        }
        '[' => Err(line.unsupported("nested lists")),
        '{' => Err(line.unsupported("flow mappings")),
        '&' => Err(line.unsupported("anchors")),
        '*' => Err(line.unsupported("aliases")),
        '!' => Err(line.unsupported("tags")),
        '|' | '>' => Err(line.unsupported("block scalars")),
        _ => {
            let plain = strip_comment(text);
            if plain.starts_with("- ") || plain == "-" {
                return Err(line.unsupported("nested lists"));
            }
            if plain.contains(": ") || plain.ends_with(':') {
                return Err(line.unsupported("lists of mappings"));
            }
            check_plain_start(plain, line)?;
            Ok(plain.to_string())
        }
    }
}

/// Decode `[a, "b", c]`; items are always strings
fn parse_inline_list(text: &str, line: &Line<'_>) -> Result<Vec<String>> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut closed_at = None;

    for (pos, ch) in text.char_indices().skip(1) {
        if let Some(q) = quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if q == '"' && ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => return Err(line.unsupported("nested lists")),
            '{' => return Err(line.unsupported("flow mappings")),
            '#' if current.is_empty() || current.ends_with(char::is_whitespace) => {
                return Err(line.syntax("comment inside an inline list"));
            }
            ',' => {
                items.push(std::mem::take(&mut current));
            }
            ']' => {
                closed_at = Some(pos);
                break;
            }
            _ => current.push(ch),
        }
    }

    let Some(end) = closed_at else {
        return Err(line.syntax(UNTERMINATED_LIST));
    };
    expect_end(&text[end + 1..], line)?;

    // A trailing comma leaves one empty item behind; `[]` leaves one too.
    if !current.trim().is_empty() || !items.is_empty() {
        items.push(current);
    }
    if items.last().is_some_and(|last| last.trim().is_empty()) && items.len() > 1 {
        items.pop();
    }

    items
        .iter()
        .map(|raw| {
            let item = raw.trim();
            if item.is_empty() {
                return Err(line.syntax("empty item in inline list"));
            }
            match item.chars().next() {
                Some('"') | Some('\'') => {
                    let (value, rest) = parse_quoted(item, line)?;
                    if !rest.trim().is_empty() {
                        return Err(line.syntax("unexpected text after quoted list item"));
                    }
                    Ok(value)
                }
                Some('&') => Err(line.unsupported("anchors")),
                Some('*') => Err(line.unsupported("aliases")),
                Some('!') => Err(line.unsupported("tags")),
                _ => {
                    if item.contains(": ") {
                        return Err(line.unsupported("flow mappings"));
                    }
                    check_plain_start(item, line)?;
                    Ok(item.to_string())
                }
            }
        })
        .collect()
}

/// Parse a quoted scalar at the start of `text`, returning it and the remainder
fn parse_quoted<'a>(text: &'a str, line: &Line<'_>) -> Result<(String, &'a str)> {
    let mut chars = text.char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(line.syntax("expected a quoted string"));
    };

    let mut value = String::new();
    while let Some((pos, ch)) = chars.next() {
        if quote == '"' && ch == '\\' {
            let Some((_, escape)) = chars.next() else {
                break;
            };
            value.push(match escape {
                '"' => '"',
                '\\' => '\\',
                '/' => '/',
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => {
                    return Err(line.syntax(format!("unsupported escape sequence '\\{}'", other)));
                }
            });
        } else if ch == quote {
            if quote == '\'' && text[pos + 1..].starts_with('\'') {
                chars.next();
                value.push('\'');
            } else {
                return Ok((value, &text[pos + 1..]));
            }
        } else {
            value.push(ch);
        }
    }

    Err(line.syntax(UNTERMINATED_QUOTE))
}

/// Only whitespace or a comment may follow a complete value
fn expect_end(rest: &str, line: &Line<'_>) -> Result<()> {
    let rest = rest.trim();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(())
    } else {
        Err(line.syntax(format!("unexpected text after value: '{}'", rest)))
    }
}

/// Remove a trailing ` # comment` from a plain scalar
fn strip_comment(text: &str) -> &str {
    match text.find(" #") {
        Some(pos) => text[..pos].trim_end(),
        None => text.trim_end(),
    }
}

/// Apply boolean and numeric coercion to a plain scalar
fn coerce(plain: &str) -> MetaValue {
    match plain {
        "true" => return MetaValue::Bool(true),
        "false" => return MetaValue::Bool(false),
        _ => {}
    }

    if INTEGER_PATTERN.is_match(plain)
        && let Ok(n) = plain.parse::<i64>()
    {
        return MetaValue::Integer(n);
    }

    if FLOAT_PATTERN.is_match(plain)
        && let Ok(f) = plain.parse::<f64>()
        && f.is_finite()
    {
        return MetaValue::Float(f);
    }

    MetaValue::String(plain.to_string())
}

/// Whether a plain scalar would be coerced to a non-string value
pub(crate) fn is_coercible(text: &str) -> bool {
    text == "true"
        || text == "false"
        || INTEGER_PATTERN.is_match(text)
        || FLOAT_PATTERN.is_match(text)
}
