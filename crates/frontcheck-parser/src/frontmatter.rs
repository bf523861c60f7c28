//! Frontmatter extraction: ---\nYAML\n---
//!
//! The opening delimiter must be the very first line. The closing delimiter
//! must appear within a bounded number of lines; otherwise the document has
//! no frontmatter, and the rest of the file is never treated as metadata.

use frontcheck_core::{DEFAULT_MAX_FRONTMATTER_LINES, Document, Error, Result};

/// Line that opens and closes a frontmatter block
pub const DELIMITER: &str = "---";

const BOM: char = '\u{feff}';

/// Split a document into its frontmatter block and body
pub fn extract(text: impl Into<String>) -> Result<Document> {
    extract_with_limit(text, DEFAULT_MAX_FRONTMATTER_LINES)
}

/// Split a document, requiring the closing delimiter within `max_lines`
/// lines after the opening one
pub fn extract_with_limit(text: impl Into<String>, max_lines: usize) -> Result<Document> {
    let raw = text.into();

    let mut offset = 0;
    let mut lines = raw.split_inclusive('\n').map(|line| {
        let start = offset;
        offset += line.len();
        (start, line)
    });

    let (_, first) = lines
        .next()
        .ok_or_else(|| Error::missing_frontmatter("document is empty"))?;
    if !is_delimiter(first.trim_start_matches(BOM)) {
        return Err(Error::missing_frontmatter(
            "document does not start with a '---' line",
        ));
    }

    let block_start = first.len();
    let mut closing = None;
    for (index, (start, line)) in lines.enumerate() {
        if index >= max_lines {
            return Err(Error::missing_frontmatter(format!(
                "no closing '---' within the first {} lines",
                max_lines
            )));
        }
        if is_delimiter(line) {
            closing = Some((start, start + line.len()));
            break;
        }
    }

    let (closing_start, body_start) =
        closing.ok_or_else(|| Error::missing_frontmatter("no closing '---' delimiter"))?;
    let block_end = if closing_start > block_start {
        trim_line_ending(&raw, closing_start)
    } else {
        block_start
    };
    let body_end = raw.len();
    Ok(Document::from_parts(
        raw,
        block_start..block_end,
        body_start..body_end,
    ))
}

/// Whether the document starts with an opening delimiter line
pub fn has_frontmatter(text: &str) -> bool {
    text.lines()
        .next()
        .is_some_and(|first| is_delimiter(first.trim_start_matches(BOM)))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Position of the line ending that precedes `line_start`
fn trim_line_ending(raw: &str, line_start: usize) -> usize {
    let before = &raw[..line_start];
    let before = before.strip_suffix('\n').unwrap_or(before);
    let before = before.strip_suffix('\r').unwrap_or(before);
    before.len()
}
