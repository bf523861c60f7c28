//! Metadata export: decoded frontmatter without validation.

use crate::tabular::html_table;
use frontcheck_core::prelude::*;
use frontcheck_core::{CSVBuilder, to_json_string};
use frontcheck_parser::render;
use serde::Serialize;

const METADATA_HEADERS: [&str; 3] = ["document", "field", "value"];

#[derive(Debug, Serialize)]
struct MetadataEntry<'a> {
    document: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a MetadataMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Decoded metadata exporter
pub struct MetadataExporter;

impl MetadataExporter {
    /// `[{"document", "metadata"}]`, keys in frontmatter order
    pub fn to_json(reports: &[DocumentReport]) -> Result<String> {
        let entries: Vec<MetadataEntry<'_>> = reports
            .iter()
            .map(|report| MetadataEntry {
                document: &report.document,
                metadata: report.metadata.as_ref(),
                error: report.error.as_deref(),
            })
            .collect();
        to_json_string(&entries, "document metadata")
    }

    /// Each document's metadata rendered back as frontmatter YAML
    pub fn to_text(reports: &[DocumentReport]) -> String {
        let blocks: Vec<String> = reports
            .iter()
            .map(|report| {
                let body = match (&report.metadata, &report.error) {
                    (Some(metadata), _) => render(metadata),
                    (None, Some(error)) => format!("# error: {}\n", error),
                    (None, None) => String::new(),
                };
                format!("# {}\n{}", report.document, body)
            })
            .collect();
        blocks.join("\n")
    }

    /// One `document,field,value` row per field
    pub fn to_csv(reports: &[DocumentReport]) -> String {
        field_rows(reports)
            .into_iter()
            .fold(CSVBuilder::new(&METADATA_HEADERS), |csv, row| {
                csv.add_row(row)
            })
            .build()
    }

    /// Field rows as an HTML table
    pub fn to_html(reports: &[DocumentReport]) -> String {
        html_table(&METADATA_HEADERS, field_rows(reports))
    }
}

/// Flattened rows; nested fields are named `parent.child` and list items
/// are joined with `|`. Documents without metadata contribute no rows.
fn field_rows(reports: &[DocumentReport]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for report in reports {
        let Some(metadata) = &report.metadata else {
            continue;
        };
        for (key, value) in metadata.iter() {
            match value {
                MetaValue::Mapping(nested) => {
                    for (sub_key, sub_value) in nested.iter() {
                        rows.push(vec![
                            report.document.clone(),
                            format!("{}.{}", key, sub_key),
                            flat_value(sub_value),
                        ]);
                    }
                }
                _ => rows.push(vec![
                    report.document.clone(),
                    key.to_string(),
                    flat_value(value),
                ]),
            }
        }
    }
    rows
}

fn flat_value(value: &MetaValue) -> String {
    match value {
        MetaValue::List(items) => items.join("|"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DocumentReport> {
        let mut meta = MetadataMapping::new();
        meta.insert("owner", MetaValue::String("qa".into()));
        meta.insert("version", MetaValue::Float(1.0));

        let mut metadata = MetadataMapping::new();
        metadata.insert("name", MetaValue::String("cs-example".into()));
        metadata.insert(
            "tags",
            MetaValue::List(vec!["a".into(), "b, c".into()]),
        );
        metadata.insert("metadata", MetaValue::Mapping(meta));

        vec![
            DocumentReport::decoded("skills/one.md", "skills", metadata),
            DocumentReport::errored("two.md", ".", "Missing frontmatter: document is empty"),
        ]
    }

    #[test]
    fn test_json_keeps_key_order() {
        let json = MetadataExporter::to_json(&sample()).unwrap();
        let name = json.find("\"name\"").unwrap();
        let tags = json.find("\"tags\"").unwrap();
        let nested = json.find("\"owner\"").unwrap();
        assert!(name < tags && tags < nested);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["document"], "skills/one.md");
        assert_eq!(parsed[0]["metadata"]["metadata"]["version"], 1.0);
        assert!(parsed[1].get("metadata").is_none());
        assert!(parsed[1]["error"].as_str().is_some());
    }

    #[test]
    fn test_text_renders_yaml() {
        let text = MetadataExporter::to_text(&sample());
        assert_eq!(
            text,
            "# skills/one.md\nname: cs-example\ntags:\n  - a\n  - b, c\nmetadata:\n  owner: qa\n  version: 1.0\n\n# two.md\n# error: Missing frontmatter: document is empty\n"
        );
    }

    #[test]
    fn test_csv_rows() {
        let csv = MetadataExporter::to_csv(&sample());
        assert_eq!(
            csv,
            "document,field,value\nskills/one.md,name,cs-example\nskills/one.md,tags,\"a|b, c\"\nskills/one.md,metadata.owner,qa\nskills/one.md,metadata.version,1.0\n"
        );
    }

    #[test]
    fn test_html_rows() {
        let html = MetadataExporter::to_html(&sample());
        assert!(html.contains("<th>document</th><th>field</th><th>value</th>"));
        assert!(html.contains("<td>metadata.owner</td><td>qa</td>"));
    }
}
