//! Validation report rendering.

use crate::GroupBy;
use crate::tabular::{group_rows, rows_to_csv, rows_to_html};
use frontcheck_core::prelude::*;
use frontcheck_core::{html_escape, to_json_string};
use serde::Serialize;

const MARK_VALID: &str = "✓";
const MARK_INVALID: &str = "✗";
const MARK_ERRORED: &str = "!";

/// Text report sections: status, heading and per-document marker
const SECTIONS: [(DocumentStatus, &str, &str); 3] = [
    (DocumentStatus::Valid, "Valid", MARK_VALID),
    (DocumentStatus::Invalid, "Invalid", MARK_INVALID),
    (DocumentStatus::Errored, "Errored", MARK_ERRORED),
];

/// JSON shape of one document
#[derive(Debug, Serialize)]
struct DocumentEntry<'a> {
    document: &'a str,
    category: &'a str,
    status: DocumentStatus,
    valid: bool,
    rules: &'a [RuleOutcome],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> From<&'a DocumentReport> for DocumentEntry<'a> {
    fn from(report: &'a DocumentReport) -> Self {
        Self {
            document: &report.document,
            category: &report.category,
            status: report.status,
            valid: report.status == DocumentStatus::Valid,
            rules: report
                .result
                .as_ref()
                .map(|r| r.outcomes.as_slice())
                .unwrap_or_default(),
            error: report.error.as_deref(),
        }
    }
}

/// Validation report exporter
pub struct ReportExporter;

impl ReportExporter {
    /// Human-readable report grouped by status, with a trailing summary.
    ///
    /// Sections appear in the order valid, invalid, errored and are omitted
    /// when empty; documents keep input order within a section.
    pub fn to_text(reports: &[DocumentReport]) -> String {
        let mut out = String::new();

        for (status, heading, marker) in SECTIONS {
            let section: Vec<&DocumentReport> =
                reports.iter().filter(|r| r.status == status).collect();
            if section.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{} ({}):\n", heading, section.len()));
            for report in section {
                push_document(&mut out, marker, report);
            }
        }

        let summary = BatchSummary::from_reports(reports);
        if !reports.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", summary_line(&summary)));
        out.push_str(&format!("Results: {}/{}\n", summary.valid, summary.total));
        out
    }

    /// Pretty JSON array, one object per document
    pub fn to_json(reports: &[DocumentReport]) -> Result<String> {
        let entries: Vec<DocumentEntry<'_>> = reports.iter().map(DocumentEntry::from).collect();
        to_json_string(&entries, "validation reports")
    }

    /// Grouped `group_key,passed_count,total_count,percent` rows
    pub fn to_csv(reports: &[DocumentReport], group_by: GroupBy) -> String {
        rows_to_csv(&group_rows(reports, group_by))
    }

    /// Grouped rows as an HTML table followed by the summary
    pub fn to_html(reports: &[DocumentReport], group_by: GroupBy) -> String {
        let summary = BatchSummary::from_reports(reports);
        let mut html = rows_to_html(&group_rows(reports, group_by));
        html.push_str(&format!(
            "<p>{} &middot; Results: {}/{}</p>\n",
            html_escape(&summary_line(&summary)),
            summary.valid,
            summary.total
        ));
        html
    }
}

/// Marker line for one document, then its failing rules or its error
fn push_document(out: &mut String, marker: &str, report: &DocumentReport) {
    out.push_str(&format!("{} {}\n", marker, report.document));

    if let Some(result) = &report.result {
        for failure in result.failures() {
            out.push_str(&format!(
                "    {}: {}",
                failure.name,
                failure.message.as_deref().unwrap_or("failed")
            ));
            if let Some(suggestion) = &failure.suggestion {
                out.push_str(&format!(" ({})", suggestion));
            }
            out.push('\n');
        }
    }
    if let Some(error) = &report.error {
        out.push_str(&format!("    {}\n", error));
    }
}

fn summary_line(summary: &BatchSummary) -> String {
    format!(
        "Summary: valid: {}, invalid: {}, errored: {}",
        summary.valid, summary.invalid, summary.errored
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_report(document: &str, name: &str, color: &str) -> DocumentReport {
        let validator = FieldValidator::new(Schema::agent()).unwrap();
        let mut metadata = MetadataMapping::new();
        metadata.insert("name", MetaValue::String(name.into()));
        metadata.insert("description", MetaValue::String("An agent".into()));
        metadata.insert("color", MetaValue::String(color.into()));
        metadata.insert("tools", MetaValue::List(vec!["Read".into()]));
        metadata.insert("model", MetaValue::String("sonnet".into()));
        let result = validator.validate(&metadata, document);
        DocumentReport::validated(document, "agents", metadata, result)
    }

    #[test]
    fn test_json_two_documents_one_failure() {
        let reports = vec![
            agent_report("agents/good.md", "cs-good", "blue"),
            agent_report("agents/bad.md", "cs-bad", "teal"),
        ];
        let json = ReportExporter::to_json(&reports).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let docs = parsed.as_array().unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["valid"], true);
        assert_eq!(docs[1]["valid"], false);
        assert_eq!(docs[1]["status"], "invalid");
        let rules = docs[0]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 5);
        assert!(rules.iter().all(|r| r["status"] == "pass"));

        let failing: Vec<_> = docs[1]["rules"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["status"] == "fail")
            .collect();
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0]["name"], "color");
        assert!(failing[0]["message"].as_str().unwrap().contains("teal"));
        assert!(docs[0].get("error").is_none());
    }

    #[test]
    fn test_json_errored_document() {
        let reports = vec![DocumentReport::errored(
            "broken.md",
            ".",
            "Missing frontmatter: no closing '---' delimiter",
        )];
        let json = ReportExporter::to_json(&reports).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["status"], "errored");
        assert_eq!(parsed[0]["rules"].as_array().unwrap().len(), 0);
        assert!(parsed[0]["error"].as_str().unwrap().contains("closing"));
    }

    #[test]
    fn test_text_report_grouped_by_status() {
        let reports = vec![
            DocumentReport::errored("notes.md", ".", "Missing frontmatter: document is empty"),
            agent_report("agents/bad.md", "cs-bad", "gren"),
            agent_report("agents/good.md", "cs-good", "blue"),
            agent_report("agents/other.md", "cs-other", "red"),
        ];
        let text = ReportExporter::to_text(&reports);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Valid (2):");
        assert_eq!(lines[1], "✓ agents/good.md");
        assert_eq!(lines[2], "✓ agents/other.md");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Invalid (1):");
        assert_eq!(lines[5], "✗ agents/bad.md");
        assert!(lines[6].starts_with("    color: invalid value: gren"));
        assert!(lines[6].ends_with("(did you mean 'green'?)"));
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "Errored (1):");
        assert_eq!(lines[9], "! notes.md");
        assert_eq!(lines[10], "    Missing frontmatter: document is empty");
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "Summary: valid: 2, invalid: 1, errored: 1");
        assert_eq!(lines[13], "Results: 2/4");
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn test_text_report_omits_empty_sections() {
        let reports = vec![agent_report("agents/bad.md", "cs-bad", "teal")];
        let text = ReportExporter::to_text(&reports);
        assert!(text.starts_with("Invalid (1):\n✗ agents/bad.md\n"));
        assert!(!text.contains("Valid ("));
        assert!(!text.contains("Errored ("));
    }

    #[test]
    fn test_output_is_deterministic() {
        let reports = vec![
            agent_report("agents/a.md", "cs-a", "red"),
            agent_report("agents/b.md", "cs-b", "yellow"),
        ];
        assert_eq!(
            ReportExporter::to_json(&reports).unwrap(),
            ReportExporter::to_json(&reports).unwrap()
        );
        assert_eq!(
            ReportExporter::to_text(&reports),
            ReportExporter::to_text(&reports)
        );
    }

    #[test]
    fn test_html_report() {
        let reports = vec![agent_report("agents/a.md", "cs-a", "teal")];
        let html = ReportExporter::to_html(&reports, GroupBy::Rule);
        assert!(html.contains("<tr><td>color</td><td>0</td><td>1</td><td>0.0</td></tr>"));
        assert!(html.contains("Summary: valid: 0, invalid: 1, errored: 0"));
        assert!(html.contains("Results: 0/1"));
    }
}
