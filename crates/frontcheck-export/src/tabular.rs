//! Grouped pass/total rows shared by the CSV and HTML renderers.

use crate::GroupBy;
use frontcheck_core::prelude::*;
use frontcheck_core::{CSVBuilder, html_escape};
use serde::Serialize;
use std::collections::BTreeMap;

/// Header of the tabular output
pub const TABULAR_HEADERS: [&str; 4] = ["group_key", "passed_count", "total_count", "percent"];

/// Pass count and total for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    pub group_key: String,
    pub passed_count: usize,
    pub total_count: usize,
}

impl GroupRow {
    /// Pass percentage with one decimal; `0.0` for an empty group
    pub fn percent(&self) -> String {
        if self.total_count == 0 {
            return "0.0".to_string();
        }
        format!(
            "{:.1}",
            self.passed_count as f64 * 100.0 / self.total_count as f64
        )
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.group_key.clone(),
            self.passed_count.to_string(),
            self.total_count.to_string(),
            self.percent(),
        ]
    }
}

/// Group reports by `group_by`, sorted by key.
///
/// Category and status groups count documents (valid ones pass). Rule
/// groups count checked rule outcomes; skipped outcomes are left out.
pub fn group_rows(reports: &[DocumentReport], group_by: GroupBy) -> Vec<GroupRow> {
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    match group_by {
        GroupBy::Category | GroupBy::Status => {
            for report in reports {
                let key = match group_by {
                    GroupBy::Status => report.status.as_str().to_string(),
                    _ => report.category.clone(),
                };
                let entry = groups.entry(key).or_default();
                entry.1 += 1;
                if report.status == DocumentStatus::Valid {
                    entry.0 += 1;
                }
            }
        }
        GroupBy::Rule => {
            for outcome in reports
                .iter()
                .filter_map(|r| r.result.as_ref())
                .flat_map(|result| &result.outcomes)
            {
                let entry = groups.entry(outcome.name.clone()).or_default();
                match outcome.status {
                    RuleStatus::Pass => {
                        entry.0 += 1;
                        entry.1 += 1;
                    }
                    RuleStatus::Fail => entry.1 += 1,
                    RuleStatus::Skip => {}
                }
            }
        }
    }

    groups
        .into_iter()
        .map(|(group_key, (passed_count, total_count))| GroupRow {
            group_key,
            passed_count,
            total_count,
        })
        .collect()
}

pub(crate) fn rows_to_csv(rows: &[GroupRow]) -> String {
    rows.iter()
        .fold(CSVBuilder::new(&TABULAR_HEADERS), |csv, row| {
            csv.add_row(row.fields())
        })
        .build()
}

/// HTML table with a header row; cells are escaped
pub(crate) fn html_table(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut html = String::from("<table>\n  <thead>\n    <tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        html.push_str("    <tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

pub(crate) fn rows_to_html(rows: &[GroupRow]) -> String {
    html_table(&TABULAR_HEADERS, rows.iter().map(GroupRow::fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(document: &str, category: &str, outcomes: Vec<RuleOutcome>) -> DocumentReport {
        let result = ValidationResult {
            document: document.to_string(),
            schema: "agent".to_string(),
            outcomes,
        };
        DocumentReport::validated(document, category, MetadataMapping::new(), result)
    }

    fn sample() -> Vec<DocumentReport> {
        vec![
            report(
                "skills/b.md",
                "skills",
                vec![RuleOutcome::pass("name"), RuleOutcome::skip("color")],
            ),
            report(
                "agents/a.md",
                "agents",
                vec![
                    RuleOutcome::pass("name"),
                    RuleOutcome::fail("color", "invalid value: teal"),
                ],
            ),
            report(
                "agents/c.md",
                "agents",
                vec![RuleOutcome::pass("name"), RuleOutcome::pass("color")],
            ),
            DocumentReport::errored("agents/d.md", "agents", "Missing frontmatter"),
        ]
    }

    #[test]
    fn test_group_by_category() {
        let rows = group_rows(&sample(), GroupBy::Category);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group_key, "agents");
        assert_eq!((rows[0].passed_count, rows[0].total_count), (1, 3));
        assert_eq!(rows[0].percent(), "33.3");
        assert_eq!(rows[1].group_key, "skills");
        assert_eq!(rows[1].percent(), "100.0");
    }

    #[test]
    fn test_group_by_status() {
        let keys: Vec<_> = group_rows(&sample(), GroupBy::Status)
            .into_iter()
            .map(|r| (r.group_key, r.passed_count, r.total_count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("errored".to_string(), 0, 1),
                ("invalid".to_string(), 0, 1),
                ("valid".to_string(), 2, 2)
            ]
        );
    }

    #[test]
    fn test_group_by_rule_excludes_skips() {
        let rows = group_rows(&sample(), GroupBy::Rule);
        assert_eq!(rows[0].group_key, "color");
        assert_eq!((rows[0].passed_count, rows[0].total_count), (1, 2));
        assert_eq!(rows[0].percent(), "50.0");
        assert_eq!(rows[1].group_key, "name");
        assert_eq!((rows[1].passed_count, rows[1].total_count), (3, 3));
    }

    #[test]
    fn test_all_skipped_rule_is_zero_percent() {
        let reports = vec![report("a.md", ".", vec![RuleOutcome::skip("model")])];
        let rows = group_rows(&reports, GroupBy::Rule);
        assert_eq!(rows[0].total_count, 0);
        assert_eq!(rows[0].percent(), "0.0");
    }

    #[test]
    fn test_csv_rows() {
        let csv = rows_to_csv(&group_rows(&sample(), GroupBy::Category));
        assert_eq!(
            csv,
            "group_key,passed_count,total_count,percent\nagents,1,3,33.3\nskills,1,1,100.0\n"
        );
    }

    #[test]
    fn test_html_escapes_cells() {
        let html = html_table(&["a"], vec![vec!["<x&y>".to_string()]]);
        assert!(html.contains("<td>&lt;x&amp;y&gt;</td>"));
        assert!(html.starts_with("<table>"));
    }
}
