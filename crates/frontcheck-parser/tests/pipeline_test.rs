//! Extract → decode → validate over realistic documents

use frontcheck_core::prelude::*;
use frontcheck_parser::{FrontmatterParser, decode, render, render_frontmatter};

const SKILL: &str = r#"---
name: content-creator
description: "Create SEO-optimized marketing content: blogs, social posts"
license: MIT
allowed-tools:
  - Read
  - Write
  - "Bash(git:*)"
metadata:
  version: 1.2.0
  updated: 2025-01-01
  domains: [marketing, seo]
  python-tools:
    - brand_voice_analyzer.py
    - seo_optimizer.py
---

# Content Creator

---

A horizontal rule above is part of the body.
"#;

const AGENT: &str = "---\nname: cs-code-reviewer\ndescription: Reviews code # inline comment\ncolor: yellow\ntools: []\nmodel: sonnet\n---\n";

#[test]
fn test_skill_document_pipeline() {
    let parsed = FrontmatterParser::new().parse(SKILL).unwrap();
    assert!(parsed.document.body().contains("horizontal rule"));

    let metadata = &parsed.metadata;
    assert_eq!(
        metadata.keys().collect::<Vec<_>>(),
        vec!["name", "description", "license", "allowed-tools", "metadata"]
    );
    let nested = metadata.get("metadata").unwrap().as_mapping().unwrap();
    assert_eq!(
        nested.get("version"),
        Some(&MetaValue::String("1.2.0".into()))
    );
    assert_eq!(
        nested.get("python-tools").unwrap().as_list().unwrap().len(),
        2
    );

    let result = FieldValidator::new(Schema::skill())
        .unwrap()
        .validate(metadata, "content-creator/SKILL.md");
    assert!(result.is_valid());
    assert_eq!(result.passed_count(), 5);
}

#[test]
fn test_agent_document_reports_every_failure() {
    let parsed = FrontmatterParser::new().parse(AGENT).unwrap();
    assert_eq!(parsed.metadata.get("tools"), Some(&MetaValue::List(vec![])));

    let result = FieldValidator::new(Schema::agent())
        .unwrap()
        .validate(&parsed.metadata, "cs-code-reviewer.md");

    assert_eq!(result.outcomes.len(), 5);
    assert_eq!(result.failed_count(), 1);
    let color = result.outcome("color").unwrap();
    let message = color.message.as_deref().unwrap();
    assert!(message.contains("yellow"));
    for allowed in ["blue", "green", "red", "purple", "orange"] {
        assert!(message.contains(allowed));
    }
    // Empty lists count as present
    assert_eq!(result.outcome("tools").unwrap().status, RuleStatus::Pass);
}

#[test]
fn test_round_trip_through_renderer() {
    for content in [SKILL, AGENT] {
        let parsed = FrontmatterParser::new().parse(content).unwrap();
        let rendered = render(&parsed.metadata);
        assert_eq!(decode(&rendered).unwrap(), parsed.metadata);

        let reparsed = FrontmatterParser::new()
            .parse(render_frontmatter(&parsed.metadata))
            .unwrap();
        assert_eq!(reparsed.metadata, parsed.metadata);
    }
}

#[test]
fn test_validation_is_idempotent() {
    let parsed = FrontmatterParser::new().parse(AGENT).unwrap();
    let validator = FieldValidator::new(Schema::agent()).unwrap();
    assert_eq!(
        validator.validate(&parsed.metadata, "a.md"),
        validator.validate(&parsed.metadata, "a.md")
    );
}
