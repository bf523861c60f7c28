//! Field validation.
//!
//! A [`Schema`] is an ordered list of [`ValidationRule`]s. The
//! [`FieldValidator`] checks one [`MetadataMapping`] against one schema and
//! returns a [`ValidationResult`] with exactly one [`RuleOutcome`] per rule.
//! Every rule is always evaluated, so a single run reports every problem.

use crate::error::{Error, Result};
use crate::models::{MetaValue, MetadataMapping};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Expected shape of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// No type constraint
    #[default]
    Any,
    /// String, number or boolean
    Scalar,
    String,
    Number,
    Boolean,
    List,
    Mapping,
}

impl FieldType {
    /// Check whether a value has this type
    pub fn accepts(&self, value: &MetaValue) -> bool {
        match self {
            Self::Any => true,
            Self::Scalar => value.is_scalar(),
            Self::String => matches!(value, MetaValue::String(_)),
            Self::Number => matches!(value, MetaValue::Integer(_) | MetaValue::Float(_)),
            Self::Boolean => matches!(value, MetaValue::Bool(_)),
            Self::List => matches!(value, MetaValue::List(_)),
            Self::Mapping => matches!(value, MetaValue::Mapping(_)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Scalar => "scalar",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema constraint on a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Field name
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    /// Closed set of legal values; empty means unrestricted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    /// Regex every scalar value (or list item) must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValidationRule {
    /// A rule for a field that must be present
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: true,
            field_type,
            allowed: Vec::new(),
            pattern: None,
            description: None,
        }
    }

    /// A rule for a field that may be absent
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Restrict the field to a closed set of values
    pub fn with_allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    /// Require values to match a regex
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this rule is an enum rule
    pub fn is_enum(&self) -> bool {
        !self.allowed.is_empty()
    }
}

/// A named, ordered list of rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rules: Vec<ValidationRule>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rules: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a rule
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Check that the schema itself is well formed
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config_error("Schema name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(Error::config_error(format!(
                    "Schema '{}' has a rule with an empty field name",
                    self.name
                )));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(Error::config_error(format!(
                    "Schema '{}' declares field '{}' more than once",
                    self.name, rule.name
                )));
            }
            if let Some(pattern) = &rule.pattern {
                Regex::new(pattern).map_err(|e| {
                    Error::config_error(format!(
                        "Schema '{}' field '{}' has an invalid pattern: {}",
                        self.name, rule.name, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

/// Status of a single rule check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
    /// Optional field absent; counts neither as pass nor as fail
    Skip,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

/// Outcome of checking one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Field name of the rule
    pub name: String,
    pub status: RuleStatus,
    /// Diagnostic, set for failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RuleOutcome {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: RuleStatus::Pass,
            message: None,
            suggestion: None,
        }
    }

    pub fn skip(name: impl Into<String>) -> Self {
        Self {
            status: RuleStatus::Skip,
            ..Self::pass(name)
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: RuleStatus::Fail,
            message: Some(message.into()),
            suggestion: None,
        }
    }

    /// Set a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == RuleStatus::Fail
    }
}

/// Result of validating one document against one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub document: String,
    pub schema: String,
    /// One entry per rule, in schema order
    pub outcomes: Vec<RuleOutcome>,
}

impl ValidationResult {
    /// Valid iff no rule failed
    pub fn is_valid(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn passed_count(&self) -> usize {
        self.count(RuleStatus::Pass)
    }

    pub fn failed_count(&self) -> usize {
        self.count(RuleStatus::Fail)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(RuleStatus::Skip)
    }

    /// Rules that were actually checked (skipped ones excluded)
    pub fn checked_count(&self) -> usize {
        self.outcomes.len() - self.skipped_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Outcome for a field name
    pub fn outcome(&self, name: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    fn count(&self, status: RuleStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Checks metadata mappings against a schema
#[derive(Debug, Clone)]
pub struct FieldValidator {
    schema: Schema,
    patterns: Vec<Option<Regex>>,
}

impl FieldValidator {
    /// Create a validator, compiling the schema's patterns once
    pub fn new(schema: Schema) -> Result<Self> {
        schema.validate()?;
        let patterns = schema
            .rules
            .iter()
            .map(|rule| {
                rule.pattern
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|e| Error::config_error(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, patterns })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate a mapping, evaluating every rule
    pub fn validate(&self, mapping: &MetadataMapping, document: &str) -> ValidationResult {
        let outcomes = self
            .schema
            .rules
            .iter()
            .zip(&self.patterns)
            .map(|(rule, pattern)| check_rule(rule, pattern.as_ref(), mapping.get(&rule.name)))
            .collect();

        ValidationResult {
            document: document.to_string(),
            schema: self.schema.name.clone(),
            outcomes,
        }
    }
}

fn check_rule(
    rule: &ValidationRule,
    pattern: Option<&Regex>,
    value: Option<&MetaValue>,
) -> RuleOutcome {
    let Some(value) = value else {
        return if rule.required {
            RuleOutcome::fail(&rule.name, format!("missing required field: {}", rule.name))
        } else {
            RuleOutcome::skip(&rule.name)
        };
    };

    if !rule.field_type.accepts(value) {
        return RuleOutcome::fail(
            &rule.name,
            format!("expected {}, got {}", rule.field_type, value.type_name()),
        );
    }

    // Enum and pattern checks apply to scalars and to each list item.
    let candidates: Vec<String> = match value {
        MetaValue::List(items) => items.clone(),
        MetaValue::Mapping(_) => {
            if rule.is_enum() || pattern.is_some() {
                return RuleOutcome::fail(
                    &rule.name,
                    format!("expected {}, got mapping", FieldType::Scalar),
                );
            }
            return RuleOutcome::pass(&rule.name);
        }
        scalar => scalar.scalar_text().into_iter().collect(),
    };

    if rule.is_enum() {
        let invalid: Vec<&str> = candidates
            .iter()
            .map(String::as_str)
            .filter(|c| !rule.allowed.iter().any(|a| a == c))
            .collect();
        if !invalid.is_empty() {
            let outcome = RuleOutcome::fail(
                &rule.name,
                format!(
                    "invalid value: {} (must be one of: {})",
                    invalid.join(", "),
                    rule.allowed.join(", ")
                ),
            );
            return match closest_match(invalid[0], &rule.allowed) {
                Some(best) => outcome.with_suggestion(format!("did you mean '{}'?", best)),
                None => outcome,
            };
        }
    }

    if let Some(regex) = pattern
        && let Some(bad) = candidates.iter().find(|c| !regex.is_match(c))
    {
        return RuleOutcome::fail(
            &rule.name,
            format!("value {} does not match pattern {}", bad, regex.as_str()),
        );
    }

    RuleOutcome::pass(&rule.name)
}

/// Closest allowed value within a small edit distance
fn closest_match<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let threshold = (value.chars().count() / 3).max(1);
    allowed
        .iter()
        .map(|candidate| (strsim::levenshtein(value, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.as_str())
}
