//! Built-in schemas and the schema registry.
//!
//! - `agent`: agent definition files (`name`, `description`, `color`, `tools`, `model`)
//! - `skill`: skill package manifests (`SKILL.md`)
//!
//! Schemas from configuration are registered on top of the built-ins and
//! replace a built-in of the same name.

use crate::error::{Error, Result};
use crate::validation::{FieldType, Schema, ValidationRule};

/// Lowercase kebab-case identifiers such as `cs-example`
pub const KEBAB_CASE_PATTERN: &str = "^[a-z0-9]+(-[a-z0-9]+)*$";

/// Colors an agent may declare
pub const AGENT_COLORS: [&str; 5] = ["blue", "green", "red", "purple", "orange"];

/// Models an agent may pin
pub const AGENT_MODELS: [&str; 4] = ["sonnet", "opus", "haiku", "inherit"];

impl Schema {
    /// Schema for agent definition files
    pub fn agent() -> Self {
        Schema::new("agent")
            .with_description("Agent definition frontmatter")
            .rule(
                ValidationRule::required("name", FieldType::String)
                    .with_pattern(KEBAB_CASE_PATTERN)
                    .with_description("Agent identifier in kebab-case"),
            )
            .rule(ValidationRule::required("description", FieldType::String))
            .rule(ValidationRule::optional("color", FieldType::String).with_allowed(AGENT_COLORS))
            .rule(ValidationRule::optional("tools", FieldType::List))
            .rule(ValidationRule::optional("model", FieldType::String).with_allowed(AGENT_MODELS))
    }

    /// Schema for skill package manifests
    pub fn skill() -> Self {
        Schema::new("skill")
            .with_description("Skill package manifest frontmatter")
            .rule(
                ValidationRule::required("name", FieldType::String)
                    .with_pattern(KEBAB_CASE_PATTERN),
            )
            .rule(ValidationRule::required("description", FieldType::String))
            .rule(ValidationRule::optional("license", FieldType::String))
            .rule(ValidationRule::optional("allowed-tools", FieldType::List))
            .rule(
                ValidationRule::optional("metadata", FieldType::Mapping)
                    .with_description("Free-form key/value metadata, one level deep"),
            )
    }
}

/// Named schemas available to a run
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
}

impl SchemaRegistry {
    /// Registry with no schemas
    pub fn empty() -> Self {
        Self {
            schemas: Vec::new(),
        }
    }

    /// Registry holding the built-in schemas
    pub fn with_builtins() -> Self {
        Self {
            schemas: vec![Schema::agent(), Schema::skill()],
        }
    }

    /// Add a schema, replacing any schema with the same name
    pub fn register(&mut self, schema: Schema) -> Result<()> {
        schema.validate()?;
        match self.schemas.iter_mut().find(|s| s.name == schema.name) {
            Some(existing) => {
                log::debug!("Schema '{}' overrides an existing definition", schema.name);
                *existing = schema;
            }
            None => self.schemas.push(schema),
        }
        Ok(())
    }

    /// Look up a schema by name
    pub fn get(&self, name: &str) -> Result<&Schema> {
        self.schemas
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::unknown_schema(name, &self.names()))
    }

    /// Registered schema names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetaValue, MetadataMapping};
    use crate::validation::{FieldValidator, RuleStatus};

    #[test]
    fn test_builtin_schemas_are_well_formed() {
        assert!(Schema::agent().validate().is_ok());
        assert!(Schema::skill().validate().is_ok());
    }

    #[test]
    fn test_agent_schema_accepts_typical_agent() {
        let validator = FieldValidator::new(Schema::agent()).unwrap();
        let mapping: MetadataMapping = vec![
            ("name", MetaValue::String("cs-code-reviewer".into())),
            ("description", MetaValue::String("Reviews code".into())),
            ("color", MetaValue::String("purple".into())),
            ("tools", MetaValue::List(vec!["Read".into(), "Grep".into()])),
        ]
        .into_iter()
        .collect();

        let result = validator.validate(&mapping, "agents/cs-code-reviewer.md");
        assert!(result.is_valid());
        assert_eq!(result.outcome("model").unwrap().status, RuleStatus::Skip);
    }

    #[test]
    fn test_agent_name_must_be_kebab_case() {
        let validator = FieldValidator::new(Schema::agent()).unwrap();
        let mapping: MetadataMapping = vec![
            ("name", MetaValue::String("Code_Reviewer".into())),
            ("description", MetaValue::String("x".into())),
        ]
        .into_iter()
        .collect();
        assert!(!validator.validate(&mapping, "a.md").is_valid());
    }

    #[test]
    fn test_registry_lookup_and_override() {
        let mut registry = SchemaRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["agent", "skill"]);

        let custom = Schema::new("agent").rule(ValidationRule::required("id", FieldType::Any));
        registry.register(custom).unwrap();
        assert_eq!(registry.names(), vec!["agent", "skill"]);
        assert_eq!(registry.get("agent").unwrap().rules.len(), 1);

        let err = registry.get("guide").unwrap_err();
        assert!(err.to_string().contains("agent, skill"));
    }

    #[test]
    fn test_registry_rejects_malformed_schema() {
        let mut registry = SchemaRegistry::empty();
        assert!(registry.register(Schema::new("")).is_err());
        assert!(registry.names().is_empty());
    }
}
