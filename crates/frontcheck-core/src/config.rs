//! Configuration for a frontcheck run.
//!
//! Values come from (lowest to highest precedence) the built-in defaults, an
//! optional YAML/TOML file, `FRONTCHECK_*` environment variables and finally
//! command-line flags applied through [`CheckConfigBuilder`].

use crate::error::{Error, Result};
use crate::schema::SchemaRegistry;
use crate::validation::Schema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on the number of lines searched for the closing delimiter
pub const DEFAULT_MAX_FRONTMATTER_LINES: usize = 200;

/// Settings shared by every stage of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Schema applied when none is given on the command line
    pub default_schema: String,
    /// File extensions (without the dot) treated as documents
    pub extensions: Vec<String>,
    /// Directory names skipped during discovery
    pub excluded_dirs: Vec<String>,
    /// Files larger than this are reported as errored
    pub max_file_size: u64,
    /// Closing delimiter must appear within this many lines
    pub max_frontmatter_lines: usize,
    /// Retry unsupported constructs with a full YAML parser
    pub yaml_fallback: bool,
    pub log_level: String,
    /// Additional schemas; override built-ins with the same name
    pub schemas: Vec<Schema>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            default_schema: "agent".to_string(),
            extensions: vec!["md".to_string()],
            excluded_dirs: [".git", "node_modules", "target", ".venv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_frontmatter_lines: DEFAULT_MAX_FRONTMATTER_LINES,
            yaml_fallback: false,
            log_level: "warn".to_string(),
            schemas: vec![],
        }
    }
}

impl CheckConfig {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder from the defaults
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder::new(Self::default())
    }

    /// Load configuration from an optional file layered with `FRONTCHECK_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::config_error(format!(
                    "Configuration file does not exist: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FRONTCHECK")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions")
                .with_list_parse_key("excluded_dirs"),
        );

        let settings = builder
            .build()
            .map_err(|e| Error::config_error(format!("Failed to read configuration: {}", e)))?;

        let config: CheckConfig = settings
            .try_deserialize()
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;

        config.validate()?;
        log::debug!(
            "Loaded configuration ({} custom schemas, default schema '{}')",
            config.schemas.len(),
            config.default_schema
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::config_error("At least one file extension is required"));
        }

        if self.max_frontmatter_lines == 0 {
            return Err(Error::config_error(
                "max_frontmatter_lines must be greater than zero",
            ));
        }

        if self.max_file_size == 0 {
            return Err(Error::config_error("max_file_size must be greater than zero"));
        }

        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(Error::config_error(format!(
                "Unknown log level '{}'",
                self.log_level
            )));
        }

        for schema in &self.schemas {
            schema.validate()?;
        }

        // The default schema has to resolve against builtins plus custom schemas.
        self.registry()?.get(&self.default_schema)?;

        Ok(())
    }

    /// Built-in schemas with this configuration's schemas registered on top
    pub fn registry(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::with_builtins();
        for schema in &self.schemas {
            registry.register(schema.clone())?;
        }
        Ok(registry)
    }

    /// Whether a file name has one of the configured extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// Whether a directory name is excluded from discovery
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }

    /// Log level from `log_level`, `Warn` if it does not parse
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

/// Builder applying overrides on top of a loaded configuration
pub struct CheckConfigBuilder {
    config: CheckConfig,
}

impl CheckConfigBuilder {
    /// Create a builder starting from an existing configuration
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn default_schema(mut self, name: impl Into<String>) -> Self {
        self.config.default_schema = name.into();
        self
    }

    pub fn yaml_fallback(mut self, enabled: bool) -> Self {
        self.config.yaml_fallback = enabled;
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn max_frontmatter_lines(mut self, lines: usize) -> Self {
        self.config.max_frontmatter_lines = lines;
        self
    }

    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_dirs.push(name.into());
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.config.schemas.push(schema);
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<CheckConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
