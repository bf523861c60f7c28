//! # Batch Runs
//!
//! Discovers documents under a path and runs each one through the
//! extract → decode → validate pipeline, one document at a time.
//! A document that cannot be read or decoded is reported as errored and the
//! batch continues; only a missing or unreadable input path aborts the run.
//! A single file given directly is the input path, so failing to read it
//! aborts too.

use frontcheck_core::prelude::*;
use frontcheck_parser::FrontmatterParser;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Category of documents directly under the batch root
pub const ROOT_CATEGORY: &str = ".";

/// Reports for every document plus the folded summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub reports: Vec<DocumentReport>,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    pub fn new(reports: Vec<DocumentReport>) -> Self {
        let summary = BatchSummary::from_reports(&reports);
        Self { reports, summary }
    }
}

/// Find candidate documents under `root`, sorted by path.
///
/// A file given directly is always included. Directories named in
/// `excluded_dirs` are pruned; only files with a configured extension are
/// returned.
pub fn discover(root: &Path, config: &CheckConfig) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::file_not_found(root));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| config.is_excluded_dir(name))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(Error::Io(io::Error::from(e))),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    log::debug!("Discovered {} documents under {}", files.len(), root.display());
    Ok(files)
}

/// Document id (relative path with `/` separators) and category of `path`
pub fn document_id(base: &Path, path: &Path) -> (String, String) {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let category = match parts.len() {
        0 | 1 => ROOT_CATEGORY.to_string(),
        n => parts[..n - 1].join("/"),
    };
    (parts.join("/"), category)
}

/// I/O failures other than invalid UTF-8; these abort a run over a single file
fn is_unreadable(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() != io::ErrorKind::InvalidData)
}

/// Runs the pipeline over every document found under a path
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: CheckConfig,
    parser: FrontmatterParser,
    validator: Option<FieldValidator>,
}

impl BatchRunner {
    /// Runner that extracts and decodes without validating
    pub fn new(config: CheckConfig) -> Self {
        let parser = FrontmatterParser::from_config(&config);
        Self {
            config,
            parser,
            validator: None,
        }
    }

    /// Runner that validates every decoded document against `schema`
    pub fn validating(config: CheckConfig, schema: Schema) -> Result<Self> {
        let validator = FieldValidator::new(schema)?;
        Ok(Self {
            validator: Some(validator),
            ..Self::new(config)
        })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn is_validating(&self) -> bool {
        self.validator.is_some()
    }

    /// Process every document under `root` in path order
    pub async fn run(&self, root: &Path) -> Result<BatchOutcome> {
        let files = discover(root, &self.config)?;
        let single_file = root.is_file();
        let base = if single_file {
            root.parent().unwrap_or(Path::new(""))
        } else {
            root
        };

        log::info!(
            "Checking {} documents under {}",
            files.len(),
            root.display()
        );

        let mut reports = Vec::with_capacity(files.len());
        for path in &files {
            let (document, category) = document_id(base, path);
            let report = match self.load(path).await {
                Ok(content) => self.check_content(document, category, content),
                Err(e) if single_file && is_unreadable(&e) => return Err(e),
                Err(e) if e.is_document_error() => {
                    log::warn!("{}: {}", document, e);
                    DocumentReport::errored(document, category, e)
                }
                Err(e) => return Err(e),
            };
            reports.push(report);
        }

        let outcome = BatchOutcome::new(reports);
        log::info!(
            "Finished: {} valid, {} invalid, {} errored",
            outcome.summary.valid,
            outcome.summary.invalid,
            outcome.summary.errored
        );
        Ok(outcome)
    }

    /// Run the pipeline over content already in memory
    pub fn check_content(
        &self,
        document: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> DocumentReport {
        let document = document.into();
        let category = category.into();

        let parsed = match self.parser.parse(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("{}: {}", document, e);
                return DocumentReport::errored(document, category, e);
            }
        };

        match &self.validator {
            Some(validator) => {
                let result = validator.validate(&parsed.metadata, &document);
                log::debug!(
                    "{}: {} passed, {} failed, {} skipped",
                    document,
                    result.passed_count(),
                    result.failed_count(),
                    result.skipped_count()
                );
                DocumentReport::validated(document, category, parsed.metadata, result)
            }
            None => DocumentReport::decoded(document, category, parsed.metadata),
        }
    }

    async fn load(&self, path: &Path) -> Result<String> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > self.config.max_file_size {
            return Err(Error::file_too_large(path, size, self.config.max_file_size));
        }
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID_AGENT: &str =
        "---\nname: cs-reviewer\ndescription: Reviews code\ncolor: blue\n---\nBody\n";
    const INVALID_AGENT: &str = "---\nname: cs-example\ndescription: x\ncolor: teal\n---\n";
    const UNCLOSED: &str = "---\nname: cs-broken\ndescription: never closed\n";

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn agent_runner(config: CheckConfig) -> BatchRunner {
        BatchRunner::validating(config, Schema::agent()).unwrap()
    }

    #[test]
    fn test_document_id() {
        let base = Path::new("/docs");
        assert_eq!(
            document_id(base, Path::new("/docs/agents/a.md")),
            ("agents/a.md".to_string(), "agents".to_string())
        );
        assert_eq!(
            document_id(base, Path::new("/docs/top.md")),
            ("top.md".to_string(), ".".to_string())
        );
        assert_eq!(
            document_id(base, Path::new("/docs/a/b/c.md")).1,
            "a/b".to_string()
        );
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", VALID_AGENT);
        write(dir.path(), "a.md", VALID_AGENT);
        write(dir.path(), "notes.txt", VALID_AGENT);
        write(dir.path(), "sub/c.md", VALID_AGENT);
        write(dir.path(), "node_modules/pkg/readme.md", VALID_AGENT);

        let files = discover(dir.path(), &CheckConfig::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| document_id(dir.path(), p).0)
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "sub/c.md"]);
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = discover(&dir.path().join("missing"), &CheckConfig::default()).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "only.markdown", VALID_AGENT);
        let path = dir.path().join("only.markdown");
        assert_eq!(discover(&path, &CheckConfig::default()).unwrap(), vec![path]);
    }

    #[tokio::test]
    async fn test_errored_document_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a-valid.md", VALID_AGENT);
        write(dir.path(), "b-broken.md", UNCLOSED);
        write(dir.path(), "c-invalid.md", INVALID_AGENT);

        let outcome = agent_runner(CheckConfig::default())
            .run(dir.path())
            .await
            .unwrap();

        assert_eq!(
            outcome.summary,
            BatchSummary {
                total: 3,
                valid: 1,
                invalid: 1,
                errored: 1
            }
        );
        let statuses: Vec<_> = outcome.reports.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                DocumentStatus::Valid,
                DocumentStatus::Errored,
                DocumentStatus::Invalid
            ]
        );
        let error = outcome.reports[1].error.as_deref().unwrap();
        assert!(error.contains("Missing frontmatter"));
    }

    #[tokio::test]
    async fn test_categories_from_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "agents/reviewer.md", VALID_AGENT);
        write(dir.path(), "root.md", VALID_AGENT);

        let outcome = agent_runner(CheckConfig::default())
            .run(dir.path())
            .await
            .unwrap();
        let pairs: Vec<_> = outcome
            .reports
            .iter()
            .map(|r| (r.document.as_str(), r.category.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("agents/reviewer.md", "agents"), ("root.md", ".")]
        );
    }

    #[tokio::test]
    async fn test_oversized_file_is_errored() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.md", VALID_AGENT);
        let config = CheckConfig::builder().max_file_size(8).build().unwrap();

        let outcome = agent_runner(config).run(dir.path()).await.unwrap();
        assert_eq!(outcome.summary.errored, 1);
        assert!(
            outcome.reports[0]
                .error
                .as_deref()
                .unwrap()
                .contains("File too large")
        );
    }

    #[tokio::test]
    async fn test_decode_only_run() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", INVALID_AGENT);

        let runner = BatchRunner::new(CheckConfig::default());
        assert!(!runner.is_validating());
        let outcome = runner.run(dir.path()).await.unwrap();
        let report = &outcome.reports[0];
        assert_eq!(report.status, DocumentStatus::Valid);
        assert!(report.result.is_none());
        assert_eq!(
            report.metadata.as_ref().unwrap().get("color"),
            Some(&MetaValue::String("teal".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let outcome = agent_runner(CheckConfig::default())
            .run(dir.path())
            .await
            .unwrap();
        assert!(outcome.reports.is_empty());
        assert!(outcome.summary.all_valid());
    }

    #[tokio::test]
    async fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "agents/solo.md", INVALID_AGENT);

        let outcome = agent_runner(CheckConfig::default())
            .run(&dir.path().join("agents/solo.md"))
            .await
            .unwrap();
        assert_eq!(outcome.reports[0].document, "solo.md");
        assert_eq!(outcome.reports[0].category, ".");
        assert_eq!(outcome.summary.invalid, 1);
    }

    #[test]
    fn test_unreadable_errors() {
        assert!(is_unreadable(&Error::Io(io::Error::from(
            io::ErrorKind::PermissionDenied
        ))));
        assert!(!is_unreadable(&Error::Io(io::Error::from(
            io::ErrorKind::InvalidData
        ))));
        assert!(!is_unreadable(&Error::file_too_large("a.md", 10, 5)));
    }

    #[tokio::test]
    async fn test_single_file_invalid_utf8_is_errored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        fs::write(&path, [0x2d, 0x2d, 0x2d, 0x0a, 0xff, 0xfe, 0x0a]).unwrap();

        let outcome = agent_runner(CheckConfig::default())
            .run(&path)
            .await
            .unwrap();
        assert_eq!(outcome.summary.errored, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_single_file_aborts() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "locked.md", VALID_AGENT);
        let path = dir.path().join("locked.md");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&path).is_ok() {
            // Permissions are not enforced for this user
            return;
        }

        let runner = agent_runner(CheckConfig::default());
        let err = runner.run(&path).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        // Inside a directory the same file is just an errored document
        let outcome = runner.run(dir.path()).await.unwrap();
        assert_eq!(outcome.summary.errored, 1);
    }

    #[test]
    fn test_check_content_syntax_error() {
        let runner = agent_runner(CheckConfig::default());
        let report = runner.check_content("x.md", ".", "---\nname: x\n\tbad: 1\n---\n");
        assert_eq!(report.status, DocumentStatus::Errored);
        assert!(report.error.unwrap().contains("line 2"));
    }
}
