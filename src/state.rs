use std::path::PathBuf;
use std::sync::Arc;

use trial_viewer::config::AppConfig;
use trial_viewer::data::engine::{query, Found, QueryResult};
use trial_viewer::data::loader::{DatasetSource, FileSource};
use trial_viewer::data::model::Dataset;
use trial_viewer::data::schema::SchemaMapping;

// ---------------------------------------------------------------------------
// Headline shown above the results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub severity: Severity,
    pub text: String,
}

impl Headline {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// The message for each query outcome.
pub fn headline_for(result: &QueryResult) -> Headline {
    match result {
        QueryResult::MissingInput => Headline::new(
            Severity::Warning,
            "Please enter both UID and EID to see the results.",
        ),
        QueryResult::NoMatch { subject, examiner } => Headline::new(
            Severity::Info,
            format!("No data found for UID: {subject} and EID: {examiner}"),
        ),
        QueryResult::MalformedRecord(err) => Headline::new(
            Severity::Error,
            format!(
                "Record for UID: {} and EID: {} is malformed: {err}",
                err.subject, err.examiner
            ),
        ),
        QueryResult::Found(found) => Headline::new(
            Severity::Success,
            format!(
                "Results found for UID: {} and EID: {}",
                found.record.subject, found.record.examiner
            ),
        ),
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Mapping used for the current dataset.
    pub schema: SchemaMapping,

    /// Where the dataset came from; kept so a schema change can reload it.
    pub source: Option<FileSource>,

    /// Loaded dataset (None until a source loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    pub subject_input: String,
    pub examiner_input: String,

    /// Outcome of the last "Apply Filters" click.
    pub outcome: Option<QueryResult>,

    /// Load error shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, schema: SchemaMapping) -> Self {
        Self {
            config,
            schema,
            source: None,
            dataset: None,
            subject_input: String::new(),
            examiner_input: String::new(),
            outcome: None,
            status_message: None,
        }
    }

    /// Load a sheet export with the current schema.
    pub fn open_source(&mut self, path: PathBuf) {
        self.source = Some(FileSource::new(path));
        self.reload();
    }

    /// Re-read the current source. A failure drops the old dataset, since
    /// queries against it would no longer reflect the chosen source.
    pub fn reload(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        self.outcome = None;
        match source.load(&self.schema) {
            Ok(dataset) => {
                self.dataset = Some(Arc::new(dataset));
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.describe());
                self.dataset = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch to another named schema and reload the source with it.
    pub fn set_schema(&mut self, name: &str) {
        match self.config.schema_by_name(name) {
            Ok(schema) => {
                self.config.schema = name.to_string();
                self.schema = schema;
                self.status_message = None;
                self.reload();
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run the query for the current inputs.
    pub fn apply_filters(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.outcome = None;
            return;
        };
        let result = query(dataset, &self.subject_input, &self.examiner_input);
        log::debug!("{}", headline_for(&result).text);
        self.outcome = Some(result);
    }

    pub fn found(&self) -> Option<&Found> {
        self.outcome.as_ref().and_then(QueryResult::found)
    }

    /// Load errors take precedence over the last query outcome.
    pub fn headline(&self) -> Option<Headline> {
        if let Some(msg) = &self.status_message {
            return Some(Headline::new(Severity::Error, msg.clone()));
        }
        self.outcome.as_ref().map(headline_for)
    }

    pub fn is_connected(&self) -> bool {
        self.dataset.is_some()
    }
}
