use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of trials recorded per submission.
pub const TRIAL_COUNT: usize = 10;

/// Placeholder replaced by the 1-based trial index in trial column templates.
const TRIAL_PLACEHOLDER: &str = "{n}";

// ---------------------------------------------------------------------------
// Schema mapping: logical field → physical column name
// ---------------------------------------------------------------------------

/// Associates the logical fields the engine needs with the column names a
/// particular sheet uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMapping {
    #[serde(default)]
    pub name: String,
    pub subject_id: String,
    pub examiner_id: String,
    /// Columns that together describe when the submission was made.
    #[serde(default)]
    pub submitted_at: Vec<String>,
    /// Demographic / descriptive columns shown alongside the trials.
    #[serde(default)]
    pub details: Vec<String>,
    /// Template for the trial time column, e.g. `"d{n}"`.
    pub trial_time: String,
    /// Template for the trial error-count column, e.g. `"e{n}"`.
    pub trial_errors: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unknown schema '{0}'")]
    Unknown(String),

    #[error("schema '{schema}': field '{field}' must not be empty")]
    EmptyField { schema: String, field: &'static str },

    #[error("schema '{schema}': template '{template}' has no {{n}} placeholder")]
    BadTemplate { schema: String, template: String },
}

impl SchemaMapping {
    /// Short lowercase columns: `uid`, `eid`, `e1`/`d1` … `e10`/`d10`.
    pub fn compact() -> Self {
        Self {
            name: "compact".into(),
            subject_id: "uid".into(),
            examiner_id: "eid".into(),
            submitted_at: vec!["date".into(), "time".into()],
            details: Vec::new(),
            trial_time: "d{n}".into(),
            trial_errors: "e{n}".into(),
        }
    }

    /// Long-form column headers as written by the form-backed sheets.
    pub fn verbose() -> Self {
        Self {
            name: "verbose".into(),
            subject_id: "Subject UID".into(),
            examiner_id: "Examiner UID".into(),
            submitted_at: vec!["Timestamp".into()],
            details: vec!["Subject Name".into(), "Age".into(), "Gender".into()],
            trial_time: "Trial {n} Time".into(),
            trial_errors: "Trial {n} Error".into(),
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["compact", "verbose"]
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "compact" => Some(Self::compact()),
            "verbose" => Some(Self::verbose()),
            _ => None,
        }
    }

    pub fn trial_time_column(&self, n: usize) -> String {
        self.trial_time.replace(TRIAL_PLACEHOLDER, &n.to_string())
    }

    pub fn trial_errors_column(&self, n: usize) -> String {
        self.trial_errors.replace(TRIAL_PLACEHOLDER, &n.to_string())
    }

    /// Every trial column in trial order, errors before time for each trial.
    pub fn trial_columns(&self) -> Vec<String> {
        (1..=TRIAL_COUNT)
            .flat_map(|n| [self.trial_errors_column(n), self.trial_time_column(n)])
            .collect()
    }

    /// Columns shown in the submission table, in display order.
    pub fn display_columns(&self) -> Vec<String> {
        let mut cols = self.submitted_at.clone();
        cols.push(self.subject_id.clone());
        cols.push(self.examiner_id.clone());
        cols.extend(self.details.iter().cloned());
        cols.extend(self.trial_columns());
        cols
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let required: [(&'static str, &str); 4] = [
            ("subject_id", &self.subject_id),
            ("examiner_id", &self.examiner_id),
            ("trial_time", &self.trial_time),
            ("trial_errors", &self.trial_errors),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SchemaError::EmptyField {
                    schema: self.name.clone(),
                    field,
                });
            }
        }
        for template in [&self.trial_time, &self.trial_errors] {
            if !template.contains(TRIAL_PLACEHOLDER) {
                return Err(SchemaError::BadTemplate {
                    schema: self.name.clone(),
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self::compact()
    }
}
