//! Loader error types.
//!
//! A load failure means the dataset cannot be evaluated at all, which is
//! distinct from a query that simply finds no matching submission.

use thiserror::Error;

/// Errors raised while turning a source into a [`Dataset`](crate::data::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened, read or parsed.
    #[error("source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// The source was read but contains no data rows.
    #[error("source '{0}' contains no rows")]
    SourceEmpty(String),

    /// An identifier column required by the schema is not in the header.
    #[error("column '{column}' required by schema '{schema}' is missing from the source")]
    MissingColumn { column: String, schema: String },

    /// The schema itself is inconsistent.
    #[error(transparent)]
    Schema(#[from] crate::data::schema::SchemaError),
}

impl LoadError {
    pub fn unavailable(source_name: impl Into<String>, err: &anyhow::Error) -> Self {
        LoadError::SourceUnavailable {
            source_name: source_name.into(),
            reason: format!("{err:#}"),
        }
    }
}
