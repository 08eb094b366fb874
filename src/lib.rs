//! Load trial submissions from a sheet export and summarise one subject's
//! latest submission.

pub mod config;
pub mod data;
pub mod error;

pub use data::engine::{query, QueryResult};
pub use data::loader::{DatasetSource, FileSource};
pub use data::model::Dataset;
pub use data::schema::{SchemaMapping, TRIAL_COUNT};
pub use error::LoadError;
