//! Application configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::schema::{SchemaError, SchemaMapping};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "trial-viewer.toml";

/// Top-level configuration, usually read from `trial-viewer.toml`.
///
/// ```toml
/// source = "exports/dataCollector.csv"
/// schema = "clinic"
///
/// [schemas.clinic]
/// subject_id = "Patient"
/// examiner_id = "Rater"
/// trial_time = "T{n} secs"
/// trial_errors = "T{n} errs"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sheet export loaded at startup.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Name of the active schema mapping.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Additional schema mappings keyed by name. These shadow built-ins.
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaMapping>,
}

fn default_schema() -> String {
    "compact".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: None,
            schema: default_schema(),
            schemas: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load `path` if given, else the default file if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        for (name, schema) in config.schemas.iter_mut() {
            if schema.name.is_empty() {
                schema.name = name.clone();
            }
            schema.validate()?;
        }
        Ok(config)
    }

    /// Every selectable schema name, custom ones first.
    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        for builtin in SchemaMapping::builtin_names() {
            if !self.schemas.contains_key(*builtin) {
                names.push(builtin.to_string());
            }
        }
        names
    }

    pub fn schema_by_name(&self, name: &str) -> Result<SchemaMapping, SchemaError> {
        self.schemas
            .get(name)
            .cloned()
            .or_else(|| SchemaMapping::builtin(name))
            .ok_or_else(|| SchemaError::Unknown(name.to_string()))
    }

    /// The mapping named by `self.schema`.
    pub fn resolve_schema(&self) -> Result<SchemaMapping, SchemaError> {
        self.schema_by_name(&self.schema)
    }
}
