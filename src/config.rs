//! Settings parsing — from an ordered JSON document to a [`PipelineConfig`].
//!
//! The settings document is a JSON object whose keys are stage categories
//! (case-insensitive) and whose values are the per-stage sections. Key order
//! in the document is the pipeline's execution order, so the parser runs on
//! `serde_json` with `preserve_order` enabled.
//!
//! ```json
//! {
//!   "flux":  { "service": "honda", "output_binning": { ... } },
//!   "osc":   { "service": "two_flavor", "theta23": 0.78, ... },
//!   "aeff":  { "service": "scale", "aeff_scale": 1.2, ... }
//! }
//! ```
//!
//! Each section needs at least a `service` field; everything else is passed
//! verbatim to the stage factory as [`StageParams`], opaque to the core.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map as JsonMap, Value};
use thiserror::Error;

use crate::binning::Binning;
use crate::errors::StageError;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// A problem with the settings document itself, before any stage is built.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON.
    #[error("failed to parse settings")]
    Parse(#[from] serde_json::Error),

    /// The document root is not an object of stage sections.
    #[error("settings root must be a JSON object of stage sections")]
    NotAnObject,

    /// A stage section is not an object.
    #[error("stage section `{category}` must be a JSON object")]
    SectionNotAnObject { category: String },

    /// A stage section has no `service` field.
    #[error("stage section `{category}` is missing the `service` field")]
    MissingService { category: String },

    /// The `service` field is not a string.
    #[error("stage section `{category}` has a non-string `service` field")]
    ServiceNotAString { category: String },

    /// Two sections name the same category (case-insensitively).
    #[error("duplicate stage category `{category}`")]
    DuplicateCategory { category: String },
}

// ─── StageParams ────────────────────────────────────────────────────────────

/// Opaque constructor parameters for one stage: the full settings section,
/// passed through verbatim.
///
/// Typed accessors are provided for stage implementations; the pipeline core
/// itself never reads these beyond handing them to the factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageParams {
    fields: JsonMap<String, Value>,
}

impl StageParams {
    /// Wrap a raw JSON object.
    pub fn new(fields: JsonMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw access to a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Required float parameter.
    pub fn f64(&self, name: &str) -> Result<f64, StageError> {
        match self.fields.get(name) {
            None => Err(StageError::missing_param(name)),
            Some(v) => v
                .as_f64()
                .ok_or_else(|| StageError::invalid_param(name, "expected a number")),
        }
    }

    /// Optional float parameter with a default.
    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64, StageError> {
        match self.fields.get(name) {
            None => Ok(default),
            Some(v) => v
                .as_f64()
                .ok_or_else(|| StageError::invalid_param(name, "expected a number")),
        }
    }

    /// Required string parameter.
    pub fn str(&self, name: &str) -> Result<&str, StageError> {
        match self.fields.get(name) {
            None => Err(StageError::missing_param(name)),
            Some(v) => v
                .as_str()
                .ok_or_else(|| StageError::invalid_param(name, "expected a string")),
        }
    }

    /// Required binning parameter.
    pub fn binning(&self, name: &str) -> Result<Binning, StageError> {
        match self.fields.get(name) {
            None => Err(StageError::missing_param(name)),
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| StageError::invalid_param(name, e.to_string())),
        }
    }

    /// Optional binning parameter — absence is a modeled value, not an error.
    pub fn opt_binning(&self, name: &str) -> Result<Option<Binning>, StageError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| StageError::invalid_param(name, e.to_string())),
        }
    }
}

// ─── StageSpec / PipelineConfig ─────────────────────────────────────────────

/// One entry of the configuration: which stage to build, and with what.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    /// Stage category, lowercased at parse time.
    pub category: String,

    /// Service name selecting the implementation within the category.
    pub service: String,

    /// Constructor parameters (the full section, `service` included).
    pub params: StageParams,
}

/// The ordered stage configuration. Iteration order is execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    specs: Vec<StageSpec>,
}

impl PipelineConfig {
    /// Build a config directly from specs (mainly for tests and embedding).
    pub fn from_specs(specs: Vec<StageSpec>) -> Self {
        Self { specs }
    }

    /// Parse a settings document from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let root = match value {
            Value::Object(map) => map,
            _ => return Err(ConfigError::NotAnObject),
        };

        let mut specs: Vec<StageSpec> = Vec::with_capacity(root.len());
        for (key, section) in root {
            let category = key.to_lowercase();
            if specs.iter().any(|s| s.category == category) {
                return Err(ConfigError::DuplicateCategory { category });
            }

            let fields = match section {
                Value::Object(map) => map,
                _ => return Err(ConfigError::SectionNotAnObject { category }),
            };

            let service = match fields.get("service") {
                None => return Err(ConfigError::MissingService { category }),
                Some(Value::String(s)) => s.clone(),
                Some(_) => return Err(ConfigError::ServiceNotAString { category }),
            };

            specs.push(StageSpec {
                category,
                service,
                params: StageParams::new(fields),
            });
        }

        Ok(Self { specs })
    }

    /// Parse a settings document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Load and parse a settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Stage specs in declaration order.
    pub fn specs(&self) -> &[StageSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
