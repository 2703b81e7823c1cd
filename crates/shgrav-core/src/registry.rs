//! Model metadata registry mapping identifiers to parser settings and constants.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GravError};

/// Text layout of a coefficient source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Whitespace-delimited `gfc` records as distributed by ICGEM.
    Icgem,
    /// Comma-delimited `l, m, C, S, ...` records as distributed by PGDA.
    Pgda,
}

impl SourceFormat {
    /// Lowercase label used in configuration files and reports.
    pub fn label(&self) -> &'static str {
        match self {
            SourceFormat::Icgem => "icgem",
            SourceFormat::Pgda => "pgda",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-model metadata supplied alongside the coefficient file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Parser variant for the source file.
    pub format: SourceFormat,
    /// 1-based line at which coefficient parsing begins.
    pub start_line: usize,
    /// File name of the coefficient source.
    pub filename: String,
    /// Gravitational parameter GM in m^3/s^2.
    pub gm: f64,
    /// Reference radius in metres.
    pub radius: f64,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelSpec {
    /// Checks that every required field carries a usable value.
    pub fn validate(&self, model: &str) -> Result<(), GravError> {
        if self.filename.trim().is_empty() {
            return Err(GravError::Config(
                ErrorInfo::new("missing-field", "model entry missing filename")
                    .with_context("model", model)
                    .with_context("field", "filename"),
            ));
        }
        if self.start_line == 0 {
            return Err(GravError::Config(
                ErrorInfo::new("invalid-field", "start_line is 1-based and must be at least 1")
                    .with_context("model", model)
                    .with_context("field", "start_line"),
            ));
        }
        for (field, value) in [("gm", self.gm), ("radius", self.radius)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GravError::Config(
                    ErrorInfo::new("invalid-field", format!("{field} must be positive and finite"))
                        .with_context("model", model)
                        .with_context("field", field)
                        .with_context("value", value.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Lookup table of known models, passed explicitly to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRegistry {
    /// Model entries keyed by identifier.
    #[serde(default)]
    pub models: BTreeMap<String, ModelSpec>,
}

impl ModelRegistry {
    /// Parses a registry from TOML text and validates every entry.
    pub fn from_toml_str(contents: &str) -> Result<Self, GravError> {
        let registry: ModelRegistry = toml::from_str(contents).map_err(|err| {
            GravError::Config(ErrorInfo::new("registry-parse", err.to_string()))
        })?;
        for (name, spec) in &registry.models {
            spec.validate(name)?;
        }
        Ok(registry)
    }

    /// Reads and validates a registry file.
    pub fn load(path: &Path) -> Result<Self, GravError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            GravError::Config(
                ErrorInfo::new(
                    "registry-read",
                    format!("failed to read model registry: {err}"),
                )
                .with_path(path),
            )
        })?;
        Self::from_toml_str(&contents)
            .map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Adds or replaces a model entry.
    pub fn insert(&mut self, name: impl Into<String>, spec: ModelSpec) {
        self.models.insert(name.into(), spec);
    }

    /// Returns the entry for `model`, failing for unknown identifiers.
    pub fn lookup(&self, model: &str) -> Result<&ModelSpec, GravError> {
        self.models.get(model).ok_or_else(|| {
            let known: Vec<&str> = self.models.keys().map(String::as_str).collect();
            GravError::Config(
                ErrorInfo::new("unknown-model", format!("unknown model identifier {model}"))
                    .with_context("model", model)
                    .with_hint(format!("known models: {}", known.join(", "))),
            )
        })
    }

    /// Iterates models in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelSpec)> {
        self.models.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry holds no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
