//! Structured error types shared across shgrav crates.
//!
//! Every failure carries an [`ErrorInfo`] with a stable kebab-case code such as
//! `icgem-coefficient` or `artifact-truncated`. Context keys follow a small
//! vocabulary: `model` for the registry id, `path` and `line` for the source
//! position (1-based), and `field` for the offending token. The display form
//! puts the position first, so messages read like compiler diagnostics.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`GravError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (model, path, line, field).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds the `path` context entry.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for coefficient conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum GravError {
    /// Model registry and metadata errors.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Coefficient text parsing errors.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Dense matrix assembly errors.
    #[error("assembly error: {0}")]
    Assembly(ErrorInfo),
    /// Binary layout and header consistency errors.
    #[error("layout error: {0}")]
    Layout(ErrorInfo),
    /// Filesystem and artifact I/O errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

/// Context keys folded into the location prefix rather than listed.
const LOCATION_KEYS: [&str; 2] = ["path", "line"];

impl Display for ErrorInfo {
    /// Renders `message [code] at path:line (key=value, ...); hint: ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        match (self.context.get("path"), self.context.get("line")) {
            (Some(path), Some(line)) => write!(f, " at {path}:{line}")?,
            (Some(path), None) => write!(f, " at {path}")?,
            (None, Some(line)) => write!(f, " at line {line}")?,
            (None, None) => {}
        }
        let mut rest = self
            .context
            .iter()
            .filter(|(key, _)| !LOCATION_KEYS.contains(&key.as_str()))
            .peekable();
        if rest.peek().is_some() {
            write!(f, " (")?;
            for (idx, (key, value)) in rest.enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, ")")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

impl GravError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            GravError::Config(info)
            | GravError::Parse(info)
            | GravError::Assembly(info)
            | GravError::Layout(info)
            | GravError::Io(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Attaches an additional context entry regardless of the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            GravError::Config(info) => GravError::Config(info.with_context(key, value)),
            GravError::Parse(info) => GravError::Parse(info.with_context(key, value)),
            GravError::Assembly(info) => GravError::Assembly(info.with_context(key, value)),
            GravError::Layout(info) => GravError::Layout(info.with_context(key, value)),
            GravError::Io(info) => GravError::Io(info.with_context(key, value)),
        }
    }

    /// Wraps an I/O failure on `path` under the given code.
    pub fn io(code: &str, path: &Path, err: std::io::Error) -> Self {
        GravError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}
