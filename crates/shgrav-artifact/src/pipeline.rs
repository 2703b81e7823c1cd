use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shgrav_core::{ErrorInfo, GravError, ModelRegistry, ModelSpec, SchemaVersion, SourceFormat};
use shgrav_text::parse_file;

use crate::assemble::{assemble, DenseCoefficients};
use crate::hash::artifact_sha256;
use crate::layout::ArtifactHeader;
use crate::reader::read_artifact;
use crate::writer::write_artifact;

/// Summary of one parse, assemble and write run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Schema of this report.
    pub schema_version: SchemaVersion,
    /// Model identifier.
    pub model: String,
    /// Source text format.
    pub format: SourceFormat,
    /// Coefficient file that was parsed.
    pub source: PathBuf,
    /// Binary artifact that was written.
    pub artifact: PathBuf,
    /// Largest degree in the artifact.
    pub l_max: usize,
    /// Largest order in the artifact.
    pub m_max: usize,
    /// Distinct `(l, m)` entries parsed.
    pub entries: usize,
    /// Malformed lines dropped by a lenient parser.
    pub skipped_lines: usize,
    /// Entries that replaced an earlier duplicate.
    pub overwritten_entries: usize,
    /// Artifact length in bytes.
    pub byte_len: u64,
    /// SHA-256 of the artifact.
    pub sha256: String,
}

/// Result of checking an artifact against its source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Model identifier.
    pub model: String,
    /// Whether dimensions, GM and radius match.
    pub header_matches: bool,
    /// Cells whose C or S bits differ.
    pub mismatched_cells: usize,
}

impl VerificationReport {
    /// Whether the artifact reproduces the source exactly.
    pub fn is_match(&self) -> bool {
        self.header_matches && self.mismatched_cells == 0
    }
}

/// Conventional artifact location for `model` under `out_dir`.
pub fn artifact_path(out_dir: &Path, model: &str) -> PathBuf {
    out_dir.join(format!("{model}.bin"))
}

/// A directory source is joined with the model's file name; a file is used as is.
pub fn resolve_source(spec: &ModelSpec, source: &Path) -> PathBuf {
    if source.is_dir() {
        source.join(&spec.filename)
    } else {
        source.to_path_buf()
    }
}

struct LoadedModel {
    spec: ModelSpec,
    source: PathBuf,
    coefficients: DenseCoefficients,
    entries: usize,
    skipped_lines: usize,
    overwritten_entries: usize,
}

fn load_model(
    registry: &ModelRegistry,
    model: &str,
    source: &Path,
) -> Result<LoadedModel, GravError> {
    let spec = registry.lookup(model)?;
    spec.validate(model)?;
    let source = resolve_source(spec, source);
    let parsed = parse_file(spec.format, &source, spec.start_line)
        .map_err(|err| err.with_context("model", model))?;
    let entries = parsed.table.len();
    let overwritten_entries = parsed.table.overwrites();
    let coefficients = assemble(parsed.table).map_err(|err| {
        err.with_context("model", model)
            .with_context("path", source.display().to_string())
    })?;
    Ok(LoadedModel {
        spec: spec.clone(),
        source,
        coefficients,
        entries,
        skipped_lines: parsed.skipped_lines,
        overwritten_entries,
    })
}

/// Converts one registered model from its text source into `<out_dir>/<model>.bin`.
pub fn convert_model(
    registry: &ModelRegistry,
    model: &str,
    source: &Path,
    out_dir: &Path,
) -> Result<ConversionReport, GravError> {
    let LoadedModel {
        spec,
        source,
        coefficients,
        entries,
        skipped_lines,
        overwritten_entries,
    } = load_model(registry, model, source)?;
    let header = ArtifactHeader::for_coefficients(&coefficients, spec.gm, spec.radius)
        .map_err(|err| err.with_context("model", model))?;
    let destination = artifact_path(out_dir, model);
    let (summary, sha256) = write_artifact(&destination, &header, &coefficients)
        .and_then(|summary| Ok((summary, artifact_sha256(&destination)?)))
        .map_err(|err| err.with_context("model", model))?;

    tracing::info!(model, entries, skipped_lines, %sha256, "converted model");
    Ok(ConversionReport {
        schema_version: SchemaVersion::default(),
        model: model.to_string(),
        format: spec.format,
        source,
        artifact: summary.path,
        l_max: coefficients.l_max(),
        m_max: coefficients.m_max(),
        entries,
        skipped_lines,
        overwritten_entries,
        byte_len: summary.byte_len,
        sha256,
    })
}

/// Re-parses the source of `model` and compares it bit-for-bit with `artifact`.
pub fn verify_artifact(
    registry: &ModelRegistry,
    model: &str,
    source: &Path,
    artifact: &Path,
) -> Result<VerificationReport, GravError> {
    let LoadedModel {
        spec,
        coefficients: expected,
        ..
    } = load_model(registry, model, source)?;
    let stored = read_artifact(artifact).map_err(|err| err.with_context("model", model))?;
    let stored_coefficients = &stored.coefficients;

    let same_shape = stored_coefficients.shape() == expected.shape();
    let header_matches = same_shape
        && stored.header.gm.to_bits() == spec.gm.to_bits()
        && stored.header.radius.to_bits() == spec.radius.to_bits();
    let mismatched_cells = if same_shape {
        let stored_cells = stored_coefficients
            .c_column_major()
            .iter()
            .zip(stored_coefficients.s_column_major());
        let expected_cells = expected
            .c_column_major()
            .iter()
            .zip(expected.s_column_major());
        stored_cells
            .zip(expected_cells)
            .filter(|((c1, s1), (c2, s2))| {
                c1.to_bits() != c2.to_bits() || s1.to_bits() != s2.to_bits()
            })
            .count()
    } else {
        let (rows, cols) = expected.shape();
        rows * cols
    };
    if !header_matches {
        tracing::warn!(
            model,
            artifact = %artifact.display(),
            "artifact header does not match registry and source"
        );
    }
    Ok(VerificationReport {
        model: model.to_string(),
        header_matches,
        mismatched_cells,
    })
}

/// Fails with a layout error unless `report` is an exact match.
pub fn ensure_match(report: &VerificationReport) -> Result<(), GravError> {
    if report.is_match() {
        return Ok(());
    }
    Err(GravError::Layout(
        ErrorInfo::new("artifact-mismatch", "artifact differs from its source")
            .with_context("model", report.model.clone())
            .with_context("header_matches", report.header_matches.to_string())
            .with_context("mismatched_cells", report.mismatched_cells.to_string()),
    ))
}
