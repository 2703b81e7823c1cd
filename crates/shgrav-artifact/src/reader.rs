use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use shgrav_core::{ErrorInfo, GravError};

use crate::assemble::DenseCoefficients;
use crate::layout::{
    check_layout, decode_values, read_f64, value_offset, ArtifactHeader, HEADER_LEN, VALUE_LEN,
};

/// Header and matrices recovered from an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Header fields.
    pub header: ArtifactHeader,
    /// Dense C and S matrices.
    pub coefficients: DenseCoefficients,
}

fn decode_checked(bytes: &[u8], origin: &str) -> Result<Artifact, GravError> {
    let (header, cells) = check_layout(bytes, origin)?;
    let (l_max, m_max) = header.dimensions()?;
    let c = decode_values(bytes, HEADER_LEN, cells);
    let s = decode_values(bytes, HEADER_LEN + cells * VALUE_LEN, cells);
    let coefficients = DenseCoefficients::from_column_major(l_max, m_max, c, s)?;
    Ok(Artifact {
        header,
        coefficients,
    })
}

/// Decodes an artifact held in memory.
pub fn decode_artifact(bytes: &[u8]) -> Result<Artifact, GravError> {
    decode_checked(bytes, "<memory>")
}

/// Reads the artifact at `path` into owned matrices.
pub fn read_artifact(path: &Path) -> Result<Artifact, GravError> {
    MappedArtifact::open(path)?.to_artifact()
}

/// Read-only mapping of an artifact for random access without materialising
/// the matrices.
#[derive(Debug)]
pub struct MappedArtifact {
    map: Mmap,
    header: ArtifactHeader,
    l_max: usize,
    m_max: usize,
    cells: usize,
    path: PathBuf,
}

impl MappedArtifact {
    /// Maps `path` and validates its layout.
    pub fn open(path: &Path) -> Result<Self, GravError> {
        let file = File::open(path).map_err(|err| GravError::io("artifact-open", path, err))?;
        let len = file
            .metadata()
            .map_err(|err| GravError::io("artifact-open", path, err))?
            .len();
        // Zero-length maps are rejected by some platforms; report truncation instead.
        if len < HEADER_LEN as u64 {
            return Err(GravError::Io(
                ErrorInfo::new("artifact-truncated", "artifact shorter than its header")
                    .with_path(path)
                    .with_context("expected", HEADER_LEN.to_string())
                    .with_context("actual", len.to_string()),
            ));
        }
        // SAFETY: the map is read-only and artifacts are written once by a
        // single producer; concurrent truncation by another process is outside
        // the supported usage.
        let map = unsafe { Mmap::map(&file) }
            .map_err(|err| GravError::io("artifact-map", path, err))?;
        let origin = path.display().to_string();
        let (header, cells) = check_layout(&map, &origin)?;
        let (l_max, m_max) = header.dimensions()?;
        Ok(Self {
            map,
            header,
            l_max,
            m_max,
            cells,
            path: path.to_path_buf(),
        })
    }

    /// Header fields.
    pub fn header(&self) -> &ArtifactHeader {
        &self.header
    }

    /// Path the artifact was mapped from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw mapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }

    /// `(C, S)` at `(l, m)`, read directly from the mapping.
    pub fn coefficient(&self, degree: usize, order: usize) -> Option<(f64, f64)> {
        if degree > self.l_max || order > self.m_max {
            return None;
        }
        let offset = value_offset(self.l_max, degree, order);
        let c = read_f64(&self.map, offset);
        let s = read_f64(&self.map, offset + self.cells * VALUE_LEN);
        Some((c, s))
    }

    /// Copies the payload into owned matrices.
    pub fn to_artifact(&self) -> Result<Artifact, GravError> {
        decode_checked(&self.map, &self.path.display().to_string())
    }
}
