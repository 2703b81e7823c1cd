use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shgrav_core::{ErrorInfo, GravError, SchemaVersion};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::hash::sha256_hex;

/// Name of the manifest entry inside a bundle.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Checksum record for one bundled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Entry name inside the archive.
    pub path: String,
    /// SHA-256 of the uncompressed bytes.
    pub sha256: String,
    /// Uncompressed length in bytes.
    pub byte_len: u64,
}

/// Manifest stored as `manifest.json` in every bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Schema of this manifest.
    pub schema_version: SchemaVersion,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Bundled artifacts sorted by path.
    pub artifacts: Vec<BundleEntry>,
}

fn bundle_error(code: &str, path: &Path, err: impl ToString) -> GravError {
    GravError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// Packs `artifacts` into a deflate-compressed zip at `out`.
///
/// Each artifact is stored under its file name next to a manifest of
/// checksums. File names must be unique.
pub fn write_bundle(artifacts: &[PathBuf], out: &Path) -> Result<BundleManifest, GravError> {
    let mut names = BTreeSet::new();
    let mut payloads = Vec::with_capacity(artifacts.len());
    for path in artifacts {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| bundle_error("bundle-name", path, "artifact path has no file name"))?;
        if !names.insert(name.clone()) {
            return Err(GravError::Io(
                ErrorInfo::new("bundle-duplicate", "two artifacts share a file name")
                    .with_path(path)
                    .with_context("name", name),
            ));
        }
        let bytes = fs::read(path).map_err(|err| GravError::io("bundle-read", path, err))?;
        payloads.push((name, bytes));
    }
    payloads.sort_by(|a, b| a.0.cmp(&b.0));

    let manifest = BundleManifest {
        schema_version: SchemaVersion::default(),
        created_at: chrono::Utc::now().to_rfc3339(),
        artifacts: payloads
            .iter()
            .map(|(name, bytes)| BundleEntry {
                path: name.clone(),
                sha256: sha256_hex(bytes),
                byte_len: bytes.len() as u64,
            })
            .collect(),
    };

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| GravError::io("bundle-mkdir", parent, err))?;
    }
    let file = File::create(out).map_err(|err| GravError::io("bundle-create", out, err))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|err| bundle_error("bundle-manifest", out, err))?;
    writer
        .start_file(MANIFEST_NAME, options)
        .map_err(|err| bundle_error("bundle-write", out, err))?;
    writer
        .write_all(&manifest_bytes)
        .map_err(|err| bundle_error("bundle-write", out, err))?;
    for (name, bytes) in &payloads {
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| bundle_error("bundle-write", out, err))?;
        writer
            .write_all(bytes)
            .map_err(|err| bundle_error("bundle-write", out, err))?;
    }
    let file = writer
        .finish()
        .map_err(|err| bundle_error("bundle-write", out, err))?;
    file.sync_all()
        .map_err(|err| GravError::io("bundle-sync", out, err))?;

    tracing::info!(path = %out.display(), artifacts = manifest.artifacts.len(), "wrote bundle");
    Ok(manifest)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    origin: &Path,
) -> Result<Vec<u8>, GravError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|err| bundle_error("bundle-entry", origin, err).with_context("entry", name))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|err| bundle_error("bundle-entry", origin, err).with_context("entry", name))?;
    Ok(bytes)
}

/// Opens a bundle and checks every artifact against its manifest checksum.
pub fn verify_bundle(path: &Path) -> Result<BundleManifest, GravError> {
    let file = File::open(path).map_err(|err| GravError::io("bundle-open", path, err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| bundle_error("bundle-open", path, err))?;
    let manifest_bytes = read_entry(&mut archive, MANIFEST_NAME, path)?;
    let manifest: BundleManifest = serde_json::from_slice(&manifest_bytes)
        .map_err(|err| bundle_error("bundle-manifest", path, err))?;
    for artifact in &manifest.artifacts {
        let bytes = read_entry(&mut archive, &artifact.path, path)?;
        let actual = sha256_hex(&bytes);
        if actual != artifact.sha256 {
            return Err(GravError::Io(
                ErrorInfo::new("bundle-checksum", "artifact checksum mismatch")
                    .with_path(path)
                    .with_context("entry", artifact.path.clone())
                    .with_context("expected", artifact.sha256.clone())
                    .with_context("actual", actual),
            ));
        }
    }
    Ok(manifest)
}
