use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};
use serde::{Deserialize, Serialize};
use shgrav_core::GravError;

use crate::assemble::DenseCoefficients;
use crate::layout::{encode_into, ArtifactHeader};

/// Outcome of a successful artifact write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    /// Destination path.
    pub path: PathBuf,
    /// Final file length in bytes.
    pub byte_len: u64,
    /// Header written at offset 0.
    pub header: ArtifactHeader,
}

/// Writable mapping over a preallocated destination file.
///
/// The map is flushed and released, and the descriptor closed, whenever the
/// sink goes out of scope. Only [`ArtifactSink::commit`] reports flush and
/// sync failures; the drop path is best-effort.
struct ArtifactSink {
    // Field order matters: the map must be dropped before the file.
    map: MmapMut,
    file: File,
    path: PathBuf,
    committed: bool,
}

impl ArtifactSink {
    fn create(path: &Path, len: usize) -> Result<Self, GravError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| GravError::io("artifact-mkdir", parent, err))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| GravError::io("artifact-create", path, err))?;
        file.set_len(len as u64)
            .map_err(|err| GravError::io("artifact-allocate", path, err))?;
        // SAFETY: the file was just created and truncated by this process and
        // stays owned by the sink for the lifetime of the map; nothing else
        // resizes it while mapped.
        let map = unsafe { MmapOptions::new().len(len).map_mut(&file) }
            .map_err(|err| GravError::io("artifact-map", path, err))?;
        Ok(Self {
            map,
            file,
            path: path.to_path_buf(),
            committed: false,
        })
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }

    fn commit(mut self) -> Result<(), GravError> {
        self.map
            .flush()
            .map_err(|err| GravError::io("artifact-flush", &self.path, err))?;
        self.file
            .sync_all()
            .map_err(|err| GravError::io("artifact-sync", &self.path, err))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for ArtifactSink {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(err) = self.map.flush() {
            tracing::warn!(path = %self.path.display(), %err, "best-effort flush failed");
        }
    }
}

/// Writes `coefficients` and `header` to `path` in the fixed binary layout.
///
/// Parent directories are created as needed. The file is sized up front,
/// filled through a writable map and synced before this returns.
pub fn write_artifact(
    path: &Path,
    header: &ArtifactHeader,
    coefficients: &DenseCoefficients,
) -> Result<ArtifactSummary, GravError> {
    header
        .validate_constants()
        .and_then(|_| header.check_shape(coefficients))
        .map_err(|err| err.with_context("path", path.display().to_string()))?;
    let len = header.file_len()?;

    let mut sink = ArtifactSink::create(path, len)?;
    encode_into(header, coefficients, sink.bytes_mut());
    sink.commit()?;

    tracing::info!(
        path = %path.display(),
        l_max = header.l_max,
        m_max = header.m_max,
        bytes = len,
        "wrote coefficient artifact"
    );
    Ok(ArtifactSummary {
        path: path.to_path_buf(),
        byte_len: len as u64,
        header: *header,
    })
}
