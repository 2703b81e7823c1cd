use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use shgrav_core::GravError;

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 of the file at `path`, streamed.
pub fn artifact_sha256(path: &Path) -> Result<String, GravError> {
    let mut file = File::open(path).map_err(|err| GravError::io("checksum-read", path, err))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|err| GravError::io("checksum-read", path, err))?;
    Ok(hex::encode(hasher.finalize()))
}
