#![deny(missing_docs)]
#![doc = "Dense assembly of parsed coefficients and the fixed-layout `<model>.bin` artifact codec."]

/// Sparse-to-dense coefficient assembly.
pub mod assemble;
/// Zip bundles of artifacts with a checksum manifest.
pub mod bundle;
/// SHA-256 helpers.
pub mod hash;
pub mod layout;
/// Model-level conversion and verification.
pub mod pipeline;
/// Artifact decoding and memory-mapped random access.
pub mod reader;
/// Durable memory-mapped artifact writer.
pub mod writer;

pub use assemble::{assemble, DenseCoefficients};
pub use bundle::{verify_bundle, write_bundle, BundleEntry, BundleManifest, MANIFEST_NAME};
pub use hash::{artifact_sha256, sha256_hex};
pub use layout::{ArtifactHeader, HEADER_LEN};
pub use pipeline::{
    artifact_path, convert_model, ensure_match, resolve_source, verify_artifact,
    ConversionReport, VerificationReport,
};
pub use reader::{decode_artifact, read_artifact, Artifact, MappedArtifact};
pub use writer::{write_artifact, ArtifactSummary};
