#![deny(missing_docs)]
#![doc = "Core types shared by the shgrav parsers, assembler and artifact codec."]

pub mod errors;
pub mod provenance;
pub mod registry;
pub mod table;

pub use errors::{ErrorInfo, GravError};
pub use provenance::SchemaVersion;
pub use registry::{ModelRegistry, ModelSpec, SourceFormat};
pub use table::{CoefficientEntry, CoefficientTable, MAX_SUPPORTED_DEGREE};
