//! Version Matrix Core: data model, error model and ports
//!
//! Shared vocabulary for resolving which host-platform branches and
//! runtime versions a CI pipeline should test against.

pub mod data_model;
pub mod error;
pub mod ports;
pub mod upstream;

pub use data_model::{
    expand_range, unique_branches, Branch, Matrix, MatrixRow, PlatformVersion, RuntimeVersion,
    RuntimeWindow, VersionRecord,
};
pub use error::{MatrixError, MatrixResult};
pub use ports::{write_json, MemorySink, OutputSink, PackageIndex, Transport};
pub use upstream::Upstream;
