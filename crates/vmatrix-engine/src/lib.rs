//! Version Matrix Engine: CI job matrices
//!
//! Generic cartesian product over named axes, structural deduplication and
//! filtering, plus the matrices derived from resolved version records:
//!
//! - **server**: one row per branch, pinned to the top of its runtime window
//! - **runtime**: one row per runtime version, on the newest supporting branch
//! - **full**: every supported branch × runtime pair
//! - **sparse**: server ∪ runtime, each branch and runtime covered once
//! - **ocp**: server matrix plus the dependency-declaration branch name

pub mod derive;
pub mod product;

pub use derive::{MatrixBuilder, Matrices, BUILTIN_AXES, OCP_AXIS, RUNTIME_AXIS, SERVER_AXIS};
pub use product::{cartesian_product, deduplicate, filter, Axes};
