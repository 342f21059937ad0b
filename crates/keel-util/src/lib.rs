#![forbid(unsafe_code)]

//! Small support utilities shared across the keel crates.
//!
//! # Role in keel
//! `keel-util` is the bottom of the dependency order: parameter guard
//! clauses used at every API boundary, string helpers, Base64 wrappers,
//! buffered file/stream helpers, and totally-ordered float wrappers.
//!
//! Nothing here holds state; every function is a pure transformation or a
//! thin wrapper over `std::io`.

pub mod base64;
pub mod files;
pub mod params;
pub mod strings;
pub mod value;

pub use params::ParamError;
pub use value::{TotalF32, TotalF64};
