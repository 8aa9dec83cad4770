//! Core library modules for butterfly-csr
//!
//! `graph` holds the interchange model, `compactor` and `projection` the pure
//! CSR transformation, `export` the serializers and `convert` the file
//! pipeline tying them together.

pub mod compactor;
pub mod convert;
pub mod error;
pub mod export;
pub mod graph;
pub mod projection;

