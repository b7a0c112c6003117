//! Bundle directory traversal
//!
//! Walks an output directory into flat entries, maps filesystem paths onto
//! root-relative entity ids, and checksums file content.

pub mod hasher;
pub mod path;
pub mod walker;
