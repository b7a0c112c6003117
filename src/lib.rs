//! Landpack: self-describing manifests for packaged research data bundles
//!
//! Walks a bundle directory, pairs data files with their `.resource.yaml`
//! descriptors, checksums every file, and writes a linked `@context`/`@graph`
//! manifest describing the whole tree.

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod tree;
