//! Content checksums for bundle files using MD5

use crate::error::ManifestError;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm recorded next to each checksum value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgorithm::Md5 => write!(f, "MD5"),
        }
    }
}

/// Digest and byte length of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    /// Lowercase hex digest
    pub value: String,
    pub size: u64,
}

/// Computes checksums for files on disk.
pub trait ChecksumProvider {
    fn checksum(&self, path: &Path) -> Result<Checksum, ManifestError>;
}

/// Streaming MD5 over the full file contents
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Checksum;

impl ChecksumProvider for Md5Checksum {
    fn checksum(&self, path: &Path) -> Result<Checksum, ManifestError> {
        let mut file = File::open(path).map_err(|e| ManifestError::io(path, e))?;
        digest_reader(&mut file).map_err(|e| ManifestError::io(path, e))
    }
}

/// Stream a reader through MD5, retrying interrupted reads.
fn digest_reader<R: Read>(reader: &mut R) -> std::io::Result<Checksum> {
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut size = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
        size += read as u64;
    }

    Ok(Checksum {
        algorithm: ChecksumAlgorithm::Md5,
        value: hex::encode(hasher.finalize()),
        size,
    })
}

/// Compute the MD5 hex digest of in-memory bytes
pub fn compute_content_hash(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}
