use std::path::Path;

use sha2::Digest;

use dprep_model::{PrepError, Result};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// SHA-256 of a file's contents.
///
/// # Errors
///
/// Returns [`PrepError::Io`] if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| PrepError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(sha256_hex(&bytes))
}
