//! In-place JSON normalization.

use super::detect::{decode, SourceEncoding};
use crate::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of normalizing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizeOutcome {
    /// File was rewritten as pretty-printed UTF-8 JSON
    Rewritten { from: SourceEncoding },
    /// File already held the normalized bytes; nothing was written
    AlreadyNormalized,
    /// Decoding or parsing failed; file left untouched
    Rejected {
        encoding: SourceEncoding,
        reason: String,
    },
}

impl NormalizeOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, NormalizeOutcome::Rejected { .. })
    }
}

/// Pure normalization of a byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub encoding: SourceEncoding,
    /// Replacement content when the input decoded and parsed
    pub output: Result<Vec<u8>, String>,
}

/// Decode `bytes`, parse them as JSON and render the replacement content.
pub fn normalize_bytes(bytes: &[u8]) -> Normalized {
    let (encoding, text) = decode(bytes);
    let output = text.and_then(|text| {
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;
        serde_json::to_vec_pretty(&value).map_err(|e| format!("failed to render JSON: {}", e))
    });
    Normalized { encoding, output }
}

/// Normalize the JSON file at `path` in place.
///
/// The replacement is built fully in memory before a single write. Read and
/// write failures are returned as errors; parse failures are reported as
/// [`NormalizeOutcome::Rejected`] and leave the file untouched.
pub fn normalize_file(path: &Path) -> Result<NormalizeOutcome, StorageError> {
    let original = fs::read(path).map_err(|e| StorageError::io(path, e))?;
    let normalized = normalize_bytes(&original);

    let output = match normalized.output {
        Ok(output) => output,
        Err(reason) => {
            debug!(
                path = %path.display(),
                encoding = %normalized.encoding,
                reason = %reason,
                "Leaving file untouched"
            );
            return Ok(NormalizeOutcome::Rejected {
                encoding: normalized.encoding,
                reason,
            });
        }
    };

    if output == original {
        return Ok(NormalizeOutcome::AlreadyNormalized);
    }

    fs::write(path, &output).map_err(|e| StorageError::io(path, e))?;
    info!(
        path = %path.display(),
        from = %normalized.encoding,
        "Rewrote file as UTF-8 JSON"
    );
    Ok(NormalizeOutcome::Rewritten {
        from: normalized.encoding,
    })
}
