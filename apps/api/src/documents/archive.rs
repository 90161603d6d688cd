//! In-memory zip packaging for stage download bundles.

use std::io::{Cursor, Write};

use anyhow::anyhow;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::errors::AppError;

/// Builds a zip archive from (file name, contents) pairs, entirely in memory.
/// Bundles are a handful of small text files, so buffering is fine.
pub fn build_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, AppError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, data) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| AppError::Internal(anyhow!("zip entry {name}: {e}")))?;
        writer
            .write_all(data)
            .map_err(|e| AppError::Internal(anyhow!("zip entry {name}: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::Internal(anyhow!("finalize zip: {e}")))?;
    Ok(cursor.into_inner())
}
