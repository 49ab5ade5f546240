use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode JSON for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and decode a JSON file. A missing file is `Ok(None)`, not an error;
/// every caller treats absence as "start fresh".
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "file absent, starting fresh");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| StoreError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Pretty-print `data` as JSON and write it atomically: temp file in the
/// same directory, then rename over the target.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    write_atomic(path, json.as_bytes()).map_err(|source| StoreError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Atomic write: write to a temp file in the same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no parent dir for {}", path.display()),
        )
    })?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
