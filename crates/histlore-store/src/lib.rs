pub mod config;
pub mod json;
pub mod paths;
pub mod state;

pub use config::AppConfig;
pub use json::{read_json, write_json, StoreError};
pub use paths::{safe_file_name, HistlorePaths};
pub use state::{load_state, update_state};

use std::fs;
use std::path::Path;

use fs2::FileExt;

/// Timestamp-derived run identifier used in imported-file and snapshot
/// names: `YYYYmmddHHMMSS`, UTC.
pub fn run_id() -> String {
    run_id_at(time::OffsetDateTime::now_utc())
}

pub fn run_id_at(at: time::OffsetDateTime) -> String {
    let format = time::macros::format_description!(
        "[year][month][day][hour][minute][second]"
    );
    at.format(&format).expect("run id formatting should not fail")
}

/// File-based exclusive lock guard. Held for the duration of a
/// state-mutating run; released on drop.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock, creating the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}
