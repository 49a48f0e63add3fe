//! Advisory file locks shared by the file-backed adapters.
//!
//! `ringback watch` and the one-shot commands run as separate processes over
//! the same data directory, so every read-modify-write of a shared file holds
//! the matching lock file for its whole duration.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;

/// Exclusive lock on a lock file. Released when dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Block (off the async runtime) until `path` is locked exclusively.
    pub async fn exclusive(path: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&path)?;
            file.lock_exclusive()?;
            Ok(Self { file })
        })
        .await
        .map_err(io::Error::other)?
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock too.
        let _ = FileExt::unlock(&self.file);
    }
}

/// A temp path next to `path`, unique per write.
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
