//! Snapshot Store: durable, atomically published JSON file that the read API serves.
//!
//! `write` serializes the whole snapshot in memory, writes it to a temp file in
//! the target's directory, fsyncs, and renames it over the live path. A reader
//! opening the path sees either the old complete file or the new one.
//!
//! The file is a JSON array of source results:
//! `[{"hot_name": .., "content": [{"title": .., "href": ..}], "crawler_time": .., "ok": ..}]`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::ingest::types::{Snapshot, SourceResult};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotWriteError {
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("snapshot path has no parent directory: {}", .0.display())]
    NoParent(PathBuf),

    #[error("I/O error during {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotWriteError {
    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotReadError {
    #[error("no snapshot has been published yet")]
    NotYetAvailable,

    #[error("snapshot at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading snapshot: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Publish `snapshot`, replacing the previous one in a single rename.
    /// Callers serialize writes (the scheduler never overlaps cycles).
    pub async fn write(&self, snapshot: &Snapshot) -> Result<(), SnapshotWriteError> {
        let bytes = serde_json::to_vec(&snapshot.results).map_err(SnapshotWriteError::Serialize)?;
        let path = self.path.clone();
        let len = bytes.len();
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .map_err(|e| {
                SnapshotWriteError::io("snapshot writer task", std::io::Error::other(e))
            })??;
        info!(
            target: "store",
            path = %self.path.display(),
            bytes = len,
            sources = snapshot.results.len(),
            "snapshot published"
        );
        Ok(())
    }

    /// The most recently published snapshot.
    pub async fn read_latest(&self) -> Result<Snapshot, SnapshotReadError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| SnapshotReadError::Io(std::io::Error::other(e)))?
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), SnapshotWriteError> {
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(SnapshotWriteError::NoParent(path.to_path_buf())),
    };
    fs::create_dir_all(parent).map_err(|e| SnapshotWriteError::io("create snapshot dir", e))?;

    // Same directory as the target, so the rename stays on one filesystem.
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| SnapshotWriteError::io("create temp file", e))?;
    tmp.write_all(data)
        .map_err(|e| SnapshotWriteError::io("write temp file", e))?;
    tmp.flush()
        .map_err(|e| SnapshotWriteError::io("flush temp file", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| SnapshotWriteError::io("fsync temp file", e))?;
    tmp.persist(path)
        .map_err(|e| SnapshotWriteError::io("rename temp file over snapshot", e.error))?;
    debug!(target: "store", path = %path.display(), "renamed temp file into place");
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotReadError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotReadError::NotYetAvailable)
        }
        Err(e) => return Err(e.into()),
    };
    let results: Vec<SourceResult> =
        serde_json::from_slice(&bytes).map_err(|source| SnapshotReadError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    // The file carries no cycle timestamp of its own.
    let generated_at = match results.iter().map(|r| r.fetched_at).max() {
        Some(ts) => ts,
        None => DateTime::<Utc>::from(fs::metadata(path)?.modified()?),
    };

    Ok(Snapshot {
        results,
        generated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Record;

    #[test]
    fn reads_files_without_ok_or_error_fields() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("result.json");
        fs::write(
            &p,
            r#"[{"hot_name":"贴吧","content":[{"title":"t","href":"h"}],"crawler_time":"2024-05-01T08:00:00Z"}]"#,
        )
        .unwrap();
        let snap = read_snapshot(&p).unwrap();
        assert_eq!(snap.results.len(), 1);
        assert!(snap.results[0].ok);
        assert_eq!(snap.results[0].records, vec![Record::new("t", "h")]);
        assert_eq!(snap.generated_at.to_rfc3339(), "2024-05-01T08:00:00+00:00");
    }

    #[test]
    fn empty_snapshot_takes_its_time_from_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("result.json");
        fs::write(&p, b"[]").unwrap();
        let mtime = DateTime::<Utc>::from(fs::metadata(&p).unwrap().modified().unwrap());

        let snap = read_snapshot(&p).unwrap();
        assert!(snap.results.is_empty());
        assert_eq!(snap.generated_at, mtime);
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested/deeper/result.json");
        atomic_write(&p, b"[]").unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"[]");
    }
}
