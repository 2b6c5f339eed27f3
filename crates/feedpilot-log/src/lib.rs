use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One observation or action recorded by an agent run.
///
/// Entries are never rewritten. A reply is recorded as a second entry carrying
/// the same `content` and `fingerprint` as the observation it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub handle: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub likes: u64,
    pub retweets: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LogEntry {
    pub fn new(handle: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            timestamp: Utc::now(),
            content: content.into(),
            reply: None,
            likes: 0,
            retweets: 0,
            fingerprint: None,
            url: None,
        }
    }

    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.reply = Some(text.into());
        self
    }

    pub fn engagement(mut self, likes: u64, retweets: u64) -> Self {
        self.likes = likes;
        self.retweets = retweets;
        self
    }

    pub fn fingerprint(mut self, v: impl Into<String>) -> Self {
        self.fingerprint = Some(v.into());
        self
    }

    pub fn url(mut self, v: Option<String>) -> Self {
        self.url = v;
        self
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Corrupt entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        source: serde_json::Error,
    },
    #[cfg(feature = "async")]
    #[error("Join error: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Append-only JSON-lines store. One entry per line.
pub struct JsonlStore {
    path: PathBuf,
    file: File,
}

impl JsonlStore {
    /// Open (or create) the log file, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry. Returns only after the line has reached disk.
    pub fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }
}

/// Read every entry back from a log file. Blank lines are skipped.
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| Error::Corrupt {
            line: i + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(feature = "async")]
pub mod async_store {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// `JsonlStore` behind a mutex, written from the blocking pool.
    #[derive(Clone)]
    pub struct AsyncJsonlStore {
        inner: Arc<Mutex<JsonlStore>>,
    }

    impl AsyncJsonlStore {
        pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            let store = tokio::task::spawn_blocking(move || JsonlStore::open(path))
                .await
                .map_err(|e| Error::Join(e.to_string()))??;
            Ok(Self {
                inner: Arc::new(Mutex::new(store)),
            })
        }

        pub async fn append(&self, entry: LogEntry) -> Result<()> {
            let inner = self.inner.clone();
            tokio::task::spawn_blocking(move || {
                let mut guard = inner
                    .lock()
                    .map_err(|e| Error::Join(format!("log store poisoned: {}", e)))?;
                guard.append(&entry)
            })
            .await
            .map_err(|e| Error::Join(e.to_string()))?
        }
    }
}

#[cfg(feature = "async")]
pub use async_store::AsyncJsonlStore;
