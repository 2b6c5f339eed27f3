use crate::Result;
use async_trait::async_trait;
use feedpilot_log::{AsyncJsonlStore, LogEntry};

/// Durable, append-only record of what a run saw and did.
///
/// `append` returns only once the entry is stored. Callers treat an error as
/// a warning, never as a reason to stop the run.
#[async_trait(?Send)]
pub trait ActivityLog {
    async fn append(&self, entry: LogEntry) -> Result<()>;
}

#[async_trait(?Send)]
impl ActivityLog for AsyncJsonlStore {
    async fn append(&self, entry: LogEntry) -> Result<()> {
        AsyncJsonlStore::append(self, entry).await?;
        Ok(())
    }
}
