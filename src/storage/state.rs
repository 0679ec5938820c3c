//! Persistence of the alerting state singleton.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::monitors::uptime::AlertState;

use super::error::StoreResult;

/// Load/save seam for [`AlertState`], so tests can substitute an in-memory
/// implementation for the durable one.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Load the persisted state. A missing or corrupt file is treated as
    /// absent and yields the default state, never an error.
    async fn load(&self) -> AlertState;

    /// Persist the state, all-or-nothing.
    async fn save(&self, state: &AlertState) -> StoreResult<()>;
}

/// File-backed repository: one JSON object, fully overwritten on each save
/// through a temp file and an atomic rename.
pub struct FileStateRepository {
    path: PathBuf,
}

impl FileStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn load(&self) -> AlertState {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return AlertState::default(),
            Err(e) => {
                warn!("failed to read state file, starting from defaults: {e}");
                return AlertState::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                warn!("malformed state file, starting from defaults: {e}");
                AlertState::default()
            }
        }
    }

    async fn save(&self, state: &AlertState) -> StoreResult<()> {
        let contents = serde_json::to_string(state)?;

        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

/// In-memory repository (no persistence), for tests.
#[derive(Default)]
pub struct MemoryStateRepository {
    state: Mutex<AlertState>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AlertState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

#[async_trait]
impl StateRepository for MemoryStateRepository {
    async fn load(&self) -> AlertState {
        self.state.lock().await.clone()
    }

    async fn save(&self, state: &AlertState) -> StoreResult<()> {
        *self.state.lock().await = state.clone();
        Ok(())
    }
}
