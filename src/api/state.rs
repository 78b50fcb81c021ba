use std::sync::Arc;

use crate::storage::StorageConfig;

/// Shared state for API handlers.
///
/// Reads go straight to the JSONL files per request. Mutations are
/// read-modify-write cycles, serialized through `write_guard` so they
/// never interleave.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub write_guard: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            write_guard: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
