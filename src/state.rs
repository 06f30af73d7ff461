use crate::errors::StorageError;
use crate::models::HabitRecords;
use crate::storage::persist_records;
use crate::store::HabitStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info};

/// The store together with the outcome of the last save.
#[derive(Debug, Default)]
pub struct Tracker {
    pub store: HabitStore,
    pub storage_error: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, records: HabitRecords) -> Self {
        Self {
            data_dir,
            tracker: Arc::new(Mutex::new(Tracker {
                store: HabitStore::new(records),
                storage_error: None,
            })),
        }
    }
}

impl Tracker {
    /// Saves the full state. A failure is remembered for the view instead of
    /// failing the request; memory stays authoritative for the session.
    pub async fn save(&mut self, data_dir: &std::path::Path) {
        match persist_records(data_dir, self.store.records()).await {
            Ok(()) => {
                if self.storage_error.take().is_some() {
                    info!("storage available again");
                }
            }
            Err(err) => {
                error!("failed to persist records: {err}");
                self.storage_error = Some(describe(&err));
            }
        }
    }
}

fn describe(err: &StorageError) -> String {
    format!("Changes are kept for this session only. {err}")
}
