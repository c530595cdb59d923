// lib/src/database.rs

use std::sync::{Arc, Mutex, PoisonError};

use log::{error, info};
use tokio::sync::OnceCell;

use crate::errors::{Result, ServiceError};
use crate::storage_engine::{SledDocumentStore, StorageConfig};

/// Observable phase of the process-wide database connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    /// The last attempt failed; the next `acquire` retries.
    Failed(String),
}

/// Owns the single document store connection.
///
/// `acquire` is idempotent: concurrent callers share one connect attempt, and
/// once the store is ready every later call returns the same handle.
#[derive(Debug)]
pub struct ConnectionManager {
    config: StorageConfig,
    store: OnceCell<Arc<SledDocumentStore>>,
    state: Mutex<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
            state: Mutex::new(ConnectionState::Uninitialized),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub async fn acquire(&self) -> Result<Arc<SledDocumentStore>> {
        let store = self.store.get_or_try_init(|| self.connect()).await?;
        Ok(Arc::clone(store))
    }

    async fn connect(&self) -> Result<Arc<SledDocumentStore>> {
        self.set_state(ConnectionState::Connecting);
        info!("Connecting to {} document store", self.config.engine_type);

        let config = self.config.clone();
        let opened = tokio::task::spawn_blocking(move || SledDocumentStore::open(&config))
            .await
            .map_err(ServiceError::from)
            .and_then(|result| result);

        match opened {
            Ok(store) => {
                self.set_state(ConnectionState::Ready);
                info!("Document store connected");
                Ok(Arc::new(store))
            }
            Err(e) => {
                error!("Document store connection failed: {}", e);
                self.set_state(ConnectionState::Failed(e.to_string()));
                Err(ServiceError::Connection(e.to_string()))
            }
        }
    }

    /// Flushes the store if it was ever opened.
    pub async fn close(&self) -> Result<()> {
        if let Some(store) = self.store.get() {
            let bytes = store.flush().await?;
            info!("Flushed {} bytes to the document store", bytes);
        }
        Ok(())
    }
}
