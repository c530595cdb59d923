// lib/src/services/mod.rs

//! One service per resource. Each wraps its collection(s) and applies
//! validation on write. Store access runs on the blocking pool so a slow
//! disk never stalls the request workers.

pub mod appointment_service;
pub mod doctor_service;
pub mod health_tip_service;
pub mod symptom_service;

pub use appointment_service::AppointmentService;
pub use doctor_service::DoctorService;
pub use health_tip_service::HealthTipService;
pub use symptom_service::SymptomService;

use chrono::Utc;
use log::{debug, warn};
use models::{Document, Patchable, Patched};
use serde_json::{Map, Value};

use crate::errors::{Result, ServiceError};
use crate::storage_engine::Collection;

const PATCH_ATTEMPTS: usize = 3;

/// Runs a store operation on tokio's blocking pool.
pub(crate) async fn blocking<T, F>(operation: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation).await?
}

pub(crate) fn find<D: Document>(collection: &Collection<D>, id: &str) -> Result<D> {
    collection.get(id)?.ok_or(ServiceError::NotFound(D::ENTITY))
}

/// Applies an allowlisted patch to the stored document and persists it.
///
/// The write is conditional on the document being unchanged since it was
/// read; a lost race is retried against the fresh copy.
pub(crate) fn patch_document<D: Patchable>(
    collection: &Collection<D>,
    id: &str,
    body: &Map<String, Value>,
) -> Result<D> {
    let mut attempt = 1;
    loop {
        let current = find(collection, id)?;
        let Patched { mut document, ignored } = current.apply_patch(body)?;
        if !ignored.is_empty() {
            debug!("Ignoring unrecognised {} fields: {}", D::ENTITY, ignored.join(", "));
        }
        document.touch(Utc::now());
        match collection.replace(&current, &document) {
            Err(ServiceError::Conflict(_)) if attempt < PATCH_ATTEMPTS => {
                warn!("{} {} changed during patch, retrying", D::ENTITY, id);
                attempt += 1;
            }
            result => return result.map(|()| document),
        }
    }
}
