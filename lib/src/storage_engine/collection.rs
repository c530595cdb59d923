// lib/src/storage_engine/collection.rs

use std::marker::PhantomData;

use log::{debug, warn};
use models::Document;
use sled::Tree;

use crate::errors::{Result, ServiceError};

/// Documents of one type, keyed by id, stored as JSON in their own sled tree.
///
/// Unique fields are enforced through a companion index tree mapping
/// `field\0value` to the owning document id. Index entries are claimed with
/// compare-and-swap, so concurrent writers cannot both win the same value.
pub struct Collection<D: Document> {
    documents: Tree,
    unique_index: Tree,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            unique_index: self.unique_index.clone(),
            _marker: PhantomData,
        }
    }
}

fn index_key(field: &str, value: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(field.len() + value.len() + 1);
    key.extend_from_slice(field.as_bytes());
    key.push(0);
    key.extend_from_slice(value.as_bytes());
    key
}

impl<D: Document> Collection<D> {
    pub(crate) fn open(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            documents: db.open_tree(D::COLLECTION)?,
            unique_index: db.open_tree(format!("{}.unique", D::COLLECTION))?,
            _marker: PhantomData,
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<D>> {
        match self.documents.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All documents in creation order.
    pub fn list(&self) -> Result<Vec<D>> {
        let mut documents = self
            .documents
            .iter()
            .values()
            .map(|item| -> Result<D> { Ok(serde_json::from_slice(&item?)?) })
            .collect::<Result<Vec<D>>>()?;
        documents.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(documents)
    }

    pub fn insert(&self, document: &D) -> Result<()> {
        let id = document.id();
        let claimed = self.claim(id, &document.unique_keys())?;
        if let Err(e) = self.write(document) {
            self.release(id, &claimed);
            return Err(e);
        }
        debug!("Inserted {} {}", D::ENTITY, id);
        Ok(())
    }

    /// Overwrites `previous` with `next`, moving any changed unique keys.
    ///
    /// The write only lands if the stored document still equals `previous`.
    /// Fails with [`ServiceError::NotFound`] when it was removed meanwhile and
    /// [`ServiceError::Conflict`] when another writer replaced it first.
    pub fn replace(&self, previous: &D, next: &D) -> Result<()> {
        let id = next.id();
        let old_keys = previous.unique_keys();
        let new_keys = next.unique_keys();

        let added: Vec<_> = new_keys.iter().filter(|k| !old_keys.contains(*k)).cloned().collect();
        let dropped: Vec<_> = old_keys.iter().filter(|k| !new_keys.contains(*k)).cloned().collect();

        let claimed = self.claim(id, &added)?;
        if let Err(e) = self.swap(previous, next) {
            self.release(id, &claimed);
            return Err(e);
        }
        self.release(id, &dropped);
        debug!("Replaced {} {}", D::ENTITY, id);
        Ok(())
    }

    /// Removes a document and frees its unique keys. `None` if it was absent.
    pub fn remove(&self, id: &str) -> Result<Option<D>> {
        let Some(bytes) = self.documents.remove(id.as_bytes())? else {
            return Ok(None);
        };
        let document: D = serde_json::from_slice(&bytes)?;
        self.release(id, &document.unique_keys());
        debug!("Removed {} {}", D::ENTITY, id);
        Ok(Some(document))
    }

    fn write(&self, document: &D) -> Result<()> {
        let bytes = serde_json::to_vec(document)?;
        self.documents.insert(document.id().as_bytes(), bytes)?;
        Ok(())
    }

    /// Stored bytes are always `serde_json::to_vec` of the document, so
    /// re-encoding `previous` reproduces what a reader saw.
    fn swap(&self, previous: &D, next: &D) -> Result<()> {
        let expected = serde_json::to_vec(previous)?;
        let bytes = serde_json::to_vec(next)?;
        match self
            .documents
            .compare_and_swap(next.id().as_bytes(), Some(expected), Some(bytes))?
        {
            Ok(()) => Ok(()),
            Err(conflict) if conflict.current.is_none() => Err(ServiceError::NotFound(D::ENTITY)),
            Err(_) => Err(ServiceError::Conflict(D::ENTITY)),
        }
    }

    /// Claims every key for `id`, or none of them.
    fn claim(&self, id: &str, keys: &[(&'static str, String)]) -> Result<Vec<(&'static str, String)>> {
        let mut claimed = Vec::with_capacity(keys.len());
        for (field, value) in keys {
            let key = index_key(field, value);
            let swap = self
                .unique_index
                .compare_and_swap(&key, None::<&[u8]>, Some(id.as_bytes()));
            match swap {
                Ok(Ok(())) => claimed.push((*field, value.clone())),
                Ok(Err(conflict)) if conflict.current.as_deref() == Some(id.as_bytes()) => {}
                Ok(Err(_)) => {
                    self.release(id, &claimed);
                    return Err(ServiceError::Duplicate {
                        entity: D::ENTITY,
                        field: *field,
                        value: value.clone(),
                    });
                }
                Err(e) => {
                    self.release(id, &claimed);
                    return Err(e.into());
                }
            }
        }
        Ok(claimed)
    }

    /// Frees keys still owned by `id`. Keys owned by another document are left alone.
    fn release(&self, id: &str, keys: &[(&'static str, String)]) {
        for (field, value) in keys {
            let key = index_key(field, value);
            if let Err(e) = self
                .unique_index
                .compare_and_swap(&key, Some(id.as_bytes()), None::<&[u8]>)
            {
                warn!("Failed to release {}.{} index entry for {}: {}", D::COLLECTION, field, id, e);
            }
        }
    }
}
