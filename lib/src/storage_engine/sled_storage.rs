// lib/src/storage_engine/sled_storage.rs

use std::fmt;

use log::info;
use models::Document;

use super::collection::Collection;
use super::config::StorageConfig;
use crate::errors::Result;

/// A sled database holding one tree per collection.
pub struct SledDocumentStore {
    db: sled::Db,
    config: StorageConfig,
}

impl fmt::Debug for SledDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SledDocumentStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SledDocumentStore {
    /// Opens the database. This blocks on disk I/O; async callers should go
    /// through [`crate::database::ConnectionManager`].
    pub fn open(config: &StorageConfig) -> Result<Self> {
        info!(
            "Opening {} document store at {:?}",
            config.engine_type, config.data_path
        );
        let db = config.open()?;
        info!("Document store ready, recovered: {}", db.was_recovered());
        Ok(Self {
            db,
            config: config.clone(),
        })
    }

    pub fn collection<D: Document>(&self) -> Result<Collection<D>> {
        Collection::open(&self.db)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Flushes dirty pages to disk, returning the number of bytes written.
    pub async fn flush(&self) -> Result<usize> {
        Ok(self.db.flush_async().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use chrono::{Duration, Utc};
    use models::{Doctor, NewDoctor, NewSymptom, Symptom};

    fn doctor(email: &str) -> Doctor {
        NewDoctor {
            name: Some("Dr. A".to_string()),
            specialty: Some("Cardiology".to_string()),
            experience: Some("10 years".to_string()),
            available: Some("Yes".to_string()),
            email: Some(email.to_string()),
            phone: Some("123".to_string()),
            qualifications: None,
        }
        .into_doctor(Utc::now())
        .unwrap()
    }

    #[test]
    fn unique_keys_are_enforced_and_released() {
        let store = SledDocumentStore::open(&StorageConfig::temporary()).unwrap();
        let doctors = store.collection::<Doctor>().unwrap();

        let first = doctor("a@x.com");
        doctors.insert(&first).unwrap();

        let clash = doctors.insert(&doctor("a@x.com")).unwrap_err();
        assert!(matches!(
            clash,
            ServiceError::Duplicate { entity: "Doctor", field: "email", .. }
        ));
        assert_eq!(doctors.list().unwrap().len(), 1);

        doctors.remove(&first.id).unwrap();
        doctors.insert(&doctor("a@x.com")).unwrap();
    }

    #[test]
    fn replace_moves_unique_keys() {
        let store = SledDocumentStore::open(&StorageConfig::temporary()).unwrap();
        let doctors = store.collection::<Doctor>().unwrap();

        let a = doctor("a@x.com");
        let b = doctor("b@x.com");
        doctors.insert(&a).unwrap();
        doctors.insert(&b).unwrap();

        let mut renamed = a.clone();
        renamed.email = "c@x.com".to_string();
        doctors.replace(&a, &renamed).unwrap();

        // a@x.com is free again, c@x.com is taken.
        doctors.insert(&doctor("a@x.com")).unwrap();
        assert!(doctors.insert(&doctor("c@x.com")).is_err());

        let mut stolen = b.clone();
        stolen.email = "c@x.com".to_string();
        assert!(matches!(
            doctors.replace(&b, &stolen),
            Err(ServiceError::Duplicate { .. })
        ));
        assert_eq!(doctors.get(&b.id).unwrap().unwrap().email, "b@x.com");
    }

    #[test]
    fn replace_after_remove_does_not_resurrect() {
        let store = SledDocumentStore::open(&StorageConfig::temporary()).unwrap();
        let doctors = store.collection::<Doctor>().unwrap();

        let original = doctor("a@x.com");
        doctors.insert(&original).unwrap();
        let mut rated = doctors.get(&original.id).unwrap().unwrap();
        rated.rating = 4.5;

        doctors.remove(&original.id).unwrap();
        assert!(matches!(
            doctors.replace(&original, &rated),
            Err(ServiceError::NotFound("Doctor"))
        ));
        assert_eq!(doctors.get(&original.id).unwrap(), None);

        doctors.insert(&doctor("a@x.com")).unwrap();
        let emails: Vec<_> = doctors.list().unwrap().into_iter().map(|d| d.email).collect();
        assert_eq!(emails, vec!["a@x.com"]);
    }

    #[test]
    fn stale_replace_is_a_conflict_and_frees_its_claims() {
        let store = SledDocumentStore::open(&StorageConfig::temporary()).unwrap();
        let doctors = store.collection::<Doctor>().unwrap();

        let original = doctor("a@x.com");
        doctors.insert(&original).unwrap();

        let mut first = original.clone();
        first.email = "b@x.com".to_string();
        doctors.replace(&original, &first).unwrap();

        let mut second = original.clone();
        second.email = "c@x.com".to_string();
        assert!(matches!(
            doctors.replace(&original, &second),
            Err(ServiceError::Conflict("Doctor"))
        ));

        assert_eq!(doctors.get(&original.id).unwrap().unwrap().email, "b@x.com");
        doctors.insert(&doctor("a@x.com")).unwrap();
        doctors.insert(&doctor("c@x.com")).unwrap();
        assert!(doctors.insert(&doctor("b@x.com")).is_err());
    }

    #[test]
    fn lists_in_creation_order() {
        let store = SledDocumentStore::open(&StorageConfig::temporary()).unwrap();
        let symptoms = store.collection::<Symptom>().unwrap();
        let now = Utc::now();

        for (offset, name) in [(2, "Cough"), (0, "Fever"), (1, "Rash")] {
            let symptom = NewSymptom {
                name: Some(name.to_string()),
                description: Some("d".to_string()),
                advice: Some("a".to_string()),
                severity: None,
            }
            .into_symptom(now + Duration::seconds(offset))
            .unwrap();
            symptoms.insert(&symptom).unwrap();
        }

        let names: Vec<_> = symptoms.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Fever", "Rash", "Cough"]);
    }

    #[tokio::test]
    async fn documents_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::sled(dir.path().join("consult"));
        let saved = doctor("persist@x.com");

        {
            let store = SledDocumentStore::open(&config).unwrap();
            store.collection::<Doctor>().unwrap().insert(&saved).unwrap();
            store.flush().await.unwrap();
        }

        let store = SledDocumentStore::open(&config).unwrap();
        let doctors = store.collection::<Doctor>().unwrap();
        assert_eq!(doctors.get(&saved.id).unwrap(), Some(saved));
        assert!(doctors.insert(&doctor("persist@x.com")).is_err());
    }
}
