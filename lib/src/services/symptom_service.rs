// lib/src/services/symptom_service.rs

use chrono::Utc;
use log::info;
use models::{NewSymptom, Symptom};

use super::{blocking, find};
use crate::errors::Result;
use crate::storage_engine::{Collection, SledDocumentStore};

pub struct SymptomService {
    symptoms: Collection<Symptom>,
}

impl SymptomService {
    pub fn new(store: &SledDocumentStore) -> Result<Self> {
        Ok(Self {
            symptoms: store.collection()?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Symptom>> {
        let symptoms = self.symptoms.clone();
        blocking(move || symptoms.list()).await
    }

    pub async fn get(&self, id: &str) -> Result<Symptom> {
        let symptoms = self.symptoms.clone();
        let id = id.to_string();
        blocking(move || find(&symptoms, &id)).await
    }

    pub async fn create(&self, new_symptom: NewSymptom) -> Result<Symptom> {
        let symptom = new_symptom.into_symptom(Utc::now())?;
        let symptoms = self.symptoms.clone();
        let symptom = blocking(move || symptoms.insert(&symptom).map(|()| symptom)).await?;
        info!("Created symptom {} ({})", symptom.id, symptom.name);
        Ok(symptom)
    }
}
