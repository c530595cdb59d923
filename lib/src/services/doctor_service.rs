// lib/src/services/doctor_service.rs

use chrono::Utc;
use log::info;
use models::{Doctor, NewDoctor};
use serde_json::{Map, Value};

use super::{blocking, find, patch_document};
use crate::errors::{Result, ServiceError};
use crate::storage_engine::{Collection, SledDocumentStore};

pub struct DoctorService {
    doctors: Collection<Doctor>,
}

impl DoctorService {
    pub fn new(store: &SledDocumentStore) -> Result<Self> {
        Ok(Self {
            doctors: store.collection()?,
        })
    }

    pub async fn list(&self) -> Result<Vec<Doctor>> {
        let doctors = self.doctors.clone();
        blocking(move || doctors.list()).await
    }

    pub async fn get(&self, id: &str) -> Result<Doctor> {
        let doctors = self.doctors.clone();
        let id = id.to_string();
        blocking(move || find(&doctors, &id)).await
    }

    /// Fails with [`ServiceError::Duplicate`] when the email is taken.
    pub async fn create(&self, new_doctor: NewDoctor) -> Result<Doctor> {
        let doctor = new_doctor.into_doctor(Utc::now())?;
        let doctors = self.doctors.clone();
        let doctor = blocking(move || doctors.insert(&doctor).map(|()| doctor)).await?;
        info!("Created doctor {} ({})", doctor.id, doctor.email);
        Ok(doctor)
    }

    /// Merges the allowlisted fields of `body` onto the stored doctor.
    pub async fn patch(&self, id: &str, body: &Map<String, Value>) -> Result<Doctor> {
        let doctors = self.doctors.clone();
        let id = id.to_string();
        let body = body.clone();
        blocking(move || patch_document(&doctors, &id, &body)).await
    }

    /// Appointments referencing the doctor are left untouched.
    pub async fn delete(&self, id: &str) -> Result<Doctor> {
        let doctors = self.doctors.clone();
        let key = id.to_string();
        let removed = blocking(move || doctors.remove(&key))
            .await?
            .ok_or(ServiceError::NotFound("Doctor"))?;
        info!("Deleted doctor {}", id);
        Ok(removed)
    }
}
