// lib/src/services/appointment_service.rs

use std::collections::HashMap;

use chrono::Utc;
use log::{info, warn};
use models::{Appointment, Doctor, NewAppointment, PopulatedAppointment};
use serde_json::{Map, Value};

use super::{blocking, find, patch_document};
use crate::errors::{Result, ServiceError};
use crate::storage_engine::{Collection, SledDocumentStore};

pub struct AppointmentService {
    appointments: Collection<Appointment>,
    doctors: Collection<Doctor>,
}

impl AppointmentService {
    pub fn new(store: &SledDocumentStore) -> Result<Self> {
        Ok(Self {
            appointments: store.collection()?,
            doctors: store.collection()?,
        })
    }

    /// All appointments with their doctor resolved. Each referenced doctor is
    /// looked up once.
    pub async fn list(&self) -> Result<Vec<PopulatedAppointment>> {
        let appointments = self.appointments.clone();
        let doctors = self.doctors.clone();
        blocking(move || {
            let mut cache: HashMap<String, Option<Doctor>> = HashMap::new();
            let mut populated = Vec::new();
            for appointment in appointments.list()? {
                let doctor = match cache.get(&appointment.doctor) {
                    Some(cached) => cached.clone(),
                    None => {
                        let fetched = resolve(&doctors, &appointment)?;
                        cache.insert(appointment.doctor.clone(), fetched.clone());
                        fetched
                    }
                };
                populated.push(appointment.populate(doctor));
            }
            Ok(populated)
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<PopulatedAppointment> {
        let appointments = self.appointments.clone();
        let doctors = self.doctors.clone();
        let id = id.to_string();
        blocking(move || {
            let appointment = find(&appointments, &id)?;
            let doctor = resolve(&doctors, &appointment)?;
            Ok(appointment.populate(doctor))
        })
        .await
    }

    /// Stores the appointment as pending. The doctor id is not checked.
    pub async fn create(&self, new_appointment: NewAppointment) -> Result<Appointment> {
        let appointment = new_appointment.into_appointment(Utc::now())?;
        let appointments = self.appointments.clone();
        let appointment =
            blocking(move || appointments.insert(&appointment).map(|()| appointment)).await?;
        info!(
            "Created appointment {} with doctor {}",
            appointment.id, appointment.doctor
        );
        Ok(appointment)
    }

    /// Only `status` is applied; the result is returned unpopulated.
    pub async fn patch(&self, id: &str, body: &Map<String, Value>) -> Result<Appointment> {
        let appointments = self.appointments.clone();
        let key = id.to_string();
        let body = body.clone();
        let appointment = blocking(move || patch_document(&appointments, &key, &body)).await?;
        info!("Appointment {} is now {}", id, appointment.status);
        Ok(appointment)
    }

    pub async fn delete(&self, id: &str) -> Result<Appointment> {
        let appointments = self.appointments.clone();
        let key = id.to_string();
        let removed = blocking(move || appointments.remove(&key))
            .await?
            .ok_or(ServiceError::NotFound("Appointment"))?;
        info!("Deleted appointment {}", id);
        Ok(removed)
    }
}

fn resolve(doctors: &Collection<Doctor>, appointment: &Appointment) -> Result<Option<Doctor>> {
    let doctor = doctors.get(&appointment.doctor)?;
    if doctor.is_none() {
        warn!(
            "Appointment {} references missing doctor {}",
            appointment.id, appointment.doctor
        );
    }
    Ok(doctor)
}
