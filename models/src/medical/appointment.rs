// models/src/medical/appointment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::doctor::Doctor;
use crate::document::{Document, Patchable};
use crate::errors::{Requirements, ValidationResult};
use crate::lenient;

closed_enum! {
    /// Lifecycle of an appointment. Any value may follow any other.
    AppointmentStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    } default Pending
}

/// An appointment. `R` is the doctor reference: the bare doctor id as stored,
/// or the resolved record once populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment<R = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient_name: String,
    pub age: u32,
    pub phone: String,
    pub email: String,
    pub symptoms: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub doctor: R,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An appointment whose doctor reference has been resolved. `None` when the
/// referenced doctor no longer exists (or never did).
pub type PopulatedAppointment = Appointment<Option<Doctor>>;

impl Appointment {
    /// Replaces the stored doctor id with the resolved record.
    pub fn populate(self, doctor: Option<Doctor>) -> PopulatedAppointment {
        Appointment {
            id: self.id,
            patient_name: self.patient_name,
            age: self.age,
            phone: self.phone,
            email: self.email,
            symptoms: self.symptoms,
            date: self.date,
            time: self.time,
            doctor,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Body of `POST /api/appointments`. The doctor id is stored as given; its
/// existence is not checked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_integer")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub doctor_id: Option<String>,
}

impl NewAppointment {
    pub fn into_appointment(self, now: DateTime<Utc>) -> ValidationResult<Appointment> {
        let mut check = Requirements::new(<Appointment as Document>::ENTITY);
        let patient_name = check.string("patientName", self.patient_name);
        let age = check.value("age", self.age);
        let phone = check.string("phone", self.phone);
        let email = check.string("email", self.email);
        let symptoms = check.string("symptoms", self.symptoms);
        let date = check.value("date", self.date);
        let time = check.string("time", self.time);
        let doctor = check.string("doctorId", self.doctor_id);
        check.finish()?;

        Ok(Appointment {
            id: super::new_id(),
            patient_name,
            age,
            phone,
            email,
            symptoms,
            date,
            time,
            doctor,
            status: AppointmentStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for Appointment {
    const ENTITY: &'static str = "Appointment";
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn validate(&self) -> ValidationResult<()> {
        let mut check = Requirements::new(Self::ENTITY);
        check.check("patientName", &self.patient_name);
        check.check("phone", &self.phone);
        check.check("email", &self.email);
        check.check("symptoms", &self.symptoms);
        check.check("time", &self.time);
        check.check("doctor", &self.doctor);
        check.finish()
    }
}

impl Patchable for Appointment {
    const MUTABLE_FIELDS: &'static [&'static str] = &["status"];

    /// A blank status is treated as absent, as on create.
    fn patch_value(field: &'static str, value: &Value) -> ValidationResult<Option<Value>> {
        let text = match value {
            Value::Null => return Ok(None),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.is_empty() {
            return Ok(None);
        }
        let status = AppointmentStatus::from_field(Self::ENTITY, field, Some(&text))?;
        Ok(Some(Value::from(status.as_str())))
    }
}
