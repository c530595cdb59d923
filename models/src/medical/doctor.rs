// models/src/medical/doctor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Patchable};
use crate::errors::{Requirements, ValidationResult};
use crate::lenient;

/// A doctor as stored in the `doctors` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub specialty: String,
    #[serde(deserialize_with = "lenient::string")]
    pub experience: String,
    #[serde(deserialize_with = "lenient::string")]
    pub available: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub qualifications: Vec<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/doctors`. `rating` is not accepted on create.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub available: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string_list")]
    pub qualifications: Option<Vec<String>>,
}

impl NewDoctor {
    pub fn into_doctor(self, now: DateTime<Utc>) -> ValidationResult<Doctor> {
        let mut check = Requirements::new(Doctor::ENTITY);
        let name = check.string("name", self.name);
        let specialty = check.string("specialty", self.specialty);
        let experience = check.string("experience", self.experience);
        let available = check.string("available", self.available);
        let email = check.string("email", self.email);
        let phone = check.string("phone", self.phone);
        check.finish()?;

        Ok(Doctor {
            id: super::new_id(),
            name,
            specialty,
            experience,
            available,
            email,
            phone,
            qualifications: self.qualifications.unwrap_or_default(),
            rating: 0.0,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for Doctor {
    const ENTITY: &'static str = "Doctor";
    const COLLECTION: &'static str = "doctors";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }

    fn validate(&self) -> ValidationResult<()> {
        let mut check = Requirements::new(Self::ENTITY);
        check.check("name", &self.name);
        check.check("specialty", &self.specialty);
        check.check("experience", &self.experience);
        check.check("available", &self.available);
        check.check("email", &self.email);
        check.check("phone", &self.phone);
        check.finish()
    }
}

impl Patchable for Doctor {
    const MUTABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "specialty",
        "experience",
        "available",
        "email",
        "phone",
        "qualifications",
        "rating",
    ];
}
