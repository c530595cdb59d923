// models/src/medical/symptom.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{Requirements, ValidationResult};
use crate::lenient;

closed_enum! {
    Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
    } default Low
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub advice: String,
    #[serde(default)]
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/symptoms`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptom {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub advice: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub severity: Option<String>,
}

impl NewSymptom {
    pub fn into_symptom(self, now: DateTime<Utc>) -> ValidationResult<Symptom> {
        let mut check = Requirements::new(Symptom::ENTITY);
        let name = check.string("name", self.name);
        let description = check.string("description", self.description);
        let advice = check.string("advice", self.advice);
        check.finish()?;
        let severity = Severity::from_field(Symptom::ENTITY, "severity", self.severity.as_deref())?;

        Ok(Symptom {
            id: super::new_id(),
            name,
            description,
            advice,
            severity,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for Symptom {
    const ENTITY: &'static str = "Symptom";
    const COLLECTION: &'static str = "symptoms";

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
        vec![("name", self.name.clone())]
    }

    fn validate(&self) -> ValidationResult<()> {
        let mut check = Requirements::new(Self::ENTITY);
        check.check("name", &self.name);
        check.check("description", &self.description);
        check.check("advice", &self.advice);
        check.finish()
    }
}
