// models/src/medical/health_tip.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{Requirements, ValidationResult};
use crate::lenient;

closed_enum! {
    HealthTipCategory {
        Nutrition => "nutrition",
        Exercise => "exercise",
        MentalHealth => "mental-health",
        General => "general",
    } default General
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTip {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: HealthTipCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/health-tips`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthTip {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub category: Option<String>,
}

impl NewHealthTip {
    pub fn into_health_tip(self, now: DateTime<Utc>) -> ValidationResult<HealthTip> {
        let mut check = Requirements::new(HealthTip::ENTITY);
        let title = check.string("title", self.title);
        let content = check.string("content", self.content);
        check.finish()?;
        let category =
            HealthTipCategory::from_field(HealthTip::ENTITY, "category", self.category.as_deref())?;

        Ok(HealthTip {
            id: super::new_id(),
            title,
            content,
            category,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for HealthTip {
    const ENTITY: &'static str = "HealthTip";
    const COLLECTION: &'static str = "health_tips";

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
        check.check("title", &self.title);
        check.check("content", &self.content);
        check.finish()
    }
}
