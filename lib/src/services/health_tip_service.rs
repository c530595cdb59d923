// lib/src/services/health_tip_service.rs

use chrono::Utc;
use log::info;
use models::{HealthTip, NewHealthTip};

use super::{blocking, find};
use crate::errors::Result;
use crate::storage_engine::{Collection, SledDocumentStore};

pub struct HealthTipService {
    tips: Collection<HealthTip>,
}

impl HealthTipService {
    pub fn new(store: &SledDocumentStore) -> Result<Self> {
        Ok(Self {
            tips: store.collection()?,
        })
    }

    pub async fn list(&self) -> Result<Vec<HealthTip>> {
        let tips = self.tips.clone();
        blocking(move || tips.list()).await
    }

    pub async fn get(&self, id: &str) -> Result<HealthTip> {
        let tips = self.tips.clone();
        let id = id.to_string();
        blocking(move || find(&tips, &id)).await
    }

    pub async fn create(&self, new_tip: NewHealthTip) -> Result<HealthTip> {
        let tip = new_tip.into_health_tip(Utc::now())?;
        let tips = self.tips.clone();
        let tip = blocking(move || tips.insert(&tip).map(|()| tip)).await?;
        info!("Created health tip {} ({})", tip.id, tip.category);
        Ok(tip)
    }
}
