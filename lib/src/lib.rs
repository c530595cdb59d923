// lib/src/lib.rs

pub mod database;
pub mod errors;
pub mod services;
pub mod storage_engine;

pub use database::{ConnectionManager, ConnectionState};
pub use errors::{Result, ServiceError};
pub use services::{AppointmentService, DoctorService, HealthTipService, SymptomService};
pub use storage_engine::{SledDocumentStore, StorageConfig, StorageEngineType};
