// models/src/lib.rs

pub mod document;
pub mod errors;
pub mod lenient;
pub mod medical;

pub use document::{Document, Patchable, Patched};
pub use errors::{ValidationError, ValidationResult};
pub use medical::{
    Appointment, AppointmentStatus, Doctor, HealthTip, HealthTipCategory, NewAppointment,
    NewDoctor, NewHealthTip, NewSymptom, PopulatedAppointment, Severity, Symptom,
};
