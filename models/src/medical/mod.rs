// models/src/medical/mod.rs

/// Declares a closed set of string values with a default member.
///
/// Generates the serde mapping, `VALUES` for error messages, and
/// `from_field`, which treats an absent or empty input as the default.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn from_field(
                entity: &'static str,
                field: &'static str,
                value: Option<&str>,
            ) -> $crate::errors::ValidationResult<Self> {
                match value {
                    None | Some("") => Ok(Self::default()),
                    Some(v) => Self::parse(v).ok_or_else(|| {
                        $crate::errors::ValidationError::InvalidEnumValue {
                            entity,
                            field,
                            value: v.to_string(),
                            allowed: Self::VALUES,
                        }
                    }),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod appointment;
pub mod doctor;
pub mod health_tip;
pub mod symptom;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment, PopulatedAppointment};
pub use doctor::{Doctor, NewDoctor};
pub use health_tip::{HealthTip, HealthTipCategory, NewHealthTip};
pub use symptom::{NewSymptom, Severity, Symptom};

/// Generates a fresh document id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
