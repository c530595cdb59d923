// models/src/document.rs

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{ValidationError, ValidationResult};

/// A record stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human readable entity name, used in messages ("Doctor not found").
    const ENTITY: &'static str;
    /// Name of the backing collection.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Refreshes the update timestamp.
    fn touch(&mut self, now: DateTime<Utc>);

    /// `(field, value)` pairs that must be unique across the collection.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Re-checks field requiredness on an already built document.
    fn validate(&self) -> ValidationResult<()>;
}

/// Result of overlaying a patch body onto a document.
#[derive(Debug, Clone)]
pub struct Patched<D> {
    pub document: D,
    /// Keys present in the body that are not in the allowlist.
    pub ignored: Vec<String>,
}

/// A document that accepts partial updates limited to an allowlist of keys.
pub trait Patchable: Document {
    const MUTABLE_FIELDS: &'static [&'static str];

    /// Normalises one allowlisted value before it is merged. `None` leaves
    /// the field unchanged; the default treats only null that way.
    fn patch_value(_field: &'static str, value: &Value) -> ValidationResult<Option<Value>> {
        Ok((!value.is_null()).then(|| value.clone()))
    }

    /// Overlays the allowlisted keys of `patch` onto a copy of `self`.
    ///
    /// Null values leave the field unchanged. Keys outside `MUTABLE_FIELDS`
    /// are reported in [`Patched::ignored`] and never written. The merged
    /// record is cast back into the schema and validated.
    fn apply_patch(&self, patch: &Map<String, Value>) -> ValidationResult<Patched<Self>> {
        let malformed = |reason: String| ValidationError::Malformed {
            entity: Self::ENTITY,
            reason,
        };

        let mut fields = match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(malformed("document is not an object".to_string())),
            Err(e) => return Err(malformed(e.to_string())),
        };

        let mut ignored = Vec::new();
        for (key, value) in patch {
            let Some(field) = Self::MUTABLE_FIELDS.iter().copied().find(|f| *f == key.as_str()) else {
                ignored.push(key.clone());
                continue;
            };
            if let Some(value) = Self::patch_value(field, value)? {
                fields.insert(key.clone(), value);
            }
        }

        let document: Self =
            serde_json::from_value(Value::Object(fields)).map_err(|e| malformed(e.to_string()))?;
        document.validate()?;

        Ok(Patched { document, ignored })
    }
}
