//! Nested-key-aware JSON (de)serialization driven by key-spec tables.
//!
//! [`JsonSerializer`] walks a model's key specs, resolving each field's
//! handler through the registry and placing values at their (possibly
//! nested) keys. A key containing the reserved [`KEY_SEPARATOR`] descends
//! one object level per segment.
//!
//! Recoverable per-field failures (conversion errors on optional fields,
//! explicit nulls) are logged and accumulated as [`FieldIssue`] diagnostics
//! on the serializer rather than silently dropped; fatal failures (handler
//! lookup, required-field conversion, missing required keys, malformed
//! document shape) abort the operation.

use std::marker::PhantomData;

use serde_json::{Map, Value as JsonValue};

use crate::error::DockError;
use crate::handler::registry;
use crate::model::{FieldSpec, JsonMapped};

/// Reserved separator encoding one level of object nesting per segment.
pub const KEY_SEPARATOR: &str = "->";

/// Recoverable per-field diagnostic: the field was skipped, the operation
/// carried on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub key: String,
    pub note: String,
}

/// Converts between model instances and JSON objects.
///
/// Single-call, single-thread use: the instance accumulates diagnostics for
/// the operations run through it.
pub struct JsonSerializer<M: JsonMapped> {
    issues: Vec<FieldIssue>,
    _model: PhantomData<M>,
}

impl<M: JsonMapped + 'static> Default for JsonSerializer<M> {
    fn default() -> Self {
        JsonSerializer::new()
    }
}

impl<M: JsonMapped + 'static> JsonSerializer<M> {
    #[must_use]
    pub fn new() -> Self {
        JsonSerializer {
            issues: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Convert a model instance to a JSON object.
    ///
    /// Null field values are written as explicit JSON nulls, not omitted.
    pub fn serialize(&mut self, item: &M) -> Result<JsonValue, DockError> {
        let mut obj = Map::new();
        for spec in M::key_specs() {
            self.put_field(&mut obj, spec, spec.attr.name, item)?;
        }
        Ok(JsonValue::Object(obj))
    }

    /// Convert a JSON object to a model instance, starting from
    /// `M::default()`.
    pub fn deserialize(&mut self, obj: &JsonValue) -> Result<M, DockError> {
        let map = obj
            .as_object()
            .ok_or_else(|| DockError::Document("expected a JSON object".to_string()))?;
        let mut model = M::default();
        for spec in M::key_specs() {
            self.read_field(&mut model, spec, map, spec.attr.name)?;
        }
        Ok(model)
    }

    /// Serialize a slice element-wise into a JSON array. A single element's
    /// failure aborts the whole operation.
    pub fn serialize_all(&mut self, items: &[M]) -> Result<JsonValue, DockError> {
        let mut arr = Vec::with_capacity(items.len());
        for item in items {
            arr.push(self.serialize(item)?);
        }
        Ok(JsonValue::Array(arr))
    }

    /// Deserialize a JSON array element-wise. A single element's failure
    /// aborts the whole operation.
    pub fn deserialize_all(&mut self, arr: &JsonValue) -> Result<Vec<M>, DockError> {
        let items = arr
            .as_array()
            .ok_or_else(|| DockError::Document("expected a JSON array".to_string()))?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(self.deserialize(item)?);
        }
        Ok(out)
    }

    /// Diagnostics accumulated by operations run through this serializer.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Drain the accumulated diagnostics.
    pub fn take_issues(&mut self) -> Vec<FieldIssue> {
        std::mem::take(&mut self.issues)
    }

    fn put_field(
        &mut self,
        obj: &mut Map<String, JsonValue>,
        spec: &FieldSpec<M>,
        key: &str,
        item: &M,
    ) -> Result<(), DockError> {
        if let Some((head, rest)) = key.split_once(KEY_SEPARATOR) {
            let entry = obj
                .entry(head.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if entry.is_null() {
                *entry = JsonValue::Object(Map::new());
            }
            let sub = match entry {
                JsonValue::Object(map) => map,
                _ => {
                    return Err(DockError::Document(format!(
                        "cannot nest under non-object key '{}'",
                        head
                    )))
                }
            };
            return self.put_field(sub, spec, rest, item);
        }

        match (spec.get)(item) {
            None => {
                obj.insert(key.to_string(), JsonValue::Null);
                Ok(())
            }
            Some(value) => {
                let handler = registry().handler_or_err(spec.kind)?;
                match handler.to_json(spec.kind, spec.elem, &value) {
                    Ok(json) => {
                        obj.insert(key.to_string(), json);
                        Ok(())
                    }
                    Err(err) => self.recover_or_escalate(spec, err),
                }
            }
        }
    }

    fn read_field(
        &mut self,
        model: &mut M,
        spec: &FieldSpec<M>,
        obj: &Map<String, JsonValue>,
        key: &str,
    ) -> Result<(), DockError> {
        if let Some((head, rest)) = key.split_once(KEY_SEPARATOR) {
            return match obj.get(head) {
                Some(JsonValue::Object(sub)) => self.read_field(model, spec, sub, rest),
                Some(JsonValue::Null) | None => self.missing(spec),
                Some(_) => Err(DockError::Document(format!(
                    "cannot descend into non-object key '{}'",
                    head
                ))),
            };
        }

        match obj.get(key) {
            None => self.missing(spec),
            Some(JsonValue::Null) => {
                log::info!("Received null '{}', skipping.", spec.attr.name);
                self.issues.push(FieldIssue {
                    key: spec.attr.name.to_string(),
                    note: "explicit null, field left at default".to_string(),
                });
                Ok(())
            }
            Some(json) => {
                let handler = registry().handler_or_err(spec.kind)?;
                let result = handler
                    .from_json(spec.kind, spec.elem, json)
                    .and_then(|value| (spec.set)(model, value));
                match result {
                    Ok(()) => Ok(()),
                    Err(err) => self.recover_or_escalate(spec, err),
                }
            }
        }
    }

    /// Absent key (or absent/null ancestor): an error for required fields,
    /// a silent skip otherwise.
    fn missing(&self, spec: &FieldSpec<M>) -> Result<(), DockError> {
        if spec.attr.required {
            Err(DockError::RequiredKeyMissing(spec.attr.name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Conversion failures recover on optional fields and escalate on
    /// required ones. Handler lookup failures always escalate.
    fn recover_or_escalate(
        &mut self,
        spec: &FieldSpec<M>,
        err: DockError,
    ) -> Result<(), DockError> {
        if matches!(err, DockError::NoHandler(_)) {
            return Err(err);
        }
        if spec.attr.required {
            return Err(match err {
                DockError::Conversion { message, .. } => DockError::Conversion {
                    key: spec.attr.name.to_string(),
                    message,
                },
                other => other,
            });
        }
        log::warn!("Failed to convert '{}': {}.", spec.attr.name, err);
        self.issues.push(FieldIssue {
            key: spec.attr.name.to_string(),
            note: err.to_string(),
        });
        Ok(())
    }
}
