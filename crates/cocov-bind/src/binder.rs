//! # Model Binding
//!
//! Second stage of the validation pipeline. Walks the field descriptors over
//! a document that already passed structural validation, collecting a
//! [`FieldError`] for every value the typed model cannot accept. Only when
//! the walk finds nothing are the typed records constructed.
//!
//! The checks made here and not by the structural schema:
//!
//! - integers must fit `i64` (`1.0` passes structure but not binding);
//! - `info` values must be strings;
//! - `date_captured` must be a [`CaptureTime`];
//! - `segmentation` must be a polygon list or a run-length mapping;
//! - `bbox` must have exactly four numbers;
//! - a field may not appear under two spellings at once.

use cocov_core::fields::{pointer_push, FieldKind, FieldSpec, RecordSpec, DATASET};
use cocov_core::{CaptureTime, Dataset, Segmentation};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BindingError, FieldError, FieldErrors, Received};

/// Binds parsed documents into [`Dataset`] values.
#[derive(Debug, Clone, Copy)]
pub struct ModelBinder {
    root: &'static RecordSpec,
}

impl Default for ModelBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBinder {
    pub fn new() -> Self {
        Self { root: &DATASET }
    }

    /// Bind `document` into a typed dataset.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError`] listing every field that could not be bound.
    /// No dataset is produced if any record fails.
    pub fn bind(&self, document: &Value) -> Result<Dataset, BindingError> {
        let errors = self.field_errors(document);
        if !errors.is_empty() {
            return Err(BindingError::new(errors));
        }
        Dataset::deserialize(document).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.push(FieldError::new(
                "",
                self.root.name,
                Received::Value(Value::String(e.to_string())),
            ));
            BindingError::new(errors)
        })
    }

    /// Every field error in `document`, without constructing anything.
    pub fn field_errors(&self, document: &Value) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_record(document, self.root, "", &mut errors);
        errors
    }
}

fn check_record(value: &Value, spec: &RecordSpec, path: &str, errors: &mut FieldErrors) {
    let Value::Object(map) = value else {
        errors.push(FieldError::new(
            path,
            format!("{} object", spec.name),
            Received::Value(value.clone()),
        ));
        return;
    };

    for field in spec.fields {
        let present: Vec<(&str, &Value)> = field
            .keys()
            .filter_map(|key| map.get(key).map(|v| (key, v)))
            .collect();

        match present.as_slice() {
            [] => {
                if field.is_required() {
                    errors.push(FieldError::new(
                        pointer_push(path, field.name),
                        field.kind.describe(),
                        Received::Missing,
                    ));
                }
            }
            [(key, value)] => check_field(field, value, &pointer_push(path, key), errors),
            several => errors.push(FieldError::new(
                pointer_push(path, field.name),
                format!("only one of {}", field.keys().collect::<Vec<_>>().join(", ")),
                Received::Conflict(several.iter().map(|(k, _)| k.to_string()).collect()),
            )),
        }
    }
}

fn check_field(field: &FieldSpec, value: &Value, path: &str, errors: &mut FieldErrors) {
    if value.is_null() {
        if field.is_required() {
            errors.push(FieldError::new(
                path,
                field.kind.describe(),
                Received::Value(Value::Null),
            ));
        }
        return;
    }
    check_kind(&field.kind, value, path, errors);
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, errors: &mut FieldErrors) {
    let mismatch = || FieldError::new(path, kind.describe(), Received::Value(value.clone()));

    match kind {
        FieldKind::Integer => {
            if value.as_i64().is_none() {
                errors.push(mismatch());
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                errors.push(mismatch());
            }
        }
        FieldKind::String => {
            if !value.is_string() {
                errors.push(mismatch());
            }
        }
        FieldKind::Timestamp => {
            if CaptureTime::from_value(value).is_err() {
                errors.push(mismatch());
            }
        }
        FieldKind::StringMap => match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    if !entry.is_string() {
                        errors.push(FieldError::new(
                            pointer_push(path, key),
                            "string",
                            Received::Value(entry.clone()),
                        ));
                    }
                }
            }
            _ => errors.push(mismatch()),
        },
        FieldKind::NumberArray { len } => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_number() {
                        errors.push(FieldError::new(
                            pointer_push(path, &i.to_string()),
                            "number",
                            Received::Value(item.clone()),
                        ));
                    }
                }
                if len.is_some_and(|n| n != items.len()) {
                    errors.push(mismatch());
                }
            }
            _ => errors.push(mismatch()),
        },
        FieldKind::Segmentation => {
            if let Err(e) = Segmentation::from_value(value) {
                errors.push(FieldError::new(
                    format!("{path}{}", e.pointer),
                    e.expected,
                    Received::Value(e.received),
                ));
            }
        }
        FieldKind::Records(spec) => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_record(item, spec, &pointer_push(path, &i.to_string()), errors);
                }
            }
            _ => errors.push(mismatch()),
        },
    }
}
