//! # Structural Schema Generation
//!
//! Builds the JSON Schema (Draft 2020-12) for a COCO dataset document from
//! the field descriptors in [`cocov_core::fields`].
//!
//! The generated schema covers only *structure*: which keys are present and
//! the JSON type of each value. Value semantics (timestamps, segmentation
//! shape, bbox arity, integer range) are left to the binder, which walks the
//! same descriptors.
//!
//! Rules of the translation:
//!
//! 1. Every record is `"type": "object"` and permits unknown keys.
//! 2. A required field without aliases is listed in `required`.
//! 3. A required field with aliases becomes an `anyOf` of single-key
//!    `required` clauses, so any one spelling satisfies it.
//! 4. Optional fields additionally accept `null`.
//! 5. Aliases share the schema of their canonical key.

use cocov_core::fields::{FieldKind, FieldSpec, Presence, RecordSpec, DATASET};
use serde_json::{json, Map, Value};

/// `$id` of the generated dataset schema.
pub const SCHEMA_ID: &str = "https://schemas.cocov.dev/coco-dataset.schema.json";

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// The structural schema for a whole dataset document.
pub fn structure_schema() -> Value {
    let mut root = Map::new();
    root.insert("$schema".into(), json!(DRAFT_2020_12));
    root.insert("$id".into(), json!(SCHEMA_ID));
    root.insert("title".into(), json!("COCO dataset description"));
    if let Value::Object(record) = record_schema(&DATASET) {
        root.extend(record);
    }
    Value::Object(root)
}

/// The structural schema for a single record type.
pub fn record_schema(spec: &RecordSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut alternatives = Vec::new();

    for field in spec.fields {
        let schema = field_schema(field);
        for key in field.keys() {
            properties.insert(key.to_string(), schema.clone());
        }
        if !field.is_required() {
            continue;
        }
        if field.aliases.is_empty() {
            required.push(json!(field.name));
        } else {
            let any_of: Vec<Value> = field.keys().map(|k| json!({ "required": [k] })).collect();
            alternatives.push(json!({ "anyOf": any_of }));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("required".into(), Value::Array(required));
    if !alternatives.is_empty() {
        schema.insert("allOf".into(), Value::Array(alternatives));
    }
    Value::Object(schema)
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = kind_schema(&field.kind);
    if field.presence == Presence::Optional {
        allow_null(&mut schema);
    }
    schema
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Integer => json!({ "type": "integer" }),
        FieldKind::Number => json!({ "type": "number" }),
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Timestamp => json!({ "type": ["string", "number"] }),
        FieldKind::StringMap => json!({ "type": "object" }),
        FieldKind::NumberArray { .. } => json!({ "type": "array", "items": { "type": "number" } }),
        FieldKind::Segmentation => json!({ "type": ["array", "object"] }),
        FieldKind::Records(spec) => json!({ "type": "array", "items": record_schema(spec) }),
    }
}

fn allow_null(schema: &mut Value) {
    let types = match schema.get("type") {
        Some(Value::String(t)) => vec![json!(t), json!("null")],
        Some(Value::Array(ts)) => ts.iter().cloned().chain([json!("null")]).collect(),
        _ => return,
    };
    schema["type"] = Value::Array(types);
}
