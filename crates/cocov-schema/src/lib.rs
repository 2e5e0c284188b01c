//! # cocov-schema — Structural Validation
//!
//! First stage of the validation pipeline: checks that a parsed document has
//! the shape of a COCO dataset description (required keys, JSON primitive
//! types, nesting) before the binder looks at any value.
//!
//! ## Schema Generation (`codegen`)
//!
//! [`structure_schema`] derives a Draft 2020-12 JSON Schema from the field
//! descriptors in `cocov-core`. There is no hand-written schema file to
//! drift out of sync with the binder.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator::check`] compiles that schema once with the
//! `jsonschema` crate and reports every violation with its instance path,
//! schema path and message.
//!
//! ## Crate Policy
//!
//! - Depends only on `cocov-core` internally.
//! - Structure only: value semantics belong to `cocov-bind`.

pub mod codegen;
pub mod validate;

pub use codegen::{record_schema, structure_schema, SCHEMA_ID};
pub use validate::{SchemaLoadError, SchemaValidator, StructureError, Violation, Violations};
