//! # cocov-core — Foundational Types for cocov
//!
//! Defines the typed COCO dataset model and the static field descriptors
//! that both validation layers are derived from. Every other `cocov-*`
//! crate depends on this one; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One field table.** [`fields`] describes every record once. The
//!    structural JSON Schema (`cocov-schema`) and the model binder
//!    (`cocov-bind`) both walk the same [`RecordSpec`]s, so the two layers
//!    cannot disagree about which fields exist or which are required.
//!
//! 2. **Shape-tagged segmentation.** [`Segmentation`] is decided by looking
//!    at the parsed value (array vs object), never by declaration.
//!
//! 3. **UTC capture times.** [`CaptureTime`] accepts the timestamp forms
//!    found in real COCO exports and normalizes offsets to UTC.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cocov-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Dataset types are read-only values: they derive `Debug`, `Clone`,
//!   `PartialEq` and implement `Serialize`/`Deserialize`.

pub mod dataset;
pub mod error;
pub mod fields;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use dataset::{
    Annotation, BoundingBox, Category, Dataset, DatasetSummary, Image, License, Segmentation,
    SegmentationShape,
};
pub use error::{SegmentationError, TimestampError};
pub use fields::{
    json_type, pointer_push, FieldKind, FieldSpec, Presence, RecordSpec, ANNOTATION, CATEGORY,
    DATASET, IMAGE, LICENSE,
};
pub use temporal::CaptureTime;
