//! # cocov-cli — Validation Pipeline and CLI
//!
//! Ties the two validation stages together. The [`Validator`] reads a dataset
//! description file, checks it against the structural schema from
//! `cocov-schema`, binds it with `cocov-bind`, and hands the outcome to a
//! [`Reporter`].
//!
//! ## Subcommands
//!
//! - `validate`: validate one or more dataset files.
//! - `schema`: print the generated structural schema.
//!
//! ## Crate Policy
//!
//! - No outcome is ever raised past the [`Validator`]. Every validation
//!   call produces exactly one report.
//! - Logging goes through `tracing` only; the binary decides where it ends up.

pub mod report;
pub mod schema;
pub mod validate;

pub use report::{Outcome, RecordingReporter, Report, Reporter, TracingReporter};
pub use validate::{FailureKind, ValidationError, Validator, MEMORY_SOURCE};
