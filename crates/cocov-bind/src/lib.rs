//! # cocov-bind — Model Binding
//!
//! Second stage of the validation pipeline: turns a structurally valid
//! document into a typed [`cocov_core::Dataset`], enforcing the value rules
//! the structural schema cannot express.
//!
//! Failures are reported as a [`BindingError`] holding one [`FieldError`]
//! per offending field (JSON pointer, expected type, received value).
//! Binding is all-or-nothing.

pub mod binder;
pub mod error;

pub use binder::ModelBinder;
pub use error::{BindingError, FieldError, FieldErrors, Received};
