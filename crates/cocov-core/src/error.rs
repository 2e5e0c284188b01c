//! # Error Types
//!
//! Value-level errors raised while interpreting individual fields. They are
//! deliberately small: the binder wraps them into field errors that carry
//! the document path.

use serde_json::Value;
use thiserror::Error;

/// A `date_captured` value that is not a usable timestamp.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// The string matched none of the accepted timestamp layouts.
    #[error("unrecognized timestamp {input:?}; expected ISO-8601 date and time")]
    Unparseable {
        /// The rejected input.
        input: String,
    },

    /// A numeric Unix time outside the representable calendar range.
    #[error("unix time {value} is out of range")]
    OutOfRange {
        /// The rejected number.
        value: f64,
    },

    /// Neither a string nor a number.
    #[error("expected a timestamp string or number, got {received}")]
    WrongType {
        /// JSON type name of the rejected value.
        received: &'static str,
    },
}

/// A segmentation value that fits neither the polygon nor the run-length shape.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{pointer}: expected {expected}")]
pub struct SegmentationError {
    /// JSON pointer of the offending value, relative to the segmentation itself.
    pub pointer: String,
    /// Description of the shape that was expected at `pointer`.
    pub expected: &'static str,
    /// The offending value.
    pub received: Value,
}

impl SegmentationError {
    pub(crate) fn new(pointer: impl Into<String>, expected: &'static str, received: &Value) -> Self {
        Self {
            pointer: pointer.into(),
            expected,
            received: received.clone(),
        }
    }
}
