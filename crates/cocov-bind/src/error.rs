use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Longest rendering of a received value before it is elided.
const PREVIEW_CHARS: usize = 60;

/// What the binder found where a field was expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    /// The key was absent.
    Missing,
    /// More than one spelling of the same field was present.
    Conflict(Vec<String>),
    Value(Value),
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Conflict(keys) => write!(f, "keys {}", keys.join(" and ")),
            Self::Value(value) => {
                let text = value.to_string();
                if text.chars().count() <= PREVIEW_CHARS {
                    f.write_str(&text)
                } else {
                    let head: String = text.chars().take(PREVIEW_CHARS - 3).collect();
                    write!(f, "{head}...")
                }
            }
        }
    }
}

/// One field that could not be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// JSON Pointer to the field in the document.
    pub path: String,
    /// Description of the value the model expects.
    pub expected: String,
    pub received: Received,
}

impl FieldError {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, received: Received) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            received,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };
        write!(
            f,
            "  {at}: expected {}, received {}",
            self.expected, self.received
        )
    }
}

/// Ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// The document passed structural validation but could not be bound into
/// the typed model. Binding is all-or-nothing: no partial dataset exists.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("binding failed with {} field error(s):\n{errors}", .errors.len())]
pub struct BindingError {
    errors: FieldErrors,
}

impl BindingError {
    pub(crate) fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors.0
    }

    /// Paths of every failing field, in document order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}
