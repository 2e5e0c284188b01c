//! # Structural Validation
//!
//! Checks a parsed dataset document against the structural schema before
//! any binding is attempted. This is a fail-fast gate: a document with a
//! missing collection or a mistyped key never reaches the binder.
//!
//! Every violation is collected, not just the first, and each carries the
//! instance path, the schema path and a human-readable message.

use std::fmt;
use std::path::Path;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::codegen::structure_schema;

/// The structural schema could not be turned into a validator.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// A schema file could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    Load {
        /// Path of the schema file.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema is not a valid Draft 2020-12 schema.
    #[error("validator build error: {reason}")]
    Build {
        /// Reason reported by the schema compiler.
        reason: String,
    },
}

/// The document does not have the shape of a dataset description.
#[derive(Error, Debug, Clone)]
#[error("structure check failed with {} violation(s):\n{violations}", .violations.len())]
pub struct StructureError {
    violations: Violations,
}

impl StructureError {
    /// The first violation in document order.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.as_slice().first()
    }

    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations.0
    }
}

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the document.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "  {at}: {} (schema {})", self.message, self.schema_path)
    }
}

/// Ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compiled structural checker for dataset documents.
///
/// Compilation happens once at construction. `SchemaValidator` is
/// `Send + Sync` and can be shared by concurrent validations.
pub struct SchemaValidator {
    schema: Value,
    compiled: Validator,
}

impl SchemaValidator {
    /// Compile the schema generated from the shared field descriptors.
    pub fn new() -> Result<Self, SchemaLoadError> {
        Self::with_schema(structure_schema())
    }

    /// Compile a caller-supplied schema in place of the generated one.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError::Build`] if `schema` is not a valid
    /// Draft 2020-12 schema.
    pub fn with_schema(schema: Value) -> Result<Self, SchemaLoadError> {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);
        let compiled = opts
            .build(&schema)
            .map_err(|e| SchemaLoadError::Build {
                reason: e.to_string(),
            })?;
        Ok(Self { schema, compiled })
    }

    /// Load and compile a schema from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaLoadError::Load {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| SchemaLoadError::Load {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::with_schema(schema)
    }

    /// The schema this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check `document` against the structural schema.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError`] listing every violation when the document
    /// does not conform.
    pub fn check(&self, document: &Value) -> Result<(), StructureError> {
        let violations: Vec<Violation> = self
            .compiled
            .iter_errors(document)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StructureError {
                violations: Violations(violations),
            })
        }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("id", &self.schema.get("$id"))
            .finish_non_exhaustive()
    }
}
