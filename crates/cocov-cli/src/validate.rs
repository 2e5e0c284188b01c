//! # Validation Pipeline
//!
//! Drives one dataset description file through every stage:
//!
//! 1. read the file (failure: [`ValidationError::NotFound`]),
//! 2. parse it as JSON (failure: [`ValidationError::Internal`]),
//! 3. check its structure (failure: [`ValidationError::Structure`]),
//! 4. bind it into a [`Dataset`] (failure: [`ValidationError::Binding`]).
//!
//! Whatever happens, the [`Validator`] reports exactly one outcome per call
//! and returns control to the caller. Panics raised inside the pipeline are
//! caught and reported as internal errors.
//!
//! The `validate` subcommand lives here too; it returns exit code 0 when
//! every file validated, 1 when any file was rejected, and 2 on internal
//! errors.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use thiserror::Error;

use cocov_bind::{BindingError, ModelBinder};
use cocov_core::Dataset;
use cocov_schema::{SchemaLoadError, SchemaValidator, StructureError};

use crate::report::{Reporter, TracingReporter};

/// Category of a failed validation, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    Structure,
    Binding,
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::Structure => "StructureError",
            Self::Binding => "BindingError",
            Self::Internal => "InternalError",
        }
    }

    /// Process exit code contributed by a failure of this kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Internal => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a dataset file was rejected.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The file does not exist or could not be read.
    #[error("file '{}' not found or unreadable: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Anything else: malformed JSON, invalid UTF-8, or a panic in the pipeline.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        /// Full error chain, for diagnostics.
        trace: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Structure(_) => FailureKind::Structure,
            Self::Binding(_) => FailureKind::Binding,
            Self::Internal { .. } => FailureKind::Internal,
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        Self::Internal {
            message: format!("{err:#}"),
            trace: format!("{err:?}"),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::internal(anyhow::anyhow!("panic during validation: {detail}"))
    }
}

/// Source label reported for in-memory documents.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Runs the two-stage pipeline and reports each outcome.
pub struct Validator<R = TracingReporter> {
    schema: SchemaValidator,
    binder: ModelBinder,
    reporter: R,
}

impl Validator<TracingReporter> {
    /// Validator over the built-in structural schema, reporting through `tracing`.
    pub fn new() -> Result<Self, SchemaLoadError> {
        Self::with_reporter(TracingReporter)
    }
}

impl<R: Reporter> Validator<R> {
    pub fn with_reporter(reporter: R) -> Result<Self, SchemaLoadError> {
        Ok(Self::from_parts(SchemaValidator::new()?, reporter))
    }

    pub fn from_parts(schema: SchemaValidator, reporter: R) -> Self {
        Self {
            schema,
            binder: ModelBinder::new(),
            reporter,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Validate the file at `path`, returning the dataset only on full success.
    pub fn validate(&self, path: &Path) -> Option<Dataset> {
        self.try_validate(path).ok()
    }

    /// Validate the file at `path`.
    pub fn try_validate(&self, path: &Path) -> Result<Dataset, ValidationError> {
        self.report(path, || {
            tracing::debug!(path = %path.display(), "reading dataset file");
            let bytes = std::fs::read(path).map_err(|source| ValidationError::NotFound {
                path: path.to_path_buf(),
                source,
            })?;
            self.parse_and_check(&bytes)
        })
    }

    /// Validate an in-memory document, reported under [`MEMORY_SOURCE`].
    pub fn validate_bytes(&self, bytes: &[u8]) -> Result<Dataset, ValidationError> {
        self.report(Path::new(MEMORY_SOURCE), || self.parse_and_check(bytes))
    }

    /// Validate an already parsed document, reported under [`MEMORY_SOURCE`].
    pub fn validate_document(&self, document: &Value) -> Result<Dataset, ValidationError> {
        self.report(Path::new(MEMORY_SOURCE), || self.check_and_bind(document))
    }

    /// Run `stage` with panics caught, then report its outcome exactly once.
    fn report<F>(&self, source: &Path, stage: F) -> Result<Dataset, ValidationError>
    where
        F: FnOnce() -> Result<Dataset, ValidationError>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(stage))
            .unwrap_or_else(|payload| Err(ValidationError::from_panic(payload)));
        match &outcome {
            Ok(dataset) => self.reporter.validated(source, dataset),
            Err(e) => self.reporter.failed(source, e),
        }
        outcome
    }

    fn parse_and_check(&self, bytes: &[u8]) -> Result<Dataset, ValidationError> {
        let document: Value = serde_json::from_slice(bytes)
            .context("dataset file is not valid UTF-8 JSON")
            .map_err(ValidationError::internal)?;
        tracing::debug!("document parsed");
        self.check_and_bind(&document)
    }

    fn check_and_bind(&self, document: &Value) -> Result<Dataset, ValidationError> {
        self.schema.check(document)?;
        tracing::debug!("structure check passed");
        let dataset = self.binder.bind(document)?;
        tracing::debug!("binding complete");
        Ok(dataset)
    }
}

/// Arguments for the `cocov validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dataset description files to validate.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Check structure against this JSON Schema file instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every file validated, 1 when any file was
/// rejected, 2 when any file hit an internal error.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = match &args.schema {
        Some(path) => SchemaValidator::from_file(path),
        None => SchemaValidator::new(),
    }
    .context("failed to load structural schema")?;

    let validator = Validator::from_parts(schema, TracingReporter);
    let mut code = 0u8;

    for path in &args.paths {
        match validator.try_validate(path) {
            Ok(dataset) => println!("OK: {} ({})", path.display(), dataset.summary()),
            Err(e) => {
                println!("FAIL: {} [{}]", path.display(), e.kind());
                code = code.max(e.kind().exit_code());
            }
        }
    }

    Ok(code)
}
