//! # Outcome Reporting
//!
//! The pipeline never logs outcomes directly. Each validation call hands
//! its outcome to a [`Reporter`]; the binary uses [`TracingReporter`], tests use
//! [`RecordingReporter`] and assert on what was reported.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cocov_core::{Dataset, DatasetSummary};

use crate::validate::{FailureKind, ValidationError};

/// Receives exactly one outcome per validation call.
///
/// `path` is the dataset file, or [`crate::MEMORY_SOURCE`] for in-memory input.
pub trait Reporter {
    fn validated(&self, path: &Path, dataset: &Dataset);
    fn failed(&self, path: &Path, error: &ValidationError);
}

/// Emits outcomes as `tracing` events: `info` on success, `error` on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn validated(&self, path: &Path, dataset: &Dataset) {
        let summary = dataset.summary();
        tracing::info!(
            path = %path.display(),
            images = summary.images,
            annotations = summary.annotations,
            categories = summary.categories,
            "dataset validated"
        );
    }

    fn failed(&self, path: &Path, error: &ValidationError) {
        let path = path.display();
        match error {
            ValidationError::NotFound { source, .. } => {
                tracing::error!(%path, error = %source, "dataset file not found");
            }
            ValidationError::Structure(e) => {
                let schema_path = e.first().map_or("", |v| v.schema_path.as_str());
                tracing::error!(
                    %path,
                    schema_path,
                    violations = %e.violations(),
                    "validation not completed due to structure error"
                );
            }
            ValidationError::Binding(e) => {
                tracing::error!(
                    %path,
                    count = e.errors().len(),
                    errors = %e.errors(),
                    "dataset binding failed"
                );
            }
            ValidationError::Internal { message, trace } => {
                tracing::error!(%path, %message, %trace, "internal error while validating dataset");
            }
        }
    }
}

/// A reported outcome, reduced to what tests compare on.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Validated(DatasetSummary),
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Keeps every reported outcome in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded reports.
    pub fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, path: &Path, outcome: Outcome) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Report {
                path: path.to_path_buf(),
                outcome,
            });
    }
}

impl Reporter for RecordingReporter {
    fn validated(&self, path: &Path, dataset: &Dataset) {
        self.record(path, Outcome::Validated(dataset.summary()));
    }

    fn failed(&self, path: &Path, error: &ValidationError) {
        self.record(
            path,
            Outcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        );
    }
}
