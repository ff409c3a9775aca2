use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while reading and parsing table dumps.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpError {
    #[error("input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },
    #[error("malformed statement #{index}: {reason}")]
    MalformedStatement { index: usize, reason: String },
    #[error("schema mismatch: expected {expected} fields, found {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
}

impl DumpError {
    /// Row- and statement-level errors the parser may skip under `RecoveryPolicy::Skip`.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DumpError::MissingInputFile { .. })
    }
}
