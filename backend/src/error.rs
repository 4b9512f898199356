//! Error types for the mud-log conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`InputError`] - Reading curve matrices and lookup tables
//! - [`ConfigError`] - Run configuration problems
//! - [`WriteError`] - Persisting a single output file
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Numeric problems (division by zero, null operands, NaN) are never errors:
//! they are recovered in place with the null sentinel.

use thiserror::Error;

use crate::models::{FileKind, Resolution};

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading a decoded curve matrix or a lookup table.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the file contents.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Empty file.
    #[error("Input file is empty")]
    EmptyFile,

    /// No curve names found.
    #[error("No curve names found in header line")]
    NoHeaders,

    /// A data cell could not be read as a number.
    #[error("Line {line}, column '{column}': '{value}' is not a number")]
    NonNumeric {
        line: usize,
        column: String,
        value: String,
    },

    /// A data row has a different width than the header.
    #[error("Line {line}: expected {expected} values, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The lookup table is not exactly two numeric columns.
    #[error("Lookup table must contain exactly two numeric columns: {0}")]
    LookupShape(String),

    /// CSV reader error (lookup tables).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A value is present but unusable.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors persisting one output file. Reported per file, never fatal.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create the target directory.
    #[error("failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the file.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// Returned by [`crate::transform::pipeline::run_pipeline`]. Any of these
/// aborts the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input reading error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Nothing was requested.
    #[error("No output files requested")]
    NoTargets,

    /// No matrix is available for a requested resolution.
    #[error("No source data available for the {0} resolution")]
    MissingSource(Resolution),

    /// A file kind was requested without an output directory.
    #[error("No output directory given for {0} files")]
    MissingDirectory(FileKind),

    /// The background task died.
    #[error("Pipeline task failed: {0}")]
    Task(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for file writes.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // InputError -> PipelineError
        let input_err = InputError::EmptyFile;
        let pipeline_err: PipelineError = input_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // ConfigError -> PipelineError
        let config_err = ConfigError::InvalidValue {
            field: "coarse_step".into(),
            message: "must be positive".into(),
        };
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("coarse_step"));
    }

    #[test]
    fn test_non_numeric_format() {
        let err = InputError::NonNumeric {
            line: 5,
            column: "GASX".into(),
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("GASX"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_missing_directory_names_kind() {
        let err = PipelineError::MissingDirectory(FileKind::Ascii);
        assert!(err.to_string().contains("ASCII"));
    }
}
