//! # Mudlog - mud-log curve conversion to LAS and ASCII
//!
//! Mudlog takes a depth-indexed curve matrix sampled at a fine step and
//! produces LAS 2.0 and tab-separated ASCII files at the fine, 1-unit and
//! coarse resolutions, with derived gas ratios and per-curve precision.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Curve dump  │────▶│  Resample   │────▶│   Derive    │────▶│   Format    │
//! │ (ISO/UTF8)  │     │ (1 / coarse)│     │ (+LITH, TD) │     │ (LAS/ASCII) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mudlog::{parse_matrix_file, progress, run, RunConfig, RunRequest, SourceMatrices};
//!
//! #[tokio::main]
//! async fn main() {
//!     let parsed = parse_matrix_file("well.txt").unwrap();
//!     let config = RunConfig::from_json_file("run.json").unwrap();
//!     let request = RunRequest::new(SourceMatrices::fine(parsed.matrix), config);
//!     let summary = run(request, progress::ProgressSender::silent()).await.unwrap();
//!     println!("Wrote {} files", summary.written.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Curve matrix, curve index, lookup table, output targets
//! - [`config`] - Run configuration
//! - [`parser`] - Curve dump and lookup table readers
//! - [`transform`] - Derivations, overlay, resampling, boundary correction, pipeline
//! - [`format`] - Per-curve precision and column layouts
//! - [`header`] - LAS and ASCII headers
//! - [`output`] - File naming and writes
//! - [`progress`] - Progress messages over a channel

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Serialization
pub mod format;
pub mod header;
pub mod output;

// Reporting
pub mod progress;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, InputError, InputResult, PipelineError, PipelineResult,
    WriteError, WriteResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CurveIndex, CurveMatrix, DeclaredDepths, FileKind, HeaderFields, LookupEntry, LookupTable,
    OutputTarget, Resolution, NULL_TEXT, NULL_VALUE,
};

pub use config::RunConfig;

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_lookup_table,
    parse_matrix, parse_matrix_file, read_lookup_table, Delimiter, ParsedMatrix,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    apply_lookup, coarse_subset, correct_boundaries, derive_curves, one_unit_subset,
    render_file, run, run_and_write, run_pipeline, RunRequest, RunSummary, SourceMatrices,
};

pub use format::{Formatter, Layout};
pub use output::{OutputDirs, OutputFile};
pub use progress::{LogEntry, LogLevel, ProgressEvent, ProgressSender};
