//! Error types for the demark core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

/// Errors from glob pattern compilation.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern could not be compiled into a matcher.
    #[error("invalid glob pattern '{pattern}': {detail}")]
    Invalid { pattern: String, detail: String },
}

// ---------------------------------------------------------------------------
// Policy errors
// ---------------------------------------------------------------------------

/// Errors from loading the policy document.
///
/// Only the strict loader surfaces these; the run-time loader degrades to
/// the empty rule set instead.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy document could not be read.
    #[error("failed to read policy document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy document is not valid TOML.
    #[error("failed to parse policy document '{path}': {detail}")]
    Parse { path: String, detail: String },
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// Errors from the conflict-marker scanner.
#[derive(Debug, Error)]
pub enum ScanError {
    /// End of input was reached while a conflict block was still open.
    #[error("conflict block {block} has no closing marker")]
    UnterminatedBlock { block: usize },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors from persisting the run report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("failed to write report to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
