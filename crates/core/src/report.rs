//! Run report types and persistence.
//!
//! The report is the run's sole externally visible artifact:
//!
//! ```json
//! {"files": [{"file": "src/a.rs", "status": "resolved", "strategy": "ours"}]}
//! ```
//!
//! Entries appear in discovery order, one per discovered file, with no
//! deduplication, sorting, or filtering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

// ---------------------------------------------------------------------------
// Per-file vocabulary
// ---------------------------------------------------------------------------

/// Outcome of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// No start marker anywhere; the file was not written.
    Clean,
    /// Every conflict block was rewritten, in a single write.
    Resolved,
    /// The file could not be processed and was left untouched.
    Skipped,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Resolved => write!(f, "resolved"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// The strategy actually applied across a file's blocks.
///
/// `Both` covers the concatenation fallback and any mix of per-block
/// outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliedStrategy {
    Ours,
    Theirs,
    Both,
}

impl std::fmt::Display for AppliedStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// One report entry per discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the scan root, forward-slash separated.
    #[serde(rename = "file")]
    pub path: String,

    pub status: FileStatus,

    /// `None` (JSON `null`) unless the file was resolved.
    pub strategy: Option<AppliedStrategy>,
}

impl FileReport {
    /// Entry for a file with no conflict markers.
    pub fn clean(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Clean,
            strategy: None,
        }
    }

    /// Entry for a file that was left untouched.
    pub fn skipped(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Skipped,
            strategy: None,
        }
    }

    /// Entry for a rewritten file.
    pub fn resolved(path: impl Into<String>, strategy: AppliedStrategy) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Resolved,
            strategy: Some(strategy),
        }
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// The aggregated report for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReport {
    pub files: Vec<FileReport>,
}

impl ResolveReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ReportError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// Accumulates per-file reports in discovery order.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    files: Vec<FileReport>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's entry. Every discovered file produces exactly one.
    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
    }

    pub fn build(self) -> ResolveReport {
        ResolveReport { files: self.files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut builder = ReportBuilder::new();
        builder.push(FileReport::clean("b.txt"));
        builder.push(FileReport::resolved("a.txt", AppliedStrategy::Ours));
        builder.push(FileReport::skipped("c.bin"));

        let report = builder.build();
        let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.txt", "a.txt", "c.bin"]);
    }

    #[test]
    fn test_json_shape() {
        let report = ResolveReport {
            files: vec![
                FileReport::resolved("src/a.rs", AppliedStrategy::Ours),
                FileReport::clean("README.md"),
            ],
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["files"][0]["file"], "src/a.rs");
        assert_eq!(value["files"][0]["status"], "resolved");
        assert_eq!(value["files"][0]["strategy"], "ours");
        // Clean entries carry an explicit null strategy.
        assert_eq!(value["files"][1]["status"], "clean");
        assert!(value["files"][1]["strategy"].is_null());
    }

    #[test]
    fn test_json_round_trip() {
        let report = ResolveReport {
            files: vec![
                FileReport::skipped("bad.bin"),
                FileReport::resolved("x.txt", AppliedStrategy::Both),
            ],
        };
        let parsed: ResolveReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ResolveReport {
            files: vec![FileReport::clean("a.txt")],
        };
        report.write_to_file(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["files"][0]["file"], "a.txt");
    }

    #[test]
    fn test_write_to_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.json");
        let report = ResolveReport { files: vec![] };
        let err = report.write_to_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(FileStatus::Resolved.to_string(), "resolved");
        assert_eq!(FileStatus::Clean.to_string(), "clean");
        assert_eq!(FileStatus::Skipped.to_string(), "skipped");
        assert_eq!(AppliedStrategy::Both.to_string(), "both");
    }
}
