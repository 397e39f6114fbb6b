//! Per-file orchestration: read, scan, resolve, rewrite, report.
//!
//! [`FileProcessor::process`] is invoked once per discovered file and is
//! stateless across files. It never fails: unreadable, non-UTF-8, and
//! malformed inputs become `skipped` entries with the file left
//! byte-for-byte untouched, so a batch run always completes with a full
//! report.

use std::path::Path;

use tracing::{debug, warn};

use crate::policy::PolicyRuleSet;
use crate::report::{AppliedStrategy, FileReport};
use crate::resolver::BlockResolver;
use crate::scanner::{ConflictScanner, Segment, START_MARKER};

/// Stateless per-file processor.
pub struct FileProcessor;

impl FileProcessor {
    /// Process one file, returning its report entry.
    ///
    /// `root` is the scan root; rule matching and the report entry use the
    /// root-relative forward-slash path. A file with no start marker is
    /// reported clean and not written.
    pub fn process(path: &Path, root: &Path, rules: &PolicyRuleSet) -> FileReport {
        let rel = relative_path(path, root);

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = rel.as_str(), error = %e, "unreadable file skipped");
                return FileReport::skipped(rel);
            }
        };

        // Binary and otherwise non-UTF-8 files are never modified.
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                debug!(path = rel.as_str(), "non-UTF-8 file skipped");
                return FileReport::skipped(rel);
            }
        };

        if !content.contains(START_MARKER) {
            return FileReport::clean(rel);
        }

        // The path is fixed for the whole file, so one lookup covers every
        // block in it.
        let strategy = rules.resolve_strategy(&rel);

        let segments = match ConflictScanner::scan(&content) {
            Ok(segments) => segments,
            Err(e) => {
                warn!(path = rel.as_str(), error = %e, "malformed conflict markers, file skipped");
                return FileReport::skipped(rel);
            }
        };

        let mut output = String::with_capacity(content.len());
        let mut applied = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Block(block) => {
                    let (text, used) = BlockResolver::resolve(block, strategy);
                    debug!(
                        path = rel.as_str(),
                        block = block.index,
                        strategy = %used,
                        "block resolved"
                    );
                    output.push_str(&text);
                    applied.push(used);
                }
            }
        }

        if let Err(e) = std::fs::write(path, &output) {
            warn!(path = rel.as_str(), error = %e, "failed to rewrite file, skipped");
            return FileReport::skipped(rel);
        }

        let file_strategy = aggregate(&applied);
        debug!(
            path = rel.as_str(),
            blocks = applied.len(),
            strategy = %file_strategy,
            "file resolved"
        );
        FileReport::resolved(rel, file_strategy)
    }
}

/// Root-relative, forward-slash form of `path`, used for rule matching and
/// the report entry.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = rel.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rel.into_owned()
    } else {
        rel.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// File-level strategy: uniform when every block agrees, `both` otherwise
/// (mixed blocks and the degenerate zero-block case included).
fn aggregate(applied: &[AppliedStrategy]) -> AppliedStrategy {
    match applied.first() {
        Some(&first) if applied.iter().all(|&s| s == first) => first,
        _ => AppliedStrategy::Both,
    }
}
