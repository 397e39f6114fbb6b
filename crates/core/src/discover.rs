//! Candidate-file discovery.
//!
//! Walks the scan root and yields regular, non-hidden files in a stable
//! order. VCS ignore files are deliberately not honored: a resolve run
//! must see every non-hidden file in the tree, tracked or not.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

/// Collect every regular, non-hidden file under `root`.
///
/// Hidden (leading-dot) files and directories are skipped, symlinks are
/// not followed, and entries are sorted by file name at each level so the
/// discovery order is deterministic. Traversal errors are logged and the
/// entry skipped; discovery itself never fails.
pub fn discover_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|t| t.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!(error = %e, "traversal error, entry skipped"),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "x\n").unwrap();
    }

    fn names(root: &Path) -> Vec<String> {
        discover_files(root)
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_walks_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.txt");
        touch(dir.path(), "a.txt");
        touch(dir.path(), "sub/inner.txt");

        assert_eq!(names(dir.path()), vec!["a.txt", "b.txt", "sub/inner.txt"]);
    }

    #[test]
    fn test_hidden_files_and_dirs_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "visible.txt");
        touch(dir.path(), ".hidden.txt");
        touch(dir.path(), ".git/config");
        touch(dir.path(), ".demark.toml");

        assert_eq!(names(dir.path()), vec!["visible.txt"]);
    }

    #[test]
    fn test_gitignore_is_not_honored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "ignored.txt\n").unwrap();
        touch(dir.path(), "ignored.txt");

        // The ignore file itself is hidden; the file it names is still seen.
        assert_eq!(names(dir.path()), vec!["ignored.txt"]);
    }

    #[test]
    fn test_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_files(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "real.txt");
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        // The symlink entry is not a regular file when links are unfollowed.
        assert_eq!(names(dir.path()), vec!["real.txt"]);
    }
}
