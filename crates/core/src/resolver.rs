//! Per-block resolution.
//!
//! [`BlockResolver`] turns one [`ConflictBlock`] plus the strategy chosen
//! for its file into the text that replaces the block.

use crate::policy::Strategy;
use crate::report::AppliedStrategy;
use crate::scanner::ConflictBlock;

/// Stateless block resolution engine.
pub struct BlockResolver;

impl BlockResolver {
    /// Resolve `block` under `strategy`, returning the replacement text and
    /// the strategy that was actually applied.
    ///
    /// With no strategy both sides are kept, ours first: the safe,
    /// information-preserving default for paths no policy rule covers. When
    /// both regions are non-empty and the ours region does not already end
    /// in a line terminator, exactly one newline is inserted between them
    /// so the adjoining tokens cannot run together.
    pub fn resolve(block: &ConflictBlock, strategy: Option<Strategy>) -> (String, AppliedStrategy) {
        match strategy {
            Some(Strategy::Ours) => (block.ours.concat(), AppliedStrategy::Ours),
            Some(Strategy::Theirs) => (block.theirs.concat(), AppliedStrategy::Theirs),
            None => {
                let mut out = block.ours.concat();
                let theirs = block.theirs.concat();
                if !out.is_empty() && !theirs.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&theirs);
                (out, AppliedStrategy::Both)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(ours: &[&str], theirs: &[&str]) -> ConflictBlock {
        ConflictBlock {
            index: 1,
            ours: ours.iter().map(|s| s.to_string()).collect(),
            theirs: theirs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_ours_discards_theirs() {
        let b = block(&["a\n", "b\n"], &["x\n"]);
        let (text, applied) = BlockResolver::resolve(&b, Some(Strategy::Ours));
        assert_eq!(text, "a\nb\n");
        assert_eq!(applied, AppliedStrategy::Ours);
    }

    #[test]
    fn test_theirs_discards_ours() {
        let b = block(&["a\n"], &["x\n", "y\n"]);
        let (text, applied) = BlockResolver::resolve(&b, Some(Strategy::Theirs));
        assert_eq!(text, "x\ny\n");
        assert_eq!(applied, AppliedStrategy::Theirs);
    }

    #[test]
    fn test_no_strategy_keeps_both() {
        let b = block(&["a\n"], &["x\n"]);
        let (text, applied) = BlockResolver::resolve(&b, None);
        assert_eq!(text, "a\nx\n");
        assert_eq!(applied, AppliedStrategy::Both);
    }

    #[test]
    fn test_both_inserts_separator_when_needed() {
        // Ours lacks a trailing terminator: exactly one newline goes in.
        let b = block(&["a"], &["x\n"]);
        let (text, _) = BlockResolver::resolve(&b, None);
        assert_eq!(text, "a\nx\n");
    }

    #[test]
    fn test_both_no_separator_when_present() {
        let b = block(&["a\r\n"], &["x\n"]);
        let (text, _) = BlockResolver::resolve(&b, None);
        assert_eq!(text, "a\r\nx\n");
    }

    #[test]
    fn test_both_with_empty_side_adds_nothing() {
        let (text, _) = BlockResolver::resolve(&block(&[], &["x\n"]), None);
        assert_eq!(text, "x\n");

        let (text, _) = BlockResolver::resolve(&block(&["a"], &[]), None);
        assert_eq!(text, "a");
    }

    #[test]
    fn test_empty_block_resolves_empty() {
        let (text, applied) = BlockResolver::resolve(&block(&[], &[]), Some(Strategy::Ours));
        assert_eq!(text, "");
        assert_eq!(applied, AppliedStrategy::Ours);
    }
}
