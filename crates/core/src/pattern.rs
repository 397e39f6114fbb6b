//! Glob-style path matching.
//!
//! Patterns are matched against the whole file path relative to the scan
//! root, with forward-slash separators. The semantics are shell-style
//! globbing where the separator is *not* special:
//!
//! | Token | Matches |
//! |-------|---------|
//! | `*`   | any run of characters, **including `/`** |
//! | `?`   | exactly one character |
//! | `[...]` | one character from the class (`[!...]` negates, leading `]` is literal) |
//!
//! Directory-scoped matching is expressed by writing the separator into the
//! pattern (e.g. `scripts/*`). A pattern must cover the whole path; there
//! is no implicit prefix or substring matching.

use regex_lite::Regex;

use crate::errors::PatternError;

/// A compiled glob pattern.
///
/// The glob is translated once into an anchored regex at construction, so
/// matching is a single regex test. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    regex: Regex,
}

impl PathMatcher {
    /// Compile `pattern` into a matcher.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let translated = glob_to_regex(pattern);
        let regex = Regex::new(&translated).map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The original glob pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Test a root-relative, forward-slash path against the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate a shell glob into an anchored regex source string.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match translate_class(&chars, i, &mut out) {
                Some(end) => i = end,
                // Unterminated class: the bracket is a literal.
                None => out.push_str("\\["),
            },
            c => push_literal(&mut out, c),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Translate a character class starting at `chars[open]` (the `[`).
///
/// Returns the index of the closing `]` on success, `None` when the class
/// never closes. Both `!` and `^` negate; a `]` directly after the opening
/// (or the negation) is a literal member.
fn translate_class(chars: &[char], open: usize, out: &mut String) -> Option<usize> {
    let mut j = open + 1;
    let mut body = String::new();

    if matches!(chars.get(j), Some(&'!') | Some(&'^')) {
        body.push('^');
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        body.push_str("\\]");
        j += 1;
    }

    while let Some(&c) = chars.get(j) {
        if c == ']' {
            out.push('[');
            out.push_str(&body);
            out.push(']');
            return Some(j);
        }
        match c {
            '\\' => body.push_str("\\\\"),
            '[' => body.push_str("\\["),
            _ => body.push(c),
        }
        j += 1;
    }
    None
}

/// Append a literal character, escaping regex metacharacters.
fn push_literal(out: &mut String, c: char) {
    if matches!(
        c,
        '.' | '+' | '(' | ')' | '|' | '^' | '$' | '{' | '}' | '\\' | ']'
    ) {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        PathMatcher::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn test_literal_pattern() {
        assert!(matches("Cargo.lock", "Cargo.lock"));
        assert!(!matches("Cargo.lock", "Cargo_lock"));
        assert!(!matches("Cargo.lock", "sub/Cargo.lock"));
    }

    #[test]
    fn test_star_crosses_separators() {
        // The separator is not special: a single star spans directories.
        assert!(matches("*.rs", "main.rs"));
        assert!(matches("*.rs", "src/main.rs"));
        assert!(matches("*.rs", "src/deep/nested/main.rs"));
        assert!(!matches("*.rs", "src/main.rs.bak"));
    }

    #[test]
    fn test_star_in_the_middle() {
        assert!(matches("src/*.rs", "src/main.rs"));
        assert!(matches("src/*.rs", "src/sub/main.rs"));
        assert!(!matches("src/*.rs", "lib/main.rs"));
    }

    #[test]
    fn test_directory_scoping_is_explicit() {
        assert!(matches("scripts/*", "scripts/build.sh"));
        assert!(!matches("scripts/*", "tools/build.sh"));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("v?.txt", "v1.txt"));
        assert!(matches("v?.txt", "va.txt"));
        assert!(!matches("v?.txt", "v12.txt"));
        assert!(!matches("v?.txt", "v.txt"));
    }

    #[test]
    fn test_character_class() {
        assert!(matches("file[0-9].txt", "file3.txt"));
        assert!(!matches("file[0-9].txt", "filex.txt"));
        assert!(matches("[abc].rs", "b.rs"));
    }

    #[test]
    fn test_negated_class() {
        assert!(matches("file[!0-9].txt", "filex.txt"));
        assert!(!matches("file[!0-9].txt", "file3.txt"));
        // `^` negates too.
        assert!(matches("file[^0-9].txt", "filex.txt"));
    }

    #[test]
    fn test_literal_bracket_member() {
        // A `]` right after the opening is a member, not the close.
        assert!(matches("a[]x]b", "a]b"));
        assert!(matches("a[]x]b", "axb"));
        assert!(!matches("a[]x]b", "ayb"));
    }

    #[test]
    fn test_unterminated_class_is_literal() {
        assert!(matches("a[bc", "a[bc"));
        assert!(!matches("a[bc", "ab"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a+b.txt", "a+b.txt"));
        assert!(!matches("a+b.txt", "aab.txt"));
        assert!(matches("weird(name).rs", "weird(name).rs"));
    }

    #[test]
    fn test_whole_path_anchoring() {
        assert!(!matches("main", "src/main.rs"));
        assert!(!matches("src", "src/main.rs"));
    }

    #[test]
    fn test_pattern_accessor() {
        let m = PathMatcher::new("src/*").unwrap();
        assert_eq!(m.pattern(), "src/*");
    }
}
