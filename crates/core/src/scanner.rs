//! Streaming conflict-marker scanner.
//!
//! [`ConflictScanner`] splits raw file content into literal spans and
//! conflict blocks by recognizing the three canonical 7-character marker
//! tokens. The scan is a state machine over the unconsumed remainder of
//! the input: at each step the leftmost occurrence of any token wins, and
//! everything before it is accumulated into the buffer of the current
//! state. Markers do not need to sit at the start of a line.
//!
//! Tokens that carry no structural meaning in the current state (a
//! delimiter outside the ours region, an end marker with no open block)
//! are passed through as plain text, so e.g. a `=======` heading underline
//! in prose is never destroyed.

use tracing::debug;

use crate::errors::ScanError;

/// Token opening a conflict block.
pub const START_MARKER: &str = "<<<<<<<";
/// Token separating the ours and theirs regions.
pub const DELIMITER_MARKER: &str = "=======";
/// Token closing a conflict block.
pub const END_MARKER: &str = ">>>>>>>";

const MARKER_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start,
    Delimiter,
    End,
}

impl Marker {
    fn token(self) -> &'static str {
        match self {
            Self::Start => START_MARKER,
            Self::Delimiter => DELIMITER_MARKER,
            Self::End => END_MARKER,
        }
    }
}

/// One conflict region: the lines of both sides, terminators preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBlock {
    /// 1-based position of the block within its file.
    pub index: usize,
    /// Lines between the start marker and the delimiter.
    pub ours: Vec<String>,
    /// Lines between the delimiter and the end marker.
    pub theirs: Vec<String>,
}

/// A piece of scanned output: untouched text or a conflict block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Block(ConflictBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InOurs,
    InTheirs,
}

/// State machine splitting raw content into [`Segment`]s.
#[derive(Debug)]
pub struct ConflictScanner {
    state: ScanState,
    segments: Vec<Segment>,
    literal: String,
    ours: String,
    theirs: String,
    blocks_seen: usize,
}

impl ConflictScanner {
    /// Scan `content` into an ordered sequence of literal spans and
    /// conflict blocks.
    ///
    /// Returns [`ScanError::UnterminatedBlock`] when the input ends while a
    /// block is still open; callers are expected to leave the file alone in
    /// that case.
    pub fn scan(content: &str) -> Result<Vec<Segment>, ScanError> {
        Self {
            state: ScanState::Normal,
            segments: Vec::new(),
            literal: String::new(),
            ours: String::new(),
            theirs: String::new(),
            blocks_seen: 0,
        }
        .run(content)
    }

    fn run(mut self, content: &str) -> Result<Vec<Segment>, ScanError> {
        let mut rest = content;
        while let Some((pos, marker)) = find_leftmost_marker(rest) {
            let (before, at_marker) = rest.split_at(pos);
            self.push_text(before);
            rest = &at_marker[MARKER_LEN..];

            match (marker, self.state) {
                (Marker::Start, _) => {
                    rest = discard_label_line(rest);
                    self.begin_block();
                }
                (Marker::Delimiter, ScanState::InOurs) => {
                    rest = discard_label_line(rest);
                    self.state = ScanState::InTheirs;
                }
                (Marker::End, ScanState::InOurs | ScanState::InTheirs) => {
                    rest = discard_label_line(rest);
                    self.finish_block();
                }
                // No structural meaning here: the token stays text.
                _ => self.push_text(marker.token()),
            }
        }
        self.push_text(rest);

        match self.state {
            ScanState::Normal => {
                self.flush_literal();
                Ok(self.segments)
            }
            _ => Err(ScanError::UnterminatedBlock {
                block: self.blocks_seen,
            }),
        }
    }

    /// Append text to the buffer of the current state.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.state {
            ScanState::Normal => self.literal.push_str(text),
            ScanState::InOurs => self.ours.push_str(text),
            ScanState::InTheirs => self.theirs.push_str(text),
        }
    }

    /// Open a fresh block. A start marker inside an open block restarts it;
    /// the partial accumulation is dropped.
    fn begin_block(&mut self) {
        if self.state == ScanState::Normal {
            self.flush_literal();
        }
        self.ours.clear();
        self.theirs.clear();
        self.blocks_seen += 1;
        self.state = ScanState::InOurs;
    }

    fn finish_block(&mut self) {
        let block = ConflictBlock {
            index: self.blocks_seen,
            ours: split_lines(&self.ours),
            theirs: split_lines(&self.theirs),
        };
        debug!(
            block = block.index,
            ours_lines = block.ours.len(),
            theirs_lines = block.theirs.len(),
            "conflict block closed"
        );
        self.ours.clear();
        self.theirs.clear();
        self.segments.push(Segment::Block(block));
        self.state = ScanState::Normal;
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.segments
                .push(Segment::Literal(std::mem::take(&mut self.literal)));
        }
    }
}

/// Position and kind of the earliest marker token in `s`.
///
/// The tokens are distinct strings, so ties are impossible.
fn find_leftmost_marker(s: &str) -> Option<(usize, Marker)> {
    [Marker::Start, Marker::Delimiter, Marker::End]
        .into_iter()
        .filter_map(|m| s.find(m.token()).map(|pos| (pos, m)))
        .min_by_key(|&(pos, _)| pos)
}

/// Drop an optional marker label: everything up to and including the next
/// newline. With no newline left, the rest of the input is the label.
fn discard_label_line(s: &str) -> &str {
    match s.find('\n') {
        Some(pos) => &s[pos + 1..],
        None => "",
    }
}

/// Split accumulated region text into lines, keeping terminators.
fn split_lines(s: &str) -> Vec<String> {
    s.split_inclusive('\n').map(str::to_string).collect()
}
