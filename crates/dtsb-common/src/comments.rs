//! Comment ranges and documentation comments.
//!
//! Comments are not part of the AST. Declarations keep the byte range of
//! their leading trivia (`pos..start`), and this module scans that range to
//! recover the comments it holds.

use serde::{Deserialize, Serialize};

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
    /// Whether this comment has a trailing newline
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool, has_trailing_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
            has_trailing_new_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }

    /// `/** ... */` blocks, excluding the empty `/**/`.
    pub fn is_jsdoc(&self, source: &str) -> bool {
        let text = self.get_text(source);
        self.is_multi_line && text.starts_with("/**") && text != "/**/"
    }
}

/// Extract the comment ranges found in `source[pos..end]`.
///
/// Scanning stops at the first character that is neither whitespace nor part
/// of a comment, so the range is expected to cover trivia only.
pub fn get_comment_ranges(source: &str, pos: u32, end: u32) -> Vec<CommentRange> {
    let mut comments = Vec::new();
    let bytes = source.as_bytes();
    let len = (end as usize).min(bytes.len());
    let mut pos = pos as usize;

    while pos < len {
        let ch = bytes[pos];

        if ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n' || ch == 0x0B || ch == 0x0C {
            pos += 1;
            continue;
        }

        if ch == b'/' && pos + 1 < len {
            let next = bytes[pos + 1];

            if next == b'/' {
                let start = pos as u32;
                pos += 2;
                while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                let has_trailing_new_line = pos < len;
                comments.push(CommentRange::new(
                    start,
                    pos as u32,
                    false,
                    has_trailing_new_line,
                ));
                continue;
            } else if next == b'*' {
                let start = pos as u32;
                pos += 2;

                let mut closed = false;
                while pos + 1 < len {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    pos = len;
                }

                let has_trailing_new_line =
                    pos < len && (bytes[pos] == b'\n' || bytes[pos] == b'\r');
                comments.push(CommentRange::new(
                    start,
                    pos as u32,
                    true,
                    has_trailing_new_line,
                ));
                continue;
            }
        }

        // Non-trivia: the caller's range went past the leading trivia.
        break;
    }

    comments
}

/// Documentation comment closest to a declaration.
///
/// `full_start..start` is the declaration's leading trivia. Returns the text
/// of the last `/** */` block in it, or `None`.
pub fn get_jsdoc_comment(source: &str, full_start: u32, start: u32) -> Option<&str> {
    get_comment_ranges(source, full_start, start)
        .iter()
        .rev()
        .find(|range| range.is_jsdoc(source))
        .map(|range| range.get_text(source))
}

#[cfg(test)]
#[path = "tests/comments.rs"]
mod tests;
