//! Positional text splicing.
//!
//! Declarations are rewritten by splicing their original source text rather
//! than pretty-printing a tree. Every edit records the text it expects to
//! replace, and edits are applied from the end of the text towards its start
//! so the offsets of pending edits stay valid.

use crate::span::TextSpan;
use thiserror::Error;

/// One replacement of `span` (absolute source offsets) by `replacement`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub span: TextSpan,
    /// Text that must currently occupy `span`.
    pub expected: String,
    pub replacement: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextEditError {
    #[error("edit {start}..{end} is outside of the edited text")]
    OutOfBounds { start: u32, end: u32 },
    #[error("expected `{expected}` at {start}..{end}, found `{found}`")]
    Mismatch {
        start: u32,
        end: u32,
        expected: String,
        found: String,
    },
    #[error("edits {first_start}..{first_end} and {second_start}..{second_end} overlap")]
    Overlap {
        first_start: u32,
        first_end: u32,
        second_start: u32,
        second_end: u32,
    },
}

/// Edit list for a text that starts at source offset `base`.
#[derive(Clone, Debug, Default)]
pub struct TextEdits {
    base: u32,
    edits: Vec<TextEdit>,
}

impl TextEdits {
    pub fn new(base: u32) -> Self {
        TextEdits {
            base,
            edits: Vec::new(),
        }
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn replace(&mut self, span: TextSpan, expected: impl Into<String>, by: impl Into<String>) {
        self.edits.push(TextEdit {
            span,
            expected: expected.into(),
            replacement: by.into(),
        });
    }

    pub fn insert(&mut self, at: u32, text: impl Into<String>) {
        self.replace(TextSpan::new(at, at), "", text);
    }

    pub fn delete(&mut self, span: TextSpan, expected: impl Into<String>) {
        self.replace(span, expected, "");
    }

    /// Apply every edit to `text`, which holds the source from `base` onwards.
    ///
    /// Edits are sorted by descending position. Two edits may touch but not
    /// overlap, and an insertion sorts after a replacement starting at the
    /// same offset so the inserted text lands in front of it.
    pub fn apply(&self, text: &str) -> Result<String, TextEditError> {
        let mut edits: Vec<&TextEdit> = self.edits.iter().collect();
        edits.sort_by(|a, b| {
            (b.span.start, b.span.end).cmp(&(a.span.start, a.span.end))
        });

        let mut previous: Option<TextSpan> = None;
        for edit in &edits {
            if let Some(prev) = previous {
                let overlaps = edit.span.end > prev.start
                    || (edit.span == prev && edit.span.is_empty());
                if overlaps {
                    return Err(TextEditError::Overlap {
                        first_start: edit.span.start,
                        first_end: edit.span.end,
                        second_start: prev.start,
                        second_end: prev.end,
                    });
                }
            }
            previous = Some(edit.span);
        }

        let mut result = text.to_string();
        for edit in edits {
            let (start, end) = self.local_range(edit.span, text)?;
            let found = &text[start..end];
            if found != edit.expected {
                return Err(TextEditError::Mismatch {
                    start: edit.span.start,
                    end: edit.span.end,
                    expected: edit.expected.clone(),
                    found: found.to_string(),
                });
            }
            result.replace_range(start..end, &edit.replacement);
        }

        Ok(result)
    }

    fn local_range(&self, span: TextSpan, text: &str) -> Result<(usize, usize), TextEditError> {
        let out_of_bounds = || TextEditError::OutOfBounds {
            start: span.start,
            end: span.end,
        };
        if span.start < self.base || span.end < span.start {
            return Err(out_of_bounds());
        }
        let start = (span.start - self.base) as usize;
        let end = (span.end - self.base) as usize;
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(out_of_bounds());
        }
        Ok((start, end))
    }
}

#[cfg(test)]
#[path = "tests/text_edit.rs"]
mod tests;
