//! Common types and utilities for the dtsb declaration bundler.
//!
//! This crate provides foundational types used across all dtsb crates:
//! - Source spans (`TextSpan`)
//! - Output line endings (`NewLineKind`)
//! - Comment scanning and documentation-comment lookup
//! - Positional text edits with consistency checks (`TextEdits`)
//! - Module path helpers

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::TextSpan;

// Output newline selection
pub mod newline;
pub use newline::NewLineKind;

// Comment parsing utilities
pub mod comments;
pub use comments::{CommentRange, get_comment_ranges, get_jsdoc_comment};

// Descending, non-overlapping text splicing
pub mod text_edit;
pub use text_edit::{TextEdit, TextEditError, TextEdits};

// Module specifier and file path helpers
pub mod path_utils;
