//! TypeScript scanner/tokenizer for declaration files.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types, keyword classification
//! - `ScannerState` - Tokenizer state machine with save/restore look-ahead
//! - `char_codes` - Character classification utilities

pub mod char_codes;

mod syntax_kind;
pub use syntax_kind::{SyntaxKind, text_to_keyword, token_to_text};

pub mod scanner_impl;
pub use scanner_impl::{ScannerSnapshot, ScannerState, token_flags};
