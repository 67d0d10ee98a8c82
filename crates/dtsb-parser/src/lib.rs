//! Declaration-file parser for the dtsb bundler.
//!
//! This crate provides:
//! - `ParserState` - recursive-descent parser over `.d.ts` syntax
//! - `NodeArena` / `NodeIndex` - index-based AST storage
//! - `syntax_kind_ext` - node kinds that extend the scanner's token kinds
//! - Triple-slash reference directive extraction

pub mod parser;

pub use parser::base::{NodeIndex, NodeList};
pub use parser::node::{Node, NodeArena, NodeData};
pub use parser::reference_directives::{ReferenceDirectives, collect_reference_directives};
pub use parser::state::{ParseDiagnostic, ParserState};
pub use parser::syntax_kind_ext;

/// Parse `text` into an arena.
///
/// Returns the arena, the source file node, and any parse diagnostics.
pub fn parse_source_file(
    file_name: impl Into<String>,
    text: impl Into<String>,
) -> (NodeArena, NodeIndex, Vec<ParseDiagnostic>) {
    let mut parser = ParserState::new(file_name.into(), text.into());
    let root = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    (parser.into_arena(), root, diagnostics)
}
