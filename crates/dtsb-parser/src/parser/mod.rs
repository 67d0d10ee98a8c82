//! Parser module: AST storage, node kinds, and the parser state machine.

pub mod base;
pub mod node;
pub mod node_access;
pub mod reference_directives;
pub mod state;
mod state_expressions;
mod state_statements;
mod state_types;
pub mod syntax_kind_ext;

pub use base::{NodeIndex, NodeList};

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "tests/reference_directives_tests.rs"]
mod reference_directives_tests;
