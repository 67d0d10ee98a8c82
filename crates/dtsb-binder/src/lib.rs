//! Program loading and symbol binding for the dtsb bundler.
//!
//! This crate provides:
//! - `ProgramBuilder` / `Program` - loads declaration files through a
//!   `SourceHost`, binds them, and answers symbol-graph queries
//! - `Symbol`, `SymbolArena`, `symbol_flags` - program-wide symbol storage
//! - Module resolution for relative files, `node_modules` packages, and
//!   ambient `declare module` declarations
//! - An embedded default library with the common environment globals

pub mod host;
pub mod module_resolution;
pub mod program;
mod scopes;
pub mod source;
mod state;
mod state_import_export;
mod state_module_binding;
mod state_node_binding;
pub mod symbols;

pub use host::{MemoryHost, SourceHost};
pub use program::{DEFAULT_LIB_PATH, Program, ProgramBuilder, ProgramError};
pub use source::{FileId, NodeRef, SourceKind, SourceUnit};
pub use symbols::{AliasTarget, Symbol, SymbolArena, SymbolId, SymbolTable, symbol_flags};
