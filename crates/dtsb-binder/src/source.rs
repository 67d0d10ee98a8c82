//! Loaded source units and cross-file node references.

use crate::symbols::{SymbolId, SymbolTable};
use dtsb_parser::parser::node::node_flags;
use dtsb_parser::{Node, NodeArena, NodeIndex, ParseDiagnostic, ReferenceDirectives};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

/// A node in a specific source unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeRef {
    pub file: FileId,
    pub node: NodeIndex,
}

impl NodeRef {
    #[inline]
    pub fn new(file: FileId, node: NodeIndex) -> NodeRef {
        NodeRef { file, node }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    /// Declaration file of the project being bundled.
    Project,
    /// Declaration file found under `node_modules`.
    ExternalLibrary,
    /// Embedded default library, extra lib files and `no-default-lib` files.
    DefaultLibrary,
    /// JSON data file.
    Json,
}

/// One loaded file together with its syntax tree and binding results.
#[derive(Debug)]
pub struct SourceUnit {
    pub id: FileId,
    pub path: String,
    pub text: String,
    pub kind: SourceKind,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub is_module: bool,
    pub directives: ReferenceDirectives,
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Module symbol of a module file or JSON file.
    pub symbol: Option<SymbolId>,
    /// File-level scope of a module file. Scripts bind into the globals.
    pub locals: SymbolTable,
    /// Non-exported declarations of each namespace body, keyed by block node.
    pub block_locals: FxHashMap<NodeIndex, SymbolTable>,
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Module specifiers mentioned anywhere in the file, in order.
    pub(crate) specifiers: Vec<String>,
    /// Files the specifiers resolved to on the host.
    pub(crate) resolved_files: FxHashMap<String, FileId>,
    pub(crate) resolved_modules: FxHashMap<String, SymbolId>,
}

impl SourceUnit {
    pub(crate) fn new(
        id: FileId,
        path: String,
        text: String,
        kind: SourceKind,
        arena: NodeArena,
        root: NodeIndex,
        diagnostics: Vec<ParseDiagnostic>,
    ) -> SourceUnit {
        let is_module = arena
            .get(root)
            .is_some_and(|n| n.flags & node_flags::EXTERNAL_MODULE != 0);
        let directives = if kind == SourceKind::Json {
            ReferenceDirectives::default()
        } else {
            dtsb_parser::collect_reference_directives(&text)
        };
        SourceUnit {
            id,
            path,
            text,
            kind,
            arena,
            root,
            is_module,
            directives,
            diagnostics,
            symbol: None,
            locals: SymbolTable::default(),
            block_locals: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            specifiers: Vec::new(),
            resolved_files: FxHashMap::default(),
            resolved_modules: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.arena.get(index)
    }

    /// Source text of a node, without leading trivia.
    pub fn node_text(&self, index: NodeIndex) -> &str {
        self.arena.node_text(&self.text, index)
    }

    #[inline]
    pub fn is_external_library(&self) -> bool {
        self.kind == SourceKind::ExternalLibrary
    }

    #[inline]
    pub fn is_default_library(&self) -> bool {
        self.kind == SourceKind::DefaultLibrary
    }

    #[inline]
    pub fn is_json(&self) -> bool {
        self.kind == SourceKind::Json
    }

    #[inline]
    pub fn is_project_file(&self) -> bool {
        self.kind == SourceKind::Project
    }
}
