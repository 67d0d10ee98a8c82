//! Binder state for one source unit.
//!
//! The binder walks the statements of a file and declares symbols into the
//! right tables: file locals, namespace block locals, container exports, the
//! program globals, and the ambient module table. Symbols live in the
//! program-wide `SymbolArena`, so declarations from several files merge into
//! one symbol when they share a container and a name.

use crate::source::{FileId, NodeRef};
use crate::symbols::{AliasTarget, SymbolArena, SymbolId, SymbolTable, symbol_flags};
use dtsb_parser::parser::node::node_flags;
use dtsb_parser::{NodeArena, NodeIndex, NodeList, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Table that receives the local binding of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scope {
    Global,
    File,
    /// Namespace or ambient module body, keyed by its block (or, for the
    /// outer part of a dotted name, by its declaration).
    Block(NodeIndex),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Container {
    /// Module or namespace symbol whose exports receive exported members.
    pub symbol: Option<SymbolId>,
    pub scope: Scope,
    /// Every non-alias declaration is exported.
    pub export_context: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExportKind {
    None,
    Named,
    Default,
}

/// `declare module "x"` inside a module file, bound once every file is loaded.
#[derive(Clone, Debug)]
pub(crate) struct PendingAugmentation {
    pub file: FileId,
    pub declaration: NodeIndex,
    pub specifier: String,
}

/// Per-file tables produced by a binder run.
#[derive(Debug, Default)]
pub(crate) struct BindOutput {
    pub locals: SymbolTable,
    pub block_locals: FxHashMap<NodeIndex, SymbolTable>,
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
    pub augmentations: Vec<PendingAugmentation>,
}

pub(crate) struct BinderState<'a> {
    pub(crate) file: FileId,
    pub(crate) arena: &'a NodeArena,
    pub(crate) symbols: &'a mut SymbolArena,
    pub(crate) globals: &'a mut SymbolTable,
    pub(crate) ambient_modules: &'a mut IndexMap<String, SymbolId>,
    /// Module symbol of the file being bound (module files only).
    pub(crate) file_symbol: Option<SymbolId>,
    pub(crate) out: BindOutput,
}

impl<'a> BinderState<'a> {
    pub(crate) fn new(
        file: FileId,
        arena: &'a NodeArena,
        symbols: &'a mut SymbolArena,
        globals: &'a mut SymbolTable,
        ambient_modules: &'a mut IndexMap<String, SymbolId>,
        file_symbol: Option<SymbolId>,
    ) -> BinderState<'a> {
        BinderState {
            file,
            arena,
            symbols,
            globals,
            ambient_modules,
            file_symbol,
            out: BindOutput::default(),
        }
    }

    pub(crate) fn finish(self) -> BindOutput {
        self.out
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Bind every top-level statement of the file rooted at `root`.
    pub(crate) fn bind_source_file(&mut self, root: NodeIndex) {
        let arena = self.arena;
        let Some(statements) = arena.statements(root) else {
            return;
        };
        let container = match self.file_symbol {
            Some(symbol) => Container {
                symbol: Some(symbol),
                scope: Scope::File,
                export_context: self.is_export_context(root, statements),
            },
            None => Container {
                symbol: None,
                scope: Scope::Global,
                export_context: true,
            },
        };
        self.bind_statements(container, statements);
        self.bind_signature_symbols();
    }

    pub(crate) fn bind_statements(&mut self, container: Container, statements: &NodeList) {
        for statement in statements.iter() {
            self.bind_statement(container, statement);
        }
    }

    fn bind_statement(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node.kind {
            syntax_kind_ext::VARIABLE_STATEMENT => self.bind_variable_statement(container, idx),
            syntax_kind_ext::FUNCTION_DECLARATION => {
                self.bind_named_declaration(container, idx, symbol_flags::FUNCTION)
            }
            syntax_kind_ext::CLASS_DECLARATION => {
                self.bind_named_declaration(container, idx, symbol_flags::CLASS)
            }
            syntax_kind_ext::INTERFACE_DECLARATION => {
                self.bind_named_declaration(container, idx, symbol_flags::INTERFACE)
            }
            syntax_kind_ext::TYPE_ALIAS_DECLARATION => {
                self.bind_named_declaration(container, idx, symbol_flags::TYPE_ALIAS)
            }
            syntax_kind_ext::ENUM_DECLARATION => {
                self.bind_named_declaration(container, idx, symbol_flags::ENUM)
            }
            syntax_kind_ext::MODULE_DECLARATION => self.bind_module_declaration(container, idx),
            syntax_kind_ext::IMPORT_DECLARATION => self.bind_import_declaration(container, idx),
            syntax_kind_ext::IMPORT_EQUALS_DECLARATION => {
                self.bind_import_equals_declaration(container, idx)
            }
            syntax_kind_ext::EXPORT_DECLARATION => self.bind_export_declaration(container, idx),
            syntax_kind_ext::EXPORT_ASSIGNMENT => self.bind_export_assignment(container, idx),
            syntax_kind_ext::NAMESPACE_EXPORT_DECLARATION => {
                self.bind_namespace_export_declaration(idx)
            }
            _ => {}
        }
    }

    // =========================================================================
    // Symbol declaration
    // =========================================================================

    /// Ambient bodies without `export { }` or `export =` statements export
    /// every declaration implicitly.
    pub(crate) fn is_export_context(&self, container_node: NodeIndex, statements: &NodeList) -> bool {
        let ambient = self
            .arena
            .get(container_node)
            .is_some_and(|n| n.flags & node_flags::AMBIENT != 0);
        ambient
            && !statements.iter().any(|s| {
                matches!(
                    self.arena.kind(s),
                    syntax_kind_ext::EXPORT_DECLARATION | syntax_kind_ext::EXPORT_ASSIGNMENT
                )
            })
    }

    pub(crate) fn export_kind_of(&self, idx: NodeIndex) -> ExportKind {
        if !self.arena.has_modifier(idx, SyntaxKind::ExportKeyword) {
            ExportKind::None
        } else if self.arena.has_modifier(idx, SyntaxKind::DefaultKeyword) {
            ExportKind::Default
        } else {
            ExportKind::Named
        }
    }

    fn scope_table(&self, scope: Scope) -> Option<&SymbolTable> {
        match scope {
            Scope::Global => Some(&*self.globals),
            Scope::File => Some(&self.out.locals),
            Scope::Block(block) => self.out.block_locals.get(&block),
        }
    }

    fn scope_table_mut(&mut self, scope: Scope) -> &mut SymbolTable {
        match scope {
            Scope::Global => &mut *self.globals,
            Scope::File => &mut self.out.locals,
            Scope::Block(block) => self.out.block_locals.entry(block).or_default(),
        }
    }

    /// Declare `decl` in `container`, merging with an existing symbol of the
    /// same name unless either side is an alias.
    ///
    /// `name` is the local binding; unnamed default exports pass `None`.
    pub(crate) fn declare_symbol(
        &mut self,
        container: Container,
        name: Option<&str>,
        flags: u32,
        decl: NodeIndex,
        export: ExportKind,
    ) -> SymbolId {
        let is_alias = flags & symbol_flags::ALIAS != 0;
        let exported = export != ExportKind::None || (container.export_context && !is_alias);
        let export_name = match (exported, export) {
            (false, _) => None,
            (true, ExportKind::Default) => Some("default"),
            (true, _) => name,
        };

        let mut existing = name.and_then(|n| self.scope_table(container.scope)?.get(n).copied());
        if existing.is_none()
            && let (Some(parent), Some(export_name)) = (container.symbol, export_name)
        {
            existing = self
                .symbols
                .get(parent)
                .and_then(|p| p.exports.get(export_name))
                .copied();
        }
        let mergeable = existing.filter(|&id| {
            !is_alias && self.symbols.get(id).is_some_and(|s| !s.is_alias())
        });

        let decl_ref = NodeRef::new(self.file, decl);
        let id = match mergeable {
            Some(id) => {
                if let Some(symbol) = self.symbols.get_mut(id) {
                    symbol.flags |= flags;
                    symbol.declarations.push(decl_ref);
                }
                id
            }
            None => {
                let symbol_name = name.or(export_name).unwrap_or("__missing");
                let id = self.symbols.alloc(flags, symbol_name);
                if let Some(symbol) = self.symbols.get_mut(id) {
                    symbol.declarations.push(decl_ref);
                    symbol.parent = container.symbol;
                }
                id
            }
        };
        trace!(name = ?name, export = ?export_name, symbol = id.0, merged = mergeable.is_some(), "declare symbol");

        if let Some(name) = name {
            self.scope_table_mut(container.scope).insert(name.to_string(), id);
        }
        if let (Some(parent), Some(export_name)) = (container.symbol, export_name)
            && let Some(parent) = self.symbols.get_mut(parent)
        {
            parent.exports.insert(export_name.to_string(), id);
        }
        self.out.node_symbols.insert(decl, id);
        id
    }

    /// Declare an alias symbol straight into a container's exports.
    pub(crate) fn declare_export_alias(
        &mut self,
        container: Container,
        export_name: &str,
        decl: NodeIndex,
        target: AliasTarget,
    ) -> Option<SymbolId> {
        let parent = container.symbol?;
        let id = self.symbols.alloc(symbol_flags::ALIAS, export_name);
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.declarations.push(NodeRef::new(self.file, decl));
            symbol.alias = Some(target);
            symbol.parent = Some(parent);
        }
        if let Some(parent) = self.symbols.get_mut(parent) {
            parent.exports.insert(export_name.to_string(), id);
        }
        self.out.node_symbols.insert(decl, id);
        Some(id)
    }

    pub(crate) fn set_alias_target(&mut self, id: SymbolId, target: AliasTarget) {
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.alias = Some(target);
        }
    }
}
