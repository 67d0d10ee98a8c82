//! Module and namespace declaration binding.
//!
//! Covers identifier-named namespaces (including dotted names), ambient
//! `declare module "name"` declarations, `declare global` blocks, and module
//! augmentations, which are deferred until every file is loaded.

use crate::source::NodeRef;
use crate::state::{BinderState, Container, ExportKind, PendingAugmentation, Scope};
use crate::symbols::{SymbolId, symbol_flags};
use dtsb_parser::parser::node::node_flags;
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use tracing::debug;

impl BinderState<'_> {
    pub(crate) fn bind_module_declaration(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        let Some(module) = arena.get_module(node) else {
            return;
        };

        if node.flags & node_flags::GLOBAL_AUGMENTATION != 0 {
            let global = Container {
                symbol: None,
                scope: Scope::Global,
                export_context: true,
            };
            if let Some(statements) = arena.statements(module.body) {
                self.bind_statements(global, statements);
            }
            return;
        }

        if arena.kind(module.name) == SyntaxKind::StringLiteral as u16 {
            let Some(name) = arena.identifier_text(module.name) else {
                return;
            };
            if self.file_symbol.is_some() && container.scope == Scope::File {
                debug!(specifier = name, "deferring module augmentation");
                self.out.augmentations.push(PendingAugmentation {
                    file: self.file,
                    declaration: idx,
                    specifier: name.to_string(),
                });
                return;
            }
            let symbol = self.declare_ambient_module(name, idx);
            self.bind_module_body(symbol, idx);
            return;
        }

        let Some(name) = arena.identifier_text(module.name) else {
            return;
        };
        let export = if node.flags & node_flags::NESTED_NAMESPACE != 0 {
            ExportKind::Named
        } else {
            self.export_kind_of(idx)
        };
        let flags = symbol_flags::NAMESPACE_MODULE | symbol_flags::VALUE_MODULE;
        let symbol = self.declare_symbol(container, Some(name), flags, idx, export);
        self.bind_module_body(symbol, idx);
    }

    /// Bind the body of a namespace, ambient module or augmentation with
    /// `symbol` as the exporting container.
    pub(crate) fn bind_module_body(&mut self, symbol: SymbolId, idx: NodeIndex) {
        let arena = self.arena;
        let Some(module) = arena.get(idx).and_then(|n| arena.get_module(n)) else {
            return;
        };
        let body = module.body;
        match arena.kind(body) {
            syntax_kind_ext::MODULE_BLOCK => {
                let Some(statements) = arena.statements(body) else {
                    return;
                };
                let container = Container {
                    symbol: Some(symbol),
                    scope: Scope::Block(body),
                    export_context: self.is_export_context(body, statements),
                };
                self.bind_statements(container, statements);
            }
            // `namespace A.B {}`: B is an exported member of A.
            syntax_kind_ext::MODULE_DECLARATION => {
                let container = Container {
                    symbol: Some(symbol),
                    scope: Scope::Block(idx),
                    export_context: true,
                };
                self.bind_module_declaration(container, body);
            }
            _ => {}
        }
    }

    /// Find or create the ambient module `name` and add `decl` to it.
    pub(crate) fn declare_ambient_module(&mut self, name: &str, decl: NodeIndex) -> SymbolId {
        let decl_ref = NodeRef::new(self.file, decl);
        let id = match self.ambient_modules.get(name) {
            Some(&id) => id,
            None => {
                let id = self.symbols.alloc(symbol_flags::VALUE_MODULE, format!("\"{name}\""));
                self.ambient_modules.insert(name.to_string(), id);
                id
            }
        };
        self.add_module_declaration(id, decl_ref);
        id
    }

    /// Bind a deferred `declare module "x"` into its resolved target.
    pub(crate) fn bind_augmentation(&mut self, target: SymbolId, decl: NodeIndex) {
        self.add_module_declaration(target, NodeRef::new(self.file, decl));
        self.bind_module_body(target, decl);
    }

    fn add_module_declaration(&mut self, id: SymbolId, decl_ref: NodeRef) {
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags |= symbol_flags::VALUE_MODULE;
            if !symbol.declarations.contains(&decl_ref) {
                symbol.declarations.push(decl_ref);
            }
        }
        self.out.node_symbols.insert(decl_ref.node, id);
    }
}
