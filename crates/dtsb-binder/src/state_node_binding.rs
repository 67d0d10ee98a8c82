//! Declaration binding: variables, functions, classes, interfaces, type
//! aliases, enums, and the type parameters and parameters of signatures.

use crate::state::{BinderState, Container, ExportKind};
use crate::symbols::symbol_flags;
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;

impl BinderState<'_> {
    pub(crate) fn bind_variable_statement(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(statement) = arena.get(idx).and_then(|n| arena.get_variable_statement(n)) else {
            return;
        };
        let export = match self.export_kind_of(idx) {
            ExportKind::None => ExportKind::None,
            _ => ExportKind::Named,
        };
        let Some(list) = arena
            .get(statement.declaration_list)
            .and_then(|n| arena.get_list(n))
        else {
            return;
        };
        for decl in list.elements.iter() {
            let Some(name_node) = arena.get(arena.declaration_name(decl)) else {
                continue;
            };
            // Destructuring patterns do not occur in declaration output.
            if name_node.kind != SyntaxKind::Identifier as u16 {
                continue;
            }
            if let Some(name) = arena.declaration_name_text(decl) {
                self.declare_symbol(container, Some(name), symbol_flags::VARIABLE, decl, export);
            }
        }
    }

    /// Functions, classes, interfaces, type aliases and enums.
    pub(crate) fn bind_named_declaration(&mut self, container: Container, idx: NodeIndex, flags: u32) {
        let arena = self.arena;
        let export = self.export_kind_of(idx);
        let name = arena.declaration_name_text(idx);
        if name.is_none() && export != ExportKind::Default {
            return;
        }
        self.declare_symbol(container, name, flags, idx, export);
    }

    /// Give every type parameter and named parameter of the file a symbol so
    /// scope lookups can find them by node.
    pub(crate) fn bind_signature_symbols(&mut self) {
        let arena = self.arena;
        for (i, node) in arena.nodes.iter().enumerate() {
            let flags = match node.kind {
                syntax_kind_ext::TYPE_PARAMETER => symbol_flags::TYPE_PARAMETER,
                syntax_kind_ext::PARAMETER => symbol_flags::PARAMETER,
                _ => continue,
            };
            let idx = NodeIndex(i as u32);
            if self.out.node_symbols.contains_key(&idx) {
                continue;
            }
            let name_idx = arena.declaration_name(idx);
            if arena.kind(name_idx) != SyntaxKind::Identifier as u16 {
                continue;
            }
            let Some(name) = arena.identifier_text(name_idx) else {
                continue;
            };
            let id = self.symbols.alloc(flags, name);
            if let Some(symbol) = self.symbols.get_mut(id) {
                symbol.declarations.push(crate::source::NodeRef::new(self.file, idx));
            }
            self.out.node_symbols.insert(idx, id);
        }
    }
}
