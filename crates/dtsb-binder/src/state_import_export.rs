//! Import and export declaration binding.
//!
//! Imports become alias symbols in the local scope of their container.
//! Export declarations and assignments become alias symbols in the
//! container's exports; `export *` is recorded on the container symbol and
//! expanded at query time.

use crate::source::NodeRef;
use crate::state::{BinderState, Container, ExportKind};
use crate::symbols::{AliasTarget, symbol_flags};
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use tracing::debug;

impl BinderState<'_> {
    pub(crate) fn bind_import_declaration(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(import) = arena.get(idx).and_then(|n| arena.get_import_decl(n)) else {
            return;
        };
        let Some(specifier) = arena.identifier_text(import.module_specifier) else {
            return;
        };
        // Side-effect import: `import "m";`
        let Some(clause) = arena
            .get(import.import_clause)
            .and_then(|n| arena.get_import_clause(n))
        else {
            return;
        };

        // Default import: `import X from "m"`
        if let Some(name) = arena.identifier_text(clause.name) {
            let target = AliasTarget::Import {
                specifier: specifier.to_string(),
                import_name: "default".to_string(),
            };
            self.declare_import_alias(container, name, import.import_clause, target);
        }

        let Some(bindings) = arena.get(clause.named_bindings) else {
            return;
        };
        match bindings.kind {
            syntax_kind_ext::NAMESPACE_IMPORT => {
                if let Some(name) = arena.declaration_name_text(clause.named_bindings) {
                    let target = AliasTarget::Namespace {
                        specifier: specifier.to_string(),
                    };
                    self.declare_import_alias(container, name, clause.named_bindings, target);
                }
            }
            syntax_kind_ext::NAMED_IMPORTS => {
                let Some(list) = arena.get_list(bindings) else {
                    return;
                };
                for spec_idx in list.elements.iter() {
                    let Some(spec) = arena.get(spec_idx).and_then(|n| arena.get_specifier(n)) else {
                        continue;
                    };
                    let Some(local) = arena.identifier_text(spec.name) else {
                        continue;
                    };
                    let import_name = arena.identifier_text(spec.property_name).unwrap_or(local);
                    let target = AliasTarget::Import {
                        specifier: specifier.to_string(),
                        import_name: import_name.to_string(),
                    };
                    self.declare_import_alias(container, local, spec_idx, target);
                }
            }
            _ => {}
        }
    }

    fn declare_import_alias(
        &mut self,
        container: Container,
        name: &str,
        decl: NodeIndex,
        target: AliasTarget,
    ) {
        let id = self.declare_symbol(container, Some(name), symbol_flags::ALIAS, decl, ExportKind::None);
        self.set_alias_target(id, target);
    }

    /// `import x = require("m")` and `import x = A.B.C`.
    pub(crate) fn bind_import_equals_declaration(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(import) = arena.get(idx).and_then(|n| arena.get_import_equals(n)) else {
            return;
        };
        let Some(name) = arena.identifier_text(import.name) else {
            return;
        };
        let target = if arena.kind(import.module_reference) == syntax_kind_ext::EXTERNAL_MODULE_REFERENCE {
            let Some(specifier) = arena.module_specifier_text(idx) else {
                return;
            };
            AliasTarget::Namespace {
                specifier: specifier.to_string(),
            }
        } else {
            AliasTarget::Entity {
                node: NodeRef::new(self.file, import.module_reference),
            }
        };
        let export = match self.export_kind_of(idx) {
            ExportKind::None => ExportKind::None,
            _ => ExportKind::Named,
        };
        let id = self.declare_symbol(container, Some(name), symbol_flags::ALIAS, idx, export);
        self.set_alias_target(id, target);
    }

    /// `export { a, b as c }`, `export { a } from "m"`, `export * from "m"`,
    /// `export * as ns from "m"`.
    pub(crate) fn bind_export_declaration(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(export) = arena.get(idx).and_then(|n| arena.get_export_decl(n)) else {
            return;
        };
        let specifier = arena.identifier_text(export.module_specifier);

        let Some(clause) = arena.get(export.export_clause) else {
            // `export * from "m"`
            if specifier.is_some()
                && let Some(parent) = container.symbol
                && let Some(symbol) = self.symbols.get_mut(parent)
            {
                symbol.star_exports.push(NodeRef::new(self.file, idx));
            }
            return;
        };

        match clause.kind {
            syntax_kind_ext::NAMESPACE_EXPORT => {
                let (Some(name), Some(specifier)) =
                    (arena.declaration_name_text(export.export_clause), specifier)
                else {
                    return;
                };
                let target = AliasTarget::Namespace {
                    specifier: specifier.to_string(),
                };
                self.declare_export_alias(container, name, export.export_clause, target);
            }
            syntax_kind_ext::NAMED_EXPORTS => {
                let Some(list) = arena.get_list(clause) else {
                    return;
                };
                for spec_idx in list.elements.iter() {
                    let Some(spec) = arena.get(spec_idx).and_then(|n| arena.get_specifier(n)) else {
                        continue;
                    };
                    let Some(exported) = arena.identifier_text(spec.name) else {
                        continue;
                    };
                    let local_node = if spec.property_name.is_some() {
                        spec.property_name
                    } else {
                        spec.name
                    };
                    let target = match specifier {
                        Some(specifier) => AliasTarget::Import {
                            specifier: specifier.to_string(),
                            import_name: arena.identifier_text(local_node).unwrap_or(exported).to_string(),
                        },
                        None => AliasTarget::Entity {
                            node: NodeRef::new(self.file, local_node),
                        },
                    };
                    self.declare_export_alias(container, exported, spec_idx, target);
                }
            }
            _ => {}
        }
    }

    /// `export default expr;` and `export = expr;`
    pub(crate) fn bind_export_assignment(&mut self, container: Container, idx: NodeIndex) {
        let arena = self.arena;
        let Some(assignment) = arena.get(idx).and_then(|n| arena.get_export_assignment(n)) else {
            return;
        };
        let export_name = if assignment.is_export_equals {
            "export="
        } else {
            "default"
        };
        let target = AliasTarget::Entity {
            node: NodeRef::new(self.file, assignment.expression),
        };
        self.declare_export_alias(container, export_name, idx, target);
    }

    /// `export as namespace Lib;` publishes the file's module as a global.
    pub(crate) fn bind_namespace_export_declaration(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let (Some(name), Some(module)) = (arena.declaration_name_text(idx), self.file_symbol) else {
            return;
        };
        if arena.kind(arena.declaration_name(idx)) != SyntaxKind::Identifier as u16 {
            return;
        }
        debug!(name, "global alias for module");
        let id = self.symbols.alloc(symbol_flags::ALIAS, name);
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.declarations.push(NodeRef::new(self.file, idx));
            symbol.alias = Some(AliasTarget::Symbol(module));
        }
        self.globals.entry(name.to_string()).or_insert(id);
        self.out.node_symbols.insert(idx, id);
    }
}
