//! Export enumeration and dependency discovery for one entry point.
//!
//! The collector asks the program for the entry module's exports, orders them
//! by where they appear in the entry file, resolves each one to the symbol
//! that actually declares it, and records the references that declaration
//! makes to other symbols.

use crate::error::BundleError;
use dtsb_binder::{FileId, NodeRef, Program, Symbol, SymbolId};
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    /// First identifier of a type reference, heritage expression, computed
    /// property name or `typeof` query.
    Identifier,
    /// An `import("m")` type node.
    ImportType,
}

/// A use of another symbol inside one of the declarations being bundled.
#[derive(Clone, Debug)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Index into the declarations of the symbol the reference appears in.
    pub declaration_index: usize,
    pub node: NodeRef,
    /// Symbol at the reference site, before alias resolution.
    pub symbol: SymbolId,
    /// References made by the declarations of the referenced symbol.
    pub subrefs: Vec<Reference>,
}

#[derive(Clone, Debug)]
pub struct ExportEntry {
    pub name: String,
    pub export_symbol: SymbolId,
    pub orig_symbol: SymbolId,
    pub references: Vec<Reference>,
}

pub struct SymbolCollector<'p> {
    program: &'p Program,
    pub entry_file: FileId,
    /// Specifiers of external modules re-exported with `export *`.
    pub external_star_modules: IndexSet<String>,
    pub exports: Vec<ExportEntry>,
    pub orig_symbols: FxHashSet<SymbolId>,
    /// Export names, `default` excluded.
    pub export_names: FxHashSet<String>,
    pub global_symbols: IndexSet<SymbolId>,
    /// Globals with at least one declaration in a project file.
    pub internal_global_symbols: Vec<SymbolId>,
    pub global_names: FxHashSet<String>,
}

impl<'p> SymbolCollector<'p> {
    pub fn collect(program: &'p Program, entry_file: FileId) -> Result<SymbolCollector<'p>, BundleError> {
        let mut collector = SymbolCollector {
            program,
            entry_file,
            external_star_modules: IndexSet::new(),
            exports: Vec::new(),
            orig_symbols: FxHashSet::default(),
            export_names: FxHashSet::default(),
            global_symbols: IndexSet::new(),
            internal_global_symbols: Vec::new(),
            global_names: FxHashSet::default(),
        };

        let exports = match program.module_symbol_of_file(entry_file) {
            Some(module) => {
                collector.collect_globals(&FxHashSet::default());
                collector.module_exports(module)?
            }
            None => {
                // A script entry exports what it declares; those symbols stop
                // counting as globals of the bundle.
                let exports = collector.script_exports();
                let own: FxHashSet<SymbolId> = exports.iter().map(|(_, id)| *id).collect();
                collector.collect_globals(&own);
                exports
            }
        };

        for (name, export_symbol) in exports {
            let orig_symbol = program.resolve_alias(export_symbol);
            let declared = program
                .symbol(orig_symbol)
                .is_some_and(|s| !s.is_alias() && !s.declarations.is_empty());
            if !declared {
                return Err(BundleError::NoDeclarations { name });
            }
            let references = collector.references_of(orig_symbol);
            debug!(
                export = %name,
                original = %program.symbol_name(orig_symbol),
                references = references.len(),
                "collected export"
            );
            collector.orig_symbols.insert(orig_symbol);
            if name != "default" {
                collector.export_names.insert(name.clone());
            }
            collector.exports.push(ExportEntry {
                name,
                export_symbol,
                orig_symbol,
                references,
            });
        }
        Ok(collector)
    }

    // =========================================================================
    // Exports
    // =========================================================================

    fn module_exports(&mut self, module: SymbolId) -> Result<Vec<(String, SymbolId)>, BundleError> {
        let mut excluded = FxHashSet::default();
        let mut visited = FxHashSet::default();
        self.collect_external_star_modules(module, &mut excluded, &mut visited)?;

        let positions = self.export_positions(module);
        let mut ordered: Vec<(String, SymbolId, u32)> = Vec::new();
        let mut previous = 0;
        for (name, id) in self.program.exports_of_module(module) {
            if excluded.contains(&id) {
                continue;
            }
            if name == "export=" {
                warn!(entry = %self.program.unit(self.entry_file).path, "`export =` is not bundled");
                continue;
            }
            let position = match positions.get(&name) {
                Some(&position) => position,
                None => {
                    warn!(export = %name, "cannot find the position of the export, keeping it after the previous one");
                    previous
                }
            };
            previous = position;
            ordered.push((name, id, position));
        }
        ordered.sort_by_key(|&(_, _, position)| position);
        Ok(ordered.into_iter().map(|(name, id, _)| (name, id)).collect())
    }

    fn script_exports(&self) -> Vec<(String, SymbolId)> {
        let program = self.program;
        program
            .symbols_in_global_scope()
            .filter_map(|id| program.symbol(id))
            .filter(|symbol| symbol.declarations.iter().any(|d| d.file == self.entry_file))
            .map(|symbol| (symbol.escaped_name.clone(), symbol.id))
            .collect()
    }

    /// Walk `export *` declarations. External targets are kept as
    /// pass-through re-exports and their names are excluded from the export
    /// list; internal targets are searched further.
    fn collect_external_star_modules(
        &mut self,
        module: SymbolId,
        excluded: &mut FxHashSet<SymbolId>,
        visited: &mut FxHashSet<SymbolId>,
    ) -> Result<(), BundleError> {
        if !visited.insert(module) {
            return Ok(());
        }
        let program = self.program;
        for &star in program.star_export_declarations(module) {
            let specifier = program.module_specifier_of(star).unwrap_or_default();
            let Some(target) = program.module_of_declaration(star) else {
                return Err(BundleError::UnresolvedModule {
                    specifier: specifier.to_string(),
                });
            };
            if self.is_external_module(target) {
                excluded.extend(program.exports_of_module(target).into_iter().map(|(_, id)| id));
                self.external_star_modules.insert(specifier.to_string());
            } else {
                self.collect_external_star_modules(target, excluded, visited)?;
            }
        }
        Ok(())
    }

    /// Position in the entry file that orders each export name.
    ///
    /// Own exports use the start of their first declaration in the entry
    /// file. Names reached through an internal `export *` use the position of
    /// that star declaration, however deep the name actually comes from.
    fn export_positions(&self, module: SymbolId) -> FxHashMap<String, u32> {
        let program = self.program;
        let mut positions = FxHashMap::default();
        let Some(symbol) = program.symbol(module) else {
            return positions;
        };
        for (name, &id) in &symbol.exports {
            let position = program
                .symbol(id)
                .and_then(|s| s.declarations.iter().find(|d| d.file == self.entry_file))
                .and_then(|&decl| program.node(decl))
                .map(|node| node.start);
            if let Some(position) = position {
                positions.insert(name.clone(), position);
            }
        }
        for &star in program.star_export_declarations(module) {
            if star.file != self.entry_file {
                continue;
            }
            let Some(target) = program.module_of_declaration(star) else {
                continue;
            };
            if self.is_external_module(target) {
                continue;
            }
            let position = program.node(star).map_or(0, |node| node.start);
            for (name, _) in program.exports_of_module(target) {
                positions.entry(name).or_insert(position);
            }
        }
        positions
    }

    // =========================================================================
    // Globals
    // =========================================================================

    fn collect_globals(&mut self, excluded: &FxHashSet<SymbolId>) {
        let program = self.program;
        for id in program.symbols_in_global_scope() {
            if excluded.contains(&id) {
                continue;
            }
            let Some(symbol) = program.symbol(id) else {
                continue;
            };
            self.global_symbols.insert(id);
            self.global_names.insert(symbol.escaped_name.clone());
            if self.is_internal_global(symbol) {
                self.internal_global_symbols.push(id);
            }
        }
    }

    fn is_internal_global(&self, symbol: &Symbol) -> bool {
        !symbol.is_alias()
            && !self.program.is_ambient_module_symbol(symbol.id)
            && symbol
                .declarations
                .iter()
                .any(|d| self.program.unit(d.file).is_project_file())
    }

    /// Whether every declaration of an internal global lives in the project.
    pub fn is_project_only_global(&self, id: SymbolId) -> bool {
        self.program.symbol(id).is_some_and(|symbol| {
            symbol
                .declarations
                .iter()
                .all(|d| self.program.unit(d.file).is_project_file())
        })
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Modules that stay imports: external library files and ambient
    /// `declare module "name"` modules.
    pub fn is_external_module(&self, module: SymbolId) -> bool {
        self.program.is_ambient_module_symbol(module)
            || self
                .program
                .symbol(module)
                .and_then(Symbol::first_declaration)
                .is_some_and(|decl| self.program.is_external_library(decl.file))
    }

    /// Whether the symbol comes from a dependency: declared in an external
    /// library file or inside a non-relative `declare module` block.
    pub fn is_external_origin(&self, id: SymbolId) -> bool {
        let Some(decl) = self.program.symbol(id).and_then(Symbol::first_declaration) else {
            return false;
        };
        if self.program.is_external_library(decl.file) {
            return true;
        }
        let arena = &self.program.unit(decl.file).arena;
        std::iter::once(decl.node)
            .chain(arena.ancestors(decl.node))
            .filter(|&idx| arena.is_ambient_module(idx))
            .any(|idx| {
                arena
                    .module_specifier_text(idx)
                    .is_some_and(|name| !dtsb_common::path_utils::is_relative_specifier(name))
            })
    }

    pub fn is_json_origin(&self, id: SymbolId) -> bool {
        self.program
            .symbol(id)
            .and_then(Symbol::first_declaration)
            .is_some_and(|decl| self.program.is_json(decl.file))
    }

    // =========================================================================
    // References
    // =========================================================================

    /// References made by the declarations of `symbol`, each carrying the
    /// references of the symbol it points at.
    pub fn references_of(&self, symbol: SymbolId) -> Vec<Reference> {
        let mut chain = Vec::new();
        self.collect_references(symbol, &mut chain)
    }

    fn collect_references(&self, symbol: SymbolId, chain: &mut Vec<SymbolId>) -> Vec<Reference> {
        let program = self.program;
        let Some(data) = program.symbol(symbol) else {
            return Vec::new();
        };
        let outside_project = data
            .declarations
            .iter()
            .any(|d| program.is_external_library(d.file) || program.is_default_library(d.file));
        if outside_project || self.is_external_origin(symbol) {
            return Vec::new();
        }

        chain.push(symbol);
        let mut references = Vec::new();
        for (declaration_index, &decl) in data.declarations.iter().enumerate() {
            if program.node(decl).is_some_and(|n| n.kind == syntax_kind_ext::SOURCE_FILE) {
                continue;
            }
            let mut walk = ReferenceWalk {
                collector: self,
                owner: symbol,
                declaration: decl,
                declaration_index,
                chain: &mut *chain,
                references: &mut references,
            };
            walk.visit_children(decl.node);
        }
        chain.pop();
        references
    }

    fn sub_references(&self, symbol: SymbolId, chain: &mut Vec<SymbolId>) -> Vec<Reference> {
        if chain.contains(&symbol) {
            return Vec::new();
        }
        let target = self.program.resolve_alias(symbol);
        if chain.contains(&target) {
            return Vec::new();
        }
        match self.program.symbol(target) {
            Some(data) if !data.is_alias() && !data.declarations.is_empty() => {
                self.collect_references(target, chain)
            }
            _ => Vec::new(),
        }
    }

    /// Symbols scoped to the declaration being walked are not dependencies.
    fn is_declared_within(&self, symbol: SymbolId, owner: SymbolId, declaration: NodeRef) -> bool {
        let program = self.program;
        let Some(data) = program.symbol(symbol) else {
            return false;
        };
        if data.declarations.is_empty() {
            return false;
        }
        let arena = &program.unit(declaration.file).arena;
        let nested = data.declarations.iter().all(|d| {
            d.file == declaration.file && d.node != declaration.node && arena.is_descendant_of(d.node, declaration.node)
        });
        if nested {
            return true;
        }
        let mut parent = data.parent;
        while let Some(id) = parent {
            if id == owner {
                return true;
            }
            parent = program.symbol(id).and_then(|s| s.parent);
        }
        false
    }
}

/// Depth-first walk over one declaration.
struct ReferenceWalk<'a, 'p> {
    collector: &'a SymbolCollector<'p>,
    owner: SymbolId,
    declaration: NodeRef,
    declaration_index: usize,
    chain: &'a mut Vec<SymbolId>,
    references: &'a mut Vec<Reference>,
}

impl ReferenceWalk<'_, '_> {
    fn visit_children(&mut self, node: NodeIndex) {
        let program = self.collector.program;
        for child in program.unit(self.declaration.file).arena.children(node) {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: NodeIndex) {
        let program = self.collector.program;
        let file = self.declaration.file;
        let kind = program.unit(file).arena.kind(node);
        match kind {
            syntax_kind_ext::TYPE_REFERENCE
            | syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS
            | syntax_kind_ext::COMPUTED_PROPERTY_NAME
            | syntax_kind_ext::TYPE_QUERY => {
                if let Some(identifier) = self.first_identifier(node) {
                    self.add_identifier_reference(identifier);
                }
            }
            syntax_kind_ext::IMPORT_TYPE => match program.symbol_of_import_type(file, node) {
                Some(symbol) => self.references.push(Reference {
                    kind: ReferenceKind::ImportType,
                    declaration_index: self.declaration_index,
                    node: NodeRef::new(file, node),
                    symbol,
                    subrefs: Vec::new(),
                }),
                None => warn!(
                    file = %program.unit(file).path,
                    "cannot resolve the module of an import type"
                ),
            },
            _ => {}
        }
        self.visit_children(node);
    }

    fn add_identifier_reference(&mut self, identifier: NodeIndex) {
        let collector = self.collector;
        let program = collector.program;
        let file = self.declaration.file;
        let Some(symbol) = program.symbol_at_node(file, identifier) else {
            warn!(
                name = %program.unit(file).arena.identifier_text(identifier).unwrap_or_default(),
                file = %program.unit(file).path,
                "cannot find the symbol of a reference"
            );
            return;
        };
        if collector.is_declared_within(symbol, self.owner, self.declaration) {
            return;
        }
        let subrefs = collector.sub_references(symbol, self.chain);
        self.references.push(Reference {
            kind: ReferenceKind::Identifier,
            declaration_index: self.declaration_index,
            node: NodeRef::new(file, identifier),
            symbol,
            subrefs,
        });
    }

    fn first_identifier(&self, node: NodeIndex) -> Option<NodeIndex> {
        let program = self.collector.program;
        let arena = &program.unit(self.declaration.file).arena;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if arena.kind(current) == SyntaxKind::Identifier as u16 {
                return Some(current);
            }
            stack.extend(arena.children(current).into_iter().rev());
        }
        None
    }
}
