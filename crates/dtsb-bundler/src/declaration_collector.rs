//! Decides how every exported and referenced symbol appears in the bundle.
//!
//! Each export entry is classified by where its original symbol comes from:
//! the global scope stays ambient, dependencies become imports, JSON data
//! becomes a relative import, and project declarations are copied in. The
//! references of copied declarations are resolved the same way, recursively,
//! and rewritten when the referenced symbol ends up under another name.

use crate::BundleOptions;
use crate::declaration_registrar::{DeclarationRegistrar, ImportKind, InternalOptions, Replacements};
use crate::error::BundleError;
use crate::symbol_collector::{ExportEntry, Reference, ReferenceKind, SymbolCollector};
use dtsb_binder::{Program, Symbol, SymbolId, symbol_flags};
use dtsb_common::path_utils::relative_module_specifier;
use dtsb_common::{TextEdit, TextSpan};
use dtsb_parser::{NodeArena, NodeIndex, syntax_kind_ext};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Where the declaration of an exported original symbol is emitted.
#[derive(Clone, Debug)]
struct DeclarationPlan {
    /// Export entry that emits the declaration.
    declarer: usize,
    /// Name inside the bundle, `None` for an unnamed default.
    name: Option<String>,
    /// The name was suffixed to stay clear of a global.
    renamed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Global,
    External,
    Json,
    Internal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImportSource {
    External,
    Json,
}

struct FoundImport {
    kind: ImportKind,
    import_name: String,
    module: String,
}

pub struct DeclarationCollector<'a, 'p> {
    program: &'p Program,
    symbols: &'a SymbolCollector<'p>,
    options: &'a BundleOptions,
    registrar: DeclarationRegistrar<'p>,
    plans: FxHashMap<SymbolId, DeclarationPlan>,
    planned_names: FxHashSet<String>,
    /// Non-exported symbols copied into the bundle, with their name there.
    declared: FxHashMap<SymbolId, String>,
    declared_names: FxHashSet<String>,
    /// Symbols that asked for each name, in order.
    name_claims: FxHashMap<String, Vec<SymbolId>>,
    /// Import bindings and the module each comes from.
    imported: FxHashMap<String, String>,
    /// Binding chosen for each (module, kind, imported name, wanted name).
    import_bindings: FxHashMap<(String, ImportKind, String, String), String>,
}

impl<'a, 'p> DeclarationCollector<'a, 'p> {
    pub fn new(
        program: &'p Program,
        symbols: &'a SymbolCollector<'p>,
        options: &'a BundleOptions,
    ) -> DeclarationCollector<'a, 'p> {
        DeclarationCollector {
            program,
            symbols,
            options,
            registrar: DeclarationRegistrar::new(program),
            plans: FxHashMap::default(),
            planned_names: FxHashSet::default(),
            declared: FxHashMap::default(),
            declared_names: FxHashSet::default(),
            name_claims: FxHashMap::default(),
            imported: FxHashMap::default(),
            import_bindings: FxHashMap::default(),
        }
    }

    pub fn collect(mut self) -> Result<DeclarationRegistrar<'p>, BundleError> {
        let symbols = self.symbols;
        for module in &symbols.external_star_modules {
            self.registrar.register_star(module);
        }
        if self.options.globals {
            for &global in &symbols.internal_global_symbols {
                self.registrar.register_global(global)?;
            }
        }
        self.plan();
        for (index, entry) in symbols.exports.iter().enumerate() {
            self.collect_export(index, entry)?;
        }
        Ok(self.registrar)
    }

    // =========================================================================
    // Classification
    // =========================================================================

    fn origin(&self, symbol: SymbolId) -> Origin {
        if self.is_ambient_global(symbol) {
            Origin::Global
        } else if self.symbols.is_external_origin(symbol) {
            Origin::External
        } else if self.symbols.is_json_origin(symbol) {
            Origin::Json
        } else {
            Origin::Internal
        }
    }

    /// Globals stay ambient, except project-only globals when the globals
    /// block is not emitted.
    fn is_ambient_global(&self, symbol: SymbolId) -> bool {
        self.symbols.global_symbols.contains(&symbol)
            && (self.options.globals || !self.symbols.is_project_only_global(symbol))
    }

    fn is_global_name(&self, name: &str) -> bool {
        if !self.symbols.global_names.contains(name) {
            return false;
        }
        self.options.globals
            || self
                .program
                .globals()
                .get(name)
                .is_none_or(|&id| !self.symbols.is_project_only_global(id))
    }

    fn is_name_taken(&self, name: &str) -> bool {
        self.is_global_name(name)
            || self.symbols.export_names.contains(name)
            || self.planned_names.contains(name)
            || self.declared_names.contains(name)
            || self.imported.contains_key(name)
    }

    /// Own name of a symbol; unnamed defaults fall back to the name written
    /// on their declaration, if any.
    fn local_name_of(&self, symbol: SymbolId) -> Option<String> {
        let data = self.program.symbol(symbol)?;
        if data.escaped_name != "default" {
            return Some(data.escaped_name.clone());
        }
        data.declarations.iter().find_map(|&decl| {
            self.program
                .unit(decl.file)
                .arena
                .declaration_name_text(decl.node)
                .map(str::to_string)
        })
    }

    // =========================================================================
    // Export planning
    // =========================================================================

    /// Pick, for every project symbol, the one export entry that declares it
    /// and the name it gets inside the bundle.
    fn plan(&mut self) {
        let symbols = self.symbols;
        let exports = &symbols.exports;
        let mut order: Vec<SymbolId> = Vec::new();
        let mut groups: FxHashMap<SymbolId, Vec<usize>> = FxHashMap::default();
        for (index, entry) in exports.iter().enumerate() {
            if self.origin(entry.orig_symbol) != Origin::Internal {
                continue;
            }
            groups
                .entry(entry.orig_symbol)
                .or_insert_with(|| {
                    order.push(entry.orig_symbol);
                    Vec::new()
                })
                .push(index);
        }

        for orig in order {
            let Some(entries) = groups.get(&orig) else {
                continue;
            };
            let own_name = self.program.symbol_name(orig);
            let declarer = entries
                .iter()
                .copied()
                .find(|&i| own_name != "default" && exports[i].name == own_name)
                .or_else(|| entries.iter().copied().find(|&i| exports[i].name != "default"))
                .unwrap_or(entries[0]);

            let plan = if exports[declarer].name != "default" {
                let (name, renamed) = self.plan_name(&exports[declarer].name, false);
                DeclarationPlan {
                    declarer,
                    name: Some(name),
                    renamed,
                }
            } else {
                match self.local_name_of(orig) {
                    Some(local) => {
                        let (name, renamed) = self.plan_name(&local, true);
                        DeclarationPlan {
                            declarer,
                            name: Some(name),
                            renamed,
                        }
                    }
                    None => DeclarationPlan {
                        declarer,
                        name: None,
                        renamed: false,
                    },
                }
            };
            debug!(
                symbol = %own_name,
                export = %exports[declarer].name,
                name = ?plan.name,
                renamed = plan.renamed,
                "planned declaration"
            );
            if let Some(name) = &plan.name {
                self.planned_names.insert(name.clone());
            }
            self.plans.insert(orig, plan);
        }
    }

    /// `wanted`, or `wanted_<n>` when it would shadow a global or clash with
    /// another planned name.
    fn plan_name(&self, wanted: &str, check_exports: bool) -> (String, bool) {
        let collides = |name: &str, exports: bool| {
            self.is_global_name(name)
                || self.planned_names.contains(name)
                || (exports && self.symbols.export_names.contains(name))
        };
        if !collides(wanted, check_exports) {
            return (wanted.to_string(), false);
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{wanted}_{suffix}");
            if !collides(&candidate, true) {
                return (candidate, true);
            }
            suffix += 1;
        }
    }

    // =========================================================================
    // Exports
    // =========================================================================

    fn collect_export(&mut self, index: usize, entry: &'a ExportEntry) -> Result<(), BundleError> {
        let orig = entry.orig_symbol;
        match self.origin(orig) {
            Origin::Global => {
                let local = self.program.symbol_name(orig);
                self.registrar.register_alias(local, &entry.name);
                Ok(())
            }
            Origin::External => {
                if entry.export_symbol == orig {
                    warn!(export = %entry.name, "external symbol is exported without an import, skipping it");
                    return Ok(());
                }
                self.import_external(entry.export_symbol, &entry.name, ImportSource::External, true)
                    .map(drop)
            }
            Origin::Json => self
                .import_external(entry.export_symbol, &entry.name, ImportSource::Json, true)
                .map(drop),
            Origin::Internal => self.declare_export(index, entry),
        }
    }

    fn declare_export(&mut self, index: usize, entry: &'a ExportEntry) -> Result<(), BundleError> {
        let orig = entry.orig_symbol;
        let Some(plan) = self.plans.get(&orig).cloned() else {
            return Ok(());
        };
        if plan.declarer != index {
            return Ok(());
        }

        let replacements = self.resolve_references(&entry.references)?;
        let own_name = self.program.symbol_name(orig);
        let new_name = plan.name.as_deref().filter(|name| *name != own_name);
        let is_variable = self
            .program
            .symbol(orig)
            .is_some_and(|s| s.has_any_flags(symbol_flags::VARIABLE));

        if entry.name == "default" {
            if is_variable {
                self.registrar.register_internal(
                    orig,
                    InternalOptions {
                        export: false,
                        default: false,
                        new_name,
                        replacements: &replacements,
                    },
                )?;
                if let Some(name) = &plan.name {
                    self.registrar.register_alias(name, "default");
                }
            } else {
                self.registrar.register_internal(
                    orig,
                    InternalOptions {
                        export: true,
                        default: true,
                        new_name,
                        replacements: &replacements,
                    },
                )?;
            }
            return Ok(());
        }

        self.registrar.register_internal(
            orig,
            InternalOptions {
                export: !plan.renamed,
                default: false,
                new_name,
                replacements: &replacements,
            },
        )?;
        let Some(name) = plan.name else {
            return Ok(());
        };
        if plan.renamed {
            self.registrar.register_alias(&name, &entry.name);
        }
        for (other_index, other) in self.symbols.exports.iter().enumerate() {
            if other_index != index && other.orig_symbol == orig {
                self.registrar.register_alias(&name, &other.name);
            }
        }
        Ok(())
    }

    // =========================================================================
    // References
    // =========================================================================

    fn resolve_references(&mut self, references: &[Reference]) -> Result<Replacements, BundleError> {
        let mut replacements = Replacements::default();
        for reference in references {
            if let Some(edit) = self.resolve_reference(reference)? {
                replacements.push(reference.declaration_index, edit);
            }
        }
        Ok(replacements)
    }

    fn resolve_reference(&mut self, reference: &Reference) -> Result<Option<TextEdit>, BundleError> {
        let program = self.program;
        let orig = program.resolve_alias(reference.symbol);
        let Some(data) = program.symbol(orig) else {
            return Ok(None);
        };
        if data.is_alias() || data.declarations.is_empty() {
            warn!(
                name = %program.symbol_name(reference.symbol),
                "referenced symbol does not have any declaration"
            );
            return Ok(None);
        }
        if data.has_any_flags(symbol_flags::TYPE_PARAMETER | symbol_flags::PARAMETER) {
            return Ok(None);
        }

        let origin = self.origin(orig);
        match origin {
            Origin::Global => return Ok(None),
            Origin::External | Origin::Json if reference.kind == ReferenceKind::ImportType => return Ok(None),
            Origin::External | Origin::Json => {
                let source = if origin == Origin::Json {
                    ImportSource::Json
                } else {
                    ImportSource::External
                };
                let name = program.symbol_name(reference.symbol);
                let local = self.import_external(reference.symbol, name, source, false)?;
                return Ok(rename_site(program, reference, local));
            }
            Origin::Internal => {}
        }

        if program.is_module_symbol(orig) {
            return self.rewrite_namespace_access(reference, orig);
        }
        if reference.kind == ReferenceKind::ImportType {
            return Ok(None);
        }

        let site = program.unit(reference.node.file).node_text(reference.node.node);
        let name = self.bundle_name(orig, site, Some(&reference.subrefs))?;
        Ok(rename_site(program, reference, name))
    }

    /// Name a project symbol has in the bundle, declaring it on first use.
    fn bundle_name(
        &mut self,
        symbol: SymbolId,
        site: &str,
        subrefs: Option<&[Reference]>,
    ) -> Result<String, BundleError> {
        if let Some(plan) = self.plans.get(&symbol) {
            return plan.name.clone().ok_or_else(|| BundleError::UnnamedDefault {
                name: site.to_string(),
            });
        }
        self.declare_local(symbol, site, subrefs)
    }

    fn declare_local(
        &mut self,
        symbol: SymbolId,
        site: &str,
        subrefs: Option<&[Reference]>,
    ) -> Result<String, BundleError> {
        if let Some(name) = self.declared.get(&symbol) {
            return Ok(name.clone());
        }
        let wanted = self.local_name_of(symbol).unwrap_or_else(|| site.to_string());
        let name = self.claim_name(symbol, &wanted);
        debug!(symbol = %self.program.symbol_name(symbol), name = %name, "declare local");
        self.declared.insert(symbol, name.clone());
        self.declared_names.insert(name.clone());

        let computed;
        let subrefs = match subrefs {
            Some(subrefs) => subrefs,
            None => {
                computed = self.symbols.references_of(symbol);
                computed.as_slice()
            }
        };
        let replacements = self.resolve_references(subrefs)?;
        let own_name = self.program.symbol_name(symbol);
        self.registrar.register_internal(
            symbol,
            InternalOptions {
                export: false,
                default: false,
                new_name: (name != own_name).then_some(name.as_str()),
                replacements: &replacements,
            },
        )?;
        Ok(name)
    }

    /// The first claimant of a free name keeps it; later claimants, or any
    /// claimant of a taken name, get the first free `_<n>` suffix.
    fn claim_name(&mut self, symbol: SymbolId, wanted: &str) -> String {
        let claimed = self.name_claims.get(wanted).map_or(0, Vec::len);
        let name = if claimed == 0 && !self.is_name_taken(wanted) {
            wanted.to_string()
        } else {
            let mut suffix = claimed.max(1);
            loop {
                let candidate = format!("{wanted}_{suffix}");
                if !self.is_name_taken(&candidate) {
                    break candidate;
                }
                suffix += 1;
            }
        };
        self.name_claims.entry(wanted.to_string()).or_default().push(symbol);
        name
    }

    /// Replace `ns.member` (or `import("./m").member`) by the bundle name of
    /// the member.
    fn rewrite_namespace_access(
        &mut self,
        reference: &Reference,
        module: SymbolId,
    ) -> Result<Option<TextEdit>, BundleError> {
        let program = self.program;
        let unit = program.unit(reference.node.file);
        let arena = &unit.arena;
        let Some(root) = unit.node(reference.node.node) else {
            return Ok(None);
        };

        let (typeof_prefix, members) = match reference.kind {
            ReferenceKind::Identifier => ("", property_chain(arena, reference.node.node)),
            ReferenceKind::ImportType => {
                let Some(import_type) = arena.get_import_type(root) else {
                    return Ok(None);
                };
                let prefix = if import_type.is_type_of { "typeof " } else { "" };
                (prefix, qualifier_chain(arena, import_type.qualifier))
            }
        };
        let namespace = || BundleError::NamespaceWithoutProperty {
            namespace: unit.node_text(reference.node.node).to_string(),
        };

        let mut container = module;
        let mut resolved = None;
        for (position, &member_node) in members.iter().enumerate() {
            let member_name = arena.identifier_text(member_node).unwrap_or_default();
            let Some(member) = program.member_of(container, member_name) else {
                return Err(BundleError::NoDeclarations {
                    name: format!("{}.{member_name}", unit.node_text(reference.node.node)),
                });
            };
            let target = program.resolve_alias(member);
            if program.is_module_symbol(target) && position + 1 < members.len() {
                container = target;
                continue;
            }
            resolved = Some((member, target, member_node));
            break;
        }
        let Some((member, target, member_node)) = resolved else {
            return Err(namespace());
        };
        let Some(end) = unit.node(member_node).map(|n| n.end) else {
            return Ok(None);
        };

        let name = self.member_bundle_name(member, target)?;
        let span = TextSpan::new(root.start, end);
        let replacement = format!("{typeof_prefix}{name}");
        debug!(from = %span.slice(&unit.text), to = %replacement, file = %unit.path, "rewrite namespace access");
        Ok(Some(TextEdit {
            span,
            expected: span.slice(&unit.text).to_string(),
            replacement,
        }))
    }

    fn member_bundle_name(&mut self, member: SymbolId, target: SymbolId) -> Result<String, BundleError> {
        let program = self.program;
        let member_name = program.symbol_name(member);
        let declared = program
            .symbol(target)
            .is_some_and(|s| !s.is_alias() && !s.declarations.is_empty());
        if !declared {
            return Err(BundleError::NoDeclarations {
                name: member_name.to_string(),
            });
        }
        match self.origin(target) {
            Origin::Global => Ok(program.symbol_name(target).to_string()),
            Origin::External => self.import_external(member, member_name, ImportSource::External, false),
            Origin::Json => self.import_external(member, member_name, ImportSource::Json, false),
            Origin::Internal => {
                if program.is_module_symbol(target) {
                    return Err(BundleError::NamespaceWithoutProperty {
                        namespace: member_name.to_string(),
                    });
                }
                let local = self
                    .local_name_of(target)
                    .ok_or_else(|| BundleError::UnnamedDefault {
                        name: member_name.to_string(),
                    })?;
                self.bundle_name(target, &local, None)
            }
        }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn import_external(
        &mut self,
        symbol: SymbolId,
        name: &str,
        source: ImportSource,
        re_export: bool,
    ) -> Result<String, BundleError> {
        let found = self.find_import(symbol, source)?;
        let wanted = found.kind.binding(name, &found.import_name).to_string();
        let key = (found.module.clone(), found.kind, found.import_name.clone(), wanted.clone());
        let binding = match self.import_bindings.get(&key) {
            Some(binding) => binding.clone(),
            None if re_export => wanted,
            None => self.free_import_binding(&wanted, &found.module),
        };
        self.import_bindings.insert(key, binding.clone());

        let local = self.registrar.register_external(
            symbol,
            name,
            found.kind,
            &found.import_name,
            &found.module,
            &binding,
            re_export,
        );
        self.imported.insert(local.clone(), found.module);
        Ok(local)
    }

    /// `wanted`, or its first free `_<n>` variant when a declaration or an
    /// import from elsewhere already binds it.
    fn free_import_binding(&self, wanted: &str, module: &str) -> String {
        let taken = self.declared_names.contains(wanted)
            || self.planned_names.contains(wanted)
            || self.imported.contains_key(wanted);
        if !taken {
            return wanted.to_string();
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{wanted}_{suffix}");
            if !self.is_name_taken(&candidate) {
                warn!(name = %wanted, renamed = %candidate, module, "imported name is already bound, renaming the import");
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Follow the alias chain of `symbol` to the import or re-export that
    /// names a module of the requested kind.
    fn find_import(&self, symbol: SymbolId, source: ImportSource) -> Result<FoundImport, BundleError> {
        let program = self.program;
        let mut current = symbol;
        let mut seen = FxHashSet::default();
        loop {
            let Some(data) = program.symbol(current) else {
                return Err(BundleError::ImportNotFound {
                    name: program.symbol_name(symbol).to_string(),
                });
            };
            if !seen.insert(current) {
                return Err(BundleError::ImportNotFound {
                    name: data.escaped_name.clone(),
                });
            }
            if let Some(found) = self.import_at(data, source)? {
                return Ok(found);
            }
            if !data.is_alias() {
                return Err(BundleError::NotAnAlias {
                    name: data.escaped_name.clone(),
                });
            }
            current = program
                .immediate_alias_target(current)
                .ok_or_else(|| BundleError::ImportNotFound {
                    name: data.escaped_name.clone(),
                })?;
        }
    }

    fn import_at(&self, data: &Symbol, source: ImportSource) -> Result<Option<FoundImport>, BundleError> {
        let program = self.program;
        let Some(decl) = data.first_declaration() else {
            return Ok(None);
        };
        let Some(specifier) = program.module_specifier_of(decl) else {
            return Ok(None);
        };
        let module = program
            .module_of_declaration(decl)
            .ok_or_else(|| BundleError::UnresolvedModule {
                specifier: specifier.to_string(),
            })?;
        let module_file = program
            .symbol(module)
            .and_then(Symbol::first_declaration)
            .map(|d| d.file);
        let matches = match source {
            ImportSource::External => self.symbols.is_external_module(module),
            ImportSource::Json => module_file.is_some_and(|file| program.is_json(file)),
        };
        if !matches {
            return Ok(None);
        }

        let unit = program.unit(decl.file);
        let kind_id = unit.node(decl.node).map_or(0, |n| n.kind);
        let kind = ImportKind::of_declaration(kind_id).ok_or_else(|| BundleError::UnsupportedImportKind {
            name: data.escaped_name.clone(),
            kind: syntax_kind_ext::kind_name(kind_id),
        })?;
        let import_name = match kind {
            ImportKind::Named => unit
                .node(decl.node)
                .and_then(|n| unit.arena.get_specifier(n))
                .and_then(|s| unit.arena.identifier_text(s.property_name))
                .unwrap_or(data.escaped_name.as_str())
                .to_string(),
            _ => data.escaped_name.clone(),
        };
        let module = match (source, module_file) {
            (ImportSource::Json, Some(file)) => {
                let entry = &program.unit(self.symbols.entry_file).path;
                relative_module_specifier(Path::new(entry), Path::new(&program.unit(file).path))
            }
            _ => specifier.to_string(),
        };
        Ok(Some(FoundImport {
            kind,
            import_name,
            module,
        }))
    }
}

/// Edit replacing the identifier at a reference site with `name`, unless it
/// already reads `name`.
fn rename_site(program: &Program, reference: &Reference, name: String) -> Option<TextEdit> {
    let unit = program.unit(reference.node.file);
    let site = unit.node_text(reference.node.node);
    if name == site {
        return None;
    }
    debug!(from = %site, to = %name, file = %unit.path, "rewrite reference");
    let node = unit.node(reference.node.node)?;
    Some(TextEdit {
        span: TextSpan::new(node.start, node.end),
        expected: site.to_string(),
        replacement: name,
    })
}

/// Property names following `node` in `node.a.b`, innermost first.
fn property_chain(arena: &NodeArena, node: NodeIndex) -> Vec<NodeIndex> {
    let mut members = Vec::new();
    let mut current = node;
    loop {
        let parent = arena.parent_of(current);
        let Some(parent_node) = arena.get(parent) else {
            break;
        };
        let next = match parent_node.kind {
            syntax_kind_ext::QUALIFIED_NAME => arena
                .get_qualified_name(parent_node)
                .filter(|q| q.left == current)
                .map(|q| q.right),
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => arena
                .get_access_expr(parent_node)
                .filter(|a| a.expression == current)
                .map(|a| a.name_or_argument),
            _ => None,
        };
        let Some(member) = next else {
            break;
        };
        members.push(member);
        current = parent;
    }
    members
}

/// Identifiers of an entity name, leftmost first.
fn qualifier_chain(arena: &NodeArena, qualifier: NodeIndex) -> Vec<NodeIndex> {
    let mut members = Vec::new();
    let mut current = qualifier;
    while let Some(node) = arena.get(current) {
        match arena.get_qualified_name(node) {
            Some(name) => {
                members.push(name.right);
                current = name.left;
            }
            None => {
                members.push(current);
                break;
            }
        }
    }
    members.reverse();
    members
}
