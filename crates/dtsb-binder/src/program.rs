//! Program loading and the module-level symbol queries.
//!
//! A `Program` owns every loaded source unit and the symbol arena they were
//! bound into. Building one happens in four passes:
//! 1. load roots and follow module specifiers and reference directives,
//! 2. bind each file (script files into the globals),
//! 3. bind deferred module augmentations into their targets,
//! 4. resolve each file's module specifiers to module symbols.

use crate::host::SourceHost;
use crate::module_resolution::{
    normalize, resolve_module_file, resolve_reference_path, resolve_type_reference,
};
use crate::source::{FileId, NodeRef, SourceKind, SourceUnit};
use crate::state::{BinderState, PendingAugmentation};
use crate::symbols::{AliasTarget, Symbol, SymbolArena, SymbolId, SymbolTable, symbol_flags};
use dtsb_common::path_utils::{is_in_node_modules, is_relative_specifier};
use dtsb_parser::parser::node::SourceFileData;
use dtsb_parser::{Node, NodeArena, NodeData, NodeIndex, NodeList, ParseDiagnostic, syntax_kind_ext};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Path under which the embedded default library is loaded.
pub const DEFAULT_LIB_PATH: &str = "/__dtsb__/lib.d.ts";

static DEFAULT_LIB_TEXT: &str = include_str!("../lib/lib.d.ts");

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("cannot read source file `{path}`")]
    Unreadable { path: String },

    #[error("syntax error in `{path}` at offset {start}: {message}")]
    Parse {
        path: String,
        start: u32,
        message: String,
        diagnostics: Vec<ParseDiagnostic>,
    },

    #[error("cannot resolve module `{specifier}` imported from `{from}`")]
    UnresolvedModule { specifier: String, from: String },
}

// =============================================================================
// Builder
// =============================================================================

pub struct ProgramBuilder<'h> {
    host: &'h dyn SourceHost,
    roots: Vec<String>,
    lib_files: Vec<String>,
    no_default_lib: bool,
}

impl<'h> ProgramBuilder<'h> {
    pub fn new(host: &'h dyn SourceHost) -> ProgramBuilder<'h> {
        ProgramBuilder {
            host,
            roots: Vec::new(),
            lib_files: Vec::new(),
            no_default_lib: false,
        }
    }

    pub fn root(mut self, path: &str) -> Self {
        self.roots.push(normalize(path));
        self
    }

    pub fn roots<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roots.extend(paths.into_iter().map(|p| normalize(p.as_ref())));
        self
    }

    /// Extra file loaded as part of the default library.
    pub fn lib_file(mut self, path: &str) -> Self {
        self.lib_files.push(normalize(path));
        self
    }

    /// Skip the embedded default library.
    pub fn no_default_lib(mut self, no_default_lib: bool) -> Self {
        self.no_default_lib = no_default_lib;
        self
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        let mut loader = Loader {
            host: self.host,
            units: Vec::new(),
            paths: FxHashMap::default(),
        };

        if !self.no_default_lib {
            loader.add_unit(DEFAULT_LIB_PATH.to_string(), DEFAULT_LIB_TEXT.to_string(), SourceKind::DefaultLibrary)?;
        }
        for lib in &self.lib_files {
            let text = loader.read(lib)?;
            loader.add_unit(lib.clone(), text, SourceKind::DefaultLibrary)?;
        }
        let mut roots = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let id = loader.load(root)?;
            if !roots.contains(&id) {
                roots.push(id);
            }
        }

        let mut next = 0;
        while next < loader.units.len() {
            loader.discover(FileId(next as u32))?;
            next += 1;
        }

        let mut program = Program {
            units: loader.units,
            symbols: SymbolArena::new(),
            globals: SymbolTable::default(),
            ambient_modules: IndexMap::new(),
            paths: loader.paths,
            roots,
        };
        let pending = program.bind_units();
        program.bind_augmentations(pending);
        program.resolve_module_symbols();
        info!(
            files = program.units.len(),
            symbols = program.symbols.len(),
            globals = program.globals.len(),
            "program built"
        );
        Ok(program)
    }
}

struct Loader<'h> {
    host: &'h dyn SourceHost,
    units: Vec<SourceUnit>,
    paths: FxHashMap<String, FileId>,
}

impl Loader<'_> {
    fn read(&self, path: &str) -> Result<String, ProgramError> {
        self.host.read_file(path).ok_or_else(|| ProgramError::Unreadable {
            path: path.to_string(),
        })
    }

    fn load(&mut self, path: &str) -> Result<FileId, ProgramError> {
        if let Some(&id) = self.paths.get(path) {
            return Ok(id);
        }
        let text = self.read(path)?;
        let kind = if path.ends_with(".json") {
            SourceKind::Json
        } else if is_in_node_modules(Path::new(path)) {
            SourceKind::ExternalLibrary
        } else {
            SourceKind::Project
        };
        self.add_unit(path.to_string(), text, kind)
    }

    fn add_unit(&mut self, path: String, text: String, kind: SourceKind) -> Result<FileId, ProgramError> {
        let id = FileId(self.units.len() as u32);
        let (arena, root, diagnostics) = if kind == SourceKind::Json {
            let (arena, root) = json_arena(&path, &text);
            (arena, root, Vec::new())
        } else {
            dtsb_parser::parse_source_file(path.clone(), text.clone())
        };

        if kind == SourceKind::Project
            && let Some(first) = diagnostics.first()
        {
            return Err(ProgramError::Parse {
                path,
                start: first.start,
                message: first.message.clone(),
                diagnostics,
            });
        }
        if !diagnostics.is_empty() {
            warn!(path = %path, count = diagnostics.len(), "syntax errors in library file");
        }

        let mut unit = SourceUnit::new(id, path.clone(), text, kind, arena, root, diagnostics);
        if unit.directives.no_default_lib {
            unit.kind = SourceKind::DefaultLibrary;
        }
        debug!(path = %path, kind = ?unit.kind, is_module = unit.is_module, "loaded source");
        self.units.push(unit);
        self.paths.insert(path, id);
        Ok(id)
    }

    /// Load everything `file` refers to.
    fn discover(&mut self, file: FileId) -> Result<(), ProgramError> {
        let unit = &self.units[file.0 as usize];
        if unit.kind == SourceKind::Json {
            return Ok(());
        }
        let path = unit.path.clone();
        let is_project = unit.kind == SourceKind::Project;
        let specifiers = collect_specifiers(unit);
        let type_refs = unit.directives.types.clone();
        let path_refs = unit.directives.paths.clone();

        let mut resolved_files = FxHashMap::default();
        for specifier in &specifiers {
            match resolve_module_file(self.host, &path, specifier) {
                Some(target) => {
                    let id = self.load(&target)?;
                    resolved_files.insert(specifier.clone(), id);
                }
                None if is_project && is_relative_specifier(specifier) => {
                    return Err(ProgramError::UnresolvedModule {
                        specifier: specifier.clone(),
                        from: path,
                    });
                }
                // Possibly an ambient module declared somewhere else.
                None => debug!(specifier = %specifier, from = %path, "no file for module"),
            }
        }
        for name in &type_refs {
            match resolve_type_reference(self.host, &path, name) {
                Some(target) => {
                    self.load(&target)?;
                }
                None => warn!(types = %name, from = %path, "unresolved type reference directive"),
            }
        }
        for reference in &path_refs {
            match resolve_reference_path(self.host, &path, reference) {
                Some(target) => {
                    self.load(&target)?;
                }
                None => warn!(path = %reference, from = %path, "unresolved path reference directive"),
            }
        }

        let unit = &mut self.units[file.0 as usize];
        unit.specifiers = specifiers;
        unit.resolved_files = resolved_files;
        Ok(())
    }
}

/// Module specifiers of imports, exports, import types and augmentations.
fn collect_specifiers(unit: &SourceUnit) -> Vec<String> {
    let arena = &unit.arena;
    let mut out: Vec<String> = Vec::new();
    for (i, node) in arena.nodes.iter().enumerate() {
        let idx = NodeIndex(i as u32);
        let specifier = match node.kind {
            syntax_kind_ext::IMPORT_DECLARATION
            | syntax_kind_ext::EXPORT_DECLARATION
            | syntax_kind_ext::IMPORT_EQUALS_DECLARATION
            | syntax_kind_ext::IMPORT_TYPE => arena.module_specifier_text(idx),
            syntax_kind_ext::MODULE_DECLARATION if unit.is_module => arena.module_specifier_text(idx),
            _ => None,
        };
        if let Some(specifier) = specifier
            && !out.iter().any(|s| s == specifier)
        {
            out.push(specifier.to_string());
        }
    }
    out
}

/// JSON files get a bare source-file node to hang declarations on.
fn json_arena(path: &str, text: &str) -> (NodeArena, NodeIndex) {
    let mut arena = NodeArena::new();
    let end = text.len() as u32;
    let root = arena.add(
        syntax_kind_ext::SOURCE_FILE,
        0,
        0,
        end,
        NodeData::SourceFile(SourceFileData {
            statements: NodeList::new(Vec::new(), 0, end),
            end_of_file_token: NodeIndex::NONE,
            file_name: path.to_string(),
        }),
    );
    (arena, root)
}

// =============================================================================
// Program
// =============================================================================

/// Every loaded file bound into one symbol graph.
#[derive(Debug)]
pub struct Program {
    units: Vec<SourceUnit>,
    symbols: SymbolArena,
    globals: SymbolTable,
    ambient_modules: IndexMap<String, SymbolId>,
    paths: FxHashMap<String, FileId>,
    roots: Vec<FileId>,
}

impl Program {
    fn bind_units(&mut self) -> Vec<PendingAugmentation> {
        let mut pending = Vec::new();
        for unit in &mut self.units {
            let root_ref = NodeRef::new(unit.id, unit.root);
            if unit.kind == SourceKind::Json {
                unit.symbol = Some(bind_json(&mut self.symbols, unit, root_ref));
                continue;
            }
            let file_symbol = unit.is_module.then(|| {
                let id = self
                    .symbols
                    .alloc(symbol_flags::VALUE_MODULE, format!("\"{}\"", unit.path));
                if let Some(symbol) = self.symbols.get_mut(id) {
                    symbol.declarations.push(root_ref);
                }
                id
            });
            unit.symbol = file_symbol;

            let mut binder = BinderState::new(
                unit.id,
                &unit.arena,
                &mut self.symbols,
                &mut self.globals,
                &mut self.ambient_modules,
                file_symbol,
            );
            binder.bind_source_file(unit.root);
            let out = binder.finish();
            unit.locals = out.locals;
            unit.block_locals = out.block_locals;
            unit.node_symbols = out.node_symbols;
            pending.extend(out.augmentations);
        }
        pending
    }

    fn bind_augmentations(&mut self, pending: Vec<PendingAugmentation>) {
        for augmentation in pending {
            let index = augmentation.file.0 as usize;
            let target = self.augmentation_target(&augmentation);
            let out = {
                let unit = &self.units[index];
                let mut binder = BinderState::new(
                    unit.id,
                    &unit.arena,
                    &mut self.symbols,
                    &mut self.globals,
                    &mut self.ambient_modules,
                    unit.symbol,
                );
                let target = match target {
                    Some(target) => target,
                    None => binder.declare_ambient_module(&augmentation.specifier, augmentation.declaration),
                };
                debug!(specifier = %augmentation.specifier, target = target.0, "binding module augmentation");
                binder.bind_augmentation(target, augmentation.declaration);
                binder.finish()
            };
            let unit = &mut self.units[index];
            unit.block_locals.extend(out.block_locals);
            unit.node_symbols.extend(out.node_symbols);
        }
    }

    /// Relative augmentations target the augmented file; bare names prefer an
    /// existing ambient module over a resolved package.
    fn augmentation_target(&self, augmentation: &PendingAugmentation) -> Option<SymbolId> {
        let unit = &self.units[augmentation.file.0 as usize];
        let specifier = augmentation.specifier.as_str();
        let from_file = || {
            unit.resolved_files
                .get(specifier)
                .and_then(|file| self.units[file.0 as usize].symbol)
        };
        if is_relative_specifier(specifier) {
            from_file()
        } else {
            self.ambient_modules.get(specifier).copied().or_else(from_file)
        }
    }

    fn resolve_module_symbols(&mut self) {
        for index in 0..self.units.len() {
            let unit = &self.units[index];
            let mut resolved = FxHashMap::default();
            for specifier in &unit.specifiers {
                let ambient = if is_relative_specifier(specifier) {
                    None
                } else {
                    self.ambient_modules.get(specifier).copied()
                };
                let target = ambient.or_else(|| {
                    unit.resolved_files
                        .get(specifier)
                        .and_then(|file| self.units[file.0 as usize].symbol)
                });
                if let Some(target) = target {
                    resolved.insert(specifier.clone(), target);
                }
            }
            self.units[index].resolved_modules = resolved;
        }
    }

    // =========================================================================
    // Files and nodes
    // =========================================================================

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn unit(&self, file: FileId) -> &SourceUnit {
        &self.units[file.0 as usize]
    }

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.paths.get(&normalize(path)).copied()
    }

    /// Root files in the order they were given.
    pub fn root_files(&self) -> &[FileId] {
        &self.roots
    }

    pub fn source_text(&self, file: FileId) -> &str {
        &self.unit(file).text
    }

    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        self.unit(node.file).node(node.node)
    }

    pub fn node_text(&self, node: NodeRef) -> &str {
        self.unit(node.file).node_text(node.node)
    }

    pub fn is_external_library(&self, file: FileId) -> bool {
        self.unit(file).is_external_library()
    }

    pub fn is_default_library(&self, file: FileId) -> bool {
        self.unit(file).is_default_library()
    }

    pub fn is_json(&self, file: FileId) -> bool {
        self.unit(file).is_json()
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.symbol(id).map_or("", |s| s.escaped_name.as_str())
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    /// Global symbols in declaration order.
    pub fn symbols_in_global_scope(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.globals.values().copied()
    }

    pub fn ambient_module(&self, name: &str) -> Option<SymbolId> {
        self.ambient_modules.get(name).copied()
    }

    pub fn module_symbol_of_file(&self, file: FileId) -> Option<SymbolId> {
        self.unit(file).symbol
    }

    /// Symbol declared by a declaration node.
    pub fn symbol_of_declaration(&self, decl: NodeRef) -> Option<SymbolId> {
        self.unit(decl.file).node_symbols.get(&decl.node).copied()
    }

    /// Whether the symbol is the module of a whole file.
    pub fn is_module_symbol(&self, id: SymbolId) -> bool {
        self.symbol(id).is_some_and(|symbol| {
            symbol.has_any_flags(symbol_flags::VALUE_MODULE)
                && symbol
                    .first_declaration()
                    .and_then(|decl| self.node(decl))
                    .is_some_and(|node| node.kind == syntax_kind_ext::SOURCE_FILE)
        })
    }

    /// Whether the symbol is a `declare module "name"` module.
    pub fn is_ambient_module_symbol(&self, id: SymbolId) -> bool {
        self.symbol(id)
            .and_then(Symbol::first_declaration)
            .is_some_and(|decl| self.unit(decl.file).arena.is_ambient_module(decl.node))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Module symbol a specifier written in `file` refers to.
    pub fn resolve_module(&self, file: FileId, specifier: &str) -> Option<SymbolId> {
        let unit = self.unit(file);
        unit.resolved_modules.get(specifier).copied().or_else(|| {
            if is_relative_specifier(specifier) {
                None
            } else {
                self.ambient_modules.get(specifier).copied()
            }
        })
    }

    /// Module specifier of the import or export statement containing `decl`.
    pub fn module_specifier_of(&self, decl: NodeRef) -> Option<&str> {
        let arena = &self.unit(decl.file).arena;
        std::iter::once(decl.node)
            .chain(arena.ancestors(decl.node))
            .find(|&idx| {
                matches!(
                    arena.kind(idx),
                    syntax_kind_ext::IMPORT_DECLARATION
                        | syntax_kind_ext::EXPORT_DECLARATION
                        | syntax_kind_ext::IMPORT_EQUALS_DECLARATION
                )
            })
            .and_then(|idx| arena.module_specifier_text(idx))
    }

    /// Module reached through the import or export containing `decl`.
    pub fn module_of_declaration(&self, decl: NodeRef) -> Option<SymbolId> {
        let specifier = self.module_specifier_of(decl)?;
        self.resolve_module(decl.file, specifier)
    }

    pub fn star_export_declarations(&self, module: SymbolId) -> &[NodeRef] {
        self.symbol(module).map_or(&[], |s| s.star_exports.as_slice())
    }

    /// Own exports in declaration order, then the exports reached through
    /// `export *` (never their `default`), first name wins.
    pub fn exports_of_module(&self, module: SymbolId) -> Vec<(String, SymbolId)> {
        let mut out = IndexMap::new();
        let mut visited = FxHashSet::default();
        self.collect_module_exports(module, true, &mut out, &mut visited);
        out.into_iter().collect()
    }

    fn collect_module_exports(
        &self,
        module: SymbolId,
        include_default: bool,
        out: &mut IndexMap<String, SymbolId>,
        visited: &mut FxHashSet<SymbolId>,
    ) {
        if !visited.insert(module) {
            return;
        }
        let Some(symbol) = self.symbol(module) else {
            return;
        };
        let exports = match self.export_equals_target(symbol) {
            Some(target) => &target.exports,
            None => &symbol.exports,
        };
        for (name, &id) in exports {
            if include_default || name != "default" {
                out.entry(name.clone()).or_insert(id);
            }
        }
        for &star in &symbol.star_exports {
            if let Some(target) = self.module_of_declaration(star) {
                self.collect_module_exports(target, false, out, visited);
            }
        }
    }

    pub fn export_of_module(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        let mut visited = FxHashSet::default();
        self.find_export(module, name, &mut visited)
    }

    fn find_export(&self, module: SymbolId, name: &str, visited: &mut FxHashSet<SymbolId>) -> Option<SymbolId> {
        if !visited.insert(module) {
            return None;
        }
        let symbol = self.symbol(module)?;
        let exports = match self.export_equals_target(symbol) {
            Some(target) => &target.exports,
            None => &symbol.exports,
        };
        if let Some(&id) = exports.get(name) {
            return Some(id);
        }
        if name == "default" {
            return None;
        }
        symbol
            .star_exports
            .iter()
            .filter_map(|&star| self.module_of_declaration(star))
            .find_map(|target| self.find_export(target, name, visited))
    }

    /// Target of `export =`, when the module has one that resolves elsewhere.
    fn export_equals_target(&self, module: &Symbol) -> Option<&Symbol> {
        let &equals = module.exports.get("export=")?;
        let target = self.resolve_alias(equals);
        if target == module.id || target == equals {
            return None;
        }
        self.symbol(target)
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// One step of alias resolution.
    pub fn immediate_alias_target(&self, alias: SymbolId) -> Option<SymbolId> {
        let symbol = self.symbol(alias)?;
        let target = symbol.alias.as_ref()?;
        let file = symbol.first_declaration()?.file;
        match target {
            AliasTarget::Import {
                specifier,
                import_name,
            } => {
                let module = self.resolve_module(file, specifier)?;
                self.export_of_module(module, import_name).or_else(|| {
                    if import_name == "default" {
                        self.symbol(module)?.exports.get("export=").copied()
                    } else {
                        None
                    }
                })
            }
            AliasTarget::Namespace { specifier } => {
                let module = self.resolve_module(file, specifier)?;
                let equals = self.symbol(module)?.exports.get("export=").copied();
                Some(equals.unwrap_or(module))
            }
            AliasTarget::Entity { node } => self.resolve_entity_name(node.file, node.node),
            AliasTarget::Symbol(id) => Some(*id),
        }
    }

    /// Follow an alias chain to its end. Returns the last symbol reached,
    /// which is still an alias when the chain is broken.
    pub fn resolve_alias(&self, symbol: SymbolId) -> SymbolId {
        let mut current = symbol;
        let mut seen = FxHashSet::default();
        while self.symbol(current).is_some_and(Symbol::is_alias) && seen.insert(current) {
            match self.immediate_alias_target(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }
}

/// Each top-level key of a JSON object becomes an exported variable; the
/// whole document is the default export.
fn bind_json(symbols: &mut SymbolArena, unit: &SourceUnit, root: NodeRef) -> SymbolId {
    let module = symbols.alloc(symbol_flags::VALUE_MODULE, format!("\"{}\"", unit.path));
    let mut names = vec!["default".to_string()];
    match serde_json::from_str::<serde_json::Value>(&unit.text) {
        Ok(serde_json::Value::Object(map)) => names.extend(map.keys().cloned()),
        Ok(_) => {}
        Err(err) => warn!(path = %unit.path, error = %err, "invalid JSON module"),
    }
    let mut exports = SymbolTable::default();
    for name in names {
        let id = symbols.alloc(symbol_flags::VARIABLE, name.clone());
        if let Some(symbol) = symbols.get_mut(id) {
            symbol.declarations.push(root);
            symbol.parent = Some(module);
        }
        exports.insert(name, id);
    }
    if let Some(symbol) = symbols.get_mut(module) {
        symbol.declarations.push(root);
        symbol.exports = exports;
    }
    module
}
