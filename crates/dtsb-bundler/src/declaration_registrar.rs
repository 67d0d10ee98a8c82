//! Output collections and the text rewriting that fills them.
//!
//! Every declaration is emitted as a splice of its own source text: renames,
//! reference rewrites and modifier changes are recorded as `TextEdits` and
//! applied in one pass, so the result keeps the author's formatting.

use crate::error::BundleError;
use dtsb_binder::{NodeRef, Program, SourceUnit, SymbolId};
use dtsb_common::{TextEdit, TextEdits, TextSpan, get_jsdoc_comment};
use dtsb_parser::parser::node::node_flags;
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

/// How an external symbol is brought into scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import { a } from "m"` or `export { a } from "m"`
    Named,
    /// `import a from "m"`
    Default,
    /// `import * as a from "m"` or `export * as a from "m"`
    Namespace,
    /// `import a = require("m")`
    ImportEquals,
}

impl ImportKind {
    pub fn of_declaration(kind: u16) -> Option<ImportKind> {
        match kind {
            syntax_kind_ext::IMPORT_SPECIFIER | syntax_kind_ext::EXPORT_SPECIFIER => Some(ImportKind::Named),
            syntax_kind_ext::IMPORT_CLAUSE => Some(ImportKind::Default),
            syntax_kind_ext::NAMESPACE_IMPORT | syntax_kind_ext::NAMESPACE_EXPORT => Some(ImportKind::Namespace),
            syntax_kind_ext::IMPORT_EQUALS_DECLARATION => Some(ImportKind::ImportEquals),
            _ => None,
        }
    }

    /// Local name the import binds when referenced as `name`.
    pub fn binding<'n>(self, name: &'n str, import_name: &'n str) -> &'n str {
        match self {
            ImportKind::Named if name != "default" => name,
            _ => import_name,
        }
    }
}

/// Reference rewrites, grouped by the declaration index they apply to.
#[derive(Clone, Debug, Default)]
pub struct Replacements(Vec<Vec<TextEdit>>);

impl Replacements {
    pub fn push(&mut self, declaration_index: usize, edit: TextEdit) {
        if self.0.len() <= declaration_index {
            self.0.resize_with(declaration_index + 1, Vec::new);
        }
        if let Some(edits) = self.0.get_mut(declaration_index) {
            edits.push(edit);
        }
    }

    pub fn for_declaration(&self, declaration_index: usize) -> &[TextEdit] {
        self.0.get(declaration_index).map_or(&[], Vec::as_slice)
    }
}

/// Modifier changes for `register_internal`.
#[derive(Clone, Copy, Debug)]
pub struct InternalOptions<'a> {
    pub export: bool,
    pub default: bool,
    /// Name the declaration is emitted under, when it differs from its own.
    pub new_name: Option<&'a str>,
    pub replacements: &'a Replacements,
}

pub struct DeclarationRegistrar<'p> {
    program: &'p Program,
    pub imports: IndexSet<String>,
    /// Declaration text to its documentation comment.
    pub exports: IndexMap<String, String>,
    /// Bodies of the `declare global { }` block.
    pub globals: IndexMap<String, String>,
}

impl<'p> DeclarationRegistrar<'p> {
    pub fn new(program: &'p Program) -> DeclarationRegistrar<'p> {
        DeclarationRegistrar {
            program,
            imports: IndexSet::new(),
            exports: IndexMap::new(),
            globals: IndexMap::new(),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn register_internal(&mut self, symbol: SymbolId, options: InternalOptions<'_>) -> Result<(), BundleError> {
        let program = self.program;
        let Some(data) = program.symbol(symbol) else {
            return Err(BundleError::NoDeclarations {
                name: format!("#{}", symbol.0),
            });
        };
        let name = data.escaped_name.as_str();
        let is_namespace = data
            .declarations
            .iter()
            .any(|&d| program.node(d).is_some_and(|n| n.kind == syntax_kind_ext::SOURCE_FILE));
        if is_namespace {
            return Err(BundleError::WholeNamespaceExport { name: name.to_string() });
        }

        for (index, &decl) in data.declarations.iter().enumerate() {
            let text = self.declaration_text(decl, name, options, options.replacements.for_declaration(index))?;
            let comment = self.documentation(decl);
            debug!(name, export = options.export, default = options.default, "register declaration");
            self.exports.insert(text, comment);
        }
        Ok(())
    }

    /// Re-emit the project declarations of a global symbol inside the
    /// `declare global { }` block.
    pub fn register_global(&mut self, symbol: SymbolId) -> Result<(), BundleError> {
        let program = self.program;
        let Some(data) = program.symbol(symbol) else {
            return Ok(());
        };
        for &decl in &data.declarations {
            let unit = program.unit(decl.file);
            if !unit.is_project_file() {
                continue;
            }
            let text = global_declaration_text(unit, decl.node, &data.escaped_name)?;
            let comment = self.documentation(decl);
            self.globals.insert(text, comment);
        }
        Ok(())
    }

    /// `export { local as exported };`, `export default local;` or
    /// `export { local };`.
    pub fn register_alias(&mut self, local: &str, exported: &str) {
        let line = if exported == "default" {
            format!("export default {local};")
        } else if exported == local {
            format!("export {{ {local} }};")
        } else {
            format!("export {{ {local} as {exported} }};")
        };
        self.exports.insert(line, String::new());
    }

    /// Import an external symbol bound as `local`, optionally re-exporting
    /// it as `name`.
    ///
    /// Returns the local binding the import introduces.
    pub fn register_external(
        &mut self,
        symbol: SymbolId,
        name: &str,
        kind: ImportKind,
        import_name: &str,
        module: &str,
        local: &str,
        re_export: bool,
    ) -> String {
        if self
            .program
            .symbol(symbol)
            .is_some_and(|s| s.declarations.len() > 1)
        {
            warn!(name, module, "external symbol has several declarations, only the first import is used");
        }

        if kind == ImportKind::Named && import_name == "default" && name == "default" {
            if re_export {
                self.exports
                    .insert(format!("export {{ default }} from \"{module}\";"), String::new());
            }
            return import_name.to_string();
        }

        let statement = match kind {
            ImportKind::Named if local == import_name => format!("import {{ {import_name} }} from \"{module}\";"),
            ImportKind::Named => format!("import {{ {import_name} as {local} }} from \"{module}\";"),
            ImportKind::Default => format!("import {local} from \"{module}\";"),
            ImportKind::Namespace => format!("import * as {local} from \"{module}\";"),
            ImportKind::ImportEquals => format!("import {local} = require(\"{module}\");"),
        };
        self.imports.insert(statement);
        if re_export {
            self.register_alias(local, name);
        }
        local.to_string()
    }

    pub fn register_star(&mut self, module: &str) {
        self.exports
            .insert(format!("export * from \"{module}\";"), String::new());
    }

    // =========================================================================
    // Text rewriting
    // =========================================================================

    fn declaration_text(
        &self,
        decl: NodeRef,
        name: &str,
        options: InternalOptions<'_>,
        replacements: &[TextEdit],
    ) -> Result<String, BundleError> {
        let unit = self.program.unit(decl.file);
        let arena = &unit.arena;
        let Some(node) = arena.get(decl.node) else {
            return Err(BundleError::NoDeclarations { name: name.to_string() });
        };

        let mut edits = TextEdits::new(node.start);
        if let Some(new_name) = options.new_name {
            rename(unit, decl.node, name, new_name, &mut edits)?;
        }
        for edit in replacements {
            edits.push(edit.clone());
        }

        if node.kind == syntax_kind_ext::VARIABLE_DECLARATION {
            if options.default {
                return Err(BundleError::InvalidModifier {
                    name: name.to_string(),
                    reason: "a variable declaration cannot carry a default modifier",
                });
            }
            let keyword = variable_keyword(unit, decl.node);
            let body = apply(&edits, unit, decl.node, name)?;
            let export = if options.export { "export " } else { "" };
            return Ok(format!("{export}declare {keyword} {body};"));
        }

        let prefix = modifier_edits(unit, decl.node, name, options, &mut edits)?;
        let body = apply(&edits, unit, decl.node, name)?;
        Ok(format!("{prefix}{body}"))
    }

    /// Last `/** */` comment in front of the statement holding `decl`.
    fn documentation(&self, decl: NodeRef) -> String {
        let unit = self.program.unit(decl.file);
        let statement = statement_of(unit, decl.node);
        unit.node(statement)
            .and_then(|node| get_jsdoc_comment(&unit.text, node.pos, node.start))
            .unwrap_or_default()
            .to_string()
    }
}

/// Variable declarators are documented by their statement.
fn statement_of(unit: &SourceUnit, index: NodeIndex) -> NodeIndex {
    let arena = &unit.arena;
    if arena.kind(index) == syntax_kind_ext::VARIABLE_DECLARATION {
        arena.parent_of(arena.parent_of(index))
    } else {
        index
    }
}

fn variable_keyword(unit: &SourceUnit, declaration: NodeIndex) -> &'static str {
    let list = unit.arena.parent_of(declaration);
    let flags = unit.node(list).map_or(0, |n| n.flags);
    if flags & node_flags::LET != 0 {
        "let"
    } else if flags & (node_flags::CONST | node_flags::USING) != 0 {
        "const"
    } else {
        "var"
    }
}

fn apply(edits: &TextEdits, unit: &SourceUnit, index: NodeIndex, name: &str) -> Result<String, BundleError> {
    edits
        .apply(unit.node_text(index))
        .map_err(|err| BundleError::from_edit(name, err))
}

/// Rename the declaration. Unnamed default declarations get the name after
/// their declaration keyword.
fn rename(
    unit: &SourceUnit,
    index: NodeIndex,
    name: &str,
    new_name: &str,
    edits: &mut TextEdits,
) -> Result<(), BundleError> {
    let arena = &unit.arena;
    let name_node = arena.declaration_name(index);
    if let Some(node) = unit.node(name_node) {
        edits.replace(TextSpan::new(node.start, node.end), unit.node_text(name_node), new_name);
        return Ok(());
    }

    let unnamed = || BundleError::UnnamedDefault { name: name.to_string() };
    if !arena.has_modifier(index, SyntaxKind::DefaultKeyword) {
        return Err(unnamed());
    }
    let after_modifiers = arena
        .modifiers(index)
        .and_then(|list| list.iter().filter_map(|m| unit.node(m)).map(|m| m.end).max())
        .ok_or_else(unnamed)?;
    let text = unit.text.as_bytes();
    let mut start = after_modifiers as usize;
    while text.get(start).is_some_and(u8::is_ascii_whitespace) {
        start += 1;
    }
    let mut end = start;
    while text.get(end).is_some_and(u8::is_ascii_alphabetic) {
        end += 1;
    }
    let keyword = unit.text.get(start..end).filter(|k| !k.is_empty()).ok_or_else(unnamed)?;
    if keyword == "function" && text.get(end) == Some(&b' ') {
        edits.replace(
            TextSpan::new(start as u32, end as u32 + 1),
            "function ",
            format!("function {new_name}"),
        );
    } else {
        edits.replace(
            TextSpan::new(start as u32, end as u32),
            keyword,
            format!("{keyword} {new_name}"),
        );
    }
    Ok(())
}

/// Span of a modifier plus one following blank, for deletion.
fn modifier_with_blank(unit: &SourceUnit, modifier: NodeIndex) -> Option<(TextSpan, &str)> {
    let node = unit.node(modifier)?;
    let mut end = node.end;
    if unit.text.as_bytes().get(end as usize).is_some_and(|b| *b == b' ' || *b == b'\t') {
        end += 1;
    }
    let span = TextSpan::new(node.start, end);
    Some((span, span.slice(&unit.text)))
}

/// Record the `export` / `default` / `declare` changes and return the text
/// to put in front of the declaration.
fn modifier_edits(
    unit: &SourceUnit,
    index: NodeIndex,
    name: &str,
    options: InternalOptions<'_>,
    edits: &mut TextEdits,
) -> Result<String, BundleError> {
    let arena = &unit.arena;
    let kind = arena.kind(index);
    let is_interface = kind == syntax_kind_ext::INTERFACE_DECLARATION;
    let is_import_equals = kind == syntax_kind_ext::IMPORT_EQUALS_DECLARATION;
    let export = arena.get_modifier(index, SyntaxKind::ExportKeyword);
    let default = arena.get_modifier(index, SyntaxKind::DefaultKeyword);
    let declare = arena.get_modifier(index, SyntaxKind::DeclareKeyword);
    let mut has_declare = declare.is_some();
    let mut prefix = String::new();

    let replace = |edits: &mut TextEdits, modifier: NodeIndex, by: &str| {
        if let Some(node) = unit.node(modifier) {
            edits.replace(TextSpan::new(node.start, node.end), unit.node_text(modifier), by);
        }
    };
    let delete = |edits: &mut TextEdits, modifier: NodeIndex| {
        if let Some((span, expected)) = modifier_with_blank(unit, modifier) {
            edits.delete(span, expected);
        }
    };

    if options.export && export.is_none() {
        prefix.push_str("export ");
    }

    if options.default && default.is_none() {
        if !options.export {
            return Err(BundleError::InvalidModifier {
                name: name.to_string(),
                reason: "a default modifier needs an export modifier",
            });
        }
        if declare.is_some() {
            replace(edits, declare, "default");
            has_declare = false;
        } else if export.is_some() {
            replace(edits, export, "export default");
        } else {
            prefix.push_str("default ");
        }
    }

    if default.is_some() && !options.default {
        if is_interface {
            delete(edits, default);
        } else {
            replace(edits, default, "declare");
            has_declare = true;
        }
    }

    if export.is_some() && !options.export {
        if options.default {
            return Err(BundleError::InvalidModifier {
                name: name.to_string(),
                reason: "the export modifier of a default export cannot be removed",
            });
        }
        delete(edits, export);
    }

    if !options.export && !options.default && !has_declare && !is_interface && !is_import_equals {
        prefix.push_str("declare ");
    }
    Ok(prefix)
}

/// A global declaration without its `declare` keyword. Variables are split
/// out of their statement.
fn global_declaration_text(unit: &SourceUnit, index: NodeIndex, name: &str) -> Result<String, BundleError> {
    let arena = &unit.arena;
    if arena.kind(index) == syntax_kind_ext::VARIABLE_DECLARATION {
        let keyword = variable_keyword(unit, index);
        return Ok(format!("{keyword} {};", unit.node_text(index)));
    }
    let Some(node) = unit.node(index) else {
        return Err(BundleError::NoDeclarations { name: name.to_string() });
    };
    let mut edits = TextEdits::new(node.start);
    let declare = arena.get_modifier(index, SyntaxKind::DeclareKeyword);
    if let Some((span, expected)) = modifier_with_blank(unit, declare) {
        edits.delete(span, expected);
    }
    apply(&edits, unit, index, name)
}
