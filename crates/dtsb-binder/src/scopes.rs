//! Name resolution from a node through the enclosing scopes.
//!
//! Lookup order from a reference outward: type parameters and parameters of
//! enclosing signatures and declarations, mapped-type parameters, `infer`
//! parameters of an enclosing conditional true branch, namespace bodies
//! (locals, then the namespace's exports), the file scope of module files,
//! and finally the globals.

use crate::program::Program;
use crate::source::{FileId, SourceUnit};
use crate::symbols::SymbolId;
use dtsb_parser::{NodeArena, NodeIndex, NodeList, syntax_kind_ext};
use dtsb_scanner::SyntaxKind;
use smallvec::SmallVec;

impl Program {
    /// Symbol declared or referenced at `node`.
    ///
    /// Identifiers in declaration-name position give the declared symbol;
    /// any other identifier is resolved through the scope chain. Qualified
    /// names and type references resolve their rightmost name, and `import()`
    /// types give the imported module.
    pub fn symbol_at_node(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        let unit = self.unit(file);
        let arena = &unit.arena;
        let n = arena.get(node)?;
        match n.kind {
            k if k == SyntaxKind::Identifier as u16 => self.symbol_at_identifier(unit, node),
            syntax_kind_ext::QUALIFIED_NAME => {
                let right = arena.get_qualified_name(n)?.right;
                self.symbol_at_identifier(unit, right)
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                let name = arena.get_access_expr(n)?.name_or_argument;
                self.symbol_at_identifier(unit, name)
            }
            syntax_kind_ext::TYPE_REFERENCE
            | syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS
            | syntax_kind_ext::TYPE_QUERY => {
                let name = arena.get_type_ref(n)?.type_name;
                self.symbol_at_node(file, name)
            }
            syntax_kind_ext::IMPORT_TYPE => {
                let qualifier = arena.get_import_type(n)?.qualifier;
                if qualifier.is_some() {
                    self.symbol_at_node(file, qualifier)
                } else {
                    self.symbol_of_import_type(file, node)
                }
            }
            _ => unit.node_symbols.get(&node).copied(),
        }
    }

    /// Module symbol of an `import("m")` type's argument.
    pub fn symbol_of_import_type(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        let specifier = self.unit(file).arena.module_specifier_text(node)?;
        self.resolve_module(file, specifier)
    }

    fn symbol_at_identifier(&self, unit: &SourceUnit, node: NodeIndex) -> Option<SymbolId> {
        let arena = &unit.arena;
        let parent = arena.parent_of(node);
        let parent_node = arena.get(parent)?;
        match parent_node.kind {
            syntax_kind_ext::QUALIFIED_NAME => {
                let name = arena.get_qualified_name(parent_node)?;
                if name.right == node {
                    return self.member_of_entity(unit.id, name.left, node);
                }
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                let access = arena.get_access_expr(parent_node)?;
                if access.name_or_argument == node {
                    return self.member_of_entity(unit.id, access.expression, node);
                }
            }
            syntax_kind_ext::IMPORT_SPECIFIER | syntax_kind_ext::EXPORT_SPECIFIER => {
                return unit.node_symbols.get(&parent).copied();
            }
            _ => {}
        }
        if arena.declaration_name(parent) == node {
            return unit.node_symbols.get(&parent).copied();
        }
        self.resolve_entity_name(unit.id, node)
    }

    fn member_of_entity(&self, file: FileId, container: NodeIndex, name: NodeIndex) -> Option<SymbolId> {
        let container = self.resolve_entity_name(file, container)?;
        let name = self.unit(file).arena.identifier_text(name)?;
        self.member_of(container, name)
    }

    /// Export `name` of the symbol `container` resolves to.
    pub fn member_of(&self, container: SymbolId, name: &str) -> Option<SymbolId> {
        let target = self.resolve_alias(container);
        self.export_of_module(target, name)
    }

    /// Resolve an identifier, qualified name or property access expression.
    pub fn resolve_entity_name(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        let unit = self.unit(file);
        let arena = &unit.arena;
        let n = arena.get(node)?;
        match n.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                let name = arena.identifier_text(node)?;
                if let Some(import_type) = import_type_of_qualifier_root(arena, node) {
                    let module = self.symbol_of_import_type(file, import_type)?;
                    return self.member_of(module, name);
                }
                self.resolve_name(file, node, name)
            }
            syntax_kind_ext::QUALIFIED_NAME => {
                let qualified = arena.get_qualified_name(n)?;
                self.member_of_entity(file, qualified.left, qualified.right)
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                let access = arena.get_access_expr(n)?;
                self.member_of_entity(file, access.expression, access.name_or_argument)
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                let inner = arena.get_parenthesized(n)?.expression;
                self.resolve_entity_name(file, inner)
            }
            _ => None,
        }
    }

    /// Look `name` up from `location` outward.
    pub fn resolve_name(&self, file: FileId, location: NodeIndex, name: &str) -> Option<SymbolId> {
        let unit = self.unit(file);
        let arena = &unit.arena;
        let declared = |decl: NodeIndex| unit.node_symbols.get(&decl).copied();

        for ancestor in arena.ancestors(location) {
            let Some(node) = arena.get(ancestor) else {
                break;
            };
            match node.kind {
                syntax_kind_ext::MAPPED_TYPE => {
                    if let Some(mapped) = arena.get_mapped_type(node)
                        && arena.declaration_name_text(mapped.type_parameter) == Some(name)
                    {
                        return declared(mapped.type_parameter);
                    }
                }
                syntax_kind_ext::CONDITIONAL_TYPE => {
                    if let Some(conditional) = arena.get_conditional_type(node)
                        && arena.is_descendant_of(location, conditional.true_type)
                        && let Some(param) = find_infer_parameter(arena, conditional.extends_type, name)
                    {
                        return declared(param);
                    }
                }
                syntax_kind_ext::MODULE_BLOCK => {
                    if let Some(&id) = unit.block_locals.get(&ancestor).and_then(|t| t.get(name)) {
                        return Some(id);
                    }
                }
                syntax_kind_ext::MODULE_DECLARATION => {
                    if let Some(&id) = unit.block_locals.get(&ancestor).and_then(|t| t.get(name)) {
                        return Some(id);
                    }
                    if let Some(namespace) = declared(ancestor)
                        && let Some(&id) = self.symbol(namespace).and_then(|s| s.exports.get(name))
                    {
                        return Some(id);
                    }
                }
                syntax_kind_ext::SOURCE_FILE => {
                    if unit.is_module
                        && let Some(&id) = unit.locals.get(name)
                    {
                        return Some(id);
                    }
                }
                _ => {
                    if let Some(params) = type_parameters_of(arena, ancestor)
                        && let Some(param) = find_named(arena, params, name)
                    {
                        return declared(param);
                    }
                    if let Some(signature) = arena.get_signature(node)
                        && let Some(param) = find_named(arena, &signature.parameters, name)
                    {
                        return declared(param);
                    }
                }
            }
        }
        self.globals().get(name).copied()
    }
}

fn type_parameters_of(arena: &NodeArena, idx: NodeIndex) -> Option<&NodeList> {
    let node = arena.get(idx)?;
    if let Some(signature) = arena.get_signature(node) {
        return signature.type_parameters.as_ref();
    }
    if let Some(class) = arena.get_class(node) {
        return class.type_parameters.as_ref();
    }
    arena.get_type_alias(node)?.type_parameters.as_ref()
}

fn find_named(arena: &NodeArena, list: &NodeList, name: &str) -> Option<NodeIndex> {
    list.iter().find(|&decl| arena.declaration_name_text(decl) == Some(name))
}

/// `infer X` declared anywhere in an `extends` clause.
fn find_infer_parameter(arena: &NodeArena, extends_type: NodeIndex, name: &str) -> Option<NodeIndex> {
    let mut stack: SmallVec<[NodeIndex; 16]> = SmallVec::new();
    stack.push(extends_type);
    while let Some(idx) = stack.pop() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        if let Some(infer) = arena.get_infer_type(node)
            && arena.declaration_name_text(infer.type_parameter) == Some(name)
        {
            return Some(infer.type_parameter);
        }
        stack.extend(arena.children(idx));
    }
    None
}

/// For the leftmost identifier of an `import("m").A.B` qualifier, the
/// import type node.
fn import_type_of_qualifier_root(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    let mut current = node;
    loop {
        let parent = arena.parent_of(current);
        let parent_node = arena.get(parent)?;
        match parent_node.kind {
            syntax_kind_ext::QUALIFIED_NAME if arena.get_qualified_name(parent_node)?.left == current => {
                current = parent;
            }
            syntax_kind_ext::IMPORT_TYPE if arena.get_import_type(parent_node)?.qualifier == current => {
                return Some(parent);
            }
            _ => return None,
        }
    }
}
