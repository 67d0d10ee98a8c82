//! Tree navigation and syntax retrieval on `NodeArena`.

use super::base::{NodeIndex, NodeList};
use super::node::{NodeArena, NodeData};
use crate::parser::syntax_kind_ext;
use dtsb_scanner::SyntaxKind;
use smallvec::SmallVec;

pub type ChildList = SmallVec<[NodeIndex; 8]>;

fn push(children: &mut ChildList, index: NodeIndex) {
    if index.is_some() {
        children.push(index);
    }
}

fn push_list(children: &mut ChildList, list: Option<&NodeList>) {
    if let Some(list) = list {
        children.extend(list.iter().filter(|n| n.is_some()));
    }
}

impl NodeArena {
    /// Direct children of a node, in source order.
    pub fn children(&self, index: NodeIndex) -> ChildList {
        let mut out = ChildList::new();
        let Some(node) = self.get(index) else {
            return out;
        };
        let c = &mut out;
        match &node.data {
            NodeData::None | NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::QualifiedName(d) => {
                push(c, d.left);
                push(c, d.right);
            }
            NodeData::ComputedProperty(d) => push(c, d.expression),
            NodeData::TypeParameter(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push(c, d.constraint);
                push(c, d.default);
            }
            NodeData::Parameter(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push(c, d.type_annotation);
                push(c, d.initializer);
            }
            NodeData::Property(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push(c, d.type_annotation);
                push(c, d.initializer);
            }
            NodeData::Signature(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push_list(c, d.type_parameters.as_ref());
                push_list(c, Some(&d.parameters));
                push(c, d.type_annotation);
            }
            NodeData::TypePredicate(d) => {
                push(c, d.parameter_name);
                push(c, d.type_node);
            }
            NodeData::TypeRef(d) => {
                push(c, d.type_name);
                push_list(c, d.type_arguments.as_ref());
            }
            NodeData::WrappedType(d) => push(c, d.type_node),
            NodeData::List(d) => push_list(c, Some(&d.elements)),
            NodeData::ConditionalType(d) => {
                push(c, d.check_type);
                push(c, d.extends_type);
                push(c, d.true_type);
                push(c, d.false_type);
            }
            NodeData::InferType(d) => push(c, d.type_parameter),
            NodeData::IndexedAccess(d) => {
                push(c, d.object_type);
                push(c, d.index_type);
            }
            NodeData::MappedType(d) => {
                push(c, d.type_parameter);
                push(c, d.name_type);
                push(c, d.type_node);
            }
            NodeData::LiteralType(d) => push(c, d.literal),
            NodeData::NamedTupleMember(d) => {
                push(c, d.name);
                push(c, d.type_node);
            }
            NodeData::Template(d) => {
                push(c, d.head);
                push_list(c, Some(&d.spans));
            }
            NodeData::TemplateSpan(d) => {
                push(c, d.expression);
                push(c, d.literal);
            }
            NodeData::ImportType(d) => {
                push(c, d.argument);
                push(c, d.qualifier);
                push_list(c, d.type_arguments.as_ref());
            }
            NodeData::BindingElement(d) => {
                push(c, d.property_name);
                push(c, d.name);
                push(c, d.initializer);
            }
            NodeData::PropertyAssignment(d) => {
                push(c, d.name);
                push(c, d.initializer);
            }
            NodeData::AccessExpr(d) => {
                push(c, d.expression);
                push(c, d.name_or_argument);
            }
            NodeData::CallExpr(d) => {
                push(c, d.expression);
                push_list(c, d.type_arguments.as_ref());
                push_list(c, d.arguments.as_ref());
            }
            NodeData::UnaryExpr(d) => push(c, d.operand),
            NodeData::BinaryExpr(d) => {
                push(c, d.left);
                push(c, d.right);
            }
            NodeData::Parenthesized(d) => push(c, d.expression),
            NodeData::Heritage(d) => push_list(c, Some(&d.types)),
            NodeData::VariableStatement(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.declaration_list);
            }
            NodeData::VariableDeclaration(d) => {
                push(c, d.name);
                push(c, d.type_annotation);
                push(c, d.initializer);
            }
            NodeData::Class(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push_list(c, d.type_parameters.as_ref());
                push_list(c, d.heritage_clauses.as_ref());
                push_list(c, Some(&d.members));
            }
            NodeData::TypeAlias(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push_list(c, d.type_parameters.as_ref());
                push(c, d.type_node);
            }
            NodeData::Enum(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push_list(c, Some(&d.members));
            }
            NodeData::EnumMember(d) => {
                push(c, d.name);
                push(c, d.initializer);
            }
            NodeData::Module(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push(c, d.body);
            }
            NodeData::ImportEquals(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.name);
                push(c, d.module_reference);
            }
            NodeData::ExternalModuleRef(d) => push(c, d.expression),
            NodeData::ImportDecl(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.import_clause);
                push(c, d.module_specifier);
            }
            NodeData::ImportClause(d) => {
                push(c, d.name);
                push(c, d.named_bindings);
            }
            NodeData::NamedNode(d) => push(c, d.name),
            NodeData::Specifier(d) => {
                push(c, d.property_name);
                push(c, d.name);
            }
            NodeData::ExportDecl(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.export_clause);
                push(c, d.module_specifier);
            }
            NodeData::ExportAssignment(d) => {
                push_list(c, d.modifiers.as_ref());
                push(c, d.expression);
            }
            NodeData::SourceFile(d) => {
                push_list(c, Some(&d.statements));
                push(c, d.end_of_file_token);
            }
        }
        out
    }

    /// Fill in `parent` links for the tree rooted at `root`.
    pub fn set_parents(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            for child in self.children(parent) {
                if let Some(node) = self.get_mut(child) {
                    node.parent = parent;
                }
                stack.push(child);
            }
        }
    }

    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    /// Proper ancestors of a node, nearest first.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(self.parent_of(index)), move |&n| Some(self.parent_of(n)))
            .take_while(|n| n.is_some())
    }

    /// Whether `inner` is `outer` or lies inside it.
    pub fn is_descendant_of(&self, inner: NodeIndex, outer: NodeIndex) -> bool {
        inner == outer || self.ancestors(inner).any(|n| n == outer)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Modifier list of a declaration.
    pub fn modifiers(&self, index: NodeIndex) -> Option<&NodeList> {
        let node = self.get(index)?;
        match &node.data {
            NodeData::TypeParameter(d) => d.modifiers.as_ref(),
            NodeData::Parameter(d) => d.modifiers.as_ref(),
            NodeData::Property(d) => d.modifiers.as_ref(),
            NodeData::Signature(d) => d.modifiers.as_ref(),
            NodeData::VariableStatement(d) => d.modifiers.as_ref(),
            NodeData::Class(d) => d.modifiers.as_ref(),
            NodeData::TypeAlias(d) => d.modifiers.as_ref(),
            NodeData::Enum(d) => d.modifiers.as_ref(),
            NodeData::Module(d) => d.modifiers.as_ref(),
            NodeData::ImportEquals(d) => d.modifiers.as_ref(),
            NodeData::ImportDecl(d) => d.modifiers.as_ref(),
            NodeData::ExportDecl(d) => d.modifiers.as_ref(),
            NodeData::ExportAssignment(d) => d.modifiers.as_ref(),
            _ => None,
        }
    }

    /// Modifier token node of the given keyword kind, or NONE.
    pub fn get_modifier(&self, index: NodeIndex, kind: SyntaxKind) -> NodeIndex {
        self.modifiers(index)
            .and_then(|list| list.iter().find(|&m| self.kind(m) == kind as u16))
            .unwrap_or(NodeIndex::NONE)
    }

    #[inline]
    pub fn has_modifier(&self, index: NodeIndex, kind: SyntaxKind) -> bool {
        self.get_modifier(index, kind).is_some()
    }

    /// Name node of a declaration, NONE for unnamed declarations.
    pub fn declaration_name(&self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        match &node.data {
            NodeData::TypeParameter(d) => d.name,
            NodeData::Parameter(d) => d.name,
            NodeData::Property(d) => d.name,
            NodeData::Signature(d) => d.name,
            NodeData::VariableDeclaration(d) => d.name,
            NodeData::Class(d) => d.name,
            NodeData::TypeAlias(d) => d.name,
            NodeData::Enum(d) => d.name,
            NodeData::EnumMember(d) => d.name,
            NodeData::Module(d) => d.name,
            NodeData::ImportEquals(d) => d.name,
            NodeData::ImportClause(d) => d.name,
            NodeData::NamedNode(d) => d.name,
            NodeData::Specifier(d) => d.name,
            NodeData::BindingElement(d) => d.name,
            NodeData::NamedTupleMember(d) => d.name,
            NodeData::PropertyAssignment(d) => d.name,
            _ => NodeIndex::NONE,
        }
    }

    /// Text of an identifier or the cooked value of a literal.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        match &node.data {
            NodeData::Identifier(d) => Some(d.escaped_text.as_str()),
            NodeData::Literal(d) => Some(d.text.as_str()),
            _ => None,
        }
    }

    /// Text of a declaration's name, when it has a simple one.
    pub fn declaration_name_text(&self, index: NodeIndex) -> Option<&str> {
        self.identifier_text(self.declaration_name(index))
    }

    /// Module specifier text of an import, export, import-equals, or the
    /// quoted name of an ambient module declaration.
    pub fn module_specifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        let specifier = match &node.data {
            NodeData::ImportDecl(d) => d.module_specifier,
            NodeData::ExportDecl(d) => d.module_specifier,
            NodeData::ImportEquals(d) => {
                let reference = self.get(d.module_reference)?;
                self.get_external_module_ref(reference)?.expression
            }
            NodeData::Module(d) if self.kind(d.name) == SyntaxKind::StringLiteral as u16 => d.name,
            NodeData::ImportType(d) => self.get_literal_type(self.get(d.argument)?)?.literal,
            _ => return None,
        };
        self.identifier_text(specifier)
    }

    /// Statements of a source file or module block.
    pub fn statements(&self, index: NodeIndex) -> Option<&NodeList> {
        let node = self.get(index)?;
        match &node.data {
            NodeData::SourceFile(d) => Some(&d.statements),
            NodeData::List(d) if node.kind == syntax_kind_ext::MODULE_BLOCK => Some(&d.elements),
            _ => None,
        }
    }

    /// Whether the node is a `declare module "name"` declaration.
    pub fn is_ambient_module(&self, index: NodeIndex) -> bool {
        self.get(index).is_some_and(|node| {
            node.kind == syntax_kind_ext::MODULE_DECLARATION
                && self
                    .get_module(node)
                    .is_some_and(|d| self.kind(d.name) == SyntaxKind::StringLiteral as u16)
        })
    }

    /// Whether the node is a `declare global { }` block.
    pub fn is_global_augmentation(&self, index: NodeIndex) -> bool {
        self.get(index).is_some_and(|node| {
            node.kind == syntax_kind_ext::MODULE_DECLARATION
                && node.flags & super::node::node_flags::GLOBAL_AUGMENTATION != 0
        })
    }

    /// Source text covered by a node, excluding leading trivia.
    pub fn node_text<'a>(&self, source: &'a str, index: NodeIndex) -> &'a str {
        self.get(index)
            .and_then(|n| source.get(n.start as usize..n.end as usize))
            .unwrap_or("")
    }
}
