//! AST node storage.
//!
//! Nodes live in a flat `NodeArena` and refer to each other through
//! `NodeIndex`. Every node carries its kind, its full start (`pos`, including
//! leading trivia), its token start, its end, its parent, and a typed payload.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;

pub mod node_flags {
    pub const NONE: u32 = 0;
    /// `let` variable declaration list.
    pub const LET: u32 = 1 << 0;
    /// `const` variable declaration list.
    pub const CONST: u32 = 1 << 1;
    /// `using` variable declaration list.
    pub const USING: u32 = 1 << 2;
    /// Module declared with the `namespace` keyword.
    pub const NAMESPACE: u32 = 1 << 3;
    /// `declare global { }`.
    pub const GLOBAL_AUGMENTATION: u32 = 1 << 4;
    /// Inside a `declare` context or a declaration file.
    pub const AMBIENT: u32 = 1 << 5;
    /// Source file contains an import or export.
    pub const EXTERNAL_MODULE: u32 = 1 << 6;
    /// Nested module of a dotted name (`B` in `namespace A.B {}`).
    pub const NESTED_NAMESPACE: u32 = 1 << 7;
}

#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub kind: u16,
    pub flags: u32,
    /// Start of leading trivia.
    pub pos: u32,
    /// Start of the first token.
    pub start: u32,
    pub end: u32,
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn is_kind(&self, kind: u16) -> bool {
        self.kind == kind
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    /// Cooked value (unescaped string contents, digits).
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeParameterData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub modifiers: Option<NodeList>,
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub exclamation_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Shared by methods, constructors, accessors, call/construct/index
/// signatures, function declarations and function/constructor types.
#[derive(Clone, Debug, Serialize)]
pub struct SignatureData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypePredicateData {
    pub asserts_modifier: bool,
    pub parameter_name: NodeIndex,
    pub type_node: NodeIndex,
}

/// Type references, heritage expressions and `typeof` queries.
#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Types wrapping a single type: array, optional, rest, parenthesized, and
/// type operators (`operator` holds the keyword kind for the latter).
#[derive(Clone, Debug, Serialize)]
pub struct WrappedTypeData {
    pub operator: u16,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct InferTypeData {
    pub type_parameter: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexedAccessData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct MappedTypeData {
    /// `ReadonlyKeyword`, `PlusToken`, `MinusToken`, or 0.
    pub readonly_token: u16,
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    /// `QuestionToken`, `PlusToken`, `MinusToken`, or 0.
    pub question_token: u16,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiteralTypeData {
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct NamedTupleMemberData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateData {
    pub head: NodeIndex,
    pub spans: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportTypeData {
    pub is_type_of: bool,
    pub argument: NodeIndex,
    pub qualifier: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingElementData {
    pub dot_dot_dot_token: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: u16,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`.
    pub token: u16,
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableStatementData {
    pub modifiers: Option<NodeList>,
    pub declaration_list: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub exclamation_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Classes and interfaces.
#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleData {
    pub modifiers: Option<NodeList>,
    /// Identifier (`global` for global augmentations) or string literal.
    pub name: NodeIndex,
    /// `MODULE_BLOCK`, a nested `MODULE_DECLARATION`, or NONE.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportEqualsData {
    pub modifiers: Option<NodeList>,
    pub is_type_only: bool,
    pub name: NodeIndex,
    /// `EXTERNAL_MODULE_REFERENCE` or an entity name.
    pub module_reference: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExternalModuleRefData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    pub modifiers: Option<NodeList>,
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportClauseData {
    pub is_type_only: bool,
    pub name: NodeIndex,
    pub named_bindings: NodeIndex,
}

/// `* as name` in imports and exports, and `export as namespace name`.
#[derive(Clone, Debug, Serialize)]
pub struct NamedNodeData {
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpecifierData {
    pub is_type_only: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportDeclData {
    pub modifiers: Option<NodeList>,
    pub is_type_only: bool,
    /// `NAMED_EXPORTS`, `NAMESPACE_EXPORT`, or NONE for `export *`.
    pub export_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportAssignmentData {
    pub modifiers: Option<NodeList>,
    pub is_export_equals: bool,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub end_of_file_token: NodeIndex,
    pub file_name: String,
}

#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    /// Tokens, keyword types, modifiers, `this` types.
    None,
    Identifier(IdentifierData),
    Literal(LiteralData),
    QualifiedName(QualifiedNameData),
    ComputedProperty(ComputedPropertyData),
    TypeParameter(TypeParameterData),
    Parameter(ParameterData),
    Property(PropertyData),
    Signature(SignatureData),
    TypePredicate(TypePredicateData),
    TypeRef(TypeRefData),
    WrappedType(WrappedTypeData),
    List(ListData),
    ConditionalType(ConditionalTypeData),
    InferType(InferTypeData),
    IndexedAccess(IndexedAccessData),
    MappedType(MappedTypeData),
    LiteralType(LiteralTypeData),
    NamedTupleMember(NamedTupleMemberData),
    Template(TemplateData),
    TemplateSpan(TemplateSpanData),
    ImportType(ImportTypeData),
    BindingElement(BindingElementData),
    PropertyAssignment(PropertyAssignmentData),
    AccessExpr(AccessExprData),
    CallExpr(CallExprData),
    UnaryExpr(UnaryExprData),
    BinaryExpr(BinaryExprData),
    Parenthesized(ParenthesizedData),
    Heritage(HeritageData),
    VariableStatement(VariableStatementData),
    VariableDeclaration(VariableDeclarationData),
    Class(ClassData),
    TypeAlias(TypeAliasData),
    Enum(EnumData),
    EnumMember(EnumMemberData),
    Module(ModuleData),
    ImportEquals(ImportEqualsData),
    ExternalModuleRef(ExternalModuleRefData),
    ImportDecl(ImportDeclData),
    ImportClause(ImportClauseData),
    NamedNode(NamedNodeData),
    Specifier(SpecifierData),
    ExportDecl(ExportDeclData),
    ExportAssignment(ExportAssignmentData),
    SourceFile(SourceFileData),
}

/// Flat storage for every node of one source file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

macro_rules! data_accessors {
    ($($fn_name:ident => $variant:ident($ty:ty),)*) => {
        impl NodeArena {
            $(
                #[inline]
                pub fn $fn_name<'a>(&self, node: &'a Node) -> Option<&'a $ty> {
                    match &node.data {
                        NodeData::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            )*
        }
    };
}

data_accessors! {
    get_identifier => Identifier(IdentifierData),
    get_literal => Literal(LiteralData),
    get_qualified_name => QualifiedName(QualifiedNameData),
    get_computed_property => ComputedProperty(ComputedPropertyData),
    get_type_parameter => TypeParameter(TypeParameterData),
    get_parameter => Parameter(ParameterData),
    get_property => Property(PropertyData),
    get_signature => Signature(SignatureData),
    get_type_predicate => TypePredicate(TypePredicateData),
    get_type_ref => TypeRef(TypeRefData),
    get_wrapped_type => WrappedType(WrappedTypeData),
    get_list => List(ListData),
    get_conditional_type => ConditionalType(ConditionalTypeData),
    get_infer_type => InferType(InferTypeData),
    get_indexed_access => IndexedAccess(IndexedAccessData),
    get_mapped_type => MappedType(MappedTypeData),
    get_literal_type => LiteralType(LiteralTypeData),
    get_named_tuple_member => NamedTupleMember(NamedTupleMemberData),
    get_template => Template(TemplateData),
    get_template_span => TemplateSpan(TemplateSpanData),
    get_import_type => ImportType(ImportTypeData),
    get_binding_element => BindingElement(BindingElementData),
    get_property_assignment => PropertyAssignment(PropertyAssignmentData),
    get_access_expr => AccessExpr(AccessExprData),
    get_call_expr => CallExpr(CallExprData),
    get_unary_expr => UnaryExpr(UnaryExprData),
    get_binary_expr => BinaryExpr(BinaryExprData),
    get_parenthesized => Parenthesized(ParenthesizedData),
    get_heritage_clause => Heritage(HeritageData),
    get_variable_statement => VariableStatement(VariableStatementData),
    get_variable_declaration => VariableDeclaration(VariableDeclarationData),
    get_class => Class(ClassData),
    get_type_alias => TypeAlias(TypeAliasData),
    get_enum => Enum(EnumData),
    get_enum_member => EnumMember(EnumMemberData),
    get_module => Module(ModuleData),
    get_import_equals => ImportEquals(ImportEqualsData),
    get_external_module_ref => ExternalModuleRef(ExternalModuleRefData),
    get_import_decl => ImportDecl(ImportDeclData),
    get_import_clause => ImportClause(ImportClauseData),
    get_named_node => NamedNode(NamedNodeData),
    get_specifier => Specifier(SpecifierData),
    get_export_decl => ExportDecl(ExportDeclData),
    get_export_assignment => ExportAssignment(ExportAssignmentData),
    get_source_file => SourceFile(SourceFileData),
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Append a node. The parent is filled in once the whole tree is built.
    pub fn add(&mut self, kind: u16, pos: u32, start: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            flags: 0,
            pos,
            start,
            end,
            parent: NodeIndex::NONE,
            data,
        });
        index
    }

    /// Drop nodes created after `len`, used to undo speculative parses.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Kind of a node, or 0 when the index is NONE.
    #[inline]
    pub fn kind(&self, index: NodeIndex) -> u16 {
        self.get(index).map_or(0, |n| n.kind)
    }
}
