//! Node kinds for composite syntax.
//!
//! Token nodes (identifiers, literals, keyword types, modifiers) reuse their
//! `SyntaxKind` value. Everything built out of several tokens gets a kind
//! from this module, numbered after the last token kind.

use dtsb_scanner::SyntaxKind;

pub const FIRST_NODE: u16 = SyntaxKind::LAST_TOKEN as u16 + 1;

macro_rules! node_kinds {
    ($($name:ident),* $(,)?) => {
        node_kinds!(@step 0u16, $($name,)*);

        static NODE_KIND_NAMES: &[&str] = &[$(stringify!($name)),*];
    };
    (@step $n:expr, $head:ident, $($tail:ident,)*) => {
        pub const $head: u16 = FIRST_NODE + $n;
        node_kinds!(@step $n + 1u16, $($tail,)*);
    };
    (@step $n:expr,) => {};
}

node_kinds! {
    // Names
    QUALIFIED_NAME,
    COMPUTED_PROPERTY_NAME,
    // Signature elements
    TYPE_PARAMETER,
    PARAMETER,
    // Type members
    PROPERTY_SIGNATURE,
    PROPERTY_DECLARATION,
    METHOD_SIGNATURE,
    METHOD_DECLARATION,
    CONSTRUCTOR,
    GET_ACCESSOR,
    SET_ACCESSOR,
    CALL_SIGNATURE,
    CONSTRUCT_SIGNATURE,
    INDEX_SIGNATURE,
    SEMICOLON_CLASS_ELEMENT,
    // Types
    TYPE_PREDICATE,
    TYPE_REFERENCE,
    FUNCTION_TYPE,
    CONSTRUCTOR_TYPE,
    TYPE_QUERY,
    TYPE_LITERAL,
    ARRAY_TYPE,
    TUPLE_TYPE,
    OPTIONAL_TYPE,
    REST_TYPE,
    UNION_TYPE,
    INTERSECTION_TYPE,
    CONDITIONAL_TYPE,
    INFER_TYPE,
    PARENTHESIZED_TYPE,
    THIS_TYPE,
    TYPE_OPERATOR,
    INDEXED_ACCESS_TYPE,
    MAPPED_TYPE,
    LITERAL_TYPE,
    NAMED_TUPLE_MEMBER,
    TEMPLATE_LITERAL_TYPE,
    TEMPLATE_LITERAL_TYPE_SPAN,
    IMPORT_TYPE,
    // Binding patterns
    OBJECT_BINDING_PATTERN,
    ARRAY_BINDING_PATTERN,
    BINDING_ELEMENT,
    // Expressions
    ARRAY_LITERAL_EXPRESSION,
    OBJECT_LITERAL_EXPRESSION,
    PROPERTY_ASSIGNMENT,
    PROPERTY_ACCESS_EXPRESSION,
    ELEMENT_ACCESS_EXPRESSION,
    CALL_EXPRESSION,
    NEW_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    PREFIX_UNARY_EXPRESSION,
    BINARY_EXPRESSION,
    TEMPLATE_EXPRESSION,
    TEMPLATE_SPAN,
    EXPRESSION_WITH_TYPE_ARGUMENTS,
    // Statements and declarations
    HERITAGE_CLAUSE,
    VARIABLE_STATEMENT,
    VARIABLE_DECLARATION_LIST,
    VARIABLE_DECLARATION,
    FUNCTION_DECLARATION,
    CLASS_DECLARATION,
    INTERFACE_DECLARATION,
    TYPE_ALIAS_DECLARATION,
    ENUM_DECLARATION,
    ENUM_MEMBER,
    MODULE_DECLARATION,
    MODULE_BLOCK,
    IMPORT_EQUALS_DECLARATION,
    EXTERNAL_MODULE_REFERENCE,
    IMPORT_DECLARATION,
    IMPORT_CLAUSE,
    NAMESPACE_IMPORT,
    NAMED_IMPORTS,
    IMPORT_SPECIFIER,
    EXPORT_ASSIGNMENT,
    EXPORT_DECLARATION,
    NAMED_EXPORTS,
    NAMESPACE_EXPORT,
    EXPORT_SPECIFIER,
    NAMESPACE_EXPORT_DECLARATION,
    EMPTY_STATEMENT,
    SOURCE_FILE,
}

/// Human-readable kind name for tracing output and diagnostics.
pub fn kind_name(kind: u16) -> &'static str {
    if kind >= FIRST_NODE {
        return NODE_KIND_NAMES
            .get((kind - FIRST_NODE) as usize)
            .copied()
            .unwrap_or("Unknown");
    }
    match SyntaxKind::from_u16(kind) {
        Some(SyntaxKind::Identifier) => "Identifier",
        Some(SyntaxKind::PrivateIdentifier) => "PrivateIdentifier",
        Some(SyntaxKind::StringLiteral) => "StringLiteral",
        Some(SyntaxKind::NumericLiteral) => "NumericLiteral",
        Some(SyntaxKind::BigIntLiteral) => "BigIntLiteral",
        Some(k) if k.is_keyword() => "Keyword",
        Some(_) => "Token",
        None => "Unknown",
    }
}

/// Statements that introduce a named top-level declaration.
pub fn is_declaration_statement(kind: u16) -> bool {
    matches!(
        kind,
        FUNCTION_DECLARATION
            | CLASS_DECLARATION
            | INTERFACE_DECLARATION
            | TYPE_ALIAS_DECLARATION
            | ENUM_DECLARATION
            | MODULE_DECLARATION
            | IMPORT_EQUALS_DECLARATION
            | VARIABLE_STATEMENT
    )
}
