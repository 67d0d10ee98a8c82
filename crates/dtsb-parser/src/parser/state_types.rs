//! Parser state - the type grammar and type members.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ConditionalTypeData, ImportTypeData, IndexedAccessData, InferTypeData, ListData,
    LiteralTypeData, MappedTypeData, NamedTupleMemberData, NodeData, ParameterData, PropertyData,
    SignatureData, TemplateData, TemplateSpanData, TypeParameterData, TypePredicateData,
    TypeRefData, UnaryExprData, WrappedTypeData,
};
use super::state::{CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES, ParserState, diagnostic_codes};
use crate::parser::syntax_kind_ext;
use dtsb_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Parse Methods - Types
    // =========================================================================

    /// Parse a type (functions, unions, intersections, conditionals).
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if self.is_start_of_function_type() {
            return self.parse_function_or_constructor_type();
        }

        let start = self.node_start();
        let check_type = self.parse_union_type();
        if self.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES == 0
            && self.is_token(SyntaxKind::ExtendsKeyword)
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            let saved_flags = self.context_flags;
            self.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
            let extends_type = self.parse_type();
            self.context_flags = saved_flags;

            self.parse_expected(SyntaxKind::QuestionToken);
            let true_type = self.parse_type_allowing_conditionals();
            self.parse_expected(SyntaxKind::ColonToken);
            let false_type = self.parse_type_allowing_conditionals();
            return self.finish_node(
                syntax_kind_ext::CONDITIONAL_TYPE,
                start,
                NodeData::ConditionalType(ConditionalTypeData {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                }),
            );
        }
        check_type
    }

    /// Nested type contexts (branches, brackets, arguments) re-enable
    /// conditional types.
    pub(crate) fn parse_type_allowing_conditionals(&mut self) -> NodeIndex {
        let saved_flags = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        let result = self.parse_type();
        self.context_flags = saved_flags;
        result
    }

    /// `: T` annotation, NONE when absent.
    pub(crate) fn parse_type_annotation(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type_allowing_conditionals()
        } else {
            NodeIndex::NONE
        }
    }

    /// Return type after `:`; may be a type predicate.
    pub(crate) fn parse_return_type(&mut self) -> NodeIndex {
        let saved_flags = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        let result = self.parse_return_type_inner();
        self.context_flags = saved_flags;
        result
    }

    fn parse_return_type_inner(&mut self) -> NodeIndex {
        let start = self.node_start();
        if self.is_token(SyntaxKind::AssertsKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                !p.scanner.has_preceding_line_break()
                    && (p.is_identifier() || p.is_token(SyntaxKind::ThisKeyword))
            })
        {
            self.next_token();
            let parameter_name = self.parse_type_predicate_parameter_name();
            let type_node = if self.parse_optional(SyntaxKind::IsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            return self.finish_node(
                syntax_kind_ext::TYPE_PREDICATE,
                start,
                NodeData::TypePredicate(TypePredicateData {
                    asserts_modifier: true,
                    parameter_name,
                    type_node,
                }),
            );
        }

        if (self.is_identifier() || self.is_token(SyntaxKind::ThisKeyword))
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::IsKeyword) && !p.scanner.has_preceding_line_break()
            })
        {
            let parameter_name = self.parse_type_predicate_parameter_name();
            self.next_token(); // consume 'is'
            let type_node = self.parse_type();
            return self.finish_node(
                syntax_kind_ext::TYPE_PREDICATE,
                start,
                NodeData::TypePredicate(TypePredicateData {
                    asserts_modifier: false,
                    parameter_name,
                    type_node,
                }),
            );
        }

        self.parse_type()
    }

    fn parse_type_predicate_parameter_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::ThisKeyword) {
            let start = self.node_start();
            self.next_token();
            self.finish_node(syntax_kind_ext::THIS_TYPE, start, NodeData::None)
        } else {
            self.parse_identifier()
        }
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        self.parse_union_or_intersection(SyntaxKind::BarToken, syntax_kind_ext::UNION_TYPE, |p| {
            p.parse_intersection_type()
        })
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        self.parse_union_or_intersection(
            SyntaxKind::AmpersandToken,
            syntax_kind_ext::INTERSECTION_TYPE,
            |p| p.parse_type_operator_or_higher(),
        )
    }

    fn parse_union_or_intersection(
        &mut self,
        operator: SyntaxKind,
        kind: u16,
        parse_constituent: fn(&mut Self) -> NodeIndex,
    ) -> NodeIndex {
        let start = self.node_start();
        let list_pos = self.token_pos();
        let has_leading_operator = self.parse_optional(operator);
        let first = if has_leading_operator && self.is_start_of_function_type() {
            self.parse_function_or_constructor_type()
        } else {
            parse_constituent(self)
        };
        if !self.is_token(operator) && !has_leading_operator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            if self.is_start_of_function_type() {
                types.push(self.parse_function_or_constructor_type());
            } else {
                types.push(parse_constituent(self));
            }
        }
        if types.len() == 1 {
            return first;
        }
        let elements = NodeList::new(types, list_pos, self.prev_token_end);
        self.finish_node(kind, start, NodeData::List(ListData { elements }))
    }

    fn parse_type_operator_or_higher(&mut self) -> NodeIndex {
        let start = self.node_start();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token() as u16;
                self.next_token();
                let type_node = self.parse_type_operator_or_higher();
                self.finish_node(
                    syntax_kind_ext::TYPE_OPERATOR,
                    start,
                    NodeData::WrappedType(WrappedTypeData { operator, type_node }),
                )
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let type_parameter = self.parse_infer_type_parameter();
                self.finish_node(
                    syntax_kind_ext::INFER_TYPE,
                    start,
                    NodeData::InferType(InferTypeData { type_parameter }),
                )
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_infer_type_parameter(&mut self) -> NodeIndex {
        let start = self.node_start();
        let name = self.parse_identifier();
        // `infer U extends X ? A : B` is ambiguous; the constraint only binds
        // when no `?` follows.
        let constraint = self
            .try_parse(|p| {
                if !p.parse_optional(SyntaxKind::ExtendsKeyword) {
                    return None;
                }
                let saved_flags = p.context_flags;
                p.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
                let constraint = p.parse_type();
                p.context_flags = saved_flags;
                if p.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES != 0
                    || !p.is_token(SyntaxKind::QuestionToken)
                {
                    Some(constraint)
                } else {
                    None
                }
            })
            .unwrap_or(NodeIndex::NONE);
        self.finish_node(
            syntax_kind_ext::TYPE_PARAMETER,
            start,
            NodeData::TypeParameter(TypeParameterData {
                modifiers: None,
                name,
                constraint,
                default: NodeIndex::NONE,
            }),
        )
    }

    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        let mut type_node = self.parse_non_array_type();
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.scanner.has_preceding_line_break() {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                type_node = self.finish_node(
                    syntax_kind_ext::ARRAY_TYPE,
                    start,
                    NodeData::WrappedType(WrappedTypeData {
                        operator: 0,
                        type_node,
                    }),
                );
            } else {
                let index_type = self.parse_type_allowing_conditionals();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                type_node = self.finish_node(
                    syntax_kind_ext::INDEXED_ACCESS_TYPE,
                    start,
                    NodeData::IndexedAccess(IndexedAccessData {
                        object_type: type_node,
                        index_type,
                    }),
                );
            }
        }
        type_node
    }

    fn parse_non_array_type(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::IntrinsicKeyword
                if !self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::DotToken)
                }) =>
            {
                self.parse_token_node()
            }
            SyntaxKind::VoidKeyword | SyntaxKind::NullKeyword => self.parse_token_node(),
            SyntaxKind::ThisKeyword => {
                let start = self.node_start();
                self.next_token();
                self.finish_node(syntax_kind_ext::THIS_TYPE, start, NodeData::None)
            }
            SyntaxKind::TypeOfKeyword => {
                if self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::ImportKeyword)
                }) {
                    self.parse_import_type()
                } else {
                    self.parse_type_query()
                }
            }
            SyntaxKind::ImportKeyword => self.parse_import_type(),
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let start = self.node_start();
                let literal = if self.token().is_literal() {
                    self.parse_literal_node()
                } else {
                    self.parse_token_node()
                };
                self.finish_node(
                    syntax_kind_ext::LITERAL_TYPE,
                    start,
                    NodeData::LiteralType(LiteralTypeData { literal }),
                )
            }
            SyntaxKind::MinusToken => {
                let start = self.node_start();
                self.next_token();
                let operand = self.parse_literal_node();
                let literal = self.finish_node(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    start,
                    NodeData::UnaryExpr(UnaryExprData {
                        operator: SyntaxKind::MinusToken as u16,
                        operand,
                    }),
                );
                self.finish_node(
                    syntax_kind_ext::LITERAL_TYPE,
                    start,
                    NodeData::LiteralType(LiteralTypeData { literal }),
                )
            }
            SyntaxKind::TemplateHead => self.parse_template_literal_type(),
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(|p| p.is_start_of_mapped_type()) {
                    self.parse_mapped_type()
                } else {
                    self.parse_type_literal()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                let start = self.node_start();
                self.next_token();
                let type_node = self.parse_type_allowing_conditionals();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish_node(
                    syntax_kind_ext::PARENTHESIZED_TYPE,
                    start,
                    NodeData::WrappedType(WrappedTypeData {
                        operator: 0,
                        type_node,
                    }),
                )
            }
            _ if self.is_identifier_or_keyword() && !self.token().is_reserved_word() => {
                self.parse_type_reference()
            }
            _ => {
                self.parse_error_at_current_token("Type expected.", diagnostic_codes::TYPE_EXPECTED);
                self.missing_identifier()
            }
        }
    }

    /// `Name.Sub<Args>`
    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.node_start();
        let type_name = self.parse_entity_name_allowing_keywords();
        let type_arguments = self.parse_type_arguments_on_same_line();
        self.finish_node(
            syntax_kind_ext::TYPE_REFERENCE,
            start,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments,
            }),
        )
    }

    /// Entity name whose first segment may be a contextual keyword (`global.X`).
    fn parse_entity_name_allowing_keywords(&mut self) -> NodeIndex {
        let mut left = self.parse_identifier_name();
        while self.is_token(SyntaxKind::DotToken) {
            let start = self.arena.get(left).map_or(self.node_start(), |n| (n.pos, n.start));
            self.next_token();
            let right = self.parse_identifier_name();
            left = self.finish_node(
                syntax_kind_ext::QUALIFIED_NAME,
                start,
                NodeData::QualifiedName(super::node::QualifiedNameData { left, right }),
            );
        }
        left
    }

    pub(crate) fn parse_type_arguments_on_same_line(&mut self) -> Option<NodeList> {
        if self.is_token(SyntaxKind::LessThanToken) && !self.scanner.has_preceding_line_break() {
            Some(self.parse_type_arguments())
        } else {
            None
        }
    }

    pub(crate) fn parse_type_arguments(&mut self) -> NodeList {
        self.parse_delimited_list(SyntaxKind::LessThanToken, SyntaxKind::GreaterThanToken, |p| {
            p.parse_type_allowing_conditionals()
        })
    }

    /// `typeof a.b<T>`
    fn parse_type_query(&mut self) -> NodeIndex {
        let start = self.node_start();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        let type_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments_on_same_line();
        self.finish_node(
            syntax_kind_ext::TYPE_QUERY,
            start,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments,
            }),
        )
    }

    /// `typeof import("m").A.B<T>` / `import("m").A`
    fn parse_import_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        let is_type_of = self.parse_optional(SyntaxKind::TypeOfKeyword);
        self.parse_expected(SyntaxKind::ImportKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let arg_start = self.node_start();
        let literal = self.parse_string_literal();
        let argument = self.finish_node(
            syntax_kind_ext::LITERAL_TYPE,
            arg_start,
            NodeData::LiteralType(LiteralTypeData { literal }),
        );
        // Import attributes are skipped.
        if self.parse_optional(SyntaxKind::CommaToken) && self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken);
            self.parse_optional(SyntaxKind::CommaToken);
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        let qualifier = if self.parse_optional(SyntaxKind::DotToken) {
            self.parse_entity_name_allowing_keywords()
        } else {
            NodeIndex::NONE
        };
        let type_arguments = self.parse_type_arguments_on_same_line();
        self.finish_node(
            syntax_kind_ext::IMPORT_TYPE,
            start,
            NodeData::ImportType(ImportTypeData {
                is_type_of,
                argument,
                qualifier,
                type_arguments,
            }),
        )
    }

    /// Consume a balanced `open ... close` group.
    pub(crate) fn skip_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let mut depth = 0usize;
        loop {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return;
            }
            if self.is_token(open) {
                depth += 1;
            } else if self.is_token(close) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.next_token();
                    return;
                }
            }
            self.next_token();
        }
    }

    fn parse_template_literal_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        let head = self.parse_literal_node();
        let list_pos = self.token_pos();
        let mut spans = Vec::new();
        loop {
            let span_start = self.node_start();
            let expression = self.parse_type_allowing_conditionals();
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CloseBraceToken);
                break;
            }
            self.current_token = self.scanner.re_scan_template_continuation();
            let is_tail = self.is_token(SyntaxKind::TemplateTail);
            let literal = self.parse_literal_node();
            spans.push(self.finish_node(
                syntax_kind_ext::TEMPLATE_LITERAL_TYPE_SPAN,
                span_start,
                NodeData::TemplateSpan(TemplateSpanData { expression, literal }),
            ));
            if is_tail {
                break;
            }
        }
        let spans = NodeList::new(spans, list_pos, self.prev_token_end);
        self.finish_node(
            syntax_kind_ext::TEMPLATE_LITERAL_TYPE,
            start,
            NodeData::Template(TemplateData { head, spans }),
        )
    }

    /// Called at `{`.
    fn is_start_of_mapped_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
            return self.is_token(SyntaxKind::ReadonlyKeyword);
        }
        if self.is_token(SyntaxKind::ReadonlyKeyword) {
            self.next_token();
        }
        if !self.is_token(SyntaxKind::OpenBracketToken) {
            return false;
        }
        self.next_token();
        if !self.is_identifier_or_keyword() {
            return false;
        }
        self.next_token();
        self.is_token(SyntaxKind::InKeyword)
    }

    fn parse_mapped_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut readonly_token = 0;
        if matches!(
            self.token(),
            SyntaxKind::ReadonlyKeyword | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            readonly_token = self.token() as u16;
            self.next_token();
            if readonly_token != SyntaxKind::ReadonlyKeyword as u16 {
                self.parse_expected(SyntaxKind::ReadonlyKeyword);
            }
        }
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let param_start = self.node_start();
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type_allowing_conditionals();
        let type_parameter = self.finish_node(
            syntax_kind_ext::TYPE_PARAMETER,
            param_start,
            NodeData::TypeParameter(TypeParameterData {
                modifiers: None,
                name,
                constraint,
                default: NodeIndex::NONE,
            }),
        );
        let name_type = if self.parse_optional(SyntaxKind::AsKeyword) {
            self.parse_type_allowing_conditionals()
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let mut question_token = 0;
        if matches!(
            self.token(),
            SyntaxKind::QuestionToken | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            question_token = self.token() as u16;
            self.next_token();
            if question_token != SyntaxKind::QuestionToken as u16 {
                self.parse_expected(SyntaxKind::QuestionToken);
            }
        }
        let type_node = self.parse_type_annotation();
        if !self.parse_optional(SyntaxKind::SemicolonToken) {
            self.parse_optional(SyntaxKind::CommaToken);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(
            syntax_kind_ext::MAPPED_TYPE,
            start,
            NodeData::MappedType(MappedTypeData {
                readonly_token,
                type_parameter,
                name_type,
                question_token,
                type_node,
            }),
        )
    }

    fn parse_type_literal(&mut self) -> NodeIndex {
        let start = self.node_start();
        let elements = self.parse_type_members();
        self.finish_node(
            syntax_kind_ext::TYPE_LITERAL,
            start,
            NodeData::List(ListData { elements }),
        )
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        let elements = self.parse_delimited_list(
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            |p| p.parse_tuple_element(),
        );
        self.finish_node(
            syntax_kind_ext::TUPLE_TYPE,
            start,
            NodeData::List(ListData { elements }),
        )
    }

    fn parse_tuple_element(&mut self) -> NodeIndex {
        let start = self.node_start();
        let is_named = self.look_ahead(|p| {
            p.parse_optional(SyntaxKind::DotDotDotToken);
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.parse_optional(SyntaxKind::QuestionToken);
            p.is_token(SyntaxKind::ColonToken)
        });
        if is_named {
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name();
            let question_token = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type_allowing_conditionals();
            return self.finish_node(
                syntax_kind_ext::NAMED_TUPLE_MEMBER,
                start,
                NodeData::NamedTupleMember(NamedTupleMemberData {
                    dot_dot_dot_token,
                    name,
                    question_token,
                    type_node,
                }),
            );
        }
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type_allowing_conditionals();
            return self.finish_node(
                syntax_kind_ext::REST_TYPE,
                start,
                NodeData::WrappedType(WrappedTypeData {
                    operator: 0,
                    type_node,
                }),
            );
        }
        let type_node = self.parse_type_allowing_conditionals();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return self.finish_node(
                syntax_kind_ext::OPTIONAL_TYPE,
                start,
                NodeData::WrappedType(WrappedTypeData {
                    operator: 0,
                    type_node,
                }),
            );
        }
        type_node
    }

    // =========================================================================
    // Function and constructor types
    // =========================================================================

    fn is_start_of_function_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken => true,
            SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::NewKeyword)
            }),
            SyntaxKind::OpenParenToken => self.look_ahead(|p| {
                p.skip_balanced(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken);
                p.is_token(SyntaxKind::EqualsGreaterThanToken)
            }),
            _ => false,
        }
    }

    fn parse_function_or_constructor_type(&mut self) -> NodeIndex {
        let start = self.node_start();
        let modifiers = if self.is_token(SyntaxKind::AbstractKeyword) {
            let pos = self.token_pos();
            let modifier = self.parse_token_node();
            Some(NodeList::new(vec![modifier], pos, self.prev_token_end))
        } else {
            None
        };
        let kind = if self.parse_optional(SyntaxKind::NewKeyword) {
            syntax_kind_ext::CONSTRUCTOR_TYPE
        } else {
            syntax_kind_ext::FUNCTION_TYPE
        };
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let type_annotation = self.parse_return_type();
        self.finish_node(
            kind,
            start,
            NodeData::Signature(SignatureData {
                modifiers,
                name: NodeIndex::NONE,
                question_token: false,
                type_parameters,
                parameters,
                type_annotation,
            }),
        )
    }

    // =========================================================================
    // Type parameters and parameters
    // =========================================================================

    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        Some(self.parse_delimited_list(
            SyntaxKind::LessThanToken,
            SyntaxKind::GreaterThanToken,
            |p| p.parse_type_parameter(),
        ))
    }

    fn parse_type_parameter(&mut self) -> NodeIndex {
        let start = self.node_start();
        let modifiers = self.parse_modifiers();
        let name = self.parse_identifier();
        let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_type_allowing_conditionals()
        } else {
            NodeIndex::NONE
        };
        let default = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_type_allowing_conditionals()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            syntax_kind_ext::TYPE_PARAMETER,
            start,
            NodeData::TypeParameter(TypeParameterData {
                modifiers,
                name,
                constraint,
                default,
            }),
        )
    }

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        if !self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_expected(SyntaxKind::OpenParenToken);
            return NodeList::empty();
        }
        self.parse_delimited_list(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken, |p| {
            p.parse_parameter()
        })
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.node_start();
        let modifiers = self.parse_modifiers();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = match self.token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => self.parse_binding_pattern(),
            SyntaxKind::ThisKeyword => self.parse_identifier_name(),
            _ => self.parse_identifier(),
        };
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            syntax_kind_ext::PARAMETER,
            start,
            NodeData::Parameter(ParameterData {
                modifiers,
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
                initializer,
            }),
        )
    }

    // =========================================================================
    // Type members (interfaces and type literals)
    // =========================================================================

    pub(crate) fn parse_type_members(&mut self) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            members.push(self.parse_type_member());
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.token_pos() == before {
                self.parse_error_at_current_token(
                    "Property or signature expected.",
                    diagnostic_codes::PROPERTY_OR_SIGNATURE_EXPECTED,
                );
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::new(members, pos, self.prev_token_end)
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let start = self.node_start();
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return self.parse_signature_member(syntax_kind_ext::CALL_SIGNATURE, start, None, NodeIndex::NONE, false);
        }
        if self.is_token(SyntaxKind::NewKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken) || p.is_token(SyntaxKind::LessThanToken)
            })
        {
            self.next_token();
            return self.parse_signature_member(syntax_kind_ext::CONSTRUCT_SIGNATURE, start, None, NodeIndex::NONE, false);
        }
        let modifiers = self.parse_modifiers();
        if self.is_index_signature() {
            return self.parse_index_signature(start, modifiers);
        }
        if let Some(kind) = self.accessor_kind() {
            self.next_token();
            let name = self.parse_property_name();
            return self.parse_signature_member(kind, start, modifiers, name, false);
        }
        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return self.parse_signature_member(
                syntax_kind_ext::METHOD_SIGNATURE,
                start,
                modifiers,
                name,
                question_token,
            );
        }
        let type_annotation = self.parse_type_annotation();
        self.finish_node(
            syntax_kind_ext::PROPERTY_SIGNATURE,
            start,
            NodeData::Property(PropertyData {
                modifiers,
                name,
                question_token,
                exclamation_token: false,
                type_annotation,
                initializer: NodeIndex::NONE,
            }),
        )
    }

    /// `get`/`set` followed by a property name.
    pub(crate) fn accessor_kind(&mut self) -> Option<u16> {
        let kind = match self.token() {
            SyntaxKind::GetKeyword => syntax_kind_ext::GET_ACCESSOR,
            SyntaxKind::SetKeyword => syntax_kind_ext::SET_ACCESSOR,
            _ => return None,
        };
        let followed_by_name = self.look_ahead(|p| {
            p.next_token();
            !p.scanner.has_preceding_line_break() && p.is_start_of_property_name()
        });
        followed_by_name.then_some(kind)
    }

    pub(crate) fn is_start_of_property_name(&self) -> bool {
        self.is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::PrivateIdentifier
            )
    }

    /// Signature tail: type parameters, parameters, optional return type.
    pub(crate) fn parse_signature_member(
        &mut self,
        kind: u16,
        start: (u32, u32),
        modifiers: Option<NodeList>,
        name: NodeIndex,
        question_token: bool,
    ) -> NodeIndex {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            kind,
            start,
            NodeData::Signature(SignatureData {
                modifiers,
                name,
                question_token,
                type_parameters,
                parameters,
                type_annotation,
            }),
        )
    }

    /// `[key: string]` at the current position.
    pub(crate) fn is_index_signature(&mut self) -> bool {
        if !self.is_token(SyntaxKind::OpenBracketToken) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::DotDotDotToken) || p.is_token(SyntaxKind::CloseBracketToken) {
                return true;
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            matches!(
                p.token(),
                SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::QuestionToken
            )
        })
    }

    pub(crate) fn parse_index_signature(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        let parameters = self.parse_delimited_list(
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            |p| p.parse_parameter(),
        );
        let type_annotation = self.parse_type_annotation();
        self.finish_node(
            syntax_kind_ext::INDEX_SIGNATURE,
            start,
            NodeData::Signature(SignatureData {
                modifiers,
                name: NodeIndex::NONE,
                question_token: false,
                type_parameters: None,
                parameters,
                type_annotation,
            }),
        )
    }
}
