//! Parser state - expressions.
//!
//! Declaration files only carry a small expression subset: initializers of
//! constants and enum members, computed property names, heritage clause
//! expressions and `export default` / `export =` targets.

use super::base::{NodeIndex, NodeList};
use super::node::{
    AccessExprData, BinaryExprData, BindingElementData, CallExprData, ComputedPropertyData,
    ListData, NodeData, ParenthesizedData, PropertyAssignmentData, TemplateData, TemplateSpanData,
    UnaryExprData,
};
use super::state::{ParserState, diagnostic_codes};
use crate::parser::syntax_kind_ext;
use dtsb_scanner::SyntaxKind;

fn binary_precedence(kind: SyntaxKind) -> u8 {
    match kind {
        SyntaxKind::QuestionQuestionToken => 1,
        SyntaxKind::BarBarToken => 2,
        SyntaxKind::AmpersandAmpersandToken => 3,
        SyntaxKind::BarToken => 4,
        SyntaxKind::CaretToken => 5,
        SyntaxKind::AmpersandToken => 6,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 7,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword => 8,
        SyntaxKind::LessThanLessThanToken => 9,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 10,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 11,
        SyntaxKind::AsteriskAsteriskToken => 12,
        _ => 0,
    }
}

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        self.parse_binary_expression(1)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let start = self.node_start();
        let mut left = self.parse_unary_expression();
        loop {
            let operator = self.token();
            let precedence = binary_precedence(operator);
            if precedence == 0 || precedence < min_precedence {
                break;
            }
            self.next_token();
            // `**` is right associative.
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary_expression(next_min);
            left = self.finish_node(
                syntax_kind_ext::BINARY_EXPRESSION,
                start,
                NodeData::BinaryExpr(BinaryExprData {
                    left,
                    operator_token: operator as u16,
                    right,
                }),
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword => {
                let start = self.node_start();
                let operator = self.token() as u16;
                self.next_token();
                let operand = self.parse_unary_expression();
                self.finish_node(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    start,
                    NodeData::UnaryExpr(UnaryExprData { operator, operand }),
                )
            }
            _ => self.parse_left_hand_side_expression(),
        }
    }

    /// Member access and call chains (`a.b[c](d)`), also used for heritage
    /// clause expressions.
    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start = self.node_start();
        let mut expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        loop {
            match self.token() {
                SyntaxKind::DotToken | SyntaxKind::QuestionDotToken => {
                    let question_dot = self.is_token(SyntaxKind::QuestionDotToken);
                    self.next_token();
                    let name_or_argument = if self.is_token(SyntaxKind::PrivateIdentifier) {
                        self.parse_literal_node()
                    } else {
                        self.parse_identifier_name()
                    };
                    expression = self.finish_node(
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        start,
                        NodeData::AccessExpr(AccessExprData {
                            expression,
                            name_or_argument,
                            question_dot,
                        }),
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let name_or_argument = self.parse_assignment_expression();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.finish_node(
                        syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                        start,
                        NodeData::AccessExpr(AccessExprData {
                            expression,
                            name_or_argument,
                            question_dot: false,
                        }),
                    );
                }
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_argument_list();
                    expression = self.finish_node(
                        syntax_kind_ext::CALL_EXPRESSION,
                        start,
                        NodeData::CallExpr(CallExprData {
                            expression,
                            type_arguments: None,
                            arguments: Some(arguments),
                        }),
                    );
                }
                SyntaxKind::LessThanToken => {
                    // `f<T>(x)`; otherwise `<` is a comparison.
                    let Some(type_arguments) = self.try_parse(|p| {
                        let args = p.parse_type_arguments();
                        p.is_token(SyntaxKind::OpenParenToken).then_some(args)
                    }) else {
                        break;
                    };
                    let arguments = self.parse_argument_list();
                    expression = self.finish_node(
                        syntax_kind_ext::CALL_EXPRESSION,
                        start,
                        NodeData::CallExpr(CallExprData {
                            expression,
                            type_arguments: Some(type_arguments),
                            arguments: Some(arguments),
                        }),
                    );
                }
                _ => break,
            }
        }
        expression
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let start = self.node_start();
        self.parse_expected(SyntaxKind::NewKeyword);
        let expression = self.parse_primary_expression();
        let type_arguments = self.parse_type_arguments_on_same_line();
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        self.finish_node(
            syntax_kind_ext::NEW_EXPRESSION,
            start,
            NodeData::CallExpr(CallExprData {
                expression,
                type_arguments,
                arguments,
            }),
        )
    }

    fn parse_argument_list(&mut self) -> NodeList {
        self.parse_delimited_list(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken, |p| {
            p.parse_assignment_expression()
        })
    }

    fn parse_primary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => self.parse_literal_node(),
            SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword => self.parse_token_node(),
            SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::OpenParenToken => {
                let start = self.node_start();
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish_node(
                    syntax_kind_ext::PARENTHESIZED_EXPRESSION,
                    start,
                    NodeData::Parenthesized(ParenthesizedData { expression }),
                )
            }
            SyntaxKind::OpenBracketToken => {
                let start = self.node_start();
                let elements = self.parse_delimited_list(
                    SyntaxKind::OpenBracketToken,
                    SyntaxKind::CloseBracketToken,
                    |p| p.parse_assignment_expression(),
                );
                self.finish_node(
                    syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
                    start,
                    NodeData::List(ListData { elements }),
                )
            }
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.parse_error_at_current_token(
                    "Expression expected.",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
                self.missing_identifier()
            }
        }
    }

    fn parse_template_expression(&mut self) -> NodeIndex {
        let start = self.node_start();
        let head = self.parse_literal_node();
        let list_pos = self.token_pos();
        let mut spans = Vec::new();
        loop {
            let span_start = self.node_start();
            let expression = self.parse_assignment_expression();
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CloseBraceToken);
                break;
            }
            self.current_token = self.scanner.re_scan_template_continuation();
            let is_tail = self.is_token(SyntaxKind::TemplateTail);
            let literal = self.parse_literal_node();
            spans.push(self.finish_node(
                syntax_kind_ext::TEMPLATE_SPAN,
                span_start,
                NodeData::TemplateSpan(TemplateSpanData { expression, literal }),
            ));
            if is_tail {
                break;
            }
        }
        let spans = NodeList::new(spans, list_pos, self.prev_token_end);
        self.finish_node(
            syntax_kind_ext::TEMPLATE_EXPRESSION,
            start,
            NodeData::Template(TemplateData { head, spans }),
        )
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let start = self.node_start();
        let elements = self.parse_delimited_list(
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            |p| {
                let start = p.node_start();
                let name = p.parse_property_name();
                let initializer = if p.parse_optional(SyntaxKind::ColonToken) {
                    p.parse_assignment_expression()
                } else {
                    NodeIndex::NONE
                };
                p.finish_node(
                    syntax_kind_ext::PROPERTY_ASSIGNMENT,
                    start,
                    NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
                )
            },
        );
        self.finish_node(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            start,
            NodeData::List(ListData { elements }),
        )
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Identifier, keyword, string, number, private name or `[computed]`.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::PrivateIdentifier => self.parse_literal_node(),
            SyntaxKind::OpenBracketToken => {
                let start = self.node_start();
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.finish_node(
                    syntax_kind_ext::COMPUTED_PROPERTY_NAME,
                    start,
                    NodeData::ComputedProperty(ComputedPropertyData { expression }),
                )
            }
            _ => self.parse_identifier_name(),
        }
    }

    /// `{ a, b: c }` or `[a, , b]` in parameter and variable positions.
    pub(crate) fn parse_binding_pattern(&mut self) -> NodeIndex {
        let start = self.node_start();
        let (kind, open, close) = if self.is_token(SyntaxKind::OpenBraceToken) {
            (
                syntax_kind_ext::OBJECT_BINDING_PATTERN,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
            )
        } else {
            (
                syntax_kind_ext::ARRAY_BINDING_PATTERN,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
            )
        };
        let is_object = kind == syntax_kind_ext::OBJECT_BINDING_PATTERN;
        let elements = self.parse_delimited_list(open, close, |p| p.parse_binding_element(is_object));
        self.finish_node(kind, start, NodeData::List(ListData { elements }))
    }

    fn parse_binding_element(&mut self, is_object: bool) -> NodeIndex {
        let start = self.node_start();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let mut property_name = NodeIndex::NONE;
        let name = if is_object {
            let first = self.parse_property_name();
            if self.parse_optional(SyntaxKind::ColonToken) {
                property_name = first;
                self.parse_binding_name()
            } else {
                first
            }
        } else if self.is_token(SyntaxKind::CommaToken) {
            NodeIndex::NONE
        } else {
            self.parse_binding_name()
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            syntax_kind_ext::BINDING_ELEMENT,
            start,
            NodeData::BindingElement(BindingElementData {
                dot_dot_dot_token,
                property_name,
                name,
                initializer,
            }),
        )
    }

    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::OpenBraceToken) || self.is_token(SyntaxKind::OpenBracketToken) {
            self.parse_binding_pattern()
        } else if self.is_token(SyntaxKind::ThisKeyword) {
            // `this` parameter of a signature.
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        }
    }
}
