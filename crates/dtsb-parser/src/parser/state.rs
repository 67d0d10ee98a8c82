//! Parser state: token cursor, diagnostics, and shared parse helpers.
//!
//! Grammar productions are split by area:
//! - `state_statements.rs` - source file, declarations, imports and exports
//! - `state_types.rs` - the type grammar
//! - `state_expressions.rs` - the initializer expressions allowed in declaration files

use super::base::{NodeIndex, NodeList};
use super::node::{IdentifierData, LiteralData, NodeArena, NodeData, node_flags};
use dtsb_scanner::{ScannerState, SyntaxKind, token_to_text};
use serde::Serialize;

/// Parsing inside `declare` or a `.d.ts` file.
pub const CONTEXT_FLAG_AMBIENT: u32 = 1 << 0;
/// `infer T extends U` inside a conditional's extends clause may not start a
/// nested conditional type.
pub const CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES: u32 = 1 << 1;

/// A syntax error found while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} at {start}")]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub mod diagnostic_codes {
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const UNTERMINATED_LITERAL: u32 = 1002;
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: u32 = 1131;
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) current_token: SyntaxKind,
    /// End of the last consumed token; nodes end here.
    pub(crate) prev_token_end: u32,
    pub(crate) context_flags: u32,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
}

impl ParserState {
    pub fn new(file_name: String, text: String) -> ParserState {
        let context_flags = if file_name.ends_with(".d.ts") {
            CONTEXT_FLAG_AMBIENT
        } else {
            0
        };
        ParserState {
            scanner: ScannerState::new(text),
            arena: NodeArena::new(),
            file_name,
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            context_flags,
            parse_diagnostics: Vec::new(),
        }
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ParseDiagnostic> {
        std::mem::take(&mut self.parse_diagnostics)
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn source_text(&self) -> &str {
        self.scanner.source_text()
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    /// Start of the current token (after trivia).
    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    /// Start of the current token's leading trivia.
    #[inline]
    pub(crate) fn token_full_start(&self) -> u32 {
        self.scanner.get_token_full_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        if self.scanner.is_unterminated() {
            self.parse_error_at_current_token("Unterminated literal.", diagnostic_codes::UNTERMINATED_LITERAL);
        }
        self.current_token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            let message = format!("'{}' expected.", token_to_text(kind).unwrap_or("token"));
            self.parse_error_at_current_token(&message, diagnostic_codes::TOKEN_EXPECTED);
            false
        }
    }

    /// Statement terminator: `;`, or automatic insertion before `}`, EOF or a
    /// line break.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
    }

    /// Run `f` speculatively and rewind when it returns `None`.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let prev_end = self.prev_token_end;
        let arena_len = self.arena.len();
        let diagnostics_len = self.parse_diagnostics.len();

        let result = f(self);
        if result.is_none() {
            self.scanner.restore_state(snapshot);
            self.current_token = current;
            self.prev_token_end = prev_end;
            self.arena.truncate(arena_len);
            self.parse_diagnostics.truncate(diagnostics_len);
        }
        result
    }

    /// Evaluate `f` on the upcoming tokens without consuming anything.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let prev_end = self.prev_token_end;
        let arena_len = self.arena.len();
        let diagnostics_len = self.parse_diagnostics.len();

        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.prev_token_end = prev_end;
        self.arena.truncate(arena_len);
        self.parse_diagnostics.truncate(diagnostics_len);
        result
    }

    pub(crate) fn next_token_is_on_same_line(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.scanner.has_preceding_line_break()
        })
    }

    #[inline]
    pub(crate) fn is_identifier(&self) -> bool {
        self.current_token.is_identifier()
    }

    #[inline]
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.current_token.is_identifier_or_keyword()
    }

    #[inline]
    pub(crate) fn in_ambient_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_AMBIENT != 0
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        // One diagnostic per position keeps error recovery from cascading.
        if self.parse_diagnostics.last().is_some_and(|d| d.start == start) {
            return;
        }
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    // =========================================================================
    // Node construction helpers
    // =========================================================================

    /// Full start and token start of the current token.
    #[inline]
    pub(crate) fn node_start(&self) -> (u32, u32) {
        (self.token_full_start(), self.token_pos())
    }

    /// Add a node ending at the last consumed token.
    pub(crate) fn finish_node(&mut self, kind: u16, (pos, start): (u32, u32), data: NodeData) -> NodeIndex {
        let end = self.prev_token_end.max(start);
        let index = self.arena.add(kind, pos, start, end, data);
        if self.in_ambient_context() {
            if let Some(node) = self.arena.get_mut(index) {
                node.flags |= node_flags::AMBIENT;
            }
        }
        index
    }

    /// Consume the current token as a bare token node.
    pub(crate) fn parse_token_node(&mut self) -> NodeIndex {
        let start = self.node_start();
        let kind = self.token() as u16;
        self.next_token();
        self.finish_node(kind, start, NodeData::None)
    }

    /// Consume an identifier, reporting a diagnostic if the current token
    /// cannot name a binding.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier() {
            return self.parse_identifier_name();
        }
        self.parse_error_at_current_token("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
        self.missing_identifier()
    }

    /// Consume an identifier, allowing reserved words (property names,
    /// qualified-name members, import/export specifiers).
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if !self.is_identifier_or_keyword() {
            self.parse_error_at_current_token("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
            return self.missing_identifier();
        }
        let start = self.node_start();
        let escaped_text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.finish_node(
            SyntaxKind::Identifier as u16,
            start,
            NodeData::Identifier(IdentifierData { escaped_text }),
        )
    }

    /// Zero-width identifier used for error recovery.
    pub(crate) fn missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_full_start();
        let start = self.token_pos();
        self.arena.add(
            SyntaxKind::Identifier as u16,
            pos,
            start,
            start,
            NodeData::Identifier(IdentifierData {
                escaped_text: String::new(),
            }),
        )
    }

    pub(crate) fn parse_literal_node(&mut self) -> NodeIndex {
        let start = self.node_start();
        let kind = self.token() as u16;
        let text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.finish_node(kind, start, NodeData::Literal(LiteralData { text }))
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            return self.parse_literal_node();
        }
        self.parse_error_at_current_token("String literal expected.", diagnostic_codes::TOKEN_EXPECTED);
        let pos = self.token_full_start();
        let start = self.token_pos();
        self.arena.add(
            SyntaxKind::StringLiteral as u16,
            pos,
            start,
            start,
            NodeData::Literal(LiteralData { text: String::new() }),
        )
    }

    /// Parse `open elem (sep elem)* sep? close` and return the element list.
    pub(crate) fn parse_delimited_list(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
        mut parse_element: impl FnMut(&mut Self) -> NodeIndex,
    ) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(open);
        let mut nodes = Vec::new();
        while !self.is_token(close) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            nodes.push(parse_element(self));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            // Guard against elements that consume nothing.
            if self.token_pos() == before {
                self.next_token();
            }
        }
        self.parse_expected(close);
        NodeList::new(nodes, pos, self.prev_token_end)
    }

    /// Parse leading modifiers (`export`, `declare`, `abstract`, ...). Each
    /// modifier is stored as a token node of its keyword kind.
    pub(crate) fn parse_modifiers(&mut self) -> Option<NodeList> {
        let pos = self.token_pos();
        let mut nodes = Vec::new();
        while self.current_token.is_modifier() && self.look_ahead(|p| p.next_token_can_follow_modifier()) {
            if self.is_token(SyntaxKind::DeclareKeyword) {
                self.context_flags |= CONTEXT_FLAG_AMBIENT;
            }
            nodes.push(self.parse_token_node());
        }
        if nodes.is_empty() {
            None
        } else {
            Some(NodeList::new(nodes, pos, self.prev_token_end))
        }
    }

    /// Called with the modifier as current token.
    fn next_token_can_follow_modifier(&mut self) -> bool {
        let modifier = self.token();
        self.next_token();
        match modifier {
            // `export =`, `export {`, `export *` and `export as` start export
            // declarations rather than modified declarations.
            SyntaxKind::ExportKeyword => !matches!(
                self.token(),
                SyntaxKind::EqualsToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::AsKeyword
            ),
            SyntaxKind::DefaultKeyword => matches!(
                self.token(),
                SyntaxKind::ClassKeyword
                    | SyntaxKind::FunctionKeyword
                    | SyntaxKind::InterfaceKeyword
                    | SyntaxKind::AbstractKeyword
                    | SyntaxKind::AsyncKeyword
                    | SyntaxKind::DeclareKeyword
            ),
            SyntaxKind::ConstKeyword => self.is_token(SyntaxKind::EnumKeyword),
            _ => {
                !self.scanner.has_preceding_line_break()
                    && (self.is_identifier_or_keyword()
                        || self.is_token(SyntaxKind::OpenBracketToken)
                        || self.is_token(SyntaxKind::OpenBraceToken)
                        || self.is_token(SyntaxKind::AsteriskToken)
                        || self.is_token(SyntaxKind::PrivateIdentifier)
                        || self.is_token(SyntaxKind::StringLiteral)
                        || self.is_token(SyntaxKind::NumericLiteral))
            }
        }
    }
}
