//! Parser state - source file, declarations, imports and exports.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ClassData, EnumData, EnumMemberData, ExportAssignmentData, ExportDeclData,
    ExternalModuleRefData, HeritageData, ImportClauseData, ImportDeclData, ImportEqualsData,
    ListData, ModuleData, NamedNodeData, NodeData, PropertyData, QualifiedNameData, SignatureData,
    SourceFileData, SpecifierData, TypeAliasData, TypeRefData, VariableDeclarationData,
    VariableStatementData, node_flags,
};
use super::state::{ParserState, diagnostic_codes};
use crate::parser::syntax_kind_ext;
use dtsb_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Parse Methods - Source file and statements
    // =========================================================================

    /// Parse a source file
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();

        let pos = self.token_pos();
        let mut statements = Vec::new();
        let mut is_external_module = false;
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                is_external_module |= self.is_module_indicator(statement);
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }
        let statements = NodeList::new(statements, pos, self.prev_token_end);

        let end_pos = self.token_end();
        let eof_start = self.node_start();
        let end_of_file_token =
            self.arena
                .add(SyntaxKind::EndOfFileToken as u16, eof_start.0, eof_start.1, end_pos, NodeData::None);

        let root = self.arena.add(
            syntax_kind_ext::SOURCE_FILE,
            0,
            0,
            end_pos,
            NodeData::SourceFile(SourceFileData {
                statements,
                end_of_file_token,
                file_name: self.file_name.clone(),
            }),
        );
        if let Some(node) = self.arena.get_mut(root) {
            if is_external_module {
                node.flags |= node_flags::EXTERNAL_MODULE;
            }
            if self.context_flags & super::state::CONTEXT_FLAG_AMBIENT != 0 {
                node.flags |= node_flags::AMBIENT;
            }
        }
        self.arena.set_parents(root);
        root
    }

    /// Imports, exports and `export`-modified declarations make a file a module.
    fn is_module_indicator(&self, statement: NodeIndex) -> bool {
        let Some(node) = self.arena.get(statement) else {
            return false;
        };
        match node.kind {
            syntax_kind_ext::IMPORT_DECLARATION
            | syntax_kind_ext::EXPORT_DECLARATION
            | syntax_kind_ext::EXPORT_ASSIGNMENT => true,
            syntax_kind_ext::IMPORT_EQUALS_DECLARATION => {
                self.arena.has_modifier(statement, SyntaxKind::ExportKeyword)
                    || self
                        .arena
                        .get_import_equals(node)
                        .is_some_and(|d| self.arena.kind(d.module_reference) == syntax_kind_ext::EXTERNAL_MODULE_REFERENCE)
            }
            _ => self.arena.has_modifier(statement, SyntaxKind::ExportKeyword),
        }
    }

    /// Statements of a block (`{ ... }` of a namespace or module).
    fn parse_block_statements(&mut self) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::new(statements, pos, self.prev_token_end)
    }

    pub fn parse_statement(&mut self) -> NodeIndex {
        let saved_flags = self.context_flags;
        let result = self.parse_statement_worker();
        self.context_flags = saved_flags;
        result
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        let start = self.node_start();
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.finish_node(syntax_kind_ext::EMPTY_STATEMENT, start, NodeData::None)
            }
            SyntaxKind::ImportKeyword => self.parse_statement_import_keyword(start),
            SyntaxKind::ExportKeyword => self.parse_statement_export_keyword(start),
            _ => self.parse_declaration(start),
        }
    }

    fn parse_statement_import_keyword(&mut self, start: (u32, u32)) -> NodeIndex {
        if self.look_ahead_is_import_equals() {
            self.next_token();
            return self.parse_import_equals_declaration(start, None);
        }
        self.parse_import_declaration(start)
    }

    fn parse_statement_export_keyword(&mut self, start: (u32, u32)) -> NodeIndex {
        let next = self.look_ahead(|p| {
            p.next_token();
            let next = p.token();
            let after = p.look_ahead(|p| {
                p.next_token();
                p.token()
            });
            (next, after)
        });
        match next {
            (SyntaxKind::EqualsToken, _) => self.parse_export_assignment(start),
            (SyntaxKind::DefaultKeyword, after)
                if !matches!(
                    after,
                    SyntaxKind::ClassKeyword
                        | SyntaxKind::FunctionKeyword
                        | SyntaxKind::InterfaceKeyword
                        | SyntaxKind::AbstractKeyword
                        | SyntaxKind::AsyncKeyword
                        | SyntaxKind::DeclareKeyword
                ) =>
            {
                self.parse_export_assignment(start)
            }
            (SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken, _) => self.parse_export_declaration(start),
            (SyntaxKind::TypeKeyword, SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken) => {
                self.parse_export_declaration(start)
            }
            (SyntaxKind::AsKeyword, _) => self.parse_namespace_export_declaration(start),
            _ => self.parse_declaration(start),
        }
    }

    /// Modifiers followed by a declaration keyword.
    fn parse_declaration(&mut self, start: (u32, u32)) -> NodeIndex {
        let modifiers = self.parse_modifiers();
        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::UsingKeyword if self.look_ahead_next_is_identifier_on_same_line() => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, modifiers),
            SyntaxKind::InterfaceKeyword if self.look_ahead_next_is_identifier_on_same_line() => {
                self.parse_interface_declaration(start, modifiers)
            }
            SyntaxKind::TypeKeyword if self.look_ahead_next_is_identifier_on_same_line() => {
                self.parse_type_alias_declaration(start, modifiers)
            }
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
            SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.scanner.has_preceding_line_break()
                        && (p.is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral))
                }) =>
            {
                self.parse_module_declaration(start, modifiers)
            }
            SyntaxKind::GlobalKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::OpenBraceToken)
                }) =>
            {
                self.parse_module_declaration(start, modifiers)
            }
            SyntaxKind::ImportKeyword if modifiers.is_some() && self.look_ahead_is_import_equals() => {
                self.next_token();
                self.parse_import_equals_declaration(start, modifiers)
            }
            _ => {
                self.parse_error_at_current_token(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.skip_to_statement_end();
                NodeIndex::NONE
            }
        }
    }

    /// Error recovery: drop tokens up to the end of the current statement.
    fn skip_to_statement_end(&mut self) {
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken => {
                    self.skip_balanced(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken);
                    return;
                }
                _ => {
                    self.next_token();
                    if self.scanner.has_preceding_line_break() {
                        return;
                    }
                }
            }
        }
    }

    fn look_ahead_next_is_identifier_on_same_line(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_identifier() && !p.scanner.has_preceding_line_break()
        })
    }

    /// `import X =` / `import type X =` with `import` as current token.
    fn look_ahead_is_import_equals(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::TypeKeyword) {
                let type_is_name = p.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::EqualsToken)
                });
                if !type_is_name {
                    p.next_token();
                }
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.is_token(SyntaxKind::EqualsToken)
        })
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start,
            NodeData::VariableStatement(VariableStatementData {
                modifiers,
                declaration_list,
            }),
        )
    }

    fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let start = self.node_start();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => node_flags::LET,
            SyntaxKind::ConstKeyword => node_flags::CONST,
            SyntaxKind::UsingKeyword => node_flags::USING,
            _ => node_flags::NONE,
        };
        self.next_token();

        let list_pos = self.token_pos();
        let mut declarations = vec![self.parse_variable_declaration()];
        while self.parse_optional(SyntaxKind::CommaToken) {
            declarations.push(self.parse_variable_declaration());
        }
        let elements = NodeList::new(declarations, list_pos, self.prev_token_end);
        let list = self.finish_node(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            start,
            NodeData::List(ListData { elements }),
        );
        if let Some(node) = self.arena.get_mut(list) {
            node.flags |= flags;
        }
        list
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let start = self.node_start();
        let name = self.parse_binding_name();
        let exclamation_token = self.parse_optional(SyntaxKind::ExclamationToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            syntax_kind_ext::VARIABLE_DECLARATION,
            start,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name,
                exclamation_token,
                type_annotation,
                initializer,
            }),
        )
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn parse_function_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        self.parse_optional(SyntaxKind::AsteriskToken);
        // `export default function (...)` has no name.
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_function_body_or_semicolon();
        self.finish_node(
            syntax_kind_ext::FUNCTION_DECLARATION,
            start,
            NodeData::Signature(SignatureData {
                modifiers,
                name,
                question_token: false,
                type_parameters,
                parameters,
                type_annotation,
            }),
        )
    }

    /// Bodies are not part of declaration output; they are skipped.
    fn parse_function_body_or_semicolon(&mut self) {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken);
        } else {
            self.parse_semicolon();
        }
    }

    fn parse_class_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier()
            && !self.is_token(SyntaxKind::ImplementsKeyword)
        {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_class_members();
        self.finish_node(
            syntax_kind_ext::CLASS_DECLARATION,
            start,
            NodeData::Class(ClassData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        )
    }

    fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        let pos = self.token_pos();
        let mut clauses = Vec::new();
        while self.is_token(SyntaxKind::ExtendsKeyword) || self.is_token(SyntaxKind::ImplementsKeyword) {
            let start = self.node_start();
            let token = self.token() as u16;
            self.next_token();
            let types_pos = self.token_pos();
            let mut types = vec![self.parse_expression_with_type_arguments()];
            while self.parse_optional(SyntaxKind::CommaToken) {
                types.push(self.parse_expression_with_type_arguments());
            }
            let types = NodeList::new(types, types_pos, self.prev_token_end);
            clauses.push(self.finish_node(
                syntax_kind_ext::HERITAGE_CLAUSE,
                start,
                NodeData::Heritage(HeritageData { token, types }),
            ));
        }
        if clauses.is_empty() {
            None
        } else {
            Some(NodeList::new(clauses, pos, self.prev_token_end))
        }
    }

    fn parse_expression_with_type_arguments(&mut self) -> NodeIndex {
        let start = self.node_start();
        let type_name = self.parse_left_hand_side_expression();
        let type_arguments = self.parse_type_arguments_on_same_line();
        self.finish_node(
            syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS,
            start,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments,
            }),
        )
    }

    fn parse_class_members(&mut self) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            members.push(self.parse_class_member());
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

    fn parse_class_member(&mut self) -> NodeIndex {
        let start = self.node_start();
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return self.finish_node(syntax_kind_ext::SEMICOLON_CLASS_ELEMENT, start, NodeData::None);
        }
        let modifiers = self.parse_modifiers();

        if self.is_token(SyntaxKind::ConstructorKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken) || p.is_token(SyntaxKind::LessThanToken)
            })
        {
            self.next_token();
            let member =
                self.parse_signature_member(syntax_kind_ext::CONSTRUCTOR, start, modifiers, NodeIndex::NONE, false);
            self.parse_function_body_or_semicolon();
            return self.extend_to_previous_token(member);
        }
        if self.is_index_signature() {
            let member = self.parse_index_signature(start, modifiers);
            self.parse_semicolon();
            return self.extend_to_previous_token(member);
        }
        if let Some(kind) = self.accessor_kind() {
            self.next_token();
            let name = self.parse_property_name();
            let member = self.parse_signature_member(kind, start, modifiers, name, false);
            self.parse_function_body_or_semicolon();
            return self.extend_to_previous_token(member);
        }

        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let member = self.parse_signature_member(
                syntax_kind_ext::METHOD_DECLARATION,
                start,
                modifiers,
                name,
                question_token,
            );
            self.parse_function_body_or_semicolon();
            return self.extend_to_previous_token(member);
        }
        let exclamation_token = self.parse_optional(SyntaxKind::ExclamationToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::PROPERTY_DECLARATION,
            start,
            NodeData::Property(PropertyData {
                modifiers,
                name,
                question_token,
                exclamation_token,
                type_annotation,
                initializer,
            }),
        )
    }

    /// Class members own their terminating `;` or body.
    fn extend_to_previous_token(&mut self, index: NodeIndex) -> NodeIndex {
        let end = self.prev_token_end;
        if let Some(node) = self.arena.get_mut(index) {
            node.end = node.end.max(end);
        }
        index
    }

    // =========================================================================
    // Interfaces, type aliases, enums
    // =========================================================================

    fn parse_interface_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_type_members();
        self.finish_node(
            syntax_kind_ext::INTERFACE_DECLARATION,
            start,
            NodeData::Class(ClassData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        )
    }

    fn parse_type_alias_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type_allowing_conditionals();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::TYPE_ALIAS_DECLARATION,
            start,
            NodeData::TypeAlias(TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
            }),
        )
    }

    fn parse_enum_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let members = self.parse_delimited_list(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken, |p| {
            let start = p.node_start();
            let name = p.parse_property_name();
            let initializer = if p.parse_optional(SyntaxKind::EqualsToken) {
                p.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            p.finish_node(
                syntax_kind_ext::ENUM_MEMBER,
                start,
                NodeData::EnumMember(EnumMemberData { name, initializer }),
            )
        });
        self.finish_node(
            syntax_kind_ext::ENUM_DECLARATION,
            start,
            NodeData::Enum(EnumData {
                modifiers,
                name,
                members,
            }),
        )
    }

    // =========================================================================
    // Modules and namespaces
    // =========================================================================

    fn parse_module_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        let mut flags = node_flags::NONE;
        match self.token() {
            SyntaxKind::GlobalKeyword => flags |= node_flags::GLOBAL_AUGMENTATION,
            SyntaxKind::NamespaceKeyword => {
                flags |= node_flags::NAMESPACE;
                self.next_token();
            }
            _ => {
                self.next_token();
            }
        }

        if self.is_token(SyntaxKind::StringLiteral) {
            let name = self.parse_literal_node();
            let body = if self.is_token(SyntaxKind::OpenBraceToken) {
                self.parse_module_block()
            } else {
                // `declare module "x";`
                self.parse_semicolon();
                NodeIndex::NONE
            };
            return self.finish_module(start, modifiers, name, body, flags);
        }

        let name = self.parse_identifier_name();
        let body = if self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let inner_start = self.node_start();
            let inner = self.parse_module_declaration_rest(inner_start);
            if let Some(node) = self.arena.get_mut(inner) {
                node.flags |= node_flags::NESTED_NAMESPACE | (flags & node_flags::NAMESPACE);
            }
            inner
        } else {
            self.parse_module_block()
        };
        self.finish_module(start, modifiers, name, body, flags)
    }

    /// `B.C { }` after the `.` of a dotted namespace name.
    fn parse_module_declaration_rest(&mut self, start: (u32, u32)) -> NodeIndex {
        let name = self.parse_identifier_name();
        let body = if self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let inner_start = self.node_start();
            let inner = self.parse_module_declaration_rest(inner_start);
            if let Some(node) = self.arena.get_mut(inner) {
                node.flags |= node_flags::NESTED_NAMESPACE;
            }
            inner
        } else {
            self.parse_module_block()
        };
        self.finish_module(start, None, name, body, node_flags::NONE)
    }

    fn finish_module(
        &mut self,
        start: (u32, u32),
        modifiers: Option<NodeList>,
        name: NodeIndex,
        body: NodeIndex,
        flags: u32,
    ) -> NodeIndex {
        let module = self.finish_node(
            syntax_kind_ext::MODULE_DECLARATION,
            start,
            NodeData::Module(ModuleData { modifiers, name, body }),
        );
        if let Some(node) = self.arena.get_mut(module) {
            node.flags |= flags;
        }
        module
    }

    fn parse_module_block(&mut self) -> NodeIndex {
        let start = self.node_start();
        let elements = self.parse_block_statements();
        self.finish_node(
            syntax_kind_ext::MODULE_BLOCK,
            start,
            NodeData::List(ListData { elements }),
        )
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Parse import equals declaration: import X = require("...") or import X = Y.Z
    /// Called with the token after `import` as current token.
    fn parse_import_equals_declaration(&mut self, start: (u32, u32), modifiers: Option<NodeList>) -> NodeIndex {
        let is_type_only = self.is_token(SyntaxKind::TypeKeyword)
            && !self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::EqualsToken)
            });
        if is_type_only {
            self.next_token();
        }
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::EqualsToken);
        let module_reference = if self.is_token(SyntaxKind::RequireKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken)
            }) {
            self.parse_external_module_reference()
        } else {
            self.parse_entity_name()
        };
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::IMPORT_EQUALS_DECLARATION,
            start,
            NodeData::ImportEquals(ImportEqualsData {
                modifiers,
                is_type_only,
                name,
                module_reference,
            }),
        )
    }

    /// Parse external module reference: require("...")
    fn parse_external_module_reference(&mut self) -> NodeIndex {
        let start = self.node_start();
        self.parse_expected(SyntaxKind::RequireKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_string_literal();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.finish_node(
            syntax_kind_ext::EXTERNAL_MODULE_REFERENCE,
            start,
            NodeData::ExternalModuleRef(ExternalModuleRefData { expression }),
        )
    }

    /// Parse entity name: A or A.B.C or this or this.x
    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let mut left = if self.is_token(SyntaxKind::ThisKeyword) {
            self.parse_token_node()
        } else {
            self.parse_identifier()
        };
        while self.is_token(SyntaxKind::DotToken) {
            let start = self.arena.get(left).map_or(self.node_start(), |n| (n.pos, n.start));
            self.next_token();
            let right = self.parse_identifier_name();
            left = self.finish_node(
                syntax_kind_ext::QUALIFIED_NAME,
                start,
                NodeData::QualifiedName(QualifiedNameData { left, right }),
            );
        }
        left
    }

    fn parse_import_declaration(&mut self, start: (u32, u32)) -> NodeIndex {
        self.parse_expected(SyntaxKind::ImportKeyword);

        // `import "side-effect";`
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_literal_node();
            self.parse_import_attributes();
            self.parse_semicolon();
            return self.finish_node(
                syntax_kind_ext::IMPORT_DECLARATION,
                start,
                NodeData::ImportDecl(ImportDeclData {
                    modifiers: None,
                    import_clause: NodeIndex::NONE,
                    module_specifier,
                }),
            );
        }

        let clause_start = self.node_start();
        let is_type_only = self.is_token(SyntaxKind::TypeKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenBraceToken)
                    || p.is_token(SyntaxKind::AsteriskToken)
                    || (p.is_identifier() && !p.is_token(SyntaxKind::FromKeyword))
                    || (p.is_token(SyntaxKind::FromKeyword)
                        && p.look_ahead(|p| {
                            p.next_token();
                            p.is_token(SyntaxKind::FromKeyword)
                        }))
            });
        if is_type_only {
            self.next_token();
        }

        let mut name = NodeIndex::NONE;
        if (self.is_identifier() && !self.is_token(SyntaxKind::FromKeyword))
            || (self.is_token(SyntaxKind::FromKeyword)
                && self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::FromKeyword)
                }))
        {
            name = self.parse_identifier();
        }
        let mut named_bindings = NodeIndex::NONE;
        if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            named_bindings = match self.token() {
                SyntaxKind::AsteriskToken => self.parse_namespace_binding(syntax_kind_ext::NAMESPACE_IMPORT),
                SyntaxKind::OpenBraceToken => {
                    self.parse_named_imports_or_exports(syntax_kind_ext::NAMED_IMPORTS, syntax_kind_ext::IMPORT_SPECIFIER)
                }
                _ => {
                    self.parse_error_at_current_token("'{' expected.", diagnostic_codes::TOKEN_EXPECTED);
                    NodeIndex::NONE
                }
            };
        }
        let import_clause = self.finish_node(
            syntax_kind_ext::IMPORT_CLAUSE,
            clause_start,
            NodeData::ImportClause(ImportClauseData {
                is_type_only,
                name,
                named_bindings,
            }),
        );

        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_string_literal();
        self.parse_import_attributes();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::IMPORT_DECLARATION,
            start,
            NodeData::ImportDecl(ImportDeclData {
                modifiers: None,
                import_clause,
                module_specifier,
            }),
        )
    }

    /// `with { type: "json" }` / `assert { ... }` are accepted and dropped.
    fn parse_import_attributes(&mut self) {
        if (self.is_token(SyntaxKind::WithKeyword) || self.is_token(SyntaxKind::AssertKeyword))
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            self.skip_balanced(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken);
        }
    }

    /// `* as name`
    fn parse_namespace_binding(&mut self, kind: u16) -> NodeIndex {
        let start = self.node_start();
        self.parse_expected(SyntaxKind::AsteriskToken);
        self.parse_expected(SyntaxKind::AsKeyword);
        let name = self.parse_module_export_name();
        self.finish_node(kind, start, NodeData::NamedNode(NamedNodeData { name }))
    }

    fn parse_named_imports_or_exports(&mut self, kind: u16, specifier_kind: u16) -> NodeIndex {
        let start = self.node_start();
        let elements = self.parse_delimited_list(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken, |p| {
            p.parse_specifier(specifier_kind)
        });
        self.finish_node(kind, start, NodeData::List(ListData { elements }))
    }

    /// `[type] name [as alias]`
    fn parse_specifier(&mut self, kind: u16) -> NodeIndex {
        let start = self.node_start();
        // `type` is a modifier unless it is the name itself (`{ type }`,
        // `{ type as x }`).
        let is_type_only = self.is_token(SyntaxKind::TypeKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                if p.is_token(SyntaxKind::AsKeyword) {
                    p.next_token();
                    return !p.is_identifier_or_keyword() || p.is_token(SyntaxKind::AsKeyword);
                }
                p.is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral)
            });
        if is_type_only {
            self.next_token();
        }
        let first = self.parse_module_export_name();
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (first, self.parse_module_export_name())
        } else {
            (NodeIndex::NONE, first)
        };
        self.finish_node(
            kind,
            start,
            NodeData::Specifier(SpecifierData {
                is_type_only,
                property_name,
                name,
            }),
        )
    }

    /// Identifier, keyword (`default`) or string literal.
    fn parse_module_export_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name()
        }
    }

    // =========================================================================
    // Exports
    // =========================================================================

    /// `export [type] { a, b as c } [from "m"];` / `export [type] * [as ns] from "m";`
    fn parse_export_declaration(&mut self, start: (u32, u32)) -> NodeIndex {
        self.parse_expected(SyntaxKind::ExportKeyword);
        let is_type_only = self.parse_optional(SyntaxKind::TypeKeyword);
        let mut export_clause = NodeIndex::NONE;
        let module_specifier;
        if self.is_token(SyntaxKind::AsteriskToken) {
            let star_start = self.node_start();
            self.next_token();
            if self.parse_optional(SyntaxKind::AsKeyword) {
                let name = self.parse_module_export_name();
                export_clause = self.finish_node(
                    syntax_kind_ext::NAMESPACE_EXPORT,
                    star_start,
                    NodeData::NamedNode(NamedNodeData { name }),
                );
            }
            self.parse_expected(SyntaxKind::FromKeyword);
            module_specifier = self.parse_string_literal();
        } else {
            export_clause =
                self.parse_named_imports_or_exports(syntax_kind_ext::NAMED_EXPORTS, syntax_kind_ext::EXPORT_SPECIFIER);
            module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
                self.parse_string_literal()
            } else {
                NodeIndex::NONE
            };
        }
        self.parse_import_attributes();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::EXPORT_DECLARATION,
            start,
            NodeData::ExportDecl(ExportDeclData {
                modifiers: None,
                is_type_only,
                export_clause,
                module_specifier,
            }),
        )
    }

    /// `export = expr;` / `export default expr;`
    fn parse_export_assignment(&mut self, start: (u32, u32)) -> NodeIndex {
        self.parse_expected(SyntaxKind::ExportKeyword);
        let is_export_equals = if self.parse_optional(SyntaxKind::EqualsToken) {
            true
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword);
            false
        };
        let expression = self.parse_assignment_expression();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::EXPORT_ASSIGNMENT,
            start,
            NodeData::ExportAssignment(ExportAssignmentData {
                modifiers: None,
                is_export_equals,
                expression,
            }),
        )
    }

    /// `export as namespace Name;`
    fn parse_namespace_export_declaration(&mut self, start: (u32, u32)) -> NodeIndex {
        self.parse_expected(SyntaxKind::ExportKeyword);
        self.parse_expected(SyntaxKind::AsKeyword);
        self.parse_expected(SyntaxKind::NamespaceKeyword);
        let name = self.parse_identifier();
        self.parse_semicolon();
        self.finish_node(
            syntax_kind_ext::NAMESPACE_EXPORT_DECLARATION,
            start,
            NodeData::NamedNode(NamedNodeData { name }),
        )
    }
}
