//! Tests for the declaration-file grammar.

use crate::parser::node::node_flags;
use crate::parser::syntax_kind_ext;
use crate::parser::NodeIndex;
use crate::parser::state::ParserState;
use crate::{NodeArena, ParseDiagnostic};
use dtsb_scanner::SyntaxKind;

fn parse(source: &str) -> (NodeArena, NodeIndex, Vec<ParseDiagnostic>) {
    let mut parser = ParserState::new("test.d.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    (parser.into_arena(), root, diagnostics)
}

fn statements(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    arena
        .statements(root)
        .map(|list| list.nodes.clone())
        .unwrap_or_default()
}

/// Parse and assert the source is free of syntax errors.
fn parse_clean(source: &str) -> (NodeArena, NodeIndex) {
    let (arena, root, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    (arena, root)
}

#[test]
fn test_statement_kinds_and_spans() {
    let source = "export declare class A {\n    x: number;\n}\ninterface B { y?: string }\ntype C = A | B;\n";
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 3);

    let kinds: Vec<u16> = stmts.iter().map(|&s| arena.kind(s)).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::CLASS_DECLARATION,
            syntax_kind_ext::INTERFACE_DECLARATION,
            syntax_kind_ext::TYPE_ALIAS_DECLARATION,
        ]
    );
    assert_eq!(arena.node_text(source, stmts[0]), "export declare class A {\n    x: number;\n}");
    assert_eq!(arena.node_text(source, stmts[2]), "type C = A | B;");
    assert_eq!(arena.declaration_name_text(stmts[1]), Some("B"));
}

#[test]
fn test_full_start_includes_leading_comment() {
    let source = "declare const a: number;\n/** Docs */\ndeclare function f(): void;\n";
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    let f = arena.get(stmts[1]).expect("function");
    assert_eq!(&source[f.pos as usize..f.start as usize], "\n/** Docs */\n");
    assert_eq!(arena.node_text(source, stmts[1]), "declare function f(): void;");
}

#[test]
fn test_modifiers_are_token_nodes() {
    let source = "export default abstract class Base {}";
    let (arena, root) = parse_clean(source);
    let class = statements(&arena, root)[0];
    assert!(arena.has_modifier(class, SyntaxKind::ExportKeyword));
    assert!(arena.has_modifier(class, SyntaxKind::DefaultKeyword));
    assert!(arena.has_modifier(class, SyntaxKind::AbstractKeyword));
    assert!(!arena.has_modifier(class, SyntaxKind::DeclareKeyword));

    let default = arena.get_modifier(class, SyntaxKind::DefaultKeyword);
    assert_eq!(arena.node_text(source, default), "default");
}

#[test]
fn test_node_data_outlives_the_arena_it_was_read_through() {
    let (arena, root) = parse_clean("declare const x: number;\nexport = x;\n");
    let stmts = statements(&arena, root);
    let node = arena.get(stmts[1]).cloned().expect("node");

    let reader = NodeArena::default();
    let data = reader.get_export_assignment(&node).expect("data");
    drop(reader);
    assert!(data.is_export_equals);
}

#[test]
fn test_export_default_expression_is_export_assignment() {
    let (arena, root) = parse_clean("declare const x: number;\nexport default x;\nexport = x;\n");
    let stmts = statements(&arena, root);
    assert_eq!(arena.kind(stmts[1]), syntax_kind_ext::EXPORT_ASSIGNMENT);
    assert_eq!(arena.kind(stmts[2]), syntax_kind_ext::EXPORT_ASSIGNMENT);

    let first = arena.get(stmts[1]).expect("node");
    let data = arena.get_export_assignment(first).expect("data");
    assert!(!data.is_export_equals);
    let second = arena.get(stmts[2]).expect("node");
    assert!(arena.get_export_assignment(second).expect("data").is_export_equals);

    let root_node = arena.get(root).expect("root");
    assert_ne!(root_node.flags & node_flags::EXTERNAL_MODULE, 0);
}

#[test]
fn test_script_file_is_not_module() {
    let (arena, root) = parse_clean("declare const x: number;\ndeclare module \"lib\" {\n    export const y: string;\n}\n");
    let root_node = arena.get(root).expect("root");
    assert_eq!(root_node.flags & node_flags::EXTERNAL_MODULE, 0);
    let module = statements(&arena, root)[1];
    assert!(arena.is_ambient_module(module));
    assert_eq!(arena.module_specifier_text(module), Some("lib"));
}

#[test]
fn test_import_forms() {
    let source = r#"import Def, { a, b as c, type T } from "./mod";
import * as ns from "lib";
import type { U } from './types';
import "side-effect";
import eq = require("legacy");
import alias = ns.inner.Thing;
"#;
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 6);

    assert_eq!(arena.module_specifier_text(stmts[0]), Some("./mod"));
    let clause_index = arena.get_import_decl(arena.get(stmts[0]).expect("import")).expect("data").import_clause;
    let clause = arena.get_import_clause(arena.get(clause_index).expect("clause")).expect("data");
    assert_eq!(arena.identifier_text(clause.name), Some("Def"));
    let named = arena.get(clause.named_bindings).expect("named");
    assert_eq!(named.kind, syntax_kind_ext::NAMED_IMPORTS);
    let specifiers = arena.get_list(named).expect("list").elements.nodes.clone();
    assert_eq!(specifiers.len(), 3);
    let renamed = arena.get_specifier(arena.get(specifiers[1]).expect("spec")).expect("data");
    assert_eq!(arena.identifier_text(renamed.property_name), Some("b"));
    assert_eq!(arena.identifier_text(renamed.name), Some("c"));
    let typed = arena.get_specifier(arena.get(specifiers[2]).expect("spec")).expect("data");
    assert!(typed.is_type_only);

    assert_eq!(arena.module_specifier_text(stmts[2]), Some("./types"));
    assert_eq!(arena.kind(stmts[3]), syntax_kind_ext::IMPORT_DECLARATION);
    assert_eq!(arena.kind(stmts[4]), syntax_kind_ext::IMPORT_EQUALS_DECLARATION);
    assert_eq!(arena.module_specifier_text(stmts[4]), Some("legacy"));
    assert_eq!(arena.kind(stmts[5]), syntax_kind_ext::IMPORT_EQUALS_DECLARATION);
    assert_eq!(arena.module_specifier_text(stmts[5]), None);
}

#[test]
fn test_export_declaration_forms() {
    let source = r#"export { a, b as c };
export * from "./all";
export * as ns from "./ns";
export type { T } from "./types";
export as namespace Lib;
"#;
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 5);
    for &stmt in &stmts[..4] {
        assert_eq!(arena.kind(stmt), syntax_kind_ext::EXPORT_DECLARATION);
    }
    let star = arena.get_export_decl(arena.get(stmts[1]).expect("star")).expect("data");
    assert!(star.export_clause.is_none());
    let ns = arena.get_export_decl(arena.get(stmts[2]).expect("ns")).expect("data");
    assert_eq!(arena.kind(ns.export_clause), syntax_kind_ext::NAMESPACE_EXPORT);
    let typed = arena.get_export_decl(arena.get(stmts[3]).expect("typed")).expect("data");
    assert!(typed.is_type_only);
    assert_eq!(arena.kind(stmts[4]), syntax_kind_ext::NAMESPACE_EXPORT_DECLARATION);
}

#[test]
fn test_variable_statement_with_several_declarators() {
    let source = "export declare const a: number, b: string;\ndeclare let c: boolean;\n";
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    let statement = arena.get(stmts[0]).expect("statement");
    let list_index = arena.get_variable_statement(statement).expect("data").declaration_list;
    let list = arena.get(list_index).expect("list");
    assert_ne!(list.flags & node_flags::CONST, 0);
    let declarations = arena.get_list(list).expect("declarations").elements.nodes.clone();
    assert_eq!(declarations.len(), 2);
    assert_eq!(arena.node_text(source, declarations[0]), "a: number");
    assert_eq!(arena.node_text(source, declarations[1]), "b: string");

    let let_list = arena.get_variable_statement(arena.get(stmts[1]).expect("stmt")).expect("data").declaration_list;
    assert_ne!(arena.get(let_list).expect("list").flags & node_flags::LET, 0);
}

#[test]
fn test_namespaces_and_global_augmentation() {
    let source = r#"declare namespace A.B {
    interface C {}
}
declare global {
    interface Window { x: number }
}
"#;
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    let outer = arena.get(stmts[0]).expect("namespace");
    assert_ne!(outer.flags & node_flags::NAMESPACE, 0);
    let inner = arena.get_module(outer).expect("data").body;
    let inner_node = arena.get(inner).expect("inner");
    assert_eq!(inner_node.kind, syntax_kind_ext::MODULE_DECLARATION);
    assert_ne!(inner_node.flags & node_flags::NESTED_NAMESPACE, 0);
    assert_eq!(arena.declaration_name_text(inner), Some("B"));

    assert!(arena.is_global_augmentation(stmts[1]));
    assert_eq!(arena.declaration_name_text(stmts[1]), Some("global"));
}

#[test]
fn test_type_grammar() {
    let source = r#"type T1<K extends keyof T, T> = T[K][];
type T2 = { readonly [P in keyof T]?: T[P] };
type T3<T> = T extends Array<infer U> ? U : never;
type T4 = `prefix-${string}-suffix`;
type T5 = typeof import("./mod").Value;
type T6 = [a: string, b?: number, ...rest: boolean[]];
type T7 = new (...args: any[]) => object;
type T8 = (x: unknown) => x is string;
type T9 = -1 | "a" | true | null | undefined;
type T10 = typeof globalThis.value;
type T11 = abstract new () => void;
type T12 = { (x: number): string; new (): T12; method?<U>(u: U): void; [key: string]: any };
"#;
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 12);

    let alias_type = |index: usize| {
        let node = arena.get(stmts[index]).expect("alias");
        arena.kind(arena.get_type_alias(node).expect("data").type_node)
    };
    assert_eq!(alias_type(0), syntax_kind_ext::ARRAY_TYPE);
    assert_eq!(alias_type(1), syntax_kind_ext::MAPPED_TYPE);
    assert_eq!(alias_type(2), syntax_kind_ext::CONDITIONAL_TYPE);
    assert_eq!(alias_type(3), syntax_kind_ext::TEMPLATE_LITERAL_TYPE);
    assert_eq!(alias_type(4), syntax_kind_ext::IMPORT_TYPE);
    assert_eq!(alias_type(5), syntax_kind_ext::TUPLE_TYPE);
    assert_eq!(alias_type(6), syntax_kind_ext::CONSTRUCTOR_TYPE);
    assert_eq!(alias_type(7), syntax_kind_ext::FUNCTION_TYPE);
    assert_eq!(alias_type(8), syntax_kind_ext::UNION_TYPE);
    assert_eq!(alias_type(9), syntax_kind_ext::TYPE_QUERY);
    assert_eq!(alias_type(10), syntax_kind_ext::CONSTRUCTOR_TYPE);
    assert_eq!(alias_type(11), syntax_kind_ext::TYPE_LITERAL);
}

#[test]
fn test_import_type_starts_at_typeof() {
    let source = "type T = typeof import(\"./mod\").A.B;\n";
    let (arena, root) = parse_clean(source);
    let alias = arena.get(statements(&arena, root)[0]).expect("alias");
    let import_type = arena.get_type_alias(alias).expect("data").type_node;
    assert_eq!(arena.node_text(source, import_type), "typeof import(\"./mod\").A.B");
    assert_eq!(arena.module_specifier_text(import_type), Some("./mod"));
}

#[test]
fn test_class_members_and_heritage() {
    let source = r#"export declare class User<T extends User = any> extends Base<T> implements I, ns.J {
    private constructor();
    static create(): User;
    get name(): string;
    set name(value: string);
    readonly [key: string]: unknown;
    protected data?: T;
    [Symbol.iterator](): Iterator<T>;
}
"#;
    let (arena, root) = parse_clean(source);
    let class_index = statements(&arena, root)[0];
    let class = arena.get_class(arena.get(class_index).expect("class")).expect("data");
    assert_eq!(class.members.len(), 7);
    let heritage = class.heritage_clauses.as_ref().expect("heritage");
    assert_eq!(heritage.len(), 2);

    let member_kinds: Vec<u16> = class.members.iter().map(|m| arena.kind(m)).collect();
    assert_eq!(
        member_kinds,
        vec![
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::SET_ACCESSOR,
            syntax_kind_ext::INDEX_SIGNATURE,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
        ]
    );
    let computed = arena.declaration_name(class.members.nodes[6]);
    assert_eq!(arena.kind(computed), syntax_kind_ext::COMPUTED_PROPERTY_NAME);
}

#[test]
fn test_unnamed_default_declarations() {
    let (arena, root) = parse_clean("export default function (a: string): void;\nexport default class {}\n");
    let stmts = statements(&arena, root);
    assert!(arena.declaration_name(stmts[0]).is_none());
    assert!(arena.declaration_name(stmts[1]).is_none());
}

#[test]
fn test_enums() {
    let source = "export declare const enum E { A = 1, B = A << 2, C = \"c\" }\ndeclare enum F { X }\n";
    let (arena, root) = parse_clean(source);
    let stmts = statements(&arena, root);
    assert!(arena.has_modifier(stmts[0], SyntaxKind::ConstKeyword));
    let data = arena.get_enum(arena.get(stmts[0]).expect("enum")).expect("data");
    assert_eq!(data.members.len(), 3);
}

#[test]
fn test_parents_are_linked() {
    let source = "declare function f(x: Foo.Bar): void;\n";
    let (arena, root) = parse_clean(source);
    let function = statements(&arena, root)[0];
    assert_eq!(arena.parent_of(function), root);

    let signature = arena.get_signature(arena.get(function).expect("fn")).expect("data");
    let parameter = signature.parameters.nodes[0];
    assert_eq!(arena.parent_of(parameter), function);
    assert!(arena.is_descendant_of(parameter, root));
    assert_eq!(arena.ancestors(parameter).last(), Some(root));
}

#[test]
fn test_children_in_source_order() {
    let source = "type A<T> = Map<string, T>;\n";
    let (arena, root) = parse_clean(source);
    let alias = statements(&arena, root)[0];
    let children = arena.children(alias);
    let starts: Vec<u32> = children.iter().map(|&c| arena.get(c).expect("child").start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert_eq!(children.len(), 3);
}

#[test]
fn test_syntax_error_reports_diagnostic() {
    let (_, _, diagnostics) = parse("declare class {{ ;");
    assert!(!diagnostics.is_empty());
}

#[test]
fn test_asserts_predicate_and_this_type() {
    let source = "declare function check(x: unknown): asserts x is string;\ninterface Fluent { next(): this }\n";
    let (arena, root) = parse_clean(source);
    let function = arena.get(statements(&arena, root)[0]).expect("fn");
    let return_type = arena.get_signature(function).expect("data").type_annotation;
    let predicate = arena.get(return_type).expect("predicate");
    assert_eq!(predicate.kind, syntax_kind_ext::TYPE_PREDICATE);
    assert!(arena.get_type_predicate(predicate).expect("data").asserts_modifier);
}
