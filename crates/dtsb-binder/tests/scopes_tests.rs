//! Name resolution through the scope chain.

mod support;

use dtsb_binder::symbol_flags;
use dtsb_parser::{NodeIndex, syntax_kind_ext};
use support::*;

#[test]
fn test_type_parameter_reference_resolves_to_declaration() {
    let program = build(&[("/p/a.d.ts", "export interface Box<T> { value: T }\n")]);
    let declared = symbol_at(&program, "/p/a.d.ts", "T", 0).expect("declared");
    let referenced = symbol_at(&program, "/p/a.d.ts", "T", 1).expect("referenced");
    assert_eq!(declared, referenced);
    assert!(program
        .symbol(declared)
        .expect("symbol")
        .has_any_flags(symbol_flags::TYPE_PARAMETER));
}

#[test]
fn test_mapped_and_infer_parameters_are_scoped() {
    let program = build(&[(
        "/p/a.d.ts",
        "export type M<T> = { [K in keyof T]: K };\n\
         export type U<T> = T extends Array<infer E> ? E : never;\n",
    )]);
    let k = symbol_at(&program, "/p/a.d.ts", "K", 1).expect("K");
    assert_eq!(Some(k), symbol_at(&program, "/p/a.d.ts", "K", 0));
    assert!(program.symbol(k).expect("K").has_any_flags(symbol_flags::TYPE_PARAMETER));

    let e = symbol_at(&program, "/p/a.d.ts", "E", 1).expect("E");
    assert_eq!(Some(e), symbol_at(&program, "/p/a.d.ts", "E", 0));

    let array = symbol_at(&program, "/p/a.d.ts", "Array", 0).expect("Array");
    assert_eq!(program.globals().get("Array").copied(), Some(array));
}

#[test]
fn test_namespace_members_resolve_inside_and_through_qualifier() {
    let program = build(&[(
        "/p/a.d.ts",
        "export declare namespace NS {\n    interface Inner { a: string }\n    interface Outer { inner: Inner }\n}\n\
         export declare const v: NS.Inner;\n",
    )]);
    let declared = symbol_at(&program, "/p/a.d.ts", "Inner", 0).expect("declared");
    assert_eq!(symbol_at(&program, "/p/a.d.ts", "Inner", 1), Some(declared));
    assert_eq!(symbol_at(&program, "/p/a.d.ts", "Inner", 2), Some(declared));
}

#[test]
fn test_import_aliases_resolve_across_files() {
    let program = build(&[
        ("/p/a.d.ts", "export declare class A {}\nexport { A as Renamed };\n"),
        (
            "/p/b.d.ts",
            "import { Renamed } from \"./a\";\nimport * as ns from \"./a\";\n\
             export declare const x: Renamed;\nexport declare const y: ns.A;\n",
        ),
    ]);
    let class_a = export_of(&program, "/p/a.d.ts", "A");

    let renamed = symbol_at(&program, "/p/b.d.ts", "Renamed", 1).expect("Renamed");
    let renamed_export = export_of(&program, "/p/a.d.ts", "Renamed");
    assert_eq!(program.immediate_alias_target(renamed), Some(renamed_export));
    assert_eq!(program.resolve_alias(renamed), class_a);

    let ns = symbol_at(&program, "/p/b.d.ts", "ns", 1).expect("ns");
    assert!(program.is_module_symbol(program.resolve_alias(ns)));
    assert_eq!(symbol_at(&program, "/p/b.d.ts", "A", 0), Some(class_a));
}

#[test]
fn test_import_type_qualifier_resolves_through_module() {
    let program = build(&[
        ("/p/a.d.ts", "export declare namespace N {\n    interface I {}\n}\n"),
        ("/p/b.d.ts", "export declare const v: import(\"./a\").N.I;\n"),
    ]);
    let n = export_of(&program, "/p/a.d.ts", "N");
    let i = program.export_of_module(n, "I").expect("I");
    assert_eq!(symbol_at(&program, "/p/b.d.ts", "I", 0), Some(i));
    assert_eq!(symbol_at(&program, "/p/b.d.ts", "N", 0), Some(n));

    let b = file(&program, "/p/b.d.ts");
    let import_type = program
        .unit(b)
        .arena
        .nodes
        .iter()
        .position(|node| node.kind == syntax_kind_ext::IMPORT_TYPE)
        .map(|i| NodeIndex(i as u32))
        .expect("import type");
    assert_eq!(
        program.symbol_of_import_type(b, import_type),
        Some(module_of(&program, "/p/a.d.ts"))
    );
}

#[test]
fn test_typeof_parameter_resolves_to_parameter() {
    let program = build(&[("/p/a.d.ts", "export declare function f(a: string): typeof a;\n")]);
    let param = symbol_at(&program, "/p/a.d.ts", "a", 1).expect("a");
    assert!(program
        .symbol(param)
        .expect("symbol")
        .has_any_flags(symbol_flags::PARAMETER));
}

#[test]
fn test_unknown_names_do_not_resolve() {
    let program = build(&[("/p/a.d.ts", "export declare const x: Missing;\n")]);
    assert_eq!(symbol_at(&program, "/p/a.d.ts", "Missing", 0), None);
}

#[test]
fn test_module_locals_shadow_globals() {
    let program = build(&[
        ("/p/a.d.ts", "declare class Date {}\nexport declare const d: Date;\n"),
        ("/p/script.d.ts", "declare const when: Date;\n"),
    ]);
    let local = symbol_at(&program, "/p/a.d.ts", "Date", 1).expect("local Date");
    assert_eq!(symbol_at(&program, "/p/a.d.ts", "Date", 0), Some(local));
    let global = symbol_at(&program, "/p/script.d.ts", "Date", 0).expect("global Date");
    assert_ne!(local, global);
    assert_eq!(program.globals().get("Date").copied(), Some(global));
}
