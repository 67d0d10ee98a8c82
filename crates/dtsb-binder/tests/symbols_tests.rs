//! Symbol declaration and merging tests.

mod support;

use dtsb_binder::symbol_flags;
use support::*;

#[test]
fn test_interfaces_merge_into_one_symbol() {
    let program = build(&[(
        "/p/a.d.ts",
        "export interface A { x: string }\nexport interface A { y: number }\n",
    )]);
    let a = export_of(&program, "/p/a.d.ts", "A");
    let symbol = program.symbol(a).expect("symbol");
    assert_eq!(symbol.declarations.len(), 2);
    assert!(symbol.has_any_flags(symbol_flags::INTERFACE));
}

#[test]
fn test_namespace_merges_with_class_and_overloads_share_symbol() {
    let program = build(&[(
        "/p/a.d.ts",
        "export declare class C {}\n\
         export declare namespace C {\n    const x: number;\n}\n\
         export declare function f(): void;\n\
         export declare function f(a: string): void;\n",
    )]);
    let c = program.symbol(export_of(&program, "/p/a.d.ts", "C")).expect("C");
    assert!(c.has_any_flags(symbol_flags::CLASS));
    assert!(c.has_any_flags(symbol_flags::NAMESPACE_MODULE));
    assert_eq!(c.declarations.len(), 2);
    assert!(c.exports.contains_key("x"));

    let f = program.symbol(export_of(&program, "/p/a.d.ts", "f")).expect("f");
    assert_eq!(f.declarations.len(), 2);
    assert!(f.has_any_flags(symbol_flags::FUNCTION));
}

#[test]
fn test_export_default_class_binds_local_name_and_default() {
    let program = build(&[(
        "/p/a.d.ts",
        "export default class Foo {}\nexport declare const x: Foo;\n",
    )]);
    assert_eq!(export_names(&program, "/p/a.d.ts"), vec!["default", "x"]);
    let default = export_of(&program, "/p/a.d.ts", "default");
    assert_eq!(program.symbol_name(default), "Foo");
    let unit = program.unit(file(&program, "/p/a.d.ts"));
    assert_eq!(unit.locals.get("Foo").copied(), Some(default));
    assert_eq!(symbol_at(&program, "/p/a.d.ts", "Foo", 1), Some(default));
}

#[test]
fn test_unnamed_default_function_is_named_default() {
    let program = build(&[("/p/a.d.ts", "export default function (): void;\n")]);
    let default = export_of(&program, "/p/a.d.ts", "default");
    let symbol = program.symbol(default).expect("symbol");
    assert_eq!(symbol.escaped_name, "default");
    assert!(symbol.has_any_flags(symbol_flags::FUNCTION));
}

#[test]
fn test_export_list_disables_implicit_exports() {
    let program = build(&[(
        "/p/a.d.ts",
        "declare class Hidden {}\ndeclare class Shown {}\nexport { Shown };\n",
    )]);
    assert_eq!(export_names(&program, "/p/a.d.ts"), vec!["Shown"]);
    let shown = export_of(&program, "/p/a.d.ts", "Shown");
    assert!(program.symbol(shown).expect("alias").is_alias());
    let target = program.resolve_alias(shown);
    let target_symbol = program.symbol(target).expect("class");
    assert!(target_symbol.has_any_flags(symbol_flags::CLASS));
    assert_eq!(target_symbol.escaped_name, "Shown");
}

#[test]
fn test_declarations_are_implicitly_exported_without_export_list() {
    let program = build(&[("/p/a.d.ts", "declare class A {}\nexport declare class B {}\n")]);
    assert_eq!(export_names(&program, "/p/a.d.ts"), vec!["A", "B"]);
}

#[test]
fn test_script_files_merge_into_globals() {
    let program = build(&[
        (
            "/p/globals.d.ts",
            "declare interface Widget { a: string }\ndeclare const VERSION: string;\n",
        ),
        ("/p/more.d.ts", "interface Widget { b: number }\n"),
    ]);
    let widget = program.globals().get("Widget").copied().expect("Widget");
    let symbol = program.symbol(widget).expect("symbol");
    assert_eq!(symbol.declarations.len(), 2);
    assert_ne!(symbol.declarations[0].file, symbol.declarations[1].file);
    assert!(program.globals().contains_key("VERSION"));
    assert_eq!(
        program.module_symbol_of_file(file(&program, "/p/globals.d.ts")),
        None
    );
}

#[test]
fn test_declare_global_binds_into_globals_not_exports() {
    let program = build(&[(
        "/p/m.d.ts",
        "export declare const a: number;\ndeclare global {\n    interface Window { custom: string }\n}\n",
    )]);
    assert!(program.globals().contains_key("Window"));
    assert_eq!(export_names(&program, "/p/m.d.ts"), vec!["a"]);
}

#[test]
fn test_imports_are_local_aliases() {
    let program = build(&[
        ("/p/a.d.ts", "export declare class A {}\n"),
        (
            "/p/b.d.ts",
            "import { A } from \"./a\";\nexport declare const b: A;\n",
        ),
    ]);
    assert_eq!(export_names(&program, "/p/b.d.ts"), vec!["b"]);
    let unit = program.unit(file(&program, "/p/b.d.ts"));
    let local = unit.locals.get("A").copied().expect("import alias");
    assert!(program.symbol(local).expect("alias").is_alias());
    assert_eq!(
        program.resolve_alias(local),
        export_of(&program, "/p/a.d.ts", "A")
    );
}

#[test]
fn test_variable_statement_declares_each_declarator() {
    let program = build(&[(
        "/p/a.d.ts",
        "export declare const a: number, b: string;\nexport declare let c: boolean;\n",
    )]);
    assert_eq!(export_names(&program, "/p/a.d.ts"), vec!["a", "b", "c"]);
    let b = program.symbol(export_of(&program, "/p/a.d.ts", "b")).expect("b");
    assert!(b.has_any_flags(symbol_flags::VARIABLE));
}

#[test]
fn test_enum_and_type_alias_flags() {
    let program = build(&[(
        "/p/a.d.ts",
        "export declare const enum E { A = 1 }\nexport type T = string | E;\n",
    )]);
    let e = program.symbol(export_of(&program, "/p/a.d.ts", "E")).expect("E");
    assert!(e.has_any_flags(symbol_flags::ENUM));
    let t = program.symbol(export_of(&program, "/p/a.d.ts", "T")).expect("T");
    assert!(t.has_any_flags(symbol_flags::TYPE_ALIAS));
}

#[test]
fn test_export_as_namespace_creates_global_alias() {
    let program = build(&[(
        "/p/lib.d.ts",
        "export declare function f(): void;\nexport as namespace Lib;\n",
    )]);
    let lib = program.globals().get("Lib").copied().expect("Lib");
    assert_eq!(program.resolve_alias(lib), module_of(&program, "/p/lib.d.ts"));
}

#[test]
fn test_dotted_namespace_nests_members() {
    let program = build(&[(
        "/p/a.d.ts",
        "export declare namespace A.B {\n    interface C {}\n}\n",
    )]);
    let a = export_of(&program, "/p/a.d.ts", "A");
    let b = program.export_of_module(a, "B").expect("B");
    assert!(program.export_of_module(b, "C").is_some());
}
