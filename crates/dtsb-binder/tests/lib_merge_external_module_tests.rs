//! Module augmentations, ambient module merging, global augmentation of the
//! default library, and star exports.

mod support;

use support::*;

#[test]
fn test_relative_augmentation_merges_into_target_module() {
    let program = build(&[
        ("/p/a.d.ts", "export interface Options { a: string }\n"),
        (
            "/p/plugin.d.ts",
            "declare module \"./a\" {\n    interface Options { b: number }\n}\nexport {};\n",
        ),
    ]);
    let options = export_of(&program, "/p/a.d.ts", "Options");
    let symbol = program.symbol(options).expect("Options");
    assert_eq!(symbol.declarations.len(), 2);
    assert_eq!(symbol.declarations[1].file, file(&program, "/p/plugin.d.ts"));
}

#[test]
fn test_package_augmentation_merges_into_resolved_package() {
    let program = build(&[
        ("/p/node_modules/lib/index.d.ts", "export interface Config { a: string }\n"),
        (
            "/p/index.d.ts",
            "import { Config } from \"lib\";\n\
             declare module \"lib\" {\n    interface Config { extra: boolean }\n}\n\
             export declare const c: Config;\n",
        ),
    ]);
    let config = export_of(&program, "/p/node_modules/lib/index.d.ts", "Config");
    assert_eq!(program.symbol(config).expect("Config").declarations.len(), 2);
    let local = symbol_at(&program, "/p/index.d.ts", "Config", 2).expect("Config");
    assert_eq!(program.resolve_alias(local), config);
}

#[test]
fn test_augmentation_of_unknown_module_creates_ambient_module() {
    let program = build(&[(
        "/p/index.d.ts",
        "declare module \"nowhere\" {\n    export const x: number;\n}\nexport {};\n",
    )]);
    let nowhere = program.ambient_module("nowhere").expect("ambient");
    assert!(program.export_of_module(nowhere, "x").is_some());
    assert!(program.is_ambient_module_symbol(nowhere));
}

#[test]
fn test_ambient_module_declarations_merge() {
    let program = build(&[
        ("/p/a.d.ts", "declare module \"m\" {\n    export const a: number;\n}\n"),
        ("/p/b.d.ts", "declare module \"m\" {\n    export const b: number;\n}\n"),
    ]);
    let m = program.ambient_module("m").expect("m");
    let names: Vec<String> = program.exports_of_module(m).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(program.symbol(m).expect("m").declarations.len(), 2);
}

#[test]
fn test_global_augmentation_merges_with_default_library() {
    let program = build(&[(
        "/p/index.d.ts",
        "declare global {\n    interface Array<T> { custom(): T }\n}\nexport {};\n",
    )]);
    let array = program.globals().get("Array").copied().expect("Array");
    let index = file(&program, "/p/index.d.ts");
    let symbol = program.symbol(array).expect("Array");
    assert!(symbol.declarations.iter().any(|d| d.file == index));
    assert!(symbol.declarations.iter().any(|d| program.is_default_library(d.file)));
}

#[test]
fn test_star_exports_follow_own_exports_and_skip_default() {
    let program = build(&[
        (
            "/p/a.d.ts",
            "export declare const a: number;\nexport default class D {}\n",
        ),
        (
            "/p/b.d.ts",
            "export * from \"./a\";\nexport declare const b: number;\n",
        ),
    ]);
    let b = module_of(&program, "/p/b.d.ts");
    assert_eq!(export_names(&program, "/p/b.d.ts"), vec!["b", "a"]);
    assert_eq!(program.star_export_declarations(b).len(), 1);
    assert_eq!(
        program.export_of_module(b, "a"),
        Some(export_of(&program, "/p/a.d.ts", "a"))
    );
    assert_eq!(program.export_of_module(b, "default"), None);
}

#[test]
fn test_star_export_cycles_terminate() {
    let program = build(&[
        ("/p/a.d.ts", "export * from \"./b\";\nexport declare const a: number;\n"),
        ("/p/b.d.ts", "export * from \"./a\";\nexport declare const b: number;\n"),
    ]);
    assert_eq!(export_names(&program, "/p/a.d.ts"), vec!["a", "b"]);
    assert_eq!(export_names(&program, "/p/b.d.ts"), vec!["b", "a"]);
    assert!(program.export_of_module(module_of(&program, "/p/a.d.ts"), "missing").is_none());
}
