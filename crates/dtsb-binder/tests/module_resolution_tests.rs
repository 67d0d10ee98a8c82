//! Program loading, module resolution and source classification.

mod support;

use dtsb_binder::{DEFAULT_LIB_PATH, ProgramBuilder, ProgramError, symbol_flags};
use support::*;

#[test]
fn test_node_modules_packages_load_as_external_libraries() {
    let program = build(&[
        (
            "/p/src/index.d.ts",
            "import { Lib } from \"lib\";\nexport declare const l: Lib;\n",
        ),
        ("/p/node_modules/lib/package.json", "{ \"types\": \"types.d.ts\" }"),
        ("/p/node_modules/lib/types.d.ts", "export interface Lib {}\n"),
    ]);
    let index = file(&program, "/p/src/index.d.ts");
    let lib = file(&program, "/p/node_modules/lib/types.d.ts");
    assert!(program.is_external_library(lib));
    assert!(!program.is_external_library(index));
    assert_eq!(
        program.resolve_module(index, "lib"),
        program.module_symbol_of_file(lib)
    );
    assert_eq!(program.root_files(), &[index]);
}

#[test]
fn test_ambient_module_wins_for_bare_specifiers() {
    let program = build(&[
        (
            "/p/types.d.ts",
            "declare module \"virtual\" {\n    export interface V {}\n}\n",
        ),
        (
            "/p/index.d.ts",
            "import { V } from \"virtual\";\nexport declare const v: V;\n",
        ),
    ]);
    let index = file(&program, "/p/index.d.ts");
    let ambient = program.ambient_module("virtual").expect("ambient module");
    assert_eq!(program.resolve_module(index, "virtual"), Some(ambient));
    assert!(program.is_ambient_module_symbol(ambient));
    assert!(!program.is_module_symbol(ambient));

    let v = symbol_at(&program, "/p/index.d.ts", "V", 1).expect("V");
    let target = program.resolve_alias(v);
    assert!(program
        .symbol(target)
        .expect("V")
        .has_any_flags(symbol_flags::INTERFACE));
}

#[test]
fn test_json_keys_become_exports() {
    let program = build(&[
        ("/p/data.json", "{ \"name\": \"x\", \"version\": 1 }"),
        (
            "/p/index.d.ts",
            "import data from \"./data.json\";\nimport { name } from \"./data.json\";\n\
             export declare const d: typeof data;\nexport declare const n: typeof name;\n",
        ),
    ]);
    let json = file(&program, "/p/data.json");
    assert!(program.is_json(json));
    assert_eq!(export_names(&program, "/p/data.json"), vec!["default", "name", "version"]);

    let name = symbol_at(&program, "/p/index.d.ts", "name", 1).expect("name");
    let target = program.resolve_alias(name);
    let symbol = program.symbol(target).expect("name");
    assert!(symbol.has_any_flags(symbol_flags::VARIABLE));
    assert_eq!(symbol.declarations[0].file, json);
}

#[test]
fn test_unresolved_relative_import_is_an_error() {
    let host = host(&[(
        "/p/index.d.ts",
        "import { X } from \"./missing\";\nexport declare const x: X;\n",
    )]);
    let err = ProgramBuilder::new(&host)
        .root("/p/index.d.ts")
        .build()
        .expect_err("missing module");
    assert!(matches!(
        err,
        ProgramError::UnresolvedModule { ref specifier, .. } if specifier == "./missing"
    ));
}

#[test]
fn test_syntax_error_in_project_file_is_an_error() {
    let host = host(&[("/p/index.d.ts", "export declare const = ;\n")]);
    let err = ProgramBuilder::new(&host)
        .root("/p/index.d.ts")
        .build()
        .expect_err("syntax error");
    assert!(matches!(err, ProgramError::Parse { .. }));
}

#[test]
fn test_missing_root_is_unreadable() {
    let host = host(&[]);
    let err = ProgramBuilder::new(&host)
        .root("/p/none.d.ts")
        .build()
        .expect_err("missing root");
    assert!(matches!(err, ProgramError::Unreadable { ref path } if path == "/p/none.d.ts"));
}

#[test]
fn test_reference_types_directive_loads_types_package() {
    let program = build(&[
        (
            "/p/index.d.ts",
            "/// <reference types=\"node\" />\nexport declare const x: number;\n",
        ),
        (
            "/p/node_modules/@types/node/index.d.ts",
            "declare module \"fs\" {\n    export function read(): void;\n}\n",
        ),
    ]);
    let node = file(&program, "/p/node_modules/@types/node/index.d.ts");
    assert!(program.is_external_library(node));
    let fs = program.ambient_module("fs").expect("fs");
    assert!(program.export_of_module(fs, "read").is_some());
}

#[test]
fn test_default_library_classification() {
    let host = host(&[
        ("/p/index.d.ts", "export declare const p: Promise<number>;\n"),
        ("/p/extra.d.ts", "declare interface Extra {}\n"),
        (
            "/p/nolib.d.ts",
            "/// <reference no-default-lib=\"true\"/>\ndeclare interface Custom {}\n",
        ),
    ]);
    let program = ProgramBuilder::new(&host)
        .root("/p/index.d.ts")
        .root("/p/nolib.d.ts")
        .lib_file("/p/extra.d.ts")
        .build()
        .expect("program");
    let lib = program.file_id(DEFAULT_LIB_PATH).expect("embedded lib");
    assert!(program.is_default_library(lib));
    assert!(program.is_default_library(file(&program, "/p/extra.d.ts")));
    assert!(program.is_default_library(file(&program, "/p/nolib.d.ts")));
    assert!(!program.is_default_library(file(&program, "/p/index.d.ts")));
    assert!(program.globals().contains_key("Promise"));
    assert!(program.globals().contains_key("Extra"));

    let bare = ProgramBuilder::new(&host)
        .root("/p/index.d.ts")
        .no_default_lib(true)
        .build()
        .expect("program");
    assert!(bare.file_id(DEFAULT_LIB_PATH).is_none());
    assert!(!bare.globals().contains_key("Promise"));
}

#[test]
fn test_reexport_chain_across_files() {
    let program = build(&[
        ("/p/a.d.ts", "export declare class A {}\n"),
        ("/p/b.d.ts", "export { A as B } from \"./a\";\n"),
        ("/p/c.d.ts", "export { B as C } from \"./b\";\n"),
    ]);
    let c = export_of(&program, "/p/c.d.ts", "C");
    let b = export_of(&program, "/p/b.d.ts", "B");
    assert_eq!(program.immediate_alias_target(c), Some(b));
    assert_eq!(program.resolve_alias(c), export_of(&program, "/p/a.d.ts", "A"));
    let decl = program.symbol(c).expect("C").declarations[0];
    assert_eq!(program.module_specifier_of(decl), Some("./b"));
    assert_eq!(
        program.module_of_declaration(decl),
        Some(module_of(&program, "/p/b.d.ts"))
    );
}
