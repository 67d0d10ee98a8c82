//! References from bundled declarations: local dependencies, name clashes
//! between them, and namespace-qualified access.

mod support;

use dtsb_bundler::BundleError;
use support::*;

#[test]
fn test_unexported_dependency_is_declared_before_its_user() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "interface Options {\n    a: string;\n}\nexport declare function run(options: Options): void;\nexport {};\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "interface Options {\n    a: string;\n}\n\n\
         export declare function run(options: Options): void;\n\n\
         export {}\n"
    );
}

#[test]
fn test_clashing_local_names_get_distinct_suffixes() {
    let out = bundle(
        &[
            (
                "/p/a.d.ts",
                "interface Options {\n    a: string;\n}\nexport declare function a(options: Options): void;\n",
            ),
            (
                "/p/b.d.ts",
                "interface Options {\n    b: number;\n}\nexport declare function b(options: Options): void;\n",
            ),
            ("/p/index.d.ts", "export { a } from \"./a\";\nexport { b } from \"./b\";\n"),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "interface Options {\n    a: string;\n}\n\n\
         export declare function a(options: Options): void;\n\n\
         interface Options_1 {\n    b: number;\n}\n\n\
         export declare function b(options: Options_1): void;\n\n\
         export {}\n"
    );
}

#[test]
fn test_shared_dependency_is_declared_once() {
    let out = bundle(
        &[
            ("/p/types.d.ts", "export interface Shared {\n    s: string;\n}\n"),
            (
                "/p/a.d.ts",
                "import { Shared } from \"./types\";\nexport declare const a: Shared;\n",
            ),
            (
                "/p/b.d.ts",
                "import { Shared } from \"./types\";\nexport declare const b: Shared;\n",
            ),
            ("/p/index.d.ts", "export { a } from \"./a\";\nexport { b } from \"./b\";\n"),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(count(&out, "interface Shared"), 1);
    assert_eq!(
        out,
        "interface Shared {\n    s: string;\n}\n\n\
         export declare const a: Shared;\n\n\
         export declare const b: Shared;\n\n\
         export {}\n"
    );
}

#[test]
fn test_local_dependency_avoids_exported_name() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export interface Item {\n    a: string;\n}\n"),
            (
                "/p/index.d.ts",
                "import { Item as AItem } from \"./a\";\n\
                 export interface Item {\n    own: AItem;\n}\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "interface Item_1 {\n    a: string;\n}\n\n\
         export interface Item {\n    own: Item_1;\n}\n\n\
         export {}\n"
    );
}

#[test]
fn test_namespace_import_access_is_flattened() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export interface Foo {\n    a: string;\n}\n"),
            (
                "/p/index.d.ts",
                "import * as ns from \"./a\";\nexport declare const x: ns.Foo;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "interface Foo {\n    a: string;\n}\n\nexport declare const x: Foo;\n\nexport {}\n"
    );
}

#[test]
fn test_import_type_is_flattened() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export interface Foo { a: string }\n"),
            ("/p/index.d.ts", "export declare const x: import(\"./a\").Foo;\n"),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "interface Foo { a: string }\n\nexport declare const x: Foo;\n\nexport {}\n"
    );
}

#[test]
fn test_namespace_access_to_exported_symbol_uses_export_name() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export interface Foo { a: string }\n"),
            (
                "/p/index.d.ts",
                "import * as ns from \"./a\";\nexport { Foo } from \"./a\";\nexport declare const x: ns.Foo;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(count(&out, "interface Foo"), 1);
    assert!(out.contains("export interface Foo { a: string }\n"), "{out}");
    assert!(out.contains("export declare const x: Foo;\n"), "{out}");
}

#[test]
fn test_namespace_without_property_is_rejected() {
    let err = try_bundle(
        &[
            ("/p/a.d.ts", "export declare const a: number;\n"),
            (
                "/p/index.d.ts",
                "import * as ns from \"./a\";\nexport declare const x: typeof ns;\n",
            ),
        ],
        "/p/index.d.ts",
        &options(),
    )
    .unwrap_err();
    assert!(matches!(err, BundleError::NamespaceWithoutProperty { .. }), "{err}");
}

#[test]
fn test_type_parameters_are_not_dependencies() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "export declare function id<T>(value: T): T;\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(out, "export declare function id<T>(value: T): T;\n\nexport {}\n");
}

const EXT_FOO: (&str, &str) = ("/p/node_modules/ext/index.d.ts", "export interface Foo {\n    ext: 1;\n}\n");
const LOCAL_FOO: (&str, &str) = ("/p/a.d.ts", "export interface Foo {\n    local: 1;\n}\n");

#[test]
fn test_import_is_renamed_when_a_local_declaration_holds_its_name() {
    let out = bundle(
        &[
            EXT_FOO,
            LOCAL_FOO,
            (
                "/p/index.d.ts",
                "import { Foo as Local } from \"./a\";\nimport { Foo } from \"ext\";\n\
                 export interface Pair {\n    l: Local;\n    e: Foo;\n}\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import { Foo as Foo_1 } from \"ext\";\n\n\
         interface Foo {\n    local: 1;\n}\n\n\
         export interface Pair {\n    l: Foo;\n    e: Foo_1;\n}\n\n\
         export {}\n"
    );
}

#[test]
fn test_local_declaration_is_renamed_when_an_import_holds_its_name() {
    let out = bundle(
        &[
            EXT_FOO,
            LOCAL_FOO,
            (
                "/p/index.d.ts",
                "import { Foo as Local } from \"./a\";\nimport { Foo } from \"ext\";\n\
                 export interface Pair {\n    e: Foo;\n    l: Local;\n}\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import { Foo } from \"ext\";\n\n\
         interface Foo_1 {\n    local: 1;\n}\n\n\
         export interface Pair {\n    e: Foo;\n    l: Foo_1;\n}\n\n\
         export {}\n"
    );
}

#[test]
fn test_unexported_dependency_colliding_with_global_is_suffixed() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export declare class Date {\n    value: number;\n}\n"),
            (
                "/p/index.d.ts",
                "import { Date } from \"./a\";\nexport declare function now(): Date;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "declare class Date_1 {\n    value: number;\n}\n\n\
         export declare function now(): Date_1;\n\n\
         export {}\n"
    );
}

#[test]
fn test_variable_statement_is_split_and_keeps_its_documentation() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "/** Shared doc. */\nexport declare const a: number, b: string;\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "/** Shared doc. */\nexport declare const a: number;\n\n\
         /** Shared doc. */\nexport declare const b: string;\n\n\
         export {}\n"
    );
}
