//! Export entries: aliases, renames against globals, merged declarations,
//! defaults, script entries and ordering.

mod support;

use dtsb_bundler::BundleError;
use support::*;

#[test]
fn test_same_symbol_under_two_names_is_declared_once() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "export declare class X {\n    x: string;\n}\nexport { X as Y };\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export declare class X {\n    x: string;\n}\n\nexport { X as Y };\n\nexport {}\n"
    );
    assert_eq!(count(&out, "export declare class X {"), 1);
}

#[test]
fn test_re_exports_of_one_original_share_a_declaration() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export declare class X {\n    x: string;\n}\n"),
            ("/p/index.d.ts", "export { X } from \"./a\";\nexport { X as Y } from \"./a\";\n"),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export declare class X {\n    x: string;\n}\n\nexport { X as Y };\n\nexport {}\n"
    );
}

#[test]
fn test_export_colliding_with_global_is_suffixed() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "export declare class Date {\n    value: number;\n}\nexport declare function now(): Date;\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "declare class Date_1 {\n    value: number;\n}\n\n\
         export { Date_1 as Date };\n\n\
         export declare function now(): Date_1;\n\n\
         export {}\n"
    );
}

#[test]
fn test_type_and_namespace_keep_their_shared_name() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "export type StatusCode = 200 | 404;\n\
             export declare namespace StatusCode {\n    const OK: 200;\n}\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export type StatusCode = 200 | 404;\n\n\
         export declare namespace StatusCode {\n    const OK: 200;\n}\n\n\
         export {}\n"
    );
}

#[test]
fn test_self_referencing_class_bound_is_kept() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "export declare class User<T extends User = any> {\n    friend: T;\n}\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export declare class User<T extends User = any> {\n    friend: T;\n}\n\nexport {}\n"
    );
}

#[test]
fn test_default_class_keeps_its_modifiers() {
    let out = bundle(
        &[("/p/index.d.ts", "export default class Foo {\n    a: string;\n}\n")],
        "/p/index.d.ts",
    );
    assert_eq!(out, "export default class Foo {\n    a: string;\n}\n\nexport {}\n");
}

#[test]
fn test_default_variable_becomes_alias_line() {
    let out = bundle(
        &[("/p/index.d.ts", "declare const value: number;\nexport default value;\n")],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "declare const value: number;\n\nexport default value;\n\nexport {}\n"
    );
}

#[test]
fn test_documentation_comment_precedes_declaration() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "/** The answer. */\nexport declare const answer: number;\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "/** The answer. */\nexport declare const answer: number;\n\nexport {}\n"
    );
}

#[test]
fn test_script_entry_exports_its_declarations() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "declare function hello(): string;\ninterface Greeting { text: string }\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export declare function hello(): string;\n\n\
         export interface Greeting { text: string }\n\n\
         export {}\n"
    );
}

#[test]
fn test_star_exported_names_follow_the_star_position() {
    let out = bundle(
        &[
            ("/p/a.d.ts", "export declare const a: number;\n"),
            (
                "/p/index.d.ts",
                "export declare const first: number;\nexport * from \"./a\";\nexport declare const last: number;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    let first = out.find("first").expect("first");
    let a = out.find("const a").expect("a");
    let last = out.find("last").expect("last");
    assert!(first < a && a < last, "{out}");
}

#[test]
fn test_missing_entry_is_reported() {
    let err = try_bundle(
        &[("/p/index.d.ts", "export declare const a: number;\n")],
        "/p/missing.d.ts",
        &options(),
    )
    .unwrap_err();
    assert!(matches!(err, BundleError::EntryNotFound { .. }), "{err}");
}

#[test]
fn test_namespace_re_export_of_project_module_is_rejected() {
    let err = try_bundle(
        &[
            ("/p/a.d.ts", "export declare const a: number;\n"),
            ("/p/index.d.ts", "export * as ns from \"./a\";\n"),
        ],
        "/p/index.d.ts",
        &options(),
    )
    .unwrap_err();
    assert!(matches!(err, BundleError::WholeNamespaceExport { .. }), "{err}");
}

#[test]
fn test_bundle_all_fails_when_any_entry_fails() {
    let program = program(&[("/p/a.d.ts", "export declare const a: number;\n")]);
    let bundles = dtsb_bundler::bundle_all(&program, &["/p/a.d.ts"], &options()).expect("bundle");
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].entry, "/p/a.d.ts");
    assert_eq!(bundles[0].text, "export declare const a: number;\n\nexport {}\n");

    let result = dtsb_bundler::bundle_all(&program, &["/p/a.d.ts", "/p/b.d.ts"], &options());
    assert!(matches!(result, Err(BundleError::EntryNotFound { .. })));
}
