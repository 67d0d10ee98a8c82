//! Dependencies from `node_modules`, ambient modules, JSON modules, and the
//! external augmentation section.

mod support;

use dtsb_bundler::BundleOptions;
use support::*;

const LIB: (&str, &str) = (
    "/p/node_modules/lib/index.d.ts",
    "export interface Config {\n    a: string;\n}\nexport default class Lib {}\n",
);

#[test]
fn test_external_star_export_passes_through() {
    let out = bundle(
        &[
            ("/p/node_modules/external-lib/index.d.ts", "export declare const e: number;\n"),
            (
                "/p/index.d.ts",
                "export * from \"external-lib\";\nexport declare const own: number;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "export * from \"external-lib\";\n\nexport declare const own: number;\n\nexport {}\n"
    );
    assert!(!out.contains("const e"));
}

#[test]
fn test_external_reference_keeps_its_import() {
    let out = bundle(
        &[
            LIB,
            (
                "/p/index.d.ts",
                "import { Config } from \"lib\";\nexport declare function load(): Config;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import { Config } from \"lib\";\n\nexport declare function load(): Config;\n\nexport {}\n"
    );
}

#[test]
fn test_renamed_external_re_export() {
    let out = bundle(
        &[LIB, ("/p/index.d.ts", "export { Config as Settings } from \"lib\";\n")],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import { Config as Settings } from \"lib\";\n\nexport { Settings };\n\nexport {}\n"
    );
}

#[test]
fn test_external_default_re_export() {
    let out = bundle(
        &[LIB, ("/p/index.d.ts", "export { default } from \"lib\";\n")],
        "/p/index.d.ts",
    );
    assert_eq!(out, "export { default } from \"lib\";\n\nexport {}\n");
}

#[test]
fn test_external_default_and_namespace_imports() {
    let out = bundle(
        &[
            LIB,
            (
                "/p/index.d.ts",
                "import Lib from \"lib\";\nimport * as lib from \"lib\";\n\
                 export declare const l: Lib;\nexport declare const c: lib.Config;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import Lib from \"lib\";\nimport * as lib from \"lib\";\n\n\
         export declare const l: Lib;\n\n\
         export declare const c: lib.Config;\n\n\
         export {}\n"
    );
}

#[test]
fn test_external_import_through_project_re_export() {
    let out = bundle(
        &[
            LIB,
            ("/p/reexport.d.ts", "export { Config } from \"lib\";\n"),
            (
                "/p/index.d.ts",
                "import { Config } from \"./reexport\";\nexport declare const c: Config;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import { Config } from \"lib\";\n\nexport declare const c: Config;\n\nexport {}\n"
    );
}

#[test]
fn test_json_import_is_relative_to_the_bundle() {
    let out = bundle(
        &[
            ("/p/data/values.json", "{ \"answer\": 42 }"),
            (
                "/p/index.d.ts",
                "import data from \"./data/values.json\";\nexport declare const d: typeof data;\n",
            ),
        ],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "import data from \"./data/values.json\";\n\nexport declare const d: typeof data;\n\nexport {}\n"
    );
}

#[test]
fn test_external_augmentation_is_copied_verbatim() {
    let files = [
        LIB,
        (
            "/p/index.d.ts",
            "import { Config } from \"lib\";\n\
             declare module \"lib\" {\n    interface Config { extra: boolean }\n}\n\
             export declare const c: Config;\n",
        ),
    ];
    let out = bundle(&files, "/p/index.d.ts");
    assert_eq!(
        out,
        "import { Config } from \"lib\";\n\n\
         export declare const c: Config;\n\n\
         declare module \"lib\" {\n    interface Config { extra: boolean }\n}\n\n\
         export {}\n"
    );

    let without = try_bundle(
        &files,
        "/p/index.d.ts",
        &BundleOptions {
            augmentations: false,
            ..options()
        },
    )
    .expect("bundle");
    assert!(!without.contains("declare module"), "{without}");
}

#[test]
fn test_directives_are_printed_first() {
    let out = bundle(
        &[(
            "/p/index.d.ts",
            "/// <reference types=\"node\" />\n/// <reference lib=\"dom\" />\nexport declare const a: number;\n",
        )],
        "/p/index.d.ts",
    );
    assert_eq!(
        out,
        "/// <reference types=\"node\" />\n\n/// <reference lib=\"dom\" />\n\n\
         export declare const a: number;\n\nexport {}\n"
    );
}
