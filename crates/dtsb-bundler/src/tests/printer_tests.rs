use super::*;

fn set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn map(items: &[(&str, &str)]) -> IndexMap<String, String> {
    items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_empty_bundle_is_only_the_module_marker() {
    let exports = IndexMap::new();
    let text = print(
        &Sections {
            import_groups: &[],
            exports: &exports,
            globals: None,
            augmentations: None,
        },
        NewLineKind::LineFeed,
    );
    assert_eq!(text, "export {}\n");
}

#[test]
fn test_sections_print_in_fixed_order() {
    let types = set(&["/// <reference types=\"node\" />"]);
    let libs = IndexSet::new();
    let imports = set(&["import { A } from \"a\";", "import B from \"b\";"]);
    let exports = map(&[
        ("export declare const x: A;", "/** The x. */"),
        ("export { x as y };", ""),
    ]);
    let globals = map(&[("interface Window {\n    app: B;\n}", "")]);
    let augmentations = set(&["declare module \"a\" {\n    interface A {}\n}"]);

    let text = print(
        &Sections {
            import_groups: &[&types, &libs, &imports],
            exports: &exports,
            globals: Some(&globals),
            augmentations: Some(&augmentations),
        },
        NewLineKind::LineFeed,
    );

    let expected = "\
/// <reference types=\"node\" />

import { A } from \"a\";
import B from \"b\";

/** The x. */
export declare const x: A;

export { x as y };

declare global {
interface Window {
    app: B;
}
}

declare module \"a\" {
    interface A {}
}

export {}
";
    assert_eq!(text, expected);
}

#[test]
fn test_empty_globals_block_is_omitted() {
    let exports = map(&[("export declare const x: number;", "")]);
    let globals = IndexMap::new();
    let text = print(
        &Sections {
            import_groups: &[],
            exports: &exports,
            globals: Some(&globals),
            augmentations: None,
        },
        NewLineKind::LineFeed,
    );
    assert_eq!(text, "export declare const x: number;\n\nexport {}\n");
}

#[test]
fn test_crlf_is_applied_to_copied_text() {
    let exports = map(&[("export interface A {\n    a: string;\r\n}", "")]);
    let text = print(
        &Sections {
            import_groups: &[],
            exports: &exports,
            globals: None,
            augmentations: None,
        },
        NewLineKind::CarriageReturnLineFeed,
    );
    assert_eq!(
        text,
        "export interface A {\r\n    a: string;\r\n}\r\n\r\nexport {}\r\n"
    );
}
