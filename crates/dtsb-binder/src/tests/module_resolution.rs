use super::*;
use crate::host::MemoryHost;

#[test]
fn test_normalize_collapses_dot_segments() {
    assert_eq!(normalize("/a/./b/../c.d.ts"), "/a/c.d.ts");
    assert_eq!(normalize("src\\lib\\x.d.ts"), "src/lib/x.d.ts");
    assert_eq!(normalize("/"), "/");
}

#[test]
fn test_dirname_and_join() {
    assert_eq!(dirname("/a/b.d.ts"), "/a");
    assert_eq!(dirname("/b.d.ts"), "/");
    assert_eq!(dirname("b.d.ts"), "");
    assert_eq!(join("/a", "../b"), "/b");
    assert_eq!(join("/", "node_modules"), "/node_modules");
    assert_eq!(join("", "x"), "x");
}

#[test]
fn test_package_specifiers_split_scope_and_subpath() {
    assert_eq!(split_package("lodash"), ("lodash", None));
    assert_eq!(split_package("lodash/fp"), ("lodash", Some("fp")));
    assert_eq!(split_package("@scope/pkg"), ("@scope/pkg", None));
    assert_eq!(split_package("@scope/pkg/deep/x"), ("@scope/pkg", Some("deep/x")));
    assert_eq!(types_package_name("@scope/pkg"), "@types/scope__pkg");
    assert_eq!(types_package_name("node"), "@types/node");
}

#[test]
fn test_relative_specifier_tries_declaration_then_index() {
    let host = MemoryHost::new()
        .with_file("/p/src/a.d.ts", "")
        .with_file("/p/src/dir/index.d.ts", "")
        .with_file("/p/src/data.json", "{}");
    assert_eq!(
        resolve_module_file(&host, "/p/src/main.d.ts", "./a").as_deref(),
        Some("/p/src/a.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, "/p/src/main.d.ts", "./a.js").as_deref(),
        Some("/p/src/a.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, "/p/src/main.d.ts", "./dir").as_deref(),
        Some("/p/src/dir/index.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, "/p/src/main.d.ts", "./data.json").as_deref(),
        Some("/p/src/data.json")
    );
    assert_eq!(resolve_module_file(&host, "/p/src/main.d.ts", "./missing"), None);
}

#[test]
fn test_bare_specifier_walks_up_node_modules() {
    let host = MemoryHost::new()
        .with_file("/p/node_modules/lib/package.json", r#"{ "types": "dist/lib.d.ts" }"#)
        .with_file("/p/node_modules/lib/dist/lib.d.ts", "")
        .with_file("/p/node_modules/@types/other/index.d.ts", "")
        .with_file("/p/node_modules/plain/index.d.ts", "")
        .with_file("/p/node_modules/plain/sub.d.ts", "");
    let from = "/p/src/deep/main.d.ts";
    assert_eq!(
        resolve_module_file(&host, from, "lib").as_deref(),
        Some("/p/node_modules/lib/dist/lib.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, from, "other").as_deref(),
        Some("/p/node_modules/@types/other/index.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, from, "plain").as_deref(),
        Some("/p/node_modules/plain/index.d.ts")
    );
    assert_eq!(
        resolve_module_file(&host, from, "plain/sub").as_deref(),
        Some("/p/node_modules/plain/sub.d.ts")
    );
    assert_eq!(resolve_module_file(&host, from, "nope"), None);
}

#[test]
fn test_type_references_prefer_types_packages() {
    let host = MemoryHost::new()
        .with_file("/p/node_modules/node/index.d.ts", "")
        .with_file("/p/node_modules/@types/node/index.d.ts", "");
    assert_eq!(
        resolve_type_reference(&host, "/p/a.d.ts", "node").as_deref(),
        Some("/p/node_modules/@types/node/index.d.ts")
    );
    assert_eq!(
        resolve_reference_path(&host, "/p/node_modules/@types/node/index.d.ts", "./index.d.ts").as_deref(),
        Some("/p/node_modules/@types/node/index.d.ts")
    );
}
