use super::*;

#[test]
fn test_relative_specifiers() {
    assert!(is_relative_specifier("./a"));
    assert!(is_relative_specifier("../a/b"));
    assert!(is_relative_specifier("/abs/path"));
    assert!(!is_relative_specifier("lodash"));
    assert!(!is_relative_specifier("@types/node"));
}

#[test]
fn test_declaration_file_names() {
    assert_eq!(to_declaration_file_name("src/index.ts"), "src/index.d.ts");
    assert_eq!(to_declaration_file_name("src/index.js"), "src/index.d.ts");
    assert_eq!(to_declaration_file_name("src/index.d.ts"), "src/index.d.ts");
    assert_eq!(to_declaration_file_name("src/index"), "src/index");
}

#[test]
fn test_normalizes_dot_segments() {
    assert_eq!(
        normalize_path(Path::new("/p/src/./a/../b.d.ts")),
        PathBuf::from("/p/src/b.d.ts")
    );
    assert_eq!(
        ensure_absolute(Path::new("index.d.ts"), Path::new("/p/dist")),
        PathBuf::from("/p/dist/index.d.ts")
    );
}

#[test]
fn test_module_specifier_between_files() {
    assert_eq!(
        relative_module_specifier(Path::new("/p/dist/index.d.ts"), Path::new("/p/dist/data.json")),
        "./data.json"
    );
    assert_eq!(
        relative_module_specifier(Path::new("/p/dist/index.d.ts"), Path::new("/p/data/info.json")),
        "../data/info.json"
    );
}

#[test]
fn test_node_modules_detection() {
    assert!(is_in_node_modules(Path::new("/p/node_modules/lib/index.d.ts")));
    assert!(!is_in_node_modules(Path::new("/p/src/node_modules_like.d.ts")));
}
