use super::*;
use clap::Parser;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["dtsb"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args")
}

#[test]
fn test_parses_all_keys() {
    let config = parse_config(
        r#"{
            "rootDir": "types",
            "outDir": "dist",
            "entryPoint": ["index.ts", "cli.js"],
            "fallbackOnError": "false",
            "globals": false,
            "augmentations": "true",
            "newLine": "crlf",
            "lib": ["env.d.ts"],
            "noDefaultLib": true,
            "listEmittedFiles": "yes"
        }"#,
    )
    .expect("config");

    assert_eq!(config.root_dir.as_deref(), Some("types"));
    assert_eq!(config.out_dir.as_deref(), Some("dist"));
    assert_eq!(
        config.entry_point,
        Some(EntryPoints::Many(vec!["index.ts".into(), "cli.js".into()]))
    );
    assert_eq!(config.fallback_on_error, Some(false));
    assert_eq!(config.globals, Some(false));
    assert_eq!(config.augmentations, Some(true));
    assert_eq!(config.new_line, Some(NewLineKind::CarriageReturnLineFeed));
    assert_eq!(config.lib, Some(vec!["env.d.ts".to_string()]));
    assert_eq!(config.no_default_lib, Some(true));
    assert_eq!(config.list_emitted_files, Some(true));
}

#[test]
fn test_single_entry_point_string() {
    let config = parse_config(r#"{ "entryPoint": "index.d.ts" }"#).expect("config");
    assert_eq!(config.entry_point, Some(EntryPoints::One("index.d.ts".into())));
}

#[test]
fn test_rejects_invalid_boolean_string() {
    let err = parse_config(r#"{ "globals": "maybe" }"#).unwrap_err();
    assert!(format!("{err:#}").contains("invalid boolean value"), "{err:#}");
}

#[test]
fn test_entry_points_are_declaration_files_under_root() {
    let root = Path::new("/work/types");
    assert_eq!(normalize_entry_point("index.ts", root), PathBuf::from("/work/types/index.d.ts"));
    assert_eq!(normalize_entry_point("./lib/cli.js", root), PathBuf::from("/work/types/lib/cli.d.ts"));
    assert_eq!(normalize_entry_point("index.d.ts", root), PathBuf::from("/work/types/index.d.ts"));
    assert_eq!(normalize_entry_point("/abs/main.d.ts", root), PathBuf::from("/abs/main.d.ts"));
}

#[test]
fn test_config_paths_resolve_against_config_directory() {
    let config = parse_config(r#"{ "rootDir": "types", "outDir": "dist", "entryPoint": "index.ts" }"#)
        .expect("config");
    let options = resolve_options(&config, Path::new("/project"), &args(&[]), Path::new("/cwd")).expect("options");

    assert_eq!(options.root_dir, PathBuf::from("/project/types"));
    assert_eq!(options.out_dir, PathBuf::from("/project/dist"));
    assert_eq!(options.entry_points, vec![PathBuf::from("/project/types/index.d.ts")]);
    assert!(options.fallback_on_error);
    assert!(options.bundle.globals);
    assert!(options.bundle.augmentations);
    assert_eq!(options.bundle.new_line, NewLineKind::Platform);
}

#[test]
fn test_flags_override_config() {
    let config = parse_config(
        r#"{ "rootDir": "types", "entryPoint": "index.ts", "newLine": "lf", "fallbackOnError": true }"#,
    )
    .expect("config");
    let options = resolve_options(
        &config,
        Path::new("/project"),
        &args(&["--root", "other", "--entry", "main.ts", "--new-line", "crlf", "--no-fallback", "--no-globals"]),
        Path::new("/cwd"),
    )
    .expect("options");

    assert_eq!(options.root_dir, PathBuf::from("/cwd/other"));
    assert_eq!(options.out_dir, PathBuf::from("/cwd/other"));
    assert_eq!(options.entry_points, vec![PathBuf::from("/cwd/other/main.d.ts")]);
    assert_eq!(options.bundle.new_line, NewLineKind::CarriageReturnLineFeed);
    assert!(!options.fallback_on_error);
    assert!(!options.bundle.globals);
}

#[test]
fn test_missing_entry_point_is_an_error() {
    let err = resolve_options(&BundleConfig::default(), Path::new("/p"), &args(&[]), Path::new("/p")).unwrap_err();
    assert!(err.to_string().contains("no entry point"), "{err}");
}
