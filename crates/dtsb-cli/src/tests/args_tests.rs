use clap::Parser;

use super::{CliArgs, NewLine};
use dtsb_common::NewLineKind;

#[test]
fn test_parses_defaults() {
    let args = CliArgs::try_parse_from(["dtsb"]).expect("default args should parse");

    assert!(args.config.is_none());
    assert!(args.root_dir.is_none());
    assert!(args.out_dir.is_none());
    assert!(args.entry_points.is_empty());
    assert!(!args.no_globals);
    assert!(!args.no_augmentations);
    assert!(!args.no_fallback);
    assert!(args.new_line.is_none());
    assert!(args.lib.is_empty());
}

#[test]
fn test_parses_repeated_entries_and_flags() {
    let args = CliArgs::try_parse_from([
        "dtsb",
        "--root",
        "dist/types",
        "--out-dir",
        "bundle",
        "--entry",
        "index.d.ts",
        "-e",
        "cli.ts",
        "--no-globals",
        "--no-augmentations",
        "--new-line",
        "CRLF",
        "--no-fallback",
        "--lib",
        "extra.d.ts",
        "--no-default-lib",
        "--list-emitted-files",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.root_dir.as_deref(), Some(std::path::Path::new("dist/types")));
    assert_eq!(args.out_dir.as_deref(), Some(std::path::Path::new("bundle")));
    assert_eq!(args.entry_points, vec!["index.d.ts", "cli.ts"]);
    assert!(args.no_globals);
    assert!(args.no_augmentations);
    assert_eq!(args.new_line, Some(NewLine::Crlf));
    assert!(args.no_fallback);
    assert_eq!(args.lib.len(), 1);
    assert!(args.no_default_lib);
    assert!(args.list_emitted_files);
}

#[test]
fn test_new_line_maps_to_kind() {
    assert_eq!(NewLineKind::from(NewLine::Lf), NewLineKind::LineFeed);
    assert_eq!(NewLineKind::from(NewLine::Crlf), NewLineKind::CarriageReturnLineFeed);
}

#[test]
fn test_rejects_unknown_new_line() {
    assert!(CliArgs::try_parse_from(["dtsb", "--new-line", "cr"]).is_err());
}
