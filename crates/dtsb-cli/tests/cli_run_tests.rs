//! End-to-end runs of the `dtsb` binary over a temporary project.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, text).expect("write");
}

fn dtsb(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dtsb"))
        .current_dir(cwd)
        .args(args)
        .env_remove("DTSB_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run dtsb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_bundles_entry_from_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "dtsb.json",
        r#"{ "rootDir": "types", "outDir": "dist", "entryPoint": "index.ts", "newLine": "lf" }"#,
    );
    write(root, "types/a.d.ts", "export declare function greet(name: string): string;\n");
    write(root, "types/index.d.ts", "export * from \"./a\";\n");

    let output = dtsb(root, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(root.join("dist/index.d.ts")).expect("bundle"),
        "export declare function greet(name: string): string;\n\nexport {}\n"
    );
}

#[test]
fn test_flags_select_entry_and_list_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "index.d.ts", "export declare const answer: 42;\n");

    let output = dtsb(
        root,
        &["--entry", "index.d.ts", "--out-dir", "out", "--new-line", "crlf", "--list-emitted-files"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(root.join("out/index.d.ts")).expect("bundle"),
        "export declare const answer: 42;\r\n\r\nexport {}\r\n"
    );
    let listing = stdout(&output);
    assert!(listing.starts_with("Emitted files:\n"));
    assert!(listing.contains("out/index.d.ts"));
}

#[test]
fn test_failed_bundle_falls_back_to_originals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "a.d.ts", "export declare const a: number;\n");
    write(root, "index.d.ts", "import * as ns from \"./a\";\nexport declare const x: typeof ns;\n");

    let output = dtsb(root, &["--entry", "index.d.ts", "--out-dir", "out"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Fallback to original declaration files"));
    assert!(root.join("out/a.d.ts").is_file());
    assert!(root.join("out/index.d.ts").is_file());
}

#[test]
fn test_failed_bundle_without_fallback_exits_with_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "a.d.ts", "export declare const a: number;\n");
    write(root, "index.d.ts", "import * as ns from \"./a\";\nexport declare const x: typeof ns;\n");

    let output = dtsb(root, &["--entry", "index.d.ts", "--out-dir", "out", "--no-fallback"]);
    assert!(!output.status.success());
    assert!(!root.join("out").exists());
}

#[test]
fn test_missing_entry_point_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dtsb(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no entry point given"));
}
