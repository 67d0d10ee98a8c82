//! Shared helpers for bundler integration tests.

#![allow(dead_code)]

use dtsb_binder::{MemoryHost, Program, ProgramBuilder};
use dtsb_bundler::{BundleError, BundleOptions};
use dtsb_common::NewLineKind;

/// Build a program whose roots are every `.d.ts` file outside `node_modules`.
pub fn program(files: &[(&str, &str)]) -> Program {
    let mut host = MemoryHost::new();
    for (path, text) in files {
        host.add_file(path, *text);
    }
    let roots: Vec<&str> = files
        .iter()
        .map(|(path, _)| *path)
        .filter(|path| path.ends_with(".d.ts") && !path.contains("node_modules"))
        .collect();
    ProgramBuilder::new(&host)
        .roots(roots)
        .build()
        .expect("program should build")
}

pub fn options() -> BundleOptions {
    BundleOptions {
        new_line: NewLineKind::LineFeed,
        ..BundleOptions::default()
    }
}

pub fn try_bundle(files: &[(&str, &str)], entry: &str, options: &BundleOptions) -> Result<String, BundleError> {
    dtsb_bundler::bundle(&program(files), entry, options)
}

/// Bundle `entry` with LF line endings and default options.
pub fn bundle(files: &[(&str, &str)], entry: &str) -> String {
    try_bundle(files, entry, &options()).expect("bundle should succeed")
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
