//! Module specifier resolution against a `SourceHost`.
//!
//! Relative specifiers map onto declaration files next to the importing file
//! (`./x` → `./x.d.ts`, `./x/index.d.ts`, with `.js` style extensions
//! stripped). Bare specifiers walk up `node_modules` directories, honouring
//! `types`/`typings` in `package.json` and `@types` packages.

use crate::host::SourceHost;
use dtsb_common::path_utils::{is_relative_specifier, normalize_path};
use std::path::Path;
use tracing::trace;

/// Normalize separators and `.`/`..` components of a host path.
pub fn normalize(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    let normalized = normalize_path(Path::new(&slashed));
    let mut out = normalized.to_string_lossy().replace('\\', "/");
    if out.is_empty() && slashed.starts_with('/') {
        out.push('/');
    }
    out
}

/// Directory part of a normalized path.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

pub fn join(dir: &str, rel: &str) -> String {
    if dir.is_empty() {
        normalize(rel)
    } else if dir.ends_with('/') {
        normalize(&format!("{dir}{rel}"))
    } else {
        normalize(&format!("{dir}/{rel}"))
    }
}

/// Resolve an import or export specifier written in `containing_file`.
pub fn resolve_module_file(
    host: &dyn SourceHost,
    containing_file: &str,
    specifier: &str,
) -> Option<String> {
    let resolved = if is_relative_specifier(specifier) {
        let base = if specifier.starts_with('/') {
            normalize(specifier)
        } else {
            join(dirname(containing_file), specifier)
        };
        try_file_candidates(host, &base)
    } else {
        resolve_node_module(host, dirname(containing_file), specifier, false)
    };
    trace!(specifier, from = containing_file, resolved = ?resolved, "resolve module");
    resolved
}

/// Resolve `/// <reference types="name" />`; `@types` packages win.
pub fn resolve_type_reference(host: &dyn SourceHost, containing_file: &str, name: &str) -> Option<String> {
    if is_relative_specifier(name) {
        return resolve_module_file(host, containing_file, name);
    }
    resolve_node_module(host, dirname(containing_file), name, true)
}

/// Resolve `/// <reference path="file" />`.
pub fn resolve_reference_path(host: &dyn SourceHost, containing_file: &str, path: &str) -> Option<String> {
    let target = join(dirname(containing_file), path);
    if host.file_exists(&target) {
        return Some(target);
    }
    try_file_candidates(host, &target)
}

fn try_file_candidates(host: &dyn SourceHost, base: &str) -> Option<String> {
    if base.ends_with(".json") || base.ends_with(".d.ts") {
        return host.file_exists(base).then(|| base.to_string());
    }
    let stem = [".js", ".mjs", ".cjs", ".ts", ".mts", ".cts"]
        .iter()
        .find_map(|ext| base.strip_suffix(ext))
        .unwrap_or(base);
    let candidates = [format!("{stem}.d.ts"), format!("{stem}/index.d.ts")];
    if let Some(found) = candidates.into_iter().find(|c| host.file_exists(c)) {
        return Some(found);
    }
    if stem == base && host.file_exists(&join(stem, "package.json")) {
        return load_package(host, stem, None);
    }
    None
}

/// Split `@scope/pkg/sub/path` into the package name and subpath.
fn split_package(specifier: &str) -> (&str, Option<&str>) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut split_at = None;
    let mut seen = 0;
    for (i, ch) in specifier.char_indices() {
        if ch == '/' {
            seen += 1;
            if seen == segments {
                split_at = Some(i);
                break;
            }
        }
    }
    match split_at {
        Some(i) => (&specifier[..i], Some(&specifier[i + 1..])),
        None => (specifier, None),
    }
}

/// `@scope/pkg` is published as `@types/scope__pkg`.
fn types_package_name(package: &str) -> String {
    match package.strip_prefix('@') {
        Some(scoped) => format!("@types/{}", scoped.replacen('/', "__", 1)),
        None => format!("@types/{package}"),
    }
}

fn resolve_node_module(
    host: &dyn SourceHost,
    start_dir: &str,
    specifier: &str,
    types_first: bool,
) -> Option<String> {
    let (package, subpath) = split_package(specifier);
    let types_package = types_package_name(package);
    let order = if types_first {
        [types_package.as_str(), package]
    } else {
        [package, types_package.as_str()]
    };

    let mut dir = start_dir.to_string();
    loop {
        let node_modules = join(&dir, "node_modules");
        for name in order {
            let package_dir = join(&node_modules, name);
            if let Some(found) = load_package(host, &package_dir, subpath) {
                return Some(found);
            }
        }
        if dir.is_empty() || dir == "/" {
            return None;
        }
        dir = dirname(&dir).to_string();
    }
}

fn load_package(host: &dyn SourceHost, package_dir: &str, subpath: Option<&str>) -> Option<String> {
    if let Some(subpath) = subpath {
        return try_file_candidates(host, &join(package_dir, subpath));
    }
    if let Some(manifest) = host.read_file(&join(package_dir, "package.json"))
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&manifest)
    {
        for key in ["types", "typings", "main"] {
            if let Some(entry) = value.get(key).and_then(serde_json::Value::as_str) {
                let base = join(package_dir, entry);
                if host.file_exists(&base) && base.ends_with(".d.ts") {
                    return Some(base);
                }
                if let Some(found) = try_file_candidates(host, &base) {
                    return Some(found);
                }
            }
        }
    }
    let index = join(package_dir, "index.d.ts");
    host.file_exists(&index).then_some(index)
}

#[cfg(test)]
#[path = "tests/module_resolution.rs"]
mod tests;
