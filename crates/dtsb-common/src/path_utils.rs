//! Path helpers for module specifiers and declaration files.

use std::path::{Component, Path, PathBuf};

/// Whether a module specifier is relative (`./x`, `../x`) or rooted (`/x`).
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier.starts_with(".\\")
        || specifier.starts_with("..\\")
}

/// Lexically resolve `.` and `..` components without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against `base` when it is relative.
pub fn ensure_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Map a source or script entry name to its declaration file name.
///
/// `index.ts`, `index.js` and `index.d.ts` all become `index.d.ts`.
pub fn to_declaration_file_name(name: &str) -> String {
    let stem = name
        .strip_suffix(".d.ts")
        .or_else(|| name.strip_suffix(".ts"))
        .or_else(|| name.strip_suffix(".js"))
        .unwrap_or(name);
    if stem.len() == name.len() {
        return name.to_string();
    }
    format!("{stem}.d.ts")
}

/// Whether a file name is a declaration file.
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".d.ts"))
}

/// Module specifier that reaches `to_file` from the directory of `from_file`.
///
/// Always starts with `./` or `../` and uses forward slashes.
pub fn relative_module_specifier(from_file: &Path, to_file: &Path) -> String {
    let from_dir = from_file.parent().unwrap_or(Path::new(""));
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to: Vec<Component<'_>> = to_file.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Whether the path goes through a `node_modules` directory.
pub fn is_in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}

#[cfg(test)]
#[path = "tests/path_utils.rs"]
mod tests;
