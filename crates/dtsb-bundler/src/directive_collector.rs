//! Triple-slash directives carried over from the project files.

use dtsb_binder::Program;
use indexmap::IndexSet;

/// Directive lines, ready to print.
#[derive(Clone, Debug, Default)]
pub struct Directives {
    /// `/// <reference types="…" />`
    pub type_references: IndexSet<String>,
    /// `/// <reference lib="…" />`
    pub lib_references: IndexSet<String>,
}

/// Collect `types` and `lib` references from every project root file.
///
/// `path` references are dropped: the files they point to are part of the
/// bundle already.
pub fn collect_directives(program: &Program) -> Directives {
    let mut directives = Directives::default();
    for &file in program.root_files() {
        let unit = program.unit(file);
        if !unit.is_project_file() {
            continue;
        }
        for name in &unit.directives.types {
            directives
                .type_references
                .insert(format!("/// <reference types=\"{name}\" />"));
        }
        for name in &unit.directives.libs {
            directives
                .lib_references
                .insert(format!("/// <reference lib=\"{name}\" />"));
        }
    }
    directives
}

#[cfg(test)]
#[path = "tests/directive_collector_tests.rs"]
mod tests;
