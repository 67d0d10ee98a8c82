//! Verbatim `declare module "lib" { }` blocks of the project.

use dtsb_binder::Program;
use dtsb_common::path_utils::is_relative_specifier;
use indexmap::IndexSet;
use tracing::debug;

/// Collect every top-level ambient module declaration with a package name
/// from the project root files. Relative augmentations merge into files that
/// are bundled anyway and `declare global` is handled by the globals block.
pub fn collect_external_augmentations(program: &Program) -> IndexSet<String> {
    let mut augmentations = IndexSet::new();
    for &file in program.root_files() {
        let unit = program.unit(file);
        if !unit.is_project_file() {
            continue;
        }
        let arena = &unit.arena;
        let Some(statements) = arena.statements(unit.root) else {
            continue;
        };
        for &statement in &statements.nodes {
            if !arena.is_ambient_module(statement) || arena.is_global_augmentation(statement) {
                continue;
            }
            let Some(name) = arena.module_specifier_text(statement) else {
                continue;
            };
            if is_relative_specifier(name) {
                continue;
            }
            debug!(module = %name, file = %unit.path, "external augmentation");
            augmentations.insert(unit.node_text(statement).to_string());
        }
    }
    augmentations
}
