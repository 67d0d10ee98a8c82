//! Declaration bundling for dtsb.
//!
//! This crate provides:
//! - `SymbolCollector` - walks the exports of an entry point and the
//!   references of every exported declaration
//! - `DeclarationCollector` - decides how each symbol appears in the bundle
//!   (import, declaration, alias line, or ambient global)
//! - `DeclarationRegistrar` - rewrites declaration text and stores the
//!   import, export and global collections
//! - `print` - serializes the collections in a fixed section order
//! - `bundle` / `bundle_all` - the entry operations

pub mod augmentation_collector;
pub mod declaration_collector;
pub mod declaration_registrar;
pub mod directive_collector;
pub mod error;
pub mod printer;
pub mod symbol_collector;

pub use augmentation_collector::collect_external_augmentations;
pub use declaration_collector::DeclarationCollector;
pub use declaration_registrar::DeclarationRegistrar;
pub use directive_collector::{Directives, collect_directives};
pub use error::BundleError;
pub use printer::{Sections, print};
pub use symbol_collector::SymbolCollector;

use dtsb_binder::Program;
use dtsb_common::NewLineKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Options of one bundling run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleOptions {
    /// Emit project globals in a `declare global { }` block.
    pub globals: bool,
    /// Copy `declare module "lib" { }` blocks of the project into the bundle.
    pub augmentations: bool,
    pub new_line: NewLineKind,
}

impl Default for BundleOptions {
    fn default() -> Self {
        BundleOptions {
            globals: true,
            augmentations: true,
            new_line: NewLineKind::Platform,
        }
    }
}

/// A bundled entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bundle {
    pub entry: String,
    pub text: String,
}

/// Bundle the declarations reachable from `entry_path` into one text.
pub fn bundle(program: &Program, entry_path: &str, options: &BundleOptions) -> Result<String, BundleError> {
    let _span = info_span!("bundle", entry = %entry_path).entered();

    let entry = program
        .file_id(entry_path)
        .ok_or_else(|| BundleError::EntryNotFound {
            path: entry_path.to_string(),
        })?;

    let directives = collect_directives(program);
    let augmentations = options
        .augmentations
        .then(|| collect_external_augmentations(program));
    let symbols = SymbolCollector::collect(program, entry)?;
    debug!(
        exports = symbols.exports.len(),
        globals = symbols.internal_global_symbols.len(),
        "collected symbols"
    );
    let declarations = DeclarationCollector::new(program, &symbols, options).collect()?;

    let import_groups = [
        &directives.type_references,
        &directives.lib_references,
        &declarations.imports,
    ];
    Ok(print(
        &Sections {
            import_groups: &import_groups,
            exports: &declarations.exports,
            globals: options.globals.then_some(&declarations.globals),
            augmentations: augmentations.as_ref(),
        },
        options.new_line,
    ))
}

/// Bundle every entry point, failing before returning anything if one of
/// them fails.
pub fn bundle_all<S: AsRef<str>>(
    program: &Program,
    entries: &[S],
    options: &BundleOptions,
) -> Result<Vec<Bundle>, BundleError> {
    entries
        .iter()
        .map(|entry| {
            let entry = entry.as_ref();
            bundle(program, entry, options).map(|text| Bundle {
                entry: entry.to_string(),
                text,
            })
        })
        .collect()
}
