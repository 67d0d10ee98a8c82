//! Bundling run over a directory of declaration files.

use anyhow::{Context, Result, anyhow};
use dtsb_binder::ProgramBuilder;
use dtsb_bundler::{Bundle, bundle_all};
use dtsb_common::path_utils::is_declaration_file;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};
use walkdir::WalkDir;

use crate::config::ResolvedOptions;
use crate::host::{DiskHost, path_key};

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in write order.
    pub emitted: Vec<PathBuf>,
    /// Set when bundling failed and the original files were used instead.
    pub fallback_error: Option<anyhow::Error>,
}

/// Every `*.d.ts` file under `root`, skipping `node_modules`, in lexical
/// path order.
pub fn find_declaration_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == "node_modules"));
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && is_declaration_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Bundle every entry point and write the results. Nothing is written until
/// all bundles are computed; on failure the original declaration files are
/// copied to the output directory when fallback is enabled.
pub fn run(options: &ResolvedOptions) -> Result<RunReport> {
    let _span = info_span!("run", root = %options.root_dir.display()).entered();
    let files = find_declaration_files(&options.root_dir)?;
    info!(files = files.len(), entries = options.entry_points.len(), "found declaration files");

    match bundle_entries(options, &files) {
        Ok(bundles) => {
            let mut report = RunReport::default();
            for bundle in bundles {
                let target = output_path(Path::new(&bundle.entry), options)?;
                write_file(&target, &bundle.text)?;
                info!(path = %target.display(), "emitted bundle");
                report.emitted.push(target);
            }
            Ok(report)
        }
        Err(err) if options.fallback_on_error => {
            warn!(error = %err, "bundling failed, falling back to the original declaration files");
            let emitted = copy_originals(options, &files)?;
            Ok(RunReport {
                emitted,
                fallback_error: Some(err),
            })
        }
        Err(err) => Err(err),
    }
}

fn bundle_entries(options: &ResolvedOptions, files: &[PathBuf]) -> Result<Vec<Bundle>> {
    let host = DiskHost;
    let roots: Vec<String> = files.iter().map(|file| path_key(file)).collect();
    let lib_files: Vec<String> = options.lib_files.iter().map(|file| path_key(file)).collect();

    let mut builder = ProgramBuilder::new(&host)
        .roots(&roots)
        .no_default_lib(options.no_default_lib);
    for lib in &lib_files {
        builder = builder.lib_file(lib);
    }
    let program = builder.build()?;

    let entries: Vec<String> = options.entry_points.iter().map(|entry| path_key(entry)).collect();
    Ok(bundle_all(&program, &entries, &options.bundle)?)
}

/// Where a file under the root directory lands in the output directory.
fn output_path(source: &Path, options: &ResolvedOptions) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(&options.root_dir)
        .map_err(|_| anyhow!("{} is outside of the root directory {}", source.display(), options.root_dir.display()))?;
    Ok(options.out_dir.join(relative))
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn copy_originals(options: &ResolvedOptions, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if options.out_dir == options.root_dir {
        return Ok(files.to_vec());
    }
    let mut emitted = Vec::with_capacity(files.len());
    for file in files {
        let target = output_path(file, options)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::copy(file, &target)
            .with_context(|| format!("failed to copy {} to {}", file.display(), target.display()))?;
        emitted.push(target);
    }
    Ok(emitted)
}

/// `Emitted files:` followed by one path per line.
pub fn emitted_files_listing(paths: &[PathBuf]) -> String {
    let mut listing = String::from("Emitted files:");
    for path in paths {
        listing.push('\n');
        listing.push_str(&path_key(path));
    }
    listing
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
