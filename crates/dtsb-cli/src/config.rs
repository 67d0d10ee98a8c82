use anyhow::{Context, Result, bail};
use dtsb_bundler::BundleOptions;
use dtsb_common::NewLineKind;
use dtsb_common::path_utils::{ensure_absolute, to_declaration_file_name};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::args::CliArgs;

/// Custom deserializer for boolean options that can also be strings.
/// Accepts `true`, `false`, `"true"`, `"false"` and the usual spellings.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// One entry point or a list of them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EntryPoints {
    One(String),
    Many(Vec<String>),
}

impl EntryPoints {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            EntryPoints::One(entry) => vec![entry.clone()],
            EntryPoints::Many(entries) => entries.clone(),
        }
    }
}

/// Contents of `dtsb.json`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub entry_point: Option<EntryPoints>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub fallback_on_error: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub globals: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub augmentations: Option<bool>,
    #[serde(default)]
    pub new_line: Option<NewLineKind>,
    #[serde(default)]
    pub lib: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_default_lib: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub list_emitted_files: Option<bool>,
}

/// Everything a run needs, with paths made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub root_dir: PathBuf,
    pub out_dir: PathBuf,
    pub entry_points: Vec<PathBuf>,
    pub fallback_on_error: bool,
    pub bundle: BundleOptions,
    pub lib_files: Vec<PathBuf>,
    pub no_default_lib: bool,
    pub list_emitted_files: bool,
}

pub fn parse_config(source: &str) -> Result<BundleConfig> {
    let config = serde_json::from_str(source).context("failed to parse dtsb.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<BundleConfig> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Merge the config file (paths relative to its directory) with the command
/// line (paths relative to `cwd`). Flags win over the file.
pub fn resolve_options(config: &BundleConfig, config_dir: &Path, args: &CliArgs, cwd: &Path) -> Result<ResolvedOptions> {
    let root_dir = match (&args.root_dir, &config.root_dir) {
        (Some(root), _) => ensure_absolute(root, cwd),
        (None, Some(root)) => ensure_absolute(Path::new(root), config_dir),
        (None, None) => ensure_absolute(config_dir, cwd),
    };
    let out_dir = match (&args.out_dir, &config.out_dir) {
        (Some(out), _) => ensure_absolute(out, cwd),
        (None, Some(out)) => ensure_absolute(Path::new(out), config_dir),
        (None, None) => root_dir.clone(),
    };

    let entries = if args.entry_points.is_empty() {
        config.entry_point.as_ref().map(EntryPoints::to_vec).unwrap_or_default()
    } else {
        args.entry_points.clone()
    };
    if entries.is_empty() {
        bail!("no entry point given; pass --entry or set entryPoint in dtsb.json");
    }
    let entry_points = entries
        .iter()
        .map(|entry| normalize_entry_point(entry, &root_dir))
        .collect();

    let mut lib_files: Vec<PathBuf> = config
        .lib
        .iter()
        .flatten()
        .map(|lib| ensure_absolute(Path::new(lib), config_dir))
        .collect();
    lib_files.extend(args.lib.iter().map(|lib| ensure_absolute(lib, cwd)));

    let new_line = args
        .new_line
        .map(NewLineKind::from)
        .or(config.new_line)
        .unwrap_or_default();

    Ok(ResolvedOptions {
        root_dir,
        out_dir,
        entry_points,
        fallback_on_error: !args.no_fallback && config.fallback_on_error.unwrap_or(true),
        bundle: BundleOptions {
            globals: !args.no_globals && config.globals.unwrap_or(true),
            augmentations: !args.no_augmentations && config.augmentations.unwrap_or(true),
            new_line,
        },
        lib_files,
        no_default_lib: args.no_default_lib || config.no_default_lib.unwrap_or(false),
        list_emitted_files: args.list_emitted_files || config.list_emitted_files.unwrap_or(false),
    })
}

/// `src/index.ts`, `src/index.js` and `src/index.d.ts` all name the
/// declaration file `<root>/src/index.d.ts`.
pub fn normalize_entry_point(entry: &str, root_dir: &Path) -> PathBuf {
    ensure_absolute(Path::new(&to_declaration_file_name(entry)), root_dir)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
