use clap::{Parser, ValueEnum};
use dtsb_common::NewLineKind;
use std::path::PathBuf;

/// CLI arguments for the dtsb binary.
#[derive(Parser, Debug)]
#[command(
    name = "dtsb",
    version,
    about = "Bundle TypeScript declaration files into one file per entry point"
)]
pub struct CliArgs {
    /// Path to a dtsb.json configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Directory holding the declaration files to bundle.
    #[arg(long = "root", alias = "rootDir")]
    pub root_dir: Option<PathBuf>,

    /// Directory the bundles are written to. Defaults to the root directory.
    #[arg(short = 'o', long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Entry point, relative to the root directory. Repeatable.
    #[arg(short = 'e', long = "entry", alias = "entryPoint")]
    pub entry_points: Vec<String>,

    /// Do not emit the `declare global { }` block.
    #[arg(long = "no-globals")]
    pub no_globals: bool,

    /// Do not copy `declare module "lib" { }` blocks into the bundles.
    #[arg(long = "no-augmentations")]
    pub no_augmentations: bool,

    /// Line ending of the bundles.
    #[arg(long = "new-line", alias = "newLine", value_enum, ignore_case = true)]
    pub new_line: Option<NewLine>,

    /// Fail instead of copying the original declaration files on error.
    #[arg(long = "no-fallback")]
    pub no_fallback: bool,

    /// Extra default-library declaration file. Repeatable.
    #[arg(long)]
    pub lib: Vec<PathBuf>,

    /// Do not load the embedded default library.
    #[arg(long = "no-default-lib", alias = "noDefaultLib")]
    pub no_default_lib: bool,

    /// Print the paths of the written files.
    #[arg(long = "list-emitted-files", alias = "listEmittedFiles")]
    pub list_emitted_files: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NewLine {
    Lf,
    Crlf,
}

impl From<NewLine> for NewLineKind {
    fn from(value: NewLine) -> Self {
        match value {
            NewLine::Lf => NewLineKind::LineFeed,
            NewLine::Crlf => NewLineKind::CarriageReturnLineFeed,
        }
    }
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod tests;
