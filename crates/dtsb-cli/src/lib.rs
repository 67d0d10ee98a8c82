//! Command-line driver for dtsb.
//!
//! This crate provides:
//! - `args::CliArgs` - command-line flags
//! - `config` - `dtsb.json` loading and option resolution
//! - `host::DiskHost` - file system access for program loading
//! - `driver::run` - bundles every entry point, falling back to the original
//!   declaration files on failure
//! - `tracing_config` - opt-in log output

pub mod args;
pub mod config;
pub mod driver;
pub mod host;
pub mod tracing_config;
