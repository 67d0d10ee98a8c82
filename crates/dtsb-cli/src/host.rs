//! Disk-backed source host.

use dtsb_binder::SourceHost;
use std::path::Path;
use tracing::trace;

/// Reads program files straight from the file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskHost;

impl SourceHost for DiskHost {
    fn read_file(&self, path: &str) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(err) => {
                trace!(path, error = %err, "cannot read file");
                None
            }
        }
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }
}

/// Program key of a path: forward slashes, lossily decoded.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
