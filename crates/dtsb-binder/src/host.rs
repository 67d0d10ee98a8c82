//! File access used while loading a program.

use crate::module_resolution::normalize;
use indexmap::IndexMap;

/// Read-only view of the files a program can load.
///
/// Paths are normalized, forward-slash separated strings.
pub trait SourceHost {
    fn read_file(&self, path: &str) -> Option<String>;

    fn file_exists(&self, path: &str) -> bool {
        self.read_file(path).is_some()
    }
}

/// In-memory host, mostly for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    files: IndexMap<String, String>,
}

impl MemoryHost {
    pub fn new() -> MemoryHost {
        MemoryHost::default()
    }

    pub fn add_file(&mut self, path: &str, text: impl Into<String>) {
        self.files.insert(normalize(path), text.into());
    }

    pub fn with_file(mut self, path: &str, text: impl Into<String>) -> MemoryHost {
        self.add_file(path, text);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl SourceHost for MemoryHost {
    fn read_file(&self, path: &str) -> Option<String> {
        self.files.get(&normalize(path)).cloned()
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }
}
