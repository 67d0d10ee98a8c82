//! Serializes the collected sections into the bundle text.

use dtsb_common::NewLineKind;
use indexmap::{IndexMap, IndexSet};

/// Everything that ends up in one bundle, in print order.
#[derive(Clone, Copy, Debug)]
pub struct Sections<'a> {
    /// Type references, lib references and import statements. Each group is
    /// followed by a blank line when not empty.
    pub import_groups: &'a [&'a IndexSet<String>],
    /// Declaration text to documentation comment.
    pub exports: &'a IndexMap<String, String>,
    /// Contents of the `declare global` block, when emitted.
    pub globals: Option<&'a IndexMap<String, String>>,
    pub augmentations: Option<&'a IndexSet<String>>,
}

pub fn print(sections: &Sections<'_>, new_line: NewLineKind) -> String {
    let mut writer = BundleWriter::new(new_line);

    for group in sections.import_groups {
        for line in group.iter() {
            writer.write_line(line);
        }
        if !group.is_empty() {
            writer.blank_line();
        }
    }

    for (declaration, comment) in sections.exports {
        if !comment.is_empty() {
            writer.write_line(comment);
        }
        writer.write_line(declaration);
        writer.blank_line();
    }

    if let Some(globals) = sections.globals
        && !globals.is_empty()
    {
        writer.write_line("declare global {");
        for (declaration, comment) in globals {
            if !comment.is_empty() {
                writer.write_line(comment);
            }
            writer.write_line(declaration);
        }
        writer.write_line("}");
        writer.blank_line();
    }

    if let Some(augmentations) = sections.augmentations {
        for augmentation in augmentations {
            writer.write_line(augmentation);
            writer.blank_line();
        }
    }

    writer.write_line("export {}");
    writer.finish()
}

// =============================================================================
// Writer
// =============================================================================

/// Appends lines and normalizes the line endings of copied source text.
struct BundleWriter {
    output: String,
    new_line: &'static str,
}

impl BundleWriter {
    fn new(new_line: NewLineKind) -> BundleWriter {
        BundleWriter {
            output: String::new(),
            new_line: new_line.as_str(),
        }
    }

    fn write(&mut self, text: &str) {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            self.output.push_str(line.strip_suffix('\r').unwrap_or(line));
            if lines.peek().is_some() {
                self.output.push_str(self.new_line);
            }
        }
    }

    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.output.push_str(self.new_line);
    }

    fn blank_line(&mut self) {
        self.output.push_str(self.new_line);
    }

    fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod tests;
