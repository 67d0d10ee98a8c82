//! Triple-slash reference directives (`/// <reference ... />`).
//!
//! Directives are only honoured in the comment block at the head of a file,
//! before the first statement.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^///\s*<reference\s+(types|lib|path|no-default-lib)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid regex")
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceDirectives {
    /// `/// <reference types="..." />`
    pub types: Vec<String>,
    /// `/// <reference lib="..." />`
    pub libs: Vec<String>,
    /// `/// <reference path="..." />`
    pub paths: Vec<String>,
    /// `/// <reference no-default-lib="true" />`
    pub no_default_lib: bool,
}

impl ReferenceDirectives {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.libs.is_empty() && self.paths.is_empty() && !self.no_default_lib
    }
}

/// Collect the reference directives from the leading comments of `text`.
pub fn collect_reference_directives(text: &str) -> ReferenceDirectives {
    let mut directives = ReferenceDirectives::default();
    let mut in_block_comment = false;
    for line in text.lines() {
        let line = line.trim();
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        if line.starts_with("/*") {
            in_block_comment = !line.contains("*/");
            continue;
        }
        if !line.starts_with("//") {
            break;
        }
        let Some(captures) = REFERENCE_RE.captures(line) else {
            continue;
        };
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        match &captures[1] {
            "types" => directives.types.push(value),
            "lib" => directives.libs.push(value),
            "path" => directives.paths.push(value),
            _ => directives.no_default_lib |= value == "true",
        }
    }
    directives
}
