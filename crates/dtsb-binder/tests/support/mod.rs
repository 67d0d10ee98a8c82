//! Shared helpers for binder integration tests.

#![allow(dead_code)]

use dtsb_binder::{FileId, MemoryHost, Program, ProgramBuilder, SymbolId};
use dtsb_parser::NodeIndex;
use dtsb_scanner::SyntaxKind;

pub fn host(files: &[(&str, &str)]) -> MemoryHost {
    let mut host = MemoryHost::new();
    for (path, text) in files {
        host.add_file(path, *text);
    }
    host
}

/// Build a program whose roots are every `.d.ts` file outside `node_modules`.
pub fn build(files: &[(&str, &str)]) -> Program {
    let host = host(files);
    let roots: Vec<&str> = files
        .iter()
        .map(|(path, _)| *path)
        .filter(|path| path.ends_with(".d.ts") && !path.contains("node_modules"))
        .collect();
    ProgramBuilder::new(&host)
        .roots(roots)
        .build()
        .expect("program should build")
}

pub fn file(program: &Program, path: &str) -> FileId {
    program.file_id(path).expect("file should be loaded")
}

/// The `nth` identifier spelled `text` in the file, in source order.
pub fn identifier(program: &Program, path: &str, text: &str, nth: usize) -> NodeIndex {
    let unit = program.unit(file(program, path));
    let mut matches: Vec<(u32, NodeIndex)> = unit
        .arena
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind == SyntaxKind::Identifier as u16)
        .filter(|(i, _)| unit.arena.identifier_text(NodeIndex(*i as u32)) == Some(text))
        .map(|(i, node)| (node.start, NodeIndex(i as u32)))
        .collect();
    matches.sort();
    matches.get(nth).map(|(_, idx)| *idx).expect("identifier should exist")
}

pub fn symbol_at(program: &Program, path: &str, text: &str, nth: usize) -> Option<SymbolId> {
    let node = identifier(program, path, text, nth);
    program.symbol_at_node(file(program, path), node)
}

pub fn module_of(program: &Program, path: &str) -> SymbolId {
    program
        .module_symbol_of_file(file(program, path))
        .expect("file should be a module")
}

pub fn export_of(program: &Program, path: &str, name: &str) -> SymbolId {
    program
        .export_of_module(module_of(program, path), name)
        .expect("export should exist")
}

pub fn export_names(program: &Program, path: &str) -> Vec<String> {
    program
        .exports_of_module(module_of(program, path))
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}
