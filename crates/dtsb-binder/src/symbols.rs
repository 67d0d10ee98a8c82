//! Symbols, symbol flags and symbol tables.

use crate::source::NodeRef;
use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const VARIABLE: u32 = 1 << 0;
    pub const PARAMETER: u32 = 1 << 1;
    pub const FUNCTION: u32 = 1 << 2;
    pub const CLASS: u32 = 1 << 3;
    pub const INTERFACE: u32 = 1 << 4;
    pub const ENUM: u32 = 1 << 5;
    pub const VALUE_MODULE: u32 = 1 << 6;
    pub const NAMESPACE_MODULE: u32 = 1 << 7;
    pub const TYPE_ALIAS: u32 = 1 << 8;
    pub const TYPE_PARAMETER: u32 = 1 << 9;
    pub const ALIAS: u32 = 1 << 10;

    pub const MODULE: u32 = VALUE_MODULE | NAMESPACE_MODULE;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// Where an alias symbol points before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasTarget {
    /// Named or default import, or `export { x } from "m"`.
    Import { specifier: String, import_name: String },
    /// `import * as ns`, `export * as ns from`, `import x = require()`.
    Namespace { specifier: String },
    /// Entity name in the declaring file: `export { a }`, `export default a`,
    /// `export = a`, `import x = A.B`.
    Entity { node: NodeRef },
    /// Target known at bind time (`export as namespace X`).
    Symbol(SymbolId),
}

/// Insertion-ordered name to symbol map.
pub type SymbolTable = IndexMap<String, SymbolId>;

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub escaped_name: String,
    pub flags: u32,
    pub declarations: SmallVec<[NodeRef; 1]>,
    pub exports: SymbolTable,
    /// `export * from "m"` declarations of a module symbol.
    pub star_exports: Vec<NodeRef>,
    pub alias: Option<AliasTarget>,
    /// Containing module or namespace symbol.
    pub parent: Option<SymbolId>,
}

impl Symbol {
    #[inline]
    pub fn has_any_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    #[inline]
    pub fn is_alias(&self) -> bool {
        self.has_any_flags(symbol_flags::ALIAS)
    }

    #[inline]
    pub fn first_declaration(&self) -> Option<NodeRef> {
        self.declarations.first().copied()
    }
}

/// Flat storage for every symbol of a program.
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: u32, escaped_name: impl Into<String>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            id,
            escaped_name: escaped_name.into(),
            flags,
            declarations: SmallVec::new(),
            exports: SymbolTable::default(),
            star_exports: Vec::new(),
            alias: None,
            parent: None,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
