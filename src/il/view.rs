//! Symbol surface of the binary being analyzed

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named address in the binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Symbol name (raw, as it appears in the binary)
    pub name: String,
    /// Address the symbol resolves to
    pub address: u64,
}

impl Symbol {
    /// Create a symbol
    pub fn new(name: &str, address: u64) -> Self {
        Self {
            name: name.to_string(),
            address,
        }
    }
}

/// Symbol lookups against the binary owning the analyzed function
pub trait BinaryView {
    /// All symbols with exactly this name, in definition order
    fn symbols_by_name(&self, name: &str) -> Vec<Symbol>;
}

/// In-memory symbol table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: HashMap<String, Vec<u64>>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol (a name may resolve to several addresses)
    pub fn define(&mut self, name: &str, address: u64) {
        self.symbols
            .entry(name.to_string())
            .or_default()
            .push(address);
    }

    /// Builder-style [`SymbolTable::define`]
    pub fn with_symbol(mut self, name: &str, address: u64) -> Self {
        self.define(name, address);
        self
    }
}

impl BinaryView for SymbolTable {
    fn symbols_by_name(&self, name: &str) -> Vec<Symbol> {
        self.symbols
            .get(name)
            .map(|addresses| {
                addresses
                    .iter()
                    .map(|&address| Symbol::new(name, address))
                    .collect()
            })
            .unwrap_or_default()
    }
}
