//! Symbol table for linked programs.
//!
//! One table serves every control section of a loaded program: section names
//! and exported symbols share a single namespace. Insertion order is kept so
//! listings match the order of the object file.

use std::collections::HashMap;

use crate::common::{Result, SimError};

/// A named absolute address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name, without padding.
    pub name: String,
    /// Absolute address.
    pub address: u32,
}

/// Ordered name-to-address map with unique names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DuplicateSymbol`] if `name` is already defined;
    /// the existing address is left unchanged.
    pub fn define(&mut self, name: &str, address: u32) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(SimError::DuplicateSymbol(name.to_owned()));
        }
        let _ = self.index.insert(name.to_owned(), self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_owned(),
            address,
        });
        Ok(())
    }

    /// Moves an existing symbol to a new address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownSymbol`] if `name` was never defined.
    pub fn redefine(&mut self, name: &str, address: u32) -> Result<()> {
        let slot = *self
            .index
            .get(name)
            .ok_or_else(|| SimError::UnknownSymbol(name.to_owned()))?;
        self.symbols[slot].address = address;
        Ok(())
    }

    /// Looks up the address of a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnresolvedSymbol`] if `name` is not defined.
    pub fn resolve(&self, name: &str) -> Result<u32> {
        self.get(name)
            .ok_or_else(|| SimError::UnresolvedSymbol(name.to_owned()))
    }

    /// Looks up a symbol without treating absence as an error.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&slot| self.symbols[slot].address)
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over symbols in definition order.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbol is defined.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Removes every symbol.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.index.clear();
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
