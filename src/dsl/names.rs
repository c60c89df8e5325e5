//! Symbol table mapping name strings to stable integer ids.

use std::collections::HashMap;
use std::fmt;

use crate::error::{LogsimError, Result};

/// A unique identifier for an interned name.
///
/// Ids are handed out in creation order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interns names for the lexer, the parser and the circuit builder.
///
/// One table is shared by everything that takes part in compiling a single
/// circuit definition. Entries are never removed.
#[derive(Debug, Default)]
pub struct SymbolTable {
    ids: HashMap<String, SymbolId>,
    names: Vec<String>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `name`, assigning the next one if it is new.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = SymbolId(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Intern every name in order.
    pub fn lookup_many<I, S>(&mut self, names: I) -> Vec<SymbolId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.intern(name.as_ref()))
            .collect()
    }

    /// Look up `name` without adding it.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Get the string behind an id.
    pub fn name_of(&self, id: SymbolId) -> Result<&str> {
        self.names
            .get(id.0)
            .map(String::as_str)
            .ok_or_else(|| LogsimError::invalid_symbol(id.0))
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
