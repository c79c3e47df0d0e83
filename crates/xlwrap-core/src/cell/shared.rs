//! Workbook-wide shared string table

use std::collections::HashSet;
use std::sync::Arc;

use super::CellValue;

/// Strings referenced by index from cells, in the order the file lists them
///
/// Both the BIFF8 SST and `xl/sharedStrings.xml` are loaded into this table.
/// Entries with equal text share one allocation, and so do the cells built
/// from them.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    entries: Vec<Arc<str>>,
    distinct: HashSet<Arc<str>>,
}

impl SharedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next entry and return its index
    pub fn push(&mut self, text: &str) -> usize {
        let entry = match self.distinct.get(text) {
            Some(existing) => Arc::clone(existing),
            None => {
                let entry: Arc<str> = Arc::from(text);
                self.distinct.insert(Arc::clone(&entry));
                entry
            }
        };
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Text of entry `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| &**entry)
    }

    /// String cell for entry `index`, sharing the table's allocation
    pub fn cell_value(&self, index: usize) -> Option<CellValue> {
        self.entries
            .get(index)
            .map(|entry| CellValue::String(Arc::clone(entry)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
