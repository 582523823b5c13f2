//! Mapping between ROM addresses and assembly source lines.

use std::collections::HashMap;
use std::iter::FromIterator;

/// Mapping from ROM addresses into the lines of the assembly source that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMap {
    inner: HashMap<u16, usize>,
}

impl FromIterator<(u16, usize)> for SourceMap {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (u16, usize)>
    {
        SourceMap {
            inner: HashMap::from_iter(iter),
        }
    }
}

impl SourceMap {
    pub fn insert(&mut self, address: u16, line: usize) {
        self.inner.insert(address, line);
    }

    /// Returns the 1-based source line of the instruction stored at `address`.
    pub fn get_source_line(&self, address: u16) -> Option<usize> {
        self.inner.get(&address).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
