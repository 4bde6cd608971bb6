//! Base item storage.
//!
//! Counts of craft items held by one base, keyed by catalog index. Slots
//! draw from and return to storage as items are installed and removed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemIndex;

/// Per-base inventory of craft items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Storage {
    counts: BTreeMap<ItemIndex, u32>,
}

impl Storage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style stock setter.
    #[must_use]
    pub fn with_count(mut self, index: ItemIndex, count: u32) -> Self {
        self.set_count(index, count);
        self
    }

    /// Number of items held.
    #[must_use]
    pub fn count(&self, index: ItemIndex) -> u32 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Check if at least one item is held.
    #[must_use]
    pub fn has(&self, index: ItemIndex) -> bool {
        self.count(index) > 0
    }

    /// Overwrite the count of one item.
    pub fn set_count(&mut self, index: ItemIndex, count: u32) {
        if count == 0 {
            self.counts.remove(&index);
        } else {
            self.counts.insert(index, count);
        }
    }

    /// Change the count of one item by `delta`.
    ///
    /// Returns `false` and leaves storage untouched when the count would
    /// drop below zero.
    pub fn adjust(&mut self, index: ItemIndex, delta: i32) -> bool {
        let current = i64::from(self.count(index));
        let updated = current + i64::from(delta);
        let Ok(updated) = u32::try_from(updated) else {
            return false;
        };
        self.set_count(index, updated);
        true
    }

    /// Iterate over held items in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemIndex, u32)> + '_ {
        self.counts.iter().map(|(index, count)| (*index, *count))
    }

    /// Total number of items held.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().map(|count| u64::from(*count)).sum()
    }
}

/// Debit one item from optional storage. `None` means unlimited stock.
pub(crate) fn take_one(storage: Option<&mut Storage>, index: ItemIndex) -> bool {
    storage.map_or(true, |storage| storage.adjust(index, -1))
}

/// Credit one item to optional storage.
pub(crate) fn return_one(storage: Option<&mut Storage>, index: ItemIndex) {
    if let Some(storage) = storage {
        storage.adjust(index, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_debit_and_credit() {
        let index = ItemIndex::new(3);
        let mut storage = Storage::new().with_count(index, 1);

        assert!(storage.adjust(index, -1));
        assert_eq!(storage.count(index), 0);
        assert!(!storage.has(index));

        assert!(storage.adjust(index, 2));
        assert_eq!(storage.count(index), 2);
    }

    #[test]
    fn test_adjust_refuses_negative() {
        let index = ItemIndex::new(0);
        let mut storage = Storage::new();
        assert!(!storage.adjust(index, -1));
        assert_eq!(storage.count(index), 0);
        assert_eq!(storage, Storage::new());
    }

    #[test]
    fn test_optional_storage_helpers() {
        let index = ItemIndex::new(1);
        assert!(take_one(None, index));

        let mut storage = Storage::new();
        assert!(!take_one(Some(&mut storage), index));
        return_one(Some(&mut storage), index);
        assert!(take_one(Some(&mut storage), index));
        assert_eq!(storage.total(), 0);
    }
}
