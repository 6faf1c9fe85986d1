//! The ten-slot item bench.

use super::INVENTORY_SIZE;

/// Snapshot of the item bench. Slot indices match the on-screen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    slots: [Option<String>; INVENTORY_SIZE],
}

impl Inventory {
    /// Builds an inventory from an observed slot list. Extra entries are
    /// ignored and missing ones are empty. Blank names count as empty.
    pub fn from_observed(observed: Vec<Option<String>>) -> Self {
        let mut inv = Inventory::default();
        for (slot, item) in inv.slots.iter_mut().zip(observed) {
            *slot = item.filter(|s| !s.trim().is_empty());
        }
        inv
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.as_deref())
    }

    /// Clears a slot, returning its item.
    pub fn take(&mut self, index: usize) -> Option<String> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn set(&mut self, index: usize, item: impl Into<String>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(item.into());
        }
    }

    /// First slot holding `item`.
    pub fn find(&self, item: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.as_deref() == Some(item))
    }

    /// First slot holding `item` other than `except`.
    pub fn find_other(&self, item: &str, except: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .position(|(i, s)| i != except && s.as_deref() == Some(item))
    }

    pub fn contains(&self, item: &str) -> bool {
        self.find(item).is_some()
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_deref().map(|s| (i, s)))
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_snapshot_is_normalized() {
        let inv = Inventory::from_observed(vec![
            Some("BFSword".into()),
            Some("  ".into()),
            None,
            Some("BFSword".into()),
        ]);
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.get(1), None);
        assert_eq!(inv.find("BFSword"), Some(0));
        assert_eq!(inv.find_other("BFSword", 0), Some(3));
        assert_eq!(inv.find_other("BFSword", 3), Some(0));
    }

    #[test]
    fn take_clears_slot() {
        let mut inv = Inventory::default();
        inv.set(4, "Spatula");
        assert_eq!(inv.take(4).as_deref(), Some("Spatula"));
        assert!(inv.is_empty());
        assert_eq!(inv.take(4), None);
        assert_eq!(inv.take(99), None);
    }
}
