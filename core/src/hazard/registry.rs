//! Generic hazard bookkeeping

use super::{Hazard, HazardId};

/// Dense storage for one hazard kind.
///
/// Records keep insertion order. Ids are handed out monotonically and never
/// reused, so an id stays valid for the record's whole lifetime even as other
/// records are swept. Removal only happens in [`HazardRegistry::sweep`],
/// never while effects are being applied.
#[derive(Debug, Clone)]
pub struct HazardRegistry<T> {
    items: Vec<T>,
    next_id: HazardId,
}

impl<T> Default for HazardRegistry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Hazard> HazardRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with a fresh id and return the id.
    pub fn spawn(&mut self, make: impl FnOnce(HazardId) -> T) -> HazardId {
        let id = self.next_id;
        self.next_id += 1;
        let record = make(id);
        debug_assert_eq!(record.id(), id, "hazard built with a foreign id");
        self.items.push(record);
        id
    }

    /// Advance every record's lifetime.
    pub fn tick(&mut self, dt: f64) {
        for item in &mut self.items {
            item.advance(dt);
        }
    }

    /// Drop expired records. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_expired());
        before - self.items.len()
    }

    pub fn get(&self, id: HazardId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: HazardId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Record at a dense index. Indices are internal; out of range is a bug.
    pub fn at(&self, index: usize) -> Option<&T> {
        debug_assert!(index < self.items.len(), "hazard index {index} out of range");
        self.items.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        debug_assert!(index < self.items.len(), "hazard index {index} out of range");
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every record. Ids keep counting up.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
