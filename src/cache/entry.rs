//! Cache Entry Module
//!
//! Defines the arena record that makes up the recency list.

/// Link value used by slots that are not part of the list.
pub const NIL: usize = usize::MAX;

// == Cache Entry ==
/// A single slot in the recency list arena.
///
/// Links are arena indices rather than pointers, so a slot can be detached,
/// recycled and relinked without any dangling references.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The key held by this slot (empty for sentinels and free slots)
    pub key: String,
    /// The stored value
    pub value: String,
    /// Index of the neighbour closer to the most recently used end
    pub prev: usize,
    /// Index of the neighbour closer to the least recently used end
    pub next: usize,
    /// Identity of the insertion currently occupying this slot
    pub stamp: u64,
}

impl Entry {
    // == Constructor ==
    /// Creates a detached entry.
    pub fn new(key: String, value: String, stamp: u64) -> Self {
        Self {
            key,
            value,
            prev: NIL,
            next: NIL,
            stamp,
        }
    }

    // == Sentinel ==
    /// Creates a boundary entry. Sentinels never carry data and are never
    /// counted toward capacity.
    pub fn sentinel() -> Self {
        Self::new(String::new(), String::new(), 0)
    }

    // == Is Linked ==
    /// Returns true while the entry sits between the two sentinels.
    pub fn is_linked(&self) -> bool {
        self.prev != NIL && self.next != NIL
    }
}
