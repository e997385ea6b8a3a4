//! Bounded memo table for nearest-color lookups.

use std::collections::{HashMap, VecDeque};

use crate::palette::Rgb;

/// Default number of entries kept before eviction starts.
pub const DEFAULT_CAPACITY: usize = 8192;

/// A bounded mapping from packed 24-bit RGB keys to palette colors.
///
/// Eviction is by insertion order: once the cache holds `capacity` entries,
/// inserting a new key drops the oldest one. Lookups do not refresh an
/// entry's age.
///
/// The cache has no notion of which palette produced its values. It must be
/// [`clear`](Self::clear)ed whenever the palette it serves changes.
#[derive(Debug, Clone)]
pub struct QuantizeCache {
    entries: HashMap<u32, Rgb>,
    /// Keys in insertion order, oldest at the front
    order: VecDeque<u32>,
    capacity: usize,
}

impl QuantizeCache {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up a previously stored result.
    #[inline]
    pub fn get(&self, key: u32) -> Option<Rgb> {
        self.entries.get(&key).copied()
    }

    /// Store a result, evicting the oldest entry if the cache is full.
    ///
    /// Re-inserting an existing key overwrites its value without changing
    /// its position in the eviction order.
    pub fn insert(&mut self, key: u32, value: Rgb) {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        self.entries.insert(key, value);
        self.order.push_back(key);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QuantizeCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
