//! Fingerprint-compressed open-addressing table.
//!
//! Slots store a 16-bit fingerprint instead of the key. A 64-bit key hash is
//! split into a home slot, `(hash >> 16) % capacity`, and a fingerprint, the
//! low 16 bits. Value `V::default()` marks a free slot.
//!
//! Two keys with the same home slot and fingerprint share one slot: a
//! fingerprint match does not prove the keys are equal. Use this table for
//! data that tolerates the occasional merged entry (occurrence counts), not
//! where the key must be recovered exactly.

use crate::error::IndexError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerprintSlot<V> {
    pub fingerprint: u16,
    pub value: V,
}

impl<V: Default + PartialEq> FingerprintSlot<V> {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.value == V::default()
    }
}

pub struct FingerprintTable<V> {
    slots: Box<[FingerprintSlot<V>]>,
}

#[inline]
pub fn split_hash(hash: u64, capacity: usize) -> (usize, u16) {
    (((hash >> 16) % capacity as u64) as usize, hash as u16)
}

impl<V: Copy + Default + PartialEq> FingerprintTable<V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "table capacity must be positive");
        Self { slots: vec![FingerprintSlot::default(); capacity].into_boxed_slice() }
    }

    fn probe(&self, hash: u64) -> Result<usize, IndexError> {
        let cap = self.slots.len();
        let (mut i, fingerprint) = split_hash(hash, cap);
        for _ in 0..cap {
            let slot = &self.slots[i];
            if slot.is_free() || slot.fingerprint == fingerprint {
                return Ok(i);
            }
            i += 1;
            if i == cap {
                i = 0;
            }
        }
        Err(IndexError::Overflow { capacity: cap })
    }

    /// Slot for `hash`: the one already holding its fingerprint, or a free
    /// slot stamped with it. The slot stays free until the caller stores a
    /// non-default value.
    pub fn insert(&mut self, hash: u64) -> Result<&mut FingerprintSlot<V>, IndexError> {
        let i = self.probe(hash)?;
        let slot = &mut self.slots[i];
        if slot.is_free() {
            slot.fingerprint = hash as u16;
        }
        Ok(slot)
    }

    pub fn get(&self, hash: u64) -> Option<&FingerprintSlot<V>> {
        let slot = &self.slots[self.probe(hash).ok()?];
        (!slot.is_free()).then_some(slot)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots, counted by scanning the table.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FingerprintSlot<V>> + '_ {
        self.slots.iter().filter(|s| !s.is_free())
    }
}
