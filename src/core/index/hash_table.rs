//! Exact-key open-addressing table.
//!
//! Fixed capacity, linear probing from `hash(key) % capacity`, wrapping at the
//! end. A slot is free when its value is the empty value of `E`; keys are only
//! meaningful in occupied slots. The table never grows: size it up front (see
//! [`OpenAddressingTable::with_load_factor`]). One slot is always kept free, so
//! every probe stops at the key or at a free slot.

use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::marker::PhantomData;

use rustc_hash::FxHasher;

use crate::defaults::TABLE_LOAD_FACTOR;
use crate::error::IndexError;

/// Marks free slots by a reserved value.
pub trait EmptyValue<V> {
    fn empty() -> V;
    fn is_empty(value: &V) -> bool;
}

/// `V::default()` (zero for integers) marks a free slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroIsEmpty;

impl<V: Default + PartialEq> EmptyValue<V> for ZeroIsEmpty {
    #[inline]
    fn empty() -> V {
        V::default()
    }

    #[inline]
    fn is_empty(value: &V) -> bool {
        *value == V::default()
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot<K, V> {
    key: K,
    value: V,
}

pub struct OpenAddressingTable<K, V, E = ZeroIsEmpty, H = BuildHasherDefault<FxHasher>> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    hasher: H,
    _empty: PhantomData<E>,
}

impl<K, V, E> OpenAddressingTable<K, V, E>
where
    K: Hash + Eq + Copy + Default,
    V: Copy,
    E: EmptyValue<V>,
{
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, BuildHasherDefault::default())
    }

    /// Room for `expected` keys at load factor `load_factor` (default
    /// [`TABLE_LOAD_FACTOR`] when `None`).
    pub fn with_load_factor(expected: usize, load_factor: Option<f64>) -> Self {
        let load = load_factor.unwrap_or(TABLE_LOAD_FACTOR);
        assert!(load > 0.0 && load < 1.0, "load factor {load} outside (0, 1)");
        let capacity = ((expected as f64 / load).ceil() as usize).max(expected + 1);
        Self::new(capacity)
    }
}

impl<K, V, E, H> OpenAddressingTable<K, V, E, H>
where
    K: Hash + Eq + Copy + Default,
    V: Copy,
    E: EmptyValue<V>,
    H: BuildHasher,
{
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        assert!(capacity > 0, "table capacity must be positive");
        let slots = vec![Slot { key: K::default(), value: E::empty() }; capacity].into_boxed_slice();
        log::trace!("open-addressing table: {} slots", capacity);
        Self { slots, len: 0, hasher, _empty: PhantomData }
    }

    #[inline]
    fn home(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.slots.len() as u64) as usize
    }

    /// Slot holding `key`, or the free slot where it would go.
    fn probe(&self, key: &K) -> Result<usize, IndexError> {
        let cap = self.slots.len();
        let mut i = self.home(key);
        for _ in 0..cap {
            let slot = &self.slots[i];
            if E::is_empty(&slot.value) || slot.key == *key {
                return Ok(i);
            }
            i += 1;
            if i == cap {
                i = 0;
            }
        }
        Err(IndexError::Overflow { capacity: cap })
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), IndexError> {
        if E::is_empty(&value) {
            return Err(IndexError::EmptyValue);
        }
        let i = self.probe(&key)?;
        if E::is_empty(&self.slots[i].value) {
            if self.len + 1 >= self.slots.len() {
                return Err(IndexError::Overflow { capacity: self.slots.len() });
            }
            self.len += 1;
            self.slots[i].key = key;
        }
        self.slots[i].value = value;
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.probe(key).ok()?;
        let slot = &self.slots[i];
        (!E::is_empty(&slot.value)).then_some(&slot.value)
    }

    /// Apply `f` to the value of an existing key; returns whether the key
    /// was present. An update that would leave the empty value is refused
    /// with [`IndexError::EmptyValue`] and the slot keeps its old value.
    pub fn update<F: FnOnce(&mut V)>(&mut self, key: &K, f: F) -> Result<bool, IndexError> {
        let Ok(i) = self.probe(key) else { return Ok(false) };
        let slot = &mut self.slots[i];
        if E::is_empty(&slot.value) {
            return Ok(false);
        }
        let mut value = slot.value;
        f(&mut value);
        if E::is_empty(&value) {
            return Err(IndexError::EmptyValue);
        }
        slot.value = value;
        Ok(true)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Occupied slots, as tracked by inserts.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Occupied slots, counted by scanning the table.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| !E::is_empty(&s.value)).count()
    }

    /// Occupied `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.slots.iter().filter(|s| !E::is_empty(&s.value)).map(|s| (&s.key, &s.value))
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.value = E::empty();
        }
        self.len = 0;
    }
}
