//! Seed occurrence counting over protein k-mers.
//!
//! A k-mer of alphabet letters packs into a `u64` at 5 bits per letter; the
//! packed key goes through a 64-bit finalizer so that the home slot and the
//! fingerprint of [`FingerprintTable`] see well-mixed bits.

use super::fingerprint::FingerprintTable;
use super::hash_table::OpenAddressingTable;
use crate::core::compute::encoding::UNKNOWN_RESIDUE;
use crate::defaults::{MAX_KMER_LEN, TABLE_LOAD_FACTOR};
use crate::error::IndexError;

const BITS_PER_LETTER: u32 = 5;

/// Packed key of `letters`, or `None` if it holds a masked letter (`X`,
/// stop or anything outside the alphabet).
#[inline]
pub fn pack_kmer(letters: &[u8]) -> Option<u64> {
    debug_assert!(letters.len() <= MAX_KMER_LEN);
    letters.iter().try_fold(0u64, |key, &c| (c < UNKNOWN_RESIDUE).then_some(key << BITS_PER_LETTER | c as u64))
}

/// MurmurHash3 64-bit finalizer.
#[inline]
pub fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Approximate k-mer occurrence counts.
///
/// Counts of k-mers that alias in the fingerprint table are merged, so a
/// count is an upper bound on the true one.
pub struct KmerCounter {
    k: usize,
    table: FingerprintTable<u32>,
    total: u64,
}

impl KmerCounter {
    pub fn new(k: usize, capacity: usize) -> Self {
        assert!((1..=MAX_KMER_LEN).contains(&k), "k = {k} outside 1..={MAX_KMER_LEN}");
        Self { k, table: FingerprintTable::new(capacity), total: 0 }
    }

    /// Sized for `expected` distinct k-mers at the default load factor.
    pub fn with_expected(k: usize, expected: usize) -> Self {
        let capacity = ((expected as f64 / TABLE_LOAD_FACTOR).ceil() as usize).max(expected + 1);
        Self::new(k, capacity)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Count every unmasked k-mer of `seq`; returns how many were counted.
    pub fn add_sequence(&mut self, seq: &[u8]) -> Result<usize, IndexError> {
        if seq.len() < self.k {
            return Ok(0);
        }
        let mut added = 0;
        for window in seq.windows(self.k) {
            let Some(key) = pack_kmer(window) else { continue };
            let slot = self.table.insert(fmix64(key))?;
            slot.value = slot.value.saturating_add(1);
            added += 1;
        }
        self.total += added as u64;
        Ok(added)
    }

    pub fn count(&self, kmer: &[u8]) -> u32 {
        assert_eq!(kmer.len(), self.k);
        pack_kmer(kmer).and_then(|key| self.table.get(fmix64(key))).map_or(0, |slot| slot.value)
    }

    /// Occupied table slots (distinct k-mers, less any that aliased).
    pub fn distinct(&self) -> usize {
        self.table.count()
    }

    /// Total k-mers counted.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// First position of every unmasked k-mer in `seq`, keyed exactly.
///
/// Values are `position + 1`, keeping 0 free as the empty marker.
pub fn first_positions(seq: &[u8], k: usize) -> Result<OpenAddressingTable<u64, u32>, IndexError> {
    assert!((1..=MAX_KMER_LEN).contains(&k), "k = {k} outside 1..={MAX_KMER_LEN}");
    let windows = seq.len().saturating_sub(k - 1);
    let mut table = OpenAddressingTable::with_load_factor(windows, None);
    for (pos, window) in seq.windows(k).enumerate() {
        let Some(key) = pack_kmer(window) else { continue };
        if !table.contains_key(&key) {
            table.insert(key, pos as u32 + 1)?;
        }
    }
    log::debug!("indexed {} distinct {}-mers of {} windows", table.len(), k, windows);
    Ok(table)
}
