//! Open-addressing tables for seed keys and k-mer counts.

pub mod fingerprint;
pub mod hash_table;
pub mod kmer_counts;

pub use fingerprint::{FingerprintSlot, FingerprintTable};
pub use hash_table::{EmptyValue, OpenAddressingTable, ZeroIsEmpty};
pub use kmer_counts::KmerCounter;
