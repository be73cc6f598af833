// src/defaults.rs

// Scoring Constants (BLOSUM62, gap open 11, extend 1)
pub const GAP_OPEN_PENALTY: i32 = 11;
pub const GAP_EXTEND_PENALTY: i32 = 1;
pub const FRAME_SHIFT_PENALTY: i32 = 15;

// Profile Constants
/// Queries shorter than this use the lazy residue profile in the full-matrix
/// kernel; longer ones build every letter up front.
pub const LAZY_PROFILE_MAX_QUERY_LEN: usize = 64;

// Index Constants
pub const TABLE_LOAD_FACTOR: f64 = 0.5;
/// 64 bits / 5 bits per letter
pub const MAX_KMER_LEN: usize = 12;

// Parallel Constants
pub const TARGETS_PER_TASK: usize = 256;
