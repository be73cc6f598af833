//! Packed score arithmetic and sequence encoding.

pub mod encoding;
pub mod score_vector;
pub mod simd_abstraction;
