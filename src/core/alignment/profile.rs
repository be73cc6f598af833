//! Residue profiles.
//!
//! A profile holds, for one DP column, the substitution-score vector of every
//! query letter against the letters the lanes are currently on. The inner loop
//! then does one fetch per cell instead of `LANES` matrix lookups.
//!
//! - [`SwipeProfile`] builds all letters up front; best when the query uses
//!   most of the alphabet.
//! - [`LazySwipeProfile`] builds a letter on first request and caches it;
//!   best for short queries that touch a handful of letters per column.

use crate::core::alignment::scoring::ScoreMatrix;
use crate::core::compute::encoding::PROFILE_LETTERS;
use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::{ScoreLane, MAX_LANES};

/// Per-column source of substitution vectors.
pub trait ScoreProfile<S: ScoreLane> {
    fn scores(&mut self, letter: u8) -> ScoreVector<S>;
}

/// Eager profile: one vector per letter, all computed by [`SwipeProfile::set`].
#[derive(Clone)]
pub struct SwipeProfile<S: ScoreLane> {
    data: [ScoreVector<S>; PROFILE_LETTERS],
}

impl<S: ScoreLane> SwipeProfile<S> {
    pub fn new() -> Self {
        Self { data: [ScoreVector::zero(); PROFILE_LETTERS] }
    }

    /// Rebuild every letter against `lane_letters`.
    pub fn set(&mut self, lane_letters: &[u8], matrix: &ScoreMatrix, bias: i32) {
        for (letter, v) in self.data.iter_mut().enumerate() {
            *v = ScoreVector::from_letters(letter as u8, lane_letters, matrix, bias);
        }
    }

    #[inline(always)]
    pub fn get(&self, letter: u8) -> ScoreVector<S> {
        self.data[letter as usize]
    }
}

impl<S: ScoreLane> Default for SwipeProfile<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ScoreLane> ScoreProfile<S> for SwipeProfile<S> {
    #[inline(always)]
    fn scores(&mut self, letter: u8) -> ScoreVector<S> {
        self.get(letter)
    }
}

/// Lazy profile: letters are built on first use and cached for the lifetime
/// of the instance (or until [`LazySwipeProfile::reset`]).
pub struct LazySwipeProfile<'a, S: ScoreLane> {
    lane_letters: [u8; MAX_LANES],
    matrix: &'a ScoreMatrix,
    bias: i32,
    data: [ScoreVector<S>; PROFILE_LETTERS],
    /// Bit `l` set once letter `l` has been built.
    mask: u32,
    builds: usize,
}

impl<'a, S: ScoreLane> LazySwipeProfile<'a, S> {
    pub fn new(lane_letters: &[u8], matrix: &'a ScoreMatrix, bias: i32) -> Self {
        let mut p = Self {
            lane_letters: [0; MAX_LANES],
            matrix,
            bias,
            data: [ScoreVector::zero(); PROFILE_LETTERS],
            mask: 0,
            builds: 0,
        };
        p.reset(lane_letters);
        p
    }

    /// Point the profile at a new column; the cache is discarded.
    pub fn reset(&mut self, lane_letters: &[u8]) {
        let n = lane_letters.len().min(MAX_LANES);
        self.lane_letters = [crate::core::compute::encoding::DELIMITER; MAX_LANES];
        self.lane_letters[..n].copy_from_slice(&lane_letters[..n]);
        self.mask = 0;
    }

    #[inline]
    pub fn get(&mut self, letter: u8) -> ScoreVector<S> {
        let bit = 1u32 << letter;
        if self.mask & bit == 0 {
            self.data[letter as usize] =
                ScoreVector::from_letters(letter, &self.lane_letters[..S::LANES], self.matrix, self.bias);
            self.mask |= bit;
            self.builds += 1;
        }
        self.data[letter as usize]
    }

    /// Vectors built so far, across resets.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Letters currently cached.
    pub fn cached(&self) -> u32 {
        self.mask.count_ones()
    }
}

impl<S: ScoreLane> ScoreProfile<S> for LazySwipeProfile<'_, S> {
    #[inline(always)]
    fn scores(&mut self, letter: u8) -> ScoreVector<S> {
        self.get(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute::encoding::{encode_protein, encode_residue, DELIMITER};

    #[test]
    fn test_eager_matches_direct_construction() {
        let matrix = ScoreMatrix::blosum62();
        let lanes = encode_protein(b"ARNDCQEGHILKMFPS");
        let mut p = SwipeProfile::<u8>::new();
        p.set(&lanes, &matrix, matrix.bias());
        for letter in 0..PROFILE_LETTERS as u8 {
            assert_eq!(p.get(letter), ScoreVector::from_letters(letter, &lanes, &matrix, matrix.bias()));
        }
        assert_eq!(p.get(DELIMITER), ScoreVector::zero());
    }

    #[test]
    fn test_lazy_builds_each_letter_once() {
        let matrix = ScoreMatrix::blosum62();
        let lanes = encode_protein(b"WWAAKKTT");
        let mut p = LazySwipeProfile::<i16>::new(&lanes, &matrix, 0);
        let m = encode_residue(b'M');
        let k = encode_residue(b'K');

        let first = p.get(m);
        assert_eq!(p.builds(), 1);
        for _ in 0..10 {
            assert_eq!(p.get(m), first);
        }
        assert_eq!(p.builds(), 1);

        p.get(k);
        p.get(m);
        p.get(k);
        assert_eq!(p.builds(), 2);
        assert_eq!(p.cached(), 2);
    }

    #[test]
    fn test_lazy_agrees_with_eager() {
        let matrix = ScoreMatrix::blosum62();
        let lanes = encode_protein(b"MKTAYIAKQRQISFVK");
        let mut eager = SwipeProfile::<i8>::new();
        eager.set(&lanes, &matrix, 0);
        let mut lazy = LazySwipeProfile::<i8>::new(&lanes, &matrix, 0);
        for &letter in encode_protein(b"QWERTYIPASDFGHKLCVNM").iter() {
            assert_eq!(lazy.scores(letter), eager.scores(letter));
        }
        assert!(lazy.builds() <= matrix.alphabet_size());
    }

    #[test]
    fn test_lazy_reset_clears_cache() {
        let matrix = ScoreMatrix::blosum62();
        let mut p = LazySwipeProfile::<i16>::new(&encode_protein(b"AAAA"), &matrix, 0);
        let a = encode_residue(b'A');
        assert_eq!(p.get(a).get(0), 4);
        p.reset(&encode_protein(b"WWWW"));
        assert_eq!(p.cached(), 0);
        assert_eq!(p.get(a).get(0), -3);
        assert_eq!(p.builds(), 2);
    }
}
