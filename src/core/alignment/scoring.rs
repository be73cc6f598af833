//! Substitution matrix and affine gap model.

use crate::core::compute::encoding::{ALPHABET_SIZE, DELIMITER};
use crate::defaults;

/// Flattened BLOSUM62 (24 x 24) in alphabet order ARNDCQEGHILKMFPSTWYVBZX*.
#[rustfmt::skip]
static BLOSUM62: [i8; ALPHABET_SIZE * ALPHABET_SIZE] = [
 // A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
    4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
   -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
   -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
   -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
    0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
   -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
   -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
    0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
   -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
   -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
   -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
   -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
   -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
   -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
   -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
    1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
    0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
   -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
   -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
    0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
   -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
   -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
    0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
   -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

/// Substitution scores over the protein alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    scores: [i8; ALPHABET_SIZE * ALPHABET_SIZE],
    bias: i32,
    max_score: i32,
}

impl ScoreMatrix {
    fn from_scores(scores: [i8; ALPHABET_SIZE * ALPHABET_SIZE]) -> Self {
        let min = scores.iter().copied().min().unwrap_or(0) as i32;
        let max = scores.iter().copied().max().unwrap_or(0) as i32;
        Self { scores, bias: (-min).max(0), max_score: max }
    }

    pub fn blosum62() -> Self {
        Self::from_scores(BLOSUM62)
    }

    /// `match_score` on the diagonal, `mismatch` everywhere else.
    pub fn identity(match_score: i8, mismatch: i8) -> Self {
        let mut scores = [mismatch; ALPHABET_SIZE * ALPHABET_SIZE];
        for a in 0..ALPHABET_SIZE {
            scores[a * ALPHABET_SIZE + a] = match_score;
        }
        Self::from_scores(scores)
    }

    /// Score of letter `a` against letter `b`. Both must be real letters.
    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        debug_assert!(a != DELIMITER && b != DELIMITER, "delimiter has no substitution score");
        self.scores[a as usize * ALPHABET_SIZE + b as usize] as i32
    }

    /// Offset that makes every entry non-negative (used by unsigned lanes).
    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn max_score(&self) -> i32 {
        self.max_score
    }

    pub fn alphabet_size(&self) -> usize {
        ALPHABET_SIZE
    }
}

impl Default for ScoreMatrix {
    fn default() -> Self {
        Self::blosum62()
    }
}

/// Affine gap penalties; a gap of length `L` costs `open + extend * (L - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapPenalties {
    pub open: i32,
    pub extend: i32,
}

impl GapPenalties {
    pub fn new(open: i32, extend: i32) -> Self {
        assert!(open >= extend && extend >= 0, "gap penalties need open >= extend >= 0");
        Self { open, extend }
    }

    /// Cost of a gap of `len` letters.
    #[inline]
    pub fn cost(&self, len: usize) -> i32 {
        debug_assert!(len > 0);
        self.open + self.extend * (len as i32 - 1)
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self { open: defaults::GAP_OPEN_PENALTY, extend: defaults::GAP_EXTEND_PENALTY }
    }
}

/// Everything a kernel needs to score an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    pub matrix: ScoreMatrix,
    pub gaps: GapPenalties,
    /// Penalty for a frame shift in translated alignment.
    pub frame_shift: i32,
}

impl Scoring {
    pub fn new(matrix: ScoreMatrix, gaps: GapPenalties) -> Self {
        Self { matrix, gaps, frame_shift: defaults::FRAME_SHIFT_PENALTY }
    }

    pub fn with_gaps(mut self, open: i32, extend: i32) -> Self {
        self.gaps = GapPenalties::new(open, extend);
        self
    }

    pub fn with_frame_shift(mut self, frame_shift: i32) -> Self {
        assert!(frame_shift >= 0);
        self.frame_shift = frame_shift;
        self
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(ScoreMatrix::blosum62(), GapPenalties::default())
    }
}
