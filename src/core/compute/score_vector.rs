//! Packed saturating score vectors.
//!
//! `ScoreVector<S>` is one 128-bit register of `S::LANES` independent scores,
//! one per target sequence being aligned. All arithmetic saturates at the lane
//! kind's range, which the kernels rely on: an unsigned lane can never go
//! below zero, and overflow is detected after the fact by comparing the best
//! score against the saturation limit.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::encoding::DELIMITER;
use super::simd_abstraction::{ScoreLane, MAX_LANES};
use crate::core::alignment::scoring::ScoreMatrix;

pub struct ScoreVector<S: ScoreLane>(S::Vector);

impl<S: ScoreLane> Clone for ScoreVector<S> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ScoreLane> Copy for ScoreVector<S> {}

impl<S: ScoreLane> ScoreVector<S> {
    #[inline(always)]
    pub fn zero() -> Self {
        Self(S::splat(S::ZERO))
    }

    #[inline(always)]
    pub fn splat(value: S) -> Self {
        Self(S::splat(value))
    }

    /// Broadcast an `i32`, saturated into the lane range.
    #[inline]
    pub fn splat_i32(value: i32) -> Self {
        Self(S::splat(S::saturate(value)))
    }

    /// Build from raw lane values; missing lanes are zero.
    pub fn from_lanes(values: &[S]) -> Self {
        assert!(values.len() <= S::LANES, "{} values for {} lanes", values.len(), S::LANES);
        let mut lanes = [S::ZERO; MAX_LANES];
        lanes[..values.len()].copy_from_slice(values);
        Self(S::load(&lanes))
    }

    /// Substitution scores of `letter` against each lane's letter, plus `bias`.
    ///
    /// Lanes beyond `lane_letters`, and any pairing with [`DELIMITER`], get the
    /// lane minimum.
    pub fn from_letters(letter: u8, lane_letters: &[u8], matrix: &ScoreMatrix, bias: i32) -> Self {
        let mut lanes = [S::MIN; MAX_LANES];
        if letter != DELIMITER {
            for (lane, &t) in lanes.iter_mut().zip(lane_letters.iter()).take(S::LANES) {
                if t != DELIMITER {
                    *lane = S::saturate(matrix.score(letter, t) + bias);
                }
            }
        }
        Self(S::load(&lanes))
    }

    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self(S::max(self.0, other.0))
    }

    #[inline]
    pub fn to_lanes(self) -> [S; MAX_LANES] {
        S::store(self.0)
    }

    #[inline]
    pub fn get(self, lane: usize) -> S {
        debug_assert!(lane < S::LANES);
        self.to_lanes()[lane]
    }

    /// Overwrite one lane. Not for the inner loop: this round-trips through memory.
    pub fn set(&mut self, lane: usize, value: S) {
        assert!(lane < S::LANES, "lane {lane} out of range");
        let mut lanes = self.to_lanes();
        lanes[lane] = value;
        self.0 = S::load(&lanes);
    }

    #[inline(always)]
    pub fn raw(self) -> S::Vector {
        self.0
    }
}

impl<S: ScoreLane> Default for ScoreVector<S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<S: ScoreLane> Add for ScoreVector<S> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(S::adds(self.0, rhs.0))
    }
}

impl<S: ScoreLane> Sub for ScoreVector<S> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(S::subs(self.0, rhs.0))
    }
}

impl<S: ScoreLane> AddAssign for ScoreVector<S> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = S::adds(self.0, rhs.0);
    }
}

impl<S: ScoreLane> SubAssign for ScoreVector<S> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = S::subs(self.0, rhs.0);
    }
}

impl<S: ScoreLane> PartialEq for ScoreVector<S> {
    fn eq(&self, other: &Self) -> bool {
        S::cmpeq_all(self.0, other.0)
    }
}

impl<S: ScoreLane> Eq for ScoreVector<S> {}

impl<S: ScoreLane> fmt::Debug for ScoreVector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lanes = self.to_lanes();
        f.debug_list().entries(&lanes[..S::LANES]).finish()
    }
}
