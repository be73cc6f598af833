//! Per-worker scratch for DP matrices
//!
//! A [`DpWorkspace`] owns the score and horizontal-gap buffers that every
//! matrix variant borrows for one alignment pass. Buffers only grow: once a
//! worker has seen its largest shape, later passes run without allocating.
//!
//! There is no hidden global state. Each worker creates (or is handed) a
//! [`DpContext`] and passes it down; the borrow checker keeps a matrix from
//! outliving or sharing its workspace.

use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::ScoreLane;

/// Growable score/gap buffers for one lane kind.
pub struct DpWorkspace<S: ScoreLane> {
    hgap: Vec<ScoreVector<S>>,
    score: Vec<ScoreVector<S>>,
}

impl<S: ScoreLane> DpWorkspace<S> {
    pub fn new() -> Self {
        Self { hgap: Vec::new(), score: Vec::new() }
    }

    /// Pre-size for matrices up to `hgap_len` / `score_len` vectors.
    pub fn with_capacity(hgap_len: usize, score_len: usize) -> Self {
        let mut ws = Self::new();
        ws.buffers(hgap_len, score_len);
        ws
    }

    /// Slices of exactly the requested lengths, growing the buffers if needed.
    ///
    /// Contents are whatever the previous pass left behind; matrices zero the
    /// boundary cells they read before writing.
    pub fn buffers(&mut self, hgap_len: usize, score_len: usize) -> (&mut [ScoreVector<S>], &mut [ScoreVector<S>]) {
        if self.hgap.len() < hgap_len {
            log::trace!("growing hgap buffer {} -> {} vectors", self.hgap.len(), hgap_len);
            self.hgap.resize(hgap_len, ScoreVector::zero());
        }
        if self.score.len() < score_len {
            log::trace!("growing score buffer {} -> {} vectors", self.score.len(), score_len);
            self.score.resize(score_len, ScoreVector::zero());
        }
        (&mut self.hgap[..hgap_len], &mut self.score[..score_len])
    }

    /// Current buffer sizes in vectors, `(hgap, score)`.
    pub fn capacity(&self) -> (usize, usize) {
        (self.hgap.len(), self.score.len())
    }

    /// Base addresses of the buffers; stable as long as no pass needs more room.
    pub fn buffer_ptrs(&self) -> (*const ScoreVector<S>, *const ScoreVector<S>) {
        (self.hgap.as_ptr(), self.score.as_ptr())
    }
}

impl<S: ScoreLane> Default for DpWorkspace<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one worker needs for adaptive-width alignment.
#[derive(Default)]
pub struct DpContext {
    /// First pass, 16 x u8
    pub narrow: DpWorkspace<u8>,
    /// Rescoring and traceback, 8 x i16
    pub wide: DpWorkspace<i16>,
}

impl DpContext {
    pub fn new() -> Self {
        Self::default()
    }
}
