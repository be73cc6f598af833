//! Banded SWIPE kernels (score only, and with traceback).
//!
//! Each target carries a diagonal range `[d_begin, d_end)`, where the diagonal
//! of a cell is `target_pos - query_pos`. A batch of up to `S::LANES` targets
//! shares one band of `max(d_end - d_begin)` rows:
//!
//! ```text
//! column c, row r, lane l:
//!     query_pos  j = c + r - (band - 1)
//!     target_pos t = c + d_begin[l]
//! ```
//!
//! so the diagonal of row `r` is `d_begin[l] + band - 1 - r`, row 0 being the
//! highest diagonal. Every lane thus sees at least its own diagonal range.
//! One column fixes each lane's target letter, so one residue profile per
//! column serves every row.

use super::cell_update::{cell_update, cell_update_biased};
use super::matrix::{BandedSwipeMatrix, BandedTracebackMatrix};
use super::profile::SwipeProfile;
use super::scoring::Scoring;
use super::transcript::{EditOp, Hsp, Transcript};
use super::workspace::DpWorkspace;
use crate::core::compute::encoding::DELIMITER;
use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::{ScoreLane, MAX_LANES};
use crate::error::DpError;

/// One target of a banded alignment batch.
///
/// The band `[d_begin, d_end)` is never empty; fields are only set through
/// the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpTarget<'a> {
    pub(crate) seq: &'a [u8],
    /// First diagonal of the band (inclusive)
    pub(crate) d_begin: i32,
    /// Last diagonal of the band (exclusive)
    pub(crate) d_end: i32,
}

impl<'a> DpTarget<'a> {
    pub fn new(seq: &'a [u8], d_begin: i32, d_end: i32) -> Self {
        assert!(d_end > d_begin, "empty band [{d_begin}, {d_end})");
        Self { seq, d_begin, d_end }
    }

    /// Band covering every cell of a `query_len` x `seq.len()` matrix.
    pub fn full(seq: &'a [u8], query_len: usize) -> Self {
        let d_begin = 1 - query_len.max(1) as i32;
        let d_end = (seq.len() as i32).max(d_begin + 1);
        Self { seq, d_begin, d_end }
    }

    /// Band of `width` diagonals on each side of `diagonal`.
    pub fn around(seq: &'a [u8], diagonal: i32, width: i32) -> Self {
        Self::new(seq, diagonal - width, diagonal + width + 1)
    }

    pub fn seq(&self) -> &'a [u8] {
        self.seq
    }

    pub fn d_begin(&self) -> i32 {
        self.d_begin
    }

    pub fn d_end(&self) -> i32 {
        self.d_end
    }

    pub fn band(&self) -> usize {
        debug_assert!(self.d_end > self.d_begin);
        (self.d_end - self.d_begin) as usize
    }
}

/// Column/row geometry of one batch.
struct BandLayout {
    band: usize,
    qlen: isize,
    c_begin: isize,
    c_end: isize,
    d_begin: [isize; MAX_LANES],
}

impl BandLayout {
    fn new(qlen: usize, batch: &[DpTarget<'_>]) -> Self {
        let band = batch.iter().map(DpTarget::band).max().unwrap_or(1);
        let b = band as isize - 1;
        let mut d_begin = [0isize; MAX_LANES];
        for (d, t) in d_begin.iter_mut().zip(batch) {
            *d = t.d_begin as isize;
        }
        let c_begin = batch.iter().map(|t| -(t.d_begin as isize)).min().unwrap_or(0).max(0);
        let c_end = batch
            .iter()
            .map(|t| t.seq.len() as isize - t.d_begin as isize)
            .max()
            .unwrap_or(0)
            .min(qlen as isize + b);
        Self { band, qlen: qlen as isize, c_begin, c_end, d_begin }
    }

    fn cols(&self) -> usize {
        (self.c_end - self.c_begin).max(0) as usize
    }

    /// Rows `[offset, end)` of column `c` with a valid query position.
    fn rows(&self, c: isize) -> (usize, usize) {
        let b = self.band as isize - 1;
        let offset = (b - c).max(0) as usize;
        let end = (self.qlen + b - c).min(self.band as isize) as usize;
        (offset, end)
    }

    #[inline]
    fn query_pos(&self, c: isize, r: usize) -> isize {
        c + r as isize - (self.band as isize - 1)
    }

    #[inline]
    fn target_pos(&self, c: isize, lane: usize) -> isize {
        c + self.d_begin[lane]
    }

    /// Column of `(query_pos, target_pos)` for `lane` and its row.
    #[inline]
    fn cell(&self, lane: usize, j: isize, t: isize) -> (isize, usize) {
        let c = t - self.d_begin[lane];
        (c, (j - c + self.band as isize - 1) as usize)
    }

    fn lane_letters(&self, c: isize, batch: &[DpTarget<'_>], out: &mut [u8; MAX_LANES]) {
        out.fill(DELIMITER);
        for (lane, t) in batch.iter().enumerate() {
            let pos = self.target_pos(c, lane);
            if pos >= 0 && (pos as usize) < t.seq.len() {
                out[lane] = t.seq[pos as usize];
            }
        }
    }
}

/// Per-lane running state shared by both kernels.
struct Gaps<S: ScoreLane> {
    open: ScoreVector<S>,
    extend: ScoreVector<S>,
    bias: ScoreVector<S>,
    bias_i32: i32,
    limit: i32,
}

impl<S: ScoreLane> Gaps<S> {
    fn new(scoring: &Scoring) -> Self {
        let bias_i32 = if S::SIGNED { 0 } else { scoring.matrix.bias() };
        Self {
            open: ScoreVector::splat_i32(scoring.gaps.open),
            extend: ScoreVector::splat_i32(scoring.gaps.extend),
            bias: ScoreVector::splat_i32(bias_i32),
            bias_i32,
            limit: S::MAX.to_i32() - bias_i32 - scoring.matrix.max_score(),
        }
    }

    #[inline(always)]
    fn update(
        &self,
        diag: ScoreVector<S>,
        scores: ScoreVector<S>,
        hgap: &mut ScoreVector<S>,
        vgap: &mut ScoreVector<S>,
        best: &mut ScoreVector<S>,
    ) -> ScoreVector<S> {
        if S::SIGNED {
            cell_update(diag, scores, self.extend, self.open, hgap, vgap, best)
        } else {
            cell_update_biased(diag, scores, self.bias, self.extend, self.open, hgap, vgap, best)
        }
    }
}

/// Banded local alignment scores.
///
/// Returns one entry per target; `None` if the lane saturated and the target
/// has to be rerun with a wider lane kind.
pub fn banded_swipe<S: ScoreLane>(
    query: &[u8],
    targets: &[DpTarget<'_>],
    scoring: &Scoring,
    ws: &mut DpWorkspace<S>,
) -> Vec<Option<i32>> {
    let gaps = Gaps::<S>::new(scoring);
    let mut results = Vec::with_capacity(targets.len());
    let mut profile = SwipeProfile::<S>::new();
    let mut letters = [DELIMITER; MAX_LANES];

    for batch in targets.chunks(S::LANES) {
        if query.is_empty() {
            results.extend(batch.iter().map(|_| Some(0)));
            continue;
        }
        let layout = BandLayout::new(query.len(), batch);
        log::trace!("banded batch: {} targets, band {}, {} columns", batch.len(), layout.band, layout.cols());
        let mut matrix = BandedSwipeMatrix::new(ws, layout.band);
        let mut best = ScoreVector::<S>::zero();

        for c in layout.c_begin..layout.c_end {
            layout.lane_letters(c, batch, &mut letters);
            profile.set(&letters[..S::LANES], &scoring.matrix, gaps.bias_i32);
            let (offset, end) = layout.rows(c);
            let mut it = matrix.begin(offset);
            let mut vgap = ScoreVector::zero();
            for r in offset..end {
                let q = query[layout.query_pos(c, r) as usize];
                let mut hgap = it.hgap();
                let cur = gaps.update(it.diag(), profile.get(q), &mut hgap, &mut vgap, &mut best);
                it.set_hgap(hgap);
                it.set_score(cur);
                it.advance();
            }
        }

        for lane in 0..batch.len() {
            let score = best.get(lane).to_i32();
            results.push(if score >= gaps.limit { None } else { Some(score) });
        }
    }
    results
}

/// Banded local alignment with traceback.
///
/// Pushes one [`Hsp`] per target with a positive score onto `out`, in target
/// order. The traced path is fixed by these rules:
///
/// 1. the end cell is the first row, in scan order, of the first column where
///    the lane reached its best score;
/// 2. walking back, a diagonal step is preferred over an insertion (query
///    letters against a gap), and an insertion over a deletion; among gaps the
///    shortest one that explains the score wins.
pub fn banded_swipe_traceback<S: ScoreLane>(
    query: &[u8],
    targets: &[DpTarget<'_>],
    scoring: &Scoring,
    ws: &mut DpWorkspace<S>,
    out: &mut Vec<Hsp>,
) -> Result<(), DpError> {
    let gaps = Gaps::<S>::new(scoring);
    let mut profile = SwipeProfile::<S>::new();
    let mut letters = [DELIMITER; MAX_LANES];

    for (batch_idx, batch) in targets.chunks(S::LANES).enumerate() {
        if query.is_empty() {
            continue;
        }
        let layout = BandLayout::new(query.len(), batch);
        let cols = layout.cols();
        if cols == 0 {
            continue;
        }
        let mut matrix = BandedTracebackMatrix::new(ws, layout.band, cols);
        let mut best = ScoreVector::<S>::zero();
        let mut best_col = [0usize; MAX_LANES];

        for (col, c) in (layout.c_begin..layout.c_end).enumerate() {
            layout.lane_letters(c, batch, &mut letters);
            profile.set(&letters[..S::LANES], &scoring.matrix, gaps.bias_i32);
            let (offset, end) = layout.rows(c);
            let before = best.to_lanes();
            {
                let mut it = matrix.begin(offset, col);
                if offset > 0 {
                    it.set_zero();
                }
                let mut vgap = ScoreVector::zero();
                for r in offset..end {
                    let q = query[layout.query_pos(c, r) as usize];
                    let mut hgap = it.hgap();
                    let cur = gaps.update(it.diag(), profile.get(q), &mut hgap, &mut vgap, &mut best);
                    it.set_hgap(hgap);
                    it.set_score(cur);
                    it.advance();
                }
            }
            let after = best.to_lanes();
            for lane in 0..batch.len() {
                if after[lane] > before[lane] {
                    best_col[lane] = col;
                }
            }
        }

        for (lane, target) in batch.iter().enumerate() {
            let index = batch_idx * S::LANES + lane;
            let score = best.get(lane).to_i32();
            if score >= gaps.limit {
                return Err(DpError::ScoreOverflow { target: index, bits: S::BITS });
            }
            if score <= 0 {
                continue;
            }
            let walker = Walker { layout: &layout, matrix: &matrix, query, target: target.seq, lane, scoring };
            out.push(walker.trace(best_col[lane], score, index)?);
        }
    }
    Ok(())
}

struct Walker<'w, 'a, S: ScoreLane> {
    layout: &'w BandLayout,
    matrix: &'w BandedTracebackMatrix<'a, S>,
    query: &'w [u8],
    target: &'w [u8],
    lane: usize,
    scoring: &'w Scoring,
}

impl<S: ScoreLane> Walker<'_, '_, S> {
    /// Stored score of cell (`j`, `t`); cells outside the computed area are 0.
    fn h(&self, j: isize, t: isize) -> i32 {
        if j < 0 || t < 0 {
            return 0;
        }
        let (c, r) = self.layout.cell(self.lane, j, t);
        if c < self.layout.c_begin || r >= self.layout.band {
            return 0;
        }
        self.matrix.score((c - self.layout.c_begin) as usize, r, self.lane)
    }

    fn trace(&self, col: usize, score: i32, index: usize) -> Result<Hsp, DpError> {
        let c = self.layout.c_begin + col as isize;
        let (offset, end) = self.layout.rows(c);
        let t_end = self.layout.target_pos(c, self.lane);
        let row = self.matrix.find_cell(col, self.lane, score, offset..end)?;
        let j_end = self.layout.query_pos(c, row);

        let gaps = self.scoring.gaps;
        let mut transcript = Transcript::new();
        let (mut j, mut t, mut h) = (j_end, t_end, score);
        loop {
            let (q, s) = (self.query[j as usize], self.target[t as usize]);
            let diag = self.h(j - 1, t - 1);
            if h == diag + self.scoring.matrix.score(q, s) {
                transcript.push(if q == s { EditOp::Match } else { EditOp::Mismatch }, 1);
                if diag == 0 {
                    break;
                }
                j -= 1;
                t -= 1;
                h = diag;
                continue;
            }
            if let Some((k, prev)) = (1..=j).map(|k| (k, self.h(j - k, t))).find(|&(k, prev)| prev > 0 && h == prev - gaps.cost(k as usize)) {
                transcript.push(EditOp::Insertion, k as u32);
                j -= k;
                h = prev;
                continue;
            }
            if let Some((k, prev)) = (1..=t).map(|k| (k, self.h(j, t - k))).find(|&(k, prev)| prev > 0 && h == prev - gaps.cost(k as usize)) {
                transcript.push(EditOp::Deletion, k as u32);
                t -= k;
                h = prev;
                continue;
            }
            return Err(DpError::TracebackInconsistent { query_pos: j as usize, target_pos: t as usize, score: h });
        }
        transcript.reverse();
        Ok(Hsp {
            target: index,
            score,
            query_range: j as usize..j_end as usize + 1,
            target_range: t as usize..t_end as usize + 1,
            frame: 0,
            transcript,
        })
    }
}
