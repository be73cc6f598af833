//! Three-frame banded alignment of a translated nucleotide query.
//!
//! Rows are query nucleotide positions, columns are subject residues. The
//! diagonal of cell (`p`, `i`) is `3 * i - p`, matching the protein kernels'
//! `target - query` orientation, and a batch shares a band of
//! `max(d_end) - min(d_begin)` rows:
//!
//! ```text
//! column i, row r:  p = 3 * i + 1 - max(d_end) + r
//! ```
//!
//! A cell scores the codon starting at `p` against subject residue `i`. Its
//! same-frame diagonal predecessor is `p - 3` in the previous column; `p - 4`
//! and `p - 2` are the frame-shift predecessors. Gaps are whole codons: an
//! insertion comes from `p - 3k` in the same column, a deletion from `p` in
//! column `i - k`.

use super::banded_swipe::DpTarget;
use super::cell_update::cell_update_frameshift;
use super::matrix::Banded3FrameTracebackMatrix;
use super::profile::SwipeProfile;
use super::scoring::Scoring;
use super::transcript::{EditOp, Hsp, Transcript};
use super::workspace::DpWorkspace;
use crate::core::compute::encoding::{TranslatedQuery, DELIMITER};
use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::{ScoreLane, MAX_LANES};
use crate::error::DpError;

struct FrameLayout {
    band: usize,
    /// Query position of row 0 in column 0
    base: isize,
    dna_len: isize,
    i_begin: isize,
    i_end: isize,
}

impl FrameLayout {
    fn new(dna_len: usize, batch: &[DpTarget<'_>]) -> Self {
        let d_end = batch.iter().map(|t| t.d_end).max().unwrap_or(1) as isize;
        let d_begin = batch.iter().map(|t| t.d_begin).min().unwrap_or(0) as isize;
        let band = (d_end - d_begin).max(1) as usize;
        let base = 1 - d_end;
        let dna_len = dna_len as isize;
        let max_len = batch.iter().map(|t| t.seq.len()).max().unwrap_or(0) as isize;
        let mut layout = Self { band, base, dna_len, i_begin: 0, i_end: 0 };

        // a column has valid rows iff -band < 3i + base < dna_len - 2
        let mut i_begin = 0isize;
        while 3 * i_begin + base <= -(band as isize) {
            i_begin += 1;
        }
        let mut i_end = i_begin;
        while dna_len >= 3 && i_end < max_len && 3 * i_end + base < dna_len - 2 {
            i_end += 1;
        }
        layout.i_begin = i_begin.min(i_end);
        layout.i_end = i_end;
        layout
    }

    fn cols(&self) -> usize {
        (self.i_end - self.i_begin).max(0) as usize
    }

    #[inline]
    fn query_pos(&self, i: isize, r: usize) -> isize {
        3 * i + self.base + r as isize
    }

    /// Rows `[offset, end)` of column `i` whose codon lies inside the query.
    fn rows(&self, i: isize) -> (usize, usize) {
        let p0 = 3 * i + self.base;
        let offset = (-p0).max(0) as usize;
        let end = (self.dna_len - 2 - p0).min(self.band as isize).max(0) as usize;
        (offset, end.max(offset))
    }

    fn lane_letters(&self, i: isize, batch: &[DpTarget<'_>], out: &mut [u8; MAX_LANES]) {
        out.fill(DELIMITER);
        for (lane, t) in batch.iter().enumerate() {
            if let Some(&c) = t.seq.get(i as usize) {
                out[lane] = c;
            }
        }
    }
}

struct FillResult<S: ScoreLane> {
    best: ScoreVector<S>,
    best_col: [usize; MAX_LANES],
}

fn fill<S: ScoreLane>(
    query: &TranslatedQuery,
    batch: &[DpTarget<'_>],
    layout: &FrameLayout,
    scoring: &Scoring,
    matrix: &mut Banded3FrameTracebackMatrix<'_, S>,
) -> FillResult<S> {
    let bias_i32 = if S::SIGNED { 0 } else { scoring.matrix.bias() };
    let bias = ScoreVector::splat_i32(bias_i32);
    let open = ScoreVector::splat_i32(scoring.gaps.open);
    let extend = ScoreVector::splat_i32(scoring.gaps.extend);
    let frame_shift = ScoreVector::splat_i32(scoring.frame_shift);

    let mut profile = SwipeProfile::<S>::new();
    let mut letters = [DELIMITER; MAX_LANES];
    let mut best = ScoreVector::<S>::zero();
    let mut best_col = [0usize; MAX_LANES];

    for (col, i) in (layout.i_begin..layout.i_end).enumerate() {
        layout.lane_letters(i, batch, &mut letters);
        profile.set(&letters[..S::LANES], &scoring.matrix, bias_i32);
        let (offset, end) = layout.rows(i);
        let before = best.to_lanes();
        {
            let mut it = matrix.begin(offset, col);
            if offset > 0 {
                it.set_zero();
            }
            // one vertical gap per frame; rows r and r + 3 share a frame
            let mut vgap = [ScoreVector::<S>::zero(); 3];
            for r in offset..end {
                let scores = profile.get(query.letter_at(layout.query_pos(i, r)));
                let mut hgap = it.hgap();
                let cur = cell_update_frameshift(
                    it.sm3(),
                    it.sm4(),
                    it.sm2(),
                    scores,
                    bias,
                    extend,
                    open,
                    frame_shift,
                    &mut hgap,
                    &mut vgap[r % 3],
                    &mut best,
                );
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
    FillResult { best, best_col }
}

fn limit<S: ScoreLane>(scoring: &Scoring) -> i32 {
    let bias = if S::SIGNED { 0 } else { scoring.matrix.bias() };
    S::MAX.to_i32() - bias - scoring.matrix.max_score()
}

/// Three-frame banded scores; `None` where the lane saturated.
pub fn banded_3frame_swipe<S: ScoreLane>(
    query: &TranslatedQuery,
    targets: &[DpTarget<'_>],
    scoring: &Scoring,
    ws: &mut DpWorkspace<S>,
) -> Vec<Option<i32>> {
    let limit = limit::<S>(scoring);
    let mut results = Vec::with_capacity(targets.len());
    for batch in targets.chunks(S::LANES) {
        let layout = FrameLayout::new(query.dna_len(), batch);
        if layout.cols() == 0 {
            results.extend(batch.iter().map(|_| Some(0)));
            continue;
        }
        let mut matrix = Banded3FrameTracebackMatrix::new(ws, layout.band, layout.cols());
        let res = fill(query, batch, &layout, scoring, &mut matrix);
        for lane in 0..batch.len() {
            let score = res.best.get(lane).to_i32();
            results.push(if score >= limit { None } else { Some(score) });
        }
    }
    results
}

/// Three-frame banded alignment with traceback.
///
/// Follows the rules of [`banded_swipe_traceback`](super::banded_swipe::banded_swipe_traceback),
/// with the frame shifts ranked between the diagonal and the gaps: same
/// frame, forward shift, reverse shift, insertion, deletion. The HSP's
/// `frame` is the frame the alignment starts in.
pub fn banded_3frame_swipe_traceback<S: ScoreLane>(
    query: &TranslatedQuery,
    targets: &[DpTarget<'_>],
    scoring: &Scoring,
    ws: &mut DpWorkspace<S>,
    out: &mut Vec<Hsp>,
) -> Result<(), DpError> {
    let limit = limit::<S>(scoring);
    for (batch_idx, batch) in targets.chunks(S::LANES).enumerate() {
        let layout = FrameLayout::new(query.dna_len(), batch);
        if layout.cols() == 0 {
            continue;
        }
        log::trace!("3-frame batch: {} targets, band {}, {} columns", batch.len(), layout.band, layout.cols());
        let mut matrix = Banded3FrameTracebackMatrix::new(ws, layout.band, layout.cols());
        let res = fill(query, batch, &layout, scoring, &mut matrix);

        for (lane, target) in batch.iter().enumerate() {
            let index = batch_idx * S::LANES + lane;
            let score = res.best.get(lane).to_i32();
            if score >= limit {
                return Err(DpError::ScoreOverflow { target: index, bits: S::BITS });
            }
            if score <= 0 {
                continue;
            }
            let walker = FrameWalker { layout: &layout, matrix: &matrix, query, subject: target.seq, lane, scoring };
            out.push(walker.trace(res.best_col[lane], score, index)?);
        }
    }
    Ok(())
}

struct FrameWalker<'w, 'a, S: ScoreLane> {
    layout: &'w FrameLayout,
    matrix: &'w Banded3FrameTracebackMatrix<'a, S>,
    query: &'w TranslatedQuery,
    subject: &'w [u8],
    lane: usize,
    scoring: &'w Scoring,
}

impl<S: ScoreLane> FrameWalker<'_, '_, S> {
    fn h(&self, p: isize, i: isize) -> i32 {
        if p < 0 || i < self.layout.i_begin {
            return 0;
        }
        let r = p - self.layout.query_pos(i, 0);
        if r < 0 || r as usize >= self.layout.band {
            return 0;
        }
        self.matrix.score((i - self.layout.i_begin) as usize, r as usize, self.lane)
    }

    fn trace(&self, col: usize, score: i32, index: usize) -> Result<Hsp, DpError> {
        let i_end = self.layout.i_begin + col as isize;
        let (offset, end) = self.layout.rows(i_end);
        let row = self.matrix.find_cell(col, self.lane, score, offset..end)?;
        let p_end = self.layout.query_pos(i_end, row);

        let gaps = self.scoring.gaps;
        let fs = self.scoring.frame_shift;
        let mut transcript = Transcript::new();
        let (mut p, mut i, mut h) = (p_end, i_end, score);
        loop {
            let (q, s) = (self.query.letter_at(p), self.subject[i as usize]);
            let sub = self.scoring.matrix.score(q, s);
            let op = if q == s { EditOp::Match } else { EditOp::Mismatch };

            let diag = self.h(p - 3, i - 1);
            if h == diag + sub {
                transcript.push(op, 1);
                if diag == 0 {
                    break;
                }
                p -= 3;
                i -= 1;
                h = diag;
                continue;
            }
            let shifted = [(4, EditOp::FrameShiftForward), (2, EditOp::FrameShiftReverse)]
                .into_iter()
                .map(|(back, shift)| (back, shift, self.h(p - back, i - 1)))
                .find(|&(_, _, prev)| prev > 0 && h == prev + sub - fs);
            if let Some((back, shift, prev)) = shifted {
                transcript.push(op, 1);
                transcript.push(shift, 1);
                p -= back;
                i -= 1;
                h = prev;
                continue;
            }
            if let Some((k, prev)) = (1..=p / 3).map(|k| (k, self.h(p - 3 * k, i))).find(|&(k, prev)| prev > 0 && h == prev - gaps.cost(k as usize)) {
                transcript.push(EditOp::Insertion, k as u32);
                p -= 3 * k;
                h = prev;
                continue;
            }
            if let Some((k, prev)) = (1..=i).map(|k| (k, self.h(p, i - k))).find(|&(k, prev)| prev > 0 && h == prev - gaps.cost(k as usize)) {
                transcript.push(EditOp::Deletion, k as u32);
                i -= k;
                h = prev;
                continue;
            }
            return Err(DpError::TracebackInconsistent { query_pos: p as usize, target_pos: i as usize, score: h });
        }
        transcript.reverse();
        Ok(Hsp {
            target: index,
            score,
            query_range: p as usize..p_end as usize + 3,
            target_range: i as usize..i_end as usize + 1,
            frame: p as usize % 3,
            transcript,
        })
    }
}
