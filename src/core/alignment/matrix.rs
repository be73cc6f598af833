//! DP matrix variants.
//!
//! Every variant borrows its storage from a [`DpWorkspace`] and exposes a
//! column iterator with the same shape:
//!
//! - `hgap()` / `diag()` read the previous column,
//! - `set_hgap()` / `set_score()` write the current column,
//! - `advance()` moves both cursors down one row.
//!
//! | variant                         | hgap vectors         | score vectors        |
//! |---------------------------------|----------------------|----------------------|
//! | [`SwipeMatrix`]                 | `rows`               | `rows + 1`           |
//! | [`BandedSwipeMatrix`]           | `band + 1`           | `band`               |
//! | [`BandedTracebackMatrix`]       | `(band + 1) * (cols + 1)` | `band * (cols + 1)` |
//! | [`Banded3FrameTracebackMatrix`] | `(band + 3) * (cols + 1)` | `(band + 1) * (cols + 1)` |
//!
//! In the banded variants row `r` of a column and row `r` of the next column
//! lie on the same diagonal, so the horizontal predecessor of row `r` is row
//! `r + 1` of the previous column (`r + 3` in nucleotide space). The extra
//! trailing rows are zero sentinels for those reads.
//!
//! Traceback variants keep one storage column per DP column plus a zeroed
//! boundary column 0; DP column `c` lives in storage column `c + 1`.

use std::ops::Range;

use super::workspace::DpWorkspace;
use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::ScoreLane;
use crate::error::DpError;

// ----------------------------------------------------------------------------
// Index functions
// ----------------------------------------------------------------------------

#[inline(always)]
pub fn banded_score_index(band: usize, col: usize, row: usize) -> usize {
    debug_assert!(row < band, "row {row} outside band {band}");
    col * band + row
}

#[inline(always)]
pub fn banded_hgap_index(band: usize, col: usize, row: usize) -> usize {
    debug_assert!(row <= band, "row {row} outside band {band} + sentinel");
    col * (band + 1) + row
}

#[inline(always)]
pub fn frame_score_index(band: usize, col: usize, row: usize) -> usize {
    debug_assert!(row <= band, "row {row} outside band {band} + sentinel");
    col * (band + 1) + row
}

#[inline(always)]
pub fn frame_hgap_index(band: usize, col: usize, row: usize) -> usize {
    debug_assert!(row < band + 3, "row {row} outside band {band} + sentinels");
    col * (band + 3) + row
}

fn clear_lane<S: ScoreLane>(buf: &mut [ScoreVector<S>], lane: usize) {
    for v in buf.iter_mut() {
        v.set(lane, S::ZERO);
    }
}

/// First row in `rows` of a stored column whose lane value equals `score`.
fn scan_column<S: ScoreLane>(
    column: &[ScoreVector<S>],
    rows: Range<usize>,
    lane: usize,
    score: i32,
    dp_col: usize,
) -> Result<usize, DpError> {
    rows.clone()
        .find(|&r| column[r].get(lane).to_i32() == score)
        .ok_or(DpError::TracebackNotFound { column: dp_col, lane, score })
}

// ----------------------------------------------------------------------------
// Full matrix
// ----------------------------------------------------------------------------

/// Rolling single-column matrix over all query rows. No history.
pub struct SwipeMatrix<'a, S: ScoreLane> {
    hgap: &'a mut [ScoreVector<S>],
    score: &'a mut [ScoreVector<S>],
}

impl<'a, S: ScoreLane> SwipeMatrix<'a, S> {
    pub fn new(ws: &'a mut DpWorkspace<S>, rows: usize) -> Self {
        let (hgap, score) = ws.buffers(rows, rows + 1);
        hgap.fill(ScoreVector::zero());
        score.fill(ScoreVector::zero());
        Self { hgap, score }
    }

    pub fn rows(&self) -> usize {
        self.hgap.len()
    }

    pub fn begin(&mut self) -> SwipeColumn<'_, S> {
        SwipeColumn { hgap: &mut *self.hgap, score: &mut *self.score, row: 0 }
    }

    /// Reset one lane to the empty boundary, for loading the next target.
    pub fn set_zero(&mut self, lane: usize) {
        clear_lane(self.hgap, lane);
        clear_lane(self.score, lane);
    }
}

/// Column cursor of [`SwipeMatrix`].
///
/// `diag()` at row `r` is the previous column's score at row `r - 1`: the
/// caller writes the score of row `r - 1` at row `r`, one step behind the
/// read, and writes the last row's score after the final `advance()`.
pub struct SwipeColumn<'m, S: ScoreLane> {
    hgap: &'m mut [ScoreVector<S>],
    score: &'m mut [ScoreVector<S>],
    row: usize,
}

impl<S: ScoreLane> SwipeColumn<'_, S> {
    #[inline(always)]
    pub fn hgap(&self) -> ScoreVector<S> {
        self.hgap[self.row]
    }

    #[inline(always)]
    pub fn diag(&self) -> ScoreVector<S> {
        self.score[self.row]
    }

    #[inline(always)]
    pub fn set_hgap(&mut self, x: ScoreVector<S>) {
        self.hgap[self.row] = x;
    }

    #[inline(always)]
    pub fn set_score(&mut self, x: ScoreVector<S>) {
        self.score[self.row] = x;
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.row += 1;
    }
}

// ----------------------------------------------------------------------------
// Banded matrix
// ----------------------------------------------------------------------------

/// Rolling single-column matrix over a diagonal band.
pub struct BandedSwipeMatrix<'a, S: ScoreLane> {
    hgap: &'a mut [ScoreVector<S>],
    score: &'a mut [ScoreVector<S>],
    band: usize,
}

impl<'a, S: ScoreLane> BandedSwipeMatrix<'a, S> {
    pub fn new(ws: &'a mut DpWorkspace<S>, band: usize) -> Self {
        assert!(band > 0, "band must be positive");
        let (hgap, score) = ws.buffers(band + 1, band);
        hgap.fill(ScoreVector::zero());
        score.fill(ScoreVector::zero());
        Self { hgap, score, band }
    }

    pub fn band(&self) -> usize {
        self.band
    }

    /// Cursor starting at row `offset`; rows above it are left untouched.
    pub fn begin(&mut self, offset: usize) -> BandedColumn<'_, S> {
        debug_assert!(offset <= self.band);
        BandedColumn { hgap: &mut *self.hgap, score: &mut *self.score, row: offset }
    }
}

pub struct BandedColumn<'m, S: ScoreLane> {
    hgap: &'m mut [ScoreVector<S>],
    score: &'m mut [ScoreVector<S>],
    row: usize,
}

impl<S: ScoreLane> BandedColumn<'_, S> {
    #[inline(always)]
    pub fn hgap(&self) -> ScoreVector<S> {
        self.hgap[self.row + 1]
    }

    #[inline(always)]
    pub fn diag(&self) -> ScoreVector<S> {
        self.score[self.row]
    }

    #[inline(always)]
    pub fn set_hgap(&mut self, x: ScoreVector<S>) {
        self.hgap[self.row] = x;
    }

    #[inline(always)]
    pub fn set_score(&mut self, x: ScoreVector<S>) {
        self.score[self.row] = x;
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.row += 1;
    }
}

// ----------------------------------------------------------------------------
// Banded traceback matrix
// ----------------------------------------------------------------------------

/// Banded matrix that keeps every column for traceback.
pub struct BandedTracebackMatrix<'a, S: ScoreLane> {
    hgap: &'a mut [ScoreVector<S>],
    score: &'a mut [ScoreVector<S>],
    band: usize,
    cols: usize,
}

impl<'a, S: ScoreLane> BandedTracebackMatrix<'a, S> {
    pub fn new(ws: &'a mut DpWorkspace<S>, band: usize, cols: usize) -> Self {
        assert!(band > 0, "band must be positive");
        let (hgap, score) = ws.buffers((band + 1) * (cols + 1), band * (cols + 1));
        score[..band].fill(ScoreVector::zero());
        hgap[..band + 1].fill(ScoreVector::zero());
        for col in 1..=cols {
            hgap[banded_hgap_index(band, col, band)] = ScoreVector::zero();
        }
        Self { hgap, score, band, cols }
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cursor for DP column `col`, starting at row `offset`.
    pub fn begin(&mut self, offset: usize, col: usize) -> TracebackColumn<'_, S> {
        assert!(col < self.cols, "column {col} of {}", self.cols);
        debug_assert!(offset <= self.band);
        let band = self.band;
        let (h_prev, h_cur) = self.hgap.split_at_mut((col + 1) * (band + 1));
        let (s_prev, s_cur) = self.score.split_at_mut((col + 1) * band);
        TracebackColumn {
            prev_hgap: &h_prev[col * (band + 1)..],
            prev_score: &s_prev[col * band..],
            hgap: &mut h_cur[..band + 1],
            score: &mut s_cur[..band],
            row: offset,
        }
    }

    /// Score of DP cell (`col`, `row`) in `lane`.
    #[inline]
    pub fn score(&self, col: usize, row: usize, lane: usize) -> i32 {
        self.score[banded_score_index(self.band, col + 1, row)].get(lane).to_i32()
    }

    /// Horizontal-gap state stored for DP cell (`col`, `row`) in `lane`.
    #[inline]
    pub fn hgap(&self, col: usize, row: usize, lane: usize) -> i32 {
        self.hgap[banded_hgap_index(self.band, col + 1, row)].get(lane).to_i32()
    }

    /// First row in `rows` of DP column `col` holding `score` in `lane`.
    ///
    /// Ties resolve to the lowest row (scan order).
    pub fn find_cell(&self, col: usize, lane: usize, score: i32, rows: Range<usize>) -> Result<usize, DpError> {
        let start = banded_score_index(self.band, col + 1, 0);
        scan_column(&self.score[start..start + self.band], rows, lane, score, col)
    }
}

pub struct TracebackColumn<'m, S: ScoreLane> {
    prev_hgap: &'m [ScoreVector<S>],
    prev_score: &'m [ScoreVector<S>],
    hgap: &'m mut [ScoreVector<S>],
    score: &'m mut [ScoreVector<S>],
    row: usize,
}

impl<S: ScoreLane> TracebackColumn<'_, S> {
    #[inline(always)]
    pub fn hgap(&self) -> ScoreVector<S> {
        self.prev_hgap[self.row + 1]
    }

    #[inline(always)]
    pub fn diag(&self) -> ScoreVector<S> {
        self.prev_score[self.row]
    }

    #[inline(always)]
    pub fn set_hgap(&mut self, x: ScoreVector<S>) {
        self.hgap[self.row] = x;
    }

    #[inline(always)]
    pub fn set_score(&mut self, x: ScoreVector<S>) {
        self.score[self.row] = x;
    }

    /// Zero the score row just above the write cursor; the next column's
    /// first diagonal read lands there.
    pub fn set_zero(&mut self) {
        if self.row > 0 {
            self.score[self.row - 1] = ScoreVector::zero();
        }
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.row += 1;
    }
}

// ----------------------------------------------------------------------------
// Three-frame banded traceback matrix
// ----------------------------------------------------------------------------

/// Banded traceback matrix over nucleotide rows for translated alignment.
///
/// Row `r` of a column and row `r` of the next column are three nucleotides
/// apart on the query, so the previous column supplies three diagonal
/// predecessors: row `r` (same frame), row `r - 1` (one extra nucleotide,
/// forward shift) and row `r + 1` (one nucleotide short, reverse shift).
pub struct Banded3FrameTracebackMatrix<'a, S: ScoreLane> {
    hgap: &'a mut [ScoreVector<S>],
    score: &'a mut [ScoreVector<S>],
    band: usize,
    cols: usize,
}

impl<'a, S: ScoreLane> Banded3FrameTracebackMatrix<'a, S> {
    pub fn new(ws: &'a mut DpWorkspace<S>, band: usize, cols: usize) -> Self {
        assert!(band > 0, "band must be positive");
        let (hgap, score) = ws.buffers((band + 3) * (cols + 1), (band + 1) * (cols + 1));
        score[..band + 1].fill(ScoreVector::zero());
        hgap[..band + 3].fill(ScoreVector::zero());
        for col in 1..=cols {
            score[frame_score_index(band, col, band)] = ScoreVector::zero();
            for row in band..band + 3 {
                hgap[frame_hgap_index(band, col, row)] = ScoreVector::zero();
            }
        }
        Self { hgap, score, band, cols }
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn begin(&mut self, offset: usize, col: usize) -> FrameColumn<'_, S> {
        assert!(col < self.cols, "column {col} of {}", self.cols);
        debug_assert!(offset < self.band);
        let band = self.band;
        let (h_prev, h_cur) = self.hgap.split_at_mut((col + 1) * (band + 3));
        let (s_prev, s_cur) = self.score.split_at_mut((col + 1) * (band + 1));
        let prev_score = &s_prev[col * (band + 1)..];
        FrameColumn {
            prev_hgap: &h_prev[col * (band + 3)..],
            prev_score,
            hgap: &mut h_cur[..band + 3],
            score: &mut s_cur[..band + 1],
            row: offset,
            band,
            sm4: ScoreVector::zero(),
            sm3: prev_score[offset],
            sm2: prev_score[offset + 1],
        }
    }

    #[inline]
    pub fn score(&self, col: usize, row: usize, lane: usize) -> i32 {
        self.score[frame_score_index(self.band, col + 1, row)].get(lane).to_i32()
    }

    #[inline]
    pub fn hgap(&self, col: usize, row: usize, lane: usize) -> i32 {
        self.hgap[frame_hgap_index(self.band, col + 1, row)].get(lane).to_i32()
    }

    /// First row in `rows` of DP column `col` holding `score` in `lane`.
    pub fn find_cell(&self, col: usize, lane: usize, score: i32, rows: Range<usize>) -> Result<usize, DpError> {
        let start = frame_score_index(self.band, col + 1, 0);
        scan_column(&self.score[start..start + self.band], rows, lane, score, col)
    }
}

pub struct FrameColumn<'m, S: ScoreLane> {
    prev_hgap: &'m [ScoreVector<S>],
    prev_score: &'m [ScoreVector<S>],
    hgap: &'m mut [ScoreVector<S>],
    score: &'m mut [ScoreVector<S>],
    row: usize,
    band: usize,
    sm4: ScoreVector<S>,
    sm3: ScoreVector<S>,
    sm2: ScoreVector<S>,
}

impl<S: ScoreLane> FrameColumn<'_, S> {
    #[inline(always)]
    pub fn hgap(&self) -> ScoreVector<S> {
        self.prev_hgap[self.row + 3]
    }

    /// Same-frame diagonal predecessor (three nucleotides back).
    #[inline(always)]
    pub fn sm3(&self) -> ScoreVector<S> {
        self.sm3
    }

    /// Forward-shift predecessor (four nucleotides back).
    #[inline(always)]
    pub fn sm4(&self) -> ScoreVector<S> {
        self.sm4
    }

    /// Reverse-shift predecessor (two nucleotides back).
    #[inline(always)]
    pub fn sm2(&self) -> ScoreVector<S> {
        self.sm2
    }

    #[inline(always)]
    pub fn set_hgap(&mut self, x: ScoreVector<S>) {
        self.hgap[self.row] = x;
    }

    #[inline(always)]
    pub fn set_score(&mut self, x: ScoreVector<S>) {
        self.score[self.row] = x;
    }

    /// Zero the three score rows above the write cursor; the next column
    /// starts up to three rows higher.
    pub fn set_zero(&mut self) {
        let lo = self.row.saturating_sub(3);
        self.score[lo..self.row].fill(ScoreVector::zero());
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.row += 1;
        self.sm4 = self.sm3;
        self.sm3 = self.sm2;
        self.sm2 = if self.row < self.band { self.prev_score[self.row + 1] } else { ScoreVector::zero() };
    }
}
