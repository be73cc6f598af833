//! Per-cell affine-gap (Gotoh) recurrence over packed lanes.
//!
//! Each call advances one DP cell in every lane:
//!
//! ```text
//! current = diag + s                       (minus bias for unsigned lanes)
//! current = max(current, vgap, hgap, 0)
//! best    = max(best, current)
//! vgap    = max(vgap - extend, current - open)
//! hgap    = max(hgap - extend, current - open)
//! ```
//!
//! `vgap` carries the gap running down the current column, `hgap` the gap
//! running across from the previous column; the caller stores `hgap` back into
//! the matrix and passes `current` on as the next diagonal. The zero floor
//! makes the recurrence a local alignment for signed lanes; unsigned lanes get
//! it for free from saturation.

use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::ScoreLane;

/// Plain recurrence for signed lanes.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn cell_update<S: ScoreLane>(
    diagonal_cell: ScoreVector<S>,
    scores: ScoreVector<S>,
    gap_extension: ScoreVector<S>,
    gap_open: ScoreVector<S>,
    horizontal_gap: &mut ScoreVector<S>,
    vertical_gap: &mut ScoreVector<S>,
    best: &mut ScoreVector<S>,
) -> ScoreVector<S> {
    let current = diagonal_cell + scores;
    finish_cell(current, gap_extension, gap_open, horizontal_gap, vertical_gap, best)
}

/// Recurrence for unsigned lanes whose substitution scores carry `bias`.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn cell_update_biased<S: ScoreLane>(
    diagonal_cell: ScoreVector<S>,
    scores: ScoreVector<S>,
    bias: ScoreVector<S>,
    gap_extension: ScoreVector<S>,
    gap_open: ScoreVector<S>,
    horizontal_gap: &mut ScoreVector<S>,
    vertical_gap: &mut ScoreVector<S>,
    best: &mut ScoreVector<S>,
) -> ScoreVector<S> {
    let current = diagonal_cell + scores - bias;
    finish_cell(current, gap_extension, gap_open, horizontal_gap, vertical_gap, best)
}

/// Three-frame recurrence: the diagonal may also come from the two adjacent
/// frames at `frame_shift` cost. `bias` is zero for signed lanes.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn cell_update_frameshift<S: ScoreLane>(
    diagonal_cell: ScoreVector<S>,
    shift_forward_cell: ScoreVector<S>,
    shift_reverse_cell: ScoreVector<S>,
    scores: ScoreVector<S>,
    bias: ScoreVector<S>,
    gap_extension: ScoreVector<S>,
    gap_open: ScoreVector<S>,
    frame_shift: ScoreVector<S>,
    horizontal_gap: &mut ScoreVector<S>,
    vertical_gap: &mut ScoreVector<S>,
    best: &mut ScoreVector<S>,
) -> ScoreVector<S> {
    let mut current = diagonal_cell + scores - bias;
    let forward = shift_forward_cell + scores - bias - frame_shift;
    let reverse = shift_reverse_cell + scores - bias - frame_shift;
    current = current.max(forward).max(reverse);
    finish_cell(current, gap_extension, gap_open, horizontal_gap, vertical_gap, best)
}

#[inline(always)]
fn finish_cell<S: ScoreLane>(
    mut current: ScoreVector<S>,
    gap_extension: ScoreVector<S>,
    gap_open: ScoreVector<S>,
    horizontal_gap: &mut ScoreVector<S>,
    vertical_gap: &mut ScoreVector<S>,
    best: &mut ScoreVector<S>,
) -> ScoreVector<S> {
    current = current.max(*vertical_gap).max(*horizontal_gap).max(ScoreVector::zero());
    *best = best.max(current);
    *vertical_gap -= gap_extension;
    *horizontal_gap -= gap_extension;
    let open = current - gap_open;
    *vertical_gap = vertical_gap.max(open);
    *horizontal_gap = horizontal_gap.max(open);
    current
}
