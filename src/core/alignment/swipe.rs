//! Full-matrix SWIPE.
//!
//! Targets stream through the lanes: every lane aligns one target column by
//! column, and when its target runs out the lane is reset and handed the next
//! one. All query rows are computed for every column.

use super::cell_update::{cell_update, cell_update_biased};
use super::gotoh;
use super::matrix::SwipeMatrix;
use super::profile::{LazySwipeProfile, ScoreProfile, SwipeProfile};
use super::scoring::Scoring;
use super::workspace::{DpContext, DpWorkspace};
use crate::core::compute::encoding::DELIMITER;
use crate::core::compute::score_vector::ScoreVector;
use crate::core::compute::simd_abstraction::simd::{preferred_score_width, ScoreWidth};
use crate::core::compute::simd_abstraction::{ScoreLane, MAX_LANES};
use crate::defaults::LAZY_PROFILE_MAX_QUERY_LEN;

/// Local alignment scores of `query` against every target.
///
/// One entry per target, in order. `None` marks a target whose score reached
/// the saturation limit of `S` (see [`ScoreWidth::score_limit`]); rerun it
/// with a wider lane kind. Empty targets score `Some(0)`.
pub fn swipe<S: ScoreLane, T: AsRef<[u8]>>(
    query: &[u8],
    targets: &[T],
    scoring: &Scoring,
    ws: &mut DpWorkspace<S>,
) -> Vec<Option<i32>> {
    let mut results = vec![Some(0); targets.len()];
    if query.is_empty() {
        return results;
    }

    let bias = if S::SIGNED { 0 } else { scoring.matrix.bias() };
    let limit = S::MAX.to_i32() - bias - scoring.matrix.max_score();
    let kernel = Kernel::<S> {
        open: ScoreVector::splat_i32(scoring.gaps.open),
        extend: ScoreVector::splat_i32(scoring.gaps.extend),
        bias: ScoreVector::splat_i32(bias),
    };

    let mut next = 0usize;
    let mut take_next = || {
        while next < targets.len() {
            let t = next;
            next += 1;
            if !targets[t].as_ref().is_empty() {
                return Some(t);
            }
        }
        None
    };

    let mut lane_target: [Option<usize>; MAX_LANES] = [None; MAX_LANES];
    let mut lane_pos = [0usize; MAX_LANES];
    for slot in lane_target.iter_mut().take(S::LANES) {
        *slot = take_next();
    }

    let mut matrix = SwipeMatrix::new(ws, query.len());
    let mut best = ScoreVector::<S>::zero();
    let mut letters = [DELIMITER; MAX_LANES];
    let mut eager = SwipeProfile::<S>::new();
    let mut lazy = LazySwipeProfile::<S>::new(&letters[..S::LANES], &scoring.matrix, bias);
    let use_lazy = query.len() < LAZY_PROFILE_MAX_QUERY_LEN;
    let mut columns = 0usize;

    while lane_target[..S::LANES].iter().any(Option::is_some) {
        for lane in 0..S::LANES {
            letters[lane] = match lane_target[lane] {
                Some(t) => targets[t].as_ref()[lane_pos[lane]],
                None => DELIMITER,
            };
        }
        if use_lazy {
            lazy.reset(&letters[..S::LANES]);
            kernel.column(&mut matrix, query, &mut lazy, &mut best);
        } else {
            eager.set(&letters[..S::LANES], &scoring.matrix, bias);
            kernel.column(&mut matrix, query, &mut eager, &mut best);
        }
        columns += 1;

        for lane in 0..S::LANES {
            let Some(t) = lane_target[lane] else { continue };
            lane_pos[lane] += 1;
            if lane_pos[lane] < targets[t].as_ref().len() {
                continue;
            }
            let score = best.get(lane).to_i32();
            results[t] = if score >= limit { None } else { Some(score) };
            matrix.set_zero(lane);
            best.set(lane, S::ZERO);
            lane_pos[lane] = 0;
            lane_target[lane] = take_next();
        }
    }

    log::debug!(
        "swipe: {} targets x {} query letters, {} columns on {} lanes ({} profile)",
        targets.len(),
        query.len(),
        columns,
        S::LANES,
        if use_lazy { "lazy" } else { "eager" }
    );
    results
}

struct Kernel<S: ScoreLane> {
    open: ScoreVector<S>,
    extend: ScoreVector<S>,
    bias: ScoreVector<S>,
}

impl<S: ScoreLane> Kernel<S> {
    #[inline(always)]
    fn column<P: ScoreProfile<S>>(
        &self,
        matrix: &mut SwipeMatrix<'_, S>,
        query: &[u8],
        profile: &mut P,
        best: &mut ScoreVector<S>,
    ) {
        let mut it = matrix.begin();
        let mut vgap = ScoreVector::zero();
        let mut last = ScoreVector::zero();
        for &q in query {
            let mut hgap = it.hgap();
            let scores = profile.scores(q);
            let cur = if S::SIGNED {
                cell_update(it.diag(), scores, self.extend, self.open, &mut hgap, &mut vgap, best)
            } else {
                cell_update_biased(it.diag(), scores, self.bias, self.extend, self.open, &mut hgap, &mut vgap, best)
            };
            it.set_hgap(hgap);
            it.set_score(last);
            last = cur;
            it.advance();
        }
        it.set_score(last);
    }
}

/// Exact local scores with the narrowest lanes that hold them.
///
/// Targets go through 16 x u8 lanes first (unless
/// [`preferred_score_width`] says otherwise); those that saturate are rerun
/// with 8 x i16 lanes, and any that saturate again are scored by the scalar
/// [`gotoh::local_score`].
pub fn swipe_adaptive<T: AsRef<[u8]>>(query: &[u8], targets: &[T], scoring: &Scoring, ctx: &mut DpContext) -> Vec<i32> {
    let mut scores = vec![0; targets.len()];
    let mut pending: Vec<usize> = (0..targets.len()).collect();

    if preferred_score_width() == ScoreWidth::U8 {
        pending.clear();
        for (i, r) in swipe(query, targets, scoring, &mut ctx.narrow).into_iter().enumerate() {
            match r {
                Some(s) => scores[i] = s,
                None => pending.push(i),
            }
        }
        if !pending.is_empty() {
            log::debug!("{} of {} targets saturated 8-bit lanes, rescoring with 16-bit", pending.len(), targets.len());
        }
    }

    if pending.is_empty() {
        return scores;
    }
    let subset: Vec<&[u8]> = pending.iter().map(|&i| targets[i].as_ref()).collect();
    for (k, r) in swipe(query, &subset, scoring, &mut ctx.wide).into_iter().enumerate() {
        let i = pending[k];
        scores[i] = match r {
            Some(s) => s,
            None => {
                log::warn!("target {i} saturated 16-bit lanes, falling back to scalar alignment");
                gotoh::local_score(query, subset[k], scoring)
            }
        };
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::scoring::ScoreMatrix;
    use crate::core::compute::encoding::encode_protein;

    fn encode_all(seqs: &[&[u8]]) -> Vec<Vec<u8>> {
        seqs.iter().map(|s| encode_protein(s)).collect()
    }

    #[test]
    fn test_identity_scores() {
        let s = Scoring::new(ScoreMatrix::identity(5, -4), Default::default()).with_gaps(10, 1);
        let q = encode_protein(b"MKT");
        let targets = encode_all(&[b"MKT", b"AAMKTAA", b"WWW", b""]);
        let mut ws = DpWorkspace::<i16>::new();
        assert_eq!(swipe(&q, &targets, &s, &mut ws), vec![Some(15), Some(15), Some(0), Some(0)]);
    }

    #[test]
    fn test_lane_refill_matches_gotoh() {
        let s = Scoring::default();
        let q = encode_protein(b"MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ");
        // more targets than lanes, with uneven lengths
        let raw: Vec<&[u8]> = vec![
            b"MKTAYIAKQ", b"QISFVKSHFSRQ", b"LEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQ", b"W", b"KSHF",
            b"MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ", b"GGGGGGGG", b"PPPPMKTAYPPPP", b"AKQRQISF", b"SRQLEER",
            b"VQVKVKALPD", b"TAYIAKQRQISFVKSHFSRQLEERLGLIEVQ", b"HFSRQLE", b"MKT",
        ];
        let targets = encode_all(&raw);
        let mut ws = DpWorkspace::<i16>::new();
        let got = swipe(&q, &targets, &s, &mut ws);
        for (t, g) in targets.iter().zip(got) {
            assert_eq!(g, Some(gotoh::local_score(&q, t, &s)));
        }
        let mut ws8 = DpWorkspace::<i8>::new();
        let got = swipe(&q, &targets, &s, &mut ws8);
        for (t, g) in targets.iter().zip(got) {
            let expected = gotoh::local_score(&q, t, &s);
            assert!(g.is_none() || g == Some(expected), "i8 lane gave {g:?}, expected {expected}");
        }
    }

    #[test]
    fn test_u8_saturation_and_adaptive_rescue() {
        let s = Scoring::default();
        let q = encode_protein(&[b'W'; 30]);
        let targets = encode_all(&[&[b'W'; 30], b"WWW"]);
        let mut ws = DpWorkspace::<u8>::new();
        assert_eq!(swipe(&q, &targets, &s, &mut ws), vec![None, Some(33)]);

        let mut ctx = DpContext::new();
        assert_eq!(swipe_adaptive(&q, &targets, &s, &mut ctx), vec![330, 33]);
    }

    #[test]
    fn test_empty_query() {
        let s = Scoring::default();
        let targets = encode_all(&[b"MKT"]);
        let mut ws = DpWorkspace::<u8>::new();
        assert_eq!(swipe::<u8, _>(&[], &targets, &s, &mut ws), vec![Some(0)]);
    }
}
