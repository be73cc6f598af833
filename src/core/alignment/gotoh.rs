//! Scalar Gotoh local alignment.
//!
//! Textbook O(n*m) affine-gap Smith-Waterman with `i32` scores. It is the
//! reference the vector kernels are tested against, and the last resort of
//! adaptive alignment for targets that saturate even 16-bit lanes.

use super::scoring::Scoring;

const NEG_INF: i32 = i32::MIN / 2;

/// Best local alignment score of `query` against `target`.
pub fn local_score(query: &[u8], target: &[u8], scoring: &Scoring) -> i32 {
    let (open, ext) = (scoring.gaps.open, scoring.gaps.extend);
    let n = target.len();
    // h[j] = H(i-1, j) before the row update, H(i, j) after
    let mut h = vec![0i32; n + 1];
    let mut e = vec![NEG_INF; n + 1];
    let mut best = 0;

    for &q in query {
        let mut diag = 0;
        let mut f = NEG_INF;
        let mut left = 0;
        for j in 1..=n {
            e[j] = (e[j] - ext).max(h[j] - open);
            f = (f - ext).max(left - open);
            let cur = (diag + scoring.matrix.score(q, target[j - 1])).max(e[j]).max(f).max(0);
            diag = h[j];
            h[j] = cur;
            left = cur;
            best = best.max(cur);
        }
    }
    best
}
