//! Multi-threaded drivers over rayon's global pool.
//!
//! Targets are split into chunks of [`TARGETS_PER_TASK`]; each rayon worker
//! builds one [`DpContext`] and reuses it for every chunk it picks up.

use rayon::prelude::*;
use std::time::Instant;

use super::banded_swipe::{banded_swipe_traceback, DpTarget};
use super::scoring::Scoring;
use super::swipe::swipe_adaptive;
use super::transcript::Hsp;
use super::workspace::DpContext;
use crate::defaults::TARGETS_PER_TASK;
use crate::error::DpError;

/// [`swipe_adaptive`] over all targets, in parallel. Output order matches
/// `targets`.
pub fn par_swipe<T: AsRef<[u8]> + Sync>(query: &[u8], targets: &[T], scoring: &Scoring) -> Vec<i32> {
    let start = Instant::now();
    let scores: Vec<i32> = targets
        .par_chunks(TARGETS_PER_TASK)
        .map_init(DpContext::new, |ctx, chunk| swipe_adaptive(query, chunk, scoring, ctx))
        .collect::<Vec<_>>()
        .concat();
    log::debug!(
        "par_swipe: {} targets in {:.3}s on {} threads",
        targets.len(),
        start.elapsed().as_secs_f64(),
        rayon::current_num_threads()
    );
    scores
}

/// [`banded_swipe_traceback`] with 16-bit lanes over all targets, in
/// parallel. HSP target indices refer to `targets`.
pub fn par_banded_traceback(query: &[u8], targets: &[DpTarget<'_>], scoring: &Scoring) -> Result<Vec<Hsp>, DpError> {
    let chunks: Vec<Vec<Hsp>> = targets
        .par_chunks(TARGETS_PER_TASK)
        .enumerate()
        .map_init(DpContext::new, |ctx, (k, chunk)| {
            let mut out = Vec::new();
            banded_swipe_traceback(query, chunk, scoring, &mut ctx.wide, &mut out).map_err(|e| match e {
                DpError::ScoreOverflow { target, bits } => {
                    DpError::ScoreOverflow { target: target + k * TARGETS_PER_TASK, bits }
                }
                other => other,
            })?;
            for hsp in &mut out {
                hsp.target += k * TARGETS_PER_TASK;
            }
            Ok::<_, DpError>(out)
        })
        .collect::<Result<_, DpError>>()?;
    Ok(chunks.concat())
}
