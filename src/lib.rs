//! Vectorized affine-gap local alignment (SWIPE) and open-addressing seed
//! tables.
//!
//! Kernels are generic over the lane kind ([`ScoreLane`]): 16 x `u8`,
//! 16 x `i8` or 8 x `i16` scores per 128-bit register. Each lane aligns the
//! query against a different target.

pub mod core;
pub mod defaults;
pub mod error;

pub use crate::core::alignment::banded_swipe::{banded_swipe, banded_swipe_traceback, DpTarget};
pub use crate::core::alignment::frameshift::{banded_3frame_swipe, banded_3frame_swipe_traceback};
pub use crate::core::alignment::parallel::{par_banded_traceback, par_swipe};
pub use crate::core::alignment::scoring::{GapPenalties, ScoreMatrix, Scoring};
pub use crate::core::alignment::swipe::{swipe, swipe_adaptive};
pub use crate::core::alignment::transcript::{EditOp, Hsp, Transcript};
pub use crate::core::alignment::workspace::{DpContext, DpWorkspace};
pub use crate::core::compute::encoding::{encode_protein, TranslatedQuery};
pub use crate::core::compute::simd_abstraction::ScoreLane;
pub use crate::core::index::{FingerprintTable, KmerCounter, OpenAddressingTable};
pub use crate::error::{DpError, Error, IndexError, Result};
