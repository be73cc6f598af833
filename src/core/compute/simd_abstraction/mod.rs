//! SIMD abstraction layer
//!
//! The DP kernels are written once, generically over a *lane kind*: the element
//! type stored in each lane of a 128-bit score register. `ScoreLane` binds that
//! element type to its packed register type and to the handful of saturating
//! operations the affine-gap recurrence needs.
//!
//! ## Lane kinds and widths
//!
//! | kind  | lanes | signed | typical use                                  |
//! |-------|-------|--------|----------------------------------------------|
//! | `u8`  | 16    | no     | first pass, scores shifted by the matrix bias |
//! | `i8`  | 16    | yes    | short alignments without bias bookkeeping     |
//! | `i16` | 8     | yes    | rescoring saturated lanes, traceback passes   |
//!
//! ## Backends
//!
//! - x86_64: SSE2 (part of the x86_64 baseline, so no runtime detection).
//! - aarch64: NEON (always present on aarch64).
//! - anything else: lane arrays with scalar saturating arithmetic.
//!
//! All backends give bit-identical results; the kernels above this layer never
//! see which one is active.

/// Scalar constants and conversions shared by every backend's impl.
macro_rules! lane_scalars {
    ($t:ty, $lanes:expr, $signed:expr) => {
        const LANES: usize = $lanes;
        const BITS: u32 = <$t>::BITS;
        const SIGNED: bool = $signed;
        const MIN: $t = <$t>::MIN;
        const MAX: $t = <$t>::MAX;
        const ZERO: $t = 0;

        #[inline]
        fn saturate(value: i32) -> $t {
            value.clamp(<$t>::MIN as i32, <$t>::MAX as i32) as $t
        }

        #[inline]
        fn to_i32(self) -> i32 {
            self as i32
        }
    };
}

pub mod engine128;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub mod portable;
pub mod simd;
pub mod types;

use std::fmt::Debug;

/// Upper bound on lanes for any lane kind (16 x 8-bit in 128 bits).
pub const MAX_LANES: usize = 16;

/// Element type of one lane in a packed 128-bit score register.
///
/// Every arithmetic operation saturates at `MIN`/`MAX` instead of wrapping.
pub trait ScoreLane: Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Number of lanes in one register.
    const LANES: usize;
    /// Element width in bits.
    const BITS: u32;
    const SIGNED: bool;
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    /// Packed register holding `LANES` elements.
    type Vector: Copy;

    /// Clamp an `i32` into the lane range.
    fn saturate(value: i32) -> Self;
    fn to_i32(self) -> i32;

    fn splat(value: Self) -> Self::Vector;
    fn adds(a: Self::Vector, b: Self::Vector) -> Self::Vector;
    fn subs(a: Self::Vector, b: Self::Vector) -> Self::Vector;
    fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector;
    fn cmpeq_all(a: Self::Vector, b: Self::Vector) -> bool {
        Self::store(a)[..Self::LANES] == Self::store(b)[..Self::LANES]
    }

    /// Load the first `LANES` elements of `lanes`.
    fn load(lanes: &[Self; MAX_LANES]) -> Self::Vector;
    /// Store into the first `LANES` elements; the rest are zero.
    fn store(v: Self::Vector) -> [Self; MAX_LANES];
}
