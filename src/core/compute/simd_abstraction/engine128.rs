//! 128-bit lane implementations (SSE2 on x86_64, NEON on aarch64)
//!
//! Both instruction sets are part of their target's baseline, so the
//! intrinsics are always safe to execute and the `unsafe` blocks below only
//! cover the intrinsic call convention and the unaligned loads/stores from
//! fixed-size lane arrays.
//!
//! SSE2 has no signed 8-bit max (`pmaxsb` is SSE4.1); it is emulated with a
//! compare and blend.

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use super::types::{simd_arch, RegI16, RegI8, RegU8};
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use super::{ScoreLane, MAX_LANES};

#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::*;
    use simd_arch::*;

    impl ScoreLane for u8 {
        lane_scalars!(u8, 16, false);
        type Vector = RegU8;

        #[inline]
        fn splat(value: u8) -> RegU8 {
            unsafe { _mm_set1_epi8(value as i8) }
        }

        #[inline]
        fn adds(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { _mm_adds_epu8(a, b) }
        }

        #[inline]
        fn subs(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { _mm_subs_epu8(a, b) }
        }

        #[inline]
        fn max(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { _mm_max_epu8(a, b) }
        }

        #[inline]
        fn load(lanes: &[u8; MAX_LANES]) -> RegU8 {
            unsafe { _mm_loadu_si128(lanes.as_ptr() as *const __m128i) }
        }

        #[inline]
        fn store(v: RegU8) -> [u8; MAX_LANES] {
            let mut out = [0u8; MAX_LANES];
            unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) };
            out
        }
    }

    impl ScoreLane for i8 {
        lane_scalars!(i8, 16, true);
        type Vector = RegI8;

        #[inline]
        fn splat(value: i8) -> RegI8 {
            unsafe { _mm_set1_epi8(value) }
        }

        #[inline]
        fn adds(a: RegI8, b: RegI8) -> RegI8 {
            unsafe { _mm_adds_epi8(a, b) }
        }

        #[inline]
        fn subs(a: RegI8, b: RegI8) -> RegI8 {
            unsafe { _mm_subs_epi8(a, b) }
        }

        #[inline]
        fn max(a: RegI8, b: RegI8) -> RegI8 {
            unsafe {
                let gt = _mm_cmpgt_epi8(a, b);
                _mm_or_si128(_mm_and_si128(gt, a), _mm_andnot_si128(gt, b))
            }
        }

        #[inline]
        fn load(lanes: &[i8; MAX_LANES]) -> RegI8 {
            unsafe { _mm_loadu_si128(lanes.as_ptr() as *const __m128i) }
        }

        #[inline]
        fn store(v: RegI8) -> [i8; MAX_LANES] {
            let mut out = [0i8; MAX_LANES];
            unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) };
            out
        }
    }

    impl ScoreLane for i16 {
        lane_scalars!(i16, 8, true);
        type Vector = RegI16;

        #[inline]
        fn splat(value: i16) -> RegI16 {
            unsafe { _mm_set1_epi16(value) }
        }

        #[inline]
        fn adds(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { _mm_adds_epi16(a, b) }
        }

        #[inline]
        fn subs(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { _mm_subs_epi16(a, b) }
        }

        #[inline]
        fn max(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { _mm_max_epi16(a, b) }
        }

        #[inline]
        fn load(lanes: &[i16; MAX_LANES]) -> RegI16 {
            // 8 x i16 = the first 16 bytes of the array
            unsafe { _mm_loadu_si128(lanes.as_ptr() as *const __m128i) }
        }

        #[inline]
        fn store(v: RegI16) -> [i16; MAX_LANES] {
            let mut out = [0i16; MAX_LANES];
            unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) };
            out
        }
    }
}

#[cfg(target_arch = "aarch64")]
mod neon {
    use super::*;
    use simd_arch::*;

    impl ScoreLane for u8 {
        lane_scalars!(u8, 16, false);
        type Vector = RegU8;

        #[inline]
        fn splat(value: u8) -> RegU8 {
            unsafe { vdupq_n_u8(value) }
        }

        #[inline]
        fn adds(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { vqaddq_u8(a, b) }
        }

        #[inline]
        fn subs(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { vqsubq_u8(a, b) }
        }

        #[inline]
        fn max(a: RegU8, b: RegU8) -> RegU8 {
            unsafe { vmaxq_u8(a, b) }
        }

        #[inline]
        fn load(lanes: &[u8; MAX_LANES]) -> RegU8 {
            unsafe { vld1q_u8(lanes.as_ptr()) }
        }

        #[inline]
        fn store(v: RegU8) -> [u8; MAX_LANES] {
            let mut out = [0u8; MAX_LANES];
            unsafe { vst1q_u8(out.as_mut_ptr(), v) };
            out
        }
    }

    impl ScoreLane for i8 {
        lane_scalars!(i8, 16, true);
        type Vector = RegI8;

        #[inline]
        fn splat(value: i8) -> RegI8 {
            unsafe { vdupq_n_s8(value) }
        }

        #[inline]
        fn adds(a: RegI8, b: RegI8) -> RegI8 {
            unsafe { vqaddq_s8(a, b) }
        }

        #[inline]
        fn subs(a: RegI8, b: RegI8) -> RegI8 {
            unsafe { vqsubq_s8(a, b) }
        }

        #[inline]
        fn max(a: RegI8, b: RegI8) -> RegI8 {
            unsafe { vmaxq_s8(a, b) }
        }

        #[inline]
        fn load(lanes: &[i8; MAX_LANES]) -> RegI8 {
            unsafe { vld1q_s8(lanes.as_ptr()) }
        }

        #[inline]
        fn store(v: RegI8) -> [i8; MAX_LANES] {
            let mut out = [0i8; MAX_LANES];
            unsafe { vst1q_s8(out.as_mut_ptr(), v) };
            out
        }
    }

    impl ScoreLane for i16 {
        lane_scalars!(i16, 8, true);
        type Vector = RegI16;

        #[inline]
        fn splat(value: i16) -> RegI16 {
            unsafe { vdupq_n_s16(value) }
        }

        #[inline]
        fn adds(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { vqaddq_s16(a, b) }
        }

        #[inline]
        fn subs(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { vqsubq_s16(a, b) }
        }

        #[inline]
        fn max(a: RegI16, b: RegI16) -> RegI16 {
            unsafe { vmaxq_s16(a, b) }
        }

        #[inline]
        fn load(lanes: &[i16; MAX_LANES]) -> RegI16 {
            unsafe { vld1q_s16(lanes.as_ptr()) }
        }

        #[inline]
        fn store(v: RegI16) -> [i16; MAX_LANES] {
            let mut out = [0i16; MAX_LANES];
            unsafe { vst1q_s16(out.as_mut_ptr(), v) };
            out
        }
    }
}
