//! Scalar fallback for targets without a 128-bit SIMD backend.
//!
//! Registers are plain lane arrays; each operation loops over the lanes with
//! the matching `saturating_*` integer method.

use super::types::{RegI16, RegI8, RegU8};
use super::{ScoreLane, MAX_LANES};

macro_rules! portable_lane {
    ($t:ty, $reg:ty, $lanes:expr, $signed:expr) => {
        impl ScoreLane for $t {
            lane_scalars!($t, $lanes, $signed);
            type Vector = $reg;

            #[inline]
            fn splat(value: $t) -> $reg {
                [value; $lanes]
            }

            #[inline]
            fn adds(a: $reg, b: $reg) -> $reg {
                std::array::from_fn(|i| a[i].saturating_add(b[i]))
            }

            #[inline]
            fn subs(a: $reg, b: $reg) -> $reg {
                std::array::from_fn(|i| a[i].saturating_sub(b[i]))
            }

            #[inline]
            fn max(a: $reg, b: $reg) -> $reg {
                std::array::from_fn(|i| a[i].max(b[i]))
            }

            #[inline]
            fn load(lanes: &[$t; MAX_LANES]) -> $reg {
                std::array::from_fn(|i| lanes[i])
            }

            #[inline]
            fn store(v: $reg) -> [$t; MAX_LANES] {
                let mut out = [0 as $t; MAX_LANES];
                out[..$lanes].copy_from_slice(&v);
                out
            }
        }
    };
}

portable_lane!(u8, RegU8, 16, false);
portable_lane!(i8, RegI8, 16, true);
portable_lane!(i16, RegI16, 8, true);
