//! SIMD type aliases and architecture bindings
//!
//! `simd_arch` re-exports the intrinsics module of the current target so the
//! lane implementations can refer to one path on x86_64 and aarch64. The
//! register aliases name the native 128-bit type used for each lane kind.

#[cfg(target_arch = "x86_64")]
pub use std::arch::x86_64 as simd_arch;

#[cfg(target_arch = "aarch64")]
pub use std::arch::aarch64 as simd_arch;

/// 16 x u8 register.
#[cfg(target_arch = "x86_64")]
pub type RegU8 = simd_arch::__m128i;
/// 16 x i8 register.
#[cfg(target_arch = "x86_64")]
pub type RegI8 = simd_arch::__m128i;
/// 8 x i16 register.
#[cfg(target_arch = "x86_64")]
pub type RegI16 = simd_arch::__m128i;

#[cfg(target_arch = "aarch64")]
pub type RegU8 = simd_arch::uint8x16_t;
#[cfg(target_arch = "aarch64")]
pub type RegI8 = simd_arch::int8x16_t;
#[cfg(target_arch = "aarch64")]
pub type RegI16 = simd_arch::int16x8_t;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type RegU8 = [u8; 16];
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type RegI8 = [i8; 16];
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type RegI16 = [i16; 8];
