//! Core components: packed arithmetic, alignment kernels and index tables.
//!
//! The index tables do not depend on the DP stack; both only share the
//! letter encoding in [`compute::encoding`].

pub mod alignment;
pub mod compute;
pub mod index;
