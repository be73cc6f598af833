//! Alignment kernels.
//!
//! Bottom-up: [`scoring`] and [`profile`] supply substitution vectors,
//! [`cell_update`] advances one cell in every lane, [`matrix`] owns the
//! column state borrowed from a [`workspace`], and the drivers ([`swipe`],
//! [`banded_swipe`], [`frameshift`], [`parallel`]) run whole passes.

pub mod banded_swipe;
pub mod cell_update;
pub mod frameshift;
pub mod gotoh;
pub mod matrix;
pub mod parallel;
pub mod profile;
pub mod scoring;
pub mod swipe;
pub mod transcript;
pub mod workspace;
