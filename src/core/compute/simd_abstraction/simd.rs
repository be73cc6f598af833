//! Score width selection.
//!
//! The narrow `u8` kind processes twice as many targets per register as `i16`
//! but saturates early. Drivers pick a starting width here and widen only the
//! targets that saturated.

use super::ScoreLane;

/// Lane kinds the drivers can be instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreWidth {
    /// 16 x u8, bias-shifted scores
    U8,
    /// 16 x i8
    I8,
    /// 8 x i16
    I16,
}

impl ScoreWidth {
    pub fn lanes(self) -> usize {
        match self {
            ScoreWidth::U8 => <u8 as ScoreLane>::LANES,
            ScoreWidth::I8 => <i8 as ScoreLane>::LANES,
            ScoreWidth::I16 => <i16 as ScoreLane>::LANES,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            ScoreWidth::U8 | ScoreWidth::I8 => 8,
            ScoreWidth::I16 => 16,
        }
    }

    /// Largest local score a lane of this kind can hold without saturating,
    /// given the substitution matrix bias and maximum entry.
    pub fn score_limit(self, bias: i32, max_score: i32) -> i32 {
        let max = match self {
            ScoreWidth::U8 => u8::MAX as i32,
            ScoreWidth::I8 => i8::MAX as i32,
            ScoreWidth::I16 => i16::MAX as i32,
        };
        let bias = if self == ScoreWidth::U8 { bias } else { 0 };
        max - bias - max_score
    }

    /// Narrowest width able to hold `expected_score`.
    pub fn for_score(expected_score: i32, bias: i32, max_score: i32) -> Option<ScoreWidth> {
        [ScoreWidth::U8, ScoreWidth::I16]
            .into_iter()
            .find(|w| expected_score < w.score_limit(bias, max_score))
    }
}

/// Returns a human-readable description of the score width
pub fn score_width_description(width: ScoreWidth) -> &'static str {
    match width {
        ScoreWidth::U8 => "u8 (16 lanes, biased)",
        ScoreWidth::I8 => "i8 (16 lanes)",
        ScoreWidth::I16 => "i16 (8 lanes)",
    }
}

/// Width used for the first pass of adaptive alignment.
///
/// Environment variable override for testing/debugging:
/// - `SWIPE_ALIGN_FORCE_WIDE=1`: skip the u8 pass and start at i16
pub fn preferred_score_width() -> ScoreWidth {
    if std::env::var("SWIPE_ALIGN_FORCE_WIDE").map(|v| v == "1").unwrap_or(false) {
        log::info!("SWIPE_ALIGN_FORCE_WIDE=1: starting at {}", score_width_description(ScoreWidth::I16));
        return ScoreWidth::I16;
    }
    ScoreWidth::U8
}
