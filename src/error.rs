//! Error types.
//!
//! The recurrence and the matrix iterators never fail; errors surface at
//! structure boundaries: table probes that wrap without resolving, and
//! traceback passes that cannot find the cell they were asked for.

use thiserror::Error;

/// Failures of the open-addressing tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Probing wrapped the whole table without finding the key or an empty
    /// slot. The caller must rebuild with a larger capacity.
    #[error("hash table overflow (capacity {capacity})")]
    Overflow { capacity: usize },

    /// The value reserved as the empty marker cannot be stored.
    #[error("cannot store the reserved empty value")]
    EmptyValue,
}

/// Internal-consistency failures of the DP layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DpError {
    /// No cell in the requested column holds the requested score.
    #[error("traceback error: score {score} not found in column {column} for lane {lane}")]
    TracebackNotFound { column: usize, lane: usize, score: i32 },

    /// A cell's score cannot be explained by any predecessor.
    #[error("traceback error: no predecessor explains score {score} at query {query_pos}, target {target_pos}")]
    TracebackInconsistent { query_pos: usize, target_pos: usize, score: i32 },

    /// A lane saturated; the target has to be rerun with wider lanes.
    #[error("score overflow for target {target} with {bits}-bit lanes")]
    ScoreOverflow { target: usize, bits: u32 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Dp(#[from] DpError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = IndexError::Overflow { capacity: 4 };
        assert_eq!(e.to_string(), "hash table overflow (capacity 4)");
        let e: Error = DpError::TracebackNotFound { column: 3, lane: 1, score: 15 }.into();
        assert!(e.to_string().contains("column 3"));
    }
}
