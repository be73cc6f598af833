//! Alignment transcripts and HSP records.
//!
//! A [`Transcript`] is the run-length encoded path a traceback walks, stored in
//! forward (query start to query end) order. Frame-shift operations only occur
//! in translated alignments; they consume one extra (`/`) or one fewer (`\`)
//! query nucleotide than a codon.

use std::fmt::{self, Write};

/// Edit operation with its transcript character as discriminant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EditOp {
    Match = b'=',
    Mismatch = b'X',
    /// Query letter aligned to a gap in the target
    Insertion = b'I',
    /// Target letter aligned to a gap in the query
    Deletion = b'D',
    /// One query nucleotide skipped before the next codon
    FrameShiftForward = b'/',
    /// Next codon starts one nucleotide early
    FrameShiftReverse = b'\\',
}

impl EditOp {
    #[inline(always)]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'=' => Some(Self::Match),
            b'X' => Some(Self::Mismatch),
            b'I' => Some(Self::Insertion),
            b'D' => Some(Self::Deletion),
            b'/' => Some(Self::FrameShiftForward),
            b'\\' => Some(Self::FrameShiftReverse),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Consumes a query letter (an amino acid, or a codon when translated).
    #[inline(always)]
    pub const fn consumes_query(self) -> bool {
        matches!(self, Self::Match | Self::Mismatch | Self::Insertion)
    }

    #[inline(always)]
    pub const fn consumes_target(self) -> bool {
        matches!(self, Self::Match | Self::Mismatch | Self::Deletion)
    }

    #[inline(always)]
    pub const fn is_frame_shift(self) -> bool {
        matches!(self, Self::FrameShiftForward | Self::FrameShiftReverse)
    }
}

/// Run-length encoded edit path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    ops: Vec<(EditOp, u32)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` copies of `op`, merging with the last run.
    pub fn push(&mut self, op: EditOp, count: u32) {
        if count == 0 {
            return;
        }
        match self.ops.last_mut() {
            Some((last, n)) if *last == op => *n += count,
            _ => self.ops.push((op, count)),
        }
    }

    /// Traceback emits operations end-first; call once when done.
    pub fn reverse(&mut self) {
        self.ops.reverse();
    }

    pub fn ops(&self) -> &[(EditOp, u32)] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of columns in the alignment (frame shifts excluded).
    pub fn length(&self) -> u32 {
        self.ops.iter().filter(|(op, _)| !op.is_frame_shift()).map(|&(_, n)| n).sum()
    }

    pub fn count(&self, op: EditOp) -> u32 {
        self.ops.iter().filter(|(o, _)| *o == op).map(|&(_, n)| n).sum()
    }

    pub fn identities(&self) -> u32 {
        self.count(EditOp::Match)
    }

    pub fn mismatches(&self) -> u32 {
        self.count(EditOp::Mismatch)
    }

    /// Number of gap openings (runs of insertions or deletions).
    pub fn gap_openings(&self) -> u32 {
        self.ops
            .iter()
            .filter(|(op, _)| matches!(op, EditOp::Insertion | EditOp::Deletion))
            .count() as u32
    }

    pub fn contains(&self, op: EditOp) -> bool {
        self.ops.iter().any(|(o, _)| *o == op)
    }
}

impl fmt::Display for Transcript {
    /// CIGAR-style string, e.g. `5=1X2I3=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(op, n) in &self.ops {
            write!(f, "{}", n)?;
            f.write_char(op.to_byte() as char)?;
        }
        Ok(())
    }
}

/// High-scoring pair: one local alignment of the query against a target.
///
/// Ranges are half-open. For translated alignments the query range is in
/// nucleotides and `frame` is `query_range.start % 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hsp {
    /// Index of the target in the batch handed to the kernel
    pub target: usize,
    pub score: i32,
    pub query_range: std::ops::Range<usize>,
    pub target_range: std::ops::Range<usize>,
    pub frame: usize,
    pub transcript: Transcript,
}

impl Hsp {
    /// Fraction of alignment columns that are identities.
    pub fn identity(&self) -> f64 {
        let len = self.transcript.length();
        if len == 0 {
            return 0.0;
        }
        self.transcript.identities() as f64 / len as f64
    }
}
