//! # Residue Encoding
//!
//! All DP kernels operate on small integer letter codes rather than ASCII.
//!
//! ## Protein alphabet
//!
//! ```text
//!   A  R  N  D  C  Q  E  G  H  I  L  K  M  F  P  S  T  W  Y  V  B  Z  X  *
//!   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16 17 18 19 20 21 22 23
//! ```
//!
//! Code `24` is the [`DELIMITER`]: it is never produced by encoding, and marks
//! lanes or rows that lie outside any real sequence. Its substitution score
//! is the lane minimum, so cells on a delimiter never start or extend a
//! diagonal.
//!
//! ## Translated queries
//!
//! Nucleotide queries are aligned as three reading frames at once. A
//! [`TranslatedQuery`] stores the translation of every frame and answers
//! "which amino acid starts at nucleotide `p`" in O(1), which is the access
//! pattern of the three-frame kernel.

/// Letters of the protein alphabet in code order.
pub const AMINO_ACIDS: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

/// Number of real letters.
pub const ALPHABET_SIZE: usize = 24;

/// Padding letter for inactive lanes and out-of-range rows.
pub const DELIMITER: u8 = ALPHABET_SIZE as u8;

/// Real letters plus the delimiter; the size of a residue profile.
pub const PROFILE_LETTERS: usize = ALPHABET_SIZE + 1;

/// Code for `X`, used for anything unrecognised.
pub const UNKNOWN_RESIDUE: u8 = 22;

/// Code for the stop codon `*`.
pub const STOP_RESIDUE: u8 = 23;

static AA_TO_INDEX: [u8; 256] = {
    let mut table = [UNKNOWN_RESIDUE; 256];
    let mut i = 0;
    while i < AMINO_ACIDS.len() {
        let c = AMINO_ACIDS[i];
        table[c as usize] = i as u8;
        table[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    // Selenocysteine and pyrrolysine score like their closest standard residue
    table[b'U' as usize] = 4;
    table[b'u' as usize] = 4;
    table[b'O' as usize] = 11;
    table[b'o' as usize] = 11;
    table
};

/// Encode one ASCII residue.
#[inline(always)]
pub fn encode_residue(c: u8) -> u8 {
    AA_TO_INDEX[c as usize]
}

/// Encode an ASCII protein sequence.
pub fn encode_protein(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&c| encode_residue(c)).collect()
}

/// Decode letter codes back to ASCII; the delimiter prints as `-`.
pub fn decode_protein(letters: &[u8]) -> String {
    letters
        .iter()
        .map(|&l| AMINO_ACIDS.get(l as usize).copied().unwrap_or(b'-') as char)
        .collect()
}

// Standard genetic code, codon index = 16*b1 + 4*b2 + b3 with T=0, C=1, A=2, G=3
const GENETIC_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[inline]
fn nucleotide_tcag(c: u8) -> Option<usize> {
    match c {
        b'T' | b't' | b'U' | b'u' => Some(0),
        b'C' | b'c' => Some(1),
        b'A' | b'a' => Some(2),
        b'G' | b'g' => Some(3),
        _ => None,
    }
}

/// Translate one codon (three ASCII nucleotides) to a letter code.
///
/// Codons containing an ambiguous base translate to `X`.
pub fn translate_codon(codon: &[u8]) -> u8 {
    debug_assert_eq!(codon.len(), 3);
    match (nucleotide_tcag(codon[0]), nucleotide_tcag(codon[1]), nucleotide_tcag(codon[2])) {
        (Some(a), Some(b), Some(c)) => encode_residue(GENETIC_CODE[16 * a + 4 * b + c]),
        _ => UNKNOWN_RESIDUE,
    }
}

/// A nucleotide query translated in its three forward reading frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedQuery {
    frames: [Vec<u8>; 3],
    dna_len: usize,
}

impl TranslatedQuery {
    /// Translate an ASCII nucleotide sequence.
    pub fn translate(dna: &[u8]) -> Self {
        let frames = std::array::from_fn(|f| {
            if dna.len() < f + 3 {
                return Vec::new();
            }
            dna[f..].chunks_exact(3).map(translate_codon).collect()
        });
        Self { frames, dna_len: dna.len() }
    }

    /// Build from already-encoded frames; frame `f` must hold the codons
    /// starting at `f, f+3, ...` of a `dna_len`-long sequence.
    pub fn from_frames(frames: [Vec<u8>; 3], dna_len: usize) -> Self {
        for (f, frame) in frames.iter().enumerate() {
            assert_eq!(frame.len(), dna_len.saturating_sub(f) / 3, "frame {f} length does not match dna_len");
        }
        Self { frames, dna_len }
    }

    pub fn dna_len(&self) -> usize {
        self.dna_len
    }

    pub fn frame(&self, f: usize) -> &[u8] {
        &self.frames[f]
    }

    /// Letter of the codon starting at nucleotide `p`, or [`DELIMITER`] if
    /// that codon does not fit in the sequence.
    #[inline]
    pub fn letter_at(&self, p: isize) -> u8 {
        if p < 0 || p as usize + 3 > self.dna_len {
            return DELIMITER;
        }
        let p = p as usize;
        self.frames[p % 3][p / 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protein_roundtrip() {
        let letters = encode_protein(b"MKTwy*");
        assert_eq!(letters, vec![12, 11, 16, 17, 18, 23]);
        assert_eq!(decode_protein(&letters), "MKTWY*");
    }

    #[test]
    fn test_unknown_maps_to_x() {
        assert_eq!(encode_residue(b'J'), UNKNOWN_RESIDUE);
        assert_eq!(encode_residue(b'#'), UNKNOWN_RESIDUE);
        assert_eq!(decode_protein(&[DELIMITER]), "-");
    }

    #[test]
    fn test_translate_codons() {
        assert_eq!(translate_codon(b"ATG"), encode_residue(b'M'));
        assert_eq!(translate_codon(b"TGG"), encode_residue(b'W'));
        assert_eq!(translate_codon(b"TAA"), STOP_RESIDUE);
        assert_eq!(translate_codon(b"GCN"), UNKNOWN_RESIDUE);
    }

    #[test]
    fn test_three_frames() {
        let q = TranslatedQuery::translate(b"ATGGCCTAAG");
        assert_eq!(q.dna_len(), 10);
        assert_eq!(decode_protein(q.frame(0)), "MA*");
        assert_eq!(decode_protein(q.frame(1)), "WPK");
        assert_eq!(decode_protein(q.frame(2)), "GL");
        assert_eq!(q.letter_at(3), encode_residue(b'A'));
        assert_eq!(q.letter_at(4), encode_residue(b'P'));
        assert_eq!(q.letter_at(7), encode_residue(b'K'));
        assert_eq!(q.letter_at(8), DELIMITER);
        assert_eq!(q.letter_at(-1), DELIMITER);
    }
}
