// tests/traceback_tests.rs
// Banded and three-frame traceback: fixed scenarios, and random inputs whose
// transcripts must re-score to the reported HSP score.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use swipe_align::core::compute::encoding::translate_codon;
use swipe_align::{
    banded_3frame_swipe, banded_3frame_swipe_traceback, banded_swipe, banded_swipe_traceback, encode_protein, DpTarget,
    DpWorkspace, EditOp, GapPenalties, Hsp, ScoreMatrix, Scoring, TranslatedQuery,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_protein(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..20u8)).collect()
}

/// Score of `hsp`'s transcript walked over protein query and target.
fn rescore_protein(hsp: &Hsp, query: &[u8], target: &[u8], scoring: &Scoring) -> i32 {
    let (mut j, mut t, mut score) = (hsp.query_range.start, hsp.target_range.start, 0);
    for &(op, n) in hsp.transcript.ops() {
        let n = n as usize;
        match op {
            EditOp::Match | EditOp::Mismatch => {
                for _ in 0..n {
                    assert_eq!(op == EditOp::Match, query[j] == target[t]);
                    score += scoring.matrix.score(query[j], target[t]);
                    j += 1;
                    t += 1;
                }
            }
            EditOp::Insertion => {
                score -= scoring.gaps.cost(n);
                j += n;
            }
            EditOp::Deletion => {
                score -= scoring.gaps.cost(n);
                t += n;
            }
            EditOp::FrameShiftForward | EditOp::FrameShiftReverse => panic!("frame shift in protein transcript"),
        }
    }
    assert_eq!(j, hsp.query_range.end);
    assert_eq!(t, hsp.target_range.end);
    score
}

/// Score of a three-frame transcript; query coordinates are nucleotides.
fn rescore_translated(hsp: &Hsp, query: &TranslatedQuery, subject: &[u8], scoring: &Scoring) -> i32 {
    let (mut p, mut i, mut score) = (hsp.query_range.start as isize, hsp.target_range.start, 0);
    for &(op, n) in hsp.transcript.ops() {
        let n = n as usize;
        match op {
            EditOp::Match | EditOp::Mismatch => {
                for _ in 0..n {
                    score += scoring.matrix.score(query.letter_at(p), subject[i]);
                    p += 3;
                    i += 1;
                }
            }
            EditOp::Insertion => {
                score -= scoring.gaps.cost(n);
                p += 3 * n as isize;
            }
            EditOp::Deletion => {
                score -= scoring.gaps.cost(n);
                i += n;
            }
            EditOp::FrameShiftForward => {
                score -= scoring.frame_shift * n as i32;
                p += n as isize;
            }
            EditOp::FrameShiftReverse => {
                score -= scoring.frame_shift * n as i32;
                p -= n as isize;
            }
        }
    }
    assert_eq!(p as usize, hsp.query_range.end);
    assert_eq!(i, hsp.target_range.end);
    score
}

#[test]
fn mkt_identity_scenario() {
    init_logging();
    let scoring = Scoring::new(ScoreMatrix::identity(5, -4), GapPenalties::new(10, 1));
    let q = encode_protein(b"MKT");
    let t = encode_protein(b"MKT");
    let mut ws = DpWorkspace::<i16>::new();
    let mut out = Vec::new();
    banded_swipe_traceback(&q, &[DpTarget::around(&t, 0, 1)], &scoring, &mut ws, &mut out).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].score, 15);
    assert_eq!(out[0].transcript.to_string(), "3=");
    assert!((out[0].identity() - 1.0).abs() < 1e-12);
}

#[test]
fn random_banded_transcripts_rescore() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(2024);
    let scoring = Scoring::default();
    let mut ws = DpWorkspace::<i16>::new();
    for round in 0..6 {
        let qlen = rng.gen_range(20..90);
        let query = random_protein(&mut rng, qlen);
        let targets: Vec<Vec<u8>> = (0..11)
            .map(|_| {
                let mut t = Vec::new();
                for &c in &query {
                    match rng.gen_range(0..100) {
                        0..=11 => t.push(rng.gen_range(0..20u8)),
                        12..=14 => {}
                        15..=17 => t.extend([c, rng.gen_range(0..20u8)]),
                        _ => t.push(c),
                    }
                }
                t
            })
            .collect();
        let dp: Vec<DpTarget> = targets.iter().map(|t| DpTarget::around(t, 0, 16)).collect();

        let scores = banded_swipe(&query, &dp, &scoring, &mut ws);
        let mut hsps = Vec::new();
        banded_swipe_traceback(&query, &dp, &scoring, &mut ws, &mut hsps).unwrap();

        let positive: Vec<usize> = (0..targets.len()).filter(|&i| scores[i].unwrap() > 0).collect();
        assert_eq!(hsps.iter().map(|h| h.target).collect::<Vec<_>>(), positive, "round {round}");
        for hsp in &hsps {
            assert_eq!(Some(hsp.score), scores[hsp.target]);
            assert_eq!(rescore_protein(hsp, &query, &targets[hsp.target], &scoring), hsp.score);
        }
    }
}

#[test]
fn u8_traceback_agrees_with_i16() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(5);
    let scoring = Scoring::default();
    let query = random_protein(&mut rng, 25);
    let targets: Vec<Vec<u8>> = (0..20).map(|_| random_protein(&mut rng, 30)).collect();
    let dp: Vec<DpTarget> = targets.iter().map(|t| DpTarget::around(t, 2, 8)).collect();
    let mut narrow = Vec::new();
    let mut wide = Vec::new();
    banded_swipe_traceback(&query, &dp, &scoring, &mut DpWorkspace::<u8>::new(), &mut narrow).unwrap();
    banded_swipe_traceback(&query, &dp, &scoring, &mut DpWorkspace::<i16>::new(), &mut wide).unwrap();
    assert_eq!(narrow, wide);
}

/// A codon for every amino acid the genetic code produces.
fn reverse_code() -> Vec<Option<[u8; 3]>> {
    let mut table = vec![None; 24];
    for a in b"TCAG" {
        for b in b"TCAG" {
            for c in b"TCAG" {
                let codon = [*a, *b, *c];
                table[translate_codon(&codon) as usize].get_or_insert(codon);
            }
        }
    }
    table
}

#[test]
fn frame_shift_scenario() {
    init_logging();
    // TGG x 5, one inserted A, TGG x 5: ten tryptophans with a +1 frame shift
    let mut dna = b"TGG".repeat(5);
    dna.push(b'A');
    dna.extend_from_slice(&b"TGG".repeat(5));
    let query = TranslatedQuery::translate(&dna);
    let subject = encode_protein(b"WWWWWWWWWW");
    let target = [DpTarget::around(&subject, 0, 4)];
    let scoring = Scoring::new(ScoreMatrix::identity(5, -4), GapPenalties::new(10, 1)).with_frame_shift(15);

    let mut ws = DpWorkspace::<i16>::new();
    let mut out = Vec::new();
    banded_3frame_swipe_traceback(&query, &target, &scoring, &mut ws, &mut out).unwrap();
    assert_eq!(out[0].score, 10 * 5 - 15);
    assert!(out[0].transcript.contains(EditOp::FrameShiftForward));
    assert_eq!(rescore_translated(&out[0], &query, &subject, &scoring), out[0].score);
}

#[test]
fn random_translated_transcripts_rescore() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(77);
    let codons = reverse_code();
    let scoring = Scoring::default();
    let mut ws = DpWorkspace::<i16>::new();
    for _ in 0..6 {
        let subjects: Vec<Vec<u8>> = (0..9)
            .map(|_| {
                let len = rng.gen_range(15..50);
                random_protein(&mut rng, len)
            })
            .collect();
        // back-translate the first subject and break its frame once
        let mut dna: Vec<u8> = subjects[0].iter().flat_map(|&aa| codons[aa as usize].unwrap_or(*b"NNN")).collect();
        let at = rng.gen_range(3..dna.len() - 3);
        dna.insert(at, b"ACGT"[rng.gen_range(0..4)]);
        let query = TranslatedQuery::translate(&dna);

        let targets: Vec<DpTarget> = subjects.iter().map(|s| DpTarget::around(s, 0, 6)).collect();
        let scores = banded_3frame_swipe(&query, &targets, &scoring, &mut ws);
        let mut hsps = Vec::new();
        banded_3frame_swipe_traceback(&query, &targets, &scoring, &mut ws, &mut hsps).unwrap();
        for hsp in &hsps {
            assert_eq!(Some(hsp.score), scores[hsp.target]);
            assert_eq!(rescore_translated(hsp, &query, &subjects[hsp.target], &scoring), hsp.score);
        }
        assert_eq!(hsps[0].target, 0);
    }
}

/// Plain scalar three-frame local alignment over cells with
/// `d_begin <= 3i - p < d_end`; query positions are codon starts.
fn scalar_three_frame(query: &TranslatedQuery, subject: &[u8], d_begin: i32, d_end: i32, scoring: &Scoring) -> i32 {
    const NEG: i32 = i32::MIN / 4;
    let n = query.dna_len() as isize;
    let len = subject.len() as isize;
    if n < 3 || len == 0 {
        return 0;
    }
    let (open, ext, fs) = (scoring.gaps.open, scoring.gaps.extend, scoring.frame_shift);
    let in_band = |p: isize, i: isize| {
        p >= 0 && p <= n - 3 && i >= 0 && i < len && (d_begin..d_end).contains(&((3 * i - p) as i32))
    };
    let rows = (n - 2) as usize;
    let mut h = vec![vec![0i32; len as usize]; rows];
    let mut e = vec![vec![NEG; len as usize]; rows];
    let mut f = vec![vec![NEG; len as usize]; rows];
    let mut best = 0;
    for i in 0..len {
        for p in 0..=n - 3 {
            if !in_band(p, i) {
                continue;
            }
            let at = |m: &Vec<Vec<i32>>, p: isize, i: isize| if in_band(p, i) { m[p as usize][i as usize] } else { 0 };
            let s = scoring.matrix.score(query.letter_at(p), subject[i as usize]);
            let del = if in_band(p, i - 1) {
                (e[p as usize][i as usize - 1] - ext).max(h[p as usize][i as usize - 1] - open)
            } else {
                NEG
            };
            let ins = if in_band(p - 3, i) {
                (f[p as usize - 3][i as usize] - ext).max(h[p as usize - 3][i as usize] - open)
            } else {
                NEG
            };
            let cur = [
                0,
                at(&h, p - 3, i - 1) + s,
                at(&h, p - 4, i - 1) + s - fs,
                at(&h, p - 2, i - 1) + s - fs,
                del,
                ins,
            ]
            .into_iter()
            .max()
            .unwrap_or(0);
            h[p as usize][i as usize] = cur;
            e[p as usize][i as usize] = del;
            f[p as usize][i as usize] = ins;
            best = best.max(cur);
        }
    }
    best
}

fn random_dna(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

#[test]
fn three_frame_matches_scalar_reference() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x3f);
    let scoring = Scoring::default().with_frame_shift(12);
    let mut ws = DpWorkspace::<i16>::new();
    for round in 0..12 {
        let dna_len = rng.gen_range(60..180);
        let dna = random_dna(&mut rng, dna_len);
        let query = TranslatedQuery::translate(&dna);

        // one i16 batch: codon runs of the query (some crossing into the
        // next frame, some mutated) and unrelated proteins
        let mut subjects = Vec::new();
        let mut diagonals = Vec::new();
        for _ in 0..8 {
            let frame = rng.gen_range(0..3);
            let codons = query.frame(frame).len();
            let start = rng.gen_range(0..codons / 2);
            let mut s: Vec<u8> = query.frame(frame)[start..].iter().take(rng.gen_range(5..25)).copied().collect();
            match rng.gen_range(0..4) {
                0 => {
                    let other = (frame + 1) % 3;
                    let from = (start + s.len()).min(query.frame(other).len());
                    s.extend(query.frame(other)[from..].iter().take(10));
                }
                1 => {
                    for c in s.iter_mut() {
                        if rng.gen_range(0..5) == 0 {
                            *c = rng.gen_range(0..20u8);
                        }
                    }
                }
                2 => {
                    let len = rng.gen_range(1..30);
                    s = random_protein(&mut rng, len);
                }
                _ => {}
            }
            if s.is_empty() {
                s.push(rng.gen_range(0..20u8));
            }
            subjects.push(s);
            diagonals.push(-3 * start as i32 - frame as i32);
        }
        let targets: Vec<DpTarget> =
            subjects.iter().zip(&diagonals).map(|(s, &d)| DpTarget::around(s, d, rng.gen_range(2..8))).collect();
        // lanes of one batch share the union of their bands
        let d_begin = targets.iter().map(|t| t.d_begin()).min().unwrap();
        let d_end = targets.iter().map(|t| t.d_end()).max().unwrap();

        let expected: Vec<i32> =
            subjects.iter().map(|s| scalar_three_frame(&query, s, d_begin, d_end, &scoring)).collect();
        let scores = banded_3frame_swipe(&query, &targets, &scoring, &mut ws);
        assert_eq!(scores, expected.iter().map(|&s| Some(s)).collect::<Vec<_>>(), "round {round}");

        let mut hsps = Vec::new();
        banded_3frame_swipe_traceback(&query, &targets, &scoring, &mut ws, &mut hsps).unwrap();
        let positive: Vec<usize> = (0..expected.len()).filter(|&t| expected[t] > 0).collect();
        assert_eq!(hsps.iter().map(|h| h.target).collect::<Vec<_>>(), positive, "round {round}");
        for hsp in &hsps {
            assert_eq!(hsp.score, expected[hsp.target]);
            assert_eq!(rescore_translated(hsp, &query, &subjects[hsp.target], &scoring), hsp.score);
        }
    }
}

#[test]
fn reverse_frame_shift_scenario() {
    init_logging();
    // four TGG codons, a base lost from the fifth, five more TGG codons:
    // frame 0 reads WWWW then frame 2 reads WWWWW from nucleotide 14
    let mut dna = b"TGG".repeat(4);
    dna.extend_from_slice(b"TG");
    dna.extend_from_slice(&b"TGG".repeat(5));
    let query = TranslatedQuery::translate(&dna);
    let subject = encode_protein(b"WWWWWWWWWW");
    let target = [DpTarget::around(&subject, 0, 4)];
    let scoring = Scoring::new(ScoreMatrix::identity(5, -4), GapPenalties::new(10, 1)).with_frame_shift(15);

    let mut ws = DpWorkspace::<i16>::new();
    let expected = scalar_three_frame(&query, &subject, target[0].d_begin(), target[0].d_end(), &scoring);
    // 4 matches, shift, one mismatched codon, 5 matches
    assert_eq!(expected, 4 * 5 - 15 - 4 + 5 * 5);
    assert_eq!(banded_3frame_swipe(&query, &target, &scoring, &mut ws), vec![Some(expected)]);

    let mut out = Vec::new();
    banded_3frame_swipe_traceback(&query, &target, &scoring, &mut ws, &mut out).unwrap();
    let hsp = &out[0];
    assert_eq!(hsp.score, expected);
    assert!(hsp.transcript.contains(EditOp::FrameShiftReverse));
    assert!(!hsp.transcript.contains(EditOp::FrameShiftForward));
    assert_eq!(hsp.transcript.to_string(), "4=1\\1X5=");
    assert_eq!(hsp.query_range, 0..29);
    assert_eq!(hsp.target_range, 0..10);
    assert_eq!(rescore_translated(hsp, &query, &subject, &scoring), hsp.score);
}
