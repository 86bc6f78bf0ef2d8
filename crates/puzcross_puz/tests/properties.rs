//! Cross-module properties and literal end-to-end scenarios: binary
//! round-tripping, checksum algebra, the scramble cipher, and text/binary
//! equivalence.

use puzcross_puz::error::{Error, ReadError, ScrambleError};
use puzcross_puz::{
    Kind, MagicSums, Puzzle, brute_force_unlock, cksum_region, cksums_commit, load, lock,
    magic_10, magic_14, save, size, unlock,
};
use rstest::rstest;

fn three_by_three() -> Puzzle {
    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(3, 3);
    puzzle.set_solution(b"ABC...DEF".to_vec());
    puzzle.set_grid(Puzzle::grid_from_solution(b"ABC...DEF"));
    puzzle.set_clues(vec![b"a1".to_vec(), b"a2".to_vec(), b"d1".to_vec()]);
    puzzle
}

/// A 5x5 board with column 4 entirely black, so its canonical (column-major,
/// blacks-dropped) solution reads out to `canonical` exactly.
fn five_by_five_with_canonical(canonical: &[u8]) -> Puzzle {
    let mut solution = vec![b'.'; 25];
    for col in 0..4 {
        for row in 0..5 {
            solution[row * 5 + col] = canonical[col * 5 + row];
        }
    }

    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(5, 5);
    puzzle.set_solution(solution);
    puzzle
}

// --- E1: empty-metadata CIB checksum -------------------------------------

#[test]
fn e1_cib_matches_literal_region() {
    let mut puzzle = three_by_three();
    cksums_commit(&mut puzzle);

    let expected = cksum_region(&[0x03, 0x03, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00], 0);
    assert_eq!(puzzle.cksum_cib(), expected);
}

// --- E2: clue_count/body mismatch is a MalformedBody-class failure ------

#[test]
fn e2_clue_count_mismatch_is_rejected() {
    let mut puzzle = three_by_three();
    cksums_commit(&mut puzzle);
    let mut bytes = save(&puzzle).unwrap();

    // Header clue_count stays 3, but only 2 clues are present in the body:
    // drop the third clue's NUL-terminated bytes from the buffer.
    let without_third_clue = {
        let third = puzzle.clue(2).unwrap();
        let cut = bytes.len() - (third.len() + 1);
        bytes.truncate(cut);
        bytes
    };

    match load(Kind::Binary, &without_third_clue, false) {
        Err(Error::Read(ReadError::ClueCountMismatch { clue_count, found })) => {
            assert_eq!(clue_count, 3);
            assert_eq!(found, 2);
        }
        other => panic!("expected ClueCountMismatch, got {other:?}"),
    }
}

// --- E3: lock/unlock with the legacy return-code mapping -----------------

#[test]
fn e3_unlock_legacy_codes() {
    let mut puzzle = five_by_five_with_canonical(b"PIZZALOVERTESTSABCDE");
    let original = puzzle.solution().to_vec();

    lock(&mut puzzle, 2718).unwrap();
    assert_ne!(puzzle.solution(), original.as_slice());

    let wrong = unlock(&mut puzzle, 1111).unwrap_err();
    assert_eq!(wrong.code(), 2);
    assert!(puzzle.is_locked());

    let ok = unlock(&mut puzzle, 2718);
    assert!(ok.is_ok());
    assert_eq!(puzzle.solution(), original.as_slice());
    assert_eq!(puzzle.scrambled_tag(), 0);
    assert_eq!(puzzle.scrambled_cksum(), 0);
}

// --- E4/E5: GRBS/RTBL pairing -----------------------------------------

#[test]
fn e4_all_zero_grbs_without_rtbl_loads_with_no_rebus() {
    let mut puzzle = three_by_three();
    puzzle.rebus_set(vec![0; 9], Vec::new());
    cksums_commit(&mut puzzle);
    let bytes = save(&puzzle).unwrap();

    let (loaded, mismatches) = load(Kind::Binary, &bytes, true).unwrap();
    assert!(mismatches.is_empty());
    assert!(!loaded.has_rebus());
}

#[test]
fn e5_nonzero_grbs_without_rtbl_is_rejected() {
    // Hand-assemble a minimal binary buffer with a GRBS section whose single
    // byte is non-zero, and no following RTBL.
    let mut puzzle = three_by_three();
    cksums_commit(&mut puzzle);
    let mut bytes = save(&puzzle).unwrap();

    let mut grbs_section = Vec::new();
    grbs_section.extend_from_slice(b"GRBS");
    grbs_section.extend_from_slice(&9u16.to_le_bytes()); // 9 cells
    let payload: Vec<u8> = std::iter::once(1u8).chain(std::iter::repeat(0u8).take(8)).collect();
    let cksum = cksum_region(&payload, 0);
    grbs_section.extend_from_slice(&cksum.to_le_bytes());
    grbs_section.extend_from_slice(&payload);
    grbs_section.push(0);

    bytes.extend_from_slice(&grbs_section);

    match load(Kind::Binary, &bytes, false) {
        Err(Error::Read(ReadError::MissingRtbl)) => {}
        other => panic!("expected MissingRtbl, got {other:?}"),
    }
}

// --- E6: large text-dialect grid derivation -------------------------------

#[test]
fn e6_fifteen_by_fifteen_text_grid_derives_dashes() {
    let size_n = 15usize;
    let solution: String = (0..size_n * size_n)
        .map(|i| if i % 7 == 0 { '.' } else { 'A' })
        .collect();

    let mut text = String::new();
    text.push_str("<ACROSS PUZZLE>\n<TITLE>\nBig\n<AUTHOR>\nA\n<COPYRIGHT>\n\n<SIZE>\n15x15\n<GRID>\n");
    for row in solution.as_bytes().chunks(size_n) {
        text.push_str(std::str::from_utf8(row).unwrap());
        text.push('\n');
    }
    text.push_str("<ACROSS>\na\n<DOWN>\nd\n");

    let (puzzle, mismatches) = load(Kind::Text, text.as_bytes(), true).unwrap();
    assert!(mismatches.is_empty());
    assert_eq!(puzzle.width(), 15);
    assert_eq!(puzzle.height(), 15);

    for (&sol_byte, &grid_byte) in puzzle.solution().iter().zip(puzzle.grid().iter()) {
        if sol_byte == b'.' {
            assert_eq!(grid_byte, b'.');
        } else {
            assert_eq!(grid_byte, b'-');
        }
    }
}

// --- Property 1: binary round-trip ---------------------------------------

#[test]
fn round_trip_preserves_bytes_once_checksums_are_valid() {
    let mut puzzle = three_by_three();
    cksums_commit(&mut puzzle);
    let original_bytes = save(&puzzle).unwrap();

    let (loaded, mismatches) = load(Kind::Binary, &original_bytes, true).unwrap();
    assert!(mismatches.is_empty());

    let mut recommitted = loaded.clone();
    cksums_commit(&mut recommitted);
    let round_tripped = save(&recommitted).unwrap();

    assert_eq!(round_tripped, original_bytes);
}

// --- Property 2: sizer accuracy --------------------------------------------

#[rstest]
#[case(vec![b"x".to_vec()], None)]
#[case(vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()], Some(b"notes".to_vec()))]
fn sizer_matches_emitted_length(#[case] clues: Vec<Vec<u8>>, #[case] notes: Option<Vec<u8>>) {
    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(2, 2);
    puzzle.set_solution(b"AB.C".to_vec());
    puzzle.set_grid(Puzzle::grid_from_solution(b"AB.C"));
    puzzle.set_clues(clues);
    puzzle.set_notes(notes);
    cksums_commit(&mut puzzle);

    let predicted = size(&puzzle).unwrap();
    let emitted = save(&puzzle).unwrap();
    assert_eq!(predicted, emitted.len());
}

// --- Property 3: checksum primitive is associative over concatenation ----

#[rstest]
#[case(b"".as_slice(), b"".as_slice())]
#[case(b"A".as_slice(), b"BC".as_slice())]
#[case(b"hello ".as_slice(), b"world".as_slice())]
fn cksum_region_is_associative(#[case] a: &[u8], #[case] b: &[u8]) {
    let whole: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
    let direct = cksum_region(&whole, 0);
    let folded = cksum_region(b, cksum_region(a, 0));
    assert_eq!(direct, folded);
}

// --- Property 4: magic derivation -----------------------------------------

#[test]
fn magic_derivation_matches_masked_bytes() {
    let sums = MagicSums {
        cib: 0x1234,
        sol_sum: 0xABCD,
        grid_sum: 0x0102,
        cksum2: 0xFF00,
    };
    let low = magic_10(sums);
    let high = magic_14(sums);
    let iche = b"ICHE";
    let ated = b"ATED";
    let values = [sums.cib, sums.sol_sum, sums.grid_sum, sums.cksum2];

    for i in 0..4 {
        assert_eq!(low[i], (values[i] & 0xFF) as u8 ^ iche[i]);
        assert_eq!(high[i], (values[i] >> 8) as u8 ^ ated[i]);
    }
}

// --- Property 5 is covered directly in scramble.rs's unit tests. ---------

// --- Property 6: lock/unlock round-trip for arbitrary valid codes --------

#[rstest]
#[case(1111)]
#[case(4321)]
#[case(9999)]
#[case(2718)]
fn lock_unlock_round_trip(#[case] code: u16) {
    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(4, 4);
    puzzle.set_solution(b"ABCDEFGHIJKLMNOP".to_vec());
    let original = puzzle.solution().to_vec();

    lock(&mut puzzle, code).unwrap();
    assert!(puzzle.is_locked());
    assert_ne!(puzzle.solution(), original.as_slice());

    unlock(&mut puzzle, code).unwrap();
    assert_eq!(puzzle.solution(), original.as_slice());
    assert_eq!(puzzle.scrambled_tag(), 0);
    assert_eq!(puzzle.scrambled_cksum(), 0);
}

// --- Property 7: brute force recovers the exact locking code -------------

#[test]
fn brute_force_recovers_locking_code() {
    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(3, 3);
    puzzle.set_solution(b"ABC.EFGHI".to_vec());
    let original = puzzle.solution().to_vec();

    lock(&mut puzzle, 3921).unwrap();
    assert_ne!(puzzle.solution(), original.as_slice());

    let found = brute_force_unlock(&mut puzzle).unwrap();
    assert_eq!(found, 3921);
    assert_eq!(puzzle.solution(), original.as_slice());
}

#[test]
fn brute_force_on_an_unlocked_puzzle_reports_not_locked() {
    let mut puzzle = Puzzle::new();
    puzzle.set_dimensions(2, 2);
    puzzle.set_solution(b"ABCD".to_vec());

    assert_eq!(brute_force_unlock(&mut puzzle), Err(ScrambleError::NotLocked));
}

// --- Property 8: text/binary equivalence ----------------------------------

#[test]
fn text_and_binary_forms_agree_on_model_fields() {
    let text = "<ACROSS PUZZLE>\n\
                 <TITLE>\n\
                 Sample\n\
                 <AUTHOR>\n\
                 Author Name\n\
                 <COPYRIGHT>\n\
                 (c) 2026\n\
                 <SIZE>\n\
                 3x3\n\
                 <GRID>\n\
                 ABC\n\
                 ...\n\
                 DEF\n\
                 <ACROSS>\n\
                 a1\n\
                 a2\n\
                 <DOWN>\n\
                 d1\n";
    let (from_text, _) = load(Kind::Text, text.as_bytes(), true).unwrap();

    let mut from_scratch = Puzzle::new();
    from_scratch.set_dimensions(3, 3);
    from_scratch.set_title(b"Sample".to_vec());
    from_scratch.set_author(b"Author Name".to_vec());
    from_scratch.set_copyright(b"(c) 2026".to_vec());
    from_scratch.set_solution(b"ABC...DEF".to_vec());
    from_scratch.set_grid(Puzzle::grid_from_solution(b"ABC...DEF"));
    from_scratch.set_clues(vec![b"a1".to_vec(), b"a2".to_vec(), b"d1".to_vec()]);
    cksums_commit(&mut from_scratch);
    let binary = save(&from_scratch).unwrap();
    let (from_binary, mismatches) = load(Kind::Binary, &binary, true).unwrap();
    assert!(mismatches.is_empty());

    assert_eq!(from_text.title(), from_binary.title());
    assert_eq!(from_text.author(), from_binary.author());
    assert_eq!(from_text.copyright(), from_binary.copyright());
    assert_eq!(from_text.width(), from_binary.width());
    assert_eq!(from_text.height(), from_binary.height());
    assert_eq!(from_text.solution(), from_binary.solution());
    assert_eq!(from_text.grid(), from_binary.grid());
    assert_eq!(from_text.clues(), from_binary.clues());
}
