//! Checksum calculation, validation, and commit.
//!
//! `cksums_calc` recomputes every top-level sum from the puzzle's current
//! fields; `cksums_check` compares those against what's currently stored and
//! reports mismatches without touching the puzzle; `cksums_commit` writes the
//! recomputed values back, which is what a text-format load does since the
//! text dialect carries no checksums of its own.

use crate::checksum::{MagicSums, cksum_region, magic_10, magic_14};
use crate::error::Mismatch;
use crate::puzzle::Puzzle;

/// The full set of top-level sums recomputed from a puzzle's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatedChecksums {
    pub cib: u16,
    pub puzcib: u16,
    pub magic_10: [u8; 4],
    pub magic_14: [u8; 4],
}

fn cib_block(puzzle: &Puzzle) -> [u8; 8] {
    let clue_count = puzzle.clue_count().to_le_bytes();
    let x_unk_30 = puzzle.x_unk_30().to_le_bytes();
    let scrambled_tag = puzzle.scrambled_tag().to_le_bytes();
    [
        puzzle.width(),
        puzzle.height(),
        clue_count[0],
        clue_count[1],
        x_unk_30[0],
        x_unk_30[1],
        scrambled_tag[0],
        scrambled_tag[1],
    ]
}

/// Folds title/author/copyright/clues/notes into `initial`, optionally
/// preceded by solution and grid. Title/author/copyright/notes include their
/// terminating NUL and are skipped entirely when empty; clues never include
/// their NUL.
fn fold_pieces(puzzle: &Puzzle, initial: u16, include_board: bool) -> u16 {
    let mut acc = initial;

    if include_board {
        acc = cksum_region(puzzle.solution(), acc);
        acc = cksum_region(puzzle.grid(), acc);
    }

    for field in [puzzle.title(), puzzle.author(), puzzle.copyright()] {
        if !field.is_empty() {
            acc = cksum_region(field, acc);
            acc = cksum_region(&[0], acc);
        }
    }

    for clue in puzzle.clues() {
        acc = cksum_region(clue, acc);
    }

    if let Some(notes) = puzzle.notes() {
        if !notes.is_empty() {
            acc = cksum_region(notes, acc);
            acc = cksum_region(&[0], acc);
        }
    }

    acc
}

/// Recomputes every top-level checksum from `puzzle`'s current fields.
pub fn cksums_calc(puzzle: &Puzzle) -> CalculatedChecksums {
    let cib = cksum_region(&cib_block(puzzle), 0);
    let puzcib = fold_pieces(puzzle, cib, true);
    let cksum2 = fold_pieces(puzzle, 0, false);

    let sol_sum = cksum_region(puzzle.solution(), 0);
    let grid_sum = cksum_region(puzzle.grid(), 0);

    let sums = MagicSums {
        cib,
        sol_sum,
        grid_sum,
        cksum2,
    };

    CalculatedChecksums {
        cib,
        puzcib,
        magic_10: magic_10(sums),
        magic_14: magic_14(sums),
    }
}

/// Compares `puzzle`'s stored checksums against freshly calculated ones,
/// returning every mismatch found. An empty result means the puzzle is valid.
pub fn cksums_check(puzzle: &Puzzle) -> Vec<Mismatch> {
    let calc = cksums_calc(puzzle);
    let mut mismatches = Vec::new();

    if puzzle.cksum_cib() != calc.cib {
        mismatches.push(Mismatch {
            field: "cksum_cib",
            parsed: puzzle.cksum_cib(),
            calculated: calc.cib,
        });
    }
    if puzzle.cksum_puz() != calc.puzcib {
        mismatches.push(Mismatch {
            field: "cksum_puz",
            parsed: puzzle.cksum_puz(),
            calculated: calc.puzcib,
        });
    }
    if puzzle.magic_10() != calc.magic_10 {
        mismatches.push(Mismatch {
            field: "magic_10",
            parsed: u16::from_le_bytes([puzzle.magic_10()[0], puzzle.magic_10()[1]]),
            calculated: u16::from_le_bytes([calc.magic_10[0], calc.magic_10[1]]),
        });
    }
    if puzzle.magic_14() != calc.magic_14 {
        mismatches.push(Mismatch {
            field: "magic_14",
            parsed: u16::from_le_bytes([puzzle.magic_14()[0], puzzle.magic_14()[1]]),
            calculated: u16::from_le_bytes([calc.magic_14[0], calc.magic_14[1]]),
        });
    }

    mismatches
}

/// Convenience atop [`cksums_check`]: `true` iff every stored checksum
/// matches what's recomputed from the puzzle's current fields.
pub fn is_valid(puzzle: &Puzzle) -> bool {
    cksums_check(puzzle).is_empty()
}

/// Recomputes every top-level checksum and writes it back into `puzzle`.
pub fn cksums_commit(puzzle: &mut Puzzle) {
    let calc = cksums_calc(puzzle);
    puzzle.set_cksum_cib(calc.cib);
    puzzle.set_cksum_puz(calc.puzcib);
    puzzle.set_magic_10(calc.magic_10);
    puzzle.set_magic_14(calc.magic_14);
}
