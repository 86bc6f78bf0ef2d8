//! Transposition + shift + digit-subtraction cipher used to lock a solution.
//!
//! The locked and unlocked forms are both computed entirely over the
//! *canonical solution*: the letters of `solution` read off in column-major
//! order with black squares dropped. Everything here operates on that
//! shorter string; [`canonical_indices`] is what maps back onto the board.

use crate::checksum::cksum_region;
use crate::error::ScrambleError;
use crate::puzzle::{BLACK_SQUARE, Puzzle, SCRAMBLED_TAG_CLEAR, SCRAMBLED_TAG_LOCKED};

/// Row-major solution indices visited in column-major order (outer loop `x`,
/// inner loop `y`), skipping black squares. A legacy producer's reference
/// implementation is reported to index this as `sol[j*h + i]`, which is wrong
/// for a W-wide row-major buffer; this folds y=j into the row stride W, not H.
pub fn canonical_indices(width: u8, height: u8, solution: &[u8]) -> Vec<usize> {
    let (w, h) = (width as usize, height as usize);
    let mut indices = Vec::with_capacity(w * h);
    for x in 0..w {
        for y in 0..h {
            let idx = y * w + x;
            if solution.get(idx).copied() != Some(BLACK_SQUARE) {
                indices.push(idx);
            }
        }
    }
    indices
}

/// Reads the canonical solution string off `puzzle`.
pub fn canonical_solution(puzzle: &Puzzle) -> Vec<u8> {
    let indices = canonical_indices(puzzle.width(), puzzle.height(), puzzle.solution());
    indices.iter().map(|&i| puzzle.solution()[i]).collect()
}

fn scramble_step(t: &[u8]) -> Vec<u8> {
    let l = t.len();
    let mut out = vec![0u8; l];
    for (i, &c) in t.iter().enumerate() {
        let idx = if i % 2 == 0 { l / 2 + i / 2 } else { i / 2 };
        out[idx] = c;
    }
    out
}

fn unscramble_step(t: &[u8]) -> Vec<u8> {
    let l = t.len();
    let mut out = vec![0u8; l];
    for (i, slot) in out.iter_mut().enumerate() {
        let idx = if i % 2 == 0 { l / 2 + i / 2 } else { i / 2 };
        *slot = t[idx];
    }
    out
}

/// Moves the first `k` characters to the end.
fn shift(t: &[u8], k: u8) -> Vec<u8> {
    if t.is_empty() {
        return Vec::new();
    }
    let k = k as usize % t.len();
    let mut out = Vec::with_capacity(t.len());
    out.extend_from_slice(&t[k..]);
    out.extend_from_slice(&t[..k]);
    out
}

/// Moves the last `k` characters to the front; inverse of [`shift`].
fn unshift(t: &[u8], k: u8) -> Vec<u8> {
    if t.is_empty() {
        return Vec::new();
    }
    let k = k as usize % t.len();
    let split = t.len() - k;
    let mut out = Vec::with_capacity(t.len());
    out.extend_from_slice(&t[split..]);
    out.extend_from_slice(&t[..split]);
    out
}

fn digits(code: u16) -> [u8; 4] {
    [
        (code / 1000 % 10) as u8,
        (code / 100 % 10) as u8,
        (code / 10 % 10) as u8,
        (code % 10) as u8,
    ]
}

fn digits_are_valid(digits: [u8; 4]) -> bool {
    digits.iter().all(|&d| (1..=9).contains(&d))
}

fn subtract_round(t: &[u8], digits: [u8; 4]) -> Vec<u8> {
    t.iter()
        .enumerate()
        .map(|(pos, &c)| {
            let d = digits[pos % 4] as i16;
            let shifted = (c - b'A') as i16 - d;
            (shifted.rem_euclid(26) as u8) + b'A'
        })
        .collect()
}

fn add_round(t: &[u8], digits: [u8; 4]) -> Vec<u8> {
    t.iter()
        .enumerate()
        .map(|(pos, &c)| {
            let d = digits[pos % 4] as i16;
            let shifted = (c - b'A') as i16 + d;
            (shifted.rem_euclid(26) as u8) + b'A'
        })
        .collect()
}

/// Applies the forward (locking) transform to a canonical solution string.
fn lock_string(plain: &[u8], code: u16) -> Vec<u8> {
    let ds = digits(code);
    let mut w = plain.to_vec();
    for &d_i in &ds {
        w = add_round(&w, ds);
        w = shift(&w, d_i);
        w = scramble_step(&w);
    }
    w
}

/// Applies the inverse (unlocking) transform to a locked canonical string.
fn unlock_string(locked: &[u8], code: u16) -> Vec<u8> {
    let ds = digits(code);
    let mut w = locked.to_vec();
    for &d_i in ds.iter().rev() {
        w = unscramble_step(&w);
        w = unshift(&w, d_i);
        w = subtract_round(&w, ds);
    }
    w
}

/// Locks `puzzle`'s solution in place with `code`, a 4-digit key with every
/// digit in 1..9. Sets `scrambled_tag = 4` and `scrambled_cksum` to the
/// checksum of the plaintext canonical solution.
pub fn lock(puzzle: &mut Puzzle, code: u16) -> Result<(), ScrambleError> {
    let ds = digits(code);
    if !digits_are_valid(ds) {
        return Err(ScrambleError::InvalidCode);
    }
    if puzzle.solution().is_empty() {
        return Err(ScrambleError::NullPuzzle);
    }

    let indices = canonical_indices(puzzle.width(), puzzle.height(), puzzle.solution());
    let plain: Vec<u8> = indices.iter().map(|&i| puzzle.solution()[i]).collect();
    let plain_cksum = cksum_region(&plain, 0);
    let locked = lock_string(&plain, code);

    let solution = puzzle.solution_mut();
    for (&idx, &c) in indices.iter().zip(locked.iter()) {
        solution[idx] = c;
    }

    puzzle.set_scrambled_tag(SCRAMBLED_TAG_LOCKED);
    puzzle.set_scrambled_cksum(plain_cksum);
    Ok(())
}

/// Attempts to unlock `puzzle` with `code`. On success, writes the decoded
/// solution back in place and clears the lock. Returns `WrongKey` if the
/// decoded checksum doesn't match, without mutating the puzzle.
pub fn unlock(puzzle: &mut Puzzle, code: u16) -> Result<(), ScrambleError> {
    let ds = digits(code);
    if !digits_are_valid(ds) {
        return Err(ScrambleError::InvalidCode);
    }
    if puzzle.solution().is_empty() {
        return Err(ScrambleError::NullPuzzle);
    }
    if !puzzle.is_locked() {
        return Err(ScrambleError::NotLocked);
    }

    let indices = canonical_indices(puzzle.width(), puzzle.height(), puzzle.solution());
    let locked: Vec<u8> = indices.iter().map(|&i| puzzle.solution()[i]).collect();
    let candidate = unlock_string(&locked, code);

    if cksum_region(&candidate, 0) != puzzle.scrambled_cksum() {
        return Err(ScrambleError::WrongKey);
    }

    let solution = puzzle.solution_mut();
    for (&idx, &c) in indices.iter().zip(candidate.iter()) {
        solution[idx] = c;
    }

    puzzle.set_scrambled_tag(SCRAMBLED_TAG_CLEAR);
    puzzle.set_scrambled_cksum(0);
    Ok(())
}

/// Tries every code from 1111 to 9999 skipping any digit-0 code, returning
/// the first one that unlocks `puzzle`.
pub fn brute_force_unlock(puzzle: &mut Puzzle) -> Result<u16, ScrambleError> {
    if puzzle.solution().is_empty() {
        return Err(ScrambleError::NullPuzzle);
    }
    if !puzzle.is_locked() {
        return Err(ScrambleError::NotLocked);
    }

    for code in 1111..=9999u16 {
        if !digits_are_valid(digits(code)) {
            continue;
        }
        if unlock(puzzle, code).is_ok() {
            return Ok(code);
        }
    }

    Err(ScrambleError::BruteForceExhausted)
}
