//! The binary writer and sizer.
//!
//! `save` emits the exact byte order the loader in [`crate::read`] expects,
//! trusting the puzzle's top-level checksum fields (callers run
//! [`crate::validate::cksums_commit`] first if they want those recomputed).
//! Per-section checksums have no persistent home on [`Puzzle`] — the data
//! model only tracks parsed-vs-calculated pairs for the top-level sums — so
//! the writer computes them fresh from each section's payload as it goes.

use crate::checksum::cksum_region;
use crate::codec::{write_cstr, write_u16, write_u8};
use crate::error::WriteError;
use crate::puzzle::{MAGIC, Puzzle};
use crate::read::HEADER_SIZE;

fn rtbl_field(puzzle: &Puzzle) -> Vec<u8> {
    let entries = puzzle.rtbl().unwrap_or(&[]);
    let mut out = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push(b';');
        }
        out.extend_from_slice(&entry.to_field());
    }
    out
}

fn ltim_field(puzzle: &Puzzle) -> Option<Vec<u8>> {
    puzzle.ltim().map(|timer| {
        format!("{},{}", timer.elapsed_secs(), u8::from(timer.state())).into_bytes()
    })
}

fn rusr_field(puzzle: &Puzzle) -> Option<Vec<u8>> {
    puzzle.rusr().map(|entries| {
        let mut out = Vec::new();
        for entry in entries {
            match entry {
                Some(bytes) => write_cstr(&mut out, bytes),
                None => out.push(0),
            }
        }
        out
    })
}

/// Exact serialized size `save` would produce.
pub fn size(puzzle: &Puzzle) -> Result<usize, WriteError> {
    let area = puzzle.area();
    if puzzle.solution().len() != area || puzzle.grid().len() != area {
        return Err(WriteError::BoardLengthMismatch {
            found: puzzle.solution().len().max(puzzle.grid().len()),
            expected: area,
        });
    }
    if puzzle.clues().len() != puzzle.clue_count() as usize {
        return Err(WriteError::ClueCountMismatch {
            clue_count: puzzle.clue_count(),
            found: puzzle.clues().len(),
        });
    }

    let mut total = HEADER_SIZE + 2 * area;
    total += puzzle.title().len() + 1;
    total += puzzle.author().len() + 1;
    total += puzzle.copyright().len() + 1;
    total += puzzle.clues().iter().map(|c| c.len() + 1).sum::<usize>();
    // The notes field is always serialized, per spec.md §4.5's unconditional
    // "+ notes length + 1": an absent notes value is a zero-length string,
    // not an omitted field (same as title/author/copyright).
    total += puzzle.notes().map(|n| n.len()).unwrap_or(0) + 1;

    let section_size = |kind: &'static str, payload_len: usize| -> Result<usize, WriteError> {
        if payload_len > u16::MAX as usize {
            return Err(WriteError::SizeOverflow {
                kind,
                size: payload_len,
                max_size: u16::MAX as usize,
            });
        }
        Ok(4 + 2 + 2 + payload_len + 1)
    };

    if let Some(grbs) = puzzle.grbs() {
        total += section_size("GRBS", grbs.len())?;
        total += section_size("RTBL", rtbl_field(puzzle).len())?;
    }
    if let Some(ltim) = ltim_field(puzzle) {
        total += section_size("LTIM", ltim.len())?;
    }
    if let Some(gext) = puzzle.gext() {
        total += section_size("GEXT", gext.len())?;
    }
    if let Some(rusr) = rusr_field(puzzle) {
        total += section_size("RUSR", rusr.len())?;
    }

    Ok(total)
}

fn write_section(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(tag);
    write_u16(out, payload.len() as u16);
    write_u16(out, cksum_region(payload, 0));
    out.extend_from_slice(payload);
    write_u8(out, 0);
}

/// Serializes `puzzle` to its canonical binary form.
pub fn save(puzzle: &Puzzle) -> Result<Vec<u8>, WriteError> {
    let total = size(puzzle)?;
    let mut out = Vec::with_capacity(total);

    write_u16(&mut out, puzzle.cksum_puz());
    out.extend_from_slice(MAGIC);
    write_u16(&mut out, puzzle.cksum_cib());
    out.extend_from_slice(&puzzle.magic_10());
    out.extend_from_slice(&puzzle.magic_14());
    out.extend_from_slice(&puzzle.version().to_bytes());
    out.resize(out.len() + 2, 0); // reserved bytes between 0x1C and 0x1E
    write_u16(&mut out, puzzle.scrambled_cksum());
    out.resize(out.len() + 0x0C, 0); // reserved bytes between 0x20 and 0x2C
    write_u8(&mut out, puzzle.width());
    write_u8(&mut out, puzzle.height());
    write_u16(&mut out, puzzle.clue_count());
    write_u16(&mut out, puzzle.x_unk_30());
    write_u16(&mut out, puzzle.scrambled_tag());
    debug_assert_eq!(out.len(), HEADER_SIZE);

    out.extend_from_slice(puzzle.solution());
    out.extend_from_slice(puzzle.grid());

    write_cstr(&mut out, puzzle.title());
    write_cstr(&mut out, puzzle.author());
    write_cstr(&mut out, puzzle.copyright());
    for clue in puzzle.clues() {
        write_cstr(&mut out, clue);
    }
    // Always present, same as title/author/copyright: an absent notes value
    // is a zero-length string, not an omitted field, so a following section
    // tag can never be mistaken for the start of a notes string on read.
    write_cstr(&mut out, puzzle.notes().unwrap_or(&[]));

    if let Some(grbs) = puzzle.grbs() {
        write_section(&mut out, b"GRBS", grbs);
        write_section(&mut out, b"RTBL", &rtbl_field(puzzle));
    }
    if let Some(ltim) = ltim_field(puzzle) {
        write_section(&mut out, b"LTIM", &ltim);
    }
    if let Some(gext) = puzzle.gext() {
        write_section(&mut out, b"GEXT", gext);
    }
    if let Some(rusr) = rusr_field(puzzle) {
        write_section(&mut out, b"RUSR", &rusr);
    }

    debug_assert_eq!(out.len(), total);
    Ok(out)
}
