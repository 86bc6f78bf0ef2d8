//! Reading, validating, scrambling, and serializing Across Lite `.puz`
//! crossword files: both the binary container and its plain-text sibling.
//!
//! # Layout
//! - [`codec`] — little-endian byte primitives the rest of the crate builds on.
//! - [`checksum`] — the rotate-and-sum primitive and the masked `magic_10`/`magic_14` derivation.
//! - [`puzzle`] — the [`Puzzle`] aggregate and its accessors.
//! - [`read`] — the binary loader (header, body, trailing sections).
//! - [`write`] — the binary sizer and writer.
//! - [`text`] — the line-oriented text-dialect loader.
//! - [`scramble`] — the solution-locking cipher, its inverse, and brute-force key search.
//! - [`validate`] — recomputing and comparing the top-level checksums.
//! - [`gext`] — the per-cell flag bits carried in the `GEXT` section.
//! - [`strings`] — display-only byte decoding (Windows-1252 fallback).
//! - [`error`] — the error taxonomy every fallible operation returns into.
//!
//! # Strict vs. lenient loading
//! A checksum mismatch is never fatal to [`load`] on its own: the loader
//! always returns the parsed puzzle alongside whatever [`Mismatch`]es were
//! found. Passing `strict: true` turns the first mismatch into an
//! [`enum@Error`] instead. A malformed header, body, or trailing section is
//! always fatal, strict or not — there's no parsed puzzle to hand back.

mod checksum;
mod codec;
pub mod error;
mod gext;
mod puzzle;
mod read;
mod scramble;
pub mod strings;
mod text;
mod validate;
mod write;

pub use checksum::{MagicSums, cksum_region, magic_10, magic_14};
pub use error::{Error, InvalidArgument, Mismatch, ReadError, ScrambleError, TextError, WriteError};
pub use gext::{GextFlags, circled_cells};
pub use puzzle::{
    BLACK_SQUARE, DEFAULT_VERSION, EMPTY_CELL, MAGIC, Puzzle, RtblEntry, SCRAMBLED_TAG_CLEAR,
    SCRAMBLED_TAG_LOCKED,
};
pub use read::HEADER_SIZE;
pub use scramble::{brute_force_unlock, canonical_indices, canonical_solution, lock, unlock};
pub use strings::{decode_display, windows_1252_to_char};
pub use validate::{CalculatedChecksums, cksums_calc, cksums_check, cksums_commit, is_valid};
pub use write::{save, size};

/// Which of the two sibling formats a buffer is in, or that the caller wants
/// [`load`] to sniff it out from the bytes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Binary,
    Text,
    Unknown,
}

fn looks_binary(buf: &[u8]) -> bool {
    buf.len() >= 0x0E && buf[2..14] == *puzzle::MAGIC
}

/// Parses `buffer` as either the binary container or the text dialect,
/// producing a [`Puzzle`] plus whatever checksum mismatches the validator
/// found. `Kind::Unknown` sniffs the binary magic at its fixed offset and
/// falls back to the text dialect otherwise.
///
/// Structural failures (a truncated header, a missing `RTBL` after a
/// populated `GRBS`, malformed `<SIZE>` body, …) always abort the load and
/// return an error — `strict` only governs what happens to non-fatal
/// checksum mismatches.
pub fn load(kind: Kind, buffer: &[u8], strict: bool) -> Result<(Puzzle, Vec<Mismatch>), Error> {
    let binary = match kind {
        Kind::Binary => true,
        Kind::Text => false,
        Kind::Unknown => looks_binary(buffer),
    };

    let (parsed, mismatches) = if binary {
        let parsed = read::parse(buffer)?;
        let mismatches = validate::cksums_check(&parsed);
        (parsed, mismatches)
    } else {
        let text = String::from_utf8_lossy(buffer);
        let parsed = text::parse(&text)?;
        (parsed, Vec::new())
    };

    if strict && !mismatches.is_empty() {
        return Err(Error::ChecksumMismatch(mismatches.len()));
    }

    Ok((parsed, mismatches))
}
