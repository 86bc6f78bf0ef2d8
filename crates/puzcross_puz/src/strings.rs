//! Display-only byte decoding.
//!
//! Every string on [`Puzzle`] stays a raw byte buffer; checksums are computed
//! over those bytes exactly as stored — the aggregate owns byte strings, not
//! text. This module exists only for callers that want to *print* a field:
//! legacy `.puz` producers wrote extended Latin characters as Windows-1252
//! bytes, so a naive UTF-8 decode of a title or clue can fail or mangle
//! curly quotes and em dashes.

use std::fmt;

use crate::puzzle::Puzzle;

/// Decodes `bytes` for display, trying UTF-8 first and falling back to a
/// byte-by-byte Windows-1252 mapping. Never fails: every byte has some
/// mapping, even if it lands on an otherwise-unused code point.
pub fn decode_display(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| windows_1252_to_char(b)).collect(),
    }
}

/// Maps a single Windows-1252 byte to its Unicode scalar value.
///
/// Bytes 0x00-0x7F and 0xA0-0xFF agree with Latin-1/ISO-8859-1; 0x80-0x9F
/// is where Windows-1252 diverges with curly quotes, dashes, and a handful
/// of accented letters.
pub fn windows_1252_to_char(byte: u8) -> char {
    match byte {
        0..=0x7F | 0xA0..=0xFF => byte as char,
        0x80 => '\u{20AC}',
        0x81 => '\u{0081}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8D => '\u{008D}',
        0x8E => '\u{017D}',
        0x8F => '\u{008F}',
        0x90 => '\u{0090}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9D => '\u{009D}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" by {} ({}x{}, {} clues)",
            decode_display(self.title()),
            decode_display(self.author()),
            self.width(),
            self.height(),
            self.clue_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips_through_utf8() {
        assert_eq!(decode_display(b"Hello"), "Hello");
    }

    #[test]
    fn high_byte_falls_back_to_windows_1252() {
        // 0x93/0x94 are curly double quotes in Windows-1252, not valid UTF-8
        // continuation bytes on their own.
        let bytes = [0x93, b'h', b'i', 0x94];
        assert_eq!(decode_display(&bytes), "\u{201C}hi\u{201D}");
    }

    #[test]
    fn display_includes_title_author_and_dimensions() {
        let mut puzzle = Puzzle::new();
        puzzle.set_title(b"Test".to_vec());
        puzzle.set_author(b"Author".to_vec());
        puzzle.set_dimensions(3, 3);
        puzzle.set_clues(vec![b"a".to_vec()]);

        assert_eq!(puzzle.to_string(), "\"Test\" by Author (3x3, 1 clues)");
    }
}
