//! Per-cell flags carried in the `GEXT` trailing section.
//!
//! A `GEXT` byte is a real bitmask with four flags in active use by
//! comparable Across Lite tooling, not just the circled bit; modeling the
//! whole byte (rather than a bare `bool`) costs nothing and gives callers
//! the other three for free.

use bitflags::bitflags;

bitflags! {
    /// Flags packed into a single `GEXT` byte, one per board cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GextFlags: u8 {
        /// The cell previously held an incorrect guess.
        const PREVIOUSLY_INCORRECT = 0x10;
        /// The cell currently holds an incorrect guess.
        const INCORRECT = 0x20;
        /// The cell's solution was revealed by the user.
        const REVEALED = 0x40;
        /// The cell is circled, e.g. to mark a hidden inner answer.
        const CIRCLED = 0x80;
    }
}

/// Positions (board indices) with the `CIRCLED` bit set.
pub fn circled_cells(gext: &[u8]) -> impl Iterator<Item = usize> + '_ {
    gext.iter()
        .enumerate()
        .filter(|&(_, &byte)| GextFlags::from_bits_truncate(byte).contains(GextFlags::CIRCLED))
        .map(|(i, _)| i)
}
