//! The in-memory puzzle aggregate and its typed accessors.

use puzcross_core::{Timer, TimerState, Version};

use crate::error::InvalidArgument;

/// Magic bytes stamped at the start of every binary puzzle.
pub const MAGIC: &[u8; 12] = b"ACROSS&DOWN\0";

/// Default version written into a freshly constructed puzzle.
pub const DEFAULT_VERSION: Version = Version::new(1, 2);

/// Value of `scrambled_tag` when the solution is locked.
pub const SCRAMBLED_TAG_LOCKED: u16 = 4;

/// Value of `scrambled_tag` when the solution is in the clear.
pub const SCRAMBLED_TAG_CLEAR: u16 = 0;

/// Cell value used for black squares in both `solution` and `grid`.
pub const BLACK_SQUARE: u8 = b'.';

/// Cell value used for an unfilled player cell in `grid`.
pub const EMPTY_CELL: u8 = b'-';

/// A single `rtbl` entry: a decimal key (matching `grbs` byte minus one) and its rebus word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtblEntry {
    pub key: u16,
    pub word: Vec<u8>,
}

impl RtblEntry {
    pub fn new(key: u16, word: impl Into<Vec<u8>>) -> Self {
        Self { key, word: word.into() }
    }

    /// Renders this entry as `"KK:word"`, the form `rtbl`'s checksum and the text
    /// dialect both operate on.
    pub fn to_field(&self) -> Vec<u8> {
        let mut out = self.key.to_string().into_bytes();
        out.push(b':');
        out.extend_from_slice(&self.word);
        out
    }
}

/// The `.puz` puzzle aggregate, owning every semantic field a crossword carries.
///
/// Construction yields an all-zero puzzle with `magic`/`version` set and
/// `x_unk_30 = 1`. Every heap-backed field is owned outright; nothing here
/// borrows from a loader's input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    version: Version,
    width: u8,
    height: u8,
    clue_count: u16,
    x_unk_30: u16,
    scrambled_tag: u16,
    scrambled_cksum: u16,

    cksum_puz: u16,
    cksum_cib: u16,
    magic_10: [u8; 4],
    magic_14: [u8; 4],

    solution: Vec<u8>,
    grid: Vec<u8>,

    title: Vec<u8>,
    author: Vec<u8>,
    copyright: Vec<u8>,
    clues: Vec<Vec<u8>>,
    clue_count_is_set: bool,
    notes: Option<Vec<u8>>,

    grbs: Option<Vec<u8>>,
    rtbl: Option<Vec<RtblEntry>>,
    ltim: Option<Timer>,
    gext: Option<Vec<u8>>,
    rusr: Option<Vec<Option<Vec<u8>>>>,
    rusr_sz: usize,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Puzzle {
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION,
            width: 0,
            height: 0,
            clue_count: 0,
            x_unk_30: 1,
            scrambled_tag: SCRAMBLED_TAG_CLEAR,
            scrambled_cksum: 0,
            cksum_puz: 0,
            cksum_cib: 0,
            magic_10: [0; 4],
            magic_14: [0; 4],
            solution: Vec::new(),
            grid: Vec::new(),
            title: Vec::new(),
            author: Vec::new(),
            copyright: Vec::new(),
            clues: Vec::new(),
            clue_count_is_set: false,
            notes: None,
            grbs: None,
            rtbl: None,
            ltim: None,
            gext: None,
            rusr: None,
            rusr_sz: 0,
        }
    }

    /// Board area `W * H`.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Sets the board dimensions. Does not resize `solution`/`grid`; callers
    /// set those explicitly (both must end up with length `W*H`).
    pub fn set_dimensions(&mut self, width: u8, height: u8) {
        self.width = width;
        self.height = height;
    }

    pub fn x_unk_30(&self) -> u16 {
        self.x_unk_30
    }

    pub(crate) fn set_x_unk_30(&mut self, value: u16) {
        self.x_unk_30 = value;
    }

    pub fn scrambled_tag(&self) -> u16 {
        self.scrambled_tag
    }

    pub(crate) fn set_scrambled_tag(&mut self, tag: u16) {
        self.scrambled_tag = tag;
    }

    pub fn scrambled_cksum(&self) -> u16 {
        self.scrambled_cksum
    }

    pub(crate) fn set_scrambled_cksum(&mut self, cksum: u16) {
        self.scrambled_cksum = cksum;
    }

    /// Convenience atop the raw tag: `true` iff `scrambled_tag == 4`.
    pub fn is_locked(&self) -> bool {
        self.scrambled_tag == SCRAMBLED_TAG_LOCKED
    }

    pub fn cksum_puz(&self) -> u16 {
        self.cksum_puz
    }

    pub(crate) fn set_cksum_puz(&mut self, value: u16) {
        self.cksum_puz = value;
    }

    pub fn cksum_cib(&self) -> u16 {
        self.cksum_cib
    }

    pub(crate) fn set_cksum_cib(&mut self, value: u16) {
        self.cksum_cib = value;
    }

    pub fn magic_10(&self) -> [u8; 4] {
        self.magic_10
    }

    pub(crate) fn set_magic_10(&mut self, value: [u8; 4]) {
        self.magic_10 = value;
    }

    pub fn magic_14(&self) -> [u8; 4] {
        self.magic_14
    }

    pub(crate) fn set_magic_14(&mut self, value: [u8; 4]) {
        self.magic_14 = value;
    }

    pub fn solution(&self) -> &[u8] {
        &self.solution
    }

    pub fn set_solution(&mut self, solution: Vec<u8>) -> &[u8] {
        self.solution = solution;
        &self.solution
    }

    pub fn solution_mut(&mut self) -> &mut [u8] {
        &mut self.solution
    }

    pub fn grid(&self) -> &[u8] {
        &self.grid
    }

    pub fn set_grid(&mut self, grid: Vec<u8>) -> &[u8] {
        self.grid = grid;
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut [u8] {
        &mut self.grid
    }

    /// Derives a player grid from a solution: every non-`.` byte becomes `-`.
    pub fn grid_from_solution(solution: &[u8]) -> Vec<u8> {
        solution
            .iter()
            .map(|&b| if b == BLACK_SQUARE { BLACK_SQUARE } else { EMPTY_CELL })
            .collect()
    }

    pub fn title(&self) -> &[u8] {
        &self.title
    }

    pub fn set_title(&mut self, title: Vec<u8>) -> &[u8] {
        self.title = title;
        &self.title
    }

    pub fn author(&self) -> &[u8] {
        &self.author
    }

    pub fn set_author(&mut self, author: Vec<u8>) -> &[u8] {
        self.author = author;
        &self.author
    }

    pub fn copyright(&self) -> &[u8] {
        &self.copyright
    }

    pub fn set_copyright(&mut self, copyright: Vec<u8>) -> &[u8] {
        self.copyright = copyright;
        &self.copyright
    }

    pub fn clue_count(&self) -> u16 {
        self.clue_count
    }

    pub fn clues(&self) -> &[Vec<u8>] {
        &self.clues
    }

    /// One-shot: allocates the clue array. Fails if the clue count has
    /// already been set — including to zero — since resizing an
    /// already-set clue list requires an explicit `clear_clues` first.
    pub fn clue_count_set(&mut self, clue_count: u16) -> Result<(), InvalidArgument> {
        if self.clue_count_is_set {
            return Err(InvalidArgument::ClueCountAlreadySet {
                clue_count: self.clue_count,
            });
        }
        self.clue_count = clue_count;
        self.clues = vec![Vec::new(); clue_count as usize];
        self.clue_count_is_set = true;
        Ok(())
    }

    pub fn clue(&self, index: usize) -> Result<&[u8], InvalidArgument> {
        self.clues
            .get(index)
            .map(Vec::as_slice)
            .ok_or(InvalidArgument::IndexOutOfRange {
                index,
                len: self.clues.len(),
            })
    }

    pub fn set_clue(&mut self, index: usize, clue: Vec<u8>) -> Result<(), InvalidArgument> {
        let len = self.clues.len();
        let slot = self
            .clues
            .get_mut(index)
            .ok_or(InvalidArgument::IndexOutOfRange { index, len })?;
        *slot = clue;
        Ok(())
    }

    /// Replaces the clue list wholesale and updates `clue_count` to match.
    pub fn set_clues(&mut self, clues: Vec<Vec<u8>>) {
        self.clue_count = clues.len() as u16;
        self.clues = clues;
        self.clue_count_is_set = true;
    }

    pub fn clear_clues(&mut self) {
        self.clue_count = 0;
        self.clues.clear();
        self.clue_count_is_set = false;
    }

    pub fn notes(&self) -> Option<&[u8]> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<Vec<u8>>) {
        self.notes = notes;
    }

    pub fn has_rebus(&self) -> bool {
        self.grbs.is_some()
    }

    pub fn grbs(&self) -> Option<&[u8]> {
        self.grbs.as_deref()
    }

    pub fn rtbl(&self) -> Option<&[RtblEntry]> {
        self.rtbl.as_deref()
    }

    /// Sets both the rebus grid and its table together: `grbs` is only ever
    /// meaningful alongside a populated `rtbl`.
    pub fn rebus_set(&mut self, grbs: Vec<u8>, rtbl: Vec<RtblEntry>) {
        self.grbs = Some(grbs);
        self.rtbl = Some(rtbl);
    }

    pub fn clear_rebus_table(&mut self) {
        self.grbs = None;
        self.rtbl = None;
    }

    pub fn has_timer(&self) -> bool {
        self.ltim.is_some()
    }

    pub fn ltim(&self) -> Option<Timer> {
        self.ltim
    }

    pub fn set_timer(&mut self, elapsed_secs: u32, state: TimerState) {
        self.ltim = Some(Timer::new(elapsed_secs, state));
    }

    pub fn clear_timer(&mut self) {
        self.ltim = None;
    }

    pub fn has_extras(&self) -> bool {
        self.gext.is_some()
    }

    pub fn gext(&self) -> Option<&[u8]> {
        self.gext.as_deref()
    }

    pub fn set_gext(&mut self, gext: Vec<u8>) {
        self.gext = Some(gext);
    }

    pub fn clear_extras(&mut self) {
        self.gext = None;
    }

    /// Board indices with the `CIRCLED` flag set, or an empty vector if the
    /// puzzle has no `GEXT` section at all.
    pub fn circled_cells(&self) -> Vec<usize> {
        self.gext
            .as_deref()
            .map(|gext| crate::gext::circled_cells(gext).collect())
            .unwrap_or_default()
    }

    pub fn has_rusr(&self) -> bool {
        self.rusr.is_some()
    }

    pub fn rusr(&self) -> Option<&[Option<Vec<u8>>]> {
        self.rusr.as_deref()
    }

    /// Total bytes consumed by the RUSR payload, excluding the checksum field.
    pub fn rusr_sz(&self) -> usize {
        self.rusr_sz
    }

    pub fn rusr_set(&mut self, entries: Vec<Option<Vec<u8>>>, rusr_sz: usize) {
        self.rusr = Some(entries);
        self.rusr_sz = rusr_sz;
    }

    pub fn clear_user_rebus(&mut self) {
        self.rusr = None;
        self.rusr_sz = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_puzzle_has_invariant_defaults() {
        let puzzle = Puzzle::new();
        assert_eq!(puzzle.version(), DEFAULT_VERSION);
        assert_eq!(puzzle.x_unk_30(), 1);
        assert_eq!(puzzle.scrambled_tag(), SCRAMBLED_TAG_CLEAR);
        assert!(!puzzle.is_locked());
    }

    #[test]
    fn clue_count_set_is_one_shot() {
        let mut puzzle = Puzzle::new();
        puzzle.clue_count_set(3).unwrap();
        assert_eq!(puzzle.clue_count(), 3);
        assert!(puzzle.clue_count_set(4).is_err());

        puzzle.clear_clues();
        puzzle.clue_count_set(4).unwrap();
        assert_eq!(puzzle.clue_count(), 4);
    }

    #[test]
    fn clue_count_set_to_zero_is_still_one_shot() {
        let mut puzzle = Puzzle::new();
        puzzle.clue_count_set(0).unwrap();
        assert_eq!(puzzle.clue_count(), 0);
        assert!(puzzle.clues().is_empty());

        // A zero-clue puzzle must not look "never set": a second call has to
        // fail until `clear_clues` runs, same as any other count.
        assert!(puzzle.clue_count_set(4).is_err());

        puzzle.clear_clues();
        puzzle.clue_count_set(4).unwrap();
        assert_eq!(puzzle.clue_count(), 4);
    }

    #[test]
    fn grid_from_solution_replaces_non_black_with_dash() {
        let solution = b"AB.C".to_vec();
        assert_eq!(Puzzle::grid_from_solution(&solution), b"--.-");
    }

    #[test]
    fn rtbl_entry_renders_as_key_colon_word() {
        let entry = RtblEntry::new(12, b"OXYGEN".to_vec());
        assert_eq!(entry.to_field(), b"12:OXYGEN");
    }

    #[test]
    fn circled_cells_reads_through_gext() {
        let mut puzzle = Puzzle::new();
        assert!(puzzle.circled_cells().is_empty());

        puzzle.set_gext(vec![0x00, 0x80, 0x00]);
        assert_eq!(puzzle.circled_cells(), vec![1]);
    }
}
