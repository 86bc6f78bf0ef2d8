use std::fmt;

/// Failures while parsing the fixed-width binary header and body.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("buffer is {len} bytes, shorter than the {min}-byte header")]
    BufferTooShort { len: usize, min: usize },

    #[error("header field `{field}` at offset {offset:#x} is out of range: {detail}")]
    MalformedHeader {
        field: &'static str,
        offset: usize,
        detail: String,
    },

    #[error("expected a NUL-terminated string starting at offset {offset}, found none within {bound} bytes")]
    UnterminatedString { offset: usize, bound: usize },

    #[error("clue_count is {clue_count} but only {found} clues were present in the body")]
    ClueCountMismatch { clue_count: u16, found: usize },

    #[error("GRBS section has a non-zero cell but no following RTBL section")]
    MissingRtbl,

    #[error("section `{tag}` at offset {offset} claims length {len} but only {remaining} bytes remain")]
    SectionTruncated {
        tag: String,
        offset: usize,
        len: usize,
        remaining: usize,
    },

    #[error("section `{tag}` at offset {offset} returned zero bytes of payload")]
    EmptySection { tag: String, offset: usize },

    #[error("RUSR entry at cell {cell} exceeds the 100-byte limit ({len} bytes)")]
    RusrEntryTooLong { cell: usize, len: usize },

    #[error("LTIM payload `{raw}` is not of the form `elapsed,stopped`")]
    MalformedTimer { raw: String },
}

/// Failures while computing a serialized size or writing canonical bytes.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("size of {kind} section is overflowing (found {size}, expected <= {max_size})")]
    SizeOverflow {
        kind: &'static str,
        size: usize,
        max_size: usize,
    },

    #[error("solution/grid length {found} does not match width*height ({expected})")]
    BoardLengthMismatch { found: usize, expected: usize },

    #[error("clue_count is {clue_count} but {found} clues are stored")]
    ClueCountMismatch { clue_count: u16, found: usize },
}

/// Scramble/unlock outcomes, as a typed enum in place of raw legacy return codes.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleError {
    #[error("puzzle is not locked")]
    NotLocked,

    #[error("code does not match the locked solution's checksum")]
    WrongKey,

    #[error("unlock code must be 4 digits, each in 1..=9")]
    InvalidCode,

    #[error("puzzle is null or empty")]
    NullPuzzle,

    #[error("no code in 1111..=9999 (skipping any digit 0) unlocked the puzzle")]
    BruteForceExhausted,
}

impl ScrambleError {
    /// Recovers the legacy integer return code this variant corresponds to.
    pub fn code(self) -> i32 {
        match self {
            ScrambleError::NotLocked => 1,
            ScrambleError::WrongKey => 2,
            ScrambleError::InvalidCode => -1,
            ScrambleError::NullPuzzle => -2,
            ScrambleError::BruteForceExhausted => -3,
        }
    }
}

/// Failures while parsing the plain-text dialect.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("`<SIZE>` body `{body}` is not of the form `WxH` with decimal W, H")]
    MalformedSize { body: String },

    #[error("`<GRID>` section is empty")]
    EmptyGrid,

    #[error(transparent)]
    Grid(#[from] puzcross_core::GridError),
}

/// Argument and state-precondition failures shared across operations.
#[derive(Debug, thiserror::Error)]
pub enum InvalidArgument {
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("clue_count can only be set once on an empty puzzle; {clue_count} clues already present")]
    ClueCountAlreadySet { clue_count: u16 },
}

/// Top-level error unifying every fallible operation, for callers (notably the CLI adapter)
/// that don't want to match on the per-concern enums individually.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Scramble(#[from] ScrambleError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error("checksum validation found {0} mismatch(es)")]
    ChecksumMismatch(usize),
}

/// A single checksum disagreement found by the validator.
///
/// Never fatal on its own: the loader always returns the parsed puzzle
/// alongside whatever mismatches were found instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub field: &'static str,
    pub parsed: u16,
    pub calculated: u16,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: parsed {:#06x} != calculated {:#06x}",
            self.field, self.parsed, self.calculated
        )
    }
}
