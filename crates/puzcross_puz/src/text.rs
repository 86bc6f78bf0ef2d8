//! The plain-text dialect: a line-oriented state machine over
//! `<ACROSS PUZZLE>`/`<TITLE>`/`<AUTHOR>`/`<COPYRIGHT>`/`<SIZE>`/`<GRID>`/
//! `<ACROSS>`/`<DOWN>` delimiters that produces the same in-memory [`Puzzle`]
//! a binary load would.

use crate::error::TextError;
use crate::puzzle::Puzzle;
use crate::validate::cksums_commit;
use puzcross_core::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    File,
    Title,
    Author,
    Copyright,
    Size,
    Grid,
    Clue0,
    Clue1,
    Final,
}

impl State {
    /// The single delimiter that advances out of this state, or `None` if
    /// only end-of-input can end it.
    fn next_magic(self) -> Option<&'static str> {
        match self {
            State::Init => Some("<ACROSS PUZZLE>"),
            State::File => Some("<TITLE>"),
            State::Title => Some("<AUTHOR>"),
            State::Author => Some("<COPYRIGHT>"),
            State::Copyright => Some("<SIZE>"),
            State::Size => Some("<GRID>"),
            State::Grid => Some("<ACROSS>"),
            State::Clue0 => Some("<DOWN>"),
            State::Clue1 | State::Final => None,
        }
    }

    fn after(self) -> State {
        match self {
            State::Init => State::File,
            State::File => State::Title,
            State::Title => State::Author,
            State::Author => State::Copyright,
            State::Copyright => State::Size,
            State::Size => State::Grid,
            State::Grid => State::Clue0,
            State::Clue0 => State::Clue1,
            State::Clue1 | State::Final => State::Final,
        }
    }
}

/// Splits `input` on any of `\n`, `\r`, `\r\n`, or `\n\r`, then trims leading
/// and trailing whitespace off each resulting line. The odd `\n\r` pairing is
/// kept for bug-compatibility with the legacy producers this format comes from.
fn lines(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => {
                out.push(input[start..i].trim().to_string());
                let other = if bytes[i] == b'\n' { b'\r' } else { b'\n' };
                i += 1;
                if i < bytes.len() && bytes[i] == other {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        out.push(input[start..].trim().to_string());
    }

    out
}

fn concat_bytes(bucket: &[String]) -> Vec<u8> {
    bucket.iter().flat_map(|line| line.bytes()).collect()
}

fn parse_size(body: &str) -> Result<(u8, u8), TextError> {
    let err = || TextError::MalformedSize {
        body: body.to_string(),
    };

    let (w, h) = body.split_once('x').ok_or_else(err)?;
    let width: u8 = w.trim().parse().map_err(|_| err())?;
    let height: u8 = h.trim().parse().map_err(|_| err())?;
    Ok((width, height))
}

/// Processes the bucket accumulated while in `state`, mutating `puzzle`
/// according to which state is being exited. [`State::Clue0`]'s bucket is
/// deliberately left untouched by its caller so [`State::Clue1`] can keep
/// appending to it.
fn exit_state(state: State, bucket: &[String], puzzle: &mut Puzzle) -> Result<(), TextError> {
    match state {
        State::Init | State::File | State::Clue0 | State::Final => {}
        State::Title => {
            puzzle.set_title(concat_bytes(bucket));
        }
        State::Author => {
            puzzle.set_author(concat_bytes(bucket));
        }
        State::Copyright => {
            puzzle.set_copyright(concat_bytes(bucket));
        }
        State::Size => {
            let joined = bucket.join("");
            let (width, height) = parse_size(&joined)?;
            puzzle.set_dimensions(width, height);
        }
        State::Grid => {
            if bucket.is_empty() {
                return Err(TextError::EmptyGrid);
            }
            let rows: Vec<Vec<u8>> = bucket.iter().map(|line| line.bytes().collect()).collect();
            let solution = Grid::from_rows(rows, puzzle.width() as usize, puzzle.height() as usize)?.into_data();
            let grid = Puzzle::grid_from_solution(&solution);
            puzzle.set_solution(solution);
            puzzle.set_grid(grid);
        }
        State::Clue1 => {
            puzzle.clear_clues();
            let clues: Vec<Vec<u8>> = bucket.iter().map(|line| line.as_bytes().to_vec()).collect();
            puzzle
                .clue_count_set(clues.len() as u16)
                .expect("clear_clues just ran");
            for (index, clue) in clues.into_iter().enumerate() {
                puzzle.set_clue(index, clue).expect("index within freshly allocated range");
            }
        }
    }

    Ok(())
}

/// Parses a plain-text `.puz` sibling into a [`Puzzle`], committing the same
/// checksums a binary loader would have found on disk since the text dialect
/// doesn't carry any of its own.
pub fn parse(input: &str) -> Result<Puzzle, TextError> {
    let mut puzzle = Puzzle::new();
    let mut state = State::Init;
    let mut bucket: Vec<String> = Vec::new();

    for line in lines(input) {
        if Some(line.as_str()) == state.next_magic() {
            exit_state(state, &bucket, &mut puzzle)?;
            if state != State::Clue0 {
                bucket.clear();
            }
            state = state.after();
        } else {
            bucket.push(line);
        }
    }

    exit_state(state, &bucket, &mut puzzle)?;
    cksums_commit(&mut puzzle);

    Ok(puzzle)
}
