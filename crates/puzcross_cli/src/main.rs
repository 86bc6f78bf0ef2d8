mod args;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use memmap2::Mmap;
use tracing_subscriber::EnvFilter;

use args::Args;
use puzcross_puz::{Kind, Puzzle, decode_display, load};

const SEPARATOR: &str = "myuniquelibpuzseparator";

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn print_fields(puzzle: &Puzzle) {
    let fields: Vec<String> = [
        decode_display(puzzle.title()),
        decode_display(puzzle.author()),
        puzzle
            .notes()
            .map(decode_display)
            .unwrap_or_default(),
        puzzle.width().to_string(),
        puzzle.height().to_string(),
        decode_display(puzzle.grid()),
        decode_display(puzzle.solution()),
    ]
    .into_iter()
    .chain(puzzle.clues().iter().map(|clue| decode_display(clue)))
    .collect();

    println!("{}", fields.join(SEPARATOR));
}

fn run(args: Args) -> Result<(), String> {
    let file = File::open(&args.file).map_err(|e| format!("{}: {e}", args.file.display()))?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| format!("{}: {e}", args.file.display()))?;

    let (puzzle, mismatches) = load(Kind::Unknown, &mmap, args.strict).map_err(|e| e.to_string())?;

    for mismatch in &mismatches {
        tracing::warn!(%mismatch, "checksum mismatch");
    }

    print_fields(&puzzle);

    if !mismatches.is_empty() {
        return Err(format!("{} checksum mismatch(es)", mismatches.len()));
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("puzcross: {message}");
            ExitCode::FAILURE
        }
    }
}
