//! The binary loader: header, body, clues/notes, and the trailing section
//! loop.

use puzcross_core::{TimerState, Version};

use crate::codec::{MAX_CSTR_LEN, read_cstr, read_u16, read_u8};
use crate::error::ReadError;
use crate::puzzle::{Puzzle, RtblEntry};

/// Size of the fixed binary header.
pub const HEADER_SIZE: usize = 0x34;

const OFFSET_CKSUM_PUZ: usize = 0x00;
const OFFSET_MAGIC: usize = 0x02;
const OFFSET_CKSUM_CIB: usize = 0x0E;
const OFFSET_MAGIC_10: usize = 0x10;
const OFFSET_MAGIC_14: usize = 0x14;
const OFFSET_VERSION: usize = 0x18;
const OFFSET_SCRAMBLED_CKSUM: usize = 0x1E;
const OFFSET_WIDTH: usize = 0x2C;
const OFFSET_HEIGHT: usize = 0x2D;
const OFFSET_CLUE_COUNT: usize = 0x2E;
const OFFSET_X_UNK_30: usize = 0x30;
const OFFSET_SCRAMBLED_TAG: usize = 0x32;

fn read_array4(buf: &[u8], offset: usize) -> [u8; 4] {
    [buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]]
}

/// Parses the 52-byte header plus the 8-byte CIB block captured from it.
fn parse_header(buf: &[u8]) -> Result<(), ReadError> {
    if buf.len() < HEADER_SIZE {
        return Err(ReadError::BufferTooShort {
            len: buf.len(),
            min: HEADER_SIZE,
        });
    }
    Ok(())
}

/// Parses a complete binary `.puz` buffer into a [`Puzzle`], performing only
/// the structural parse — checksum validation is a separate step (see
/// [`crate::validate::cksums_check`]).
pub fn parse(buf: &[u8]) -> Result<Puzzle, ReadError> {
    parse_header(buf)?;

    let mut puzzle = Puzzle::new();

    let cksum_puz = read_u16(buf, OFFSET_CKSUM_PUZ).expect("bounds checked by parse_header");
    let cksum_cib = read_u16(buf, OFFSET_CKSUM_CIB).expect("bounds checked by parse_header");
    let magic_10 = read_array4(buf, OFFSET_MAGIC_10);
    let magic_14 = read_array4(buf, OFFSET_MAGIC_14);
    let scrambled_cksum = read_u16(buf, OFFSET_SCRAMBLED_CKSUM).expect("bounds checked");
    let width = read_u8(buf, OFFSET_WIDTH).expect("bounds checked");
    let height = read_u8(buf, OFFSET_HEIGHT).expect("bounds checked");
    let clue_count = read_u16(buf, OFFSET_CLUE_COUNT).expect("bounds checked");
    let x_unk_30 = read_u16(buf, OFFSET_X_UNK_30).expect("bounds checked");
    let scrambled_tag = read_u16(buf, OFFSET_SCRAMBLED_TAG).expect("bounds checked");

    let version = Version::from_bytes(&buf[OFFSET_VERSION..OFFSET_VERSION + 4]).map_err(|e| {
        ReadError::MalformedHeader {
            field: "version",
            offset: OFFSET_VERSION,
            detail: e.to_string(),
        }
    })?;

    let magic = &buf[OFFSET_MAGIC..OFFSET_MAGIC + 12];
    if magic != crate::puzzle::MAGIC {
        return Err(ReadError::MalformedHeader {
            field: "magic",
            offset: OFFSET_MAGIC,
            detail: format!("expected {:?}, found {:?}", crate::puzzle::MAGIC, magic),
        });
    }

    puzzle.set_cksum_puz(cksum_puz);
    puzzle.set_cksum_cib(cksum_cib);
    puzzle.set_magic_10(magic_10);
    puzzle.set_magic_14(magic_14);
    puzzle.set_version(version);
    puzzle.set_scrambled_cksum(scrambled_cksum);
    puzzle.set_dimensions(width, height);
    puzzle.set_scrambled_tag(scrambled_tag);
    puzzle.set_x_unk_30(x_unk_30);

    let area = width as usize * height as usize;
    let mut offset = HEADER_SIZE;

    let solution = buf
        .get(offset..offset + area)
        .ok_or(ReadError::BufferTooShort {
            len: buf.len(),
            min: offset + area,
        })?
        .to_vec();
    offset += area;

    let grid = buf
        .get(offset..offset + area)
        .ok_or(ReadError::BufferTooShort {
            len: buf.len(),
            min: offset + area,
        })?
        .to_vec();
    offset += area;

    puzzle.set_solution(solution);
    puzzle.set_grid(grid);

    let (title, next) = read_cstr(buf, offset, MAX_CSTR_LEN)?;
    puzzle.set_title(title.to_vec());
    offset = next;

    let (author, next) = read_cstr(buf, offset, MAX_CSTR_LEN)?;
    puzzle.set_author(author.to_vec());
    offset = next;

    let (copyright, next) = read_cstr(buf, offset, MAX_CSTR_LEN)?;
    puzzle.set_copyright(copyright.to_vec());
    offset = next;

    let mut clues = Vec::with_capacity(clue_count as usize);
    for _ in 0..clue_count {
        let (clue, next) =
            read_cstr(buf, offset, MAX_CSTR_LEN).map_err(|_| ReadError::ClueCountMismatch {
                clue_count,
                found: clues.len(),
            })?;
        clues.push(clue.to_vec());
        offset = next;
    }
    puzzle.set_clues(clues);

    // Always present, same as title/author/copyright: an absent notes value
    // was serialized as a zero-length string, not omitted, so the section
    // loop below can rely on this NUL already being consumed.
    let (notes, next) = read_cstr(buf, offset, MAX_CSTR_LEN)?;
    puzzle.set_notes(if notes.is_empty() { None } else { Some(notes.to_vec()) });
    offset = next;

    read_sections(buf, offset, area, &mut puzzle)?;

    Ok(puzzle)
}

fn tag_at(buf: &[u8], offset: usize) -> Option<[u8; 4]> {
    buf.get(offset..offset + 4).map(|s| [s[0], s[1], s[2], s[3]])
}

/// Reads one `TAG[4] | len[2 LE] | cksum[2 LE] | payload[len] | \0` frame,
/// returning the tag string, checksum, payload slice, and the offset just
/// past the frame's trailing NUL.
fn read_frame<'b>(
    buf: &'b [u8],
    offset: usize,
) -> Result<(String, u16, &'b [u8], usize), ReadError> {
    let tag_bytes = tag_at(buf, offset).ok_or(ReadError::SectionTruncated {
        tag: String::from_utf8_lossy(&buf[offset..]).into_owned(),
        offset,
        len: 0,
        remaining: buf.len() - offset,
    })?;
    let tag = String::from_utf8_lossy(&tag_bytes).into_owned();

    let len = read_u16(buf, offset + 4).ok_or(ReadError::SectionTruncated {
        tag: tag.clone(),
        offset,
        len: 0,
        remaining: buf.len().saturating_sub(offset),
    })? as usize;

    let cksum_off = offset + 6;
    let payload_off = cksum_off + 2;
    let payload_end = payload_off + len;

    if buf.len() < payload_end + 1 {
        return Err(ReadError::SectionTruncated {
            tag,
            offset,
            len,
            remaining: buf.len().saturating_sub(payload_off),
        });
    }

    if len == 0 {
        return Err(ReadError::EmptySection { tag, offset });
    }

    let cksum = read_u16(buf, cksum_off).expect("bounds checked above");
    let payload = &buf[payload_off..payload_end];

    Ok((tag, cksum, payload, payload_end + 1))
}

fn read_sections(
    buf: &[u8],
    mut offset: usize,
    area: usize,
    puzzle: &mut Puzzle,
) -> Result<(), ReadError> {
    while buf.len().saturating_sub(offset) >= 6 {
        let tag_bytes = tag_at(buf, offset).expect("checked by loop condition");

        match &tag_bytes {
            b"GRBS" => {
                let (_, _cksum, payload, next) = read_frame(buf, offset)?;
                let all_zero = payload.iter().all(|&b| b == 0);
                offset = next;

                if all_zero {
                    // An all-zero rebus grid carries no information; discard it.
                    if tag_at(buf, offset) == Some(*b"RTBL") {
                        let (_, _cksum, _payload, next) = read_frame(buf, offset)?;
                        offset = next;
                    }
                } else {
                    let grbs = payload.to_vec();
                    if tag_at(buf, offset) != Some(*b"RTBL") {
                        return Err(ReadError::MissingRtbl);
                    }
                    let (_, _cksum, rtbl_payload, next) = read_frame(buf, offset)?;
                    let rtbl = parse_rtbl(rtbl_payload);
                    puzzle.rebus_set(grbs, rtbl);
                    offset = next;
                }
            }
            b"RTBL" => {
                return Err(ReadError::MissingRtbl);
            }
            b"LTIM" => {
                let (tag, _cksum, payload, next) = read_frame(buf, offset)?;
                let raw = String::from_utf8_lossy(payload).into_owned();
                let (elapsed, stopped) =
                    raw.split_once(',').ok_or_else(|| ReadError::MalformedTimer { raw: raw.clone() })?;
                let elapsed: u32 = elapsed
                    .parse()
                    .map_err(|_| ReadError::MalformedTimer { raw: raw.clone() })?;
                let stopped_flag: u8 = stopped
                    .parse()
                    .map_err(|_| ReadError::MalformedTimer { raw: raw.clone() })?;
                let state = TimerState::try_from(stopped_flag)
                    .map_err(|_| ReadError::MalformedTimer { raw })?;
                let _ = tag;
                puzzle.set_timer(elapsed, state);
                offset = next;
            }
            b"GEXT" => {
                let (_, _cksum, payload, next) = read_frame(buf, offset)?;
                puzzle.set_gext(payload.to_vec());
                offset = next;
            }
            b"RUSR" => {
                let (_, _cksum, payload, next) = read_frame(buf, offset)?;
                let entries = parse_rusr(payload, area)?;
                puzzle.rusr_set(entries, payload.len());
                offset = next;
            }
            other => {
                let tag = String::from_utf8_lossy(other).into_owned();
                let len = read_u16(buf, offset + 4).unwrap_or(0) as usize;
                tracing::warn!(tag = %tag, len, "skipping unknown .puz trailing section");
                offset += 6 + len + 1;
            }
        }
    }

    Ok(())
}

fn parse_rtbl(payload: &[u8]) -> Vec<RtblEntry> {
    let text = String::from_utf8_lossy(payload);
    text.split(';')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (key, word) = entry.split_once(':')?;
            let key: u16 = key.trim().parse().ok()?;
            Some(RtblEntry::new(key, word.as_bytes().to_vec()))
        })
        .collect()
}

/// Each RUSR entry is bounded to 100 bytes (spec.md §4.4); the bound is
/// enforced by `read_cstr` itself rather than checked after the fact.
const MAX_RUSR_ENTRY_LEN: usize = 100;

fn parse_rusr(payload: &[u8], area: usize) -> Result<Vec<Option<Vec<u8>>>, ReadError> {
    let mut entries = Vec::with_capacity(area);
    let mut offset = 0;
    for cell in 0..area {
        let (entry, next) = read_cstr(payload, offset, MAX_RUSR_ENTRY_LEN).map_err(|_| {
            ReadError::RusrEntryTooLong {
                cell,
                len: MAX_RUSR_ENTRY_LEN,
            }
        })?;
        entries.push(if entry.is_empty() {
            None
        } else {
            Some(entry.to_vec())
        });
        offset = next;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::{save, size};

    fn sample_puzzle() -> Puzzle {
        let mut puzzle = Puzzle::new();
        puzzle.set_dimensions(3, 3);
        puzzle.set_solution(b"ABC...DEF".to_vec());
        puzzle.set_grid(Puzzle::grid_from_solution(b"ABC...DEF"));
        puzzle.set_clues(vec![b"a1".to_vec(), b"a2".to_vec(), b"d1".to_vec()]);
        crate::validate::cksums_commit(&mut puzzle);
        puzzle
    }

    #[test]
    fn round_trips_a_minimal_puzzle() {
        let puzzle = sample_puzzle();
        let bytes = save(&puzzle).unwrap();
        assert_eq!(bytes.len(), size(&puzzle).unwrap());

        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.solution(), puzzle.solution());
        assert_eq!(parsed.grid(), puzzle.grid());
        assert_eq!(parsed.clues(), puzzle.clues());
        assert_eq!(parsed.cksum_cib(), puzzle.cksum_cib());
    }

    #[test]
    fn rejects_truncated_header() {
        let buf = vec![0u8; 10];
        assert!(matches!(parse(&buf), Err(ReadError::BufferTooShort { .. })));
    }

    #[test]
    fn e2_clue_count_mismatch_is_malformed_body() {
        let mut puzzle = sample_puzzle();
        puzzle.set_clues(vec![b"a1".to_vec(), b"a2".to_vec()]);
        // Hand-craft a header claiming 3 clues but a body with only 2, by
        // writing with the stale clue_count recorded before truncation.
        let mut bytes = save(&puzzle).unwrap();
        bytes[0x2E] = 3;
        bytes[0x2F] = 0;

        assert!(matches!(
            parse(&bytes),
            Err(ReadError::ClueCountMismatch { clue_count: 3, .. })
        ));
    }

    #[test]
    fn e4_all_zero_grbs_has_no_rebus() {
        let mut puzzle = sample_puzzle();
        puzzle.rebus_set(vec![0; 9], Vec::new());
        let bytes = save(&puzzle).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert!(!parsed.has_rebus());
    }
}
