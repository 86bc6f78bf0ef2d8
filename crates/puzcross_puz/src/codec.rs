//! Little-endian primitives over byte slices.
//!
//! Everything here is a free function rather than a `Read`/`Write` stream
//! adapter: the format's whole appeal is that it is a handful of
//! fixed-offset reads over a buffer the caller already owns, so a cursor
//! position is simpler to reason about than a trait object.

use crate::error::ReadError;

/// Reads a little-endian `u8` at `offset`.
pub fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Reads a little-endian `u16` at `offset`.
pub fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads a little-endian `u32` at `offset`.
pub fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

pub fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Appends `bytes` followed by a single NUL.
pub fn write_cstr(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    out.push(0);
}

/// Generic bound for NUL-terminated fields with no narrower per-field limit
/// named by the format (title, author, copyright, clues, notes): large
/// enough to never trip on a real puzzle, small enough to stop a corrupt or
/// truncated buffer from being scanned byte-by-byte to its end.
pub const MAX_CSTR_LEN: usize = u16::MAX as usize;

/// Scans forward from `offset` for a NUL terminator, returning the bytes
/// before it (excluding the NUL) and the offset just past the NUL.
///
/// Fails if more than `max_len` bytes are scanned without finding one, or if
/// `buf` runs out first.
pub fn read_cstr(buf: &[u8], offset: usize, max_len: usize) -> Result<(&[u8], usize), ReadError> {
    let rest = buf.get(offset..).ok_or(ReadError::UnterminatedString {
        offset,
        bound: buf.len().saturating_sub(offset),
    })?;

    let window_len = rest.len().min(max_len.saturating_add(1));
    let window = &rest[..window_len];

    let nul_pos = window
        .iter()
        .position(|&b| b == 0)
        .ok_or(ReadError::UnterminatedString {
            offset,
            bound: window_len,
        })?;

    Ok((&window[..nul_pos], offset + nul_pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_le_integers() {
        let buf = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_u8(&buf, 0), Some(0x01));
        assert_eq!(read_u16(&buf, 0), Some(0x0201));
        assert_eq!(read_u32(&buf, 0), Some(0x0403_0201));
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let buf = [0x01];
        assert_eq!(read_u16(&buf, 0), None);
        assert_eq!(read_u8(&buf, 5), None);
    }

    #[test]
    fn reads_cstr_and_advances_past_nul() {
        let buf = b"hello\0world";
        let (s, next) = read_cstr(buf, 0, MAX_CSTR_LEN).unwrap();
        assert_eq!(s, b"hello");
        assert_eq!(next, 6);
    }

    #[test]
    fn missing_nul_is_an_error() {
        let buf = b"no terminator";
        assert!(read_cstr(buf, 0, MAX_CSTR_LEN).is_err());
    }

    #[test]
    fn nul_beyond_max_len_is_an_error() {
        // The NUL is real, but it sits past the 3-byte content bound.
        let buf = b"abcd\0";
        assert!(read_cstr(buf, 0, 3).is_err());
    }

    #[test]
    fn nul_exactly_at_max_len_boundary_is_accepted() {
        let buf = b"abc\0";
        let (s, next) = read_cstr(buf, 0, 3).unwrap();
        assert_eq!(s, b"abc");
        assert_eq!(next, 4);
    }

    #[test]
    fn write_cstr_appends_single_nul() {
        let mut out = Vec::new();
        write_cstr(&mut out, b"hi");
        assert_eq!(out, b"hi\0");
    }
}
