use std::fmt;

/// A format version of the shape `<major>.<minor>`, as stored in the header's
/// 4-byte (3 ASCII characters + NUL) version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u8,
    minor: u8,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("version field must be exactly 3 bytes (excluding an optional trailing NUL), got {0}")]
    WrongLength(usize),

    #[error("version field `{0:?}` is not of the form <digit>.<digit>")]
    Malformed(Vec<u8>),
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Parses a version out of its on-disk bytes, e.g. `b"1.4"` or `b"1.4\0"`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VersionError> {
        let version = bytes.strip_suffix(&[0]).unwrap_or(bytes);

        if version.len() != 3 {
            return Err(VersionError::WrongLength(version.len()));
        }

        let (major, dot, minor) = (version[0], version[1], version[2]);

        if !(major.is_ascii_digit() && dot == b'.' && minor.is_ascii_digit()) {
            return Err(VersionError::Malformed(version.to_vec()));
        }

        Ok(Self {
            major: major - b'0',
            minor: minor - b'0',
        })
    }

    /// Renders this version back to its on-disk 4-byte form (3 ASCII bytes + NUL).
    pub fn to_bytes(self) -> [u8; 4] {
        [b'0' + self.major, b'.', b'0' + self.minor, 0]
    }
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 1, minor: 4 }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
