//! Archive identifiers, storage key naming and upload acceptance rules.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// Suffix appended to every identifier to form its storage key.
pub const ARCHIVE_EXTENSION: &str = ".mixblues";

/// Content type archives are stored and served with.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Generic binary type some clients send for archives.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// Length of a generated identifier.
pub const ARCHIVE_ID_LEN: usize = 10;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Public, URL-safe name of one stored archive.
///
/// Generated identifiers are [`ARCHIVE_ID_LEN`] characters long. Parsed
/// identifiers only need to be non-empty and drawn from `[A-Za-z0-9_-]`,
/// which keeps path separators and dots out of storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveId(String);

impl ArchiveId {
    /// Draw a fresh random identifier.
    ///
    /// Collisions are not checked against the store; at 60 bits of entropy
    /// they are treated as negligible.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = (0..ARCHIVE_ID_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key the archive is stored under.
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.0, ARCHIVE_EXTENSION)
    }

    /// Filename suggested to clients downloading the archive.
    pub fn file_name(&self) -> String {
        self.storage_key()
    }
}

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid archive id: {0:?}")]
pub struct InvalidArchiveId(pub String);

impl FromStr for ArchiveId {
    type Err = InvalidArchiveId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidArchiveId(s.to_string()))
        }
    }
}

/// Whether an uploaded file looks like an archive we accept.
///
/// This is a name/MIME filter only: a `.mixblues` filename, or a declared
/// type of exactly `application/zip` or `application/octet-stream`, is
/// enough. The bytes themselves are never inspected.
pub fn is_accepted_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    if file_name.is_some_and(|name| name.ends_with(ARCHIVE_EXTENSION)) {
        return true;
    }

    matches!(
        content_type,
        Some(ARCHIVE_CONTENT_TYPE) | Some(OCTET_STREAM_CONTENT_TYPE)
    )
}
