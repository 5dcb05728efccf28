//! Decoder for the binary `.location` markers Eclipse writes for projects
//! that live outside the workspace directory.
//!
//! Layout, as written by Eclipse's resources plugin:
//!
//! ```text
//! offset 0   16 bytes  chunk signature
//! offset 16   1 byte   high byte of the path length (always 0 for paths we accept)
//! offset 17   1 byte   path length L
//! offset 18   L bytes  UTF-8 path (ISO-8859-1 from older writers),
//!                      optionally prefixed with `URI//`
//! ```
//!
//! The signature is not documented upstream and is not checked; the zero high
//! byte and the length are, so a layout change is rejected instead of being
//! decoded into garbage.

use std::path::{Path, PathBuf};

use crate::error::ImportError;
use crate::paths::file_uri_to_path;

const HEADER_LEN: usize = 17;
const URI_PREFIX: &str = "URI//";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationFormatError {
    #[error("marker is {len} bytes long, shorter than the {min}-byte header")]
    TooShort { len: usize, min: usize },

    #[error("unsupported marker layout (length high byte is {0:#04x})")]
    UnsupportedLayout(u8),

    #[error("marker declares a {declared}-byte path but only {available} bytes follow")]
    Truncated { declared: usize, available: usize },

    #[error("marker contains an empty path")]
    EmptyPath,

    #[error("marker URI {0} is not a file URI")]
    NotAFileUri(String),
}

/// Decodes the raw bytes of a `.location` marker into a project directory.
pub fn decode_location(bytes: &[u8]) -> Result<PathBuf, LocationFormatError> {
    if bytes.len() < HEADER_LEN + 1 {
        return Err(LocationFormatError::TooShort {
            len: bytes.len(),
            min: HEADER_LEN + 1,
        });
    }

    let high = bytes[HEADER_LEN - 1];
    if high != 0 {
        return Err(LocationFormatError::UnsupportedLayout(high));
    }

    let len = usize::from(bytes[HEADER_LEN]);
    let start = HEADER_LEN + 1;
    let available = bytes.len() - start;
    if available < len {
        return Err(LocationFormatError::Truncated {
            declared: len,
            available,
        });
    }
    if len == 0 {
        return Err(LocationFormatError::EmptyPath);
    }

    let raw = decode_text(&bytes[start..start + len]);

    match raw.strip_prefix(URI_PREFIX) {
        Some(uri) => file_uri_to_path(uri)
            .ok_or_else(|| LocationFormatError::NotAFileUri(uri.to_string())),
        None => Ok(PathBuf::from(raw)),
    }
}

fn decode_text(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        // ISO-8859-1 maps each byte to the code point of the same value.
        Err(_) => payload.iter().map(|&b| char::from(b)).collect(),
    }
}

pub fn read_location_file(path: &Path) -> Result<PathBuf, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_location(&bytes).map_err(|source| ImportError::Location {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes a marker the way Eclipse does; used by tests to build fixtures.
#[doc(hidden)]
pub fn encode_location(location: &str) -> Vec<u8> {
    let payload = location.as_bytes();
    let len = u8::try_from(payload.len()).unwrap_or(u8::MAX);

    let mut bytes = vec![
        0x40, 0xb1, 0x8b, 0x81, 0x23, 0xbc, 0x00, 0x14, 0x1a, 0x25, 0x96, 0xe7, 0xa3, 0x93, 0xbe,
        0x1e,
    ];
    bytes.push(0);
    bytes.push(len);
    bytes.extend_from_slice(&payload[..usize::from(len)]);
    bytes
}
