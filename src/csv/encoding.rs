//! Text decoding of raw CSV bytes

use crate::error::{ConvertError, Result};
use std::borrow::Cow;

/// Character encoding of a CSV source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid input is a read error
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value,
    /// so decoding never fails
    Latin1,
}

impl TextEncoding {
    /// Decode raw bytes to text
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| ConvertError::ReadError(format!("CSV is not valid UTF-8: {}", e))),
            TextEncoding::Latin1 => Ok(decode_latin1(bytes)),
        }
    }
}

/// Decode ISO-8859-1 bytes. Pure ASCII input is borrowed as-is.
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        // ASCII is valid UTF-8
        return Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default());
    }
    Cow::Owned(bytes.iter().map(|&b| b as char).collect())
}
