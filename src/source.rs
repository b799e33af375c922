//! Input resolution: uploaded buffers, local paths and fetched payloads

use crate::error::{ConvertError, Result};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File name given to payloads downloaded from a URL
pub const FETCHED_FILE_NAME: &str = "from_url.parquet";

/// Raw input of one conversion request, fully read into memory
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    bytes: Vec<u8>,
    name: String,
    extension: String,
    fetched: bool,
}

impl SourceFile {
    /// An uploaded file: content plus its declared name
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        SourceFile {
            extension: extension_of(&name),
            name,
            bytes,
            fetched: false,
        }
    }

    /// Read a file-like object to the end
    pub fn from_reader<R: Read>(name: impl Into<String>, mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(name, bytes))
    }

    /// Open and read a file from disk. The name is the path as given.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ConvertError::ReadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::from_bytes(path.to_string_lossy(), bytes))
    }

    /// Body of a remote download
    pub(crate) fn fetched(bytes: Vec<u8>) -> Self {
        SourceFile {
            fetched: true,
            ..Self::from_bytes(FETCHED_FILE_NAME, bytes)
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased suffix after the last `.` of the name, or `""`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether the content came from a URL rather than the caller
    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .field("fetched", &self.fetched)
            .finish()
    }
}

/// What a caller may hand in as the input file
#[derive(Debug, Clone)]
pub enum InputFile {
    /// In-memory upload with its declared name
    Upload { name: String, bytes: Vec<u8> },
    /// Path on the local disk
    Path(PathBuf),
}

/// Turn an optional caller input into a [`SourceFile`].
///
/// `None` stays `None`; conversions that need a file reject it themselves.
pub fn resolve_input(input: Option<InputFile>) -> Result<Option<SourceFile>> {
    match input {
        None => Ok(None),
        Some(InputFile::Upload { name, bytes }) => Ok(Some(SourceFile::from_bytes(name, bytes))),
        Some(InputFile::Path(path)) => SourceFile::from_path(path).map(Some),
    }
}

/// Lower-cased substring after the last `.`; empty when there is none
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}
