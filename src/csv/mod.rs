//! CSV utilities for encoding rows and decoding source text

mod encoder;
mod encoding;

pub use encoder::CsvEncoder;
pub use encoding::{decode_latin1, TextEncoding};
