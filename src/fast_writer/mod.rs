//! Streaming XLSX output
//!
//! Rows are rendered into a reusable XML buffer and pushed straight into the
//! compressed worksheet entry, so memory stays flat regardless of row count.

mod workbook;
mod xml_writer;

pub use workbook::{write_table_sanitized, XlsxWriter, SHEET_NAME};
pub use xml_writer::XmlWriter;
