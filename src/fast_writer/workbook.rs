//! Single-sheet XLSX workbook streamed through s-zip

use std::fmt::Display;
use std::fs::File;
use std::path::Path;

use s_zip::StreamingZipWriter;

use super::xml_writer::XmlWriter;
use crate::error::{ConvertError, Result};
use crate::sanitize::sanitize_value;
use crate::table::Table;
use crate::types::{col_to_letter, CellValue};

/// Name of the only worksheet in every workbook this module writes
pub const SHEET_NAME: &str = "Sheet";

const SHEET_ENTRY: &str = "xl/worksheets/sheet1.xml";

const SHEET_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheetData>"#;

const SHEET_FOOTER: &[u8] = b"</sheetData></worksheet>";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Sheet" sheetId="1" r:id="rId1"/>
</sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="0" uniqueCount="0"/>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>tabconvert</Application>
</Properties>"#;

const CORE_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>tabconvert</dc:creator>
</cp:coreProperties>"#;

/// Package parts written after the worksheet, in order
const PACKAGE_PARTS: [(&str, &str); 8] = [
    ("[Content_Types].xml", CONTENT_TYPES),
    ("_rels/.rels", ROOT_RELS),
    ("xl/workbook.xml", WORKBOOK),
    ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
    ("xl/styles.xml", STYLES),
    ("xl/sharedStrings.xml", SHARED_STRINGS),
    ("docProps/app.xml", APP_PROPS),
    ("docProps/core.xml", CORE_PROPS),
];

fn zip_error(e: impl Display) -> ConvertError {
    ConvertError::WriteError(format!("ZIP error: {}", e))
}

/// Streaming writer for a one-sheet XLSX file.
///
/// The worksheet entry is opened on creation and rows are compressed as they
/// are written; the remaining package parts are added by [`XlsxWriter::save`].
/// Strings are stored inline, so no shared string table is kept in memory.
///
/// # Example
///
/// ```no_run
/// use tabconvert::fast_writer::XlsxWriter;
/// use tabconvert::types::CellValue;
///
/// let mut writer = XlsxWriter::create("report.xlsx")?;
/// writer.write_header(["name", "score"])?;
/// writer.write_row_typed(&[CellValue::String("alice".into()), CellValue::Float(0.5)])?;
/// writer.save()?;
/// # Ok::<(), tabconvert::ConvertError>(())
/// ```
pub struct XlsxWriter {
    zip: Option<StreamingZipWriter<File>>,
    current_row: u32,
    xml: XmlWriter,
    col_letters: Vec<String>,
}

impl XlsxWriter {
    /// Create the file with the default compression level (6)
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_compression(path, 6)
    }

    /// Create the file with a deflate level from 0 to 9
    pub fn with_compression<P: AsRef<Path>>(path: P, compression_level: u32) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| ConvertError::WriteError(format!("Failed to create XLSX file: {}", e)))?;
        let mut zip = StreamingZipWriter::from_writer_with_compression(file, compression_level.min(9))
            .map_err(zip_error)?;

        zip.start_entry(SHEET_ENTRY).map_err(zip_error)?;
        zip.write_data(SHEET_HEADER.as_bytes()).map_err(zip_error)?;

        Ok(XlsxWriter {
            zip: Some(zip),
            current_row: 0,
            xml: XmlWriter::with_capacity(4096),
            col_letters: Vec::new(),
        })
    }

    /// Write a row of plain strings (typically the column names)
    pub fn write_header<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<CellValue> = names
            .into_iter()
            .map(|name| CellValue::String(name.as_ref().to_string()))
            .collect();
        self.write_row_typed(&cells)
    }

    /// Write one row of typed cells
    pub fn write_row_typed(&mut self, cells: &[CellValue]) -> Result<()> {
        self.current_row += 1;
        self.ensure_col_letters(cells.len());
        self.xml.clear();
        render_row(&mut self.xml, self.current_row, cells, &self.col_letters);

        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| ConvertError::WriteError("Workbook already saved".to_string()))?;
        zip.write_data(self.xml.as_bytes()).map_err(zip_error)
    }

    /// Rows written so far, header included
    pub fn row_count(&self) -> u32 {
        self.current_row
    }

    /// Close the worksheet, write the remaining package parts and finish the file
    pub fn save(mut self) -> Result<()> {
        let mut zip = self
            .zip
            .take()
            .ok_or_else(|| ConvertError::WriteError("Workbook already saved".to_string()))?;

        zip.write_data(SHEET_FOOTER).map_err(zip_error)?;
        for (entry, xml) in PACKAGE_PARTS {
            zip.start_entry(entry).map_err(zip_error)?;
            zip.write_data(xml.as_bytes()).map_err(zip_error)?;
        }

        zip.finish().map_err(zip_error)?;
        Ok(())
    }

    fn ensure_col_letters(&mut self, count: usize) {
        while self.col_letters.len() < count {
            let col = self.col_letters.len() as u32;
            self.col_letters.push(col_to_letter(col));
        }
    }
}

/// Append `<row>` XML for `cells` at 1-based `row`.
///
/// `col_letters` must hold at least one letter per cell.
fn render_row(xml: &mut XmlWriter, row: u32, cells: &[CellValue], col_letters: &[String]) {
    xml.start_element("row");
    xml.write_raw(b" r=\"");
    xml.write_uint(row.into());
    xml.write_raw(b"\"");
    xml.close_start_tag();

    for (cell, letter) in cells.iter().zip(col_letters) {
        xml.start_element("c");
        xml.write_raw(b" r=\"");
        xml.write_str(letter);
        xml.write_uint(row.into());
        xml.write_raw(b"\"");

        match cell {
            CellValue::Empty => xml.close_empty(),
            CellValue::Int(i) => {
                xml.write_raw(b" t=\"n\"><v>");
                xml.write_int(*i);
                xml.write_raw(b"</v></c>");
            }
            CellValue::Float(f) => {
                xml.write_raw(b" t=\"n\"><v>");
                xml.write_str(&f.to_string());
                xml.write_raw(b"</v></c>");
            }
            CellValue::Bool(b) => {
                xml.write_raw(b" t=\"b\"><v>");
                xml.write_raw(if *b { b"1" } else { b"0" });
                xml.write_raw(b"</v></c>");
            }
            CellValue::String(s) => {
                xml.write_raw(b" t=\"inlineStr\"><is><t xml:space=\"preserve\">");
                xml.write_escaped(s);
                xml.write_raw(b"</t></is></c>");
            }
        }
    }

    xml.end_element("row");
}

/// Write a table as a one-sheet workbook: a header row of column names, then
/// every record with each value passed through [`sanitize_value`].
///
/// Returns the number of data rows written.
pub fn write_table_sanitized<P: AsRef<Path>>(table: &Table, path: P) -> Result<usize> {
    let mut writer = XlsxWriter::create(path)?;
    writer.write_header(table.column_names())?;

    let mut rows = 0;
    let mut cells = Vec::with_capacity(table.num_columns());
    for row in table.rows() {
        cells.clear();
        cells.extend(row?.into_iter().map(|v| CellValue::from(sanitize_value(v))));
        writer.write_row_typed(&cells)?;
        rows += 1;
    }

    writer.save()?;
    Ok(rows)
}
