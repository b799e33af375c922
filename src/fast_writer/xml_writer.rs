//! Reusable XML buffer with minimal allocations

use crate::sanitize::is_illegal_control;

/// Append-only XML buffer.
///
/// Callers build one fragment (a worksheet row, a package part), hand
/// [`XmlWriter::as_bytes`] to the ZIP entry, then [`XmlWriter::clear`] and
/// reuse the allocation.
pub struct XmlWriter {
    buffer: Vec<u8>,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::with_capacity(8192)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        XmlWriter {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write string data without escaping
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.write_raw(s.as_bytes())
    }

    /// Write an unsigned integer
    #[inline]
    pub fn write_uint(&mut self, value: u64) {
        let mut buf = itoa::Buffer::new();
        self.write_str(buf.format(value));
    }

    /// Write a signed integer
    #[inline]
    pub fn write_int(&mut self, value: i64) {
        let mut buf = itoa::Buffer::new();
        self.write_str(buf.format(value));
    }

    /// Write XML element start tag (left open for attributes)
    #[inline]
    pub fn start_element(&mut self, name: &str) {
        self.write_raw(b"<");
        self.write_str(name);
    }

    /// Write XML element end tag
    #[inline]
    pub fn end_element(&mut self, name: &str) {
        self.write_raw(b"</");
        self.write_str(name);
        self.write_raw(b">")
    }

    /// Close a start tag as self-closing
    #[inline]
    pub fn close_empty(&mut self) {
        self.write_raw(b"/>")
    }

    /// Close start tag
    #[inline]
    pub fn close_start_tag(&mut self) {
        self.write_raw(b">")
    }

    /// Write text content with XML escaping.
    ///
    /// Control characters that XML 1.0 forbids are dropped.
    pub fn write_escaped(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '&' => self.write_raw(b"&amp;"),
                '<' => self.write_raw(b"&lt;"),
                '>' => self.write_raw(b"&gt;"),
                '"' => self.write_raw(b"&quot;"),
                '\'' => self.write_raw(b"&apos;"),
                c if is_illegal_control(c) => continue,
                c => {
                    let mut buf = [0u8; 4];
                    self.write_str(c.encode_utf8(&mut buf));
                }
            }
        }
    }

    /// Bytes written since the last clear
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Reset the buffer, keeping its allocation
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
