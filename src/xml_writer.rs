//! Buffered XML emitter for the fixed CMT layout

use crate::error::{CmtError, Result};
use std::io::Write;

/// Writes XML tags and escaped attributes into a buffered sink
///
/// No validation is done; callers are responsible for nesting.
pub struct XmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    flush_threshold: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 8192)
    }

    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        XmlWriter {
            writer,
            buffer: Vec::with_capacity(capacity),
            flush_threshold: capacity / 2,
        }
    }

    #[inline]
    fn auto_flush(&mut self) -> Result<()> {
        if self.buffer.len() >= self.flush_threshold {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        self.auto_flush()
    }

    /// Write `depth` levels of two-space indentation
    #[inline]
    pub fn indent(&mut self, depth: usize) -> Result<()> {
        for _ in 0..depth {
            self.buffer.extend_from_slice(b"  ");
        }
        self.auto_flush()
    }

    #[inline]
    pub fn newline(&mut self) -> Result<()> {
        self.write_raw(b"\n")
    }

    /// Open a start tag: `<name`
    #[inline]
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.buffer.push(b'<');
        self.write_raw(name.as_bytes())
    }

    /// Finish a start tag: `>`
    #[inline]
    pub fn close_start_tag(&mut self) -> Result<()> {
        self.write_raw(b">")
    }

    /// Finish a start tag as self-closing: ` />`
    #[inline]
    pub fn close_empty_element(&mut self) -> Result<()> {
        self.write_raw(b" />")
    }

    /// Write an end tag: `</name>`
    #[inline]
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.buffer.extend_from_slice(b"</");
        self.buffer.extend_from_slice(name.as_bytes());
        self.write_raw(b">")
    }

    /// Write ` name="value"` with the value escaped
    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.buffer.push(b' ');
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.extend_from_slice(b"=\"");
        self.write_escaped(value)?;
        self.write_raw(b"\"")
    }

    /// Write ` name="123"`
    #[inline]
    pub fn attribute_int(&mut self, name: &str, value: i64) -> Result<()> {
        let mut digits = itoa::Buffer::new();
        self.buffer.push(b' ');
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.extend_from_slice(b"=\"");
        self.buffer.extend_from_slice(digits.format(value).as_bytes());
        self.write_raw(b"\"")
    }

    /// Write text for a double-quoted attribute value
    ///
    /// Only `&`, `<` and `"` are escaped. Tab, LF and CR become character
    /// references so parsers do not normalize them to spaces. Other control
    /// characters cannot appear in XML 1.0 and are a `FormatError`.
    pub fn write_escaped(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            match ch {
                '&' => self.buffer.extend_from_slice(b"&amp;"),
                '<' => self.buffer.extend_from_slice(b"&lt;"),
                '"' => self.buffer.extend_from_slice(b"&quot;"),
                '\t' => self.buffer.extend_from_slice(b"&#9;"),
                '\n' => self.buffer.extend_from_slice(b"&#10;"),
                '\r' => self.buffer.extend_from_slice(b"&#13;"),
                c if (c as u32) < 0x20 => {
                    return Err(CmtError::FormatError(format!(
                        "control character U+{:04X} cannot be written to XML",
                        c as u32
                    )));
                }
                c => {
                    let mut utf8 = [0u8; 4];
                    self.buffer
                        .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
        self.auto_flush()
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}
