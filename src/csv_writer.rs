//! Delimited-text table writing

use crate::csv::{Dialect, FieldEncoder};
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row-by-row writer for CSV/TSV tables
///
/// # Examples
///
/// ```no_run
/// use cmtbids::csv_writer::TableWriter;
///
/// let mut writer = TableWriter::create("bids.tsv").unwrap().delimiter(b'\t');
/// writer.write_row(["Paper ID", "Email", "Bid_nr", "Bid"]).unwrap();
/// writer.write_row(["101", "alice@x.org", "3", "3 Eager"]).unwrap();
/// writer.save().unwrap();
/// ```
pub struct TableWriter<W: Write = BufWriter<File>> {
    writer: W,
    buffer: Vec<u8>,
    row_count: u64,
    dialect: Dialect,
    line_ending: &'static [u8],
}

impl TableWriter {
    /// Create (or truncate) the file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(TableWriter::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> TableWriter<W> {
    /// Write into any `Write` sink with the default comma dialect
    pub fn from_writer(writer: W) -> Self {
        TableWriter {
            writer,
            buffer: Vec::with_capacity(1024),
            row_count: 0,
            dialect: Dialect::default(),
            line_ending: b"\n",
        }
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.dialect.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.dialect.quote_char = quote;
        self
    }

    /// Replace the whole dialect (builder pattern)
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Write one row of fields
    pub fn write_row<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = data.into_iter().collect();

        self.buffer.clear();
        FieldEncoder::new(self.dialect).encode_row(&fields, &mut self.buffer);
        self.buffer.extend_from_slice(self.line_ending);
        self.writer.write_all(&self.buffer)?;

        self.row_count += 1;
        Ok(())
    }

    /// Flush and close; returns the number of rows written
    pub fn save(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_into_buffer() -> Result<()> {
        let mut out = Vec::new();
        {
            let mut writer = TableWriter::from_writer(&mut out);
            writer.write_row(["Paper ID", "Email"])?;
            writer.write_row(["101", "alice@x.org"])?;
            assert_eq!(writer.save()?, 2);
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Paper ID,Email\n101,alice@x.org\n");
        Ok(())
    }

    #[test]
    fn test_custom_delimiter() -> Result<()> {
        let mut out = Vec::new();
        {
            let mut writer = TableWriter::from_writer(&mut out).delimiter(b';');
            writer.write_row(["a;b", "c"])?;
            writer.save()?;
        }
        assert_eq!(String::from_utf8(out).unwrap(), "\"a;b\";c\n");
        Ok(())
    }

    #[test]
    fn test_create_overwrites() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "stale contents that are longer\n")?;

        let mut writer = TableWriter::create(&path)?;
        writer.write_row(["x"])?;
        writer.save()?;

        assert_eq!(std::fs::read_to_string(&path)?, "x\n");
        Ok(())
    }
}
