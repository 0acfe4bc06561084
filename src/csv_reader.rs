//! Delimited-text table reading

use crate::csv::{Dialect, LineParser, ParsedLine};
use crate::error::{CmtError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reader for CSV/TSV tables with a header row
///
/// The header is consumed on the first read. Blank lines are skipped, and
/// quoted fields may span several lines.
///
/// # Examples
///
/// ```no_run
/// use cmtbids::csv_reader::TableReader;
///
/// let mut reader = TableReader::open("papers.csv").unwrap();
/// let headers = reader.headers().unwrap().to_vec();
/// for row in reader.rows() {
///     let row = row.unwrap();
///     println!("{:?} -> {:?}", headers, row);
/// }
/// ```
pub struct TableReader<R: BufRead = BufReader<File>> {
    reader: R,
    dialect: Dialect,
    line_buffer: String,
    line_number: u64,
    headers: Option<Vec<String>>,
}

impl TableReader {
    /// Open a delimited file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(TableReader::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> TableReader<R> {
    pub fn from_reader(reader: R) -> Self {
        TableReader {
            reader,
            dialect: Dialect::default(),
            line_buffer: String::with_capacity(256),
            line_number: 0,
            headers: None,
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

    /// Header row, reading it if necessary
    ///
    /// An empty input is a `FormatError`: every table needs a header.
    pub fn headers(&mut self) -> Result<&[String]> {
        if self.headers.is_none() {
            let header = self
                .read_record()?
                .ok_or_else(|| CmtError::FormatError("table has no header row".to_string()))?;
            self.headers = Some(header);
        }
        Ok(self.headers.as_deref().unwrap_or_default())
    }

    /// Position of `name` in the header row
    pub fn column_index(&mut self, name: &str) -> Result<Option<usize>> {
        Ok(self.headers()?.iter().position(|h| h == name))
    }

    /// Read the next data row
    ///
    /// Returns `Ok(None)` at end of input. A row with a different number of
    /// fields than the header is a `FormatError`.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        let width = self.headers()?.len();
        let Some(row) = self.read_record()? else {
            return Ok(None);
        };

        if row.len() != width {
            return Err(CmtError::FormatError(format!(
                "line {}: expected {} fields, found {}",
                self.line_number,
                width,
                row.len()
            )));
        }
        Ok(Some(row))
    }

    /// Iterator over data rows
    pub fn rows(&mut self) -> TableRowIterator<'_, R> {
        TableRowIterator { reader: self }
    }

    /// Physical lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        let parser = LineParser::new(self.dialect);
        self.line_buffer.clear();

        loop {
            let start = self.line_buffer.len();
            if self.reader.read_line(&mut self.line_buffer)? == 0 {
                if self.line_buffer.is_empty() {
                    return Ok(None);
                }
                return Err(CmtError::FormatError(format!(
                    "line {}: unterminated quoted field",
                    self.line_number
                )));
            }
            self.line_number += 1;

            let pending = trim_line_ending(&self.line_buffer[start..]).len();
            self.line_buffer.truncate(start + pending);

            if self.line_buffer.is_empty() {
                continue;
            }

            match parser.parse(&self.line_buffer) {
                ParsedLine::Complete(fields) => return Ok(Some(fields)),
                ParsedLine::Open => self.line_buffer.push('\n'),
            }
        }
    }
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Iterator over data rows of a [`TableReader`]
pub struct TableRowIterator<'a, R: BufRead> {
    reader: &'a mut TableReader<R>,
}

impl<R: BufRead> Iterator for TableRowIterator<'_, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> TableReader<&[u8]> {
        TableReader::from_reader(text.as_bytes())
    }

    #[test]
    fn test_headers_and_rows() -> Result<()> {
        let mut r = reader("Paper ID,Title\n101,Deep Nets\n102,\"Graphs, Again\"\n");
        assert_eq!(r.headers()?, ["Paper ID", "Title"]);
        assert_eq!(r.column_index("Title")?, Some(1));

        let rows: Vec<_> = r.rows().collect::<Result<_>>()?;
        assert_eq!(rows, vec![vec!["101", "Deep Nets"], vec!["102", "Graphs, Again"]]);
        Ok(())
    }

    #[test]
    fn test_crlf_and_blank_lines() -> Result<()> {
        let mut r = reader("a,b\r\n\r\n1,2\r\n\n");
        let rows: Vec<_> = r.rows().collect::<Result<_>>()?;
        assert_eq!(rows, vec![vec!["1", "2"]]);
        Ok(())
    }

    #[test]
    fn test_multiline_field() -> Result<()> {
        let mut r = reader("id,abstract\n1,\"first\nsecond\"\n2,x\n");
        let rows: Vec<_> = r.rows().collect::<Result<_>>()?;
        assert_eq!(rows[0], vec!["1", "first\nsecond"]);
        assert_eq!(rows[1], vec!["2", "x"]);
        assert_eq!(r.line_number(), 4);
        Ok(())
    }

    #[test]
    fn test_ragged_row_is_error() {
        let mut r = reader("a,b\n1,2,3\n");
        let err = r.read_row().unwrap_err();
        assert!(matches!(err, CmtError::FormatError(ref m) if m.contains("line 2")));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let mut r = reader("");
        assert!(matches!(r.headers(), Err(CmtError::FormatError(_))));
    }

    #[test]
    fn test_unterminated_quote() {
        let mut r = reader("a\n\"open\n");
        assert!(matches!(r.read_row(), Err(CmtError::FormatError(_))));
    }

    #[test]
    fn test_tab_delimited() -> Result<()> {
        let mut r = reader("Paper ID\tTitle\n7\tA, B\n").delimiter(b'\t');
        assert_eq!(r.read_row()?, Some(vec!["7".to_string(), "A, B".to_string()]));
        assert_eq!(r.read_row()?, None);
        Ok(())
    }
}
