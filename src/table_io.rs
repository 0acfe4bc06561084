//! Delimited-file export and import for bid and assignment tables

use crate::csv::Dialect;
use crate::csv_reader::TableReader;
use crate::csv_writer::TableWriter;
use crate::error::{CmtError, Result};
use crate::types::{AssignmentRecord, AssignmentTable, BidRecord, BidTable, ColumnNaming};
use std::path::Path;
use tracing::debug;

impl BidTable {
    /// Write the table with a header row in its current naming convention.
    /// Returns the number of data rows.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        self.write_csv_with(path, Dialect::default())
    }

    pub fn write_csv_with<P: AsRef<Path>>(&self, path: P, dialect: Dialect) -> Result<u64> {
        let mut ids = itoa::Buffer::new();
        let mut ranks = itoa::Buffer::new();

        let mut writer = TableWriter::create(path)?.dialect(dialect);
        writer.write_row(self.column_names())?;
        for r in self {
            writer.write_row([
                ids.format(r.paper_id),
                r.email.as_str(),
                ranks.format(r.rank),
                r.bid.as_str(),
            ])?;
        }
        Ok(writer.save()? - 1)
    }

    /// Load a cleaned bid table
    ///
    /// The header may use either naming convention; the table keeps the one it
    /// found. The rank column is optional and always recomputed from the bid
    /// string.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_csv_with(path, Dialect::default())
    }

    pub fn read_csv_with<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = TableReader::open(path)?.dialect(dialect);

        let naming = detect_naming(reader.headers()?)?;
        let [id_name, email_name, _, bid_name] = naming.bid_columns();
        let id_col = require_column(&mut reader, id_name)?;
        let email_col = require_column(&mut reader, email_name)?;
        let bid_col = require_column(&mut reader, bid_name)?;

        let mut records = Vec::new();
        for row in reader.rows() {
            let row = row?;
            let paper_id = parse_paper_id(&row[id_col])?;
            records.push(BidRecord::new(
                paper_id,
                row[email_col].as_str(),
                row[bid_col].as_str(),
            )?);
        }

        debug!(path = %path.display(), rows = records.len(), "read bid table");
        Ok(BidTable::new(records).with_naming(naming))
    }
}

impl AssignmentTable {
    /// Write the table with a header row; returns the number of data rows
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        self.write_csv_with(path, Dialect::default())
    }

    pub fn write_csv_with<P: AsRef<Path>>(&self, path: P, dialect: Dialect) -> Result<u64> {
        let mut ids = itoa::Buffer::new();
        let mut writer = TableWriter::create(path)?.dialect(dialect);
        writer.write_row(Self::COLUMNS)?;
        for r in &self.records {
            writer.write_row([ids.format(r.paper_id), r.email.as_str()])?;
        }
        Ok(writer.save()? - 1)
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = TableReader::open(path)?;
        let [id_name, email_name] = Self::COLUMNS;
        let id_col = require_column(&mut reader, id_name)?;
        let email_col = require_column(&mut reader, email_name)?;

        let mut records = Vec::new();
        for row in reader.rows() {
            let row = row?;
            records.push(AssignmentRecord::new(
                parse_paper_id(&row[id_col])?,
                row[email_col].as_str(),
            ));
        }

        debug!(path = %path.display(), rows = records.len(), "read assignment table");
        Ok(AssignmentTable::new(records))
    }
}

fn detect_naming(headers: &[String]) -> Result<ColumnNaming> {
    [ColumnNaming::Cmt, ColumnNaming::Lowercase]
        .into_iter()
        .find(|naming| headers.iter().any(|h| h == naming.paper_id_column()))
        .ok_or_else(|| {
            CmtError::FormatError(format!(
                "bid table header {:?} has neither 'Paper ID' nor 'paperID'",
                headers
            ))
        })
}

fn require_column<R: std::io::BufRead>(reader: &mut TableReader<R>, name: &str) -> Result<usize> {
    reader
        .column_index(name)?
        .ok_or_else(|| CmtError::FormatError(format!("missing column '{}'", name)))
}

fn parse_paper_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| CmtError::FormatError(format!("paper id '{}' is not an integer", raw)))
}
