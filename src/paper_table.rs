//! Paper table: CMT paper export rows indexed by paper ID

use crate::csv::Dialect;
use crate::csv_reader::TableReader;
use crate::csv_writer::TableWriter;
use crate::error::{CmtError, Result};
use crate::types::CellValue;
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// Column name CMT uses for the paper identifier
pub const PAPER_ID_COLUMN: &str = "Paper ID";

/// Rows of paper data with a unique integer key column
///
/// Rows keep their input order. `index` maps each paper ID to its row.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperTable {
    columns: Vec<String>,
    key_column: usize,
    rows: Vec<Vec<CellValue>>,
    index: IndexMap<i64, usize>,
}

impl PaperTable {
    /// Empty table whose only column is the key column
    pub fn new(key_column: impl Into<String>) -> Self {
        PaperTable {
            columns: vec![key_column.into()],
            key_column: 0,
            rows: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// Build a table from headers and rows
    ///
    /// Every row must have one cell per column, and the key column must hold
    /// distinct integers.
    pub fn from_rows(
        columns: Vec<String>,
        key_column: &str,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let key = columns
            .iter()
            .position(|c| c == key_column)
            .ok_or_else(|| CmtError::FormatError(format!("no '{}' column", key_column)))?;

        let mut table = PaperTable {
            columns,
            key_column: key,
            rows: Vec::with_capacity(rows.len()),
            index: IndexMap::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Table with just the key column, one row per paper ID
    pub fn from_ids<I: IntoIterator<Item = i64>>(key_column: &str, ids: I) -> Result<Self> {
        let mut table = PaperTable::new(key_column);
        for id in ids {
            table.push_row(vec![CellValue::Int(id)])?;
        }
        Ok(table)
    }

    /// Append a row; its key cell must be a new integer paper ID
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CmtError::FormatError(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        let id = row[self.key_column].as_i64().ok_or_else(|| {
            CmtError::FormatError(format!(
                "'{}' value '{}' is not an integer",
                self.columns[self.key_column], row[self.key_column]
            ))
        })?;
        if self.index.contains_key(&id) {
            return Err(CmtError::FormatError(format!("duplicate paper id {}", id)));
        }

        self.index.insert(id, self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn contains(&self, paper_id: i64) -> bool {
        self.index.contains_key(&paper_id)
    }

    /// Paper IDs in row order
    pub fn paper_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.index.keys().copied()
    }

    /// Cell for `paper_id` in column `column`
    pub fn get(&self, paper_id: i64, column: &str) -> Option<&CellValue> {
        let row = *self.index.get(&paper_id)?;
        let col = self.column_index(column)?;
        self.rows[row].get(col)
    }

    /// Set every cell of `column` to `value`, adding the column at the end if
    /// it does not exist yet. Returns the column position.
    pub fn fill_column(&mut self, column: &str, value: CellValue) -> usize {
        match self.column_index(column) {
            Some(col) => {
                for row in &mut self.rows {
                    row[col] = value.clone();
                }
                col
            }
            None => {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
                self.columns.len() - 1
            }
        }
    }

    /// Overwrite one cell by paper ID and column position
    pub fn set(&mut self, paper_id: i64, col: usize, value: CellValue) -> Result<()> {
        let row = *self
            .index
            .get(&paper_id)
            .ok_or(CmtError::MissingPaper(paper_id))?;
        let cell = self.rows[row].get_mut(col).ok_or_else(|| {
            CmtError::FormatError(format!("column {} out of range", col))
        })?;
        *cell = value;
        Ok(())
    }

    /// Load a paper export with a header row
    ///
    /// Cells keep their original text, so writing the table back reproduces
    /// them exactly. Only the key column is interpreted, as an integer.
    pub fn read_csv<P: AsRef<Path>>(path: P, key_column: &str) -> Result<Self> {
        Self::read_csv_with(path, key_column, Dialect::default())
    }

    pub fn read_csv_with<P: AsRef<Path>>(
        path: P,
        key_column: &str,
        dialect: Dialect,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = TableReader::open(path)?.dialect(dialect);
        let columns = reader.headers()?.to_vec();

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for row in reader.rows() {
            rows.push(row?.into_iter().map(CellValue::from_text).collect());
        }

        let table = PaperTable::from_rows(columns, key_column, rows)?;
        debug!(path = %path.display(), rows = table.len(), "read paper table");
        Ok(table)
    }

    /// Write the table with a header row; returns the number of data rows
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        self.write_csv_with(path, Dialect::default())
    }

    pub fn write_csv_with<P: AsRef<Path>>(&self, path: P, dialect: Dialect) -> Result<u64> {
        let mut writer = TableWriter::create(path)?.dialect(dialect);
        writer.write_row(&self.columns)?;
        for row in &self.rows {
            writer.write_row(row.iter().map(CellValue::as_string))?;
        }
        Ok(writer.save()? - 1)
    }
}
