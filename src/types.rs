//! Record and table types for CMT bid and assignment data

use crate::error::{CmtError, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single cell in a paper table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
}

impl CellValue {
    /// Cell for raw delimited text, kept verbatim; `""` becomes `Empty`
    pub fn from_text(raw: String) -> Self {
        if raw.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(raw)
        }
    }

    /// Convert cell value to string
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => itoa::Buffer::new().format(*i).to_string(),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Integer view of the cell; strings are parsed
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Empty => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

/// Extract the rank from a bid string such as `"2 Willing"`
///
/// The rank is the text before the first space and must be a decimal integer.
pub fn parse_bid_rank(bid: &str) -> Result<i64> {
    let token = bid.split(' ').next().unwrap_or("");
    token.parse::<i64>().map_err(|_| {
        CmtError::FormatError(format!(
            "bid '{}' does not start with an integer rank",
            bid
        ))
    })
}

/// One reviewer's bid on one paper
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BidRecord {
    pub paper_id: i64,
    pub email: String,
    /// Rank parsed from the leading token of `bid`
    pub rank: i64,
    /// Raw bid category, e.g. `"3 Eager"`
    pub bid: String,
}

impl BidRecord {
    /// Create a bid record, deriving the rank from the bid string
    pub fn new(paper_id: i64, email: impl Into<String>, bid: impl Into<String>) -> Result<Self> {
        let bid = bid.into();
        let rank = parse_bid_rank(&bid)?;
        Ok(BidRecord {
            paper_id,
            email: email.into(),
            rank,
            bid,
        })
    }
}

/// A reviewer assigned to a paper
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssignmentRecord {
    pub paper_id: i64,
    pub email: String,
}

impl AssignmentRecord {
    pub fn new(paper_id: i64, email: impl Into<String>) -> Self {
        AssignmentRecord {
            paper_id,
            email: email.into(),
        }
    }
}

/// Column header convention for bid tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnNaming {
    /// `Paper ID`, `Email`, `Bid_nr`, `Bid`
    #[default]
    Cmt,
    /// `paperID`, `email`, `bid`, `bid_str`
    Lowercase,
}

impl ColumnNaming {
    /// Column names in table order: paper ID, email, rank, raw bid
    pub fn bid_columns(&self) -> [&'static str; 4] {
        match self {
            ColumnNaming::Cmt => ["Paper ID", "Email", "Bid_nr", "Bid"],
            ColumnNaming::Lowercase => ["paperID", "email", "bid", "bid_str"],
        }
    }

    pub fn paper_id_column(&self) -> &'static str {
        self.bid_columns()[0]
    }
}

/// Bids in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidTable {
    pub records: Vec<BidRecord>,
    naming: ColumnNaming,
}

impl BidTable {
    pub fn new(records: Vec<BidRecord>) -> Self {
        BidTable {
            records,
            naming: ColumnNaming::Cmt,
        }
    }

    /// Same records, different column headers
    pub fn with_naming(mut self, naming: ColumnNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn naming(&self) -> ColumnNaming {
        self.naming
    }

    pub fn column_names(&self) -> [&'static str; 4] {
        self.naming.bid_columns()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BidRecord> {
        self.records.iter()
    }

    /// Distinct bid categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self.records.iter().map(|r| r.bid.as_str()).collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }
}

impl<'a> IntoIterator for &'a BidTable {
    type Item = &'a BidRecord;
    type IntoIter = std::slice::Iter<'a, BidRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Reviewer-to-paper assignments in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentTable {
    pub records: Vec<AssignmentRecord>,
}

impl AssignmentTable {
    pub const COLUMNS: [&'static str; 2] = ["Paper ID", "Email"];

    pub fn new(records: Vec<AssignmentRecord>) -> Self {
        AssignmentTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssignmentRecord> {
        self.records.iter()
    }
}
