//! # cmtbids
//!
//! Converters for CMT (Conference Management Toolkit) exports.
//!
//! - Read bid and reviewer-assignment XML exports into tables
//! - Write a cleaned bid table back to CMT-compatible bid XML
//! - Add per-category bid counts to a paper table
//! - Move any of these tables to and from CSV/TSV for analysis
//!
//! ## Quick Start
//!
//! ```no_run
//! use cmtbids::{add_bid_counts, read_bids, write_bids, PaperTable, PAPER_ID_COLUMN};
//!
//! let bids = read_bids("Bids.xml")?;
//! bids.write_csv("bids.csv")?;
//!
//! let mut papers = PaperTable::read_csv("Papers.csv", PAPER_ID_COLUMN)?;
//! add_bid_counts(&mut papers, &bids)?;
//! papers.write_csv("papers_with_bids.csv")?;
//!
//! write_bids(&bids, "Bids_cleaned.xml")?;
//! # Ok::<(), cmtbids::CmtError>(())
//! ```
//!
//! The crate logs through `tracing`; install a subscriber to see the
//! completion message of [`write_bids`].

pub mod aggregate;
pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod paper_table;
pub mod reader;
mod table_io;
pub mod types;
pub mod writer;
pub mod xml_writer;

pub use aggregate::add_bid_counts;
pub use error::{CmtError, Result};
pub use paper_table::{PaperTable, PAPER_ID_COLUMN};
pub use reader::{read_assignments, read_bids, read_bids_lowercase};
pub use types::{AssignmentRecord, AssignmentTable, BidRecord, BidTable, CellValue, ColumnNaming};
pub use writer::{write_bids, write_bids_default, DEFAULT_OUTPUT};
