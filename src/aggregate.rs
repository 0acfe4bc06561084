//! Per-paper bid counts

use crate::error::{CmtError, Result};
use crate::paper_table::PaperTable;
use crate::types::{BidTable, CellValue};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Add one count column per bid category to `papers`
///
/// Every category seen anywhere in `bids` gets a column, in sorted order of
/// the category string, zero-filled for all papers and then set to the
/// number of matching bids. An existing column with the same name is reset.
///
/// Fails with [`CmtError::MissingPaper`] if a bid names a paper that is not
/// in `papers`; the table is left untouched in that case.
///
/// # Examples
///
/// ```
/// use cmtbids::aggregate::add_bid_counts;
/// use cmtbids::paper_table::{PaperTable, PAPER_ID_COLUMN};
/// use cmtbids::types::{BidRecord, BidTable, CellValue};
///
/// let bids = BidTable::new(vec![
///     BidRecord::new(101, "alice@x.org", "3 Eager").unwrap(),
///     BidRecord::new(102, "carol@x.org", "3 Eager").unwrap(),
/// ]);
/// let mut papers = PaperTable::from_ids(PAPER_ID_COLUMN, [101, 102, 103]).unwrap();
/// add_bid_counts(&mut papers, &bids).unwrap();
/// assert_eq!(papers.get(103, "3 Eager"), Some(&CellValue::Int(0)));
/// ```
pub fn add_bid_counts<'a>(papers: &'a mut PaperTable, bids: &BidTable) -> Result<&'a mut PaperTable> {
    let counts = count_bids(bids);

    if let Some(missing) = bids.iter().map(|r| r.paper_id).find(|id| !papers.contains(*id)) {
        return Err(CmtError::MissingPaper(missing));
    }

    for (category, per_paper) in &counts {
        let col = papers.fill_column(category, CellValue::Int(0));
        for (&paper_id, &n) in per_paper {
            papers.set(paper_id, col, CellValue::Int(n))?;
        }
    }

    debug!(
        papers = papers.len(),
        categories = counts.len(),
        "added bid count columns"
    );
    Ok(papers)
}

/// Bid counts keyed by category (sorted), then paper ID
pub fn count_bids(bids: &BidTable) -> BTreeMap<&str, HashMap<i64, i64>> {
    let mut counts: BTreeMap<&str, HashMap<i64, i64>> = BTreeMap::new();
    for record in bids {
        *counts
            .entry(record.bid.as_str())
            .or_default()
            .entry(record.paper_id)
            .or_insert(0) += 1;
    }
    counts
}
