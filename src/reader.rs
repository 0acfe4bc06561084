//! Readers for CMT bid and assignment XML exports
//!
//! Both exports share one shape: `<submission submissionId="N">` elements
//! anywhere below the root, each holding one child element per reviewer.
//! Bid children carry `email` and `bid`; assignment children carry `email`.
//! The root and child element names are not checked.

use crate::error::{CmtError, Result};
use crate::types::{AssignmentRecord, AssignmentTable, BidRecord, BidTable, ColumnNaming};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Read a CMT bid export into a table with CMT column names
pub fn read_bids<P: AsRef<Path>>(path: P) -> Result<BidTable> {
    let path = path.as_ref();
    let table = read_bids_from_reader(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), rows = table.len(), "read bids");
    Ok(table)
}

/// Read a CMT bid export into a table with lowercase column names
/// (`paperID`, `email`, `bid`, `bid_str`)
pub fn read_bids_lowercase<P: AsRef<Path>>(path: P) -> Result<BidTable> {
    read_bids(path).map(|table| table.with_naming(ColumnNaming::Lowercase))
}

/// Read bid XML held in memory
pub fn read_bids_from_str(xml: &str) -> Result<BidTable> {
    read_bids_from_reader(xml.as_bytes())
}

/// Read bid XML from any buffered source
pub fn read_bids_from_reader<R: BufRead>(reader: R) -> Result<BidTable> {
    let mut records = Vec::new();
    walk_submissions(reader, |paper_id, child| {
        let email = required_attribute(child, b"email", paper_id)?;
        let bid = required_attribute(child, b"bid", paper_id)?;
        let record = BidRecord::new(paper_id, email, bid).map_err(|e| match e {
            CmtError::FormatError(msg) => {
                CmtError::FormatError(format!("submission {}: {}", paper_id, msg))
            }
            other => other,
        })?;
        records.push(record);
        Ok(())
    })?;
    Ok(BidTable::new(records))
}

/// Read a CMT assignment export
pub fn read_assignments<P: AsRef<Path>>(path: P) -> Result<AssignmentTable> {
    let path = path.as_ref();
    let table = read_assignments_from_reader(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), rows = table.len(), "read assignments");
    Ok(table)
}

/// Read assignment XML held in memory
pub fn read_assignments_from_str(xml: &str) -> Result<AssignmentTable> {
    read_assignments_from_reader(xml.as_bytes())
}

/// Read assignment XML from any buffered source
pub fn read_assignments_from_reader<R: BufRead>(reader: R) -> Result<AssignmentTable> {
    let mut records = Vec::new();
    walk_submissions(reader, |paper_id, child| {
        let email = required_attribute(child, b"email", paper_id)?;
        records.push(AssignmentRecord::new(paper_id, email));
        Ok(())
    })?;
    Ok(AssignmentTable::new(records))
}

/// Submission currently being walked
struct OpenSubmission {
    paper_id: i64,
    /// Depth at which its direct children start
    child_depth: usize,
    children: usize,
}

/// Call `visit` for every direct child element of every `submission`
/// below the root, in document order.
fn walk_submissions<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(i64, &BytesStart<'_>) -> Result<()>,
{
    let mut reader = Reader::from_reader(reader);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut root_closed = false;
    let mut current: Option<OpenSubmission> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                if depth == 0 {
                    if root_closed {
                        return Err(CmtError::ParseError(format!(
                            "extra content after root element at byte {}",
                            reader.buffer_position()
                        )));
                    }
                    root_seen = true;
                }

                if let Some(sub) = current.as_mut() {
                    if depth == sub.child_depth {
                        visit(sub.paper_id, e)?;
                        sub.children += 1;
                    }
                } else if depth > 0 && e.name().as_ref() == b"submission" {
                    let paper_id = submission_id(e)?;
                    if is_empty {
                        warn!(paper_id, "submission has no entries");
                    } else {
                        current = Some(OpenSubmission {
                            paper_id,
                            child_depth: depth + 1,
                            children: 0,
                        });
                    }
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    CmtError::ParseError(format!(
                        "unexpected closing tag at byte {}",
                        reader.buffer_position()
                    ))
                })?;

                if let Some(sub) = current.take() {
                    if depth + 1 == sub.child_depth {
                        if sub.children == 0 {
                            warn!(paper_id = sub.paper_id, "submission has no entries");
                        }
                    } else {
                        current = Some(sub);
                    }
                }
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(CmtError::ParseError(format!(
                    "text outside root element at byte {}",
                    reader.buffer_position()
                )));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(CmtError::ParseError(
            "document has no root element".to_string(),
        ));
    }
    if depth != 0 {
        return Err(CmtError::ParseError(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(e: &BytesStart<'_>, name: &[u8], paper_id: i64) -> Result<String> {
    attribute(e, name)?.ok_or_else(|| {
        CmtError::FormatError(format!(
            "submission {}: <{}> has no '{}' attribute",
            paper_id,
            String::from_utf8_lossy(e.name().as_ref()),
            String::from_utf8_lossy(name)
        ))
    })
}

fn submission_id(e: &BytesStart<'_>) -> Result<i64> {
    let raw = attribute(e, b"submissionId")?.ok_or_else(|| {
        CmtError::FormatError("<submission> has no 'submissionId' attribute".to_string())
    })?;
    raw.trim().parse().map_err(|_| {
        CmtError::FormatError(format!("submissionId '{}' is not an integer", raw))
    })
}
