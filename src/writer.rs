//! Writing bid tables back to CMT bid XML

use crate::error::Result;
use crate::types::{BidRecord, BidTable};
use crate::xml_writer::XmlWriter;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// File name used when the caller does not pick one
pub const DEFAULT_OUTPUT: &str = "Bids_cleaned.xml";

/// Write `bids` as CMT bid XML to `path`, replacing any existing file
///
/// Submissions are emitted in ascending paper ID; bids inside a submission
/// keep their table order. Returns the number of bids written.
///
/// Attribute values are escaped for `&`, `<` and `"`; tab, LF and CR are
/// written as character references. Any other control character below
/// U+0020 is a [`FormatError`](crate::CmtError::FormatError), and the file may then hold a
/// partial document.
///
/// ```no_run
/// use cmtbids::reader::read_bids;
/// use cmtbids::writer::write_bids;
///
/// let bids = read_bids("Bids.xml").unwrap();
/// let written = write_bids(&bids, "Bids_cleaned.xml").unwrap();
/// assert_eq!(written, bids.len());
/// ```
pub fn write_bids<P: AsRef<Path>>(bids: &BidTable, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = write_bids_to(bids, BufWriter::new(file))?;
    info!("Wrote {} bids to {}", written, path.display());
    Ok(written)
}

/// [`write_bids`] to [`DEFAULT_OUTPUT`] in the working directory
pub fn write_bids_default(bids: &BidTable) -> Result<usize> {
    write_bids(bids, DEFAULT_OUTPUT)
}

/// Render `bids` as CMT bid XML into any writer
///
/// Layout, one element per line:
///
/// ```text
/// <bids>
///   <submission submissionId="101">
///     <user email="alice@x.org" bid="3 Eager" />
///   </submission>
/// </bids>
/// ```
///
/// Escaping and errors are as for [`write_bids`].
pub fn write_bids_to<W: Write>(bids: &BidTable, writer: W) -> Result<usize> {
    let mut xml = XmlWriter::new(writer);

    xml.start_element("bids")?;
    xml.close_start_tag()?;
    xml.newline()?;

    for (paper_id, group) in group_by_paper(bids) {
        xml.indent(1)?;
        xml.start_element("submission")?;
        xml.attribute_int("submissionId", paper_id)?;
        xml.close_start_tag()?;
        xml.newline()?;

        for record in group {
            xml.indent(2)?;
            xml.start_element("user")?;
            xml.attribute("email", &record.email)?;
            xml.attribute("bid", &record.bid)?;
            xml.close_empty_element()?;
            xml.newline()?;
        }

        xml.indent(1)?;
        xml.end_element("submission")?;
        xml.newline()?;
    }

    xml.end_element("bids")?;
    xml.newline()?;
    xml.flush()?;

    Ok(bids.len())
}

/// Records grouped by paper ID in ascending order, table order within a group
fn group_by_paper(bids: &BidTable) -> BTreeMap<i64, Vec<&BidRecord>> {
    let mut groups: BTreeMap<i64, Vec<&BidRecord>> = BTreeMap::new();
    for record in bids {
        groups.entry(record.paper_id).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CmtError;
    use crate::reader::read_bids_from_str;

    fn render(bids: &BidTable) -> String {
        let mut out = Vec::new();
        write_bids_to(bids, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exact_layout() {
        let bids = BidTable::new(vec![
            BidRecord::new(102, "carol@x.org", "3 Eager").unwrap(),
            BidRecord::new(101, "alice@x.org", "3 Eager").unwrap(),
            BidRecord::new(101, "bob@x.org", "1 Reluctant").unwrap(),
        ]);

        assert_eq!(
            render(&bids),
            "<bids>\n\
             \x20 <submission submissionId=\"101\">\n\
             \x20   <user email=\"alice@x.org\" bid=\"3 Eager\" />\n\
             \x20   <user email=\"bob@x.org\" bid=\"1 Reluctant\" />\n\
             \x20 </submission>\n\
             \x20 <submission submissionId=\"102\">\n\
             \x20   <user email=\"carol@x.org\" bid=\"3 Eager\" />\n\
             \x20 </submission>\n\
             </bids>\n"
        );
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render(&BidTable::default()), "<bids>\n</bids>\n");
    }

    #[test]
    fn test_special_characters_survive_reread() -> Result<()> {
        let bids = BidTable::new(vec![BidRecord::new(3, "r&d@x.org", "2 \"Maybe\" <ok>")?]);
        let xml = render(&bids);
        assert!(xml.contains("email=\"r&amp;d@x.org\""));

        let back = read_bids_from_str(&xml)?;
        assert_eq!(back.records, bids.records);
        Ok(())
    }

    #[test]
    fn test_quotes_and_brackets_only_escaped_where_needed() -> Result<()> {
        let bids = BidTable::new(vec![BidRecord::new(8, "o'brien@x.org", "2 Willing > 1")?]);
        let xml = render(&bids);
        assert!(xml.contains("<user email=\"o'brien@x.org\" bid=\"2 Willing > 1\" />"));

        assert_eq!(read_bids_from_str(&xml)?.records, bids.records);
        Ok(())
    }

    #[test]
    fn test_whitespace_controls_survive_reread() -> Result<()> {
        let bids = BidTable::new(vec![BidRecord::new(4, "a@x.org", "1 Low\tmaybe\r\n")?]);
        let xml = render(&bids);
        assert!(xml.contains("bid=\"1 Low&#9;maybe&#13;&#10;\""));

        assert_eq!(read_bids_from_str(&xml)?.records, bids.records);
        Ok(())
    }

    #[test]
    fn test_other_control_character_is_format_error() -> Result<()> {
        let bids = BidTable::new(vec![BidRecord::new(4, "a\u{1b}@x.org", "1 Low")?]);
        let err = write_bids_to(&bids, Vec::new()).unwrap_err();
        assert!(matches!(err, CmtError::FormatError(_)));
        Ok(())
    }

    #[test]
    fn test_interleaved_papers_grouped_in_table_order() -> Result<()> {
        let bids = BidTable::new(vec![
            BidRecord::new(5, "a@x.org", "3 Eager")?,
            BidRecord::new(3, "b@x.org", "1 Reluctant")?,
            BidRecord::new(5, "c@x.org", "2 Willing")?,
            BidRecord::new(3, "d@x.org", "3 Eager")?,
        ]);

        assert_eq!(
            render(&bids),
            "<bids>\n\
             \x20 <submission submissionId=\"3\">\n\
             \x20   <user email=\"b@x.org\" bid=\"1 Reluctant\" />\n\
             \x20   <user email=\"d@x.org\" bid=\"3 Eager\" />\n\
             \x20 </submission>\n\
             \x20 <submission submissionId=\"5\">\n\
             \x20   <user email=\"a@x.org\" bid=\"3 Eager\" />\n\
             \x20   <user email=\"c@x.org\" bid=\"2 Willing\" />\n\
             \x20 </submission>\n\
             </bids>\n"
        );
        Ok(())
    }

    #[test]
    fn test_write_file_reports_count_and_overwrites() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_OUTPUT);
        std::fs::write(&path, "old content ".repeat(100))?;

        let bids = BidTable::new(vec![BidRecord::new(1, "a@x.org", "0 Maybe")?]);
        assert_eq!(write_bids(&bids, &path)?, 1);

        let content = std::fs::read_to_string(&path)?;
        assert!(content.starts_with("<bids>\n"));
        assert!(!content.contains("old content"));
        Ok(())
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let bids = BidTable::default();
        let err = write_bids(&bids, "/nonexistent/dir/out.xml").unwrap_err();
        assert!(matches!(err, CmtError::IoError(_)));
    }
}
