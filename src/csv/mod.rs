//! Delimited-text dialect, line parsing and field encoding

mod encoder;
mod parser;

pub use encoder::FieldEncoder;
pub use parser::{LineParser, ParsedLine};

/// Delimiter and quote character shared by readers and writers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote_char: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: b',',
            quote_char: b'"',
        }
    }
}

impl Dialect {
    /// Tab-separated, as CMT's own "Export to Tab Delimited" produces
    pub fn tsv() -> Self {
        Dialect {
            delimiter: b'\t',
            ..Dialect::default()
        }
    }
}
