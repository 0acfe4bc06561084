//! Error types for CMT conversions

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, CmtError>;

/// Everything that can go wrong while converting CMT exports
#[derive(Error, Debug)]
pub enum CmtError {
    /// The XML document is not well-formed
    #[error("XML parse error: {0}")]
    ParseError(String),

    /// A required attribute or column is missing, or a value has the wrong shape
    #[error("Format error: {0}")]
    FormatError(String),

    /// A bid references a paper that is not in the paper table
    #[error("Paper {0} not found in paper table")]
    MissingPaper(i64),

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quick_xml::Error> for CmtError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => CmtError::IoError(std::io::Error::new(io.kind(), io.to_string())),
            other => CmtError::ParseError(other.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for CmtError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CmtError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CmtError::MissingPaper(7).to_string(),
            "Paper 7 not found in paper table"
        );
        assert_eq!(
            CmtError::FormatError("bad bid".to_string()).to_string(),
            "Format error: bad bid"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: CmtError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CmtError::IoError(_)));
    }
}
