//! Field encoding with RFC 4180-like quoting

use super::Dialect;

/// Encodes rows of fields into delimited text
pub struct FieldEncoder {
    dialect: Dialect,
}

impl FieldEncoder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Append one encoded row (without line ending) to `buffer`
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S], buffer: &mut Vec<u8>) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.dialect.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    fn encode_field(&self, field: &str, buffer: &mut Vec<u8>) {
        let quote = self.dialect.quote_char;
        if !self.needs_quoting(field) {
            buffer.extend_from_slice(field.as_bytes());
            return;
        }

        buffer.push(quote);
        for byte in field.bytes() {
            if byte == quote {
                buffer.push(quote);
            }
            buffer.push(byte);
        }
        buffer.push(quote);
    }

    fn needs_quoting(&self, field: &str) -> bool {
        field.bytes().any(|b| {
            b == self.dialect.delimiter || b == self.dialect.quote_char || b == b'\n' || b == b'\r'
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[&str], dialect: Dialect) -> String {
        let mut buf = Vec::new();
        FieldEncoder::new(dialect).encode_row(fields, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain() {
        assert_eq!(encode(&["101", "a@x.org", "3 Eager"], Dialect::default()), "101,a@x.org,3 Eager");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(
            encode(&["a,b", r#"Say "Hi""#, "x\ny"], Dialect::default()),
            "\"a,b\",\"Say \"\"Hi\"\"\",\"x\ny\""
        );
    }

    #[test]
    fn test_tab_does_not_quote_comma() {
        assert_eq!(encode(&["a,b", "c"], Dialect::tsv()), "a,b\tc");
        assert_eq!(encode(&["a\tb"], Dialect::tsv()), "\"a\tb\"");
    }
}
