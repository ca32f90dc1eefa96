//! Fixed-width line codec
//!
//! Joins fields, pads to width, and splits them back.

use crate::error::{BibipError, Result};

use super::{Record, FIELD_DELIMITER, NEWLINE, PADDING};

/// Encoder/decoder for lines of one fixed width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidthCodec {
    /// Payload width in bytes (newline excluded)
    width: usize,
}

impl FixedWidthCodec {
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    /// Payload width in bytes
    pub fn width(&self) -> usize {
        self.width
    }

    /// Full on-disk line length: payload + newline
    pub fn line_len(&self) -> usize {
        self.width + NEWLINE.len_utf8()
    }

    /// Encode raw field values into one padded, newline-terminated line
    pub fn encode_fields<S: AsRef<str>>(&self, fields: &[S]) -> Result<String> {
        let mut payload = String::with_capacity(self.line_len());

        for (i, field) in fields.iter().enumerate() {
            let field = field.as_ref();
            if field.contains(FIELD_DELIMITER) || field.contains(NEWLINE) {
                return Err(BibipError::MalformedRecord(format!(
                    "field {} contains a delimiter: {:?}",
                    i, field
                )));
            }
            if i > 0 {
                payload.push(FIELD_DELIMITER);
            }
            payload.push_str(field);
        }

        // Decoding trims trailing padding, so it must not end the payload
        if payload.ends_with(PADDING) {
            return Err(BibipError::MalformedRecord(format!(
                "last field ends with padding: {:?}",
                payload
            )));
        }

        // Width is measured in bytes since slots are byte-addressed
        if payload.len() > self.width {
            return Err(BibipError::RecordTooWide {
                width: self.width,
                len: payload.len(),
            });
        }

        let padding = self.width - payload.len();
        payload.extend(std::iter::repeat(PADDING).take(padding));
        payload.push(NEWLINE);

        Ok(payload)
    }

    /// Split one line back into `expected` raw field values
    pub fn decode_fields<'a>(&self, line: &'a str, expected: usize) -> Result<Vec<&'a str>> {
        if line.len() != self.line_len() {
            return Err(BibipError::MalformedRecord(format!(
                "line is {} bytes, expected {}",
                line.len(),
                self.line_len()
            )));
        }

        let payload = line.strip_suffix(NEWLINE).ok_or_else(|| {
            BibipError::MalformedRecord("line is not newline-terminated".to_string())
        })?;

        let fields: Vec<&str> = payload
            .trim_end_matches(PADDING)
            .split(FIELD_DELIMITER)
            .collect();

        if fields.len() != expected {
            return Err(BibipError::MalformedRecord(format!(
                "expected {} fields, found {}",
                expected,
                fields.len()
            )));
        }

        Ok(fields)
    }

    /// Encode a typed record
    pub fn encode<R: Record>(&self, record: &R) -> Result<String> {
        self.encode_fields(&record.to_fields()?)
    }

    /// Decode a typed record
    pub fn decode<R: Record>(&self, line: &str) -> Result<R> {
        let fields = self.decode_fields(line, R::FIELD_COUNT)?;
        R::from_fields(&fields)
    }
}
