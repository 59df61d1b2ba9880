use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDate;
use csv::StringRecord;
use thiserror::Error;

use crate::domain::price::{NewPrice, RecordSchema, default_create_date};
use crate::domain::types::{PriceAmount, PriceId};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Multipart upload carrying the price archive in the `file` field.
#[derive(MultipartForm)]
pub struct UploadPricesForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

impl UploadPricesForm {
    /// Read the uploaded archive into memory.
    pub fn read_archive(&mut self) -> std::io::Result<Vec<u8>> {
        let file = self.file.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Line-level failure; line numbers are 1-based and count blank lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("line {line}: expected {expected} fields, found {found}: {content:?}")]
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
        content: String,
    },
    #[error("line {line}: invalid id {value:?}")]
    InvalidId { line: usize, value: String },
    #[error("line {line}: invalid price {value:?}")]
    InvalidPrice { line: usize, value: String },
    #[error("line {line}: invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: {message}")]
    Unreadable { line: usize, message: String },
}

/// Parse one delimited file into insertable prices.
///
/// A first line exactly equal to the schema header is dropped. The first bad
/// line aborts the whole parse, so callers either get every record or none.
pub fn parse_price_rows(
    text: &str,
    schema: RecordSchema,
) -> Result<Vec<NewPrice>, RecordParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut prices = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| RecordParseError::Unreadable {
            line: err.position().map_or(0, |pos| pos.line() as usize),
            message: err.to_string(),
        })?;
        let (line, content) = locate_record(text, &record);

        if line == 1 && content == schema.header() {
            continue;
        }
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        prices.push(parse_price_record(line, content, &record, schema)?);
    }

    Ok(prices)
}

/// Line number and raw text of `record`.
///
/// The reader positions a record where it started scanning, which is before
/// any empty lines it skipped on the way.
fn locate_record<'a>(text: &'a str, record: &StringRecord) -> (usize, &'a str) {
    let (mut line, mut start) = record
        .position()
        .map_or((1, 0), |pos| (pos.line() as usize, pos.byte() as usize));

    let skipped = text
        .get(start..)
        .unwrap_or_default()
        .bytes()
        .take_while(|b| matches!(b, b'\r' | b'\n'));
    for byte in skipped {
        if byte == b'\n' {
            line += 1;
        }
        start += 1;
    }

    let content = text
        .get(start..)
        .and_then(|rest| rest.lines().next())
        .unwrap_or_default();
    (line, content)
}

fn parse_price_record(
    line: usize,
    content: &str,
    record: &StringRecord,
    schema: RecordSchema,
) -> Result<NewPrice, RecordParseError> {
    if record.len() != schema.field_count() {
        return Err(RecordParseError::MalformedLine {
            line,
            expected: schema.field_count(),
            found: record.len(),
            content: content.to_string(),
        });
    }

    match schema {
        RecordSchema::Full => Ok(NewPrice {
            id: parse_id(line, &record[0])?,
            name: record[1].to_string(),
            category: record[2].to_string(),
            price: parse_price(line, &record[3])?,
            create_date: parse_date(line, &record[4])?,
        }),
        RecordSchema::Compact => Ok(NewPrice {
            id: None,
            name: String::new(),
            category: record[0].to_string(),
            price: parse_price(line, &record[1])?,
            create_date: default_create_date(),
        }),
    }
}

fn parse_id(line: usize, value: &str) -> Result<Option<PriceId>, RecordParseError> {
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<i32>()
        .ok()
        .and_then(|id| PriceId::new(id).ok())
        .map(Some)
        .ok_or_else(|| RecordParseError::InvalidId {
            line,
            value: value.to_string(),
        })
}

fn parse_price(line: usize, value: &str) -> Result<PriceAmount, RecordParseError> {
    let value = if value.is_empty() { "0.0" } else { value };

    value
        .parse::<f64>()
        .ok()
        .and_then(|price| PriceAmount::new(price).ok())
        .ok_or_else(|| RecordParseError::InvalidPrice {
            line,
            value: value.to_string(),
        })
}

fn parse_date(line: usize, value: &str) -> Result<NaiveDate, RecordParseError> {
    if value.is_empty() {
        return Ok(default_create_date());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| RecordParseError::InvalidDate {
        line,
        value: value.to_string(),
    })
}
