//! CSV row codec for the durable log
//!
//! The log is plain comma-separated text. Fields containing the separator,
//! a double quote, CR or LF (or starting with whitespace) are wrapped in
//! double quotes with embedded quotes doubled, so any name survives a
//! write followed by a read.
//!
//! Reading is strict: a bare quote inside an unquoted field, stray text after
//! a closing quote and an unterminated quoted field are all rejected. Blank
//! lines are skipped and CRLF line endings are accepted. Inside a quoted
//! field every character is kept as written, CR included.

use std::iter::Peekable;
use std::str::Chars;

use super::errors::{LogError, LogResult};
use crate::person::{Person, PersonId};

/// A raw log row: the fields of one line, unparsed
pub type Row = Vec<String>;

/// Header row written at the top of every log file
pub const HEADER: [&str; 2] = ["ID", "Name"];

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// The header row as an owned [`Row`]
pub fn header_row() -> Row {
    HEADER.iter().map(|s| s.to_string()).collect()
}

/// Whether `row` is exactly the header row
pub fn is_header_row(row: &[String]) -> bool {
    row.len() == HEADER.len() && row.iter().zip(HEADER).all(|(field, name)| field == name)
}

/// Encode a person as a raw row
pub fn person_to_row(person: &Person) -> Row {
    vec![person.id.to_string(), person.name.clone()]
}

/// Interpret a raw data row as a person
///
/// Returns `None` for rows with fewer than two fields. Extra fields are ignored.
pub fn row_to_person(row: &[String]) -> Option<Result<Person, String>> {
    if row.len() < 2 {
        return None;
    }
    Some(
        parse_id(&row[0])
            .map(|id| Person::new(id, row[1].clone()))
            .ok_or_else(|| format!("invalid id {:?}", row[0])),
    )
}

/// Parse a decimal identifier as it appears in the log or in a URL
pub fn parse_id(raw: &str) -> Option<PersonId> {
    raw.parse::<PersonId>().ok()
}

fn needs_quotes(field: &str) -> bool {
    field.starts_with([' ', '\t'])
        || field
            .chars()
            .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n')
}

fn encode_field(out: &mut String, field: &str) {
    if !needs_quotes(field) {
        out.push_str(field);
        return;
    }
    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}

/// Encode one row as a single line, including the trailing newline
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::with_capacity(32);
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        encode_field(&mut out, field.as_ref());
    }
    out.push('\n');
    out
}

/// Encode a sequence of rows as a complete document
pub fn encode_rows(rows: &[Row]) -> String {
    rows.iter().map(|row| encode_row(row.as_slice())).collect()
}

/// Decode a complete document into rows
pub fn decode_rows(text: &str) -> LogResult<Vec<Row>> {
    let mut decoder = Decoder {
        chars: text.chars().peekable(),
        line: 1,
    };
    let mut rows = Vec::new();
    while let Some(row) = decoder.next_row()? {
        rows.push(row);
    }
    Ok(rows)
}

enum FieldEnd {
    Delimiter,
    Line,
    Eof,
}

struct Decoder<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl Decoder<'_> {
    fn malformed(&self, line: usize, reason: &str) -> LogError {
        LogError::Malformed {
            line,
            reason: reason.to_string(),
        }
    }

    fn skip_blank_lines(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => {
                    self.chars.next();
                    self.line += 1;
                }
                '\r' => {
                    self.chars.next();
                }
                _ => break,
            }
        }
    }

    fn next_row(&mut self) -> LogResult<Option<Row>> {
        self.skip_blank_lines();
        if self.chars.peek().is_none() {
            return Ok(None);
        }

        let mut row = Vec::with_capacity(HEADER.len());
        loop {
            let (field, end) = self.next_field()?;
            row.push(field);
            match end {
                FieldEnd::Delimiter => continue,
                FieldEnd::Line | FieldEnd::Eof => return Ok(Some(row)),
            }
        }
    }

    fn next_field(&mut self) -> LogResult<(String, FieldEnd)> {
        if self.chars.peek() == Some(&QUOTE) {
            self.chars.next();
            return self.quoted_field();
        }

        let mut field = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                DELIMITER => return Ok((field, FieldEnd::Delimiter)),
                '\n' => {
                    self.line += 1;
                    return Ok((field, FieldEnd::Line));
                }
                '\r' if self.chars.peek() == Some(&'\n') => {}
                QUOTE => return Err(self.malformed(self.line, "bare quote in unquoted field")),
                c => field.push(c),
            }
        }
        Ok((field, FieldEnd::Eof))
    }

    fn quoted_field(&mut self) -> LogResult<(String, FieldEnd)> {
        let start_line = self.line;
        let mut field = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.malformed(start_line, "unterminated quoted field")),
                Some(QUOTE) => {
                    if self.chars.peek() == Some(&QUOTE) {
                        self.chars.next();
                        field.push(QUOTE);
                    } else {
                        break;
                    }
                }
                Some('\n') => {
                    self.line += 1;
                    field.push('\n');
                }
                Some(c) => field.push(c),
            }
        }

        match self.chars.next() {
            None => Ok((field, FieldEnd::Eof)),
            Some(DELIMITER) => Ok((field, FieldEnd::Delimiter)),
            Some('\n') => {
                self.line += 1;
                Ok((field, FieldEnd::Line))
            }
            Some('\r') if self.chars.peek() == Some(&'\n') => {
                self.chars.next();
                self.line += 1;
                Ok((field, FieldEnd::Line))
            }
            Some(_) => Err(self.malformed(self.line, "unexpected character after closing quote")),
        }
    }
}
