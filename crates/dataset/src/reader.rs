//! Quote-aware CSV record splitting.
//!
//! Records follow RFC 4180 quoting: a field opening with `"` runs to the
//! matching closing quote, `""` inside it is a literal quote, and commas and
//! newlines inside quotes belong to the field. A quote anywhere else is kept
//! as an ordinary character.

use riskscore_core::RiskError;

/// Header plus data records of one decoded CSV file.
///
/// `None` cells pad records that were shorter than the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub records: Vec<Vec<Option<String>>>,
    /// Records dropped as malformed (too many cells or an unterminated quote).
    pub skipped: usize,
}

#[derive(Debug)]
struct Record {
    fields: Vec<String>,
    complete: bool,
}

impl Record {
    fn is_blank(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_empty()
    }
}

#[derive(Default)]
struct Splitter {
    records: Vec<Record>,
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
}

impl Splitter {
    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
    }

    fn end_record(&mut self, complete: bool) {
        self.end_field();
        self.records.push(Record {
            fields: std::mem::take(&mut self.fields),
            complete,
        });
    }

    fn split(mut self, text: &str) -> Vec<Record> {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if self.in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        self.field.push('"');
                        chars.next();
                    } else {
                        self.in_quotes = false;
                    }
                } else {
                    self.field.push(c);
                }
                continue;
            }

            match c {
                '"' if self.field.is_empty() => self.in_quotes = true,
                ',' => self.end_field(),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\r' | '\n' => self.end_record(true),
                _ => self.field.push(c),
            }
        }

        if self.in_quotes {
            self.end_record(false);
        } else if !self.field.is_empty() || !self.fields.is_empty() {
            self.end_record(true);
        }

        self.records.retain(|r| !r.is_blank());
        self.records
    }
}

/// Split decoded CSV text into header and records.
///
/// Fails only when there is no header row to parse.
pub fn parse_csv(text: &str) -> Result<RawTable, RiskError> {
    let mut records = Splitter::default().split(text).into_iter();

    let header = match records.next() {
        Some(r) if r.complete => r.fields,
        Some(_) => return Err(RiskError::Decode("unterminated quote in header".to_string())),
        None => return Err(RiskError::Decode("no columns to parse from file".to_string())),
    };

    let width = header.len();
    let mut rows = Vec::new();
    let mut skipped = 0;

    for record in records {
        if !record.complete || record.fields.len() > width {
            skipped += 1;
            continue;
        }
        let mut row: Vec<Option<String>> = record.fields.into_iter().map(Some).collect();
        row.resize(width, None);
        rows.push(row);
    }

    Ok(RawTable {
        header: dedup_header(header),
        records: rows,
        skipped,
    })
}

/// Suffix repeated header names with `.1`, `.2`, ... so every column is addressable.
fn dedup_header(header: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(header.len());
    for name in header {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[Option<String>]) -> Vec<Option<&str>> {
        row.iter().map(|c| c.as_deref()).collect()
    }

    #[test]
    fn splits_simple_rows() {
        let table = parse_csv("a,b\n1,2\r\n3,4\n").unwrap();
        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(cells(&table.records[1]), vec![Some("3"), Some("4")]);
        assert_eq!(table.skipped, 0);
    }

    #[test]
    fn quoted_fields_keep_commas_newlines_and_quotes() {
        let table = parse_csv("name,note\n\"Pereira, Jan\",\"line1\nline2 \"\"x\"\"\"\n").unwrap();
        assert_eq!(
            cells(&table.records[0]),
            vec![Some("Pereira, Jan"), Some("line1\nline2 \"x\"")]
        );
    }

    #[test]
    fn long_rows_are_skipped_short_rows_padded() {
        let table = parse_csv("a,b,c\n1,2,3\n1,2,3,4\n5\n").unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.skipped, 1);
        assert_eq!(cells(&table.records[1]), vec![Some("5"), None, None]);
    }

    #[test]
    fn unterminated_quote_drops_trailing_record() {
        let table = parse_csv("a,b\n1,2\n\"open,3\n").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.skipped, 1);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let table = parse_csv("a\n\n1\n\n").unwrap();
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn empty_text_has_no_header() {
        assert!(parse_csv("").is_err());
        assert!(parse_csv("\n\n").is_err());
    }

    #[test]
    fn duplicate_header_names_are_suffixed() {
        let table = parse_csv("id,id,id\n1,2,3\n").unwrap();
        assert_eq!(table.header, vec!["id", "id.1", "id.2"]);
    }
}
