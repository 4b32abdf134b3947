use std::mem::take;

use tracing::warn;

/// A parsed line of the csv, one entry per field
pub type Row = Vec<String>;

pub trait RowParserTrait {
    /// Splits the whole text into rows. Implementations must be total: malformed quoting is
    /// treated as data, never as an error.
    fn parse_rows(&mut self, text: &str) -> Vec<Row>;
}

/// Hand written scanner: a two state automaton (inside quotes / outside quotes) with one
/// character of lookahead.
#[derive(Default)]
pub struct CsvRowParserScanImpl;

impl RowParserTrait for CsvRowParserScanImpl {
    fn parse_rows(&mut self, text: &str) -> Vec<Row> {
        parse_csv(text)
    }
}

/// Parses `text` into rows.
///
/// `\n`, `\r\n` and a lone `\r` all end a row. A `\r` that isn't part of a terminator is dropped,
/// even inside quotes.
pub fn parse_csv(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                rows.push(take(&mut row));
            }
            '\r' => {}
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Uses the csv crate in flexible, headerless mode.
///
/// Obs: unlike the scanner it skips empty lines and keeps `\r` inside quoted fields.
#[derive(Default)]
pub struct CsvRowParserCrateImpl {
    raw_record: csv::StringRecord,
}

impl RowParserTrait for CsvRowParserCrateImpl {
    fn parse_rows(&mut self, text: &str) -> Vec<Row> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        loop {
            match rdr.read_record(&mut self.raw_record) {
                Ok(true) => rows.push(self.raw_record.iter().map(str::to_owned).collect()),
                Ok(false) => break,
                Err(err) => {
                    warn!(error = %err, rows = rows.len(), "csv reader stopped early");
                    break;
                }
            }
        }

        rows
    }
}
