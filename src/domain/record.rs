use tracing::debug;

use crate::{common::text::trim_blank, error::EmptyInputError, parsers::csv_parser::Row};

/// Header names read by the default presentation
pub mod columns {
    pub const FRUIT: &str = "Fruit";
    pub const FORM: &str = "Form";
    pub const RETAIL_PRICE: &str = "RetailPrice";
    pub const RETAIL_PRICE_UNIT: &str = "RetailPriceUnit";
}

/// One data row keyed by the header. Keys keep header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Zips `row` against `header`: missing trailing values become empty strings and values past
    /// the header are dropped.
    pub fn from_row(header: &[String], row: Row) -> Self {
        let mut values = row.into_iter();
        let mut record = Self {
            fields: Vec::with_capacity(header.len()),
        };

        for key in header {
            record.insert(key, values.next().unwrap_or_default());
        }

        record
    }

    /// Sets the value of `key`. A key that is already present keeps its position and only the
    /// value is replaced.
    pub fn insert(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_owned(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`Record::get`] but a missing key reads as an empty string
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A row is blank if every field is empty after trimming
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|field| trim_blank(field).is_empty())
}

/// The header columns of a csv together with its records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Distinct header names in the order records keep their keys
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Turns parsed rows into a [`Dataset`], using the first row as the header.
///
/// # Errors
///
/// `rows` is empty, so there is no header
pub fn to_dataset(rows: Vec<Row>) -> Result<Dataset, EmptyInputError> {
    let mut rows = rows.into_iter();
    let header = rows.next().ok_or(EmptyInputError)?;

    let mut blank = 0;
    let records: Vec<Record> = rows
        .filter(|row| {
            let keep = !is_blank_row(row);
            blank += usize::from(!keep);
            keep
        })
        .map(|row| Record::from_row(&header, row))
        .collect();

    debug!(
        columns = header.len(),
        records = records.len(),
        blank_rows = blank,
        "built records"
    );

    let headers = Record::from_row(&header, vec![])
        .keys()
        .map(str::to_owned)
        .collect();

    Ok(Dataset { headers, records })
}

/// Turns parsed rows into records, using the first row as the header.
///
/// # Errors
///
/// `rows` is empty, so there is no header
pub fn to_records(rows: Vec<Row>) -> Result<Vec<Record>, EmptyInputError> {
    to_dataset(rows).map(|dataset| dataset.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::csv_parser::parse_csv;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_records_zips_header() {
        let records = to_records(parse_csv("Fruit,Form\nApples,Fresh\nPears,Canned\n")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("Fruit"), "Apples");
        assert_eq!(records[0].field("Form"), "Fresh");
        assert_eq!(records[1].field("Fruit"), "Pears");
        assert_eq!(
            records[1].iter().collect::<Vec<_>>(),
            vec![("Fruit", "Pears"), ("Form", "Canned")]
        );
    }

    #[test]
    fn test_to_records_empty_input_fails() {
        assert_eq!(to_records(vec![]), Err(EmptyInputError));
        assert_eq!(to_records(parse_csv("")), Err(EmptyInputError));
    }

    #[test]
    fn test_to_records_header_only() {
        assert_eq!(to_records(parse_csv("Fruit,Form\n")), Ok(vec![]));
    }

    #[test]
    fn test_to_records_drops_blank_rows() {
        let records = to_records(parse_csv("Fruit,Form\n , ,\nApples,Fresh\n\n\t,\n")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("Fruit"), "Apples");
    }

    #[test]
    fn test_to_records_ragged_rows() {
        let header = row(&["a", "b", "c"]);
        let records = to_records(vec![header, row(&["1"]), row(&["1", "2", "3", "4", "5"])]).unwrap();

        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0].values().collect::<Vec<_>>(), vec!["1", "", ""]);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].values().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_duplicate_header_last_value_wins() {
        let records = to_records(vec![row(&["x", "y", "x"]), row(&["1", "2", "3"])]).unwrap();

        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(records[0].field("x"), "3");
    }

    #[test]
    fn test_dataset_keeps_header() {
        let dataset = to_dataset(parse_csv("Fruit,Form\n")).unwrap();
        assert_eq!(dataset.headers, row(&["Fruit", "Form"]));
        assert!(dataset.records.is_empty());

        let dataset = to_dataset(vec![row(&["x", "y", "x"]), row(&["1", "2", "3"])]).unwrap();
        assert_eq!(dataset.headers, row(&["x", "y"]));
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let records = to_records(vec![row(&["Fruit"]), row(&["Apples"])]).unwrap();

        assert_eq!(records[0].get("Form"), None);
        assert_eq!(records[0].field("Form"), "");
    }

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(&row(&[""])));
        assert!(is_blank_row(&row(&[" ", "\t", ""])));
        assert!(!is_blank_row(&row(&["", "x"])));
        assert!(!is_blank_row(&row(&["\u{85}"])));
    }
}
