use crate::{
    common::text::trim_blank,
    domain::record::{Record, columns},
};

/// A search query, trimmed and lower cased. The empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        Self(trim_blank(raw).to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring match against the Fruit and Form fields, ignoring case
    pub fn matches(&self, record: &Record) -> bool {
        self.is_empty()
            || [columns::FRUIT, columns::FORM]
                .into_iter()
                .any(|key| record.field(key).to_lowercase().contains(&self.0))
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Keeps the records matched by `query`, in their original order
pub fn filter_records<'a>(records: &'a [Record], query: &Query) -> Vec<&'a Record> {
    records.iter().filter(|record| query.matches(record)).collect()
}
