use indexmap::IndexMap;
use std::fmt;

pub const PLACEHOLDER_COLUMNS: [&str; 5] = ["Total", "High", "Solo", "Med", "Gas"];
pub const URL_COLUMN: &str = "URL";
pub const NSLOC_COLUMN: &str = "nSloc";
pub const NSLOC_MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// The five labelled fragments at the top of a contest page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub prize_pool: String,
    pub duration: String,
}

/// Per-column sums of a leaderboard, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSums {
    sums: IndexMap<String, f64>,
}

impl ColumnSums {
    pub fn add(&mut self, column: &str, value: f64) {
        *self.sums.entry(column.to_string()).or_insert(0.0) += value;
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.sums.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.sums.iter().map(|(name, sum)| (name.as_str(), *sum))
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}

/// One spreadsheet row. Columns keep insertion order and depend on what the
/// scraped page contained, so this is a name to value mapping rather than a
/// fixed struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh record for one headline group, with zeroed payout placeholders.
    pub fn from_headline(headline: &Headline, url: &str) -> Self {
        let mut record = Self::new();
        record.set("Name", headline.name.as_str());
        record.set("Start date", headline.start_date.as_str());
        record.set("End date", headline.end_date.as_str());
        record.set("Prize pool", headline.prize_pool.as_str());
        record.set("Duration", headline.duration.as_str());
        for column in PLACEHOLDER_COLUMNS {
            record.set(column, 0.0);
        }
        record.set(URL_COLUMN, url);
        record
    }

    /// Overwrites in place if the column exists, appends otherwise.
    pub fn set(&mut self, column: &str, value: impl Into<CellValue>) {
        self.fields.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn merge_sums(&mut self, sums: &ColumnSums) {
        for (column, sum) in sums.iter() {
            self.set(column, sum);
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
