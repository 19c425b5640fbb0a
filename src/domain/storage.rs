use super::Record;
use crate::error::Result;

/// Where finished records go. Each call appends exactly one row.
pub trait RecordSink {
    fn append(&mut self, record: &Record) -> Result<()>;
}
