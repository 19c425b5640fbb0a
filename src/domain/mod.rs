mod record;
pub(crate) mod storage;

pub use record::{CellValue, ColumnSums, Headline, Record, NSLOC_COLUMN, NSLOC_MISSING};
pub use storage::RecordSink;
