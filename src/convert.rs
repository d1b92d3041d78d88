//! JSON to Parquet conversion.
//!
//! A dataset is a JSON array of flat objects. Conversion runs in three steps:
//!
//! 1. [`value::read_records`] decodes the document into [`Record`]s, mapping
//!    every cell onto the closed [`Value`] type.
//! 2. [`schema::infer`] derives one nullable column per distinct field name.
//!    A column takes the type of the first value seen for its field; values
//!    without a natural type fall back to text.
//! 3. [`encode::encode`] builds a single Arrow `RecordBatch`, writing a null
//!    wherever a record lacks the field or holds a value of another type, and
//!    [`parquet_io`] serializes it as a Snappy-compressed Parquet file.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = terrafs::convert::convert_file(Path::new("sales.json"), Path::new("sales.parquet"))?;
//! println!("{} rows, {} columns", report.rows, report.columns);
//! # Ok::<(), terrafs::error::TerrafsError>(())
//! ```

pub mod encode;
pub mod parquet_io;
pub mod schema;
pub mod value;


pub use encode::{encode, encode_with_schema};
pub use schema::{ColumnType, SchemaEntry, infer};
pub use value::{Record, Value, read_records};

use crate::error::{Result, ResultExt as _};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Summary of one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Rows stored in the Parquet file. Records with no fields at all yield
    /// no columns, and then nothing is stored.
    pub rows: usize,
    pub columns: usize,
    pub output: PathBuf,
}

/// Infer and encode in one call.
pub fn records_to_batch(records: &[Record]) -> Result<RecordBatch> {
    let entries = infer(records);
    tracing::debug!(
        "Inferred {} columns from {} records",
        entries.len(),
        records.len()
    );
    encode(&entries, records)
}

/// Convert a JSON dataset file into a Parquet file.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConvertReport> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open JSON file {}", input.display()))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("Failed to decode JSON from {}", input.display()))?;

    let batch = records_to_batch(&records)?;
    let rows = parquet_io::write_parquet_file(&batch, output)?;
    if rows < batch.num_rows() {
        tracing::warn!(
            "{} records in {} carry no fields; the Parquet file holds no rows",
            batch.num_rows(),
            input.display()
        );
    }

    tracing::info!(
        "Converted {} to {} ({} rows, {} columns)",
        input.display(),
        output.display(),
        rows,
        batch.num_columns()
    );

    Ok(ConvertReport {
        rows,
        columns: batch.num_columns(),
        output: output.to_path_buf(),
    })
}
