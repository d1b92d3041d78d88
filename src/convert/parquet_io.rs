//! Parquet serialization of encoded batches.

use crate::error::{Result, ResultExt as _};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::ChunkReader;
use parquet::format::KeyValue;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn writer_properties() -> WriterProperties {
    let created_by = KeyValue {
        key: "created_by".to_owned(),
        value: Some(format!("terrafs {}", crate::VERSION)),
    };
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_key_value_metadata(Some(vec![created_by]))
        .build()
}

/// Write one batch as a complete Parquet file (schema, column chunks, footer).
///
/// Returns the number of rows stored. Parquet has no way to carry rows
/// without columns, so a zero-column batch stores none.
pub fn write_parquet<W: Write + Send>(batch: &RecordBatch, sink: W) -> Result<usize> {
    let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(writer_properties()))?;
    let rows = if batch.num_columns() > 0 {
        batch.num_rows()
    } else {
        0
    };
    if rows > 0 {
        writer.write(batch)?;
    }
    writer.close()?;
    Ok(rows)
}

pub fn write_parquet_file(batch: &RecordBatch, path: &Path) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create Parquet file {}", path.display()))?;
    write_parquet(batch, file)
}

/// Read every batch back from Parquet bytes or a file.
pub fn read_parquet<R: ChunkReader + 'static>(source: R) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(source)?.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

pub fn read_parquet_file(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open Parquet file {}", path.display()))?;
    read_parquet(file)
}
