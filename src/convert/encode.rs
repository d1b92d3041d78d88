//! Builds one Arrow `RecordBatch` from records and an inferred schema.

use super::schema::{SchemaEntry, to_arrow_schema};
use super::value::{Record, Value};
use crate::error::{Result, TerrafsError};
use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Per-column builder; a cell is appended only on an exact type match.
enum ColumnBuilder {
    Text(StringBuilder),
    Float64(Float64Builder),
    Boolean(BooleanBuilder),
}

impl ColumnBuilder {
    fn for_type(name: &str, data_type: &DataType, capacity: usize) -> Result<Self> {
        match data_type {
            DataType::Utf8 => Ok(Self::Text(StringBuilder::with_capacity(capacity, 0))),
            DataType::Float64 => Ok(Self::Float64(Float64Builder::with_capacity(capacity))),
            DataType::Boolean => Ok(Self::Boolean(BooleanBuilder::with_capacity(capacity))),
            _ => Err(TerrafsError::Encoding {
                field: name.to_owned(),
            }),
        }
    }

    fn append(&mut self, value: Option<&Value>) {
        match (self, value) {
            (Self::Text(b), Some(Value::Text(s))) => b.append_value(s),
            (Self::Float64(b), Some(Value::Number(n))) => b.append_value(*n),
            (Self::Boolean(b), Some(Value::Bool(v))) => b.append_value(*v),
            (Self::Text(b), _) => b.append_null(),
            (Self::Float64(b), _) => b.append_null(),
            (Self::Boolean(b), _) => b.append_null(),
        }
    }

    fn finish(self) -> ArrayRef {
        match self {
            Self::Text(mut b) => Arc::new(b.finish()),
            Self::Float64(mut b) => Arc::new(b.finish()),
            Self::Boolean(mut b) => Arc::new(b.finish()),
        }
    }
}

/// Encode records against inferred schema entries.
pub fn encode(entries: &[SchemaEntry], records: &[Record]) -> Result<RecordBatch> {
    encode_with_schema(to_arrow_schema(entries), records)
}

/// Encode records against an Arrow schema.
///
/// # Errors
///
/// Returns [`TerrafsError::Encoding`] naming the first field whose type is
/// not Utf8, Float64 or Boolean.
pub fn encode_with_schema(schema: SchemaRef, records: &[Record]) -> Result<RecordBatch> {
    let mut builders = schema
        .fields()
        .iter()
        .map(|field| ColumnBuilder::for_type(field.name(), field.data_type(), records.len()))
        .collect::<Result<Vec<_>>>()?;

    for record in records {
        for (field, builder) in schema.fields().iter().zip(builders.iter_mut()) {
            builder.append(record.get(field.name()));
        }
    }

    let columns = builders.into_iter().map(ColumnBuilder::finish).collect();

    // Row count must be explicit for zero-column batches.
    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
