//! Schema inference over heterogeneous records.

use super::value::{Record, Value};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Column types the encoder can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Float64,
    Boolean,
}

impl ColumnType {
    /// Classify a value. Anything without a natural column type falls back to Text.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Text(_) | Value::Absent => Self::Text,
            Value::Number(_) => Self::Float64,
            Value::Bool(_) => Self::Boolean,
        }
    }

    pub fn to_arrow(self) -> DataType {
        match self {
            Self::Text => DataType::Utf8,
            Self::Float64 => DataType::Float64,
            Self::Boolean => DataType::Boolean,
        }
    }

    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Utf8 => Some(Self::Text),
            DataType::Float64 => Some(Self::Float64),
            DataType::Boolean => Some(Self::Boolean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub inferred_type: ColumnType,
    pub nullable: bool,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type,
            nullable: true,
        }
    }

    pub fn to_field(&self) -> Field {
        Field::new(&self.name, self.inferred_type.to_arrow(), self.nullable)
    }
}

/// Derive one entry per distinct field name.
///
/// The type of a column is decided by the first record carrying the field;
/// later records with a different runtime type are not reconciled and will
/// encode as nulls.
pub fn infer(records: &[Record]) -> Vec<SchemaEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for record in records {
        for (name, value) in record.fields() {
            if seen.insert(name) {
                entries.push(SchemaEntry::new(name, ColumnType::of(value)));
            }
        }
    }

    entries
}

pub fn to_arrow_schema(entries: &[SchemaEntry]) -> SchemaRef {
    Arc::new(Schema::new(
        entries.iter().map(SchemaEntry::to_field).collect::<Vec<_>>(),
    ))
}
