//! Loosely-typed records decoded from a JSON dataset.

use crate::error::{Result, TerrafsError};
use serde_json::Value as JsonValue;
use std::io::Read;

/// A single scalar cell as found in the source JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    /// Every JSON number, integer or not
    Number(f64),
    Bool(bool),
    /// Field present but without a representable scalar (`null`, arrays, objects)
    Absent,
}

impl Value {
    fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::String(s) => Self::Text(s.clone()),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Absent, Self::Number),
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Self::Absent,
        }
    }
}

/// One dataset row: field name to value.
///
/// Field order follows the decoded JSON object, which serde_json keeps sorted
/// by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decode a dataset: a JSON array of objects.
///
/// A top-level `null` is an empty dataset and a `null` element is an empty
/// record. Anything else that is not an object is rejected.
pub fn records_from_json(doc: &JsonValue) -> Result<Vec<Record>> {
    let items = match doc {
        JsonValue::Null => return Ok(Vec::new()),
        JsonValue::Array(items) => items,
        other => {
            return Err(TerrafsError::Data(format!(
                "expected a JSON array of objects, found {}",
                json_kind(other)
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            JsonValue::Null => Ok(Record::new()),
            JsonValue::Object(map) => Ok(Record {
                fields: map
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            }),
            other => Err(TerrafsError::Data(format!(
                "element {idx} is {}, expected an object",
                json_kind(other)
            ))),
        })
        .collect()
}

/// Read and decode a dataset from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let doc: JsonValue = serde_json::from_reader(reader)?;
    records_from_json(&doc)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
