//! Deserialized result records.

use std::collections::HashMap;

use crate::error::QueryError;
use crate::executor::Row;
use crate::query::selector::SelectableField;
use crate::value::Value;
use crate::wire::from_wire;

/// A fetched row (or an entity about to be written), as field-name →
/// language-level value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Deserialize a transport row through each selected field's descriptor.
    /// Result columns absent from the row surface as [`Value::Null`].
    pub(crate) fn from_row(row: &Row, fields: &[SelectableField]) -> Result<Self, QueryError> {
        let mut values = HashMap::with_capacity(fields.len());
        for field in fields {
            let value = match row.get(field.name()) {
                Some(wire) => from_wire(wire, field.descriptor())?,
                None => Value::Null,
            };
            values.insert(field.name().to_string(), value);
        }
        Ok(Self { values })
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
