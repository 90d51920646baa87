//! Selectable fields: plain columns and aggregates.

use crate::schema::{ColumnModel, ScalarKind, TypeDescriptor};

/// A field that can appear in a select projection. Carries the descriptor
/// used to deserialize the corresponding result column.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableField {
    name: String,
    cql: String,
    descriptor: TypeDescriptor,
}

impl SelectableField {
    /// Plain column selector.
    pub fn column(column: &ColumnModel) -> Self {
        Self {
            name: column.name().to_string(),
            cql: column.name().to_string(),
            descriptor: column.descriptor().clone(),
        }
    }

    /// `count(column)` selector.
    pub fn count(column: &ColumnModel) -> Self {
        Self::aggregate("count", column, TypeDescriptor::Scalar(ScalarKind::BigInt))
    }

    /// `count(*)` selector.
    pub fn count_all() -> Self {
        Self {
            name: "count(*)".to_string(),
            cql: "count(*)".to_string(),
            descriptor: TypeDescriptor::Scalar(ScalarKind::BigInt),
        }
    }

    /// `min(column)` selector; result deserializes like the column itself.
    pub fn min(column: &ColumnModel) -> Self {
        Self::aggregate("min", column, column.descriptor().clone())
    }

    /// `max(column)` selector.
    pub fn max(column: &ColumnModel) -> Self {
        Self::aggregate("max", column, column.descriptor().clone())
    }

    /// `sum(column)` selector.
    pub fn sum(column: &ColumnModel) -> Self {
        Self::aggregate("sum", column, column.descriptor().clone())
    }

    /// `avg(column)` selector.
    pub fn avg(column: &ColumnModel) -> Self {
        Self::aggregate("avg", column, column.descriptor().clone())
    }

    fn aggregate(func: &str, column: &ColumnModel, descriptor: TypeDescriptor) -> Self {
        let rendered = format!("{func}({})", column.name());
        Self {
            name: rendered.clone(),
            cql: rendered,
            descriptor,
        }
    }

    /// Key under which the result column is exposed on a fetched record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendered projection fragment.
    pub fn cql(&self) -> &str {
        &self.cql
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}
