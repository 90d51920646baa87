//! Assignment expressions for update and insert paths.

use crate::schema::{ColumnModel, TypeDescriptor};
use crate::value::Value;

/// How an assignment applies to the current column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperation {
    /// Replace the value outright.
    Set,
    /// Add elements to the tail of a list, or into a set or map.
    Append,
    /// Add elements to the head of a list.
    Prepend,
    /// Remove elements from a collection (keys, for a map).
    Remove,
}

impl AssignmentOperation {
    pub fn name(self) -> &'static str {
        match self {
            AssignmentOperation::Set => "SET",
            AssignmentOperation::Append => "APPEND",
            AssignmentOperation::Prepend => "PREPEND",
            AssignmentOperation::Remove => "REMOVE",
        }
    }
}

/// A pending column assignment, consumed once by clause construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    column: String,
    descriptor: TypeDescriptor,
    operation: AssignmentOperation,
    value: Value,
}

impl Assignment {
    fn new(column: &ColumnModel, operation: AssignmentOperation, value: Value) -> Self {
        Self {
            column: column.name().to_string(),
            descriptor: column.descriptor().clone(),
            operation,
            value,
        }
    }

    pub fn set(column: &ColumnModel, value: impl Into<Value>) -> Self {
        Self::new(column, AssignmentOperation::Set, value.into())
    }

    pub fn append(column: &ColumnModel, value: impl Into<Value>) -> Self {
        Self::new(column, AssignmentOperation::Append, value.into())
    }

    pub fn prepend(column: &ColumnModel, value: impl Into<Value>) -> Self {
        Self::new(column, AssignmentOperation::Prepend, value.into())
    }

    pub fn remove(column: &ColumnModel, value: impl Into<Value>) -> Self {
        Self::new(column, AssignmentOperation::Remove, value.into())
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operation(&self) -> AssignmentOperation {
        self.operation
    }

    pub(crate) fn into_parts(self) -> (String, TypeDescriptor, AssignmentOperation, Value) {
        (self.column, self.descriptor, self.operation, self.value)
    }
}
