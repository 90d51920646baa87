//! Staged update builder.
//!
//! `update(table) → set/append/prepend/remove (≥1) → where_ → and* →
//! (if_ → and* | if_exists)? → execute`. A predicate before the first
//! assignment is unrepresentable: [`UpdateInit`] simply has no `where_`.

use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::query::assignment::Assignment;
use crate::query::criteria::CriteriaExpression;
use crate::query::update::UpdateQuery;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};
use crate::value::Value;

use super::DmlSink;

/// Target chosen; only assignments (and write options) are legal.
///
/// A predicate cannot be attached yet:
///
/// ```compile_fail
/// use cqlmap::prelude::*;
///
/// fn misuse<E: StatementExecutor>(dsl: &QueryDsl<'_, E>, table: &TableModel) {
///     dsl.update(table).where_(table.column("id").unwrap().eq(1));
/// }
/// ```
pub struct UpdateInit<S: DmlSink> {
    query: UpdateQuery,
    sink: S,
}

impl<S: DmlSink> UpdateInit<S> {
    pub(crate) fn new(table: &TableModel, sink: S) -> Self {
        let mut query = UpdateQuery::new();
        query.set_table(table);
        Self { query, sink }
    }

    pub fn using_ttl(mut self, seconds: u32) -> Self {
        self.query.set_ttl(seconds);
        self
    }

    pub fn using_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.query.set_timestamp(timestamp);
        self
    }

    pub fn using_timestamp_micros(mut self, micros: i64) -> Self {
        self.query.set_timestamp_micros(micros);
        self
    }

    /// Replace the column value.
    pub fn set(mut self, column: &ColumnModel, value: impl Into<Value>) -> UpdateAssignment<S> {
        self.query.set_assignment(Assignment::set(column, value));
        UpdateAssignment {
            query: self.query,
            sink: self.sink,
        }
    }

    /// Add elements to a collection column.
    pub fn append(mut self, column: &ColumnModel, value: impl Into<Value>) -> UpdateAssignment<S> {
        self.query.set_assignment(Assignment::append(column, value));
        UpdateAssignment {
            query: self.query,
            sink: self.sink,
        }
    }

    /// Add elements to the head of a list column.
    pub fn prepend(mut self, column: &ColumnModel, value: impl Into<Value>) -> UpdateAssignment<S> {
        self.query.set_assignment(Assignment::prepend(column, value));
        UpdateAssignment {
            query: self.query,
            sink: self.sink,
        }
    }

    /// Remove elements (or map keys) from a collection column.
    pub fn remove(mut self, column: &ColumnModel, value: impl Into<Value>) -> UpdateAssignment<S> {
        self.query.set_assignment(Assignment::remove(column, value));
        UpdateAssignment {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// At least one assignment; predicates may now be attached.
pub struct UpdateAssignment<S: DmlSink> {
    query: UpdateQuery,
    sink: S,
}

impl<S: DmlSink> UpdateAssignment<S> {
    pub fn set(mut self, column: &ColumnModel, value: impl Into<Value>) -> Self {
        self.query.set_assignment(Assignment::set(column, value));
        self
    }

    pub fn append(mut self, column: &ColumnModel, value: impl Into<Value>) -> Self {
        self.query.set_assignment(Assignment::append(column, value));
        self
    }

    pub fn prepend(mut self, column: &ColumnModel, value: impl Into<Value>) -> Self {
        self.query.set_assignment(Assignment::prepend(column, value));
        self
    }

    pub fn remove(mut self, column: &ColumnModel, value: impl Into<Value>) -> Self {
        self.query.set_assignment(Assignment::remove(column, value));
        self
    }

    pub fn where_(mut self, criteria: CriteriaExpression) -> UpdateWhere<S> {
        self.query.set_where(criteria);
        UpdateWhere {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// Predicates attached; conditions or execution come next.
pub struct UpdateWhere<S: DmlSink> {
    query: UpdateQuery,
    sink: S,
}

impl<S: DmlSink> UpdateWhere<S> {
    /// Conjoin another predicate (`AND`).
    pub fn and(mut self, criteria: CriteriaExpression) -> Self {
        self.query.set_where(criteria);
        self
    }

    /// Attach a compare-and-set condition. Mutually exclusive with
    /// [`Self::if_exists`].
    pub fn if_(mut self, criteria: CriteriaExpression) -> UpdateIf<S> {
        self.query.set_if(criteria);
        UpdateIf {
            query: self.query,
            sink: self.sink,
        }
    }

    /// Only apply when the row already exists.
    pub fn if_exists(mut self) -> UpdateFinal<S> {
        self.query.enable_if_exists();
        UpdateFinal {
            query: self.query,
            sink: self.sink,
        }
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.query.build_statement()
    }

    pub fn execute(self) -> Result<S::Output, QueryError> {
        let statement = self.query.build_statement()?;
        self.sink.dispatch(statement)
    }
}

/// At least one condition; more can be conjoined.
pub struct UpdateIf<S: DmlSink> {
    query: UpdateQuery,
    sink: S,
}

impl<S: DmlSink> UpdateIf<S> {
    /// Conjoin another condition (`AND`).
    pub fn and(mut self, criteria: CriteriaExpression) -> Self {
        self.query.set_if(criteria);
        self
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.query.build_statement()
    }

    pub fn execute(self) -> Result<S::Output, QueryError> {
        let statement = self.query.build_statement()?;
        self.sink.dispatch(statement)
    }
}

/// `IF EXISTS` attached; only execution remains.
pub struct UpdateFinal<S: DmlSink> {
    query: UpdateQuery,
    sink: S,
}

impl<S: DmlSink> UpdateFinal<S> {
    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.query.build_statement()
    }

    pub fn execute(self) -> Result<S::Output, QueryError> {
        let statement = self.query.build_statement()?;
        self.sink.dispatch(statement)
    }
}
