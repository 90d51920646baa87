//! Staged delete builder.

use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::query::criteria::CriteriaExpression;
use crate::query::delete::DeleteQuery;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};

use super::DmlSink;

/// Optional column selectors chosen; the target table comes next.
pub struct DeleteInit<S: DmlSink> {
    query: DeleteQuery,
    sink: S,
}

impl<S: DmlSink> DeleteInit<S> {
    pub(crate) fn new(columns: &[&ColumnModel], sink: S) -> Self {
        let mut query = DeleteQuery::new();
        query.set_selectors(columns);
        Self { query, sink }
    }

    pub fn from(mut self, table: &TableModel) -> DeleteFrom<S> {
        self.query.set_table(table);
        DeleteFrom {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// Target chosen; a key predicate is required before anything can run.
pub struct DeleteFrom<S: DmlSink> {
    query: DeleteQuery,
    sink: S,
}

impl<S: DmlSink> DeleteFrom<S> {
    pub fn using_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.query.set_timestamp(timestamp);
        self
    }

    pub fn using_timestamp_micros(mut self, micros: i64) -> Self {
        self.query.set_timestamp_micros(micros);
        self
    }

    pub fn where_(mut self, criteria: CriteriaExpression) -> DeleteWhere<S> {
        self.query.set_where(criteria);
        DeleteWhere {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// Predicates attached; conditions or execution come next.
pub struct DeleteWhere<S: DmlSink> {
    query: DeleteQuery,
    sink: S,
}

impl<S: DmlSink> DeleteWhere<S> {
    /// Conjoin another predicate (`AND`).
    pub fn and(mut self, criteria: CriteriaExpression) -> Self {
        self.query.set_where(criteria);
        self
    }

    /// Attach a compare-and-set condition. Mutually exclusive with
    /// [`Self::if_exists`].
    pub fn if_(mut self, criteria: CriteriaExpression) -> DeleteIf<S> {
        self.query.set_if(criteria);
        DeleteIf {
            query: self.query,
            sink: self.sink,
        }
    }

    /// Only apply when the row exists.
    pub fn if_exists(mut self) -> DeleteFinal<S> {
        self.query.enable_if_exists();
        DeleteFinal {
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
pub struct DeleteIf<S: DmlSink> {
    query: DeleteQuery,
    sink: S,
}

impl<S: DmlSink> DeleteIf<S> {
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
pub struct DeleteFinal<S: DmlSink> {
    query: DeleteQuery,
    sink: S,
}

impl<S: DmlSink> DeleteFinal<S> {
    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.query.build_statement()
    }

    pub fn execute(self) -> Result<S::Output, QueryError> {
        let statement = self.query.build_statement()?;
        self.sink.dispatch(statement)
    }
}
