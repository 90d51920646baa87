//! Staged insert builders: column-by-column or positional.

use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::query::insert::InsertQuery;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};
use crate::value::Value;

use super::DmlSink;

/// Target chosen; the first column binding is required.
pub struct InsertInit<S: DmlSink> {
    query: InsertQuery,
    sink: S,
}

impl<S: DmlSink> InsertInit<S> {
    pub(crate) fn new(table: &TableModel, sink: S) -> Self {
        let mut query = InsertQuery::new();
        query.set_table(table);
        Self { query, sink }
    }

    pub fn set(mut self, column: &ColumnModel, value: impl Into<Value>) -> InsertSet<S> {
        self.query.set(column, value.into());
        InsertSet {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// At least one column bound; more bindings, options or execution.
pub struct InsertSet<S: DmlSink> {
    query: InsertQuery,
    sink: S,
}

impl<S: DmlSink> InsertSet<S> {
    pub fn set(mut self, column: &ColumnModel, value: impl Into<Value>) -> Self {
        self.query.set(column, value.into());
        self
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

    /// Only apply when no row with this primary key exists yet.
    pub fn if_not_exists(mut self) -> InsertFinal<S> {
        self.query.enable_if_not_exists();
        InsertFinal {
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

/// Insert with a fixed column list; a positional value row is required next.
pub struct InsertColumns<S: DmlSink> {
    query: InsertQuery,
    columns: Vec<ColumnModel>,
    sink: S,
}

impl<S: DmlSink> InsertColumns<S> {
    pub(crate) fn new(table: &TableModel, columns: &[&ColumnModel], sink: S) -> Self {
        let mut query = InsertQuery::new();
        query.set_table(table);
        Self {
            query,
            columns: columns.iter().map(|&c| c.clone()).collect(),
            sink,
        }
    }

    /// Bind one value per declared column, in declaration order.
    pub fn values<I, V>(mut self, values: I) -> InsertValued<S>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let columns: Vec<&ColumnModel> = self.columns.iter().collect();
        self.query
            .set_values(&columns, values.into_iter().map(Into::into).collect());
        InsertValued {
            query: self.query,
            sink: self.sink,
        }
    }
}

/// Positional values bound; options or execution remain.
pub struct InsertValued<S: DmlSink> {
    query: InsertQuery,
    sink: S,
}

impl<S: DmlSink> InsertValued<S> {
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

    pub fn if_not_exists(mut self) -> InsertFinal<S> {
        self.query.enable_if_not_exists();
        InsertFinal {
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

/// `IF NOT EXISTS` attached; write options and execution remain.
pub struct InsertFinal<S: DmlSink> {
    query: InsertQuery,
    sink: S,
}

impl<S: DmlSink> InsertFinal<S> {
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

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.query.build_statement()
    }

    pub fn execute(self) -> Result<S::Output, QueryError> {
        let statement = self.query.build_statement()?;
        self.sink.dispatch(statement)
    }
}
