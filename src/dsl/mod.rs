//! Staged fluent query surface.
//!
//! Every builder here is a thin typestate wrapper over a query model: each
//! stage struct exposes only the calls that are legal next, and each call
//! moves the underlying accumulator into the following stage. Illegal call
//! sequences (a `where` before any assignment, a second `if_exists`) simply
//! do not compile.
//!
//! Mutation builders are generic over a [`DmlSink`]: the executor-backed sink
//! dispatches the compiled statement immediately, the batch-backed sink
//! appends it to a shared [`Batch`] and returns the unit sentinel.

pub mod delete;
pub mod insert;
pub mod record;
pub mod select;
pub mod update;

#[cfg(test)]
mod tests;

pub use self::delete::DeleteInit;
pub use self::insert::{InsertColumns, InsertInit};
pub use self::record::Record;
pub use self::select::{SelectInit, SelectWhere};
pub use self::update::UpdateInit;

use crate::batch::Batch;
use crate::error::QueryError;
use crate::executor::{ResultRows, StatementExecutor};
use crate::query::selector::SelectableField;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};

/// Where a compiled mutation goes when its builder terminates.
pub trait DmlSink {
    type Output;

    fn dispatch(self, statement: StatementTuple) -> Result<Self::Output, QueryError>;
}

/// Dispatches immediately through a [`StatementExecutor`].
pub struct ExecuteSink<'a, E: StatementExecutor>(pub(crate) &'a E);

impl<E: StatementExecutor> DmlSink for ExecuteSink<'_, E> {
    type Output = ResultRows;

    fn dispatch(self, statement: StatementTuple) -> Result<Self::Output, QueryError> {
        self.0.execute(&statement, None)
    }
}

/// Appends to a shared batch instead of dispatching.
pub struct BatchSink<'a>(pub(crate) &'a mut Batch);

impl DmlSink for BatchSink<'_> {
    type Output = ();

    fn dispatch(self, statement: StatementTuple) -> Result<Self::Output, QueryError> {
        self.0.append(statement);
        Ok(())
    }
}

/// Entry point for immediately-executed queries.
pub struct QueryDsl<'a, E: StatementExecutor> {
    executor: &'a E,
}

impl<'a, E: StatementExecutor> QueryDsl<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Select specific fields.
    pub fn select(&self, fields: &[SelectableField]) -> SelectInit<'a, E> {
        SelectInit::new(self.executor, fields, false)
    }

    /// Select distinct partition-key fields.
    pub fn select_distinct(&self, fields: &[SelectableField]) -> SelectInit<'a, E> {
        SelectInit::new(self.executor, fields, true)
    }

    /// Select every column of the table.
    pub fn select_from(&self, table: &TableModel) -> SelectWhere<'a, E> {
        SelectWhere::of_table(self.executor, table)
    }

    pub fn insert_into(&self, table: &TableModel) -> InsertInit<ExecuteSink<'a, E>> {
        InsertInit::new(table, ExecuteSink(self.executor))
    }

    /// Insert with a fixed column list, bound positionally by `values`.
    pub fn insert_into_columns(
        &self,
        table: &TableModel,
        columns: &[&ColumnModel],
    ) -> InsertColumns<ExecuteSink<'a, E>> {
        InsertColumns::new(table, columns, ExecuteSink(self.executor))
    }

    pub fn update(&self, table: &TableModel) -> UpdateInit<ExecuteSink<'a, E>> {
        UpdateInit::new(table, ExecuteSink(self.executor))
    }

    /// Delete whole rows.
    pub fn delete(&self) -> DeleteInit<ExecuteSink<'a, E>> {
        DeleteInit::new(&[], ExecuteSink(self.executor))
    }

    /// Delete specific columns.
    pub fn delete_columns(&self, columns: &[&ColumnModel]) -> DeleteInit<ExecuteSink<'a, E>> {
        DeleteInit::new(columns, ExecuteSink(self.executor))
    }
}

/// Entry point for batched mutations. Selects are not batchable.
///
/// Builders borrow the batch mutably for their whole lifetime, so statements
/// are necessarily accumulated one at a time.
pub struct BatchDsl<'a> {
    batch: &'a mut Batch,
}

impl<'a> BatchDsl<'a> {
    pub fn new(batch: &'a mut Batch) -> Self {
        Self { batch }
    }

    pub fn insert_into<'b>(&'b mut self, table: &TableModel) -> InsertInit<BatchSink<'b>> {
        InsertInit::new(table, BatchSink(self.batch))
    }

    pub fn insert_into_columns<'b>(
        &'b mut self,
        table: &TableModel,
        columns: &[&ColumnModel],
    ) -> InsertColumns<BatchSink<'b>> {
        InsertColumns::new(table, columns, BatchSink(self.batch))
    }

    pub fn update<'b>(&'b mut self, table: &TableModel) -> UpdateInit<BatchSink<'b>> {
        UpdateInit::new(table, BatchSink(self.batch))
    }

    pub fn delete<'b>(&'b mut self) -> DeleteInit<BatchSink<'b>> {
        DeleteInit::new(&[], BatchSink(self.batch))
    }

    pub fn delete_columns<'b>(
        &'b mut self,
        columns: &[&ColumnModel],
    ) -> DeleteInit<BatchSink<'b>> {
        DeleteInit::new(columns, BatchSink(self.batch))
    }
}
