//! Batch accumulation of compiled mutations.
//!
//! A batch collects already-compiled operations and itself compiles to a
//! single `BEGIN BATCH … APPLY BATCH` statement whose bind values are the
//! concatenation of the member statements' bind values, in append order.
//! One batch is owned by one caller; appends are not synchronized here.

use crate::error::QueryError;
use crate::executor::{ResultRows, StatementExecutor};
use crate::query::StatementTuple;

/// Whether the batch goes through the log (atomic) or skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Logged,
    Unlogged,
}

/// Accumulator of compiled mutations.
#[derive(Debug)]
pub struct Batch {
    mode: BatchMode,
    operations: Vec<StatementTuple>,
    timestamp_micros: Option<i64>,
}

impl Batch {
    /// A logged (atomic) batch.
    pub fn logged() -> Self {
        Self {
            mode: BatchMode::Logged,
            operations: Vec::new(),
            timestamp_micros: None,
        }
    }

    /// An unlogged batch.
    pub fn unlogged() -> Self {
        Self {
            mode: BatchMode::Unlogged,
            operations: Vec::new(),
            timestamp_micros: None,
        }
    }

    /// Apply one timestamp to every mutation in the batch.
    pub fn using_timestamp_micros(mut self, micros: i64) -> Self {
        self.timestamp_micros = Some(micros);
        self
    }

    /// Append a compiled operation.
    pub fn append(&mut self, operation: StatementTuple) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Compile the accumulated operations into one batch statement.
    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        if self.operations.is_empty() {
            return Err(QueryError::Compilation("batch is empty".to_string()));
        }

        let mut statement = match self.mode {
            BatchMode::Logged => String::from("BEGIN BATCH"),
            BatchMode::Unlogged => String::from("BEGIN UNLOGGED BATCH"),
        };
        if let Some(ts) = self.timestamp_micros {
            statement.push_str(&format!(" USING TIMESTAMP {ts}"));
        }

        let mut bind_values = Vec::new();
        for operation in &self.operations {
            statement.push(' ');
            statement.push_str(&operation.statement);
            statement.push(';');
            bind_values.extend_from_slice(&operation.bind_values);
        }
        statement.push_str(" APPLY BATCH");

        Ok(StatementTuple::new(statement, bind_values))
    }

    /// Compile and dispatch the batch.
    pub fn execute<E: StatementExecutor>(&self, executor: &E) -> Result<ResultRows, QueryError> {
        let statement = self.build_statement()?;
        executor.execute(&statement, None)
    }
}
