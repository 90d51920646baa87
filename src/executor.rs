//! Statement-execution port.
//!
//! The core compiles statements; something else runs them. Implement
//! [`StatementExecutor`] over whatever driver/session the host application
//! uses and hand it to the DSL entry points. Timeouts, retries and
//! consistency negotiation all live behind this trait.

use std::collections::HashMap;

use crate::error::QueryError;
use crate::query::{PageRequest, PagingState, StatementTuple};
use crate::wire::WireValue;

/// A single result row, keyed by result column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: HashMap<String, WireValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: WireValue) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.columns.get(name)
    }
}

impl<S: Into<String>> FromIterator<(S, WireValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, WireValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Rows returned by one execution, plus paging and conditional-apply info.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRows {
    pub rows: Vec<Row>,
    /// Token of the next page when the execution was paged and more rows exist.
    pub paging_state: Option<PagingState>,
    /// False when a conditional statement was not applied.
    pub applied: bool,
}

impl ResultRows {
    pub fn of(rows: Vec<Row>) -> Self {
        Self {
            rows,
            paging_state: None,
            applied: true,
        }
    }
}

/// Executes compiled statements against the store.
pub trait StatementExecutor {
    /// Run a statement; with a page request, resume from its paging state
    /// instead of from the start.
    fn execute(
        &self,
        statement: &StatementTuple,
        page: Option<&PageRequest>,
    ) -> Result<ResultRows, QueryError>;
}
