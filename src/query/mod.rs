//! Query accumulators and their compiled form.
//!
//! Each query model is a mutable accumulator owned by exactly one staged
//! builder until it compiles into a [`StatementTuple`]. Compilation either
//! produces a complete statement plus its ordered bind values or fails —
//! nothing partial is ever handed to the transport.

pub mod assignment;
pub mod clause;
pub mod criteria;
pub mod delete;
pub mod insert;
pub mod select;
pub mod selector;
pub mod update;

pub use self::assignment::{Assignment, AssignmentOperation};
pub use self::clause::{AssignmentClause, ConditionClause, WhereClause};
pub use self::criteria::{CriteriaExpression, CriteriaOperator, OrderExpression};
pub use self::delete::DeleteQuery;
pub use self::insert::InsertQuery;
pub use self::select::SelectQuery;
pub use self::selector::SelectableField;
pub use self::update::UpdateQuery;

use serde::{Deserialize, Serialize};

use crate::config::ConsistencyLevel;
use crate::wire::WireValue;

/// A compiled statement: wire text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTuple {
    pub statement: String,
    pub bind_values: Vec<WireValue>,
    /// Consistency the owning table requested; honored by the transport.
    pub consistency: Option<ConsistencyLevel>,
}

impl StatementTuple {
    pub fn new(statement: String, bind_values: Vec<WireValue>) -> Self {
        Self {
            statement,
            bind_values,
            consistency: None,
        }
    }

    pub fn with_consistency(mut self, consistency: Option<ConsistencyLevel>) -> Self {
        self.consistency = consistency;
        self
    }
}

/// Opaque resumption token returned by a paged execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingState(Vec<u8>);

impl PagingState {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A page request: fetch size plus the token of the page to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub fetch_size: i32,
    pub paging_state: Option<PagingState>,
}

impl PageRequest {
    /// First page.
    pub fn of(fetch_size: i32) -> Self {
        Self {
            fetch_size,
            paging_state: None,
        }
    }

    /// Resume from a previously returned token.
    pub fn at(fetch_size: i32, paging_state: PagingState) -> Self {
        Self {
            fetch_size,
            paging_state: Some(paging_state),
        }
    }
}

/// One page of results plus the token of the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub results: Vec<T>,
    pub paging_state: Option<PagingState>,
}
