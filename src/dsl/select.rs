//! Staged select builder.
//!
//! Stages: `select(fields) → from → (where_ → and*)? → order_by* → limit? →
//! allow_filtering? → fetch`. Each fetch variant compiles the accumulated
//! query, executes it and maps rows through the selected fields' descriptors.

use crate::error::QueryError;
use crate::executor::StatementExecutor;
use crate::query::criteria::{CriteriaExpression, OrderExpression};
use crate::query::select::SelectQuery;
use crate::query::selector::SelectableField;
use crate::query::{PageRequest, PageResult, StatementTuple};
use crate::schema::TableModel;

use super::record::Record;

struct SelectBody<'a, E: StatementExecutor> {
    executor: &'a E,
    query: SelectQuery,
}

impl<E: StatementExecutor> SelectBody<'_, E> {
    fn fetch(self) -> Result<Vec<Record>, QueryError> {
        let statement = self.query.build_statement()?;
        let result = self.executor.execute(&statement, None)?;
        result
            .rows
            .iter()
            .map(|row| Record::from_row(row, self.query.selected_fields()))
            .collect()
    }

    fn fetch_one(mut self) -> Result<Option<Record>, QueryError> {
        self.query.set_limit(1);
        let statement = self.query.build_statement()?;
        let result = self.executor.execute(&statement, None)?;
        result
            .rows
            .first()
            .map(|row| Record::from_row(row, self.query.selected_fields()))
            .transpose()
    }

    fn fetch_page(self, page: PageRequest) -> Result<PageResult<Record>, QueryError> {
        let statement = self.query.build_statement()?;
        let result = self.executor.execute(&statement, Some(&page))?;
        let results = result
            .rows
            .iter()
            .map(|row| Record::from_row(row, self.query.selected_fields()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResult {
            results,
            paging_state: result.paging_state,
        })
    }
}

/// Select with a projection but no table yet.
pub struct SelectInit<'a, E: StatementExecutor> {
    body: SelectBody<'a, E>,
}

impl<'a, E: StatementExecutor> SelectInit<'a, E> {
    pub(crate) fn new(executor: &'a E, fields: &[SelectableField], distinct: bool) -> Self {
        let mut query = SelectQuery::new();
        query.set_selectors(fields);
        if distinct {
            query.enable_distinct();
        }
        Self {
            body: SelectBody { executor, query },
        }
    }

    pub fn from(mut self, table: &TableModel) -> SelectWhere<'a, E> {
        self.body.query.set_table(table);
        SelectWhere { body: self.body }
    }
}

/// Table chosen; predicates, ordering and fetches are all legal.
pub struct SelectWhere<'a, E: StatementExecutor> {
    body: SelectBody<'a, E>,
}

impl<'a, E: StatementExecutor> SelectWhere<'a, E> {
    pub(crate) fn of_table(executor: &'a E, table: &TableModel) -> Self {
        let mut query = SelectQuery::new();
        query.set_table_and_selectors(table);
        Self {
            body: SelectBody { executor, query },
        }
    }

    pub fn where_(mut self, criteria: CriteriaExpression) -> SelectExtraWhere<'a, E> {
        self.body.query.set_where(criteria);
        SelectExtraWhere { body: self.body }
    }

    pub fn order_by(mut self, order: OrderExpression) -> SelectOrdered<'a, E> {
        self.body.query.set_ordering(order);
        SelectOrdered { body: self.body }
    }

    pub fn limit(mut self, limit: u32) -> SelectEnd<'a, E> {
        self.body.query.set_limit(limit);
        SelectEnd { body: self.body }
    }

    pub fn allow_filtering(mut self) -> SelectEnd<'a, E> {
        self.body.query.enable_filtering();
        SelectEnd { body: self.body }
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.body.query.build_statement()
    }

    pub fn fetch(self) -> Result<Vec<Record>, QueryError> {
        self.body.fetch()
    }

    pub fn fetch_one(self) -> Result<Option<Record>, QueryError> {
        self.body.fetch_one()
    }

    pub fn fetch_page(self, page: PageRequest) -> Result<PageResult<Record>, QueryError> {
        self.body.fetch_page(page)
    }
}

/// At least one predicate attached; more can be conjoined with `and`.
pub struct SelectExtraWhere<'a, E: StatementExecutor> {
    body: SelectBody<'a, E>,
}

impl<'a, E: StatementExecutor> SelectExtraWhere<'a, E> {
    /// Conjoin another predicate (`AND`); disjunction is not supported.
    pub fn and(mut self, criteria: CriteriaExpression) -> Self {
        self.body.query.set_where(criteria);
        self
    }

    pub fn order_by(mut self, order: OrderExpression) -> SelectOrdered<'a, E> {
        self.body.query.set_ordering(order);
        SelectOrdered { body: self.body }
    }

    pub fn limit(mut self, limit: u32) -> SelectEnd<'a, E> {
        self.body.query.set_limit(limit);
        SelectEnd { body: self.body }
    }

    pub fn allow_filtering(mut self) -> SelectEnd<'a, E> {
        self.body.query.enable_filtering();
        SelectEnd { body: self.body }
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.body.query.build_statement()
    }

    pub fn fetch(self) -> Result<Vec<Record>, QueryError> {
        self.body.fetch()
    }

    pub fn fetch_one(self) -> Result<Option<Record>, QueryError> {
        self.body.fetch_one()
    }

    pub fn fetch_page(self, page: PageRequest) -> Result<PageResult<Record>, QueryError> {
        self.body.fetch_page(page)
    }
}

/// Ordering attached; no further predicates.
pub struct SelectOrdered<'a, E: StatementExecutor> {
    body: SelectBody<'a, E>,
}

impl<'a, E: StatementExecutor> SelectOrdered<'a, E> {
    pub fn order_by(mut self, order: OrderExpression) -> Self {
        self.body.query.set_ordering(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> SelectEnd<'a, E> {
        self.body.query.set_limit(limit);
        SelectEnd { body: self.body }
    }

    pub fn allow_filtering(mut self) -> SelectEnd<'a, E> {
        self.body.query.enable_filtering();
        SelectEnd { body: self.body }
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.body.query.build_statement()
    }

    pub fn fetch(self) -> Result<Vec<Record>, QueryError> {
        self.body.fetch()
    }

    pub fn fetch_one(self) -> Result<Option<Record>, QueryError> {
        self.body.fetch_one()
    }

    pub fn fetch_page(self, page: PageRequest) -> Result<PageResult<Record>, QueryError> {
        self.body.fetch_page(page)
    }
}

/// Terminal stage; only fetches remain.
pub struct SelectEnd<'a, E: StatementExecutor> {
    body: SelectBody<'a, E>,
}

impl<E: StatementExecutor> SelectEnd<'_, E> {
    pub fn allow_filtering(mut self) -> Self {
        self.body.query.enable_filtering();
        self
    }

    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        self.body.query.build_statement()
    }

    pub fn fetch(self) -> Result<Vec<Record>, QueryError> {
        self.body.fetch()
    }

    pub fn fetch_one(self) -> Result<Option<Record>, QueryError> {
        self.body.fetch_one()
    }

    pub fn fetch_page(self, page: PageRequest) -> Result<PageResult<Record>, QueryError> {
        self.body.fetch_page(page)
    }
}
