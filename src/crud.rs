//! Record-level convenience operations over a table model.
//!
//! A thin layer on top of the query accumulators for the common whole-row
//! cases: insert a record, look rows up by primary key, delete by primary
//! key. The staged DSL remains the surface for anything partial or
//! conditional.

use chrono::Utc;
use uuid::Uuid;

use crate::dsl::Record;
use crate::error::{CqlMapResult, QueryError};
use crate::executor::StatementExecutor;
use crate::query::insert::InsertQuery;
use crate::query::select::SelectQuery;
use crate::query::delete::DeleteQuery;
use crate::query::{PageRequest, PageResult};
use crate::schema::TableModel;
use crate::value::Value;

/// Record-level operations bound to one table and one executor.
pub struct Repository<'a, E: StatementExecutor> {
    executor: &'a E,
    table: &'a TableModel,
}

impl<'a, E: StatementExecutor> Repository<'a, E> {
    pub fn new(executor: &'a E, table: &'a TableModel) -> Self {
        Self { executor, table }
    }

    /// Insert a record, filling role columns first: generated uuid columns,
    /// creation-date and last-updated-date columns. Returns the record as
    /// written, including the filled values.
    pub fn insert(&self, record: Record) -> CqlMapResult<Record> {
        let mut record = record;
        let now = Utc::now();
        for column in self.table.columns() {
            let missing = record
                .get(column.name())
                .map_or(true, Value::is_null);
            if column.is_generated() && missing {
                record.set(column.name(), Value::Uuid(Uuid::new_v4()));
            }
            if column.is_creation_date() || column.is_last_updated_date() {
                record.set(column.name(), Value::Timestamp(now));
            }
        }

        let mut query = InsertQuery::new();
        query.set_table(self.table);
        for column in self.table.columns() {
            if let Some(value) = record.get(column.name()) {
                query.set(column, value.clone());
            }
        }
        let statement = query.build_statement()?;
        self.executor.execute(&statement, None)?;
        Ok(record)
    }

    /// Fetch the single row matching the record's primary key values.
    pub fn find_one(&self, key: &Record) -> CqlMapResult<Option<Record>> {
        let mut query = SelectQuery::new();
        query.set_table_and_selectors(self.table);
        self.push_key_predicates(&mut query, key)?;
        query.set_limit(1);
        let statement = query.build_statement()?;
        let result = self.executor.execute(&statement, None)?;
        Ok(result
            .rows
            .first()
            .map(|row| Record::from_row(row, query.selected_fields()))
            .transpose()?)
    }

    /// Fetch every row of the table.
    pub fn find_all(&self) -> CqlMapResult<Vec<Record>> {
        let mut query = SelectQuery::new();
        query.set_table_and_selectors(self.table);
        let statement = query.build_statement()?;
        let result = self.executor.execute(&statement, None)?;
        let records = result
            .rows
            .iter()
            .map(|row| Record::from_row(row, query.selected_fields()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Fetch one page of the table.
    pub fn find_page(&self, page: PageRequest) -> CqlMapResult<PageResult<Record>> {
        let mut query = SelectQuery::new();
        query.set_table_and_selectors(self.table);
        let statement = query.build_statement()?;
        let result = self.executor.execute(&statement, Some(&page))?;
        let results = result
            .rows
            .iter()
            .map(|row| Record::from_row(row, query.selected_fields()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResult {
            results,
            paging_state: result.paging_state,
        })
    }

    /// Delete the row matching the record's primary key values.
    pub fn delete(&self, key: &Record) -> CqlMapResult<()> {
        let mut query = DeleteQuery::new();
        query.set_table(self.table);
        for column_name in self.primary_key_columns() {
            let column = self.table.column(&column_name)?;
            let value = key.get(&column_name).cloned().ok_or_else(|| {
                QueryError::Compilation(format!(
                    "missing value for key column '{column_name}' of table '{}'",
                    self.table.name()
                ))
            })?;
            query.set_where(column.eq(value));
        }
        let statement = query.build_statement()?;
        self.executor.execute(&statement, None)?;
        Ok(())
    }

    fn push_key_predicates(&self, query: &mut SelectQuery, key: &Record) -> CqlMapResult<()> {
        for column_name in self.primary_key_columns() {
            let column = self.table.column(&column_name)?;
            let value = key.get(&column_name).cloned().ok_or_else(|| {
                QueryError::Compilation(format!(
                    "missing value for key column '{column_name}' of table '{}'",
                    self.table.name()
                ))
            })?;
            query.set_where(column.eq(value));
        }
        Ok(())
    }

    fn primary_key_columns(&self) -> Vec<String> {
        self.table
            .partition_keys()
            .iter()
            .cloned()
            .chain(
                self.table
                    .clustering_keys()
                    .iter()
                    .map(|(name, _)| name.clone()),
            )
            .collect()
    }
}
