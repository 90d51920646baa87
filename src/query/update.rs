//! UPDATE accumulator and statement generation.

use crate::config::ConsistencyLevel;
use crate::error::QueryError;
use crate::query::assignment::Assignment;
use crate::query::clause::{AssignmentClause, ConditionClause, WhereClause};
use crate::query::criteria::CriteriaExpression;
use crate::query::insert::push_using;
use crate::query::StatementTuple;
use crate::schema::TableModel;

/// Accumulator for an update statement.
///
/// Bind values compile in a fixed order — assignments, then predicates, then
/// conditions — matching the order placeholders appear in the statement text.
#[derive(Debug, Default)]
pub struct UpdateQuery {
    keyspace: String,
    table: String,
    assignment_clauses: Vec<AssignmentClause>,
    where_clauses: Vec<WhereClause>,
    condition_clauses: Vec<ConditionClause>,
    ttl: Option<u32>,
    timestamp_micros: Option<i64>,
    if_exists: bool,
    consistency: Option<ConsistencyLevel>,
    error: Option<QueryError>,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_table(&mut self, table: &TableModel) {
        self.keyspace = table.keyspace().to_string();
        self.table = table.name().to_string();
        self.consistency = table.write_consistency();
    }

    pub fn set_assignment(&mut self, assignment: Assignment) {
        match AssignmentClause::from(assignment) {
            Ok(clause) => self.assignment_clauses.push(clause),
            Err(err) => self.fail(err),
        }
    }

    pub fn set_where(&mut self, criteria: CriteriaExpression) {
        match WhereClause::from(criteria) {
            Ok(clause) => self.where_clauses.push(clause),
            Err(err) => self.fail(err),
        }
    }

    pub fn set_if(&mut self, criteria: CriteriaExpression) {
        match ConditionClause::from(criteria) {
            Ok(clause) => self.condition_clauses.push(clause),
            Err(err) => self.fail(err),
        }
    }

    pub fn set_ttl(&mut self, seconds: u32) {
        self.ttl = Some(seconds);
    }

    pub fn set_timestamp(&mut self, timestamp: chrono::DateTime<chrono::Utc>) {
        self.timestamp_micros = Some(timestamp.timestamp_micros());
    }

    pub fn set_timestamp_micros(&mut self, micros: i64) {
        self.timestamp_micros = Some(micros);
    }

    pub fn enable_if_exists(&mut self) {
        self.if_exists = true;
    }

    fn fail(&mut self, err: QueryError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Compile into a statement and its ordered bind values.
    pub fn build_statement(&self) -> Result<StatementTuple, QueryError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.table.is_empty() {
            return Err(QueryError::Compilation("no table selected".to_string()));
        }
        if self.assignment_clauses.is_empty() {
            return Err(QueryError::Compilation(format!(
                "update of '{}' has no assignments",
                self.table
            )));
        }
        if self.where_clauses.is_empty() {
            return Err(QueryError::Compilation(format!(
                "update of '{}' has no key predicate",
                self.table
            )));
        }
        if self.if_exists && !self.condition_clauses.is_empty() {
            return Err(QueryError::Compilation(
                "IF EXISTS and IF conditions are mutually exclusive".to_string(),
            ));
        }

        let mut statement = format!("UPDATE {}.{}", self.keyspace, self.table);
        push_using(&mut statement, self.ttl, self.timestamp_micros);

        statement.push_str(" SET ");
        let assignments: Vec<&str> = self
            .assignment_clauses
            .iter()
            .map(|c| c.fragment())
            .collect();
        statement.push_str(&assignments.join(", "));

        statement.push_str(" WHERE ");
        let predicates: Vec<&str> = self.where_clauses.iter().map(|c| c.fragment()).collect();
        statement.push_str(&predicates.join(" AND "));

        if self.if_exists {
            statement.push_str(" IF EXISTS");
        } else if !self.condition_clauses.is_empty() {
            statement.push_str(" IF ");
            let conditions: Vec<&str> =
                self.condition_clauses.iter().map(|c| c.fragment()).collect();
            statement.push_str(&conditions.join(" AND "));
        }

        // Assignments, then predicates, then conditions — same sequence the
        // placeholders were emitted in above.
        let mut bind_values = Vec::new();
        for clause in &self.assignment_clauses {
            bind_values.extend_from_slice(clause.bind_values());
        }
        for clause in &self.where_clauses {
            bind_values.extend_from_slice(clause.bind_values());
        }
        for clause in &self.condition_clauses {
            bind_values.extend_from_slice(clause.bind_values());
        }

        Ok(StatementTuple::new(statement, bind_values).with_consistency(self.consistency))
    }
}
