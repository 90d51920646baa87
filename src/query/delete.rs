//! DELETE accumulator and statement generation.

use crate::config::ConsistencyLevel;
use crate::error::QueryError;
use crate::query::clause::{ConditionClause, WhereClause};
use crate::query::criteria::CriteriaExpression;
use crate::query::insert::push_using;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};

/// Accumulator for a delete statement; deletes whole rows or, with selectors,
/// individual columns.
#[derive(Debug, Default)]
pub struct DeleteQuery {
    keyspace: String,
    table: String,
    selectors: Vec<String>,
    where_clauses: Vec<WhereClause>,
    condition_clauses: Vec<ConditionClause>,
    timestamp_micros: Option<i64>,
    if_exists: bool,
    consistency: Option<ConsistencyLevel>,
    error: Option<QueryError>,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_table(&mut self, table: &TableModel) {
        self.keyspace = table.keyspace().to_string();
        self.table = table.name().to_string();
        self.consistency = table.write_consistency();
    }

    /// Restrict the delete to specific columns.
    pub fn set_selectors(&mut self, columns: &[&ColumnModel]) {
        self.selectors
            .extend(columns.iter().map(|c| c.name().to_string()));
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
        if self.where_clauses.is_empty() {
            return Err(QueryError::Compilation(format!(
                "delete from '{}' has no key predicate",
                self.table
            )));
        }
        if self.if_exists && !self.condition_clauses.is_empty() {
            return Err(QueryError::Compilation(
                "IF EXISTS and IF conditions are mutually exclusive".to_string(),
            ));
        }

        let mut statement = String::from("DELETE ");
        if !self.selectors.is_empty() {
            statement.push_str(&self.selectors.join(", "));
            statement.push(' ');
        }
        statement.push_str(&format!("FROM {}.{}", self.keyspace, self.table));
        push_using(&mut statement, None, self.timestamp_micros);

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

        // Predicates first, then conditions, matching placeholder order.
        let mut bind_values = Vec::new();
        for clause in &self.where_clauses {
            bind_values.extend_from_slice(clause.bind_values());
        }
        for clause in &self.condition_clauses {
            bind_values.extend_from_slice(clause.bind_values());
        }

        Ok(StatementTuple::new(statement, bind_values).with_consistency(self.consistency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::schema::{FieldDef, TableModel, TypeRegistry, TypeSignature};
    use crate::wire::WireValue;
    use pretty_assertions::assert_eq;

    fn users() -> TableModel {
        TableModel::build(
            &MapperConfig::new("app"),
            "users",
            vec![
                FieldDef::new("id", TypeSignature::scalar("int")).partition_key(0),
                FieldDef::new("email", TypeSignature::scalar("text")),
                FieldDef::new("bio", TypeSignature::scalar("text")),
            ],
            &TypeRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_row_delete() {
        let table = users();
        let mut query = DeleteQuery::new();
        query.set_table(&table);
        query.set_where(table.column("id").unwrap().eq(7));
        let tuple = query.build_statement().unwrap();
        assert_eq!(tuple.statement, "DELETE FROM app.users WHERE id = ?");
        assert_eq!(tuple.bind_values, vec![WireValue::Int(7)]);
    }

    #[test]
    fn test_column_delete_with_condition() {
        let table = users();
        let mut query = DeleteQuery::new();
        query.set_table(&table);
        query.set_selectors(&[table.column("bio").unwrap()]);
        query.set_where(table.column("id").unwrap().eq(7));
        query.set_if(table.column("email").unwrap().eq("a@b.c"));
        let tuple = query.build_statement().unwrap();
        assert_eq!(
            tuple.statement,
            "DELETE bio FROM app.users WHERE id = ? IF email = ?"
        );
        assert_eq!(
            tuple.bind_values,
            vec![WireValue::Int(7), WireValue::Text("a@b.c".to_string())]
        );
    }

    #[test]
    fn test_timestamped_delete() {
        let table = users();
        let mut query = DeleteQuery::new();
        query.set_table(&table);
        query.set_timestamp_micros(999);
        query.set_where(table.column("id").unwrap().eq(7));
        let tuple = query.build_statement().unwrap();
        assert_eq!(
            tuple.statement,
            "DELETE FROM app.users USING TIMESTAMP 999 WHERE id = ?"
        );
    }

    #[test]
    fn test_delete_without_predicate_rejected() {
        let table = users();
        let mut query = DeleteQuery::new();
        query.set_table(&table);
        assert!(matches!(
            query.build_statement(),
            Err(QueryError::Compilation(_))
        ));
    }
}
