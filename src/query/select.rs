//! SELECT accumulator and statement generation.

use crate::config::ConsistencyLevel;
use crate::error::QueryError;
use crate::query::clause::WhereClause;
use crate::query::criteria::{CriteriaExpression, OrderExpression};
use crate::query::selector::SelectableField;
use crate::query::{PageRequest, StatementTuple};
use crate::schema::{ClusteringOrder, TableModel};

/// Accumulator for a select statement.
#[derive(Debug, Default)]
pub struct SelectQuery {
    keyspace: String,
    table: String,
    selectors: Vec<SelectableField>,
    select_all: bool,
    distinct: bool,
    where_clauses: Vec<WhereClause>,
    orderings: Vec<(String, ClusteringOrder)>,
    limit: Option<u32>,
    allow_filtering: bool,
    page_request: Option<PageRequest>,
    consistency: Option<ConsistencyLevel>,
    error: Option<QueryError>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_table(&mut self, table: &TableModel) {
        self.keyspace = table.keyspace().to_string();
        self.table = table.name().to_string();
        self.consistency = table.read_consistency();
    }

    /// Select every column of the table; renders as `*` but keeps the fields
    /// for result mapping.
    pub fn set_table_and_selectors(&mut self, table: &TableModel) {
        self.set_table(table);
        self.select_all = true;
        self.selectors = table.columns().iter().map(SelectableField::column).collect();
    }

    pub fn set_selectors(&mut self, fields: &[SelectableField]) {
        self.selectors.extend_from_slice(fields);
    }

    pub fn enable_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn set_where(&mut self, criteria: CriteriaExpression) {
        match WhereClause::from(criteria) {
            Ok(clause) => self.where_clauses.push(clause),
            Err(err) => self.fail(err),
        }
    }

    pub fn set_ordering(&mut self, order: OrderExpression) {
        self.orderings
            .push((order.column().to_string(), order.order()));
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = Some(limit);
    }

    pub fn enable_filtering(&mut self) {
        self.allow_filtering = true;
    }

    pub fn set_page_request(&mut self, page_request: PageRequest) {
        self.page_request = Some(page_request);
    }

    pub fn page_request(&self) -> Option<&PageRequest> {
        self.page_request.as_ref()
    }

    /// Fields of the projection, for result mapping.
    pub fn selected_fields(&self) -> &[SelectableField] {
        &self.selectors
    }

    fn fail(&mut self, err: QueryError) {
        // First failure wins; compilation surfaces it.
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

        let mut statement = String::from("SELECT ");
        if self.distinct {
            statement.push_str("DISTINCT ");
        }
        if self.select_all {
            statement.push('*');
        } else if self.selectors.is_empty() {
            return Err(QueryError::Compilation("no fields selected".to_string()));
        } else {
            let projection: Vec<&str> = self.selectors.iter().map(|f| f.cql()).collect();
            statement.push_str(&projection.join(", "));
        }
        statement.push_str(" FROM ");
        statement.push_str(&self.keyspace);
        statement.push('.');
        statement.push_str(&self.table);

        let mut bind_values = Vec::new();
        if !self.where_clauses.is_empty() {
            statement.push_str(" WHERE ");
            let fragments: Vec<&str> =
                self.where_clauses.iter().map(|c| c.fragment()).collect();
            statement.push_str(&fragments.join(" AND "));
            for clause in &self.where_clauses {
                bind_values.extend_from_slice(clause.bind_values());
            }
        }

        if !self.orderings.is_empty() {
            statement.push_str(" ORDER BY ");
            let orderings: Vec<String> = self
                .orderings
                .iter()
                .map(|(column, order)| format!("{column} {}", order.as_cql()))
                .collect();
            statement.push_str(&orderings.join(", "));
        }

        if let Some(limit) = self.limit {
            statement.push_str(&format!(" LIMIT {limit}"));
        }

        if self.allow_filtering {
            statement.push_str(" ALLOW FILTERING");
        }

        Ok(StatementTuple::new(statement, bind_values).with_consistency(self.consistency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::schema::{FieldDef, TableModel, TypeRegistry, TypeSignature};
    use crate::value::Value;
    use crate::wire::WireValue;
    use pretty_assertions::assert_eq;

    fn users() -> TableModel {
        TableModel::build(
            &MapperConfig::new("app"),
            "users",
            vec![
                FieldDef::new("id", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new("age", TypeSignature::scalar("int")),
                FieldDef::new("added_at", TypeSignature::scalar("timestamp"))
                    .clustering_key(0, ClusteringOrder::Desc),
            ],
            &TypeRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_select_all() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table_and_selectors(&table);
        let tuple = query.build_statement().unwrap();
        assert_eq!(tuple.statement, "SELECT * FROM app.users");
        assert!(tuple.bind_values.is_empty());
        assert_eq!(query.selected_fields().len(), 3);
    }

    #[test]
    fn test_select_with_everything() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table(&table);
        query.set_selectors(&[
            table.column("id").unwrap().selector(),
            table.column("age").unwrap().selector(),
        ]);
        query.set_where(table.column("age").unwrap().gte(18));
        query.set_where(table.column("age").unwrap().lt(65));
        query.set_ordering(table.column("added_at").unwrap().desc());
        query.set_limit(10);
        query.enable_filtering();
        let tuple = query.build_statement().unwrap();
        assert_eq!(
            tuple.statement,
            "SELECT id, age FROM app.users WHERE age >= ? AND age < ? \
             ORDER BY added_at DESC LIMIT 10 ALLOW FILTERING"
        );
        assert_eq!(tuple.bind_values, vec![WireValue::Int(18), WireValue::Int(65)]);
    }

    #[test]
    fn test_distinct_partition_keys() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table(&table);
        query.enable_distinct();
        query.set_selectors(&[table.column("id").unwrap().selector()]);
        let tuple = query.build_statement().unwrap();
        assert_eq!(tuple.statement, "SELECT DISTINCT id FROM app.users");
    }

    #[test]
    fn test_aggregate_projection() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table(&table);
        query.set_selectors(&[table.column("age").unwrap().max()]);
        let tuple = query.build_statement().unwrap();
        assert_eq!(tuple.statement, "SELECT max(age) FROM app.users");
    }

    #[test]
    fn test_stashed_error_surfaces_at_compile() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table(&table);
        query.set_selectors(&[table.column("age").unwrap().selector()]);
        // Type mismatch: text bound against an int column.
        query.set_where(table.column("age").unwrap().eq(Value::from("x")));
        assert!(query.build_statement().is_err());
    }

    #[test]
    fn test_empty_projection_rejected() {
        let table = users();
        let mut query = SelectQuery::new();
        query.set_table(&table);
        assert_eq!(
            query.build_statement().unwrap_err(),
            QueryError::Compilation("no fields selected".to_string())
        );
    }
}
