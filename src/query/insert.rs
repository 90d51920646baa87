//! INSERT accumulator and statement generation.

use crate::config::ConsistencyLevel;
use crate::error::QueryError;
use crate::query::StatementTuple;
use crate::schema::{ColumnModel, TableModel};
use crate::value::Value;
use crate::wire::{to_wire, WireValue};

/// Accumulator for an insert statement. Values serialize eagerly, through the
/// target column's descriptor, in call order.
#[derive(Debug, Default)]
pub struct InsertQuery {
    keyspace: String,
    table: String,
    columns: Vec<String>,
    values: Vec<WireValue>,
    if_not_exists: bool,
    ttl: Option<u32>,
    timestamp_micros: Option<i64>,
    consistency: Option<ConsistencyLevel>,
    error: Option<QueryError>,
}

impl InsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_table(&mut self, table: &TableModel) {
        self.keyspace = table.keyspace().to_string();
        self.table = table.name().to_string();
        self.consistency = table.write_consistency();
    }

    /// Bind one column value.
    pub fn set(&mut self, column: &ColumnModel, value: Value) {
        match to_wire(&value, column.descriptor()) {
            Ok(wire) => {
                self.columns.push(column.name().to_string());
                self.values.push(wire);
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Bind a positional value row against a previously fixed column list.
    pub fn set_values(&mut self, columns: &[&ColumnModel], values: Vec<Value>) {
        if columns.len() != values.len() {
            self.fail(QueryError::Compilation(format!(
                "insert into '{}' declares {} column(s) but binds {} value(s)",
                self.table,
                columns.len(),
                values.len()
            )));
            return;
        }
        for (column, value) in columns.iter().zip(values) {
            self.set(column, value);
        }
    }

    pub fn enable_if_not_exists(&mut self) {
        self.if_not_exists = true;
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
        if self.columns.is_empty() {
            return Err(QueryError::Compilation(format!(
                "insert into '{}' binds no values",
                self.table
            )));
        }

        let placeholders = vec!["?"; self.columns.len()].join(", ");
        let mut statement = format!(
            "INSERT INTO {}.{} ({}) VALUES ({placeholders})",
            self.keyspace,
            self.table,
            self.columns.join(", "),
        );
        if self.if_not_exists {
            statement.push_str(" IF NOT EXISTS");
        }
        push_using(&mut statement, self.ttl, self.timestamp_micros);

        Ok(StatementTuple::new(statement, self.values.clone())
            .with_consistency(self.consistency))
    }
}

/// Append a `USING TTL x AND TIMESTAMP y` clause when either option is set.
pub(crate) fn push_using(statement: &mut String, ttl: Option<u32>, timestamp_micros: Option<i64>) {
    match (ttl, timestamp_micros) {
        (Some(ttl), Some(ts)) => {
            statement.push_str(&format!(" USING TTL {ttl} AND TIMESTAMP {ts}"))
        }
        (Some(ttl), None) => statement.push_str(&format!(" USING TTL {ttl}")),
        (None, Some(ts)) => statement.push_str(&format!(" USING TIMESTAMP {ts}")),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::schema::{FieldDef, TableModel, TypeRegistry, TypeSignature};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn users() -> TableModel {
        TableModel::build(
            &MapperConfig::new("app"),
            "users",
            vec![
                FieldDef::new("id", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new("email", TypeSignature::scalar("text")),
            ],
            &TypeRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_statement() {
        let table = users();
        let id = Uuid::new_v4();
        let mut query = InsertQuery::new();
        query.set_table(&table);
        query.set(table.column("id").unwrap(), Value::Uuid(id));
        query.set(table.column("email").unwrap(), Value::from("a@b.c"));
        let tuple = query.build_statement().unwrap();
        assert_eq!(
            tuple.statement,
            "INSERT INTO app.users (id, email) VALUES (?, ?)"
        );
        assert_eq!(
            tuple.bind_values,
            vec![WireValue::Uuid(id), WireValue::Text("a@b.c".to_string())]
        );
    }

    #[test]
    fn test_insert_options_render_after_if_not_exists() {
        let table = users();
        let mut query = InsertQuery::new();
        query.set_table(&table);
        query.set(table.column("email").unwrap(), Value::from("a@b.c"));
        query.enable_if_not_exists();
        query.set_ttl(60);
        query.set_timestamp_micros(12345);
        let tuple = query.build_statement().unwrap();
        assert_eq!(
            tuple.statement,
            "INSERT INTO app.users (email) VALUES (?) IF NOT EXISTS USING TTL 60 AND TIMESTAMP 12345"
        );
    }

    #[test]
    fn test_column_value_arity_checked() {
        let table = users();
        let mut query = InsertQuery::new();
        query.set_table(&table);
        query.set_values(
            &[table.column("id").unwrap(), table.column("email").unwrap()],
            vec![Value::from("only-one")],
        );
        assert!(matches!(
            query.build_statement(),
            Err(QueryError::Compilation(_))
        ));
    }

    #[test]
    fn test_empty_insert_rejected() {
        let table = users();
        let mut query = InsertQuery::new();
        query.set_table(&table);
        assert!(matches!(
            query.build_statement(),
            Err(QueryError::Compilation(_))
        ));
    }
}
