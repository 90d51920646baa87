//! End-to-end staged builder tests against a recording executor.

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::batch::Batch;
use crate::config::MapperConfig;
use crate::crud::Repository;
use crate::dsl::{BatchDsl, QueryDsl, Record};
use crate::error::QueryError;
use crate::executor::{ResultRows, Row, StatementExecutor};
use crate::query::{PageRequest, PagingState, StatementTuple};
use crate::schema::{
    ClusteringOrder, FieldDef, TableModel, TypeRegistry, TypeSignature, UdtShape,
};
use crate::value::Value;
use crate::wire::WireValue;

/// Records every dispatched statement and replays a canned response.
#[derive(Default)]
struct RecordingExecutor {
    captured: RefCell<Vec<(StatementTuple, Option<PageRequest>)>>,
    response: RefCell<ResultRows>,
}

impl RecordingExecutor {
    fn respond_with(response: ResultRows) -> Self {
        Self {
            captured: RefCell::new(Vec::new()),
            response: RefCell::new(response),
        }
    }

    fn captured(&self) -> Vec<(StatementTuple, Option<PageRequest>)> {
        self.captured.borrow().clone()
    }
}

impl StatementExecutor for RecordingExecutor {
    fn execute(
        &self,
        statement: &StatementTuple,
        page: Option<&PageRequest>,
    ) -> Result<ResultRows, QueryError> {
        self.captured
            .borrow_mut()
            .push((statement.clone(), page.cloned()));
        Ok(self.response.borrow().clone())
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_udt(UdtShape::new(
        "profile",
        vec![
            ("name".to_string(), TypeSignature::scalar("text")),
            ("age".to_string(), TypeSignature::scalar("int")),
        ],
    ));
    registry
}

fn users() -> TableModel {
    TableModel::build(
        &MapperConfig::new("app"),
        "users",
        vec![
            FieldDef::new("id", TypeSignature::scalar("int")).partition_key(0),
            FieldDef::new("email", TypeSignature::scalar("text")),
            FieldDef::new(
                "tags",
                TypeSignature::set_of(TypeSignature::scalar("text")),
            ),
            FieldDef::new("profile", TypeSignature::udt("profile")),
            FieldDef::new("added_at", TypeSignature::scalar("timestamp"))
                .clustering_key(0, ClusteringOrder::Desc),
        ],
        &registry(),
    )
    .unwrap()
}

#[test]
fn test_update_compiles_assignments_then_wheres() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    let tuple = dsl
        .update(&table)
        .append(table.column("tags").unwrap(), Value::set(["x"]))
        .set(
            table.column("profile").unwrap(),
            Value::udt([("name", Value::from("a")), ("age", Value::from(3))]),
        )
        .where_(table.column("id").unwrap().eq(7))
        .build_statement()
        .unwrap();

    assert_eq!(
        tuple.statement,
        "UPDATE app.users SET tags = tags + ?, profile = ? WHERE id = ?"
    );
    assert_eq!(tuple.bind_values.len(), 3);
    assert_eq!(
        tuple.bind_values[0],
        WireValue::Set(vec![WireValue::Text("x".to_string())])
    );
    match &tuple.bind_values[1] {
        WireValue::Udt(fields) => {
            assert_eq!(fields.get("name"), Some(&WireValue::Text("a".to_string())));
            assert_eq!(fields.get("age"), Some(&WireValue::Int(3)));
        }
        other => panic!("expected udt bind, got {other:?}"),
    }
    assert_eq!(tuple.bind_values[2], WireValue::Int(7));
}

#[test]
fn test_update_bind_order_with_conditions() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    dsl.update(&table)
        .set(table.column("email").unwrap(), "a@b.c")
        .where_(table.column("id").unwrap().eq(3))
        .if_(table.column("email").unwrap().eq("old@b.c"))
        .execute()
        .unwrap();

    let captured = executor.captured();
    assert_eq!(captured.len(), 1);
    let tuple = &captured[0].0;
    assert_eq!(
        tuple.statement,
        "UPDATE app.users SET email = ? WHERE id = ? IF email = ?"
    );
    assert_eq!(
        tuple.bind_values,
        vec![
            WireValue::Text("a@b.c".to_string()),
            WireValue::Int(3),
            WireValue::Text("old@b.c".to_string()),
        ]
    );
}

#[test]
fn test_select_fetch_maps_records() {
    let table = users();
    let row = Row::new()
        .with("id", WireValue::Int(7))
        .with("email", WireValue::Text("a@b.c".to_string()))
        .with("tags", WireValue::Set(vec![WireValue::Text("x".to_string())]))
        .with("profile", WireValue::Null)
        .with("added_at", WireValue::Timestamp(1_700_000_000_000));
    let executor = RecordingExecutor::respond_with(ResultRows::of(vec![row]));
    let dsl = QueryDsl::new(&executor);

    let records = dsl
        .select_from(&table)
        .where_(table.column("id").unwrap().eq(7))
        .fetch()
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.get("id"), Some(&Value::Int(7)));
    assert_eq!(
        record.get("tags"),
        Some(&Value::Set(vec![Value::Text("x".to_string())]))
    );
    assert_eq!(record.get("profile"), Some(&Value::Null));
    match record.get("added_at") {
        Some(Value::Timestamp(t)) => assert_eq!(t.timestamp_millis(), 1_700_000_000_000),
        other => panic!("expected timestamp, got {other:?}"),
    }

    let captured = executor.captured();
    assert_eq!(
        captured[0].0.statement,
        "SELECT * FROM app.users WHERE id = ?"
    );
}

#[test]
fn test_fetch_one_forces_limit() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    let record = dsl
        .select(&[table.column("email").unwrap().selector()])
        .from(&table)
        .where_(table.column("id").unwrap().eq(7))
        .fetch_one()
        .unwrap();

    assert!(record.is_none());
    let captured = executor.captured();
    assert_eq!(
        captured[0].0.statement,
        "SELECT email FROM app.users WHERE id = ? LIMIT 1"
    );
}

#[test]
fn test_fetch_page_threads_paging_state() {
    let table = users();
    let next = PagingState::new(vec![1, 2, 3]);
    let mut response = ResultRows::of(vec![Row::new().with("email", WireValue::Null)]);
    response.paging_state = Some(next.clone());
    let executor = RecordingExecutor::respond_with(response);
    let dsl = QueryDsl::new(&executor);

    let resume_from = PagingState::new(vec![9]);
    let page = dsl
        .select(&[table.column("email").unwrap().selector()])
        .from(&table)
        .fetch_page(PageRequest::at(50, resume_from.clone()))
        .unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.paging_state, Some(next));

    let captured = executor.captured();
    let page_request = captured[0].1.as_ref().unwrap();
    assert_eq!(page_request.fetch_size, 50);
    assert_eq!(page_request.paging_state, Some(resume_from));
}

#[test]
fn test_select_ordering_and_filtering() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    let tuple = dsl
        .select_from(&table)
        .where_(table.column("email").unwrap().eq("a@b.c"))
        .order_by(table.column("added_at").unwrap().desc())
        .limit(20)
        .allow_filtering()
        .build_statement()
        .unwrap();

    assert_eq!(
        tuple.statement,
        "SELECT * FROM app.users WHERE email = ? ORDER BY added_at DESC LIMIT 20 ALLOW FILTERING"
    );
}

#[test]
fn test_empty_in_is_distinguishable() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    let empty = dsl
        .select_from(&table)
        .where_(table.column("id").unwrap().in_(Vec::<i64>::new()))
        .build_statement()
        .unwrap();
    let full = dsl
        .select_from(&table)
        .where_(table.column("id").unwrap().in_([1i64, 2]))
        .build_statement()
        .unwrap();

    assert_eq!(empty.statement, "SELECT * FROM app.users WHERE id IN ()");
    assert!(empty.bind_values.is_empty());
    assert_eq!(full.statement, "SELECT * FROM app.users WHERE id IN (?, ?)");
    assert_eq!(full.bind_values, vec![WireValue::Int(1), WireValue::Int(2)]);
}

#[test]
fn test_insert_with_columns_and_values() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    dsl.insert_into_columns(
        &table,
        &[table.column("id").unwrap(), table.column("email").unwrap()],
    )
    .values([Value::from(1), Value::from("a@b.c")])
    .if_not_exists()
    .using_ttl(60)
    .execute()
    .unwrap();

    let captured = executor.captured();
    assert_eq!(
        captured[0].0.statement,
        "INSERT INTO app.users (id, email) VALUES (?, ?) IF NOT EXISTS USING TTL 60"
    );
}

#[test]
fn test_delete_columns_with_condition() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    dsl.delete_columns(&[table.column("email").unwrap()])
        .from(&table)
        .where_(table.column("id").unwrap().eq(7))
        .and(table.column("added_at").unwrap().lt(Value::Timestamp(
            chrono::DateTime::from_timestamp_millis(0).unwrap(),
        )))
        .if_exists()
        .execute()
        .unwrap();

    let captured = executor.captured();
    assert_eq!(
        captured[0].0.statement,
        "DELETE email FROM app.users WHERE id = ? AND added_at < ? IF EXISTS"
    );
    assert_eq!(
        captured[0].0.bind_values,
        vec![WireValue::Int(7), WireValue::Timestamp(0)]
    );
}

#[test]
fn test_batch_accumulates_instead_of_dispatching() {
    let table = users();
    let mut batch = Batch::logged();
    {
        let mut dsl = BatchDsl::new(&mut batch);
        dsl.update(&table)
            .set(table.column("email").unwrap(), "a@b.c")
            .where_(table.column("id").unwrap().eq(1))
            .execute()
            .unwrap();
        dsl.delete()
            .from(&table)
            .where_(table.column("id").unwrap().eq(2))
            .execute()
            .unwrap();
    }

    assert_eq!(batch.len(), 2);
    let tuple = batch.build_statement().unwrap();
    assert_eq!(
        tuple.statement,
        "BEGIN BATCH UPDATE app.users SET email = ? WHERE id = ?; \
         DELETE FROM app.users WHERE id = ?; APPLY BATCH"
    );
    assert_eq!(
        tuple.bind_values,
        vec![
            WireValue::Text("a@b.c".to_string()),
            WireValue::Int(1),
            WireValue::Int(2),
        ]
    );

    // Nothing was dispatched while batching; execution happens once, here.
    let executor = RecordingExecutor::default();
    batch.execute(&executor).unwrap();
    assert_eq!(executor.captured().len(), 1);
}

#[test]
fn test_serialization_error_surfaces_before_dispatch() {
    let table = users();
    let executor = RecordingExecutor::default();
    let dsl = QueryDsl::new(&executor);

    let result = dsl
        .update(&table)
        .set(table.column("email").unwrap(), 42)
        .where_(table.column("id").unwrap().eq(1))
        .execute();

    assert!(result.is_err());
    // Compilation failed; the executor never saw a statement.
    assert!(executor.captured().is_empty());
}

fn audits() -> TableModel {
    TableModel::build(
        &MapperConfig::new("app"),
        "audits",
        vec![
            FieldDef::new("id", TypeSignature::scalar("uuid"))
                .partition_key(0)
                .generated(),
            FieldDef::new("note", TypeSignature::scalar("text")),
            FieldDef::new("created_at", TypeSignature::scalar("timestamp")).creation_date(),
            FieldDef::new("updated_at", TypeSignature::scalar("timestamp")).last_updated_date(),
        ],
        &TypeRegistry::new(),
    )
    .unwrap()
}

#[test]
fn test_repository_insert_fills_role_columns() {
    let table = audits();
    let executor = RecordingExecutor::default();
    let repository = Repository::new(&executor, &table);

    let written = repository
        .insert(Record::new().with("note", "hello"))
        .unwrap();

    assert!(matches!(written.get("id"), Some(Value::Uuid(_))));
    assert!(matches!(written.get("created_at"), Some(Value::Timestamp(_))));
    assert!(matches!(written.get("updated_at"), Some(Value::Timestamp(_))));

    let captured = executor.captured();
    assert_eq!(captured.len(), 1);
    assert!(captured[0].0.statement.starts_with("INSERT INTO app.audits ("));
    assert_eq!(captured[0].0.bind_values.len(), 4);
}

#[test]
fn test_repository_keeps_caller_supplied_key() {
    let table = audits();
    let executor = RecordingExecutor::default();
    let repository = Repository::new(&executor, &table);

    let id = Uuid::new_v4();
    let written = repository
        .insert(Record::new().with("id", id).with("note", "hello"))
        .unwrap();
    assert_eq!(written.get("id"), Some(&Value::Uuid(id)));
}

#[test]
fn test_repository_delete_requires_key_values() {
    let table = audits();
    let executor = RecordingExecutor::default();
    let repository = Repository::new(&executor, &table);

    let err = repository.delete(&Record::new()).unwrap_err();
    assert!(err.to_string().contains("key column 'id'"));
}

#[test]
fn test_repository_find_one_by_key() {
    let table = audits();
    let executor = RecordingExecutor::default();
    let repository = Repository::new(&executor, &table);

    let id = Uuid::new_v4();
    let found = repository
        .find_one(&Record::new().with("id", id))
        .unwrap();
    assert!(found.is_none());

    let captured = executor.captured();
    assert_eq!(
        captured[0].0.statement,
        "SELECT * FROM app.audits WHERE id = ? LIMIT 1"
    );
    assert_eq!(captured[0].0.bind_values, vec![WireValue::Uuid(id)]);
}
