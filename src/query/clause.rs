//! Compiled clause fragments and their bind values.
//!
//! Each clause is built from exactly one criteria or assignment expression and
//! pairs a rendered CQL fragment with the wire values its placeholders bind
//! to. Clauses are appended to the owning query in call order; the final
//! statement's placeholder order is generated in that same sequence, so the
//! pairing must never be reordered.

use crate::error::QueryError;
use crate::query::assignment::{Assignment, AssignmentOperation};
use crate::query::criteria::{CriteriaExpression, CriteriaOperator};
use crate::schema::TypeDescriptor;
use crate::value::Value;
use crate::wire::{to_wire, WireValue};

/// A predicate fragment in a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    fragment: String,
    bind_values: Vec<WireValue>,
}

impl WhereClause {
    pub fn from(criteria: CriteriaExpression) -> Result<Self, QueryError> {
        let (column, descriptor, operator, values) = criteria.into_parts();
        match operator {
            CriteriaOperator::Eq
            | CriteriaOperator::Gt
            | CriteriaOperator::Gte
            | CriteriaOperator::Lt
            | CriteriaOperator::Lte
            | CriteriaOperator::Like => {
                let bind = single_bind(&column, operator, &values, &descriptor)?;
                Ok(Self {
                    fragment: format!("{column} {} ?", operator.symbol()),
                    bind_values: vec![bind],
                })
            }
            CriteriaOperator::NotEq => Err(unsupported(operator, "in [WHERE] clause")),
            CriteriaOperator::In => in_fragment(&column, &values, &descriptor)
                .map(|(fragment, bind_values)| Self { fragment, bind_values }),
            CriteriaOperator::Contains => {
                let element = descriptor.element().ok_or_else(|| {
                    unsupported(operator, format!("on non-collection column '{column}'"))
                })?;
                let bind = single_bind(&column, operator, &values, element)?;
                Ok(Self {
                    fragment: format!("{column} CONTAINS ?"),
                    bind_values: vec![bind],
                })
            }
            CriteriaOperator::ContainsKey => {
                let key = descriptor.key().ok_or_else(|| {
                    unsupported(operator, format!("on non-map column '{column}'"))
                })?;
                let bind = single_bind(&column, operator, &values, key)?;
                Ok(Self {
                    fragment: format!("{column} CONTAINS KEY ?"),
                    bind_values: vec![bind],
                })
            }
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn bind_values(&self) -> &[WireValue] {
        &self.bind_values
    }
}

/// A condition fragment in an `IF` clause (compare-and-set).
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionClause {
    fragment: String,
    bind_values: Vec<WireValue>,
}

impl ConditionClause {
    pub fn from(criteria: CriteriaExpression) -> Result<Self, QueryError> {
        let (column, descriptor, operator, values) = criteria.into_parts();
        match operator {
            CriteriaOperator::Eq
            | CriteriaOperator::NotEq
            | CriteriaOperator::Gt
            | CriteriaOperator::Gte
            | CriteriaOperator::Lt
            | CriteriaOperator::Lte => {
                let bind = single_bind(&column, operator, &values, &descriptor)?;
                Ok(Self {
                    fragment: format!("{column} {} ?", operator.symbol()),
                    bind_values: vec![bind],
                })
            }
            CriteriaOperator::In => in_fragment(&column, &values, &descriptor)
                .map(|(fragment, bind_values)| Self { fragment, bind_values }),
            CriteriaOperator::Like
            | CriteriaOperator::Contains
            | CriteriaOperator::ContainsKey => Err(unsupported(operator, "in [IF] clause")),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn bind_values(&self) -> &[WireValue] {
        &self.bind_values
    }
}

/// An assignment fragment in a `SET` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentClause {
    fragment: String,
    bind_values: Vec<WireValue>,
}

impl AssignmentClause {
    pub fn from(assignment: Assignment) -> Result<Self, QueryError> {
        let (column, descriptor, operation, value) = assignment.into_parts();
        match operation {
            AssignmentOperation::Set => {
                let bind = to_wire(&value, &descriptor)?;
                Ok(Self {
                    fragment: format!("{column} = ?"),
                    bind_values: vec![bind],
                })
            }
            AssignmentOperation::Append => {
                require_collection(&column, &descriptor, operation)?;
                let bind = to_wire(&value, &descriptor)?;
                Ok(Self {
                    fragment: format!("{column} = {column} + ?"),
                    bind_values: vec![bind],
                })
            }
            AssignmentOperation::Prepend => {
                if !matches!(descriptor, TypeDescriptor::List(_)) {
                    return Err(op_unsupported(
                        operation,
                        format!("on non-list column '{column}'"),
                    ));
                }
                let bind = to_wire(&value, &descriptor)?;
                Ok(Self {
                    fragment: format!("{column} = ? + {column}"),
                    bind_values: vec![bind],
                })
            }
            AssignmentOperation::Remove => {
                require_collection(&column, &descriptor, operation)?;
                // Removing from a map binds the key set, serialized through
                // the key descriptor rather than the map's own descriptor.
                let bind = match &descriptor {
                    TypeDescriptor::Map(key, _) => {
                        let key_set = TypeDescriptor::Set(key.clone());
                        to_wire(&value, &key_set)?
                    }
                    _ => to_wire(&value, &descriptor)?,
                };
                Ok(Self {
                    fragment: format!("{column} = {column} - ?"),
                    bind_values: vec![bind],
                })
            }
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn bind_values(&self) -> &[WireValue] {
        &self.bind_values
    }
}

fn unsupported(operator: CriteriaOperator, context: impl Into<String>) -> QueryError {
    QueryError::UnsupportedOperator {
        operator: operator.name(),
        context: context.into(),
    }
}

fn op_unsupported(operation: AssignmentOperation, context: impl Into<String>) -> QueryError {
    QueryError::UnsupportedOperator {
        operator: operation.name(),
        context: context.into(),
    }
}

fn require_collection(
    column: &str,
    descriptor: &TypeDescriptor,
    operation: AssignmentOperation,
) -> Result<(), QueryError> {
    if descriptor.is_collection() {
        Ok(())
    } else {
        Err(op_unsupported(
            operation,
            format!("on non-collection column '{column}'"),
        ))
    }
}

fn single_bind(
    column: &str,
    operator: CriteriaOperator,
    values: &[Value],
    descriptor: &TypeDescriptor,
) -> Result<WireValue, QueryError> {
    let value = values.first().ok_or_else(|| {
        QueryError::Compilation(format!(
            "operator '{operator}' on column '{column}' requires exactly one value"
        ))
    })?;
    Ok(to_wire(value, descriptor)?)
}

fn in_fragment(
    column: &str,
    values: &[Value],
    descriptor: &TypeDescriptor,
) -> Result<(String, Vec<WireValue>), QueryError> {
    if values.is_empty() {
        // Degenerate empty membership: no placeholder, no bind values.
        return Ok((format!("{column} IN ()"), Vec::new()));
    }
    let binds = values
        .iter()
        .map(|value| to_wire(value, descriptor))
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = vec!["?"; values.len()].join(", ");
    Ok((format!("{column} IN ({placeholders})"), binds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::criteria::CriteriaExpression;
    use crate::schema::ScalarKind;

    fn int_descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Int)
    }

    fn criteria(operator: CriteriaOperator, values: Vec<Value>) -> CriteriaExpression {
        CriteriaExpression::new("age", int_descriptor(), operator, values)
    }

    #[test]
    fn test_comparison_binds_one_value() {
        let clause = WhereClause::from(criteria(CriteriaOperator::Gte, vec![Value::Int(18)])).unwrap();
        assert_eq!(clause.fragment(), "age >= ?");
        assert_eq!(clause.bind_values(), &[WireValue::Int(18)]);
    }

    #[test]
    fn test_in_preserves_order() {
        let clause = WhereClause::from(criteria(
            CriteriaOperator::In,
            vec![Value::Int(3), Value::Int(1), Value::Int(2)],
        ))
        .unwrap();
        assert_eq!(clause.fragment(), "age IN (?, ?, ?)");
        assert_eq!(
            clause.bind_values(),
            &[WireValue::Int(3), WireValue::Int(1), WireValue::Int(2)]
        );
    }

    #[test]
    fn test_empty_in_has_no_placeholders() {
        let clause = WhereClause::from(criteria(CriteriaOperator::In, Vec::new())).unwrap();
        assert_eq!(clause.fragment(), "age IN ()");
        assert!(clause.bind_values().is_empty());
    }

    #[test]
    fn test_not_eq_rejected_in_where() {
        let err = WhereClause::from(criteria(CriteriaOperator::NotEq, vec![Value::Int(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::UnsupportedOperator {
                operator: "NOT_EQ",
                context: "in [WHERE] clause".to_string(),
            }
        );
    }

    #[test]
    fn test_contains_uses_element_descriptor() {
        let set_descriptor = TypeDescriptor::Set(Box::new(TypeDescriptor::Scalar(ScalarKind::Text)));
        let criteria = CriteriaExpression::new(
            "tags",
            set_descriptor,
            CriteriaOperator::Contains,
            vec![Value::from("vip")],
        );
        let clause = WhereClause::from(criteria).unwrap();
        assert_eq!(clause.fragment(), "tags CONTAINS ?");
        // Bound as a bare text element, not as a one-element set.
        assert_eq!(clause.bind_values(), &[WireValue::Text("vip".to_string())]);
    }

    #[test]
    fn test_contains_on_scalar_rejected() {
        let err = WhereClause::from(criteria(CriteriaOperator::Contains, vec![Value::Int(1)]))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { operator: "CONTAINS", .. }));
    }

    #[test]
    fn test_contains_key_uses_key_descriptor() {
        let map_descriptor = TypeDescriptor::Map(
            Box::new(TypeDescriptor::Scalar(ScalarKind::Text)),
            Box::new(TypeDescriptor::Scalar(ScalarKind::Int)),
        );
        let criteria = CriteriaExpression::new(
            "scores",
            map_descriptor,
            CriteriaOperator::ContainsKey,
            vec![Value::from("alice")],
        );
        let clause = WhereClause::from(criteria).unwrap();
        assert_eq!(clause.fragment(), "scores CONTAINS KEY ?");
        assert_eq!(clause.bind_values(), &[WireValue::Text("alice".to_string())]);
    }

    #[test]
    fn test_condition_rejects_contains() {
        let err = ConditionClause::from(criteria(CriteriaOperator::Contains, vec![Value::Int(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::UnsupportedOperator {
                operator: "CONTAINS",
                context: "in [IF] clause".to_string(),
            }
        );
    }

    #[test]
    fn test_condition_allows_not_eq() {
        let clause = ConditionClause::from(criteria(CriteriaOperator::NotEq, vec![Value::Int(1)]))
            .unwrap();
        assert_eq!(clause.fragment(), "age != ?");
    }

    #[test]
    fn test_assignment_set() {
        let column = column_model("age", int_descriptor());
        let clause = AssignmentClause::from(Assignment::set(&column, 30)).unwrap();
        assert_eq!(clause.fragment(), "age = ?");
        assert_eq!(clause.bind_values(), &[WireValue::Int(30)]);
    }

    #[test]
    fn test_append_to_set() {
        let column = column_model(
            "tags",
            TypeDescriptor::Set(Box::new(TypeDescriptor::Scalar(ScalarKind::Text))),
        );
        let clause =
            AssignmentClause::from(Assignment::append(&column, Value::set(["x"]))).unwrap();
        assert_eq!(clause.fragment(), "tags = tags + ?");
        assert_eq!(
            clause.bind_values(),
            &[WireValue::Set(vec![WireValue::Text("x".to_string())])]
        );
    }

    #[test]
    fn test_prepend_requires_list() {
        let column = column_model(
            "tags",
            TypeDescriptor::Set(Box::new(TypeDescriptor::Scalar(ScalarKind::Text))),
        );
        let err = AssignmentClause::from(Assignment::prepend(&column, Value::set(["x"])))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { operator: "PREPEND", .. }));
    }

    #[test]
    fn test_map_remove_binds_key_set() {
        let column = column_model(
            "scores",
            TypeDescriptor::Map(
                Box::new(TypeDescriptor::Scalar(ScalarKind::Text)),
                Box::new(TypeDescriptor::Scalar(ScalarKind::Int)),
            ),
        );
        let clause =
            AssignmentClause::from(Assignment::remove(&column, Value::set(["alice"]))).unwrap();
        assert_eq!(clause.fragment(), "scores = scores - ?");
        assert_eq!(
            clause.bind_values(),
            &[WireValue::Set(vec![WireValue::Text("alice".to_string())])]
        );
    }

    #[test]
    fn test_append_on_scalar_rejected() {
        let column = column_model("age", int_descriptor());
        let err = AssignmentClause::from(Assignment::append(&column, 1)).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { operator: "APPEND", .. }));
    }

    fn column_model(name: &str, descriptor: TypeDescriptor) -> crate::schema::ColumnModel {
        use crate::config::MapperConfig;
        use crate::schema::{FieldDef, TableModel, TypeRegistry, TypeSignature};

        // Build through a real table so the column carries its descriptor.
        let signature = match &descriptor {
            TypeDescriptor::Scalar(ScalarKind::Int) => TypeSignature::scalar("int"),
            TypeDescriptor::Set(_) => TypeSignature::set_of(TypeSignature::scalar("text")),
            TypeDescriptor::Map(..) => TypeSignature::map_of(
                TypeSignature::scalar("text"),
                TypeSignature::scalar("int"),
            ),
            other => panic!("unsupported test descriptor {other:?}"),
        };
        let registry = TypeRegistry::new();
        let table = TableModel::build(
            &MapperConfig::new("test"),
            "t",
            vec![
                FieldDef::new("pk", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new(name, signature),
            ],
            &registry,
        )
        .unwrap();
        table.column(name).unwrap().clone()
    }
}
