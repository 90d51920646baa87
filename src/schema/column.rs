//! Per-column metadata and the typed expression factories hanging off it.

use serde::{Deserialize, Serialize};

use crate::query::criteria::{CriteriaExpression, CriteriaOperator, OrderExpression};
use crate::query::selector::SelectableField;
use crate::schema::descriptor::TypeDescriptor;
use crate::value::Value;

/// Sort direction of a clustering key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusteringOrder {
    Asc,
    Desc,
}

impl ClusteringOrder {
    pub fn as_cql(self) -> &'static str {
        match self {
            ClusteringOrder::Asc => "ASC",
            ClusteringOrder::Desc => "DESC",
        }
    }
}

/// Immutable metadata of a single table column.
///
/// Built once during table-model construction and shared read-only from then
/// on. Doubles as the handle client code uses to spell criteria, orderings and
/// selectors: `users.column("id")?.eq(7)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub(crate) name: String,
    pub(crate) accessor: String,
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) partition_key: Option<usize>,
    pub(crate) clustering_key: Option<(usize, ClusteringOrder)>,
    pub(crate) index_name: Option<String>,
    pub(crate) generated: bool,
    pub(crate) creation_date: bool,
    pub(crate) last_updated_date: bool,
}

impl ColumnModel {
    /// Wire column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accessor identifier on the host entity, for the code-generation step.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn is_partition_key(&self) -> bool {
        self.partition_key.is_some()
    }

    pub fn partition_key_ordinal(&self) -> Option<usize> {
        self.partition_key
    }

    pub fn is_clustering_key(&self) -> bool {
        self.clustering_key.is_some()
    }

    pub fn clustering_key_ordinal(&self) -> Option<usize> {
        self.clustering_key.map(|(ordinal, _)| ordinal)
    }

    pub fn clustering_order(&self) -> Option<ClusteringOrder> {
        self.clustering_key.map(|(_, order)| order)
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_partition_key() || self.is_clustering_key()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Whether the column value is auto-generated at insert time.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn is_creation_date(&self) -> bool {
        self.creation_date
    }

    pub fn is_last_updated_date(&self) -> bool {
        self.last_updated_date
    }

    // ---- criteria factories ----

    fn criteria(&self, operator: CriteriaOperator, values: Vec<Value>) -> CriteriaExpression {
        CriteriaExpression::new(&self.name, self.descriptor.clone(), operator, values)
    }

    pub fn eq(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Eq, vec![value.into()])
    }

    pub fn neq(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::NotEq, vec![value.into()])
    }

    pub fn gt(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Gt, vec![value.into()])
    }

    pub fn gte(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Gte, vec![value.into()])
    }

    pub fn lt(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Lt, vec![value.into()])
    }

    pub fn lte(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Lte, vec![value.into()])
    }

    /// Membership criteria; an empty value list compiles to an always-false
    /// fragment with no bind values.
    pub fn in_<I, V>(&self, values: I) -> CriteriaExpression
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.criteria(
            CriteriaOperator::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn like(&self, pattern: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Like, vec![pattern.into()])
    }

    /// Collection membership; the operand is serialized through the element
    /// descriptor of this column, not the collection's own descriptor.
    pub fn contains(&self, value: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::Contains, vec![value.into()])
    }

    /// Map key membership; the operand is serialized through the key descriptor.
    pub fn contains_key(&self, key: impl Into<Value>) -> CriteriaExpression {
        self.criteria(CriteriaOperator::ContainsKey, vec![key.into()])
    }

    // ---- ordering factories ----

    pub fn asc(&self) -> OrderExpression {
        OrderExpression::new(&self.name, ClusteringOrder::Asc)
    }

    pub fn desc(&self) -> OrderExpression {
        OrderExpression::new(&self.name, ClusteringOrder::Desc)
    }

    // ---- selector factories ----

    pub fn selector(&self) -> SelectableField {
        SelectableField::column(self)
    }

    pub fn count(&self) -> SelectableField {
        SelectableField::count(self)
    }

    pub fn min(&self) -> SelectableField {
        SelectableField::min(self)
    }

    pub fn max(&self) -> SelectableField {
        SelectableField::max(self)
    }

    pub fn sum(&self) -> SelectableField {
        SelectableField::sum(self)
    }

    pub fn avg(&self) -> SelectableField {
        SelectableField::avg(self)
    }
}
