//! Criteria and ordering expressions produced by column handles.

use crate::schema::{ClusteringOrder, TypeDescriptor};
use crate::value::Value;

/// Comparison operator of a criteria expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaOperator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Like,
    Contains,
    ContainsKey,
}

impl CriteriaOperator {
    /// CQL symbol or keyword for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            CriteriaOperator::Eq => "=",
            CriteriaOperator::NotEq => "!=",
            CriteriaOperator::Gt => ">",
            CriteriaOperator::Gte => ">=",
            CriteriaOperator::Lt => "<",
            CriteriaOperator::Lte => "<=",
            CriteriaOperator::In => "IN",
            CriteriaOperator::Like => "LIKE",
            CriteriaOperator::Contains => "CONTAINS",
            CriteriaOperator::ContainsKey => "CONTAINS KEY",
        }
    }

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            CriteriaOperator::Eq => "EQ",
            CriteriaOperator::NotEq => "NOT_EQ",
            CriteriaOperator::Gt => "GT",
            CriteriaOperator::Gte => "GTE",
            CriteriaOperator::Lt => "LT",
            CriteriaOperator::Lte => "LTE",
            CriteriaOperator::In => "IN",
            CriteriaOperator::Like => "LIKE",
            CriteriaOperator::Contains => "CONTAINS",
            CriteriaOperator::ContainsKey => "CONTAINS_KEY",
        }
    }
}

impl std::fmt::Display for CriteriaOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A (field, operator, values) triple, produced by a column handle and
/// consumed exactly once by clause construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaExpression {
    column: String,
    descriptor: TypeDescriptor,
    operator: CriteriaOperator,
    values: Vec<Value>,
}

impl CriteriaExpression {
    pub fn new(
        column: impl Into<String>,
        descriptor: TypeDescriptor,
        operator: CriteriaOperator,
        values: Vec<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            descriptor,
            operator,
            values,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn operator(&self) -> CriteriaOperator {
        self.operator
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn into_parts(self) -> (String, TypeDescriptor, CriteriaOperator, Vec<Value>) {
        (self.column, self.descriptor, self.operator, self.values)
    }
}

/// Ordering of a select by a clustering column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderExpression {
    column: String,
    order: ClusteringOrder,
}

impl OrderExpression {
    pub fn new(column: impl Into<String>, order: ClusteringOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn order(&self) -> ClusteringOrder {
        self.order
    }
}
