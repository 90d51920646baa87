//! # cqlmap — typed statement builder and record mapper for wide-column stores
//!
//! cqlmap models declared entity shapes (type resolution, key roles, wire
//! serialization plans) and compiles statements against them through a
//! staged fluent surface.
//!
//! ## Quick example
//!
//! ```rust,ignore
//! use cqlmap::prelude::*;
//!
//! let dsl = QueryDsl::new(&executor);
//!
//! let rows = dsl
//!     .select_from(&users)
//!     .where_(users.column("id")?.eq(user_id))
//!     .fetch()?;
//!
//! dsl.update(&users)
//!     .append(users.column("tags")?, Value::set([Value::from("vip")]))
//!     .where_(users.column("id")?.eq(user_id))
//!     .if_exists()
//!     .execute()?;
//! ```
//!
//! Execution goes through the [`executor::StatementExecutor`] port; the crate
//! itself never touches the network.

pub mod batch;
pub mod config;
pub mod crud;
pub mod dsl;
pub mod error;
pub mod executor;
pub mod query;
pub mod schema;
pub mod value;
pub mod wire;

pub mod prelude {
    pub use crate::batch::{Batch, BatchMode};
    pub use crate::config::{ConsistencyLevel, MapperConfig, SerialConsistencyLevel};
    pub use crate::crud::Repository;
    pub use crate::dsl::{BatchDsl, QueryDsl, Record};
    pub use crate::error::{
        CqlMapError, CqlMapResult, ModelError, QueryError, SerdesError, TypeResolutionError,
    };
    pub use crate::executor::{ResultRows, Row, StatementExecutor};
    pub use crate::query::{
        Assignment, AssignmentOperation, CriteriaExpression, CriteriaOperator, OrderExpression,
        PageRequest, PageResult, PagingState, SelectableField, StatementTuple,
    };
    pub use crate::schema::{
        ClusteringOrder, ColumnModel, EnumShape, FieldDef, ScalarKind, TableModel, TypeDescriptor,
        TypeRegistry, TypeResolver, TypeSignature, UdtShape,
    };
    pub use crate::value::Value;
    pub use crate::wire::{from_wire, to_wire, WireValue};
}
