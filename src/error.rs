//! Error types for cqlmap.
//!
//! Every failure in this crate is a construction-time failure: type
//! classification, model registration, value serialization, or statement
//! compilation. The crate performs no I/O of its own, so transient transport
//! failures never originate here — executor implementations report them
//! through [`QueryError::Execution`].

use thiserror::Error;

/// Failure while classifying a raw type signature into a type descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeResolutionError {
    /// The signature declares a container contract but its erased name is not
    /// the supported canonical container type.
    #[error("container type '{found}' is not supported, try using ['{supported}'] instead")]
    UnsupportedContainer { found: String, supported: &'static str },

    /// The signature carries the wrong number of generic type arguments.
    #[error("type '{name}' should have '{expected}' parameter type(s), found '{actual}'")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A signature marked as a user-defined type references an unregistered name.
    #[error("user-defined type '{0}' is not registered")]
    UnknownUdt(String),

    /// An enum-based signature has no registered variant set.
    #[error("enum type '{0}' is not registered")]
    UnknownEnum(String),

    /// A user-defined type refers back to itself, directly or transitively.
    #[error("cyclic type reference: {}", .path.join(" -> "))]
    CyclicReference { path: Vec<String> },
}

/// Failure while building a table or column model.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Resolution(#[from] TypeResolutionError),

    /// Table declared without any partition key column.
    #[error("table '{table}' must declare at least one partition key column")]
    MissingPartitionKey { table: String },

    /// Partition or clustering key ordinals are duplicated or gapped.
    #[error("invalid {kind} key ordering on table '{table}': {detail}")]
    InvalidKeyOrdering {
        table: String,
        kind: &'static str,
        detail: String,
    },

    /// A column declares more than one of the special roles.
    #[error("column '{column}' declares more than one special role")]
    ConflictingRoles { column: String },

    /// A special role placed on a column whose type cannot carry it.
    #[error("column '{column}' cannot be {role}: expected a {expected} column")]
    InvalidRoleType {
        column: String,
        role: &'static str,
        expected: &'static str,
    },

    #[error("duplicate column '{column}' on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Lookup of a column that does not exist on the table.
    #[error("column '{column}' not found on table '{table}'{}", .suggestion.as_ref().map(|s| format!(". Did you mean '{s}'?")).unwrap_or_default())]
    UnknownColumn {
        table: String,
        column: String,
        suggestion: Option<String>,
    },
}

/// Failure while converting between language-level and wire-level values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SerdesError {
    /// The value does not match the shape the descriptor expects.
    #[error("cannot serialize {actual} value as {expected}")]
    TypeMismatch {
        expected: String,
        actual: &'static str,
    },

    /// A wire string is not a declared variant of the target enum.
    #[error("'{value}' is not a known value of enum '{enum_name}'")]
    UnknownEnumValue { enum_name: String, value: String },

    /// A wire struct is missing a field the descriptor declares.
    #[error("wire value for udt '{udt}' is missing field '{field}'")]
    MissingUdtField { udt: String, field: String },
}

/// Failure while building, compiling or dispatching a statement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The operator is not valid for the clause being built.
    #[error("operation '{operator}' is not supported {context}")]
    UnsupportedOperator {
        operator: &'static str,
        context: String,
    },

    #[error(transparent)]
    Serialization(#[from] SerdesError),

    /// The accumulated query cannot be compiled into a complete statement.
    #[error("query compilation failed: {0}")]
    Compilation(String),

    /// Reported by executor implementations; never raised by the core.
    #[error("execution error: {0}")]
    Execution(String),
}

/// Umbrella error for the whole crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CqlMapError {
    #[error(transparent)]
    Resolution(#[from] TypeResolutionError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Serdes(#[from] SerdesError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type alias for cqlmap operations.
pub type CqlMapResult<T> = Result<T, CqlMapError>;
