//! Table model construction and validation.
//!
//! All key/role validation happens here, once, when the entity shape is
//! registered. A shape that fails validation never produces a model, so no
//! query path ever observes a half-built table.

use std::collections::HashMap;

use crate::config::{ConsistencyLevel, MapperConfig, SerialConsistencyLevel};
use crate::error::ModelError;
use crate::schema::column::{ClusteringOrder, ColumnModel};
use crate::schema::descriptor::{ScalarKind, TypeDescriptor};
use crate::schema::resolver::TypeResolver;
use crate::schema::signature::{TypeRegistry, TypeSignature};

/// Declared shape of a single entity field, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    signature: TypeSignature,
    accessor: Option<String>,
    partition_key: Option<usize>,
    clustering_key: Option<(usize, ClusteringOrder)>,
    index_name: Option<String>,
    generated: bool,
    creation_date: bool,
    last_updated_date: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, signature: TypeSignature) -> Self {
        Self {
            name: name.into(),
            signature,
            accessor: None,
            partition_key: None,
            clustering_key: None,
            index_name: None,
            generated: false,
            creation_date: false,
            last_updated_date: false,
        }
    }

    /// Mark as partition key with the given ordinal.
    pub fn partition_key(mut self, ordinal: usize) -> Self {
        self.partition_key = Some(ordinal);
        self
    }

    /// Mark as clustering key with the given ordinal and sort direction.
    pub fn clustering_key(mut self, ordinal: usize, order: ClusteringOrder) -> Self {
        self.clustering_key = Some((ordinal, order));
        self
    }

    /// Attach a secondary index.
    pub fn indexed(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Value is generated at insert time (uuid columns).
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Column records the row creation instant.
    pub fn creation_date(mut self) -> Self {
        self.creation_date = true;
        self
    }

    /// Column records the last update instant.
    pub fn last_updated_date(mut self) -> Self {
        self.last_updated_date = true;
        self
    }

    /// Override the accessor identifier (defaults to the column name).
    pub fn accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = Some(accessor.into());
        self
    }
}

/// Immutable model of a table: its columns, key layout and consistency
/// defaults. Safe to share read-only across any number of builders.
#[derive(Debug, Clone)]
pub struct TableModel {
    keyspace: String,
    name: String,
    columns: Vec<ColumnModel>,
    by_name: HashMap<String, usize>,
    partition_keys: Vec<String>,
    clustering_keys: Vec<(String, ClusteringOrder)>,
    read_consistency: Option<ConsistencyLevel>,
    write_consistency: Option<ConsistencyLevel>,
    serial_consistency: Option<SerialConsistencyLevel>,
}

impl TableModel {
    /// Resolve and validate an entity shape into a table model.
    pub fn build(
        config: &MapperConfig,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
        registry: &TypeRegistry,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let resolver = TypeResolver::new(registry);

        let mut columns = Vec::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        for field in fields {
            let descriptor = resolver.resolve(&field.signature)?;
            validate_roles(&field, &descriptor)?;
            let column = ColumnModel {
                accessor: field.accessor.unwrap_or_else(|| field.name.clone()),
                name: field.name,
                descriptor,
                partition_key: field.partition_key,
                clustering_key: field.clustering_key,
                index_name: field.index_name,
                generated: field.generated,
                creation_date: field.creation_date,
                last_updated_date: field.last_updated_date,
            };
            if by_name
                .insert(column.name.clone(), columns.len())
                .is_some()
            {
                return Err(ModelError::DuplicateColumn {
                    table: name,
                    column: column.name,
                });
            }
            columns.push(column);
        }

        let partition_keys = ordered_keys(
            &name,
            "partition",
            columns
                .iter()
                .filter_map(|c| c.partition_key.map(|ordinal| (c.name.clone(), ordinal))),
        )?;
        if partition_keys.is_empty() {
            return Err(ModelError::MissingPartitionKey { table: name });
        }

        let mut clustering: Vec<(String, usize, ClusteringOrder)> = columns
            .iter()
            .filter_map(|c| {
                c.clustering_key
                    .map(|(ordinal, order)| (c.name.clone(), ordinal, order))
            })
            .collect();
        clustering.sort_by_key(|&(_, ordinal, _)| ordinal);
        check_contiguous(
            &name,
            "clustering",
            clustering.iter().map(|(column, ordinal, _)| (column.as_str(), *ordinal)),
        )?;
        let clustering_keys = clustering
            .into_iter()
            .map(|(column, _, order)| (column, order))
            .collect();

        Ok(Self {
            keyspace: config.keyspace.clone(),
            name,
            columns,
            by_name,
            partition_keys,
            clustering_keys,
            read_consistency: config.read_consistency,
            write_consistency: config.write_consistency,
            serial_consistency: config.serial_consistency,
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `keyspace.table`, as it appears in statements.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.name)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    /// Look up a column by wire name, with a spelling suggestion on miss.
    pub fn column(&self, name: &str) -> Result<&ColumnModel, ModelError> {
        match self.by_name.get(name) {
            Some(&idx) => Ok(&self.columns[idx]),
            None => Err(ModelError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
                suggestion: self.did_you_mean(name),
            }),
        }
    }

    /// Partition key column names in ordinal order.
    pub fn partition_keys(&self) -> &[String] {
        &self.partition_keys
    }

    /// Clustering key column names and orders, in ordinal order.
    pub fn clustering_keys(&self) -> &[(String, ClusteringOrder)] {
        &self.clustering_keys
    }

    pub fn is_primary_key(&self, column_name: &str) -> bool {
        self.column(column_name)
            .map(|c| c.is_primary_key())
            .unwrap_or(false)
    }

    pub fn primary_key_len(&self) -> usize {
        self.partition_keys.len() + self.clustering_keys.len()
    }

    pub fn read_consistency(&self) -> Option<ConsistencyLevel> {
        self.read_consistency
    }

    pub fn write_consistency(&self) -> Option<ConsistencyLevel> {
        self.write_consistency
    }

    pub fn serial_consistency(&self) -> Option<SerialConsistencyLevel> {
        self.serial_consistency
    }

    fn did_you_mean(&self, input: &str) -> Option<String> {
        let mut best: Option<(usize, &str)> = None;
        for candidate in self.by_name.keys() {
            let dist = strsim::levenshtein(input, candidate);
            let threshold = match input.len() {
                0..=2 => 0,
                3..=5 => 2,
                _ => 3,
            };
            if dist <= threshold && best.map(|(d, _)| dist < d).unwrap_or(true) {
                best = Some((dist, candidate));
            }
        }
        best.map(|(_, name)| name.to_string())
    }
}

/// Check that ordinals form a contiguous 0-based sequence and return the
/// column names in ordinal order.
fn ordered_keys(
    table: &str,
    kind: &'static str,
    keys: impl Iterator<Item = (String, usize)>,
) -> Result<Vec<String>, ModelError> {
    let mut keys: Vec<(String, usize)> = keys.collect();
    keys.sort_by_key(|&(_, ordinal)| ordinal);
    check_contiguous(
        table,
        kind,
        keys.iter().map(|(column, ordinal)| (column.as_str(), *ordinal)),
    )?;
    Ok(keys.into_iter().map(|(column, _)| column).collect())
}

fn check_contiguous<'a>(
    table: &str,
    kind: &'static str,
    ordered: impl Iterator<Item = (&'a str, usize)>,
) -> Result<(), ModelError> {
    for (position, (column, ordinal)) in ordered.enumerate() {
        if ordinal != position {
            return Err(ModelError::InvalidKeyOrdering {
                table: table.to_string(),
                kind,
                detail: format!(
                    "column '{column}' has ordinal {ordinal}, expected {position}"
                ),
            });
        }
    }
    Ok(())
}

fn validate_roles(
    field: &FieldDef,
    descriptor: &TypeDescriptor,
) -> Result<(), ModelError> {
    let special_roles =
        usize::from(field.generated) + usize::from(field.creation_date) + usize::from(field.last_updated_date);
    if special_roles > 1 {
        return Err(ModelError::ConflictingRoles {
            column: field.name.clone(),
        });
    }
    if field.generated && *descriptor != TypeDescriptor::Scalar(ScalarKind::Uuid) {
        return Err(ModelError::InvalidRoleType {
            column: field.name.clone(),
            role: "generated",
            expected: "uuid",
        });
    }
    if (field.creation_date || field.last_updated_date)
        && *descriptor != TypeDescriptor::Scalar(ScalarKind::Timestamp)
    {
        return Err(ModelError::InvalidRoleType {
            column: field.name.clone(),
            role: if field.creation_date {
                "a creation date"
            } else {
                "a last-updated date"
            },
            expected: "timestamp",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MapperConfig {
        MapperConfig::new("app")
    }

    fn id_field() -> FieldDef {
        FieldDef::new("id", TypeSignature::scalar("uuid")).partition_key(0)
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = TypeRegistry::new();
        let table = TableModel::build(
            &config(),
            "users",
            vec![
                id_field(),
                FieldDef::new("email", TypeSignature::scalar("text")).indexed("users_email_idx"),
                FieldDef::new("added_at", TypeSignature::scalar("timestamp"))
                    .clustering_key(0, ClusteringOrder::Desc),
            ],
            &registry,
        )
        .unwrap();

        assert_eq!(table.qualified_name(), "app.users");
        assert_eq!(table.partition_keys(), &["id".to_string()]);
        assert_eq!(table.clustering_keys().len(), 1);
        assert_eq!(table.primary_key_len(), 2);
        assert_eq!(table.column("email").unwrap().index_name(), Some("users_email_idx"));
    }

    #[test]
    fn test_missing_partition_key() {
        let registry = TypeRegistry::new();
        let err = TableModel::build(
            &config(),
            "orphans",
            vec![FieldDef::new("email", TypeSignature::scalar("text"))],
            &registry,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingPartitionKey {
                table: "orphans".to_string()
            }
        );
    }

    #[test]
    fn test_gapped_partition_ordinals() {
        let registry = TypeRegistry::new();
        let err = TableModel::build(
            &config(),
            "events",
            vec![
                FieldDef::new("a", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new("b", TypeSignature::scalar("uuid")).partition_key(2),
            ],
            &registry,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidKeyOrdering { kind: "partition", .. }
        ));
    }

    #[test]
    fn test_duplicate_partition_ordinals() {
        let registry = TypeRegistry::new();
        let err = TableModel::build(
            &config(),
            "events",
            vec![
                FieldDef::new("a", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new("b", TypeSignature::scalar("uuid")).partition_key(0),
            ],
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidKeyOrdering { .. }));
    }

    #[test]
    fn test_clustering_ordinals_numbered_independently() {
        let registry = TypeRegistry::new();
        // Clustering ordinals restart at 0 even with two partition keys.
        let table = TableModel::build(
            &config(),
            "events",
            vec![
                FieldDef::new("a", TypeSignature::scalar("uuid")).partition_key(0),
                FieldDef::new("b", TypeSignature::scalar("uuid")).partition_key(1),
                FieldDef::new("c", TypeSignature::scalar("int"))
                    .clustering_key(0, ClusteringOrder::Asc),
            ],
            &registry,
        )
        .unwrap();
        assert_eq!(table.clustering_keys()[0].0, "c");
    }

    #[test]
    fn test_conflicting_roles() {
        let registry = TypeRegistry::new();
        let err = TableModel::build(
            &config(),
            "users",
            vec![
                id_field(),
                FieldDef::new("stamp", TypeSignature::scalar("timestamp"))
                    .creation_date()
                    .last_updated_date(),
            ],
            &registry,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::ConflictingRoles {
                column: "stamp".to_string()
            }
        );
    }

    #[test]
    fn test_role_type_checked() {
        let registry = TypeRegistry::new();
        let err = TableModel::build(
            &config(),
            "users",
            vec![
                id_field(),
                FieldDef::new("serial", TypeSignature::scalar("text")).generated(),
            ],
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRoleType { role: "generated", .. }));
    }

    #[test]
    fn test_unknown_column_suggestion() {
        let registry = TypeRegistry::new();
        let table = TableModel::build(
            &config(),
            "users",
            vec![
                id_field(),
                FieldDef::new("email", TypeSignature::scalar("text")),
            ],
            &registry,
        )
        .unwrap();
        let err = table.column("emial").unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownColumn {
                table: "users".to_string(),
                column: "emial".to_string(),
                suggestion: Some("email".to_string()),
            }
        );
    }
}
