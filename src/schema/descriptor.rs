//! Resolved storage-shape descriptors.

use serde::{Deserialize, Serialize};

/// Scalar storage kind of a leaf descriptor.
///
/// Granularity matters only where serialization differs (timestamps); the
/// remaining kinds are carried for diagnostics and for the DDL collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    Boolean,
    Int,
    BigInt,
    Double,
    Text,
    Uuid,
    Timestamp,
    Decimal,
    Blob,
    /// Unrecognized scalar name; values pass through unconverted.
    Opaque,
}

impl ScalarKind {
    /// Classify an erased canonical scalar name.
    pub fn from_canonical(name: &str) -> Self {
        match name {
            "boolean" => ScalarKind::Boolean,
            "int" | "smallint" | "tinyint" => ScalarKind::Int,
            "bigint" | "counter" | "varint" => ScalarKind::BigInt,
            "double" | "float" => ScalarKind::Double,
            "text" | "varchar" | "ascii" => ScalarKind::Text,
            "uuid" | "timeuuid" => ScalarKind::Uuid,
            "timestamp" => ScalarKind::Timestamp,
            "decimal" => ScalarKind::Decimal,
            "blob" => ScalarKind::Blob,
            _ => ScalarKind::Opaque,
        }
    }
}

/// Immutable recursive classification of a field's storage shape.
///
/// Built once per column at model-build time and held for the lifetime of the
/// owning [`super::ColumnModel`]. Depth is unbounded but finite; every leaf is
/// a scalar or an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    List(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Udt {
        name: String,
        fields: Vec<(String, TypeDescriptor)>,
    },
    Enum {
        name: String,
        variants: Vec<String>,
    },
}

impl TypeDescriptor {
    /// True for list, set and map descriptors.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::List(_) | TypeDescriptor::Set(_) | TypeDescriptor::Map(..)
        )
    }

    /// Element descriptor of a collection: the child of a list or set, the
    /// value child of a map. `None` for everything else.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::List(elem) | TypeDescriptor::Set(elem) => Some(elem),
            TypeDescriptor::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Key descriptor of a map. `None` for everything else.
    pub fn key(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Map(key, _) => Some(key),
            _ => None,
        }
    }

    /// Short name of the shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Scalar(_) => "scalar",
            TypeDescriptor::List(_) => "list",
            TypeDescriptor::Set(_) => "set",
            TypeDescriptor::Map(..) => "map",
            TypeDescriptor::Udt { .. } => "udt",
            TypeDescriptor::Enum { .. } => "enum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kind_classification() {
        assert_eq!(ScalarKind::from_canonical("text"), ScalarKind::Text);
        assert_eq!(ScalarKind::from_canonical("timeuuid"), ScalarKind::Uuid);
        assert_eq!(ScalarKind::from_canonical("duration"), ScalarKind::Opaque);
    }

    #[test]
    fn test_element_and_key() {
        let map = TypeDescriptor::Map(
            Box::new(TypeDescriptor::Scalar(ScalarKind::Text)),
            Box::new(TypeDescriptor::Scalar(ScalarKind::Int)),
        );
        assert_eq!(map.key(), Some(&TypeDescriptor::Scalar(ScalarKind::Text)));
        assert_eq!(
            map.element(),
            Some(&TypeDescriptor::Scalar(ScalarKind::Int))
        );
        assert!(TypeDescriptor::Scalar(ScalarKind::Int).element().is_none());
    }
}
