//! Wire-level value tree and the serialization dispatcher.
//!
//! [`to_wire`] and [`from_wire`] walk a value tree and a [`TypeDescriptor`]
//! in lockstep. For every value admitted by a descriptor the round trip
//! `from_wire(to_wire(v, d), d) == v` holds.

use std::collections::HashMap;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SerdesError;
use crate::schema::{ScalarKind, TypeDescriptor};
use crate::value::Value;

/// A wire-level value, as sent to and received from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Uuid(Uuid),
    /// Epoch milliseconds
    Timestamp(i64),
    Decimal(Decimal),
    Blob(Vec<u8>),
    List(Vec<WireValue>),
    Set(Vec<WireValue>),
    Map(Vec<(WireValue, WireValue)>),
    /// Wire struct keyed by wire field names
    Udt(HashMap<String, WireValue>),
}

impl WireValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Bool(_) => "bool",
            WireValue::Int(_) => "int",
            WireValue::Double(_) => "double",
            WireValue::Text(_) => "text",
            WireValue::Uuid(_) => "uuid",
            WireValue::Timestamp(_) => "timestamp",
            WireValue::Decimal(_) => "decimal",
            WireValue::Blob(_) => "blob",
            WireValue::List(_) => "list",
            WireValue::Set(_) => "set",
            WireValue::Map(_) => "map",
            WireValue::Udt(_) => "udt",
        }
    }
}

fn mismatch(descriptor: &TypeDescriptor, value: &Value) -> SerdesError {
    SerdesError::TypeMismatch {
        expected: descriptor.kind_name().to_string(),
        actual: value.kind(),
    }
}

fn wire_mismatch(descriptor: &TypeDescriptor, wire: &WireValue) -> SerdesError {
    SerdesError::TypeMismatch {
        expected: descriptor.kind_name().to_string(),
        actual: wire.kind(),
    }
}

/// Serialize a language-level value into its wire representation.
pub fn to_wire(value: &Value, descriptor: &TypeDescriptor) -> Result<WireValue, SerdesError> {
    if value.is_null() {
        return Ok(WireValue::Null);
    }
    match descriptor {
        TypeDescriptor::Scalar(kind) => scalar_to_wire(value, *kind),
        TypeDescriptor::List(element) => match value {
            Value::List(items) => Ok(WireValue::List(
                items
                    .iter()
                    .map(|item| to_wire(item, element))
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(mismatch(descriptor, other)),
        },
        TypeDescriptor::Set(element) => match value {
            Value::Set(items) => Ok(WireValue::Set(
                items
                    .iter()
                    .map(|item| to_wire(item, element))
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(mismatch(descriptor, other)),
        },
        TypeDescriptor::Map(key, value_descriptor) => match value {
            Value::Map(entries) => Ok(WireValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((to_wire(k, key)?, to_wire(v, value_descriptor)?)))
                    .collect::<Result<_, SerdesError>>()?,
            )),
            other => Err(mismatch(descriptor, other)),
        },
        TypeDescriptor::Udt { fields, .. } => match value {
            Value::Udt(field_values) => {
                let mut wire_fields = HashMap::with_capacity(fields.len());
                for (field_name, field_descriptor) in fields {
                    let field_value = field_values.get(field_name).unwrap_or(&Value::Null);
                    wire_fields.insert(field_name.clone(), to_wire(field_value, field_descriptor)?);
                }
                Ok(WireValue::Udt(wire_fields))
            }
            other => Err(mismatch(descriptor, other)),
        },
        TypeDescriptor::Enum { name, variants } => match value {
            Value::Enum(variant) => {
                if variants.iter().any(|v| v == variant) {
                    Ok(WireValue::Text(variant.clone()))
                } else {
                    Err(SerdesError::UnknownEnumValue {
                        enum_name: name.clone(),
                        value: variant.clone(),
                    })
                }
            }
            other => Err(mismatch(descriptor, other)),
        },
    }
}

/// Deserialize a wire value back into its language-level representation.
pub fn from_wire(wire: &WireValue, descriptor: &TypeDescriptor) -> Result<Value, SerdesError> {
    if matches!(wire, WireValue::Null) {
        return Ok(Value::Null);
    }
    match descriptor {
        TypeDescriptor::Scalar(kind) => scalar_from_wire(wire, *kind),
        TypeDescriptor::List(element) => match wire {
            WireValue::List(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| from_wire(item, element))
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(wire_mismatch(descriptor, other)),
        },
        TypeDescriptor::Set(element) => match wire {
            WireValue::Set(items) => Ok(Value::Set(
                items
                    .iter()
                    .map(|item| from_wire(item, element))
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(wire_mismatch(descriptor, other)),
        },
        TypeDescriptor::Map(key, value_descriptor) => match wire {
            WireValue::Map(entries) => Ok(Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((from_wire(k, key)?, from_wire(v, value_descriptor)?)))
                    .collect::<Result<_, SerdesError>>()?,
            )),
            other => Err(wire_mismatch(descriptor, other)),
        },
        TypeDescriptor::Udt { name, fields } => match wire {
            WireValue::Udt(wire_fields) => {
                let mut field_values = HashMap::with_capacity(fields.len());
                for (field_name, field_descriptor) in fields {
                    let wire_field =
                        wire_fields
                            .get(field_name)
                            .ok_or_else(|| SerdesError::MissingUdtField {
                                udt: name.clone(),
                                field: field_name.clone(),
                            })?;
                    field_values
                        .insert(field_name.clone(), from_wire(wire_field, field_descriptor)?);
                }
                Ok(Value::Udt(field_values))
            }
            other => Err(wire_mismatch(descriptor, other)),
        },
        TypeDescriptor::Enum { name, variants } => match wire {
            WireValue::Text(text) => {
                if variants.iter().any(|v| v == text) {
                    Ok(Value::Enum(text.clone()))
                } else {
                    Err(SerdesError::UnknownEnumValue {
                        enum_name: name.clone(),
                        value: text.clone(),
                    })
                }
            }
            other => Err(wire_mismatch(descriptor, other)),
        },
    }
}

fn scalar_to_wire(value: &Value, kind: ScalarKind) -> Result<WireValue, SerdesError> {
    let expected = |actual: &Value| SerdesError::TypeMismatch {
        expected: format!("{kind:?}").to_lowercase(),
        actual: actual.kind(),
    };
    match kind {
        ScalarKind::Boolean => match value {
            Value::Bool(b) => Ok(WireValue::Bool(*b)),
            other => Err(expected(other)),
        },
        ScalarKind::Int | ScalarKind::BigInt => match value {
            Value::Int(n) => Ok(WireValue::Int(*n)),
            other => Err(expected(other)),
        },
        ScalarKind::Double => match value {
            Value::Double(n) => Ok(WireValue::Double(*n)),
            other => Err(expected(other)),
        },
        ScalarKind::Text => match value {
            Value::Text(s) => Ok(WireValue::Text(s.clone())),
            other => Err(expected(other)),
        },
        ScalarKind::Uuid => match value {
            Value::Uuid(u) => Ok(WireValue::Uuid(*u)),
            other => Err(expected(other)),
        },
        ScalarKind::Timestamp => match value {
            Value::Timestamp(t) => Ok(WireValue::Timestamp(t.timestamp_millis())),
            other => Err(expected(other)),
        },
        ScalarKind::Decimal => match value {
            Value::Decimal(d) => Ok(WireValue::Decimal(*d)),
            other => Err(expected(other)),
        },
        ScalarKind::Blob => match value {
            Value::Blob(bytes) => Ok(WireValue::Blob(bytes.clone())),
            other => Err(expected(other)),
        },
        // Unrecognized scalar names pass through without conversion.
        ScalarKind::Opaque => match value {
            Value::Bool(b) => Ok(WireValue::Bool(*b)),
            Value::Int(n) => Ok(WireValue::Int(*n)),
            Value::Double(n) => Ok(WireValue::Double(*n)),
            Value::Text(s) => Ok(WireValue::Text(s.clone())),
            Value::Uuid(u) => Ok(WireValue::Uuid(*u)),
            Value::Decimal(d) => Ok(WireValue::Decimal(*d)),
            Value::Blob(bytes) => Ok(WireValue::Blob(bytes.clone())),
            other => Err(expected(other)),
        },
    }
}

fn scalar_from_wire(wire: &WireValue, kind: ScalarKind) -> Result<Value, SerdesError> {
    let expected = |actual: &WireValue| SerdesError::TypeMismatch {
        expected: format!("{kind:?}").to_lowercase(),
        actual: actual.kind(),
    };
    match kind {
        ScalarKind::Boolean => match wire {
            WireValue::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(expected(other)),
        },
        ScalarKind::Int | ScalarKind::BigInt => match wire {
            WireValue::Int(n) => Ok(Value::Int(*n)),
            other => Err(expected(other)),
        },
        ScalarKind::Double => match wire {
            WireValue::Double(n) => Ok(Value::Double(*n)),
            other => Err(expected(other)),
        },
        ScalarKind::Text => match wire {
            WireValue::Text(s) => Ok(Value::Text(s.clone())),
            other => Err(expected(other)),
        },
        ScalarKind::Uuid => match wire {
            WireValue::Uuid(u) => Ok(Value::Uuid(*u)),
            other => Err(expected(other)),
        },
        ScalarKind::Timestamp => match wire {
            WireValue::Timestamp(millis) => DateTime::from_timestamp_millis(*millis)
                .map(Value::Timestamp)
                .ok_or(SerdesError::TypeMismatch {
                    expected: "timestamp".to_string(),
                    actual: "out-of-range epoch millis",
                }),
            other => Err(expected(other)),
        },
        ScalarKind::Decimal => match wire {
            WireValue::Decimal(d) => Ok(Value::Decimal(*d)),
            other => Err(expected(other)),
        },
        ScalarKind::Blob => match wire {
            WireValue::Blob(bytes) => Ok(Value::Blob(bytes.clone())),
            other => Err(expected(other)),
        },
        ScalarKind::Opaque => match wire {
            WireValue::Bool(b) => Ok(Value::Bool(*b)),
            WireValue::Int(n) => Ok(Value::Int(*n)),
            WireValue::Double(n) => Ok(Value::Double(*n)),
            WireValue::Text(s) => Ok(Value::Text(s.clone())),
            WireValue::Uuid(u) => Ok(Value::Uuid(*u)),
            WireValue::Decimal(d) => Ok(Value::Decimal(*d)),
            WireValue::Blob(bytes) => Ok(Value::Blob(bytes.clone())),
            other => Err(expected(other)),
        },
    }
}
