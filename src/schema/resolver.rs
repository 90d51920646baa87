//! Recursive classification of raw type signatures.

use crate::error::TypeResolutionError;
use crate::schema::descriptor::{ScalarKind, TypeDescriptor};
use crate::schema::signature::{ContainerContract, TypeRegistry, TypeSignature};

const CANONICAL_LIST: &str = "list";
const CANONICAL_SET: &str = "set";
const CANONICAL_MAP: &str = "map";

/// Classifies a field's declared type signature into a [`TypeDescriptor`].
///
/// Classification is a pure function of the signature and the registry; two
/// calls over the same input always yield structurally equal descriptors.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a signature into a descriptor.
    ///
    /// Order of classification: registered user-defined types win over every
    /// other interpretation, then container contracts, then enum bases, and
    /// anything left is a scalar.
    pub fn resolve(&self, signature: &TypeSignature) -> Result<TypeDescriptor, TypeResolutionError> {
        self.resolve_inner(signature, &mut Vec::new())
    }

    fn resolve_inner(
        &self,
        signature: &TypeSignature,
        in_progress: &mut Vec<String>,
    ) -> Result<TypeDescriptor, TypeResolutionError> {
        let name = signature.canonical_name.as_str();

        // Registry lookup first: a name that is both enum-like and a
        // registered UDT classifies as UDT.
        if let Some(shape) = self.registry.udt(name) {
            if in_progress.iter().any(|seen| seen == name) {
                let mut path = in_progress.clone();
                path.push(name.to_string());
                return Err(TypeResolutionError::CyclicReference { path });
            }
            in_progress.push(name.to_string());
            let mut fields = Vec::with_capacity(shape.fields.len());
            for (field_name, field_signature) in &shape.fields {
                fields.push((
                    field_name.clone(),
                    self.resolve_inner(field_signature, in_progress)?,
                ));
            }
            in_progress.pop();
            return Ok(TypeDescriptor::Udt {
                name: name.to_string(),
                fields,
            });
        }

        if signature.udt_reference {
            return Err(TypeResolutionError::UnknownUdt(name.to_string()));
        }

        if signature.contracts.contains(&ContainerContract::List) {
            self.validate_container(signature, CANONICAL_LIST, 1)?;
            let element = self.resolve_inner(&signature.arguments[0], in_progress)?;
            return Ok(TypeDescriptor::List(Box::new(element)));
        }

        if signature.contracts.contains(&ContainerContract::Set) {
            self.validate_container(signature, CANONICAL_SET, 1)?;
            let element = self.resolve_inner(&signature.arguments[0], in_progress)?;
            return Ok(TypeDescriptor::Set(Box::new(element)));
        }

        if signature.contracts.contains(&ContainerContract::Map) {
            self.validate_container(signature, CANONICAL_MAP, 2)?;
            let key = self.resolve_inner(&signature.arguments[0], in_progress)?;
            let value = self.resolve_inner(&signature.arguments[1], in_progress)?;
            return Ok(TypeDescriptor::Map(Box::new(key), Box::new(value)));
        }

        if signature.enum_base {
            return match self.registry.enum_shape(name) {
                Some(shape) => Ok(TypeDescriptor::Enum {
                    name: name.to_string(),
                    variants: shape.variants.clone(),
                }),
                None => Err(TypeResolutionError::UnknownEnum(name.to_string())),
            };
        }

        Ok(TypeDescriptor::Scalar(ScalarKind::from_canonical(name)))
    }

    fn validate_container(
        &self,
        signature: &TypeSignature,
        supported: &'static str,
        expected_arity: usize,
    ) -> Result<(), TypeResolutionError> {
        if signature.canonical_name != supported {
            return Err(TypeResolutionError::UnsupportedContainer {
                found: signature.canonical_name.clone(),
                supported,
            });
        }
        if signature.arguments.len() != expected_arity {
            return Err(TypeResolutionError::ArityMismatch {
                name: signature.canonical_name.clone(),
                expected: expected_arity,
                actual: signature.arguments.len(),
            });
        }
        Ok(())
    }
}
