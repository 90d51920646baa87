//! Raw type signatures and the registry of user-defined shapes.
//!
//! A [`TypeSignature`] is the input the host registration step supplies for
//! each declared field: the erased canonical name, generic arguments, declared
//! container contracts and base-type markers. It is deliberately dumb — all
//! classification happens in [`super::TypeResolver`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Container contract a signature's erased type declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerContract {
    List,
    Set,
    Map,
}

/// Raw (unresolved) type signature of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSignature {
    /// Erased canonical name, generics stripped.
    pub canonical_name: String,
    /// Generic type arguments, outermost first.
    #[serde(default)]
    pub arguments: Vec<TypeSignature>,
    /// Container contracts the erased type declares.
    #[serde(default)]
    pub contracts: Vec<ContainerContract>,
    /// Whether the erased type derives from the canonical enum base.
    #[serde(default)]
    pub enum_base: bool,
    /// Whether the host marked this as a reference to a user-defined type.
    #[serde(default)]
    pub udt_reference: bool,
}

impl TypeSignature {
    /// Raw constructor; prefer the shape-specific helpers below.
    pub fn new(canonical_name: impl Into<String>, arguments: Vec<TypeSignature>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            arguments,
            contracts: Vec::new(),
            enum_base: false,
            udt_reference: false,
        }
    }

    /// A plain scalar signature, e.g. `scalar("uuid")`.
    pub fn scalar(canonical_name: impl Into<String>) -> Self {
        Self::new(canonical_name, Vec::new())
    }

    /// A `list<element>` signature.
    pub fn list_of(element: TypeSignature) -> Self {
        Self {
            contracts: vec![ContainerContract::List],
            ..Self::new("list", vec![element])
        }
    }

    /// A `set<element>` signature.
    pub fn set_of(element: TypeSignature) -> Self {
        Self {
            contracts: vec![ContainerContract::Set],
            ..Self::new("set", vec![element])
        }
    }

    /// A `map<key, value>` signature.
    pub fn map_of(key: TypeSignature, value: TypeSignature) -> Self {
        Self {
            contracts: vec![ContainerContract::Map],
            ..Self::new("map", vec![key, value])
        }
    }

    /// A reference to a registered user-defined type.
    pub fn udt(name: impl Into<String>) -> Self {
        Self {
            udt_reference: true,
            ..Self::new(name, Vec::new())
        }
    }

    /// A reference to a registered enum type.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            enum_base: true,
            ..Self::new(name, Vec::new())
        }
    }

    /// Attach a container contract, for custom-container signatures.
    pub fn with_contract(mut self, contract: ContainerContract) -> Self {
        self.contracts.push(contract);
        self
    }
}

/// Declared shape of a user-defined type: ordered field name/signature pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdtShape {
    pub name: String,
    pub fields: Vec<(String, TypeSignature)>,
}

impl UdtShape {
    pub fn new(name: impl Into<String>, fields: Vec<(String, TypeSignature)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Declared shape of an enum type: its variant names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumShape {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumShape {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Closed table of user-defined shapes, populated by an explicit registration
/// step at startup. Replaces on-demand reflection: resolution is a pure
/// function of (signature, registry).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    udts: HashMap<String, UdtShape>,
    enums: HashMap<String, EnumShape>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-defined type shape.
    pub fn register_udt(&mut self, shape: UdtShape) {
        self.udts.insert(shape.name.clone(), shape);
    }

    /// Register an enum shape.
    pub fn register_enum(&mut self, shape: EnumShape) {
        self.enums.insert(shape.name.clone(), shape);
    }

    /// Whether a canonical name is a registered user-defined type.
    pub fn is_udt(&self, canonical_name: &str) -> bool {
        self.udts.contains_key(canonical_name)
    }

    pub fn udt(&self, canonical_name: &str) -> Option<&UdtShape> {
        self.udts.get(canonical_name)
    }

    pub fn enum_shape(&self, canonical_name: &str) -> Option<&EnumShape> {
        self.enums.get(canonical_name)
    }

    /// Load a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
