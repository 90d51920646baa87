//! Entity shape modeling: signatures in, validated table models out.

pub mod column;
pub mod descriptor;
pub mod resolver;
pub mod signature;
pub mod table;

pub use self::column::{ClusteringOrder, ColumnModel};
pub use self::descriptor::{ScalarKind, TypeDescriptor};
pub use self::resolver::TypeResolver;
pub use self::signature::{ContainerContract, EnumShape, TypeRegistry, TypeSignature, UdtShape};
pub use self::table::{FieldDef, TableModel};
