//! struct-transformer - descriptor-to-mapping resolution engine
//!
//! Decides how prost-generated wire structs map onto hand-written native
//! structs, field by field, and which schema files a requested file needs
//! generated alongside it:
//! - [`build_index`] collects the generation options of every message in a batch
//! - [`resolve_field`] picks the conversion strategy of a single field
//! - [`resolve_message`] resolves a whole message into an ordered [`Field`] list
//! - [`resolve_closure`] lists the transitive dependencies of a file
//!
//! The native structures are described by a [`StructureCatalog`], usually
//! parsed from the models source with [`StructureCatalog::parse_file`].

pub mod catalog;
pub mod closure;
pub mod descriptor;
mod error;
pub mod index;
pub mod message;
pub mod naming;
pub mod options;
pub mod resolve;

#[cfg(test)]
mod fixtures;

pub use catalog::{NativeField, NativeStruct, NativeType, StructureCatalog};
pub use closure::resolve_closure;
pub use descriptor::{CodeGeneratorRequest, DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
pub use error::{ErrorClass, TransformError, TransformResult};
pub use index::{MessageOption, MessageOptionList, build_index};
pub use message::{FileContext, ResolvedMessage, prefix_fields, resolve_message};
pub use resolve::{Field, FieldResolution, MessageContext, ResolveConfig, resolve_field};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Field, FileContext, MessageOptionList, ResolveConfig, ResolvedMessage, StructureCatalog,
        TransformError, TransformResult, build_index, prefix_fields, resolve_closure,
        resolve_message,
    };
}
