//! The subset of `descriptor.proto` and `plugin.proto` the generator reads.
//!
//! Option blocks are kept as raw bytes instead of typed messages. Custom
//! extensions live in the unknown-field range of `google.protobuf.*Options`,
//! and a typed decode would silently drop them. [`crate::options`] decodes
//! the bytes on demand.

use prost::Message;

/// The request protoc writes to a plugin's stdin.
#[derive(Clone, PartialEq, Message)]
pub struct CodeGeneratorRequest {
    /// Files explicitly listed on the protoc command line
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,

    /// Comma-separated plugin parameter
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,

    /// Every file in `file_to_generate` and everything they import, in topological order
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// Describes a complete .proto file.
#[derive(Clone, PartialEq, Message)]
pub struct FileDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,

    /// Names of files imported by this file
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,

    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,

    /// Encoded `google.protobuf.FileOptions`
    #[prost(bytes = "vec", optional, tag = "8")]
    pub options: Option<Vec<u8>>,

    /// "proto2", "proto3" or "editions"; empty means proto2
    #[prost(string, optional, tag = "12")]
    pub syntax: Option<String>,
}

/// Describes a message type.
#[derive(Clone, PartialEq, Message)]
pub struct DescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(message, repeated, tag = "2")]
    pub field: Vec<FieldDescriptorProto>,

    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<DescriptorProto>,

    /// Encoded `google.protobuf.MessageOptions`
    #[prost(bytes = "vec", optional, tag = "7")]
    pub options: Option<Vec<u8>>,

    #[prost(message, repeated, tag = "8")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
}

/// Describes a field within a message.
#[derive(Clone, PartialEq, Message)]
pub struct FieldDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(int32, optional, tag = "3")]
    pub number: Option<i32>,

    #[prost(enumeration = "field_descriptor_proto::Label", optional, tag = "4")]
    pub label: Option<i32>,

    #[prost(enumeration = "field_descriptor_proto::Type", optional, tag = "5")]
    pub r#type: Option<i32>,

    /// For message and enum types, the fully-qualified name with a leading dot
    #[prost(string, optional, tag = "6")]
    pub type_name: Option<String>,

    /// Encoded `google.protobuf.FieldOptions`
    #[prost(bytes = "vec", optional, tag = "8")]
    pub options: Option<Vec<u8>>,

    /// Index into the containing message's `oneof_decl`
    #[prost(int32, optional, tag = "9")]
    pub oneof_index: Option<i32>,

    #[prost(string, optional, tag = "10")]
    pub json_name: Option<String>,

    /// Set for proto3 `optional` fields, which live in a synthetic oneof
    #[prost(bool, optional, tag = "17")]
    pub proto3_optional: Option<bool>,
}

/// Describes a oneof.
#[derive(Clone, PartialEq, Message)]
pub struct OneofDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
}

pub mod field_descriptor_proto {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Double = 1,
        Float = 2,
        Int64 = 3,
        Uint64 = 4,
        Int32 = 5,
        Fixed64 = 6,
        Fixed32 = 7,
        Bool = 8,
        String = 9,
        Group = 10,
        Message = 11,
        Bytes = 12,
        Uint32 = 13,
        Enum = 14,
        Sfixed32 = 15,
        Sfixed64 = 16,
        Sint32 = 17,
        Sint64 = 18,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Label {
        Optional = 1,
        Required = 2,
        Repeated = 3,
    }

    impl Type {
        /// The lowercase keyword used for this type in .proto sources
        pub fn keyword(self) -> &'static str {
            match self {
                Type::Double => "double",
                Type::Float => "float",
                Type::Int64 => "int64",
                Type::Uint64 => "uint64",
                Type::Int32 => "int32",
                Type::Fixed64 => "fixed64",
                Type::Fixed32 => "fixed32",
                Type::Bool => "bool",
                Type::String => "string",
                Type::Group => "group",
                Type::Message => "message",
                Type::Bytes => "bytes",
                Type::Uint32 => "uint32",
                Type::Enum => "enum",
                Type::Sfixed32 => "sfixed32",
                Type::Sfixed64 => "sfixed64",
                Type::Sint32 => "sint32",
                Type::Sint64 => "sint64",
            }
        }

        pub fn is_int64(self) -> bool {
            matches!(self, Type::Int64 | Type::Sint64 | Type::Sfixed64)
        }
    }
}

use field_descriptor_proto::{Label, Type};

/// Join a package and a message path into a qualified name.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

impl FileDescriptorProto {
    pub fn is_proto3(&self) -> bool {
        self.syntax() == "proto3"
    }

    /// Every message declared in the file, nested ones included, with its
    /// qualified name. Parents precede their nested types.
    pub fn messages(&self) -> Vec<(String, &DescriptorProto)> {
        let mut out = Vec::new();
        for msg in &self.message_type {
            collect_messages(self.package(), msg, &mut out);
        }
        out
    }
}

fn collect_messages<'a>(
    scope: &str,
    msg: &'a DescriptorProto,
    out: &mut Vec<(String, &'a DescriptorProto)>,
) {
    let full_name = qualify(scope, msg.name());
    out.push((full_name.clone(), msg));
    for nested in &msg.nested_type {
        collect_messages(&full_name, nested, out);
    }
}

impl DescriptorProto {
    /// Names of the declared oneofs, in declaration order
    pub fn oneof_names(&self) -> Vec<String> {
        self.oneof_decl.iter().map(|o| o.name().to_string()).collect()
    }

    /// Fields that belong to the oneof at `index`, excluding synthetic proto3-optional members
    pub fn oneof_members(&self, index: usize) -> Vec<&FieldDescriptorProto> {
        self.field
            .iter()
            .filter(|f| f.real_oneof_index() == Some(index))
            .collect()
    }
}

impl FieldDescriptorProto {
    /// The decoded field type, or `None` when unset or unknown
    pub fn kind(&self) -> Option<Type> {
        self.r#type.and_then(|v| Type::try_from(v).ok())
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Some(Label::Repeated as i32)
    }

    pub fn is_explicit_optional(&self) -> bool {
        self.label == Some(Label::Optional as i32)
    }

    /// The oneof this field belongs to, ignoring the synthetic oneof of a proto3 `optional` field
    pub fn real_oneof_index(&self) -> Option<usize> {
        if self.proto3_optional() {
            return None;
        }
        self.oneof_index.and_then(|i| usize::try_from(i).ok())
    }

    /// The wire type tag: the scalar keyword, or the referenced type name
    pub fn type_tag(&self) -> String {
        match self.kind() {
            Some(Type::Message | Type::Enum | Type::Group) if !self.type_name().is_empty() => {
                self.type_name().to_string()
            }
            Some(t) => t.keyword().to_string(),
            None => "unknown".to_string(),
        }
    }
}
