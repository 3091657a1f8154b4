//! Generator extensions carried in descriptor option blocks.
//!
//! Each struct mirrors one `extend google.protobuf.*Options` block of
//! `struct_transformer/options.proto`, with the extension numbers as field
//! tags. Decoding the raw option bytes with these types picks up the
//! extensions and skips every standard option.

use crate::descriptor::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use crate::error::{TransformError, TransformResult};
use prost::Message;

/// Extensions of `google.protobuf.FileOptions`
#[derive(Clone, PartialEq, Message)]
pub struct FileOptions {
    /// Path of the Rust source declaring the native structures
    #[prost(string, optional, tag = "52001")]
    pub rust_models_file_path: Option<String>,
}

/// Extensions of `google.protobuf.MessageOptions`
#[derive(Clone, PartialEq, Message)]
pub struct MessageOptions {
    /// Name of the native structure the message converts to
    #[prost(string, optional, tag = "52101")]
    pub rust_struct: Option<String>,

    /// Full path of the native structure, overriding `<models_module>::<rust_struct>`
    #[prost(string, optional, tag = "52102")]
    pub rust_full_name: Option<String>,
}

/// Extensions of `google.protobuf.FieldOptions`
#[derive(Clone, PartialEq, Message)]
pub struct FieldOptions {
    /// Native field name when it differs from the wire field name
    #[prost(string, optional, tag = "52201")]
    pub rust_name: Option<String>,

    #[prost(bool, optional, tag = "52202")]
    pub skip: Option<bool>,

    /// Helper converting the wire value to the native value
    #[prost(string, optional, tag = "52203")]
    pub to_native: Option<String>,

    /// Helper converting the native value to the wire value
    #[prost(string, optional, tag = "52204")]
    pub to_wire: Option<String>,

    /// Free-form text appended to custom transformer calls
    #[prost(string, optional, tag = "52205")]
    pub opts: Option<String>,
}

fn decode<T: Message + Default>(
    bytes: Option<&Vec<u8>>,
    kind: &'static str,
    element: impl FnOnce() -> String,
) -> TransformResult<T> {
    match bytes {
        None => Ok(T::default()),
        Some(bytes) => T::decode(bytes.as_slice()).map_err(|source| {
            TransformError::MalformedOptions {
                kind,
                element: element(),
                source,
            }
        }),
    }
}

pub fn file_options(file: &FileDescriptorProto) -> TransformResult<FileOptions> {
    decode(file.options.as_ref(), "file", || file.name().to_string())
}

/// `full_name` only labels the error
pub fn message_options(msg: &DescriptorProto, full_name: &str) -> TransformResult<MessageOptions> {
    decode(msg.options.as_ref(), "message", || full_name.to_string())
}

pub fn field_options(
    field: &FieldDescriptorProto,
    message_name: &str,
) -> TransformResult<FieldOptions> {
    decode(field.options.as_ref(), "field", || {
        format!("{message_name}.{}", field.name())
    })
}

#[cfg(test)]
#[path = "options/options_tests.rs"]
mod options_tests;
