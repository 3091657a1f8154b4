//! Descriptor builders shared by the unit tests.

use crate::descriptor::field_descriptor_proto::{Label, Type};
use crate::descriptor::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, OneofDescriptorProto,
};
use crate::options::{FieldOptions, FileOptions, MessageOptions};
use prost::Message;

pub(crate) fn scalar(name: &str, ty: Type, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub(crate) fn message_field(name: &str, type_name: &str, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, Type::Message, number)
    }
}

pub(crate) fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

pub(crate) fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

pub(crate) fn with_field_options(
    mut field: FieldDescriptorProto,
    opts: FieldOptions,
) -> FieldDescriptorProto {
    field.options = Some(opts.encode_to_vec());
    field
}

pub(crate) fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub(crate) fn targeting(mut msg: DescriptorProto, target: &str) -> DescriptorProto {
    msg.options = Some(
        MessageOptions {
            rust_struct: Some(target.to_string()),
            rust_full_name: None,
        }
        .encode_to_vec(),
    );
    msg
}

pub(crate) fn with_oneofs(mut msg: DescriptorProto, names: &[&str]) -> DescriptorProto {
    msg.oneof_decl = names
        .iter()
        .map(|n| OneofDescriptorProto {
            name: Some(n.to_string()),
        })
        .collect();
    msg
}

pub(crate) fn file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub(crate) fn importing(mut file: FileDescriptorProto, deps: &[&str]) -> FileDescriptorProto {
    file.dependency = deps.iter().map(|d| d.to_string()).collect();
    file
}

pub(crate) fn with_models(mut file: FileDescriptorProto, path: &str) -> FileDescriptorProto {
    file.options = Some(
        FileOptions {
            rust_models_file_path: Some(path.to_string()),
        }
        .encode_to_vec(),
    );
    file
}

/// `rust_struct` (52101) encoded with the varint wire type instead of length-delimited
pub(crate) fn malformed_message_options() -> Vec<u8> {
    vec![0xA8, 0xB8, 0x19, 0x05]
}
