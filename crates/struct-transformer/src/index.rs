//! Index of generation options for every message in a batch.

use crate::descriptor::field_descriptor_proto::Type;
use crate::descriptor::{DescriptorProto, FileDescriptorProto};
use crate::error::TransformResult;
use crate::options::message_options;
use std::collections::HashMap;

/// Generation options of one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOption {
    target: String,
    full: String,
    oneof_decl: String,
}

impl MessageOption {
    pub fn new(
        target: impl Into<String>,
        full: impl Into<String>,
        oneof_decl: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            full: full.into(),
            oneof_decl: oneof_decl.into(),
        }
    }

    /// Native structure name; empty when the message is not generated
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Explicit full path of the native structure, or empty
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Name of the recognized int64/string union group, or empty
    pub fn oneof_decl(&self) -> &str {
        &self.oneof_decl
    }

    pub fn is_eligible(&self) -> bool {
        !self.target.is_empty()
    }
}

/// Qualified message name to [`MessageOption`].
///
/// Every message of the batch has an entry, so a missing key means the
/// message was never declared, not that it opted out.
#[derive(Debug, Clone, Default)]
pub struct MessageOptionList {
    entries: HashMap<String, MessageOption>,
}

impl MessageOptionList {
    /// Look up by qualified name. A leading `.`, as in field type references, is accepted.
    pub fn get(&self, name: &str) -> Option<&MessageOption> {
        self.entries.get(name.strip_prefix('.').unwrap_or(name))
    }

    pub fn insert(&mut self, name: impl Into<String>, option: MessageOption) {
        self.entries.insert(name.into(), option);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MessageOption)> {
        self.entries.iter()
    }
}

/// Build the option index for every message of every file.
///
/// Fails only when an option block cannot be decoded.
pub fn build_index(files: &[FileDescriptorProto]) -> TransformResult<MessageOptionList> {
    let mut list = MessageOptionList::default();

    for file in files {
        for (full_name, msg) in file.messages() {
            let opts = message_options(msg, &full_name)?;
            let option = MessageOption {
                target: opts.rust_struct.unwrap_or_default(),
                full: opts.rust_full_name.unwrap_or_default(),
                oneof_decl: find_int64_string_union(msg).unwrap_or_default(),
            };

            tracing::trace!(message = %full_name, target = option.target(), "indexed message");
            list.insert(full_name, option);
        }
    }

    tracing::debug!(messages = list.len(), "built message option index");
    Ok(list)
}

/// Name of the first oneof whose members are exactly one 64-bit integer and one string.
pub fn find_int64_string_union(msg: &DescriptorProto) -> Option<String> {
    msg.oneof_decl
        .iter()
        .enumerate()
        .find(|(index, _)| is_int64_string_pair(msg, *index))
        .map(|(_, decl)| decl.name().to_string())
}

fn is_int64_string_pair(msg: &DescriptorProto, index: usize) -> bool {
    let members = msg.oneof_members(index);
    if members.len() != 2 {
        return false;
    }

    let ints = members
        .iter()
        .filter(|f| f.kind().is_some_and(Type::is_int64))
        .count();
    let strings = members
        .iter()
        .filter(|f| f.kind() == Some(Type::String))
        .count();

    ints == 1 && strings == 1
}
