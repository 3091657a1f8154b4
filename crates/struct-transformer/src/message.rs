//! Resolution of a whole message into an ordered field list.

use crate::catalog::StructureCatalog;
use crate::descriptor::{DescriptorProto, FileDescriptorProto};
use crate::error::{TransformError, TransformResult};
use crate::index::MessageOptionList;
use crate::resolve::{Field, FieldResolution, MessageContext, ResolveConfig, resolve_field};

/// Batch-wide inputs shared by every message of one file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub file: &'a FileDescriptorProto,
    pub options: &'a MessageOptionList,
    pub catalog: &'a StructureCatalog,
    pub config: &'a ResolveConfig,
}

/// A message ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    /// Qualified wire name (`pkg.Outer.Inner`).
    pub full_name: String,

    /// Native structure name.
    pub target: String,

    /// Explicit native path override, or empty.
    pub full: String,

    /// Resolved fields in declaration order.
    pub fields: Vec<Field>,

    /// Notes about fields that could not be mapped.
    pub comments: Vec<String>,
}

/// Resolve every field of `message`.
///
/// A message without a target structure fails with
/// [`TransformError::NotEligible`], listing its oneofs so the caller can
/// explain the skip. Recoverable field errors become comments; the field is
/// left out and the remaining fields keep their declaration order.
pub fn resolve_message(
    ctx: &FileContext<'_>,
    message: &DescriptorProto,
    full_name: &str,
) -> TransformResult<ResolvedMessage> {
    let option = match ctx.options.get(full_name) {
        Some(option) if option.is_eligible() => option,
        _ => {
            return Err(TransformError::NotEligible {
                message: full_name.to_string(),
                oneofs: message.oneof_names(),
            });
        }
    };

    let native = ctx
        .catalog
        .lookup(option.target())
        .ok_or_else(|| TransformError::UnknownStructure {
            message: full_name.to_string(),
            structure: option.target().to_string(),
        })?;

    let mctx = MessageContext {
        message,
        full_name,
        option,
        options: ctx.options,
        native,
        proto3: ctx.file.is_proto3(),
        config: ctx.config,
    };

    let mut fields = Vec::new();
    let mut comments = Vec::new();

    for field in &message.field {
        match resolve_field(&mctx, field) {
            Ok(FieldResolution::Mapped(resolved)) => fields.push(resolved),
            Ok(FieldResolution::Skipped) => {}
            Err(e) if e.is_recoverable() => {
                tracing::warn!(message = full_name, "{e}");
                comments.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        message = full_name,
        target = option.target(),
        fields = fields.len(),
        "resolved message"
    );

    Ok(ResolvedMessage {
        full_name: full_name.to_string(),
        target: option.target().to_string(),
        full: option.full().to_string(),
        fields,
        comments,
    })
}

/// Qualify the conversion functions of helper-backed fields with `prefix`.
///
/// Fields whose functions are generated alongside (nested messages) and
/// direct assignments are left alone, as is everything when `prefix` is empty.
pub fn prefix_fields(fields: &mut [Field], prefix: &str) {
    if prefix.is_empty() {
        return;
    }

    for field in fields.iter_mut().filter(|f| f.use_package) {
        field.proto_to_native = format!("{prefix}::{}", field.proto_to_native);
        field.native_to_proto = format!("{prefix}::{}", field.native_to_proto);
    }
}
