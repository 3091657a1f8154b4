//! Per-field conversion strategy.
//!
//! [`resolve_field`] decides how one wire field maps onto the native
//! structure. Strategies are tried in a fixed order:
//!
//! 1. the message's recognized int64/string union, collapsed into one
//!    native `String` field (or the custom pair on its first member)
//! 2. custom transformer pair from the field options
//! 3. nested message with its own generated transformers
//! 4. scalar with direct assignment when the native type matches
//!
//! Anything left over is an [`TransformError::UnsupportedField`], which the
//! caller turns into a comment.

use crate::catalog::{NativeField, NativeStruct, NativeType};
use crate::descriptor::field_descriptor_proto::Type;
use crate::descriptor::{DescriptorProto, FieldDescriptorProto};
use crate::error::{TransformError, TransformResult};
use crate::index::{MessageOption, MessageOptionList};
use crate::naming::{pb_to_fn, to_pb_fn, to_snake_case};
use crate::options::field_options;

/// Helper converting a recognized union to its native string.
///
/// The name is shared by every union in a batch unless
/// [`ResolveConfig::scoped_union_names`] is set.
pub const UNION_TO_NATIVE: &str = "pb_oneof_to_string";

/// Helper converting a native string back into the union.
pub const UNION_TO_WIRE: &str = "string_to_pb_oneof";

/// Knobs that change resolution output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Qualify union helper names with the message and oneof name
    pub scoped_union_names: bool,
}

/// One resolved native/wire field pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Native field name.
    pub name: String,

    /// Wire field name.
    pub proto_name: String,

    /// Wire type tag (`int64`, `.pkg.Message`, ...).
    pub proto_type: String,

    /// Wire to native conversion function; empty for direct assignment.
    pub proto_to_native: String,

    /// Native to wire conversion function; empty for direct assignment.
    pub native_to_proto: String,

    pub native_is_pointer: bool,
    pub proto_is_pointer: bool,
    pub repeated: bool,

    /// The conversion functions live in the helper module.
    pub use_package: bool,

    /// Union group this field collapses, if any.
    pub oneof_decl: String,

    /// Extra arguments for custom transformers.
    pub opts: String,
}

impl Field {
    /// Whether both directions are plain assignments
    pub fn is_direct(&self) -> bool {
        self.proto_to_native.is_empty() && self.native_to_proto.is_empty()
    }
}

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResolution {
    Mapped(Field),
    /// The field produces no output of its own
    Skipped,
}

/// Everything the resolver needs to know about the enclosing message.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub message: &'a DescriptorProto,
    pub full_name: &'a str,
    pub option: &'a MessageOption,
    pub options: &'a MessageOptionList,
    pub native: &'a NativeStruct,
    pub proto3: bool,
    pub config: &'a ResolveConfig,
}

/// Resolve the conversion strategy for `field`.
pub fn resolve_field(
    ctx: &MessageContext<'_>,
    field: &FieldDescriptorProto,
) -> TransformResult<FieldResolution> {
    let field_id = format!("{}.{}", ctx.full_name, field.name());
    let fopts = field_options(field, ctx.full_name)?;

    if fopts.skip() {
        tracing::debug!(field = %field_id, "field skipped by option");
        return Ok(FieldResolution::Skipped);
    }

    let native_name = non_empty(fopts.rust_name.as_deref())
        .unwrap_or(field.name())
        .to_string();
    let opts = fopts.opts.clone().unwrap_or_default();

    let custom = match (
        non_empty(fopts.to_native.as_deref()),
        non_empty(fopts.to_wire.as_deref()),
    ) {
        (Some(to_native), Some(to_wire)) => Some((to_native, to_wire)),
        (None, None) => None,
        _ => return Err(TransformError::IncompleteCustomTransformer { field: field_id }),
    };

    if let Some(index) = field.real_oneof_index() {
        let group = ctx
            .message
            .oneof_decl
            .get(index)
            .map(|o| o.name())
            .unwrap_or_default();

        if !group.is_empty() && group == ctx.option.oneof_decl() {
            let member = UnionMember {
                index,
                group,
                rust_name: fopts.rust_name.as_deref(),
                custom,
            };
            return resolve_union(ctx, field, member, &field_id, opts);
        }

        if custom.is_none() {
            return Err(TransformError::unsupported(
                field_id,
                format!(
                    "oneof {group} member of type {} has no mapping; use to_native/to_wire",
                    field.type_tag()
                ),
            ));
        }
    }

    if let Some((to_native, to_wire)) = custom {
        let native = native_field(ctx, &field_id, &native_name)?;
        return Ok(FieldResolution::Mapped(Field {
            name: native_name,
            proto_name: field.name().to_string(),
            proto_type: field.type_tag(),
            proto_to_native: to_native.to_string(),
            native_to_proto: to_wire.to_string(),
            native_is_pointer: native.optional,
            proto_is_pointer: wire_is_pointer(ctx, field),
            repeated: field.is_repeated(),
            use_package: true,
            oneof_decl: String::new(),
            opts,
        }));
    }

    match field.kind() {
        Some(Type::Message) => resolve_nested(ctx, field, &field_id, native_name, opts),
        Some(ty) => match native_scalar(ty) {
            Some(expected) => {
                let native = native_field(ctx, &field_id, &native_name)?;
                if !assignable(&expected, native, field.is_repeated()) {
                    return Err(TransformError::unsupported(
                        field_id,
                        format!(
                            "wire {} does not map to native {:?}",
                            ty.keyword(),
                            native.ty
                        ),
                    ));
                }
                Ok(FieldResolution::Mapped(Field {
                    name: native_name,
                    proto_name: field.name().to_string(),
                    proto_type: field.type_tag(),
                    native_is_pointer: native.optional,
                    proto_is_pointer: wire_is_pointer(ctx, field),
                    repeated: field.is_repeated(),
                    opts,
                    ..Default::default()
                }))
            }
            None => Err(TransformError::unsupported(
                field_id,
                format!("type {} is not supported", ty.keyword()),
            )),
        },
        None => Err(TransformError::unsupported(field_id, "field type is not set")),
    }
}

/// Whether a wire scalar of native type `expected` assigns to `native` as is.
/// Repeated fields compare against the element type of a `Vec`.
fn assignable(expected: &NativeType, native: &NativeField, repeated: bool) -> bool {
    match (&native.ty, repeated) {
        (NativeType::Vec(element), true) => **element == *expected,
        (ty, false) => ty == expected,
        (_, true) => false,
    }
}

/// The native type a wire scalar assigns to directly. `None` for non-scalars.
pub fn native_scalar(ty: Type) -> Option<NativeType> {
    let native = match ty {
        Type::Double => NativeType::F64,
        Type::Float => NativeType::F32,
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => NativeType::I64,
        Type::Uint64 | Type::Fixed64 => NativeType::U64,
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => NativeType::I32,
        Type::Uint32 | Type::Fixed32 => NativeType::U32,
        Type::Bool => NativeType::Bool,
        Type::String => NativeType::String,
        Type::Bytes => NativeType::Bytes,
        Type::Enum => NativeType::I32,
        Type::Message | Type::Group => return None,
    };
    Some(native)
}

/// Names of the union helper pair for the given message and oneof.
pub fn union_fns(config: &ResolveConfig, message: &str, group: &str) -> (String, String) {
    if config.scoped_union_names {
        let scope = format!("{}_{}", to_snake_case(message), group);
        (
            format!("pb_{scope}_to_string"),
            format!("string_to_pb_{scope}"),
        )
    } else {
        (UNION_TO_NATIVE.to_string(), UNION_TO_WIRE.to_string())
    }
}

/// A field of the message's recognized int64/string union.
struct UnionMember<'a> {
    index: usize,
    group: &'a str,
    rust_name: Option<&'a str>,
    custom: Option<(&'a str, &'a str)>,
}

fn resolve_union(
    ctx: &MessageContext<'_>,
    field: &FieldDescriptorProto,
    member: UnionMember<'_>,
    field_id: &str,
    opts: String,
) -> TransformResult<FieldResolution> {
    let group = member.group;

    // only the first member carries the collapsed field
    let first = ctx.message.oneof_members(member.index).into_iter().next();
    if let Some(first) = first.filter(|f| f.name() != field.name()) {
        if member.custom.is_some() {
            return Err(TransformError::unsupported(
                field_id,
                format!(
                    "custom transformers for oneof {group} belong on its first member {}",
                    first.name()
                ),
            ));
        }
        return Ok(FieldResolution::Skipped);
    }

    let native_name = non_empty(member.rust_name).unwrap_or(group).to_string();
    let native = native_field(ctx, field_id, &native_name)?;

    let (to_native, to_wire) = match member.custom {
        Some((to_native, to_wire)) => (to_native.to_string(), to_wire.to_string()),
        None => {
            if native.ty != NativeType::String {
                return Err(TransformError::unsupported(
                    field_id,
                    format!(
                        "oneof {group} collapses to String, not native {:?}",
                        native.ty
                    ),
                ));
            }
            union_fns(ctx.config, ctx.message.name(), group)
        }
    };

    Ok(FieldResolution::Mapped(Field {
        name: native_name,
        proto_name: group.to_string(),
        proto_type: "oneof".to_string(),
        proto_to_native: to_native,
        native_to_proto: to_wire,
        native_is_pointer: native.optional,
        proto_is_pointer: true,
        repeated: false,
        use_package: true,
        oneof_decl: group.to_string(),
        opts,
    }))
}

fn resolve_nested(
    ctx: &MessageContext<'_>,
    field: &FieldDescriptorProto,
    field_id: &str,
    native_name: String,
    opts: String,
) -> TransformResult<FieldResolution> {
    let type_name = field.type_name();
    let nested = ctx
        .options
        .get(type_name)
        .ok_or_else(|| TransformError::UnknownMessageType {
            message: ctx.full_name.to_string(),
            field: field.name().to_string(),
            type_name: type_name.to_string(),
        })?;

    if !nested.is_eligible() {
        return Err(TransformError::unsupported(
            field_id,
            format!(
                "message {} has no rust_struct option",
                type_name.trim_start_matches('.')
            ),
        ));
    }

    let native = native_field(ctx, field_id, &native_name)?;

    Ok(FieldResolution::Mapped(Field {
        name: native_name,
        proto_name: field.name().to_string(),
        proto_type: field.type_tag(),
        proto_to_native: pb_to_fn(nested.target()),
        native_to_proto: to_pb_fn(nested.target()),
        native_is_pointer: native.optional,
        proto_is_pointer: !field.is_repeated(),
        repeated: field.is_repeated(),
        use_package: false,
        oneof_decl: String::new(),
        opts,
    }))
}

fn native_field<'a>(
    ctx: &MessageContext<'a>,
    field_id: &str,
    name: &str,
) -> TransformResult<&'a NativeField> {
    ctx.native
        .field(name)
        .ok_or_else(|| TransformError::MissingNativeField {
            field: field_id.to_string(),
            structure: ctx.native.name.clone(),
            native: name.to_string(),
        })
}

/// prost wraps proto3 `optional` and proto2 `optional` scalars in `Option`.
fn wire_is_pointer(ctx: &MessageContext<'_>, field: &FieldDescriptorProto) -> bool {
    if field.is_repeated() {
        return false;
    }
    match field.kind() {
        Some(Type::Message) => true,
        _ => field.proto3_optional() || (!ctx.proto3 && field.is_explicit_optional()),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
