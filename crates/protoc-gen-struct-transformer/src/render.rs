//! Rust source generation for resolved messages.
//!
//! Every transformer file has the same shape:
//!
//! ```text
//! // Code generated by protoc-gen-struct-transformer, version: 0.1.0. DO NOT EDIT.
//! // source file: shop/product.proto
//! // source package: shop
//!
//! use super::options::TransformOptions;
//! use crate::shop as pb;
//! use crate::models;
//!
//! pub fn pb_to_product(src: &pb::Product, opts: &TransformOptions) -> models::Product { .. }
//! pub fn product_to_pb(src: &models::Product, opts: &TransformOptions) -> pb::Product { .. }
//! pub fn pb_to_product_list(..) -> Vec<models::Product> { .. }
//! pub fn product_list_to_pb(..) -> Vec<pb::Product> { .. }
//! ```

use crate::GENERATOR_NAME;
use crate::config::GeneratorConfig;
use struct_transformer::naming::{package_path, pb_to_fn, sanitize_ident, to_pb_fn, to_snake_case};
use struct_transformer::{Field, FileDescriptorProto, ResolvedMessage};

/// One entry of a transformer file, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBlock {
    /// A message with generated transformers
    Transformers {
        message: ResolvedMessage,
        /// Native structure summary, emitted in debug mode
        native_summary: Option<String>,
    },

    /// A message without a target structure
    Skipped { full_name: String, oneofs: Vec<String> },
}

/// Which direction a conversion expression goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ToNative,
    ToWire,
}

/// Render the transformer file for `file`.
///
/// `siblings` are the module names of transformer files this one calls into.
pub fn render_file(
    file: &FileDescriptorProto,
    blocks: &[MessageBlock],
    siblings: &[String],
    config: &GeneratorConfig,
) -> String {
    let mut body = String::new();

    // Notes about skipped messages
    for block in blocks {
        if let MessageBlock::Skipped { full_name, oneofs } = block {
            body.push_str(&format!("//! {full_name}: no rust_struct option, skipped\n"));
            for oneof in oneofs {
                body.push_str(&format!("//! Oneof: {oneof:?}\n"));
            }
        }
    }

    body.push_str(
        "#![allow(unused_imports, unused_variables, clippy::needless_update, clippy::clone_on_copy)]\n\n",
    );

    // Imports
    body.push_str("use super::options::TransformOptions;\n");
    for sibling in siblings {
        body.push_str(&format!("use super::{sibling}::*;\n"));
    }
    body.push_str(&use_as(&wire_module(&config.proto_root, file.package()), "pb"));
    body.push_str(&use_as(&config.models_module, "models"));

    for block in blocks {
        if let MessageBlock::Transformers {
            message,
            native_summary,
        } = block
        {
            body.push('\n');
            body.push_str(&render_message(
                message,
                file.package(),
                native_summary.as_deref(),
            ));
        }
    }

    let body = if config.format {
        format_source(&body)
    } else {
        body
    };

    let mut code = file_header(file.name(), file.package());
    code.push('\n');
    code.push_str(&body);
    code
}

/// The generated-code marker and source description
pub fn file_header(source_file: &str, source_package: &str) -> String {
    format!(
        "// Code generated by {GENERATOR_NAME}, version: {}. DO NOT EDIT.\n\
         // source file: {source_file}\n\
         // source package: {source_package}\n",
        crate::VERSION
    )
}

/// The options module shared by every transformer in a directory
pub fn render_options_module() -> String {
    let mut code = format!(
        "// Code generated by {GENERATOR_NAME}, version: {}. DO NOT EDIT.\n\n",
        crate::VERSION
    );
    code.push_str(
        r#"/// Settings threaded through every generated transformer and custom helper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Free-form version tag helpers may branch on
    pub version: String,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
"#,
    );
    code
}

/// `pub mod` declarations for every generated module of one directory
pub fn render_mod_index(modules: &[String]) -> String {
    let mut code = format!(
        "// Code generated by {GENERATOR_NAME}, version: {}. DO NOT EDIT.\n\n",
        crate::VERSION
    );
    for module in modules {
        code.push_str(&format!("pub mod {module};\n"));
    }
    code
}

/// Pretty-print generated code, or hand it back untouched when it does not parse.
pub fn format_source(code: &str) -> String {
    match syn::parse_file(code) {
        Ok(file) => prettyplease::unparse(&file),
        Err(e) => {
            tracing::warn!("generated code does not parse, leaving it unformatted: {e}");
            code.to_string()
        }
    }
}

/// Module path of the prost types for `package`
pub fn wire_module(proto_root: &str, package: &str) -> String {
    let package = package_path(package);
    if package.is_empty() {
        proto_root.to_string()
    } else {
        format!("{proto_root}::{package}")
    }
}

/// Path of a wire message relative to the `pb` alias.
///
/// prost nests `Outer.Inner` as `outer::Inner`.
pub fn wire_type(package: &str, full_name: &str) -> String {
    let relative = if package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };

    let segments: Vec<&str> = relative.split('.').collect();
    let mut path = vec!["pb".to_string()];
    if let Some((name, outer)) = segments.split_last() {
        path.extend(outer.iter().map(|s| sanitize_ident(&to_snake_case(s))));
        path.push(name.to_string());
    }
    path.join("::")
}

fn render_message(message: &ResolvedMessage, package: &str, native_summary: Option<&str>) -> String {
    let wire = wire_type(package, &message.full_name);
    let native = if message.full.is_empty() {
        format!("models::{}", message.target)
    } else {
        message.full.clone()
    };
    let to_native = pb_to_fn(&message.target);
    let to_wire = to_pb_fn(&message.target);

    let mut code = String::new();

    // Wire to native
    code.push_str(&format!("/// Converts `{}` into `{native}`.\n", message.full_name));
    if !message.comments.is_empty() {
        code.push_str("///\n/// Not converted:\n");
        for comment in &message.comments {
            code.push_str(&format!("/// - {comment}\n"));
        }
    }
    if let Some(summary) = native_summary {
        code.push_str("///\n/// Native structure:\n///\n");
        for line in summary.lines() {
            code.push_str(&format!("///     {line}\n"));
        }
    }
    code.push_str(&format!(
        "pub fn {to_native}(src: &{wire}, opts: &TransformOptions) -> {native} {{\n    {native} {{\n"
    ));
    for field in &message.fields {
        code.push_str(&format!(
            "        {}: {},\n",
            sanitize_ident(&field.name),
            conversion(field, Direction::ToNative)
        ));
    }
    code.push_str("        ..Default::default()\n    }\n}\n\n");

    // Native to wire
    code.push_str(&format!("/// Converts `{native}` into `{}`.\n", message.full_name));
    code.push_str(&format!(
        "pub fn {to_wire}(src: &{native}, opts: &TransformOptions) -> {wire} {{\n    {wire} {{\n"
    ));
    for field in &message.fields {
        code.push_str(&format!(
            "        {}: {},\n",
            sanitize_ident(&field.proto_name),
            conversion(field, Direction::ToWire)
        ));
    }
    code.push_str("        ..Default::default()\n    }\n}\n\n");

    // Lists
    code.push_str(&format!(
        "pub fn {to_native}_list(src: &[{wire}], opts: &TransformOptions) -> Vec<{native}> {{\n    \
         src.iter().map(|v| {to_native}(v, opts)).collect()\n}}\n\n"
    ));
    let to_wire_list = format!("{}_list_to_pb", to_snake_case(&message.target));
    code.push_str(&format!(
        "pub fn {to_wire_list}(src: &[{native}], opts: &TransformOptions) -> Vec<{wire}> {{\n    \
         src.iter().map(|v| {to_wire}(v, opts)).collect()\n}}\n"
    ));

    code
}

/// Expression producing the destination value of `field`.
fn conversion(field: &Field, direction: Direction) -> String {
    let (source, func, src_ptr, dst_ptr) = match direction {
        Direction::ToNative => (
            format!("src.{}", sanitize_ident(&field.proto_name)),
            &field.proto_to_native,
            field.proto_is_pointer,
            field.native_is_pointer,
        ),
        Direction::ToWire => (
            format!("src.{}", sanitize_ident(&field.name)),
            &field.native_to_proto,
            field.native_is_pointer,
            field.proto_is_pointer,
        ),
    };

    if func.is_empty() {
        return assignment(&source, needs_clone(field), src_ptr, dst_ptr, field.repeated);
    }

    let extra = if field.opts.trim().is_empty() {
        String::new()
    } else {
        format!(", {}", field.opts.trim())
    };
    let call = |arg: &str| format!("{func}({arg}, opts{extra})");

    if field.repeated {
        return format!("{source}.iter().map(|v| {}).collect()", call("v"));
    }

    match (src_ptr, dst_ptr) {
        (true, true) => format!("{source}.as_ref().map(|v| {})", call("v")),
        (true, false) => format!("{source}.as_ref().map(|v| {}).unwrap_or_default()", call("v")),
        (false, true) => format!("Some({})", call(&format!("&{source}"))),
        (false, false) => call(&format!("&{source}")),
    }
}

fn assignment(source: &str, clone: bool, src_ptr: bool, dst_ptr: bool, repeated: bool) -> String {
    let value = if clone {
        format!("{source}.clone()")
    } else {
        source.to_string()
    };

    if repeated {
        return value;
    }

    match (src_ptr, dst_ptr) {
        (false, true) => format!("Some({value})"),
        (true, false) => format!("{value}.unwrap_or_default()"),
        _ => value,
    }
}

fn needs_clone(field: &Field) -> bool {
    field.repeated || matches!(field.proto_type.as_str(), "string" | "bytes")
}

fn use_as(path: &str, alias: &str) -> String {
    if path == alias || path.ends_with(&format!("::{alias}")) {
        format!("use {path};\n")
    } else {
        format!("use {path} as {alias};\n")
    }
}
