//! protoc-gen-struct-transformer - protoc plugin for prost/native struct transformers
//!
//! Reads a `CodeGeneratorRequest`, resolves every annotated message against
//! the native structures declared in the models source, and answers with one
//! `<stem>_transformer.rs` file per schema file plus the shared `options.rs`
//! and a `mod.rs` index per output directory.

pub mod config;
pub mod generate;
pub mod logging;
pub mod paths;
pub mod render;

pub use config::{GeneratorConfig, PathType};
pub use generate::{GeneratedFile, generate};

use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response::{Feature, File};
use struct_transformer::CodeGeneratorRequest;

/// Plugin name written into every generated file
pub const GENERATOR_NAME: &str = "protoc-gen-struct-transformer";

/// Plugin version written into every generated file
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The extension declarations users import into their schemas
pub const OPTIONS_PROTO: &str = include_str!("../proto/struct_transformer/options.proto");

/// Answer a decoded request.
///
/// Fatal errors are reported through the response's `error` field, the way
/// protoc expects plugins to fail.
pub fn respond(request: &CodeGeneratorRequest, config: &GeneratorConfig) -> CodeGeneratorResponse {
    match generate(request, config) {
        Ok(files) => CodeGeneratorResponse {
            file: files
                .into_iter()
                .map(|f| File {
                    name: Some(f.name),
                    content: Some(f.content),
                    ..Default::default()
                })
                .collect(),
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        },
        Err(e) => {
            tracing::error!("{e}");
            error_response(e.to_string())
        }
    }
}

/// A response carrying only an error message
pub fn error_response(message: impl Into<String>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(message.into()),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}
