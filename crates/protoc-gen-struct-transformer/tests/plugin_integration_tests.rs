//! Integration tests for the plugin.
//!
//! Requests are built from descriptors, encoded the way protoc sends them and
//! answered either in-process or through the compiled binary.

#![allow(non_snake_case)]

use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_struct_transformer::{GeneratorConfig, OPTIONS_PROTO, respond};
use std::fs;
use std::process::Command;
use struct_transformer::descriptor::OneofDescriptorProto;
use struct_transformer::descriptor::field_descriptor_proto::{Label, Type};
use struct_transformer::options::{FieldOptions, FileOptions, MessageOptions};
use struct_transformer::{CodeGeneratorRequest, DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use tempfile::TempDir;

const MODELS: &str = r#"
pub mod catalog {
    pub struct Product {
        pub id: i64,
        pub title: String,
        pub value: String,
        pub price: Option<Money>,
        pub tags: Vec<String>,
        pub cents: String,
    }
}

pub struct Money {
    pub amount: i64,
    pub currency: String,
}
"#;

fn field(name: &str, ty: Type, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn with_options(mut field: FieldDescriptorProto, opts: FieldOptions) -> FieldDescriptorProto {
    field.options = Some(opts.encode_to_vec());
    field
}

fn targeting(name: &str, target: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        options: Some(
            MessageOptions {
                rust_struct: Some(target.to_string()),
                rust_full_name: None,
            }
            .encode_to_vec(),
        ),
        ..Default::default()
    }
}

fn product_message() -> DescriptorProto {
    let mut title = field("name", Type::String, 2);
    title = with_options(
        title,
        FieldOptions {
            rust_name: Some("title".to_string()),
            ..Default::default()
        },
    );

    let int64_value = FieldDescriptorProto {
        oneof_index: Some(0),
        ..field("int64_value", Type::Int64, 3)
    };
    let string_value = FieldDescriptorProto {
        oneof_index: Some(0),
        ..field("string_value", Type::String, 4)
    };
    let price = FieldDescriptorProto {
        type_name: Some(".shop.Money".to_string()),
        ..field("price", Type::Message, 5)
    };
    let tags = FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field("tags", Type::String, 6)
    };
    let cents = with_options(
        field("cents", Type::Int64, 7),
        FieldOptions {
            to_native: Some("cents_to_string".to_string()),
            to_wire: Some("string_to_cents".to_string()),
            ..Default::default()
        },
    );
    let internal = with_options(
        field("internal", Type::Bool, 8),
        FieldOptions {
            skip: Some(true),
            ..Default::default()
        },
    );
    let weight = field("weight", Type::Double, 9);

    let mut product = targeting(
        "Product",
        "Product",
        vec![
            field("id", Type::Int64, 1),
            title,
            int64_value,
            string_value,
            price,
            tags,
            cents,
            internal,
            weight,
        ],
    );
    product.oneof_decl = vec![OneofDescriptorProto {
        name: Some("value".to_string()),
    }];
    product
}

fn schema(name: &str, deps: &[&str], messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some("shop".to_string()),
        dependency: deps.iter().map(|d| d.to_string()).collect(),
        message_type: messages,
        options: Some(
            FileOptions {
                rust_models_file_path: Some("models.rs".to_string()),
            }
            .encode_to_vec(),
        ),
        syntax: Some("proto3".to_string()),
    }
}

fn shop_request(parameter: &str) -> CodeGeneratorRequest {
    let money = targeting(
        "Money",
        "Money",
        vec![field("amount", Type::Int64, 1), field("currency", Type::String, 2)],
    );

    CodeGeneratorRequest {
        file_to_generate: vec!["shop/product.proto".to_string()],
        parameter: Some(parameter.to_string()),
        proto_file: vec![
            schema("shop/money.proto", &[], vec![money]),
            schema("shop/product.proto", &["shop/money.proto"], vec![product_message()]),
        ],
    }
}

fn models_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("models.rs"), MODELS).unwrap();
    dir
}

fn parameter(dir: &TempDir, extra: &str) -> String {
    format!("models_root={},helper_package=crate::helpers{extra}", dir.path().display())
}

fn content<'a>(response: &'a CodeGeneratorResponse, name: &str) -> &'a str {
    response
        .file
        .iter()
        .find(|f| f.name() == name)
        .map(|f| f.content())
        .unwrap_or_else(|| panic!("{name} not in response"))
}

// =============================================================================
// In-process requests
// =============================================================================

mod in_process {
    use super::*;

    fn answer(extra: &str) -> CodeGeneratorResponse {
        let dir = models_dir();
        let request = shop_request(&parameter(&dir, extra));

        // same path protoc takes: bytes in, decode, answer
        let decoded = CodeGeneratorRequest::decode(request.encode_to_vec().as_slice()).unwrap();
        let config = GeneratorConfig::from_parameter(decoded.parameter()).unwrap();
        respond(&decoded, &config)
    }

    #[test]
    fn respond___shop_schema___lists_expected_files() {
        let response = answer("");

        assert_eq!(response.error, None);
        let names: Vec<_> = response.file.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "shop/transform/product_transformer.rs",
                "shop/transform/money_transformer.rs",
                "shop/transform/options.rs",
                "shop/transform/mod.rs",
            ]
        );
    }

    #[test]
    fn respond___every_generated_file___parses_as_rust() {
        let response = answer("");

        for file in &response.file {
            syn::parse_file(file.content())
                .unwrap_or_else(|e| panic!("{} does not parse: {e}", file.name()));
        }
    }

    #[test]
    fn respond___product_transformer___covers_each_strategy() {
        let response = answer(",format=false");
        let code = content(&response, "shop/transform/product_transformer.rs");

        // direct
        assert!(code.contains("id: src.id,"));
        // rust_name
        assert!(code.contains("title: src.name.clone(),"));
        assert!(code.contains("name: src.title.clone(),"));
        // union
        assert!(code.contains(
            "value: src.value.as_ref().map(|v| crate::helpers::pb_oneof_to_string(v, opts)).unwrap_or_default(),"
        ));
        assert!(code.contains("value: Some(crate::helpers::string_to_pb_oneof(&src.value, opts)),"));
        // nested message, optional on both sides
        assert!(code.contains("price: src.price.as_ref().map(|v| pb_to_money(v, opts)),"));
        // repeated
        assert!(code.contains("tags: src.tags.clone(),"));
        // custom pair
        assert!(code.contains("cents: crate::helpers::cents_to_string(&src.cents, opts),"));
        // skip and unsupported
        assert!(!code.contains("internal"));
        assert!(code.contains("/// - field shop.Product.weight: structure Product has no field weight"));
    }

    #[test]
    fn respond___scoped_union_names___qualifies_helpers() {
        let response = answer(",format=false,scoped_union_names");
        let code = content(&response, "shop/transform/product_transformer.rs");

        assert!(code.contains("crate::helpers::pb_product_value_to_string(v, opts)"));
        assert!(code.contains("crate::helpers::string_to_pb_product_value(&src.value, opts)"));
    }

    #[test]
    fn respond___source_relative_without_package___places_next_to_schema() {
        let response = answer(",paths=source_relative,use_package_in_path=false");

        assert!(response.file.iter().any(|f| f.name() == "shop/product_transformer.rs"));
        assert!(response.file.iter().any(|f| f.name() == "shop/options.rs"));
    }

    #[test]
    fn respond___missing_target_structure___reports_error() {
        let dir = models_dir();
        let mut request = shop_request(&parameter(&dir, ""));
        request.proto_file[0].message_type[0] = targeting("Money", "Cash", vec![]);
        let config = GeneratorConfig::from_parameter(request.parameter()).unwrap();

        let response = respond(&request, &config);

        assert!(response.file.is_empty());
        let error = response.error.unwrap();
        assert!(error.contains("Cash"));
    }
}

// =============================================================================
// Binary
// =============================================================================

mod binary {
    use super::*;

    fn plugin() -> Command {
        Command::new(env!("CARGO_BIN_EXE_protoc-gen-struct-transformer"))
    }

    #[test]
    fn main___request_file___writes_response_to_stdout() {
        let dir = models_dir();
        let request_path = dir.path().join("request.bin");
        fs::write(&request_path, shop_request(&parameter(&dir, "")).encode_to_vec()).unwrap();

        let output = plugin().arg("--request").arg(&request_path).output().unwrap();

        assert!(output.status.success());
        let response = CodeGeneratorResponse::decode(output.stdout.as_slice()).unwrap();
        assert_eq!(response.error, None);
        assert_eq!(response.file.len(), 4);
    }

    #[test]
    fn main___invalid_parameter___answers_with_error() {
        let dir = models_dir();
        let request_path = dir.path().join("request.bin");
        fs::write(&request_path, shop_request("colour=blue").encode_to_vec()).unwrap();

        let output = plugin().arg("--request").arg(&request_path).output().unwrap();

        assert!(output.status.success());
        let response = CodeGeneratorResponse::decode(output.stdout.as_slice()).unwrap();
        assert!(response.error.unwrap().contains("Invalid plugin parameter"));
    }

    #[test]
    fn main___dump_options___prints_extension_declarations() {
        let output = plugin().arg("--dump-options").output().unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap(), OPTIONS_PROTO);
    }

    #[test]
    fn main___garbage_input___fails() {
        let dir = tempfile::tempdir().unwrap();
        let request_path = dir.path().join("request.bin");
        fs::write(&request_path, [0xFF, 0xFF, 0xFF]).unwrap();

        let output = plugin().arg("--request").arg(&request_path).output().unwrap();

        assert!(!output.status.success());
    }
}
