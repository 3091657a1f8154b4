#![allow(non_snake_case)]

use super::*;
use crate::fixtures;

#[test]
fn message_options___absent___returns_defaults() {
    let msg = fixtures::message("Product", vec![]);

    let opts = message_options(&msg, "pb.Product").unwrap();

    assert_eq!(opts.rust_struct, None);
    assert_eq!(opts.rust_full_name, None);
}

#[test]
fn message_options___extension_set___decodes_struct_name() {
    let msg = fixtures::targeting(fixtures::message("Product", vec![]), "Product");

    let opts = message_options(&msg, "pb.Product").unwrap();

    assert_eq!(opts.rust_struct.as_deref(), Some("Product"));
}

#[test]
fn message_options___standard_options_only___ignores_them() {
    // deprecated = true (field 3, varint)
    let mut msg = fixtures::message("Product", vec![]);
    msg.options = Some(vec![0x18, 0x01]);

    let opts = message_options(&msg, "pb.Product").unwrap();

    assert_eq!(opts.rust_struct, None);
}

#[test]
fn message_options___wrong_wire_type___returns_malformed_error() {
    let mut msg = fixtures::message("Product", vec![]);
    msg.options = Some(fixtures::malformed_message_options());

    let err = message_options(&msg, "pb.Product").unwrap_err();

    assert!(matches!(
        err,
        TransformError::MalformedOptions { kind: "message", ref element, .. } if element == "pb.Product"
    ));
}

#[test]
fn file_options___models_path___decodes() {
    let file = fixtures::with_models(fixtures::file("a.proto", "pb", vec![]), "models.rs");

    let opts = file_options(&file).unwrap();

    assert_eq!(opts.rust_models_file_path.as_deref(), Some("models.rs"));
}

#[test]
fn field_options___custom_pair___decodes_both_names() {
    let field = fixtures::with_field_options(
        fixtures::scalar("price", crate::descriptor::field_descriptor_proto::Type::String, 1),
        FieldOptions {
            to_native: Some("parse_price".into()),
            to_wire: Some("format_price".into()),
            ..Default::default()
        },
    );

    let opts = field_options(&field, "pb.Product").unwrap();

    assert_eq!(opts.to_native.as_deref(), Some("parse_price"));
    assert_eq!(opts.to_wire.as_deref(), Some("format_price"));
    assert_eq!(opts.skip, None);
}
