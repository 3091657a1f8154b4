#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// Parameter parsing tests

#[test]
fn GeneratorConfig___from_parameter___empty_uses_defaults() {
    let config = GeneratorConfig::from_parameter("").unwrap();

    assert_eq!(config, GeneratorConfig::default());
    assert_eq!(config.package, "transform");
    assert_eq!(config.paths, PathType::Import);
    assert!(config.use_package_in_path);
    assert!(config.format);
}

#[test]
fn GeneratorConfig___from_parameter___applies_key_values() {
    let config = GeneratorConfig::from_parameter(
        "package=conv,helper_package=crate::helpers,models_module=crate::domain,paths=source_relative",
    )
    .unwrap();

    assert_eq!(config.package, "conv");
    assert_eq!(config.helper_package, "crate::helpers");
    assert_eq!(config.models_module, "crate::domain");
    assert_eq!(config.paths, PathType::SourceRelative);
}

#[test_case("debug", true ; "bare key sets flag")]
#[test_case("debug=true", true ; "explicit true")]
#[test_case("debug=false", false ; "explicit false")]
fn GeneratorConfig___from_parameter___parses_boolean_flags(parameter: &str, expected: bool) {
    let config = GeneratorConfig::from_parameter(parameter).unwrap();

    assert_eq!(config.debug, expected);
}

#[test]
fn GeneratorConfig___from_parameter___accepts_dashed_keys_and_spaces() {
    let config =
        GeneratorConfig::from_parameter(" use-package-in-path=false , scoped_union_names ").unwrap();

    assert!(!config.use_package_in_path);
    assert!(config.scoped_union_names);
}

#[test]
fn GeneratorConfig___from_parameter___rejects_unknown_key() {
    let result = GeneratorConfig::from_parameter("colour=blue");

    assert!(result.is_err());
}

#[test]
fn GeneratorConfig___from_parameter___rejects_bad_path_type() {
    let result = GeneratorConfig::from_parameter("paths=absolute");

    assert!(result.is_err());
}

#[test]
fn GeneratorConfig___from_parameter___file_then_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transformer.toml");
    std::fs::write(
        &path,
        r#"
package = "from_file"
helper_package = "crate::file_helpers"
format = false
"#,
    )
    .unwrap();

    let parameter = format!("config={},package=from_param", path.display());
    let config = GeneratorConfig::from_parameter(&parameter).unwrap();

    assert_eq!(config.package, "from_param");
    assert_eq!(config.helper_package, "crate::file_helpers");
    assert!(!config.format);
}

#[test]
fn GeneratorConfig___from_parameter___missing_config_file_fails() {
    let result = GeneratorConfig::from_parameter("config=/definitely/not/here.toml");

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to read config"));
}

// TOML parsing tests

#[test]
fn GeneratorConfig___from_toml_str___partial_keeps_defaults() {
    let config = GeneratorConfig::from_toml_str(r#"paths = "source_relative""#).unwrap();

    assert_eq!(config.paths, PathType::SourceRelative);
    assert_eq!(config.proto_root, "crate");
    assert_eq!(config.models_root, PathBuf::from("."));
}

#[test]
fn GeneratorConfig___from_toml_str___rejects_unknown_field() {
    let result = GeneratorConfig::from_toml_str(r#"colour = "blue""#);

    assert!(result.is_err());
}

// Validation tests

#[test]
fn GeneratorConfig___validate___rejects_empty_proto_root() {
    let config = GeneratorConfig {
        proto_root: " ".to_string(),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("proto_root"));
}

#[test]
fn GeneratorConfig___validate___rejects_escaping_package() {
    let config = GeneratorConfig {
        package: "../outside".to_string(),
        ..Default::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn GeneratorConfig___resolve_config___carries_union_naming() {
    let config = GeneratorConfig {
        scoped_union_names: true,
        ..Default::default()
    };

    assert!(config.resolve_config().scoped_union_names);
}
