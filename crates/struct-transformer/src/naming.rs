//! Naming convention utilities for generated transformers.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `PascalCase` | [`to_snake_case`] | `pascal_case` |
//! | `type` | [`sanitize_ident`] | `r#type` |
//! | `Product` | [`pb_to_fn`] | `pb_to_product` |
//! | `Product` | [`to_pb_fn`] | `product_to_pb` |
//! | `pb.v1` | [`package_path`] | `pb::v1` |

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Convert PascalCase or camelCase to snake_case.
///
/// Runs of capitals are treated as one word (`HTTPServer` becomes `http_server`).
///
/// # Examples
///
/// ```
/// use struct_transformer::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("ProductItem"), "product_item");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if !result.is_empty() && !result.ends_with('_') && (prev_lower || (prev_upper && next_lower)) {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Escape Rust keywords with the raw identifier syntax, the way prost names fields.
pub fn sanitize_ident(name: &str) -> String {
    if name == "self" || name == "Self" || name == "super" || name == "crate" {
        // cannot be raw identifiers
        format!("{name}_")
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Name of the generated wire-to-native transformer for a native structure
pub fn pb_to_fn(target: &str) -> String {
    format!("pb_to_{}", to_snake_case(target))
}

/// Name of the generated native-to-wire transformer for a native structure
pub fn to_pb_fn(target: &str) -> String {
    format!("{}_to_pb", to_snake_case(target))
}

/// Convert a dotted protobuf package to a Rust module path.
pub fn package_path(package: &str) -> String {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(sanitize_ident)
        .collect::<Vec<_>>()
        .join("::")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn to_snake_case___converts_pascal_case() {
        assert_eq!(to_snake_case("Product"), "product");
        assert_eq!(to_snake_case("ProductItem"), "product_item");
        assert_eq!(to_snake_case("productItem"), "product_item");
    }

    #[test]
    fn to_snake_case___handles_acronyms() {
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("UserID"), "user_id");
    }

    #[test]
    fn to_snake_case___handles_digits_and_existing_underscores() {
        assert_eq!(to_snake_case("V2Item"), "v2_item");
        assert_eq!(to_snake_case("int64_value"), "int64_value");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn sanitize_ident___escapes_keywords() {
        assert_eq!(sanitize_ident("type"), "r#type");
        assert_eq!(sanitize_ident("match"), "r#match");
    }

    #[test]
    fn sanitize_ident___suffixes_non_raw_keywords() {
        assert_eq!(sanitize_ident("self"), "self_");
        assert_eq!(sanitize_ident("crate"), "crate_");
    }

    #[test]
    fn sanitize_ident___leaves_plain_names() {
        assert_eq!(sanitize_ident("name"), "name");
    }

    #[test]
    fn pb_to_fn___uses_snake_case_target() {
        assert_eq!(pb_to_fn("OrderLine"), "pb_to_order_line");
        assert_eq!(to_pb_fn("OrderLine"), "order_line_to_pb");
    }

    #[test]
    fn package_path___joins_segments() {
        assert_eq!(package_path("pb.v1"), "pb::v1");
        assert_eq!(package_path("shop"), "shop");
        assert_eq!(package_path(""), "");
    }

    #[test]
    fn package_path___escapes_keyword_segments() {
        assert_eq!(package_path("acme.type"), "acme::r#type");
    }
}
