//! Catalog of the native structures transformers convert into.
//!
//! The catalog is built by parsing the hand-written Rust models source with
//! [`syn`]. Resolution only needs a simplified view of each struct: field
//! names, a coarse type, and whether the field is optional (`Option<T>`, the
//! Rust stand-in for a nullable pointer).
//!
//! # Examples
//!
//! ```rust
//! use struct_transformer::catalog::StructureCatalog;
//!
//! let catalog = StructureCatalog::parse_source(
//!     "pub struct Product { pub id: i64, pub note: Option<String> }",
//!     "models.rs",
//! )
//! .unwrap();
//!
//! let product = catalog.lookup("Product").unwrap();
//! assert!(!product.field("id").unwrap().optional);
//! assert!(product.field("note").unwrap().optional);
//! ```
//!
//! # Limitations
//!
//! - Tuple and unit structs are skipped
//! - Generics are ignored; `Foo<T>` is recorded as `Foo`
//! - Struct names must be unique across inline modules

use crate::error::{TransformError, TransformResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use syn::{Attribute, Fields, Meta, Type};

/// A native structure definition.
#[derive(Debug, Clone)]
pub struct NativeStruct {
    pub name: String,

    /// Doc comment lines, repeated in debug summaries.
    pub docs: Vec<String>,

    /// Named fields in declaration order.
    pub fields: Vec<NativeField>,
}

/// A field in a native structure.
#[derive(Debug, Clone)]
pub struct NativeField {
    pub name: String,
    pub ty: NativeType,

    /// Whether this field is `Option<T>`.
    pub optional: bool,
}

/// Simplified field type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    String,
    Bool,

    /// Integer types.
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,

    /// Floating point types.
    F32,
    F64,

    /// `Vec<u8>`.
    Bytes,

    /// Vector type.
    Vec(Box<NativeType>),

    /// Named type (struct/enum).
    Custom(String),

    /// Anything else, kept as written.
    Other(String),
}

/// Registry of native structures keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StructureCatalog {
    structs: BTreeMap<String, NativeStruct>,
}

impl StructureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a Rust source file and register every named-field struct in it.
    pub fn parse_file(path: &Path) -> TransformResult<Self> {
        let origin = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| TransformError::models(&origin, e))?;

        Self::parse_source(&content, &origin)
    }

    /// Parse Rust source code. `origin` only labels errors.
    pub fn parse_source(source: &str, origin: &str) -> TransformResult<Self> {
        let file = syn::parse_file(source).map_err(|e| TransformError::models(origin, e))?;

        let mut catalog = Self::new();
        catalog.collect_items(&file.items);

        tracing::debug!(origin, structs = catalog.len(), "parsed native models");
        Ok(catalog)
    }

    fn collect_items(&mut self, items: &[syn::Item]) {
        for item in items {
            match item {
                syn::Item::Struct(s) => match &s.fields {
                    Fields::Named(_) => {
                        let parsed = NativeStruct::from_struct(s);
                        self.insert(parsed);
                    }
                    _ => tracing::debug!(name = %s.ident, "skipping struct without named fields"),
                },
                syn::Item::Mod(m) => {
                    if let Some((_, items)) = &m.content {
                        self.collect_items(items);
                    }
                }
                _ => {}
            }
        }
    }

    /// Register a structure, replacing any previous one with the same name.
    pub fn insert(&mut self, structure: NativeStruct) {
        self.structs.insert(structure.name.clone(), structure);
    }

    pub fn lookup(&self, name: &str) -> Option<&NativeStruct> {
        self.structs.get(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

impl NativeStruct {
    fn from_struct(s: &syn::ItemStruct) -> NativeStruct {
        let fields = match &s.fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .filter_map(NativeField::from_syn_field)
                .collect(),
            _ => Vec::new(),
        };

        NativeStruct {
            name: s.ident.to_string(),
            docs: doc_lines(&s.attrs),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&NativeField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl NativeField {
    pub fn new(name: impl Into<String>, ty: NativeType, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
        }
    }

    fn from_syn_field(f: &syn::Field) -> Option<NativeField> {
        let ident = f.ident.as_ref()?;
        let name = ident.to_string();
        let name = name.strip_prefix("r#").map(str::to_string).unwrap_or(name);
        let (ty, optional) = parse_field_type(&f.ty);

        Some(NativeField { name, ty, optional })
    }
}

impl fmt::Display for NativeStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.docs {
            writeln!(f, "/// {line}")?;
        }
        writeln!(f, "struct {}", self.name)?;
        for field in &self.fields {
            let marker = if field.optional { "?" } else { "" };
            writeln!(f, "  {}{}: {:?}", field.name, marker, field.ty)?;
        }
        Ok(())
    }
}

/// Non-empty `///` lines of an item, trimmed.
fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value().trim().to_string()),
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn first_generic_arg(segment: &syn::PathSegment) -> Option<&Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
            return Some(inner);
        }
    }
    None
}

/// Parse a syn::Type into a NativeType plus its optionality.
fn parse_field_type(ty: &Type) -> (NativeType, bool) {
    let Type::Path(type_path) = ty else {
        return (NativeType::Other(quote::quote!(#ty).to_string()), false);
    };
    let Some(segment) = type_path.path.segments.last() else {
        return (NativeType::Other(quote::quote!(#ty).to_string()), false);
    };

    let simple = match segment.ident.to_string().as_str() {
        "String" => Some(NativeType::String),
        "bool" => Some(NativeType::Bool),
        "i8" => Some(NativeType::I8),
        "i16" => Some(NativeType::I16),
        "i32" => Some(NativeType::I32),
        "i64" => Some(NativeType::I64),
        "u8" => Some(NativeType::U8),
        "u16" => Some(NativeType::U16),
        "u32" => Some(NativeType::U32),
        "u64" => Some(NativeType::U64),
        "f32" => Some(NativeType::F32),
        "f64" => Some(NativeType::F64),
        _ => None,
    };
    if let Some(simple) = simple {
        return (simple, false);
    }

    let ident = &segment.ident;

    if ident == "Option" {
        if let Some(inner) = first_generic_arg(segment) {
            let (inner_type, _) = parse_field_type(inner);
            return (inner_type, true);
        }
    }

    if ident == "Box" {
        if let Some(inner) = first_generic_arg(segment) {
            return parse_field_type(inner);
        }
    }

    if ident == "Vec" {
        if let Some(inner) = first_generic_arg(segment) {
            let (inner_type, _) = parse_field_type(inner);
            if inner_type == NativeType::U8 {
                return (NativeType::Bytes, false);
            }
            return (NativeType::Vec(Box::new(inner_type)), false);
        }
    }

    (NativeType::Custom(ident.to_string()), false)
}
