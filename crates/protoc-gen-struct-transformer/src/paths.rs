//! Output file naming

use crate::config::{GeneratorConfig, PathType};
use struct_transformer::FileDescriptorProto;

/// Suffix of every generated transformer file
pub const TRANSFORMER_SUFFIX: &str = "_transformer.rs";

/// Name of the shared options module emitted next to the transformers
pub const OPTIONS_FILE: &str = "options.rs";

/// Name of the module index emitted in every output directory
pub const MOD_FILE: &str = "mod.rs";

/// Output path of the transformers generated for `file`.
///
/// `import` paths follow the protobuf package, `source_relative` paths the
/// schema file's directory. The configured output package is appended when
/// `use_package_in_path` is set.
pub fn output_file_name(file: &FileDescriptorProto, config: &GeneratorConfig) -> String {
    let (dir, base) = split_path(file.name());
    let stem = base.strip_suffix(".proto").unwrap_or(base);

    let mut parts: Vec<&str> = match config.paths {
        PathType::SourceRelative => dir.split('/').collect(),
        PathType::Import => file.package().split('.').collect(),
    };
    if config.use_package_in_path {
        parts.extend(config.package.split('/'));
    }

    let file_name = format!("{}{TRANSFORMER_SUFFIX}", module_name(stem));
    parts.retain(|p| !p.is_empty());
    parts.push(&file_name);
    parts.join("/")
}

/// Move `file_name` into the directory of `anchor`.
///
/// Dependency transformers land next to the transformers of the file that
/// pulled them in.
pub fn rebase(file_name: &str, anchor: &str) -> String {
    join(parent_dir(anchor), split_path(file_name).1)
}

/// Options module path for the directory of `file_name`
pub fn options_file_name(file_name: &str) -> String {
    join(parent_dir(file_name), OPTIONS_FILE)
}

/// Module index path for `dir`
pub fn mod_file_name(dir: &str) -> String {
    join(dir, MOD_FILE)
}

/// Directory part of a `/`-separated path; empty at the top level
pub fn parent_dir(path: &str) -> &str {
    split_path(path).0
}

/// Rust module name of a generated file (`product_transformer.rs` -> `product_transformer`)
pub fn module_stem(file_name: &str) -> &str {
    let base = split_path(file_name).1;
    base.strip_suffix(".rs").unwrap_or(base)
}

fn module_name(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", path),
    }
}

fn join(dir: &str, base: &str) -> String {
    if dir.is_empty() {
        base.to_string()
    } else {
        format!("{dir}/{base}")
    }
}
